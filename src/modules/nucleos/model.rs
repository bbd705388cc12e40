pub use gradebook_models::ids::NucleoId;
pub use gradebook_models::nucleos::*;
