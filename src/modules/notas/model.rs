pub use gradebook_models::ids::NotaId;
pub use gradebook_models::notas::*;
pub use gradebook_models::value_types::{NotaValor, promedio};
