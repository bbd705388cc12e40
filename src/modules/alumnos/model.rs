pub use gradebook_models::alumnos::*;
pub use gradebook_models::ids::AlumnoId;
