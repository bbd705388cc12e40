pub use gradebook_models::cursos::*;
pub use gradebook_models::ids::CursoId;
