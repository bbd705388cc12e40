pub mod alumnos;
pub mod cursos;
pub mod notas;
pub mod nucleos;
