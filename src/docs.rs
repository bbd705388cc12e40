use utoipa::OpenApi;

use gradebook_core::ErrorResponse;
use gradebook_models::MessageResponse;

use crate::health::HealthResponse;
use crate::modules::alumnos::model::{Alumno, AlumnoDetail, CreateAlumnoDto, UpdateAlumnoDto};
use crate::modules::cursos::model::{CreateCursoDto, Curso, CursoDetail, UpdateCursoDto};
use crate::modules::notas::model::{CreateNotaDto, Nota, UpdateNotaDto};
use crate::modules::nucleos::model::{
    CreateNucleoDto, CreateNucleoForCursoDto, NucleoDetail, NucleoPedagogico, UpdateNucleoDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health::health_check,
        crate::modules::alumnos::controller::get_alumnos,
        crate::modules::alumnos::controller::create_alumno,
        crate::modules::alumnos::controller::get_alumno,
        crate::modules::alumnos::controller::update_alumno,
        crate::modules::alumnos::controller::delete_alumno,
        crate::modules::alumnos::controller::get_alumno_cursos,
        crate::modules::alumnos::controller::inscribir,
        crate::modules::alumnos::controller::desinscribir,
        crate::modules::cursos::controller::get_cursos,
        crate::modules::cursos::controller::create_curso,
        crate::modules::cursos::controller::get_curso,
        crate::modules::cursos::controller::update_curso,
        crate::modules::cursos::controller::delete_curso,
        crate::modules::cursos::controller::get_curso_alumnos,
        crate::modules::cursos::controller::get_curso_nucleos,
        crate::modules::cursos::controller::add_nucleo_to_curso,
        crate::modules::cursos::controller::get_promedio_nucleo,
        crate::modules::nucleos::controller::create_nucleo,
        crate::modules::nucleos::controller::get_nucleo,
        crate::modules::nucleos::controller::update_nucleo,
        crate::modules::nucleos::controller::delete_nucleo,
        crate::modules::nucleos::controller::add_nota_to_nucleo,
        crate::modules::notas::controller::get_nota,
        crate::modules::notas::controller::update_nota,
        crate::modules::notas::controller::delete_nota,
    ),
    components(
        schemas(
            Alumno,
            AlumnoDetail,
            CreateAlumnoDto,
            UpdateAlumnoDto,
            Curso,
            CursoDetail,
            CreateCursoDto,
            UpdateCursoDto,
            NucleoPedagogico,
            NucleoDetail,
            CreateNucleoDto,
            CreateNucleoForCursoDto,
            UpdateNucleoDto,
            Nota,
            CreateNotaDto,
            UpdateNotaDto,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Alumnos", description = "Students and course enrollment"),
        (name = "Cursos", description = "Courses, their units and unit averages"),
        (name = "Nucleos", description = "Teaching units and grade recording"),
        (name = "Notas", description = "Individual grades"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Gradebook API",
        version = "0.1.0",
        description = "School gradebook: students, courses, teaching units and grades.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/alumnos",
            "/api/alumnos/{id}/inscribir/{curso_id}",
            "/api/cursos/{id}/promedio/{nucleo_id}",
            "/api/nucleos/{id}/notas",
            "/api/notas/{id}",
            "/health",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
