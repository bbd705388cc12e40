mod common;

use axum::http::StatusCode;
use common::{count, create_test_curso, create_test_nota, create_test_nucleo, send};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_curso_derives_nombre_completo(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/cursos",
        Some(json!({
            "nombre_materia": "Matemática",
            "anio": 1,
            "division": "A"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nombre_completo"], "Matemática - 1º A");
    assert!(body["id"].is_i64());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_curso_ignores_client_nombre_completo(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/cursos",
        Some(json!({
            "nombre_completo": "Something else",
            "nombre_materia": "Lengua",
            "anio": 2,
            "division": "B"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nombre_completo"], "Lengua - 2º B");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_curso_validation(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/cursos",
        Some(json!({
            "nombre_materia": "Matemática",
            "anio": 0,
            "division": "A"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("anio"));
    assert_eq!(count(&pool, "curso").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_duplicate_curso_conflicts(pool: PgPool) {
    create_test_curso(&pool, "Matemática", 1, "A").await;

    let (status, _) = send(
        &pool,
        "POST",
        "/api/cursos",
        Some(json!({
            "nombre_materia": "Matemática",
            "anio": 1,
            "division": "A"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(count(&pool, "curso").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filter_cursos_by_nombre_completo(pool: PgPool) {
    create_test_curso(&pool, "Matemática", 1, "A").await;
    create_test_curso(&pool, "Matemática", 1, "B").await;

    let (status, body) = send(
        &pool,
        "GET",
        "/api/cursos?nombre_completo=Matem%C3%A1tica%20-%201%C2%BA%20B",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let cursos = body.as_array().unwrap();
    assert_eq!(cursos.len(), 1);
    assert_eq!(cursos[0]["division"], "B");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_curso_recomputes_nombre_completo(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Matemática", 1, "A").await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/cursos/{}", curso_id),
        Some(json!({ "anio": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre_completo"], "Matemática - 3º A");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_curso_detail(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Matemática", 1, "A").await;
    let nucleo_id = create_test_nucleo(&pool, curso_id, "Fracciones").await;
    create_test_nota(&pool, nucleo_id, 9).await;

    let (status, body) = send(&pool, "GET", &format!("/api/cursos/{}", curso_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre_completo"], "Matemática - 1º A");
    assert_eq!(body["nucleos"][0]["tema"], "Fracciones");
    assert_eq!(body["nucleos"][0]["notas"][0]["valor"], 9);
    assert_eq!(body["nucleos"][0]["promedio"], 9.0);
    assert_eq!(body["alumnos"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_missing_curso(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/cursos/12345", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promedio_with_malformed_nucleo_id(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Matemática", 1, "A").await;

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/cursos/{}/promedio/uno", curso_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_nucleo_to_curso(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Historia", 2, "A").await;

    let (status, body) = send(
        &pool,
        "POST",
        &format!("/api/cursos/{}/nucleos", curso_id),
        Some(json!({ "tema": "  Revolución de Mayo  " })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nucleos"][0]["tema"], "Revolución de Mayo");
    assert_eq!(body["nucleos"][0]["promedio"], 0.0);

    let (_, nucleos) = send(
        &pool,
        "GET",
        &format!("/api/cursos/{}/nucleos", curso_id),
        None,
    )
    .await;
    assert_eq!(nucleos.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_nucleo_to_missing_curso(pool: PgPool) {
    let (status, _) = send(
        &pool,
        "POST",
        "/api/cursos/999/nucleos",
        Some(json!({ "tema": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(count(&pool, "nucleo_pedagogico").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promedio_nucleo(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Matemática", 1, "A").await;
    let nucleo_id = create_test_nucleo(&pool, curso_id, "Fracciones").await;
    for valor in [8, 6, 10] {
        create_test_nota(&pool, nucleo_id, valor).await;
    }
    let vacio_id = create_test_nucleo(&pool, curso_id, "Geometría").await;

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/cursos/{}/promedio/{}", curso_id, nucleo_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(8.0));

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/cursos/{}/promedio/{}", curso_id, vacio_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(0.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promedio_nucleo_not_in_curso(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Matemática", 1, "A").await;
    let otro_id = create_test_curso(&pool, "Lengua", 1, "A").await;
    let nucleo_id = create_test_nucleo(&pool, otro_id, "Sustantivos").await;

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/cursos/{}/promedio/{}", curso_id, nucleo_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unit not found in this course");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_curso_cascades(pool: PgPool) {
    let curso_id = create_test_curso(&pool, "Matemática", 1, "A").await;
    for tema in ["Fracciones", "Geometría"] {
        let nucleo_id = create_test_nucleo(&pool, curso_id, tema).await;
        for valor in [5, 7, 9] {
            create_test_nota(&pool, nucleo_id, valor).await;
        }
    }
    assert_eq!(count(&pool, "nota").await, 6);

    let (status, body) = send(&pool, "DELETE", &format!("/api/cursos/{}", curso_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course deleted successfully");
    assert_eq!(count(&pool, "nucleo_pedagogico").await, 0);
    assert_eq!(count(&pool, "nota").await, 0);
}
