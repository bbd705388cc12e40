mod common;

use axum::http::StatusCode;
use common::{count, create_test_curso, create_test_nota, create_test_nucleo, send};
use serde_json::json;
use sqlx::PgPool;

async fn setup_nota(pool: &PgPool, valor: i32) -> i64 {
    let curso_id = create_test_curso(pool, "Química", 5, "A").await;
    let nucleo_id = create_test_nucleo(pool, curso_id, "Enlaces").await;
    create_test_nota(pool, nucleo_id, valor).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_nota(pool: PgPool) {
    let nota_id = setup_nota(&pool, 6).await;

    let (status, body) = send(&pool, "GET", &format!("/api/notas/{}", nota_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], nota_id);
    assert_eq!(body["valor"], 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_nota(pool: PgPool) {
    let nota_id = setup_nota(&pool, 6).await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/notas/{}", nota_id),
        Some(json!({ "valor": 10, "descripcion": "Recuperatorio" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valor"], 10);
    assert_eq!(body["descripcion"], "Recuperatorio");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_nota_out_of_range(pool: PgPool) {
    let nota_id = setup_nota(&pool, 6).await;

    let (status, _) = send(
        &pool,
        "PUT",
        &format!("/api/notas/{}", nota_id),
        Some(json!({ "valor": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&pool, "GET", &format!("/api/notas/{}", nota_id), None).await;
    assert_eq!(body["valor"], 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_nota_wrong_type(pool: PgPool) {
    let nota_id = setup_nota(&pool, 6).await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/notas/{}", nota_id),
        Some(json!({ "valor": "diez" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid field type in request");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_nota(pool: PgPool) {
    let nota_id = setup_nota(&pool, 6).await;

    let (status, body) = send(&pool, "DELETE", &format!("/api/notas/{}", nota_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Grade deleted successfully");
    assert_eq!(count(&pool, "nota").await, 0);
    assert_eq!(count(&pool, "nucleo_pedagogico").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_nota(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/notas/31337", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Grade not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_nota_id_is_json_error(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/notas/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid path parameter")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
