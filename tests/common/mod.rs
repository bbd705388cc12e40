use axum::body::Body;
use axum::http::{Request, StatusCode};
use gradebook::gradebook_config::CorsConfig;
use gradebook::router::init_router;
use gradebook::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    init_router(AppState::new(pool, CorsConfig::default()))
}

/// Sends a request through a fresh router and returns status plus JSON body.
///
/// Empty bodies come back as `Value::Null`.
pub async fn send(
    pool: &PgPool,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[allow(dead_code)]
pub async fn create_test_alumno(pool: &PgPool, id: &str, nombre: &str, apellido: &str) {
    sqlx::query("INSERT INTO alumno (id, nombre, apellido) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(nombre)
        .bind(apellido)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn create_test_curso(pool: &PgPool, materia: &str, anio: i32, division: &str) -> i64 {
    sqlx::query_scalar(
        r#"INSERT INTO curso (nombre_completo, nombre_materia, anio, division)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(format!("{} - {}º {}", materia, anio, division))
    .bind(materia)
    .bind(anio)
    .bind(division)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_nucleo(pool: &PgPool, curso_id: i64, tema: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO nucleo_pedagogico (tema, curso_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(tema)
    .bind(curso_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_nota(pool: &PgPool, nucleo_id: i64, valor: i32) -> i64 {
    sqlx::query_scalar("INSERT INTO nota (valor, nucleo_id) VALUES ($1, $2) RETURNING id")
        .bind(valor)
        .bind(nucleo_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
