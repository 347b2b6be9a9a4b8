use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::models::health::HealthResponse;

/// GET /api/health - Liveness + ping de la BD
#[get("/health")]
pub async fn health_check(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let (status, database) = match db.ping().await {
        Ok(()) => ("ok", "up"),
        Err(e) => {
            log::error!("Health check: database unreachable: {}", e);
            ("degraded", "down")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        time: Utc::now(),
    };

    if database == "up" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;
    use actix_web::test;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_health_check() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert!(body.get("time").is_some());
    }
}
