use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::config::Settings;

/// Root endpoint.
///
/// Returns the project name, version and the documentation path.
pub async fn root(settings: web::Data<Settings>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": format!("{} API", settings.project_name),
        "version": settings.version,
        "docs": format!("{}/docs", settings.api_v1_str),
    }))
}

/// Health check endpoint for load balancers and monitoring.
pub async fn health(settings: web::Data<Settings>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": settings.version,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(Settings::new("secret")))
                .route("/", web::get().to(root))
                .route("/health", web::get().to(health)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], "1.0.0");

        let req = test::TestRequest::get().uri("/").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["message"], "TaskFlow API");
        assert_eq!(json["docs"], "/api/v1/docs");
    }
}
