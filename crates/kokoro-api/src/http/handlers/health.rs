//! GET /api/health - liveness check (no auth required).

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        message: "Server is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let Json(status) = health_check().await;
        assert_eq!(status.message, "Server is running");
        assert!(!status.version.is_empty());
    }
}
