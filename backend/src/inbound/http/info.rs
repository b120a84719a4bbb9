//! Service information endpoint.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static description of the running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "product-service")]
    pub service: String,
    #[schema(example = "1.0.0")]
    pub version: String,
    #[schema(example = "Modern product management microservice")]
    pub description: String,
}

impl ServiceInfo {
    /// Information about this build, taken from the package metadata.
    pub fn current() -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            description: env!("CARGO_PKG_DESCRIPTION").to_owned(),
        }
    }
}

/// Report the service name, version and description.
#[utoipa::path(
    get,
    path = "/info",
    tags = ["info"],
    responses((status = 200, description = "Service information", body = ServiceInfo))
)]
#[get("/info")]
pub async fn info() -> web::Json<ServiceInfo> {
    web::Json(ServiceInfo::current())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn info_reports_package_metadata() {
        let app = test::init_service(App::new().service(info)).await;
        let req = test::TestRequest::get().uri("/info").to_request();

        let body: ServiceInfo = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            ServiceInfo {
                service: "product-service".to_owned(),
                version: "1.0.0".to_owned(),
                description: "Modern product management microservice".to_owned(),
            }
        );
    }
}
