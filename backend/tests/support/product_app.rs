//! Full-stack harness: product service over the in-memory repository and
//! cache, mounted behind the production middleware and extractors.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use product_service::Trace;
use product_service::domain::ProductService;
use product_service::inbound::http::error::{json_config, query_config};
use product_service::inbound::http::info::info;
use product_service::inbound::http::products;
use product_service::inbound::http::state::HttpState;
use product_service::outbound::cache::InMemoryProductCache;
use product_service::test_support::{InMemoryProductRepository, MutableClock};
use serde_json::{Value, json};

pub const STORE: &str = "STORE-001";

/// Adapters shared between the app under test and assertions.
pub struct Harness {
    pub repository: Arc<InMemoryProductRepository>,
    pub cache: Arc<InMemoryProductCache>,
    pub clock: Arc<MutableClock>,
}

pub fn start_of_test() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

impl Harness {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryProductRepository::new()),
            cache: Arc::new(InMemoryProductCache::new(Duration::from_secs(600))),
            clock: Arc::new(MutableClock::new(start_of_test())),
        }
    }

    fn http_state(&self) -> web::Data<HttpState> {
        let service = Arc::new(ProductService::new(
            self.repository.clone(),
            self.cache.clone(),
            self.clock.clone(),
        ));
        web::Data::new(HttpState::new(service.clone(), service))
    }

    pub async fn init(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .app_data(self.http_state())
                .app_data(json_config())
                .app_data(query_config())
                .wrap(Trace::with_clock(self.clock.clone()))
                .service(web::scope("/api/v1").configure(products::configure))
                .service(info),
        )
        .await
    }
}

/// Create-request body with every required field.
pub fn product_body(title: &str, price: f64, category: &str, stock: i64) -> Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "price": price,
        "storeId": STORE,
        "category": category,
        "stock": stock
    })
}

/// Send `request` and decode the JSON body, if any.
pub async fn send<S>(app: &S, request: test::TestRequest) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status().as_u16();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Create a product and return its id.
pub async fn create<S>(app: &S, body: Value) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, created) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/products")
            .set_json(body),
    )
    .await;
    assert_eq!(status, 201, "create failed: {created}");
    created["productUuid"]
        .as_str()
        .expect("productUuid")
        .to_owned()
}
