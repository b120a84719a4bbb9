//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use crate::middleware::{RequestContext, TraceId};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use std::str::FromStr;
use std::sync::Arc;

const NIL: &str = "00000000-0000-0000-0000-000000000000";

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

async fn body_of(error: &Error) -> (StatusCode, ErrorBody) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("ErrorBody JSON deserialisation succeeds");
    (status, body)
}

#[rstest]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::insufficient_stock(1, 2), StatusCode::BAD_REQUEST)]
#[case(Error::validation(["bad"]), StatusCode::BAD_REQUEST)]
#[case(Error::service_unavailable("pool"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn validation_errors_carry_details_and_codes() {
    let error = Error::validation(["Title is required", "Price is required"]);

    let (status, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error_code, ErrorCode::ValidationError);
    assert_eq!(body.message, "Invalid input data");
    assert_eq!(body.details, ["Title is required", "Price is required"]);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("relation \"products\" does not exist").with_details(["secret"]);

    let (status, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error_code, ErrorCode::InternalServerError);
    assert_eq!(body.message, INTERNAL_MESSAGE);
    assert!(body.details.is_empty());
}

#[rstest]
#[actix_web::test]
async fn unavailable_errors_are_redacted() {
    let (status, body) = body_of(&Error::service_unavailable("connection refused")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body.message, UNAVAILABLE_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn path_comes_from_request_context() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let context = RequestContext::new(trace_id, "/api/v1/products/abc");
    let error = Error::not_found("Product not found with UUID: abc");

    let (_, body) = RequestContext::scope(context, body_of(&error)).await;

    assert_eq!(body.path, "/api/v1/products/abc");
    assert_eq!(body.message, "Product not found with UUID: abc");
}

#[rstest]
#[actix_web::test]
async fn timestamp_comes_from_request_clock() {
    let at = Utc
        .with_ymd_and_hms(2026, 7, 8, 9, 10, 11)
        .single()
        .expect("valid timestamp");
    let context = RequestContext::new(TraceId::from_str(NIL).expect("valid UUID"), "/info")
        .with_clock(Arc::new(FixedClock(at)));

    let (_, body) = RequestContext::scope(context, body_of(&Error::not_found("missing"))).await;

    assert_eq!(body.timestamp, "2026-07-08 09:10:11");
}

#[rstest]
#[actix_web::test]
async fn timestamp_uses_second_precision_format() {
    let (_, body) = body_of(&Error::not_found("missing")).await;

    NaiveDateTime::parse_from_str(&body.timestamp, TIMESTAMP_FORMAT)
        .expect("timestamp matches yyyy-MM-dd HH:mm:ss");
    assert_eq!(body.path, "");
}

#[rstest]
fn empty_details_are_omitted_from_json() {
    let body = ErrorBody::from_error(
        &Error::not_found("missing"),
        "/api/v1/products/x",
        Utc::now(),
    );

    let value = serde_json::to_value(&body).expect("serialise");

    assert!(value.get("details").is_none());
    assert_eq!(value["errorCode"], "PRODUCT_NOT_FOUND");
    assert_eq!(value["path"], "/api/v1/products/x");
}
