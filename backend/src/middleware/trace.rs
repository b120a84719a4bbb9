//! Tracing middleware attaching a request-scoped context.
//!
//! Each incoming request receives a UUID `trace_id` and has its path recorded
//! in task-local storage, for correlation across logs and so error responses
//! can report the path that failed. The context also carries the clock used
//! to timestamp those responses.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`RequestContext::scope`] when spawning new tasks or moving work onto
//! blocking threads to ensure the active context propagates correctly.

use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use chrono::{DateTime, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use mockable::{Clock, DefaultClock};
use tokio::task_local;
use tracing::{error, info};
use uuid::Uuid;

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use product_service::middleware::trace::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(%id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(pub(crate) Uuid);

impl TraceId {
    #[rustfmt::skip]
    fn generate() -> Self { Self(Uuid::new_v4()) }

    /// Returns the current trace identifier if a request is in scope.
    pub fn current() -> Option<Self> {
        REQUEST_CONTEXT.try_with(|ctx| ctx.trace_id).ok()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Trace identifier, request path and clock of the request being served.
///
/// Equality compares the trace identifier and path only.
#[derive(Clone)]
pub struct RequestContext {
    trace_id: TraceId,
    path: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("trace_id", &self.trace_id)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl PartialEq for RequestContext {
    fn eq(&self, other: &Self) -> bool {
        self.trace_id == other.trace_id && self.path == other.path
    }
}

impl Eq for RequestContext {}

impl RequestContext {
    /// Pair a trace identifier with the request path, reading the system clock.
    pub fn new(trace_id: TraceId, path: impl Into<String>) -> Self {
        Self {
            trace_id,
            path: path.into(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the clock used for [`RequestContext::now`].
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current UTC time according to the request's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Trace identifier assigned to the request.
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Request path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a copy of the context in scope, if any.
    pub fn current() -> Option<Self> {
        REQUEST_CONTEXT.try_with(Clone::clone).ok()
    }

    /// Execute the provided future with `context` in scope.
    ///
    /// # Examples
    /// ```
    /// use product_service::middleware::trace::{RequestContext, TraceId};
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let context = RequestContext::new(trace_id, "/api/v1/products");
    /// let observed = RequestContext::scope(context.clone(), async { RequestContext::current() }).await;
    /// assert_eq!(observed, Some(context));
    /// # });
    /// ```
    pub async fn scope<Fut>(context: RequestContext, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_CONTEXT.scope(context, fut).await
    }
}

/// Tracing middleware attaching a [`RequestContext`], logging each request
/// and adding a `trace-id` header to every response.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use product_service::Trace;
///
/// let app = App::new().wrap(Trace::default());
/// ```
#[derive(Clone)]
pub struct Trace {
    clock: Arc<dyn Clock>,
}

impl Default for Trace {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Trace {
    /// Build the middleware with the clock handed to each request context.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service,
            clock: Arc::clone(&self.clock),
        }))
    }
}

/// Service wrapper produced by [`Trace`].
///
/// Applications should not use this type directly.
pub struct TraceMiddleware<S> {
    service: S,
    clock: Arc<dyn Clock>,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let context =
            RequestContext::new(trace_id, path.clone()).with_clock(Arc::clone(&self.clock));
        let started = Instant::now();
        // The inner service must be called inside the scope: handlers and
        // extractors render their error responses while it is polled.
        let fut = REQUEST_CONTEXT.sync_scope(context.clone(), || self.service.call(req));
        Box::pin(RequestContext::scope(context, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(
                        %error,
                        trace_id = %trace_id,
                        "failed to encode trace identifier header"
                    );
                }
            }
            info!(
                trace_id = %trace_id,
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                latency_ms = started.elapsed().as_millis(),
                "request completed"
            );
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::{Local, TimeZone};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[tokio::test]
    async fn trace_id_generate_produces_uuid() {
        let trace_id = TraceId::generate();
        let parsed = Uuid::parse_str(&trace_id.to_string()).expect("valid UUID");
        assert_eq!(parsed.to_string(), trace_id.to_string());
    }

    #[tokio::test]
    async fn context_current_reflects_scope() {
        let expected = RequestContext::new(TraceId::generate(), "/health/live");
        let observed =
            RequestContext::scope(expected.clone(), async move { RequestContext::current() })
                .await;
        assert_eq!(observed, Some(expected));
    }

    #[actix_web::test]
    async fn context_reports_time_from_the_middleware_clock() {
        let at = Utc
            .with_ymd_and_hms(2026, 4, 5, 6, 7, 8)
            .single()
            .expect("valid timestamp");
        let app = test::init_service(
            App::new()
                .wrap(Trace::with_clock(Arc::new(FixedClock(at))))
                .route(
                    "/",
                    web::get().to(|| async move {
                        let ctx = RequestContext::current().expect("context in scope");
                        HttpResponse::Ok().body(ctx.now().to_rfc3339())
                    }),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body = test::read_body(res).await;

        assert_eq!(body, at.to_rfc3339().as_bytes());
    }

    #[tokio::test]
    async fn context_is_none_out_of_scope() {
        assert!(RequestContext::current().is_none());
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn trace_id_from_str_round_trips() {
        let uuid = Uuid::nil();
        let trace_id: TraceId = uuid.to_string().parse().expect("parse uuid");
        assert_eq!(trace_id.to_string(), uuid.to_string());
    }

    #[actix_web::test]
    async fn adds_trace_id_header() {
        let app = test::init_service(
            App::new()
                .wrap(Trace::default())
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[actix_web::test]
    async fn exposes_context_in_handler() {
        let app = test::init_service(App::new().wrap(Trace::default()).route(
            "/api/v1/products",
            web::get().to(|| async move {
                let ctx = RequestContext::current().expect("context in scope");
                HttpResponse::Ok().body(format!("{} {}", ctx.trace_id(), ctx.path()))
            }),
        ))
        .await;
        let req = test::TestRequest::get()
            .uri("/api/v1/products?page=1")
            .to_request();
        let res = test::call_service(&app, req).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();

        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert_eq!(body, format!("{trace_id} /api/v1/products"));
    }
}
