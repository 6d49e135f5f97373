mod products;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_catalog::Catalog;
use storefront_core::seo::MetaDefaults;
use storefront_core::{AppConfig, TieBreak};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub settings: Arc<PageSettings>,
}

/// Per-process settings applied to every product page view.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub tie_break: TieBreak,
    pub combined_listing_tag: String,
    pub combined_listing_redirect: bool,
    pub public_base_url: Option<String>,
    pub seo: MetaDefaults,
}

impl PageSettings {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            tie_break: config.tie_break,
            combined_listing_tag: config.combined_listing_tag.clone(),
            combined_listing_redirect: config.combined_listing_redirect,
            public_base_url: config.public_base_url.clone(),
            seo: MetaDefaults {
                title: config.seo_default_title.clone(),
                description: config.seo_default_description.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

fn product_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/products/{handle}", get(products::get_product))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(product_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use storefront_core::parse_catalog;
    use tower::ServiceExt;

    const CATALOG: &str = r"
products:
  - id: gid://shopify/Product/1
    handle: tulip-lamp
    title: Tulip Lamp
    description: Hand-rolled glass shade.
    vendor: Entropy Bright
    options:
      - { name: Color, values: [Red, Blue] }
    variants:
      - id: gid://shopify/ProductVariant/11
        title: Red
        price: { amount: '289.00', currency_code: USD }
        selected_options: [{ name: Color, value: Red }]
      - id: gid://shopify/ProductVariant/12
        title: Blue
        price: { amount: '299.00', currency_code: USD }
        selected_options: [{ name: Color, value: Blue }]
  - id: gid://shopify/Product/2
    handle: lamp-bundle
    title: Weaverse Lamp Bundle
    tags: [combined]
    options:
      - { name: Color, values: [Red, Blue] }
    variants:
      - id: b1
        title: Red
        product_handle: tulip-lamp
        selected_options: [{ name: Color, value: Red }]
      - id: b2
        title: Blue
        product_handle: tulip-lamp
        selected_options: [{ name: Color, value: Blue }]
";

    fn test_settings() -> PageSettings {
        PageSettings {
            tie_break: TieBreak::DeclarationOrder,
            combined_listing_tag: "combined".to_string(),
            combined_listing_redirect: false,
            public_base_url: None,
            seo: MetaDefaults {
                title: "Lamp House".to_string(),
                description: "Handmade lighting.".to_string(),
            },
        }
    }

    fn app_with(settings: PageSettings) -> Router {
        let catalog = parse_catalog(CATALOG).expect("valid test catalog");
        let state = AppState {
            catalog: Arc::new(Catalog::File(catalog)),
            settings: Arc::new(settings),
        };
        build_app(
            state,
            RateLimitState::new(120, Duration::from_secs(60)),
        )
    }

    fn test_app() -> Router {
        app_with(test_settings())
    }

    async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
        send_json(test_app(), request).await
    }

    #[test]
    fn api_error_upstream_error_maps_to_bad_gateway() {
        let response = ApiError::new("req-1", "upstream_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "mystery", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, json) = get_json("/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn fresh_visit_resolves_default_and_asks_for_rewrite() {
        let (status, json) = get_json("/api/v1/products/tulip-lamp").await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["kind"], "page");
        assert_eq!(data["selected_variant"]["id"], "gid://shopify/ProductVariant/11");
        assert_eq!(data["selection"], serde_json::json!([]));
        assert_eq!(data["sync"]["outcome"], "rewritten");
        assert_eq!(data["sync"]["location"], "/products/tulip-lamp?Color=Red");
    }

    #[tokio::test]
    async fn matching_query_is_already_synchronized() {
        let (_, json) = get_json("/api/v1/products/tulip-lamp?Color=Blue").await;
        let data = &json["data"];
        assert_eq!(data["selected_variant"]["title"], "Blue");
        assert_eq!(
            data["selection"],
            serde_json::json!([{ "name": "Color", "value": "Blue" }])
        );
        assert_eq!(data["sync"]["outcome"], "already_synchronized");
        assert_eq!(data["sync"]["location"], "/products/tulip-lamp?Color=Blue");
    }

    #[tokio::test]
    async fn unknown_value_falls_back_and_keeps_unrelated_params() {
        let (_, json) = get_json("/api/v1/products/tulip-lamp?Color=Green&utm_source=mail").await;
        let data = &json["data"];
        assert_eq!(data["selected_variant"]["title"], "Red");
        assert_eq!(data["sync"]["outcome"], "rewritten");
        assert_eq!(
            data["sync"]["location"],
            "/products/tulip-lamp?Color=Red&utm_source=mail"
        );
    }

    #[tokio::test]
    async fn product_view_and_seo_describe_resolved_variant() {
        let (_, json) = get_json("/api/v1/products/tulip-lamp?Color=Blue").await;
        let data = &json["data"];
        assert_eq!(
            data["product_view"],
            serde_json::json!({
                "products": [{
                    "id": "gid://shopify/Product/1",
                    "title": "Tulip Lamp",
                    "price": "299.00",
                    "vendor": "Entropy Bright",
                    "variantId": "gid://shopify/ProductVariant/12",
                    "variantTitle": "Blue",
                    "quantity": 1
                }]
            })
        );
        let seo = data["seo"].as_array().expect("seo array");
        assert!(seo.contains(&serde_json::json!({ "kind": "title", "title": "Tulip Lamp" })));
        assert!(seo.contains(&serde_json::json!({
            "kind": "link",
            "rel": "canonical",
            "href": "/products/tulip-lamp"
        })));
        assert!(seo.contains(&serde_json::json!({
            "kind": "property",
            "property": "product:price:amount",
            "content": "299.00"
        })));
    }

    #[tokio::test]
    async fn combined_listing_is_never_rewritten() {
        let (status, json) = get_json("/api/v1/products/lamp-bundle").await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["selected_variant"]["id"], "b1");
        assert_eq!(data["sync"]["outcome"], "suppressed");
        assert_eq!(data["sync"]["location"], "/products/lamp-bundle");
    }

    #[tokio::test]
    async fn placeholder_product_title_gets_store_default() {
        let (_, json) = get_json("/api/v1/products/lamp-bundle").await;
        let seo = json["data"]["seo"].as_array().expect("seo array");
        assert!(seo.contains(&serde_json::json!({ "kind": "title", "title": "Lamp House" })));
        assert!(seo.contains(&serde_json::json!({
            "kind": "name",
            "name": "description",
            "content": "Handmade lighting."
        })));
    }

    #[tokio::test]
    async fn unknown_handle_is_not_found() {
        let (status, json) = get_json("/api/v1/products/peony-lamp").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn malformed_handle_is_not_found() {
        let (status, json) = get_json("/api/v1/products/Tulip%20Lamp").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn differently_cased_handle_redirects_to_product_handle() {
        let (status, json) = get_json("/api/v1/products/Tulip-Lamp?Color=Blue").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["data"],
            serde_json::json!({
                "kind": "redirect",
                "reason": "localized_handle",
                "location": "/products/tulip-lamp?Color=Blue",
                "status": 302
            })
        );
    }

    #[tokio::test]
    async fn combined_listing_redirects_to_first_variant_when_enabled() {
        let settings = PageSettings {
            combined_listing_redirect: true,
            ..test_settings()
        };
        let request = Request::builder()
            .uri("/api/v1/products/lamp-bundle?Color=Blue")
            .body(Body::empty())
            .expect("request");

        let (status, json) = send_json(app_with(settings), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["kind"], "redirect");
        assert_eq!(json["data"]["reason"], "combined_listing");
        assert_eq!(json["data"]["location"], "/products/tulip-lamp?Color=Blue");
    }

    #[tokio::test]
    async fn canonical_url_is_absolute_for_request_host() {
        let request = Request::builder()
            .uri("/api/v1/products/tulip-lamp?Color=Blue")
            .header("host", "lamps.example.com")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .expect("request");

        let (_, json) = send_json(test_app(), request).await;

        let seo = json["data"]["seo"].as_array().expect("seo array");
        assert!(seo.contains(&serde_json::json!({
            "kind": "link",
            "rel": "canonical",
            "href": "https://lamps.example.com/products/tulip-lamp"
        })));
        assert!(seo.contains(&serde_json::json!({
            "kind": "property",
            "property": "og:url",
            "content": "https://lamps.example.com/products/tulip-lamp"
        })));
        assert_eq!(json["data"]["sync"]["location"], "/products/tulip-lamp?Color=Blue");
    }

    #[tokio::test]
    async fn configured_base_url_builds_canonical_url() {
        let settings = PageSettings {
            public_base_url: Some("https://shop.example.com".to_string()),
            ..test_settings()
        };
        let request = Request::builder()
            .uri("/api/v1/products/tulip-lamp")
            .header("host", "10.0.0.5:3000")
            .body(Body::empty())
            .expect("request");

        let (_, json) = send_json(app_with(settings), request).await;

        let seo = json["data"]["seo"].as_array().expect("seo array");
        assert!(seo.contains(&serde_json::json!({
            "kind": "link",
            "rel": "canonical",
            "href": "https://shop.example.com/products/tulip-lamp"
        })));
    }

    #[tokio::test]
    async fn request_id_header_flows_into_meta() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products/tulip-lamp")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-42")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["meta"]["request_id"], "req-42");
    }
}
