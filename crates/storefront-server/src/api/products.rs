use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use serde::Serialize;
use storefront_catalog::CatalogError;
use storefront_core::seo::{apply_meta_defaults, product_meta, MetaTag};
use storefront_core::{Product, SelectedOption, Variant};
use storefront_variants::{
    page_redirect, History, Location, MemoryHistory, PageView, ProductView, RedirectPolicy,
    SelectionState,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Status a page server answers with when it follows a [`RedirectData`].
const REDIRECT_STATUS: u16 = 302;

/// Either a resolved product page or an instruction to load another address.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(super) enum ProductPageResponse {
    Page(Box<ProductPageData>),
    Redirect(RedirectData),
}

/// Everything a product page needs after one resolution pass.
#[derive(Debug, Serialize)]
pub(super) struct ProductPageData {
    product: Product,
    selected_variant: Variant,
    /// Declared options the request's query string named, before resolution.
    selection: Vec<SelectedOption>,
    sync: SyncData,
    product_view: ProductView,
    seo: Vec<MetaTag>,
}

/// What the client should do with its address bar.
#[derive(Debug, Serialize)]
pub(super) struct SyncData {
    outcome: &'static str,
    /// The page address after synchronization. When `outcome` is
    /// `"rewritten"` the client replaces its current history entry with it.
    location: String,
}

/// The requested page is served under another address.
#[derive(Debug, Serialize)]
pub(super) struct RedirectData {
    /// `"localized_handle"` or `"combined_listing"`.
    reason: &'static str,
    location: String,
    status: u16,
}

fn map_catalog_error(request_id: String, handle: &str, error: &CatalogError) -> ApiError {
    if error.is_not_found() {
        tracing::debug!(handle, error = %error, "product not found");
        return ApiError::new(request_id, "not_found", format!("product '{handle}' not found"));
    }
    tracing::error!(handle, error = %error, "catalog lookup failed");
    ApiError::new(request_id, "upstream_error", "catalog lookup failed")
}

/// `href` prefixed with the configured public base URL, or with the
/// request's host when none is configured. Relative when neither is known.
fn absolute_page_url(base_url: Option<&str>, headers: &HeaderMap, href: &str) -> String {
    if let Some(base) = base_url {
        return format!("{base}{href}");
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty() && !h.contains(['/', '\\', ' ', '@']));
    let Some(host) = host else {
        return href.to_string();
    };
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|p| matches!(*p, "http" | "https"))
        .unwrap_or("http");
    format!("{scheme}://{host}{href}")
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<ProductPageResponse>>, ApiError> {
    let product = state
        .catalog
        .product_by_handle(&handle)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &handle, &e))?;

    let settings = &state.settings;
    let requested = Location {
        path: format!("/products/{handle}"),
        search: query.unwrap_or_default(),
    };
    let policy = RedirectPolicy {
        combined_listing_tag: &settings.combined_listing_tag,
        redirect_combined_listings: settings.combined_listing_redirect,
        tie_break: settings.tie_break,
    };
    if let Some(redirect) = page_redirect(&requested, &product, &policy) {
        tracing::debug!(
            requested = %handle,
            handle = %product.handle,
            reason = redirect.label(),
            href = %redirect.location(),
            "product page redirected"
        );
        return Ok(Json(ApiResponse {
            data: ProductPageResponse::Redirect(RedirectData {
                reason: redirect.label(),
                location: redirect.location().href(),
                status: REDIRECT_STATUS,
            }),
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let selection = SelectionState::from_query(&requested.search, &product)
        .pairs()
        .to_vec();

    let (page, outcome) = PageView::open(
        &product,
        MemoryHistory::new(&requested.href()),
        settings.tie_break,
        &settings.combined_listing_tag,
    )
    .map_err(|e| {
        tracing::warn!(handle = %product.handle, error = %e, "product has nothing to display");
        ApiError::new(req_id.0.clone(), "not_found", format!("product '{handle}' not found"))
    })?;

    let selected_variant = page.resolved().clone();
    let location = page.into_history().location().href();
    tracing::debug!(
        handle = %product.handle,
        variant_id = %selected_variant.id,
        outcome = outcome.label(),
        "resolved product page"
    );

    let page_url = absolute_page_url(settings.public_base_url.as_deref(), &headers, &location);
    let seo = apply_meta_defaults(
        product_meta(&product, &selected_variant, &page_url),
        &settings.seo,
    );
    let product_view = ProductView::from_resolved(&product, &selected_variant);

    Ok(Json(ApiResponse {
        data: ProductPageResponse::Page(Box::new(ProductPageData {
            product,
            selected_variant,
            selection,
            sync: SyncData {
                outcome: outcome.label(),
                location,
            },
            product_view,
            seo,
        })),
        meta: ResponseMeta::new(req_id.0),
    }))
}
