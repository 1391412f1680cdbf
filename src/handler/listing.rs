//! Catalog listing handlers
//!
//! `GET /getEquirectangular` and `GET /getModels`.

use crate::catalog::CatalogCache;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve the memoized catalog of one collection as JSON
pub async fn serve_catalog(ctx: &RequestContext<'_>, cache: &CatalogCache) -> Response<Full<Bytes>> {
    match cache.get().await {
        Ok(catalog) => http::build_json_response(&*catalog, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to build {} catalog: {e}",
                cache.rule().name()
            ));
            http::build_500_response()
        }
    }
}
