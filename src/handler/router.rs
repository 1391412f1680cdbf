//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, dispatching and access logging.

use crate::assets::FetchKind;
use crate::catalog::FilterRule;
use crate::handler::{assets, listing};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::state::AppState;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Endpoints exposed by the server
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET /`
    Index,
    Health,
    /// `GET /getEquirectangular` or `GET /getModels`
    Catalog(FilterRule),
    /// `GET /getEquirectangularImage|getModel|getMTL/{folder}/{file}`
    Asset {
        collection: FilterRule,
        kind: FetchKind,
        folder: &'a str,
        file: &'a str,
    },
    NotFound,
}

/// Map a request path onto a [`Route`]. Segments stay percent-encoded.
pub fn match_route<'a>(path: &'a str, health: &crate::config::HealthConfig) -> Route<'a> {
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return Route::Health;
    }

    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();
    match segments[..] {
        [""] => Route::Index,
        ["getEquirectangular"] => Route::Catalog(FilterRule::Panorama),
        ["getModels"] => Route::Catalog(FilterRule::Model),
        [endpoint, folder, file] => {
            let (collection, kind) = match endpoint {
                "getEquirectangularImage" => (FilterRule::Panorama, FetchKind::Verbatim),
                "getModel" => (FilterRule::Model, FetchKind::Verbatim),
                "getMTL" => (FilterRule::Model, FetchKind::Material),
                _ => return Route::NotFound,
            };
            Route::Asset {
                collection,
                kind,
                folder,
                file,
            }
        }
        _ => Route::NotFound,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut response = dispatch(&req, &state).await;
    http::apply_common_headers(&mut response, &state.config.http);

    if state.config.logging.access_log {
        log_access(&req, &response, peer_addr, started, &state);
    }
    Ok(response)
}

async fn dispatch(req: &Request<hyper::body::Incoming>, state: &AppState) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 4. Extract headers for caching and range requests
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *req.method() == Method::HEAD,
        if_none_match: header("if-none-match"),
        range_header: header("range"),
    };

    route_request(&ctx, state).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let size_str = req.headers().get("content-length")?.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Route request to the matching endpoint handler
pub async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match match_route(ctx.path, &state.config.routes.health) {
        Route::Index => http::build_text_response(&state.config.assets.greeting, ctx.is_head),
        Route::Health => http::build_health_response("ok"),
        Route::Catalog(rule) => listing::serve_catalog(ctx, state.catalog(rule)).await,
        Route::Asset {
            collection,
            kind,
            folder,
            file,
        } => {
            let root = state.catalog(collection).root();
            assets::serve_asset(ctx, root, folder, file, kind).await
        }
        Route::NotFound => http::build_404_response(),
    }
}

fn log_access(
    req: &Request<hyper::body::Incoming>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), req.method().to_string(), uri);

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::write_file;
    use crate::config::tests::test_config;
    use crate::config::HealthConfig;
    use crate::http::response::tests::body_bytes;
    use hyper::StatusCode;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    #[test]
    fn test_match_route() {
        let health = HealthConfig::default();
        assert_eq!(match_route("/", &health), Route::Index);
        assert_eq!(match_route("/healthz", &health), Route::Health);
        assert_eq!(
            match_route("/getEquirectangular", &health),
            Route::Catalog(FilterRule::Panorama)
        );
        assert_eq!(
            match_route("/getModels", &health),
            Route::Catalog(FilterRule::Model)
        );
        assert_eq!(
            match_route("/getMTL/C/statue.glb", &health),
            Route::Asset {
                collection: FilterRule::Model,
                kind: FetchKind::Material,
                folder: "C",
                file: "statue.glb",
            }
        );
        assert_eq!(
            match_route("/getEquirectangularImage/A/a.JPG", &health),
            Route::Asset {
                collection: FilterRule::Panorama,
                kind: FetchKind::Verbatim,
                folder: "A",
                file: "a.JPG",
            }
        );
        assert_eq!(match_route("/getModel/C", &health), Route::NotFound);
        assert_eq!(match_route("/getModel/C/x/y.glb", &health), Route::NotFound);
        assert_eq!(match_route("/getModels/", &health), Route::NotFound);
        assert_eq!(match_route("/other/C/x", &health), Route::NotFound);

        let disabled = HealthConfig {
            enabled: false,
            ..HealthConfig::default()
        };
        assert_eq!(match_route("/healthz", &disabled), Route::NotFound);
    }

    #[test]
    fn test_check_http_method() {
        assert!(check_http_method(&Method::GET, true).is_none());
        assert!(check_http_method(&Method::HEAD, true).is_none());
        let options = check_http_method(&Method::OPTIONS, true).expect("preflight");
        assert_eq!(options.status(), StatusCode::NO_CONTENT);
        let post = check_http_method(&Method::POST, true).expect("rejected");
        assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_index_greeting() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(&test_config(tmp.path()));

        let response = route_request(&ctx("/"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, "Hello, World!");
    }

    #[tokio::test]
    async fn test_panorama_listing_endpoint() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("Equiretangular");
        write_file(&root, "A", "a.JPG", 3);
        write_file(&root, "A", "b.PNG", 3);
        write_file(&root, "B", "readme.txt", 3);
        let state = AppState::new(&test_config(tmp.path()));

        let response = route_request(&ctx("/getEquirectangular"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(
            body_bytes(response).await,
            r#"{"folders":[{"label":"A","files":["a.JPG"]}]}"#
        );
    }

    #[tokio::test]
    async fn test_model_listing_endpoint() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("Modelos");
        write_file(&root, "C", "m.glb", 1_048_576);
        write_file(&root, "C", "m_uncompressed.glb", 2_048);
        let state = AppState::new(&test_config(tmp.path()));

        let response = route_request(&ctx("/getModels"), &state).await;
        assert_eq!(
            body_bytes(response).await,
            r#"{"folders":[{"label":"C","files":[{"file":"m.glb","size":1.0}]}]}"#
        );
    }

    #[tokio::test]
    async fn test_listing_missing_root_is_500() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(&test_config(tmp.path()));

        let response = route_request(&ctx("/getModels"), &state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.models.cached().is_none());
    }

    #[tokio::test]
    async fn test_mtl_endpoint_swaps_extension() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("Modelos");
        write_file(&root, "C", "statue.glb", 8);
        std::fs::write(root.join("C/statue.mtl"), b"newmtl stone").expect("write mtl");
        let state = AppState::new(&test_config(tmp.path()));

        let response = route_request(&ctx("/getMTL/C/statue.glb"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "model/mtl");
        assert_eq!(body_bytes(response).await, "newmtl stone");
    }

    #[tokio::test]
    async fn test_asset_endpoints_not_found_and_forbidden() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_file(&tmp.path().join("Modelos"), "C", "m.glb", 8);
        write_file(&tmp.path().join("Equiretangular"), "A", "a.JPG", 8);
        let state = AppState::new(&test_config(tmp.path()));

        let missing = route_request(&ctx("/getModel/C/none.glb"), &state).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let missing = route_request(&ctx("/getEquirectangularImage/A/b.JPG"), &state).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        // `..` reaches the sibling panorama root, outside the model root
        let escape = route_request(&ctx("/getModel/%2E%2E/Equiretangular"), &state).await;
        assert_eq!(escape.status(), StatusCode::FORBIDDEN);
        let bad = route_request(&ctx("/getModel/C/a%2Fb.glb"), &state).await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(&test_config(tmp.path()));
        let response = route_request(&ctx("/favicon.ico"), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
