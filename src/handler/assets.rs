//! Asset file serving module
//!
//! Resolves `{folder}/{file}` under an asset root, loads the file and
//! builds the response with `ETag` and Range support.

use crate::assets::{self, AssetError, FetchKind};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::Path;
use tokio::fs;

/// Serve one asset from `root`
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    root: &Path,
    folder: &str,
    file: &str,
    kind: FetchKind,
) -> Response<Full<Bytes>> {
    match load_asset(root, folder, file, kind).await {
        Ok((content, content_type)) => build_asset_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            ctx.range_header.as_deref(),
        ),
        Err(e) => error_response(ctx.path, &e),
    }
}

/// Decode the raw URL segments, resolve them inside `root` and read the file
pub async fn load_asset(
    root: &Path,
    folder: &str,
    file: &str,
    kind: FetchKind,
) -> Result<(Bytes, &'static str), AssetError> {
    let folder = assets::decode_segment(folder)?;
    let filename = kind.target_name(&assets::decode_segment(file)?);

    let path = assets::resolve(root, &folder, &filename).await?;
    let content = fs::read(&path)
        .await
        .map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;

    // Type follows the requested name, not a symlink target
    Ok((
        Bytes::from(content),
        mime::content_type_for(Path::new(&filename)),
    ))
}

fn error_response(request_path: &str, error: &AssetError) -> Response<Full<Bytes>> {
    match error {
        AssetError::NotFound(_) => {}
        AssetError::BadRequest(_) | AssetError::Forbidden(_) => {
            logger::log_warning(&format!("Rejected asset request {request_path}: {error}"));
        }
        AssetError::RootUnavailable { .. } | AssetError::Io { .. } => {
            logger::log_error(&format!("Asset request {request_path} failed: {error}"));
        }
    }
    let status =
        StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    http::build_status_response(status)
}

/// Build asset response honoring `If-None-Match` and `Range`
fn build_asset_file_response(
    data: Bytes,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);
    let total_size = data.len();

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let body = data.slice(range.start..=range.end);
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                range,
                total_size,
                is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            http::response::build_asset_response(data, content_type, &etag, is_head)
        }
    }
}
