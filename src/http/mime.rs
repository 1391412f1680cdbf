//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.
//! Extensions are matched case-insensitively since panoramas ship as `.JPG`.

use std::path::Path;

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use asset_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("JPG")), "image/jpeg");
/// assert_eq!(get_content_type(Some("glb")), "model/gltf-binary");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return "application/octet-stream";
    };

    match ext.to_ascii_lowercase().as_str() {
        // Images and textures
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "ktx2" => "image/ktx2",

        // 3D models and materials
        "glb" => "model/gltf-binary",
        "gltf" => "model/gltf+json",
        "obj" => "model/obj",
        "mtl" => "model/mtl",
        "bin" => "application/octet-stream",

        // Text
        "json" => "application/json",
        "txt" | "md" => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

/// Content-Type for a path, from its extension
pub fn content_type_for(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}
