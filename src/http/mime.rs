//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.
//! Shader sources get a dedicated override: browsers fetch them with
//! XHR and hand the text to the GL compiler, so they must arrive as
//! `text/plain` rather than an unrecognized binary type.

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```ignore
/// assert_eq!(get_content_type(Some("frag")), "text/plain");
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Shader sources (checked before everything else)
        Some("frag" | "vert" | "glsl" | "wgsl") => "text/plain",

        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Textures/media used by demo assets
        Some("ktx2") => "image/ktx2",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_sources_are_plain_text() {
        // Exactly text/plain, no charset parameter
        assert_eq!(get_content_type(Some("frag")), "text/plain");
        assert_eq!(get_content_type(Some("vert")), "text/plain");
        assert_eq!(get_content_type(Some("glsl")), "text/plain");
        assert_eq!(get_content_type(Some("wgsl")), "text/plain");
    }

    #[test]
    fn common_types() {
        assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css");
        assert_eq!(get_content_type(Some("js")), "application/javascript");
        assert_eq!(get_content_type(Some("json")), "application/json");
        assert_eq!(get_content_type(Some("wasm")), "application/wasm");
        assert_eq!(get_content_type(Some("png")), "image/png");
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }
}
