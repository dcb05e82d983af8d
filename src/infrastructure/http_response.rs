// HTTP response utilities with optional Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
};
use tokio::io::AsyncReadExt;

pub const HTML: &str = "text/html; charset=utf-8";
pub const JAVASCRIPT: &str = "application/javascript; charset=utf-8";
pub const JSON: &str = "application/json";

/// `(coding, q)` pairs of every `Accept-Encoding` header; a missing `q` is 1.
fn accepted_codings(headers: &HeaderMap) -> Vec<(String, f32)> {
    headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| {
            let mut parts = token.split(';').map(str::trim);
            let coding = parts.next().filter(|c| !c.is_empty())?;
            let quality = parts
                .filter_map(|p| p.strip_prefix("q=").or_else(|| p.strip_prefix("Q=")))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((coding.to_ascii_lowercase(), quality))
        })
        .collect()
}

/// Whether the client accepts Brotli. An explicit `br` entry decides;
/// otherwise a `*` entry does. A `q` of 0 means "not acceptable".
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    let codings = accepted_codings(headers);
    let quality = |name: &str| codings.iter().find(|(c, _)| c == name).map(|(_, q)| *q);

    quality("br")
        .or_else(|| quality("*"))
        .map(|q| q > 0.0)
        .unwrap_or(false)
}

/// Build a 200 response of `content_type`, Brotli-compressed when `compress` is set
pub async fn body_response(
    body: String,
    content_type: &'static str,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let raw = body.into_bytes();

    let (body_bytes, content_encoding) = if compress {
        let raw_len = raw.len();
        let mut encoder = BrotliEncoder::new(std::io::Cursor::new(raw));
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!("Compressed: {} -> {} bytes", raw_len, compressed.len());
        (compressed, Some("br"))
    } else {
        (raw, None)
    };

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()))
        .header(header::VARY, "accept-encoding");

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder
        .body(Body::from(body_bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
