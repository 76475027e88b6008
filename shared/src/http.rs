//! HTTP helpers for the Lambda handler.

use lambda_http::{Body, Response};
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_SVG: &str = "image/svg+xml";
pub const CONTENT_TYPE_HTML: &str = "text/html";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Build a response with the given status, content type and optional cache header.
pub fn response(
    status: u16,
    content_type: &str,
    cache_control: Option<&str>,
    body: impl Into<Body>,
) -> Result<Response<Body>, lambda_http::Error> {
    let mut builder = Response::builder()
        .status(status)
        .header("content-type", content_type);
    if let Some(cache_control) = cache_control {
        builder = builder.header("cache-control", cache_control);
    }
    Ok(builder.body(body.into()).map_err(Box::new)?)
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
    cache_control: Option<&str>,
) -> Result<Response<Body>, lambda_http::Error> {
    response(status, CONTENT_TYPE_JSON, cache_control, serde_json::to_string(data)?)
}

/// Create an SVG image response.
pub fn svg_response(
    status: u16,
    svg: String,
    cache_control: Option<&str>,
) -> Result<Response<Body>, lambda_http::Error> {
    response(status, CONTENT_TYPE_SVG, cache_control, svg)
}

/// Create a plain-text response.
pub fn text_response(status: u16, text: &str) -> Result<Response<Body>, lambda_http::Error> {
    response(status, CONTENT_TYPE_TEXT, None, text.to_string())
}
