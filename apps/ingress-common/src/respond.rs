use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

pub const TEXT_XML: &str = "text/xml";

/// Wrap an XML document into a `200 OK` response with a `text/xml` content type.
pub fn xml_response(body: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_XML))],
        body.into(),
    )
        .into_response()
}

pub async fn healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}
