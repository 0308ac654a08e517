use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "ui"]
struct Asset;

const INDEX_PAGE: &str = "index.html";
const LOGIN_PAGE: &str = "login.html";

fn embedded(path: &str) -> Response {
    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                Body::from(content.data),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// GET / (session required)
pub async fn index() -> Response {
    embedded(INDEX_PAGE)
}

/// GET /login
pub async fn login_page() -> Response {
    embedded(LOGIN_PAGE)
}

/// Static files. The studio page is only reachable through [`index`].
pub async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() || path == INDEX_PAGE {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    embedded(path)
}
