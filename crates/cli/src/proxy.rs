//! File proxy: relays GET/HEAD requests for files and media to the backend.
//!
//! `Authorization` and `Range` go upstream unchanged. A fixed set of response
//! headers and the body bytes come back. Any non-2xx from the backend becomes
//! a plain 404, any transport failure a plain 500.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use wordtowallet_backend::BackendClient;
use wordtowallet_core::config::ProxyMount;

/// Request headers forwarded to the backend
fn forwarded_headers() -> [HeaderName; 2] {
    [header::AUTHORIZATION, header::RANGE]
}

/// Response headers relayed back to the caller
fn relayed_headers() -> [HeaderName; 5] {
    [
        header::CONTENT_TYPE,
        header::CONTENT_LENGTH,
        header::CONTENT_RANGE,
        header::CACHE_CONTROL,
        header::ACCEPT_RANGES,
    ]
}

/// Handler context for one mount
#[derive(Clone)]
struct ProxyRoute {
    client: reqwest::Client,
    /// Absolute backend URL the wildcard path is appended to
    upstream: String,
}

/// Router with one `{prefix}/{*path}` relay per mount
pub fn router(backend: &BackendClient, mounts: &[ProxyMount]) -> Router {
    mounts.iter().fold(Router::new(), |app, mount| {
        let route = ProxyRoute {
            client: backend.http().clone(),
            upstream: backend.url(&mount.upstream).trim_end_matches('/').to_string(),
        };
        let relay_routes = Router::new()
            .route("/{*path}", get(relay).head(relay))
            .with_state(route);
        app.nest(&mount.prefix, relay_routes)
    })
}

async fn relay(
    State(route): State<ProxyRoute>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    // The nested URI has the mount prefix stripped and is still percent-encoded
    let mut url = format!("{}/{}", route.upstream, uri.path().trim_start_matches('/'));
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }

    let mut request = route.client.request(method.clone(), &url);
    for name in forwarded_headers() {
        if let Some(value) = headers.get(&name) {
            request = request.header(name.clone(), value.clone());
        }
    }

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(url = %url, error = %e, "file proxy request failed");
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "backend refused file request");
        return plain(StatusCode::NOT_FOUND, "File not found");
    }

    let mut relayed = HeaderMap::new();
    for name in relayed_headers() {
        if let Some(value) = upstream.headers().get(&name) {
            relayed.insert(name.clone(), value.clone());
        }
    }
    relayed
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static("application/octet-stream"));
    relayed
        .entry(header::ACCEPT_RANGES)
        .or_insert(HeaderValue::from_static("bytes"));

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from_stream(upstream.bytes_stream())
    };

    (status, relayed, body).into_response()
}

fn plain(status: StatusCode, message: &'static str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::Request};
    use std::time::Duration;
    use tower::ServiceExt;
    use wordtowallet_core::config::ApiConfig;

    const EPUB_LEN: usize = 4096;

    async fn book(headers: HeaderMap) -> Response {
        if headers.get(header::AUTHORIZATION).is_none() {
            return (StatusCode::UNAUTHORIZED, "{\"error\":\"unauthorized\"}").into_response();
        }

        let bytes = vec![7u8; EPUB_LEN];
        if let Some(range) = headers.get(header::RANGE) {
            assert_eq!(range, "bytes=0-99");
            return (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, "application/epub+zip"),
                    (header::CONTENT_RANGE, "bytes 0-99/4096"),
                    (header::ACCEPT_RANGES, "bytes"),
                ],
                bytes[..100].to_vec(),
            )
                .into_response();
        }

        (
            [
                (header::CONTENT_TYPE, "application/epub+zip"),
                (header::CACHE_CONTROL, "private, max-age=3600"),
                (header::SET_COOKIE, "session=secret"),
            ],
            bytes,
        )
            .into_response()
    }

    async fn echo_query(uri: Uri) -> String {
        uri.query().unwrap_or_default().to_string()
    }

    async fn echo_uri(uri: Uri) -> String {
        format!("{} {}", uri.path(), uri.query().unwrap_or("-"))
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/files/books/{id}", get(book))
            .route("/media/echo", get(echo_query))
            .route("/files/raw/{name}", get(echo_uri))
            .route(
                "/files/missing",
                get(|| async { (StatusCode::NOT_FOUND, "{\"detail\":\"no such file\"}") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn proxy_for(base: &str) -> Router {
        let backend = BackendClient::new(&ApiConfig {
            base_url: base.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        router(
            &backend,
            &[
                ProxyMount {
                    prefix: "/api/files".to_string(),
                    upstream: "/files".to_string(),
                },
                ProxyMount {
                    prefix: "/api/media".to_string(),
                    upstream: "/media".to_string(),
                },
            ],
        )
    }

    fn get_request(uri: &str, headers: &[(HeaderName, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_get_relays_status_headers_and_bytes() {
        let proxy = proxy_for(&spawn_backend().await);
        let response = proxy
            .oneshot(get_request(
                "/api/files/books/42",
                &[(header::AUTHORIZATION, "Bearer token")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/epub+zip");
        assert_eq!(response.headers()[header::ACCEPT_RANGES], "bytes");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "private, max-age=3600");
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.len(), EPUB_LEN);
    }

    #[tokio::test]
    async fn test_range_request_relays_partial_content() {
        let proxy = proxy_for(&spawn_backend().await);
        let response = proxy
            .oneshot(get_request(
                "/api/files/books/42",
                &[
                    (header::AUTHORIZATION, "Bearer token"),
                    (header::RANGE, "bytes=0-99"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 0-99/4096");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.len(), 100);
    }

    #[tokio::test]
    async fn test_head_relays_headers_without_body() {
        let proxy = proxy_for(&spawn_backend().await);
        let request = Request::builder()
            .method(Method::HEAD)
            .uri("/api/files/books/42")
            .header(header::AUTHORIZATION, "Bearer token")
            .body(Body::empty())
            .unwrap();

        let response = proxy.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/epub+zip");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], EPUB_LEN.to_string().as_str());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_backend_404_becomes_plain_404() {
        let proxy = proxy_for(&spawn_backend().await);
        let response = proxy
            .oneshot(get_request("/api/files/missing", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"File not found");
    }

    #[tokio::test]
    async fn test_backend_401_becomes_plain_404() {
        let proxy = proxy_for(&spawn_backend().await);
        let response = proxy
            .oneshot(get_request("/api/files/books/42", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"File not found");
    }

    #[tokio::test]
    async fn test_query_string_is_forwarded() {
        let proxy = proxy_for(&spawn_backend().await);
        let response = proxy
            .oneshot(get_request("/api/media/echo?w=320&format=webp", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"w=320&format=webp");
    }

    #[tokio::test]
    async fn test_unreachable_backend_becomes_plain_500() {
        let proxy = proxy_for("http://127.0.0.1:9");
        let response = proxy
            .oneshot(get_request("/api/files/books/42", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }

    #[tokio::test]
    async fn test_encoded_file_name_stays_in_path() {
        let proxy = proxy_for(&spawn_backend().await);

        let response = proxy
            .clone()
            .oneshot(get_request("/api/files/raw/report%3Fv%3D2.pdf", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"/files/raw/report%3Fv%3D2.pdf -");

        let response = proxy
            .oneshot(get_request("/api/files/raw/a%2Fb%23c%20d.epub?dl=1", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"/files/raw/a%2Fb%23c%20d.epub dl=1");
    }
}
