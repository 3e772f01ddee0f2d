use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use wordtowallet_backend::{BackendClient, sources_from_config};
use wordtowallet_core::config::{SiteConfig, load_site_config};
use wordtowallet_core::{RouteManifest, SlugSource};
use wordtowallet_routes::resolve_manifest;

use super::build::{build_robots, build_sitemap};
use crate::proxy;

#[derive(Clone)]
struct AppState {
    config: Arc<SiteConfig>,
    manifest: Arc<RouteManifest>,
    sources: Arc<Vec<Box<dyn SlugSource>>>,
}

/// Serve the file proxy alongside live sitemap.xml and robots.txt.
///
/// The route manifest is resolved once at startup; slug sources are
/// fetched again on every sitemap request.
pub async fn run(config_path: PathBuf, host: String, port: u16) -> Result<()> {
    println!("🚀 Starting site server...");
    println!("   Config: {}", config_path.display());

    let config = load_site_config(&config_path).context("Failed to load site config")?;
    let manifest = resolve_manifest(&config.routes).context("Failed to load route manifest")?;
    let sources = sources_from_config(&config)?;
    let backend = BackendClient::new(&config.api)?;

    println!("   ✓ Site: {}", config.site_url);
    println!("   ✓ Backend: {}", backend.base_url());
    println!(
        "   ✓ Routes: {} static, {} dynamic",
        manifest.static_routes().len(),
        manifest.dynamic_routes().len()
    );
    for mount in &config.proxy {
        println!("   ✓ Proxy: {} → {}", mount.prefix, backend.url(&mount.upstream));
    }

    let state = AppState {
        config: Arc::new(config),
        manifest: Arc::new(manifest),
        sources: Arc::new(sources),
    };
    let app = app(state, &backend);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🌐 Listening on http://{}", addr);
    println!("   Press Ctrl+C to stop\n");
    tracing::info!(addr = %addr, "server started");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn app(state: AppState, backend: &BackendClient) -> Router {
    let proxy_routes = proxy::router(backend, &state.config.proxy);

    Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .with_state(state)
        .merge(proxy_routes)
        .layer(TraceLayer::new_for_http())
}

async fn sitemap_handler(State(state): State<AppState>) -> Response {
    let (xml, count) =
        build_sitemap(&state.config, &state.manifest, &state.sources, Utc::now()).await;
    tracing::debug!(urls = count, "rendered sitemap");

    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

async fn robots_handler(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        build_robots(&state.config),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use wordtowallet_core::RouteTemplate;
    use wordtowallet_core::config::parse_site_config_with_env;

    fn test_app() -> Router {
        let toml = r#"
[site]
url = "https://wordtowallet.com"
locales = ["en", "ar"]

[api]
base_url = "http://127.0.0.1:9/api"

[robots]
protected = ["dashboard"]
"#;
        let config = parse_site_config_with_env(toml, |_| None).unwrap();
        let backend = BackendClient::new(&config.api).unwrap();
        let manifest: RouteManifest = [
            RouteTemplate::static_route(""),
            RouteTemplate::static_route("/pricing"),
        ]
        .into_iter()
        .collect();

        let state = AppState {
            config: Arc::new(config),
            manifest: Arc::new(manifest),
            sources: Arc::new(Vec::new()),
        };
        app(state, &backend)
    }

    async fn get_text(app: Router, uri: &str) -> (StatusCode, String, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_sitemap_route() {
        let (status, content_type, body) = get_text(test_app(), "/sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/xml");
        assert_eq!(body.matches("<url>").count(), 4);
        assert!(body.contains("<loc>https://wordtowallet.com/ar/pricing</loc>"));
    }

    #[tokio::test]
    async fn test_robots_route() {
        let (status, content_type, body) = get_text(test_app(), "/robots.txt").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("Disallow: /*/dashboard/*"));
        assert!(body.ends_with("Sitemap: https://wordtowallet.com/sitemap.xml\n"));
    }

    #[tokio::test]
    async fn test_proxy_routes_are_mounted() {
        let (status, _, body) = get_text(test_app(), "/api/files/books/1.epub").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (status, _, _) = get_text(test_app(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
