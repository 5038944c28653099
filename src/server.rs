use crate::graphql::{create_schema, GraphQLSchema};
use crate::media::MediaStore;
use crate::observability::metrics;
use crate::storage::Storage;
use axum::{
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "product-catalog",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GraphiQL IDE endpoint
async fn graphiql() -> impl IntoResponse {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Prometheus scrape endpoint
async fn metrics_endpoint() -> impl IntoResponse {
    match metrics::render() {
        Some(body) => (StatusCode::OK, body),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Create the HTTP server with all routes, including GraphQL and stored images
pub fn create_server(storage: Arc<dyn Storage>, media: MediaStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let media_root = media.root().to_path_buf();
    let schema = create_schema(storage, media);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        // Uploaded product images
        .nest_service("/media", ServeDir::new(media_root))
        // GraphQL endpoints
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .route("/graphiql", get(graphiql))
        .layer(Extension(schema))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(
    storage: Arc<dyn Storage>,
    media: MediaStore,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_server(storage, media);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server listening on {}", addr);
    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("🔎 GraphQL:      http://localhost:{port}/graphql");
    println!("🧪 GraphiQL UI:  http://localhost:{port}/graphiql");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    // The TempDir must outlive the router so served media stays on disk
    fn app() -> (Router, TempDir) {
        let dir = tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("media"), "/media/");
        (create_server(Arc::new(InMemoryStorage::new()), media), dir)
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        hyper::body::to_bytes(response.into_body())
            .await
            .unwrap()
            .to_vec()
    }

    fn graphql_post(query: &str) -> Request<Body> {
        let body = serde_json::json!({ "query": query }).to_string();
        Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_graphql_over_http() {
        let (app, _dir) = app();
        let request = graphql_post(
            r#"mutation { createProduct(name: "Widget", price: 9.99) { product { id name } } }"#,
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["data"]["createProduct"]["product"]["name"], "Widget");
        assert_eq!(json["data"]["createProduct"]["product"]["id"], "1");
    }

    #[tokio::test]
    async fn test_uploaded_image_is_served_and_counted() {
        metrics::init().unwrap();
        let (app, _dir) = app();

        // "hello image" in base64
        let response = app
            .clone()
            .oneshot(graphql_post(
                r#"mutation { createProduct(name: "Widget", price: 9.99, image: "data:image/png;base64,aGVsbG8gaW1hZ2U=") { product { imageUrl } } }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let image_url = json["data"]["createProduct"]["product"]["imageUrl"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(image_url.starts_with("/media/images/"));
        assert!(image_url.ends_with(".png"));

        let response = app
            .clone()
            .oneshot(Request::builder().uri(image_url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"hello image");

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(text.contains("catalog_products_created_total"));
        assert!(text.contains("catalog_images_stored_total"));
    }
}
