use std::sync::Arc;

use notmobil_api::{app_router, AppConfig, AppState};

pub const EMAIL: &str = "test@test.com";
pub const PASSWORD: &str = "123456";

/// Serve the API on an ephemeral port and return its `/api` base URL.
pub async fn spawn_api() -> String {
    let config = AppConfig::from_lookup(|name| match name {
        "NOTMOBIL_JWT_SECRET" => Some("integration-test-signing-secret".to_string()),
        _ => None,
    })
    .unwrap();
    let router = app_router(AppState::from_config(Arc::new(config)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}
