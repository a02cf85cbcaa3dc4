// tests/common/mod.rs — In-process mock backend for integration tests

use axum::Router;

/// Serve a router on an ephemeral loopback port and return its origin.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock backend");
    });
    format!("http://{addr}")
}
