//! Demo chat service.

mod handlers;
mod models;

use axum::routing::get;
use axum::Router;

// @title Socket Demo API
// @version 0.3.0
// @description WebSocket endpoints of the demo service
// @contact.name Platform Team
// @contact.email platform@example.com
// @license.name MIT

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/ws/chat", get(handlers::chat_socket))
        .route("/ws/ping", get(handlers::ping_socket))
        .route("/ws/company", get(handlers::company_socket));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
