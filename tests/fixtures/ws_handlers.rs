use crate::models::{CompanyAdded, ReqAddCompany};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;

// @WebSocket ChatSocket
// @Group Messaging
// @URL ws://localhost:8080/ws/chat
// @Description Channel where users exchange chat messages
// @Tags chat, public
// @ConnectionParam name query string required User name

// @Message sendMessage
// @Direction send
// @Description Send a chat message
// @Payload
// {
//   "text": "Hello"
// }
// @Example
// {
//   "text": "Hello"
// }
// @Error unauthorized User is not authorized
// @Error invalid_format Malformed message

// @Message messageReceived
// @Direction receive
// @Description Message pushed by the server
// @Payload
//
//	{
//	  "user": "Ali",
//	  "text": "Hello"
//	}
//
// @Example
//
//	{
//	  "user": "Ali",
//	  "text": "Hello"
//	}
pub async fn chat_socket(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(handle_chat)
}

async fn handle_chat(mut socket: WebSocket) {
    // echo until the client goes away
    while let Some(Ok(msg)) = socket.recv().await {
        if socket.send(msg).await.is_err() {
            break;
        }
    }
}

// @WebSocket PingPongSocket
// @URL /ws/ping
// @Description Ping-pong test endpoint
// @Tags test, pingpong
//
// @Message ping
// @Send
// @Payload {"type": "ping", "payload": "hello"}
// @Message pong
// @Receive
// @Payload {"type": "pong", "payload": "hello"}
// @Deprecated
pub async fn ping_socket(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|mut socket| async move {
        let _ = socket.send(Message::Text("pong".into())).await;
    })
}

// @WebSocket CompanySocket
// @Group Company
// @URL ws://localhost:8080/ws/company
// @Tags company, admin
// @ConnectionParam token header string optional Bearer token
// @ConnectionParam tenant path string required
// @Message addCompany
// @Send
// @Description Add a company
// @Payload ReqAddCompany
// @Example
// {
//   "name": "Acme Inc",
//   "status": 1
// }
// @Message companyAdded
// @Receive
// @Description Company was added
// @Payload models::CompanyAdded
// @Message audit
// @Receive
// @Payload AuditEntry
pub async fn company_socket(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|_socket| async move {
        let _request: Option<ReqAddCompany> = None;
        let _reply: Option<CompanyAdded> = None;
    })
}
