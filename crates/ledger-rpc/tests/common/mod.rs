//! Scripted JSON-RPC peer served by axum.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub type Seen = Arc<Mutex<Vec<Value>>>;

#[derive(Clone)]
struct Script {
    replies: Arc<Mutex<VecDeque<Value>>>,
    seen: Seen,
}

/// Answers each request with the next scripted reply. A reply is a JSON
/// object holding either `result` or `error`; the envelope is filled in.
async fn answer(State(script): State<Script>, Json(request): Json<Value>) -> Json<Value> {
    let mut reply = script
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| json!({ "result": null }));
    reply["jsonrpc"] = json!("2.0");
    reply["id"] = request["id"].clone();
    script.seen.lock().unwrap().push(request);
    Json(reply)
}

/// Start a peer on an ephemeral port. Returns its URL and the request
/// bodies it has received so far.
pub async fn scripted_peer(replies: Vec<Value>) -> (String, Seen) {
    let script = Script {
        replies: Arc::new(Mutex::new(replies.into())),
        seen: Seen::default(),
    };
    let seen = script.seen.clone();

    let app = Router::new().route("/", post(answer)).with_state(script);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, seen)
}
