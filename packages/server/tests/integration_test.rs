//! Integration tests for the message board server.
//!
//! Each test runs the real router in-process on an ephemeral port and talks
//! to it with `reqwest` (HTTP) and `tokio-tungstenite` (WebSocket).

use std::{net::SocketAddr, sync::Arc, time::Duration};

use dengon_server::{
    infrastructure::{
        message_pusher::{ConnectionRegistry, WebSocketMessagePusher},
        repository::InMemoryMessageRepository,
    },
    ui::{ConnectionSettings, Server, ServerConfig, UseCases},
};
use dengon_shared::time::{SystemClock, get_timestamp, rfc3339_to_timestamp};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message, protocol::frame::coding::CloseCode},
};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for a frame that should arrive
const RECV_TIMEOUT: Duration = Duration::from_secs(2);
/// How long to watch for a frame that should not arrive
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    http: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ConnectionSettings::default(), None).await
    }

    async fn start_with(settings: ConnectionSettings, max_connections: Option<usize>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let repository = Arc::new(InMemoryMessageRepository::new());
        let registry = Arc::new(ConnectionRegistry::with_capacity_limit(max_connections));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(registry));
        let usecases = UseCases::new(repository, message_pusher, Arc::new(SystemClock));
        let config = ServerConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            connection: settings,
        };
        let server = Server::new(config, usecases);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        TestServer {
            addr,
            http: reqwest::Client::new(),
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    async fn connect(&self) -> WsClient {
        let (ws, _response) = connect_async(self.ws_url()).await.unwrap();
        ws
    }

    async fn connection_count(&self) -> u64 {
        let body: Value = self
            .http
            .get(self.url("/debug/connections"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["connections"].as_u64().unwrap()
    }

    /// Wait until the registry holds exactly `expected` connections
    async fn wait_for_connections(&self, expected: u64) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let count = self.connection_count().await;
            if count == expected {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {} connections, still {}",
                expected,
                count
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    async fn create(&self, content: &str, sender_name: &str) -> reqwest::Response {
        self.http
            .post(self.url("/messages"))
            .json(&json!({ "content": content, "senderName": sender_name }))
            .send()
            .await
            .unwrap()
    }

    async fn list(&self) -> Vec<Value> {
        self.http
            .get(self.url("/messages"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .unwrap();
    }
}

/// Next text frame, skipping keep-alive frames
async fn next_text(ws: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

/// Assert that no text frame arrives within the silence window
async fn assert_no_text(ws: &mut WsClient) {
    let deadline = tokio::time::Instant::now() + SILENCE_WINDOW;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
            Ok(other) => panic!("expected no frame, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_two_clients_receive_created_event() {
    // テスト項目: 2 つのクライアントが同じ Created フレームを一回ずつ受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client_a = server.connect().await;
    let mut client_b = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    let response = server.create("hi", "ann").await;

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let created: Value = response.json().await.unwrap();
    let frame_a = next_text(&mut client_a).await;
    let frame_b = next_text(&mut client_b).await;
    assert_eq!(frame_a, frame_b);
    assert_eq!(frame_a["type"], "Created");
    assert_eq!(frame_a["message"], created);
    assert_eq!(frame_a["message"]["content"], "hi");
    assert_eq!(frame_a["message"]["senderName"], "ann");
    assert_no_text(&mut client_a).await;
    assert_no_text(&mut client_b).await;

    server.stop().await;
}

#[tokio::test]
async fn test_closed_client_is_removed_and_post_still_succeeds() {
    // テスト項目: 切断したクライアントは Registry から外れ、その後の POST はエラーにならない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client_a = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    client_a.close(None).await.unwrap();
    server.wait_for_connections(0).await;
    let response = server.create("after close", "ann").await;

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    assert_eq!(server.connection_count().await, 0);
    assert_eq!(server.list().await.len(), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_dropped_tcp_connection_is_removed() {
    // テスト項目: close フレームなしで TCP が切れた接続も Registry から外れる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    drop(client);

    // then (期待する結果):
    server.wait_for_connections(0).await;
    assert_eq!(server.create("hi", "ann").await.status(), 200);

    server.stop().await;
}

#[tokio::test]
async fn test_edit_unknown_message_returns_not_found_without_broadcast() {
    // テスト項目: 存在しない ID の PUT は 404 となり、どのクライアントにもフレームが届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;
    let unknown = uuid_like();

    // when (操作):
    let response = server
        .http
        .put(server.url(&format!("/messages/{}", unknown)))
        .json(&json!({ "content": "edited" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Message not found");
    assert_no_text(&mut client).await;

    server.stop().await;
}

#[tokio::test]
async fn test_delete_unknown_message_returns_not_found() {
    // テスト項目: 存在しない ID の DELETE は 404 となり、ブロードキャストされない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    let response = server
        .http
        .delete(server.url(&format!("/messages/{}", uuid_like())))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 404);
    assert_no_text(&mut client).await;

    server.stop().await;
}

#[tokio::test]
async fn test_message_crud_flow() {
    // テスト項目: 作成・一覧・取得・編集・削除が一貫して動作する
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作): 作成
    let created: Value = server.create("hi", "ann").await.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // then (期待する結果): 一覧と単体取得に同じ内容で現れる
    let listed = server.list().await;
    assert_eq!(listed, vec![created.clone()]);
    let fetched: Value = server
        .http
        .get(server.url(&format!("/messages/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);

    // when (操作): 編集
    let edited: Value = server
        .http
        .put(server.url(&format!("/messages/{}", id)))
        .json(&json!({ "content": "hello" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果): 本文のみが変わる
    assert_eq!(edited["content"], "hello");
    assert_eq!(edited["id"], created["id"]);
    assert_eq!(edited["senderName"], created["senderName"]);
    assert_eq!(edited["timestamp"], created["timestamp"]);

    // when (操作): 削除
    let response = server
        .http
        .delete(server.url(&format!("/messages/{}", id)))
        .send()
        .await
        .unwrap();

    // then (期待する結果): 削除されたレコードが返り、一覧から消える
    assert_eq!(response.status(), 200);
    let deleted: Value = response.json().await.unwrap();
    assert_eq!(deleted, edited);
    assert!(server.list().await.is_empty());
    let again = server
        .http
        .get(server.url(&format!("/messages/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_events_arrive_in_mutation_order() {
    // テスト項目: Created → Edited → Deleted の順にフレームが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    let created: Value = server.create("v1", "ann").await.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    server
        .http
        .put(server.url(&format!("/messages/{}", id)))
        .json(&json!({ "content": "v2" }))
        .send()
        .await
        .unwrap();
    server
        .http
        .delete(server.url(&format!("/messages/{}", id)))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    let first = next_text(&mut client).await;
    let second = next_text(&mut client).await;
    let third = next_text(&mut client).await;
    assert_eq!(first["type"], "Created");
    assert_eq!(first["message"]["content"], "v1");
    assert_eq!(second["type"], "Edited");
    assert_eq!(second["message"]["content"], "v2");
    assert_eq!(third["type"], "Deleted");
    assert_eq!(third["message"]["id"], created["id"]);

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_edits_arrive_in_commit_order() {
    // テスト項目: 並行する編集でも、最後に届く Edited フレームが保存済みの最終状態と一致する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;
    let created: Value = server.create("v0", "ann").await.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(next_text(&mut client).await["type"], "Created");

    // when (操作):
    let edits = (1..=20).map(|i| {
        let request = server
            .http
            .put(server.url(&format!("/messages/{}", id)))
            .json(&json!({ "content": format!("v{}", i) }));
        async move { request.send().await.unwrap().status() }
    });
    let statuses = futures_util::future::join_all(edits).await;

    // then (期待する結果):
    assert!(statuses.iter().all(|status| *status == 200));
    let mut last_frame = Value::Null;
    for _ in 0..20 {
        last_frame = next_text(&mut client).await;
        assert_eq!(last_frame["type"], "Edited");
    }
    let stored: Value = server
        .http
        .get(server.url(&format!("/messages/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(last_frame["message"], stored);

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_message_id_is_rejected() {
    // テスト項目: UUID として不正な ID は 400 となり、エラーメッセージが JSON で返る
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = server
        .http
        .get(server.url("/messages/not-a-uuid"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid message id: 'not-a-uuid'");

    server.stop().await;
}

#[tokio::test]
async fn test_inbound_frames_are_ignored() {
    // テスト項目: クライアントから送ったフレームは無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    client
        .send(Message::Text("hello server".into()))
        .await
        .unwrap();
    client
        .send(Message::Binary(vec![1, 2, 3].into()))
        .await
        .unwrap();
    server.create("hi", "ann").await;

    // then (期待する結果):
    let frame = next_text(&mut client).await;
    assert_eq!(frame["type"], "Created");
    assert_eq!(server.connection_count().await, 1);

    server.stop().await;
}

#[tokio::test]
async fn test_non_upgrade_request_to_ws_is_rejected() {
    // テスト項目: アップグレードを伴わない /ws へのリクエストはクライアントエラーになる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = server.http.get(server.url("/ws")).send().await.unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    assert_eq!(server.connection_count().await, 0);

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_content_is_rejected_without_broadcast() {
    // テスト項目: 空の本文は 400 となり、保存もブロードキャストもされない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    let response = server.create("   ", "ann").await;

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    assert!(server.list().await.is_empty());
    assert_no_text(&mut client).await;

    server.stop().await;
}

#[tokio::test]
async fn test_client_supplied_timestamp_is_ignored() {
    // テスト項目: クライアント指定のタイムスタンプは無視され、サーバーが付与する
    // given (前提条件):
    let server = TestServer::start().await;
    let before = get_timestamp();

    // when (操作):
    let created: Value = server
        .http
        .post(server.url("/messages"))
        .json(&json!({
            "content": "hi",
            "senderName": "ann",
            "timestamp": "2000-01-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    let assigned = rfc3339_to_timestamp(created["timestamp"].as_str().unwrap()).unwrap();
    assert!(assigned >= before);
    assert!(assigned <= get_timestamp());

    server.stop().await;
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    // テスト項目: 任意のオリジンからのアクセスが許可される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = server
        .http
        .get(server.url("/messages"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string()),
        Some("*".to_string())
    );

    server.stop().await;
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = server
        .http
        .get(server.url("/health-check"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({ "status": "ok" }));

    server.stop().await;
}

#[tokio::test]
async fn test_connection_limit_rejects_extra_upgrade() {
    // テスト項目: 接続数の上限を超えたアップグレードは 503 で拒否される
    // given (前提条件):
    let server = TestServer::start_with(ConnectionSettings::default(), Some(1)).await;
    let _first = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    let result = connect_async(server.ws_url()).await;

    // then (期待する結果):
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 503),
        other => panic!("expected 503 rejection, got {:?}", other.map(|_| ())),
    }
    assert_eq!(server.connection_count().await, 1);

    server.stop().await;
}

#[tokio::test]
async fn test_silent_client_is_dropped_after_keep_alive_window() {
    // テスト項目: ping に応答しないクライアントは無通信タイムアウトで切断される
    // given (前提条件): ping 間隔 1 秒（タイムアウト 2 秒）
    let settings = ConnectionSettings {
        ping_interval: Duration::from_secs(1),
        outbound_buffer: 8,
    };
    let server = TestServer::start_with(settings, None).await;
    // ストリームを読まないクライアントは pong を返さない
    let _silent = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    tokio::time::sleep(Duration::from_millis(2500)).await;

    // then (期待する結果):
    server.wait_for_connections(0).await;

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_open_connections() {
    // テスト項目: サーバー停止時に接続中のクライアントへ close フレームが送られる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    server.stop().await;

    // then (期待する結果):
    let msg = tokio::time::timeout(RECV_TIMEOUT, client.next())
        .await
        .expect("timed out waiting for close frame");
    match msg {
        Some(Ok(Message::Close(Some(frame)))) => assert_eq!(frame.code, CloseCode::Away),
        other => panic!("expected close frame, got {:?}", other),
    }
}

/// A syntactically valid id that was never assigned
fn uuid_like() -> String {
    "00000000-0000-4000-8000-000000000000".to_string()
}
