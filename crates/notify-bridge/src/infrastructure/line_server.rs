//! JSON-lines host transport.
//!
//! Reads one [`HostRequest`] per line, dispatches each on its own Tokio task,
//! and writes one [`HostResponse`] per line as results come in.
//!
//! # Task layout
//!
//! ```text
//!   reader loop ──spawn──► request task ─┐
//!        │      ──spawn──► request task ─┼──► mpsc ──► writer task ──► output
//!        │      ──spawn──► request task ─┘
//!        └─ bad line ───────────────────────┘
//! ```
//!
//! Only the writer task touches the output, so reply lines never interleave.
//! Replies are written in completion order; the host matches them to requests
//! by `id`.
//!
//! # Shutdown
//!
//! At end of input the reader stops accepting work, but [`serve`] only
//! returns once every request already read has been answered: the writer
//! task ends when the last request task drops its sender.  A read error ends
//! the loop the same way before it is returned.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Context;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use crate::application::{BridgeError, Dispatcher};
use crate::domain::{ErrorKind, ErrorReply, HostRequest, HostResponse, Reply};

/// Replies that may be queued ahead of the writer before request tasks wait.
const REPLY_QUEUE_CAPACITY: usize = 256;

/// Requests that may run at once.  The reader stops taking lines while all
/// permits are out, so a host that stops reading replies stalls its own input.
const MAX_IN_FLIGHT: usize = 1024;

/// Serves requests from `reader` until end of input.
///
/// Returns the number of request lines handled (blank lines are skipped).
/// A line that is not UTF-8 is answered like any other malformed line.
///
/// # Errors
///
/// Returns an error if reading from `reader` fails, or if writing a reply
/// fails.  Replies for requests already read are written first.
pub async fn serve<R, W>(reader: R, writer: W, dispatcher: Arc<Dispatcher>) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    serve_with_limit(reader, writer, dispatcher, MAX_IN_FLIGHT).await
}

async fn serve_with_limit<R, W>(
    mut reader: R,
    writer: W,
    dispatcher: Arc<Dispatcher>,
    max_in_flight: usize,
) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (reply_tx, reply_rx) = mpsc::channel::<HostResponse>(REPLY_QUEUE_CAPACITY);
    let writer_task = tokio::spawn(write_replies(writer, reply_rx));
    let permits = Arc::new(Semaphore::new(max_in_flight));

    let mut buf = Vec::new();
    let mut handled: u64 = 0;

    let read_outcome: anyhow::Result<()> = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(err) => break Err(anyhow::Error::new(err).context("failed to read request line")),
        }

        let decoded = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => decode_request(line),
            Err(err) => {
                warn!("request line is not valid UTF-8: {err}");
                Err(invalid_request(Value::Null))
            }
        };
        handled += 1;

        let (id, command) = match decoded {
            Ok(request) => request.into_command(),
            Err(response) => {
                if reply_tx.send(response).await.is_err() {
                    warn!("reply writer stopped; no longer reading requests");
                    break Ok(());
                }
                continue;
            }
        };

        let permit = match Arc::clone(&permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => break Err(anyhow::Error::new(err).context("request limiter closed")),
        };
        let dispatcher = Arc::clone(&dispatcher);
        let reply_tx = reply_tx.clone();
        tokio::spawn(async move {
            let name = command.name().to_string();
            // A panicking handler still owes the host a reply.
            let reply = match AssertUnwindSafe(dispatcher.dispatch(command))
                .catch_unwind()
                .await
            {
                Ok(reply) => reply,
                Err(_) => {
                    error!("command '{name}' panicked");
                    Reply::Error(ErrorReply {
                        error_kind: ErrorKind::OperationFailed,
                        message: format!("command '{name}' aborted"),
                    })
                }
            };
            if reply_tx.send(HostResponse::from_reply(id, reply)).await.is_err() {
                debug!("reply for '{name}' dropped: writer stopped");
            }
            drop(permit);
        });
    };

    info!("input closed after {handled} requests; waiting for pending replies");
    drop(reply_tx);
    let write_outcome = writer_task.await.context("reply writer task panicked")?;
    read_outcome?;
    write_outcome?;
    Ok(handled)
}

/// Parses one request line, or builds the error response for it.
///
/// A line that is valid JSON but not a valid request keeps its `id` when it
/// has one, so the host can still correlate the failure.
fn decode_request(line: &str) -> Result<HostRequest, HostResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            warn!("request line is not valid JSON: {err}");
            return Err(invalid_request(Value::Null));
        }
    };
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| {
        warn!("request line is not a valid request: {err}");
        invalid_request(id)
    })
}

fn invalid_request(id: Value) -> HostResponse {
    HostResponse::from_reply(
        id,
        Reply::Error(BridgeError::InvalidParameter("request".to_string()).to_reply()),
    )
}

async fn write_replies<W>(mut writer: W, mut replies: mpsc::Receiver<HostResponse>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = replies.recv().await {
        let mut line = serde_json::to_vec(&response).context("failed to encode reply")?;
        line.push(b'\n');
        writer
            .write_all(&line)
            .await
            .context("failed to write reply")?;
        writer.flush().await.context("failed to flush reply")?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ClientRegistry;
    use crate::domain::BridgeConfig;
    use crate::infrastructure::memory_sdk::{MemoryBackend, MemoryClientFactory};
    use serde_json::json;
    use crate::application::{Route, RouteTable, SessionCall};
    use crate::application::routes::HandlerFuture;
    use crate::application::test_support::{CallGate, RecordingClient, SharedClientFactory};
    use tokio::io::{duplex, BufReader, DuplexStream};

    fn dispatcher() -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(registry(), BridgeConfig::default()).unwrap())
    }

    fn registry() -> Arc<ClientRegistry> {
        let backend = Arc::new(MemoryBackend::new());
        Arc::new(ClientRegistry::new(Arc::new(MemoryClientFactory::new(backend))))
    }

    /// Feeds `input` through `serve` and returns the parsed reply lines.
    async fn run(input: impl AsRef<[u8]>) -> (u64, Vec<Value>) {
        run_with(dispatcher(), input).await
    }

    async fn run_with(dispatcher: Arc<Dispatcher>, input: impl AsRef<[u8]>) -> (u64, Vec<Value>) {
        let (mut host_in, bridge_in) = duplex(64 * 1024);
        let (bridge_out, host_out) = duplex(64 * 1024);

        let server = tokio::spawn(serve(BufReader::new(bridge_in), bridge_out, dispatcher));
        host_in.write_all(input.as_ref()).await.unwrap();
        drop(host_in);

        let replies = read_replies(host_out).await;
        let handled = server.await.unwrap().unwrap();
        (handled, replies)
    }

    async fn read_replies(output: DuplexStream) -> Vec<Value> {
        let mut replies = Vec::new();
        let mut lines = BufReader::new(output).lines();
        while let Some(line) = lines.next_line().await.unwrap() {
            replies.push(serde_json::from_str(&line).unwrap());
        }
        replies
    }

    fn by_id(replies: &[Value], id: i64) -> &Value {
        replies
            .iter()
            .find(|r| r["id"] == json!(id))
            .unwrap_or_else(|| panic!("no reply with id {id}"))
    }

    #[tokio::test]
    async fn test_one_reply_per_request_line() {
        // Arrange
        let input = concat!(
            r#"{"id":1,"command":"client.add","parameters":{"clientId":"u1","userId":"mike","jwt":"t"}}"#,
            "\n",
            r#"{"id":2,"command":"foo.bar","parameters":{}}"#,
            "\n",
            "\n",
            r#"{"id":3,"command":"client.remove","parameters":{"clientId":"u1"}}"#,
            "\n",
        );

        // Act
        let (handled, replies) = run(input).await;

        // Assert
        assert_eq!(handled, 3);
        assert_eq!(replies.len(), 3);
        assert_eq!(by_id(&replies, 2)["status"], "not_implemented");
        assert_eq!(by_id(&replies, 3)["value"], "u1");
    }

    #[tokio::test]
    async fn test_unknown_session_reply_shape() {
        let input = concat!(
            r#"{"id":9,"command":"inbox.get_unread_message_count","parameters":{"clientId":"u2"}}"#,
            "\n"
        );

        let (_, replies) = run(input).await;

        assert_eq!(
            replies[0],
            json!({
                "id": 9,
                "status": "error",
                "error": { "errorKind": "unknown_session", "message": "unknown session 'u2'" }
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_line_gets_invalid_request_reply() {
        let (handled, replies) = run("this is not json\n").await;

        assert_eq!(handled, 1);
        assert_eq!(replies[0]["id"], Value::Null);
        assert_eq!(replies[0]["status"], "error");
        assert_eq!(replies[0]["error"]["errorKind"], "invalid_parameter");
        assert_eq!(replies[0]["error"]["message"], "invalid parameter 'request'");
    }

    #[tokio::test]
    async fn test_request_without_command_keeps_its_id() {
        let (_, replies) = run("{\"id\":\"abc\",\"parameters\":{}}\n").await;

        assert_eq!(replies[0]["id"], "abc");
        assert_eq!(replies[0]["error"]["errorKind"], "invalid_parameter");
    }

    #[tokio::test]
    async fn test_empty_input_serves_nothing() {
        let (handled, replies) = run("").await;

        assert_eq!(handled, 0);
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_line_is_answered_and_serving_continues() {
        // Arrange: the middle line carries bytes that are not UTF-8
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"id\":1,\"command\":\"foo.bar\",\"parameters\":{}}\n");
        input.extend_from_slice(b"{\"id\":2,\"command\":\"\xff\xfe\"}\n");
        input.extend_from_slice(b"{\"id\":3,\"command\":\"foo.bar\",\"parameters\":{}}\n");

        // Act
        let (handled, replies) = run(input).await;

        // Assert
        assert_eq!(handled, 3);
        assert_eq!(replies.len(), 3);
        assert_eq!(by_id(&replies, 1)["status"], "not_implemented");
        assert_eq!(by_id(&replies, 3)["status"], "not_implemented");
        let rejected = replies.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(rejected["error"]["errorKind"], "invalid_parameter");
        assert_eq!(rejected["error"]["message"], "invalid parameter 'request'");
    }

    #[tokio::test]
    async fn test_read_error_still_flushes_pending_replies() {
        // Arrange: one good line, then the input fails
        let input = tokio_test::io::Builder::new()
            .read(b"{\"id\":1,\"command\":\"foo.bar\",\"parameters\":{}}\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "host went away"))
            .build();
        let (bridge_out, host_out) = duplex(64 * 1024);

        // Act
        let result = serve(BufReader::new(input), bridge_out, dispatcher()).await;
        let replies = read_replies(host_out).await;

        // Assert
        assert!(result.is_err());
        assert_eq!(replies, vec![json!({ "id": 1, "status": "not_implemented" })]);
    }

    fn explode(_call: SessionCall) -> HandlerFuture {
        Box::pin(async { panic!("handler blew up") })
    }

    #[tokio::test]
    async fn test_panicking_handler_gets_operation_failed_reply() {
        // Arrange: a session exists before any request is served
        let mut routes = RouteTable::empty();
        routes.register("client.add", Route::AddClient).unwrap();
        routes.register("test.explode", Route::Session(explode)).unwrap();
        let dispatcher = Arc::new(Dispatcher::with_routes(routes, registry(), BridgeConfig::default()));
        dispatcher
            .dispatch(crate::domain::Command::new(
                "client.add",
                json!({ "clientId": "u1", "userId": "mike", "jwt": "t" }),
            ))
            .await;
        let input = concat!(
            r#"{"id":1,"command":"client.add","parameters":{"clientId":"u2","userId":"ann","jwt":"t"}}"#,
            "\n",
            r#"{"id":2,"command":"test.explode","parameters":{"clientId":"u1"}}"#,
            "\n",
        );

        // Act
        let (handled, replies) = run_with(dispatcher, input).await;

        // Assert
        assert_eq!(handled, 2);
        assert_eq!(replies.len(), 2);
        assert_eq!(by_id(&replies, 1)["value"], "u2");
        assert_eq!(
            by_id(&replies, 2),
            &json!({
                "id": 2,
                "status": "error",
                "error": { "errorKind": "operation_failed", "message": "command 'test.explode' aborted" }
            })
        );
    }

    #[tokio::test]
    async fn test_reader_waits_while_requests_are_at_the_limit() {
        // Arrange: every unread-count call parks until released
        let gate = Arc::new(CallGate::default());
        let factory = Arc::new(SharedClientFactory::new(RecordingClient {
            unread_count: 4,
            gate: Some(Arc::clone(&gate)),
            ..RecordingClient::default()
        }));
        let registry = Arc::new(ClientRegistry::new(factory.clone()));
        let dispatcher = Arc::new(Dispatcher::new(registry, BridgeConfig::default()).unwrap());
        dispatcher
            .dispatch(crate::domain::Command::new(
                "client.add",
                json!({ "clientId": "u1", "userId": "mike", "jwt": "t" }),
            ))
            .await;
        let (mut host_in, bridge_in) = duplex(64 * 1024);
        let (bridge_out, host_out) = duplex(64 * 1024);
        let server = tokio::spawn(serve_with_limit(BufReader::new(bridge_in), bridge_out, dispatcher, 1));

        // Act: two requests with room for one
        host_in
            .write_all(
                concat!(
                    r#"{"id":1,"command":"inbox.get_unread_message_count","parameters":{"clientId":"u1"}}"#,
                    "\n",
                    r#"{"id":2,"command":"inbox.get_unread_message_count","parameters":{"clientId":"u1"}}"#,
                    "\n",
                )
                .as_bytes(),
            )
            .await
            .unwrap();
        gate.entered.notified().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let while_parked = factory.client.recorded().len();
        gate.release.notify_one();
        gate.entered.notified().await;
        gate.release.notify_one();
        drop(host_in);
        let replies = read_replies(host_out).await;

        // Assert
        assert_eq!(while_parked, 1);
        assert_eq!(server.await.unwrap().unwrap(), 2);
        assert_eq!(by_id(&replies, 1)["value"], 4);
        assert_eq!(by_id(&replies, 2)["value"], 4);
    }

    #[test]
    fn test_decode_request_accepts_missing_id() {
        let request = decode_request(r#"{"command":"inbox.read_all_messages"}"#).unwrap();
        assert_eq!(request.id, Value::Null);
        assert_eq!(request.command, "inbox.read_all_messages");
    }
}
