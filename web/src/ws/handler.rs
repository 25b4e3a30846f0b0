use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::stream::BoxStream;
use futures::{future, Sink, SinkExt, Stream, StreamExt};
use log::*;
use realtime::connection::{ChannelTransport, Outbound};
use realtime::Session;
use serde::Deserialize;
use service::AppState;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Deserialize)]
pub(crate) struct WsParams {
    token: Option<String>,
}

/// Upgrades to a WebSocket carrying real-time events for one user.
///
/// The credential may be given as the `token` query parameter. Without it the
/// first frame must be `{"event": "auth", "data": {"token": ...}}`.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Query(params): Query<WsParams>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(app_state, params.token, socket))
}

async fn handle_socket(app_state: AppState, token: Option<String>, socket: WebSocket) {
    let (sink, stream) = socket.split();
    let (transport, outbound) = ChannelTransport::new();

    let writer = tokio::spawn(write_outbound(sink, outbound));

    let connection = Session::run(
        app_state.hub.lifecycle(),
        Arc::new(transport),
        token,
        inbound_text(stream),
    )
    .await;
    debug!("WebSocket session {} finished", connection.id());

    // Dropping the connection releases the last sender, which ends the writer.
    drop(connection);
    if let Err(e) = writer.await {
        warn!("WebSocket writer task failed: {e}");
    }
}

/// Text frames of the socket until the client closes it or the read fails.
fn inbound_text<S>(stream: S) -> BoxStream<'static, String>
where
    S: Stream<Item = Result<WsMessage, axum::Error>> + Send + 'static,
{
    stream
        .take_while(|frame| {
            future::ready(matches!(frame, Ok(message) if !matches!(message, WsMessage::Close(_))))
        })
        .filter_map(|frame| {
            future::ready(match frame {
                Ok(WsMessage::Text(text)) => Some(text),
                _ => None,
            })
        })
        .boxed()
}

/// Write pushed events as JSON text frames until told to close or the socket fails.
async fn write_outbound<K>(mut sink: K, mut outbound: UnboundedReceiver<Outbound>)
where
    K: Sink<WsMessage> + Unpin,
    K::Error: std::fmt::Display,
{
    while let Some(item) = outbound.recv().await {
        match item {
            Outbound::Event(event) => match serde_json::to_string(&event) {
                Ok(text) => {
                    if let Err(e) = sink.send(WsMessage::Text(text)).await {
                        debug!("WebSocket write failed: {e}");
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize event: {e}"),
            },
            Outbound::Close => {
                let _ = sink.send(WsMessage::Close(None)).await;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use futures::stream;
    use realtime::message::Event;
    use realtime::connection::Transport;

    fn read_error() -> axum::Error {
        axum::Error::new(std::io::Error::other("connection reset"))
    }

    #[tokio::test]
    async fn only_text_frames_are_passed_on() {
        let frames = stream::iter(vec![
            Ok(WsMessage::Text("first".to_string())),
            Ok(WsMessage::Binary(vec![1, 2, 3])),
            Ok(WsMessage::Ping(vec![])),
            Ok(WsMessage::Text("second".to_string())),
        ]);

        let texts: Vec<String> = inbound_text(frames).collect().await;

        assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn reading_stops_at_a_close_frame() {
        let frames = stream::iter(vec![
            Ok(WsMessage::Text("before".to_string())),
            Ok(WsMessage::Close(None)),
            Ok(WsMessage::Text("after".to_string())),
        ]);

        let texts: Vec<String> = inbound_text(frames).collect().await;

        assert_eq!(texts, vec!["before".to_string()]);
    }

    #[tokio::test]
    async fn reading_stops_at_a_read_error() {
        let frames = stream::iter(vec![
            Err(read_error()),
            Ok(WsMessage::Text("after".to_string())),
        ]);

        let texts: Vec<String> = inbound_text(frames).collect().await;

        assert!(texts.is_empty());
    }

    #[tokio::test]
    async fn events_are_written_as_json_then_the_socket_is_closed() {
        let (sink, written) = mpsc::unbounded::<WsMessage>();
        let (transport, outbound) = ChannelTransport::new();
        transport.send(&Event::connected()).unwrap();
        transport.close();
        transport
            .send(&Event::UserTyping {
                sender_id: "late".to_string(),
            })
            .unwrap();

        write_outbound(sink, outbound).await;

        let frames: Vec<WsMessage> = written.collect().await;
        assert_eq!(frames.len(), 2);
        match &frames[0] {
            WsMessage::Text(text) => assert_eq!(
                serde_json::from_str::<serde_json::Value>(text).unwrap(),
                serde_json::json!({"event": "connected", "data": {"status": "success"}})
            ),
            other => panic!("expected a text frame, got {other:?}"),
        }
        assert!(matches!(frames[1], WsMessage::Close(None)));
    }

    #[tokio::test]
    async fn the_writer_ends_when_every_sender_is_gone() {
        let (sink, written) = mpsc::unbounded::<WsMessage>();
        let (transport, outbound) = ChannelTransport::new();
        drop(transport);

        write_outbound(sink, outbound).await;

        assert!(written.collect::<Vec<_>>().await.is_empty());
    }
}
