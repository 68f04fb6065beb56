//! Native transport: tokio-tungstenite client feeding the pose channel
//!
//! Each connection attempt runs as its own task and reports what happens on
//! the socket through an unbounded channel. The frame loop drains that
//! channel with `pump`, which is also where due reconnects get started.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::TransportEvent;
use crate::arcade::Arcade;

pub struct NativeTransport {
    tx: mpsc::UnboundedSender<TransportEvent>,
    rx: mpsc::UnboundedReceiver<TransportEvent>,
    task: Option<JoinHandle<()>>,
}

impl NativeTransport {
    /// Open the first connection. Must be called inside a tokio runtime.
    pub fn start(arcade: &mut Arcade) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut transport = Self { tx, rx, task: None };
        let url = arcade.channel_mut().begin_connect().to_owned();
        transport.spawn(url);
        transport
    }

    fn spawn(&mut self, url: String) {
        if let Some(old) = self.task.take() {
            old.abort();
        }
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(run_connection(url, tx)));
    }

    /// Deliver buffered socket events and start a reconnect when one is due.
    pub fn pump(&mut self, arcade: &mut Arcade, now_ms: f64) {
        while let Ok(event) = self.rx.try_recv() {
            arcade.on_transport_event(event, now_ms);
        }
        if arcade.channel().poll_reconnect(now_ms) {
            let url = arcade.channel_mut().begin_connect().to_owned();
            self.spawn(url);
        }
    }

    /// Stop the current connection task
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for NativeTransport {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(url: String, tx: mpsc::UnboundedSender<TransportEvent>) {
    let (ws_stream, _) = match connect_async(url.as_str()).await {
        Ok(conn) => conn,
        Err(e) => {
            let _ = tx.send(TransportEvent::Failed(e.to_string()));
            let _ = tx.send(TransportEvent::Closed);
            return;
        }
    };
    let _ = tx.send(TransportEvent::Opened);

    // The pose service never expects anything from us
    let (_ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        match ws_receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                if tx.send(TransportEvent::Text(text.as_str().to_owned())).is_err() {
                    return;
                }
            }
            Some(Ok(Message::Close(_))) | None => break,
            Some(Err(e)) => {
                let _ = tx.send(TransportEvent::Failed(e.to_string()));
                break;
            }
            // Binary, ping and pong frames carry no pose data
            Some(Ok(_)) => {}
        }
    }

    let _ = tx.send(TransportEvent::Closed);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::net::{ConnectionState, PoseChannel};

    /// Local URL nothing is listening on
    fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("ws://127.0.0.1:{}", port)
    }

    async fn next_event(transport: &mut NativeTransport) -> TransportEvent {
        tokio::time::timeout(Duration::from_secs(5), transport.rx.recv())
            .await
            .expect("no transport event within 5s")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_refused_connection_goes_offline_and_retries() {
        let channel = PoseChannel::with_reconnect_delay(refused_url(), 500.0);
        let mut arcade = Arcade::with_channel(channel, 1);
        let mut transport = NativeTransport::start(&mut arcade);
        assert_eq!(arcade.channel().state(), ConnectionState::Connecting);
        assert_eq!(arcade.channel().attempts, 1);

        let failed = next_event(&mut transport).await;
        assert!(matches!(failed, TransportEvent::Failed(_)), "got {:?}", failed);
        let closed = next_event(&mut transport).await;
        assert!(matches!(closed, TransportEvent::Closed), "got {:?}", closed);

        arcade.on_transport_event(failed, 100.0);
        arcade.on_transport_event(closed, 100.0);
        assert_eq!(arcade.channel().state(), ConnectionState::Offline);
        assert_eq!(arcade.channel().reconnect_at(), Some(600.0));

        // Not due yet
        transport.pump(&mut arcade, 400.0);
        assert_eq!(arcade.channel().attempts, 1);
        assert_eq!(arcade.channel().state(), ConnectionState::Offline);

        transport.pump(&mut arcade, 600.0);
        assert_eq!(arcade.channel().attempts, 2);
        assert_eq!(arcade.channel().state(), ConnectionState::Connecting);
        assert!(transport.task.is_some());

        let retry = next_event(&mut transport).await;
        assert!(matches!(retry, TransportEvent::Failed(_)), "got {:?}", retry);

        transport.close();
        assert!(transport.task.is_none());
    }
}
