use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use reqwest::Url;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::{self, Message};

use crate::channel::{
    Channel, ConnectionHandler, ConnectionState, Emitter, Handler, Handlers, Subscription,
};
use crate::models::events::{self, ClientEvent, ServerEvent, ServerEventKind};

pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone)]
pub struct SocketOptions {
    pub url: Url,
    pub token: Option<String>,
    pub reconnect_delay: Duration,
}

/// What the transport task hands to the UI thread.
#[derive(Debug)]
enum Inbound {
    State(ConnectionState),
    Event(ServerEvent),
}

pub struct WsHandle {
    shutdown_tx: oneshot::Sender<()>,
}

impl WsHandle {
    pub fn shutdown(self) {
        info!("Shutting down WebSocket");
        let _ = self.shutdown_tx.send(());
    }
}

/// The process-wide room channel backed by a WebSocket.
///
/// The connection lives on a tokio task; inbound messages queue up until the
/// owning thread calls [`SocketChannel::pump`], which runs the handlers there.
pub struct SocketChannel {
    handlers: Handlers,
    outbound: mpsc::UnboundedSender<ClientEvent>,
    inbound: std::sync::mpsc::Receiver<Inbound>,
    state: RefCell<ConnectionState>,
    handle: Option<WsHandle>,
}

impl SocketChannel {
    pub fn connect(runtime: &tokio::runtime::Handle, options: SocketOptions, wake: Waker) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        runtime.spawn(run_websocket(
            options,
            outbound_rx,
            inbound_tx,
            wake,
            shutdown_rx,
        ));

        Self {
            handlers: Handlers::new(),
            outbound: outbound_tx,
            inbound: inbound_rx,
            state: RefCell::new(ConnectionState::Connecting),
            handle: Some(WsHandle { shutdown_tx }),
        }
    }

    /// Runs handlers for everything received since the last call.
    pub fn pump(&self) -> usize {
        let mut handled = 0;
        while let Ok(inbound) = self.inbound.try_recv() {
            match inbound {
                Inbound::State(state) => {
                    *self.state.borrow_mut() = state.clone();
                    self.handlers.notify_connection(&state, self);
                }
                Inbound::Event(event) => handled += self.handlers.dispatch(&event, self),
            }
        }
        handled
    }
}

impl Emitter for SocketChannel {
    fn emit(&self, event: ClientEvent) {
        let name = event.name();
        if self.outbound.send(event).is_err() {
            warn!("Transport stopped, dropping {}", name);
        }
    }
}

impl Channel for SocketChannel {
    fn on(&self, kind: ServerEventKind, handler: Handler) -> Subscription {
        self.handlers.on(kind, handler)
    }

    fn on_connection(&self, handler: ConnectionHandler) -> Subscription {
        self.handlers.on_connection(handler)
    }

    fn connection_state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }
}

impl Drop for SocketChannel {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown();
        }
    }
}

fn build_request(
    options: &SocketOptions,
) -> Result<tungstenite::handshake::client::Request> {
    let mut request = options.url.as_str().into_client_request()?;
    if let Some(token) = &options.token {
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
    }
    Ok(request)
}

async fn run_websocket(
    options: SocketOptions,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientEvent>,
    inbound_tx: std::sync::mpsc::Sender<Inbound>,
    wake: Waker,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let send = |inbound: Inbound| {
        let delivered = inbound_tx.send(inbound).is_ok();
        wake();
        delivered
    };

    loop {
        if !send(Inbound::State(ConnectionState::Connecting)) {
            return;
        }
        debug!("Connecting to WebSocket: {}", options.url);

        let request = match build_request(&options) {
            Ok(request) => request,
            Err(e) => {
                error!("Invalid WebSocket request: {}", e);
                send(Inbound::State(ConnectionState::Disconnected {
                    reason: e.to_string(),
                }));
                return;
            }
        };

        let reason = match tokio_tungstenite::connect_async(request).await {
            Ok((ws_stream, _)) => {
                info!("WebSocket connection established");
                if !send(Inbound::State(ConnectionState::Connected)) {
                    return;
                }

                let (mut sink, mut stream) = ws_stream.split();

                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => {
                            info!("WebSocket shutdown requested");
                            sink.close().await.ok();
                            return;
                        }
                        Some(event) = outbound_rx.recv() => {
                            let text = match events::encode(&event) {
                                Ok(text) => text,
                                Err(e) => {
                                    error!("Failed to encode {}: {}", event.name(), e);
                                    continue;
                                }
                            };
                            debug!("Sending {}", event.name());
                            if let Err(e) = sink.send(Message::text(text)).await {
                                break e.to_string();
                            }
                        }
                        message = stream.next() => match message {
                            Some(Ok(Message::Text(text))) => match events::decode(text.as_str()) {
                                Ok(Some(event)) => {
                                    debug!("Received {}", event.kind().name());
                                    if !send(Inbound::Event(event)) {
                                        return;
                                    }
                                }
                                Ok(None) => debug!("Ignoring unhandled event: {}", text.as_str()),
                                Err(e) => warn!("Received invalid message: {} ({})", text.as_str(), e),
                            },
                            Some(Ok(Message::Close(_))) | None => break "closed by server".to_string(),
                            Some(Ok(_)) => {}
                            Some(Err(e)) => break e.to_string(),
                        }
                    }
                }
            }
            Err(e) => e.to_string(),
        };

        error!("WebSocket disconnected: {}", reason);
        if !send(Inbound::State(ConnectionState::Disconnected { reason })) {
            return;
        }

        info!(
            "Reconnecting to WebSocket in {} seconds...",
            options.reconnect_delay.as_secs()
        );
        let backoff = tokio::time::sleep(options.reconnect_delay);
        tokio::pin!(backoff);
        loop {
            tokio::select! {
                _ = &mut backoff => break,
                _ = &mut shutdown_rx => return,
                Some(event) = outbound_rx.recv() => {
                    warn!("Not connected, dropping {}", event.name());
                }
            }
        }
    }
}
