//! # Daemon Runtime
//!
//! Reads request lines, dispatches them concurrently and writes responses
//! and connection events back as they complete.

use crate::config::DaemonConfig;
use connection_observer::{ConnectionEvent, ConnectionEvents, ConnectionObserver};
use core_types::RequestId;
use dispatcher::Dispatcher;
use ipc::{RequestEnvelope, Response};
use serde::Serialize;
use services_directory::DirectoryService;
use session_manager::ClientHandleManager;
use sim_network::SimNetwork;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Daemon runtime error types
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] JoinError),
}

/// Line written for a connection change
#[derive(Serialize)]
struct EventLine {
    event: ConnectionEvent,
}

/// The daemon runtime
pub struct DaemonRuntime {
    dispatcher: Arc<Dispatcher>,
    events: ConnectionEvents,
}

impl DaemonRuntime {
    /// Builds the service stack on top of the simulated network
    pub fn new(config: &DaemonConfig) -> Self {
        let network = SimNetwork::new(config.network.clone());
        let (observer, events) = ConnectionObserver::new();
        let manager = Arc::new(ClientHandleManager::new(Arc::new(network), observer));
        let dispatcher = Dispatcher::new(
            manager,
            Arc::new(DirectoryService::new()),
            config.default_app.clone(),
        );

        Self {
            dispatcher: Arc::new(dispatcher),
            events,
        }
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// Serves requests from `input` until it ends or `shutdown` completes
    ///
    /// Requests already read are answered before the service shuts down.
    /// Returns `output` once everything has been written to it.
    pub async fn run<R, W, S>(self, input: R, output: W, shutdown: S) -> Result<W, DaemonError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
        let writer = tokio::spawn(write_lines(output, line_rx));

        let (stop_tx, stop_rx) = oneshot::channel();
        let forwarder = tokio::spawn(forward_events(self.events, line_tx.clone(), stop_rx));

        let mut in_flight = JoinSet::new();
        let mut lines = input.lines();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Interrupted");
                    break;
                }
                line = lines.next_line() => match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        let dispatcher = Arc::clone(&self.dispatcher);
                        let line_tx = line_tx.clone();
                        in_flight.spawn(async move {
                            let response = handle_line(&dispatcher, &line).await;
                            send_line(&line_tx, &response);
                        });
                    }
                    None => {
                        info!("End of input");
                        break;
                    }
                },
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "Request task failed");
            }
        }

        self.dispatcher.shutdown().await;

        // The forwarder drains what is left once stopped
        let _ = stop_tx.send(());
        forwarder.await?;
        drop(line_tx);

        let output = writer.await??;
        Ok(output)
    }
}

async fn handle_line(dispatcher: &Dispatcher, line: &str) -> Response {
    match serde_json::from_str::<RequestEnvelope>(line) {
        Ok(envelope) => dispatcher.dispatch(envelope).await,
        Err(err) => {
            warn!(error = %err, "Malformed request line");
            Response::failure(RequestId::new(), 400, 400, format!("Malformed request: {}", err))
        }
    }
}

fn send_line<T: Serialize>(line_tx: &mpsc::UnboundedSender<String>, value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => {
            if line_tx.send(line).is_err() {
                warn!("Output closed, line dropped");
            }
        }
        Err(err) => warn!(error = %err, "Failed to encode output line"),
    }
}

async fn forward_events(
    events: ConnectionEvents,
    line_tx: mpsc::UnboundedSender<String>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Some(event) => {
                    debug!(kind = %event.kind, state = %event.state, "Forwarding connection event");
                    send_line(&line_tx, &EventLine { event });
                }
                None => return,
            },
            _ = &mut stop => break,
        }
    }

    for event in events.drain() {
        send_line(&line_tx, &EventLine { event });
    }
}

async fn write_lines<W>(
    mut output: W,
    mut line_rx: mpsc::UnboundedReceiver<String>,
) -> Result<W, std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = line_rx.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(output)
}
