//! Turns SIGINT and SIGTERM into [`Event::Shutdown`] so the reactor gets to
//! revert window state before the process exits.

use std::io;

use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::info;

use crate::actor::reactor::{self, Event};

pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl ShutdownSignals {
    /// Installs the handlers. Must be called inside a tokio runtime.
    pub fn listen() -> io::Result<ShutdownSignals> {
        Ok(ShutdownSignals {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Waits for the next signal and names it.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "interrupt",
            _ = self.terminate.recv() => "terminate",
        }
    }

    pub async fn forward(mut self, events_tx: reactor::Sender) {
        let signal = self.recv().await;
        info!(signal, "Shutting down");
        events_tx.send(Event::Shutdown);
    }
}
