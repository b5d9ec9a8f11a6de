//! Message passing between the host event sources and the reactor.
//!
//! Every message carries the span it was sent from so the receiving side can
//! log inside the sender's context.

pub mod config_watcher;
pub mod reactor;
#[cfg(unix)]
pub mod shutdown;

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::Span;

pub struct Sender<Event>(UnboundedSender<(Span, Event)>);

pub type Receiver<Event> = UnboundedReceiver<(Span, Event)>;

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded_channel();
    (Sender(tx), rx)
}

impl<Event> Sender<Event> {
    /// Sends, dropping the event if the receiver has gone away.
    pub fn send(&self, event: Event) { _ = self.try_send(event) }

    pub fn try_send(&self, event: Event) -> Result<(), SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }

    pub fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Sender(self.0.clone()) }
}
