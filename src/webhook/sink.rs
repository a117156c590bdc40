//! Delivery of forwarded events.

use tokio::sync::mpsc;

use crate::events::NormalizedEvent;

/// Where forwarded events go.
#[derive(Debug, Clone, Default)]
pub enum EventSink {
    /// One JSON document per line on stdout.
    #[default]
    Stdout,
    Channel(mpsc::Sender<NormalizedEvent>),
}

impl EventSink {
    /// Channel sink and its receiving end.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<NormalizedEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (EventSink::Channel(tx), rx)
    }

    pub async fn deliver(&self, event: &NormalizedEvent) {
        match self {
            EventSink::Stdout => match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!(error = %e, "Failed to serialize event"),
            },
            EventSink::Channel(tx) => {
                if tx.send(event.clone()).await.is_err() {
                    tracing::warn!(event_type = %event.event_type, "Event receiver dropped");
                }
            }
        }
    }
}
