use std::collections::HashMap;

use strum_macros::Display;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Lifecycle events published by the registry and the system facade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Default)]
pub enum EventType {
    #[default]
    RegistryInitialized,
    CarRegistered,
    CarDriven,
    Custom(String),
}

/// Parameter value attached to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    pub event_type: EventType,
    pub parameters: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub error_type: String,
    pub message: String,
    pub severity: ErrorSeverity,
    pub parameters: HashMap<String, Value>,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Failed to send event: {message}")]
    SendFailed { message: String },
    #[error("Failed to receive event: {message}")]
    ReceiveFailed { message: String },
    #[error("Receiver lagged, {count} events skipped")]
    Lagged { count: u64 },
}

pub type EventResult<T> = Result<T, EventError>;

/// Broadcast bus carrying lifecycle events and error diagnostics on
/// separate channels. Publishing with no live subscribers fails; callers
/// that treat events as best-effort ignore that result.
pub struct EventBus {
    event_sender: broadcast::Sender<Event>,
    error_sender: broadcast::Sender<ErrorEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        // broadcast::channel panics on zero capacity
        let capacity = capacity.max(1);
        let (event_sender, _) = broadcast::channel(capacity);
        let (error_sender, _) = broadcast::channel(capacity);
        Self {
            event_sender,
            error_sender,
        }
    }

    pub fn subscribe(&self) -> (EventReceiver, ErrorReceiver) {
        let event_rx = self.event_sender.subscribe();
        let error_rx = self.error_sender.subscribe();
        (EventReceiver::new(event_rx), ErrorReceiver::new(error_rx))
    }

    pub async fn publish(&self, event: Event) -> EventResult<()> {
        debug!("publishing event: {}", event.event_type);
        self.event_sender
            .send(event)
            .map_err(|e| EventError::SendFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }

    pub async fn publish_error(&self, error: ErrorEvent) -> EventResult<()> {
        debug!("publishing error event: {}", error.error_type);
        self.error_sender
            .send(error)
            .map_err(|e| EventError::SendFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

pub struct EventReceiver {
    receiver: broadcast::Receiver<Event>,
}

impl EventReceiver {
    fn new(receiver: broadcast::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Receives the next event. On lag the receiver resubscribes and reports
    /// how many events were skipped; call `recv` again promptly to avoid
    /// lagging in the first place.
    pub async fn recv(&mut self) -> EventResult<Event> {
        match self.receiver.recv().await {
            Ok(event) => Ok(event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                self.receiver = self.receiver.resubscribe();
                Err(EventError::Lagged { count: n })
            }
            Err(e) => Err(EventError::ReceiveFailed {
                message: e.to_string(),
            }),
        }
    }
}

pub struct ErrorReceiver {
    receiver: broadcast::Receiver<ErrorEvent>,
}

impl ErrorReceiver {
    fn new(receiver: broadcast::Receiver<ErrorEvent>) -> Self {
        Self { receiver }
    }

    pub async fn recv(&mut self) -> EventResult<ErrorEvent> {
        self.receiver
            .recv()
            .await
            .map_err(|e| EventError::ReceiveFailed {
                message: e.to_string(),
            })
    }
}
