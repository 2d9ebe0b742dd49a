#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in mirrorcheck
//!
//! Library crates never print or log directly. They emit [`AppEvent`]s over
//! an unbounded channel and the CLI decides how each event is rendered
//! (tracing output, JSON lines, or nothing at all).
//!
//! ## Architecture
//!
//! - **Domain-driven events**: events grouped by functional domain (mirror probing,
//!   validation, discovery, cache)
//! - **Unified `EventEmitter` trait**: single API for all event emissions
//! - **Best effort delivery**: a dropped receiver never fails an operation

pub mod events;
pub use events::{
    AppEvent, CacheEvent, DiscoveryEvent, FailureContext, GeneralEvent, MirrorEvent,
    ValidationEvent,
};

use mirrorcheck_errors::{ErrorKind, UserFacingError};
use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout mirrorcheck
///
/// Works the same whether you hold a raw `EventSender` or a struct that
/// optionally carries one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit a recorded artifact failure
    fn emit_artifact_failed<E: UserFacingError + ?Sized>(
        &self,
        artifact: impl Into<String>,
        mirror: impl Into<String>,
        kind: ErrorKind,
        error: &E,
    ) {
        self.emit(AppEvent::Validation(ValidationEvent::ArtifactFailed {
            artifact: artifact.into(),
            mirror: mirror.into(),
            kind,
            failure: FailureContext::from_error(error),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// `None` means "nobody is listening"
impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
