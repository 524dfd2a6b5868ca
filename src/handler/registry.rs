//! Handler registration and event dispatch

use super::{EventHandler, HandlerError, HANDLER_API_VERSION, version_satisfied};
use crate::event::JobEvent;

/// Owns the registered handlers and fans events out to them
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler after checking its declared version requirement
    /// against the host extension point.
    pub fn register(&mut self, handler: Box<dyn EventHandler>) -> Result<(), HandlerError> {
        if !version_satisfied(handler.api_requirement(), HANDLER_API_VERSION) {
            return Err(HandlerError::Incompatible {
                name: handler.name(),
                requirement: handler.api_requirement(),
            });
        }
        log::debug!("Registered event handler: {}", handler.name());
        self.handlers.push(handler);
        Ok(())
    }

    /// Dispatch one event to every registered handler in registration order.
    ///
    /// A failing handler is logged and skipped; later handlers still see
    /// the event.
    pub fn dispatch(&mut self, event: &JobEvent) {
        for handler in &mut self.handlers {
            if let Err(e) = handler.handle(event) {
                log::error!("Handler '{}' failed: {}", handler.name(), e);
            }
        }
    }

    pub fn handlers(&self) -> impl Iterator<Item = &dyn EventHandler> {
        self.handlers.iter().map(|h| h.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
