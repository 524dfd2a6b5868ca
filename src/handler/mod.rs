//! Event handler contract
//!
//! Handlers are registered against a versioned extension point. A handler
//! declares the extension-point version range it was written for, and
//! registration rejects handlers whose requirement the host cannot satisfy.

pub mod registry;
pub mod start_end;

use thiserror::Error;

use crate::event::JobEvent;

/// Version of the event-handler extension point provided by this host.
pub const HANDLER_API_VERSION: &str = "1.0";

/// Errors a handler can raise while processing an event
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A job ended without a recorded start (the orchestrator must deliver
    /// a started event before the matching ended event)
    #[error("no recorded start for job '{id}'")]
    UnknownJob { id: String },

    /// The handler's declared version requirement is not satisfied by the
    /// host extension point
    #[error("handler '{name}' requires extension point version {requirement}")]
    Incompatible { name: &'static str, requirement: &'static str },

    #[error("failed to write annotation")]
    Io(#[from] std::io::Error),
}

/// An event handler plugin
pub trait EventHandler {
    /// Short stable name, used for logging and listing.
    fn name(&self) -> &'static str;

    /// Extension-point version requirement, caret semantics (e.g. "^1.0").
    fn api_requirement(&self) -> &'static str {
        "^1.0"
    }

    /// Process one event. Called once per event, in arrival order.
    fn handle(&mut self, event: &JobEvent) -> Result<(), HandlerError>;
}

/// Caret compatibility check: same major version, and the provided minor
/// version is at least the required one.
pub fn version_satisfied(requirement: &str, provided: &str) -> bool {
    let requirement = requirement.strip_prefix('^').unwrap_or(requirement);
    match (parse_version(requirement), parse_version(provided)) {
        (Some((req_major, req_minor)), Some((major, minor))) => major == req_major && minor >= req_minor,
        _ => false,
    }
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor))
}
