//! Annotate a JSONL stream of job lifecycle events
//!
//! Reads one JSON event object per line from a file or stdin and feeds
//! each event through the handler registry. Annotations land on the
//! process stdout/stderr.

use eyre::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::event::JobEvent;
use crate::handler::registry::HandlerRegistry;
use crate::handler::start_end::StartEndHandler;

pub fn run(events: Option<&Path>, config: &Config) -> Result<()> {
    let mut registry = build_registry(config)?;

    if registry.is_empty() {
        log::warn!("No event handlers enabled; input will be consumed without output");
    }

    match events {
        Some(path) => {
            let file = File::open(path).context(format!("Failed to open events file {}", path.display()))?;
            annotate(BufReader::new(file), &mut registry)
        }
        None => annotate(io::stdin().lock(), &mut registry),
    }
}

/// Build the registry of handlers enabled in the config.
pub fn build_registry(config: &Config) -> Result<HandlerRegistry> {
    let mut registry = HandlerRegistry::new();

    if config.handlers.start_end {
        registry
            .register(Box::new(StartEndHandler::stdio(config.interrupt_code)))
            .context("Failed to register start_end handler")?;
    }

    Ok(registry)
}

fn annotate<R: BufRead>(reader: R, registry: &mut HandlerRegistry) -> Result<()> {
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event stream")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: JobEvent =
            serde_json::from_str(&line).context(format!("Malformed event on line {}", lineno + 1))?;

        match event.identifier() {
            Some(id) => log::debug!("Dispatching {:?} for job '{}'", event, id),
            None => log::debug!("Unrecognized event on line {}", lineno + 1),
        }
        registry.dispatch(&event);
    }

    Ok(())
}
