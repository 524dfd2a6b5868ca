//! List registered event handlers

use colored::*;
use eyre::Result;

use crate::commands::annotate::build_registry;
use crate::config::Config;
use crate::handler::{HANDLER_API_VERSION, version_satisfied};

pub fn run(config: &Config) -> Result<()> {
    let registry = build_registry(config)?;

    println!("{}", "Registered event handlers:".bold());
    println!();

    if registry.is_empty() {
        println!("  {} No handlers enabled", "⚠".yellow());
        return Ok(());
    }

    for handler in registry.handlers() {
        let status = if version_satisfied(handler.api_requirement(), HANDLER_API_VERSION) {
            "compatible".green()
        } else {
            "incompatible".red()
        };
        println!(
            "  {} requires {} (host provides {}) [{}]",
            handler.name().cyan(),
            handler.api_requirement(),
            HANDLER_API_VERSION,
            status
        );
    }

    Ok(())
}
