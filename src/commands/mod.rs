pub mod annotate;
pub mod handlers;
