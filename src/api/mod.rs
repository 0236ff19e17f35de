//! API module for all HTTP handlers

pub mod stats;
pub mod webhook;

// Re-export handlers
pub use stats::status;
pub use webhook::handle_webhook;

pub async fn root() -> &'static str {
    concat!("gate_notify ", env!("CARGO_PKG_VERSION"))
}
