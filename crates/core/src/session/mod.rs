//! Per-tab session lifecycle

pub mod diagnostics;
mod manager;

pub use diagnostics::DiagnosticLog;
pub use manager::SessionStateManager;
