//! Injected diagnostic sink for the HTTP client.

use std::cell::RefCell;

use courtside_shared::ApiError;

/// Something the client wants to report about a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Started { url: String },
    Succeeded { url: String, status: u16 },
    Failed {
        url: String,
        error: ApiError,
        /// Message extracted from an error body, when the service sent one.
        detail: Option<String>,
    },
    Aborted { url: String },
}

/// Receives request diagnostics. The client never logs on its own.
pub trait DiagnosticSink {
    fn record(&self, event: &Diagnostic);
}

/// Forwards diagnostics to the crate logging macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, event: &Diagnostic) {
        match event {
            Diagnostic::Started { url } => crate::log_debug!("GET {}", url),
            Diagnostic::Succeeded { url, status } => crate::log_debug!("GET {} -> {}", url, status),
            Diagnostic::Failed {
                url,
                error,
                detail: Some(detail),
            } => crate::log_warn!("GET {} failed: {} ({})", url, error, detail),
            Diagnostic::Failed { url, error, .. } => crate::log_warn!("GET {} failed: {}", url, error),
            Diagnostic::Aborted { url } => crate::log_debug!("GET {} aborted", url),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: &Diagnostic) {}
}

/// Keeps every diagnostic in memory; useful in tests and debug overlays.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &Diagnostic) {
        self.events.borrow_mut().push(event.clone());
    }
}
