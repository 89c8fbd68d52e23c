//! Request validation.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → header.rs (mandatory headers)
//!     → body.rs (sudoku request payload)
//!     → Verdict { valid, message } handed back to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Validators are pure and synchronous; they never touch the network
//! - The dispatcher only depends on the `Validator` trait
//! - Failure messages are surfaced to the client as the status text

pub mod body;
pub mod header;

use axum::http::HeaderMap;

/// Result of checking one part of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Checks the mandatory parts of a client request.
pub trait Validator: Send + Sync {
    /// Check the request headers.
    fn check_header(&self, headers: &HeaderMap) -> Verdict;

    /// Check the raw request body.
    fn check_body(&self, body: &[u8]) -> Verdict;
}

/// Default validator for sudoku solve requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SudokuRequestValidator;

impl Validator for SudokuRequestValidator {
    fn check_header(&self, headers: &HeaderMap) -> Verdict {
        header::check_header(headers)
    }

    fn check_body(&self, body: &[u8]) -> Verdict {
        body::check_body(body)
    }
}
