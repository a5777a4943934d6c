//! Formula Proxy - turns plain-English requests into spreadsheet formulas.
//!
//! A spreadsheet assistant posts `{"query": "..."}` to a single endpoint. The
//! proxy wraps the query in a fixed prompt, sends it to an OpenAI-style
//! `/v1/chat/completions` API, and reshapes the completion into
//! `{"formula": "...", "explanation": "..."}`.
//!
//! Design goals:
//! - One request in, one upstream call out, no retries or caching.
//! - Callers always get the two expected keys on success, even when the model
//!   ignores the requested output format (fallback mode).
//! - Every failure is a JSON `{"error": "..."}` body with an HTTP status.

pub mod config;
pub mod error;
pub mod outcome;
pub mod prompt;
pub mod proxy;
pub mod server;
pub mod types;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use outcome::FormulaOutcome;
pub use proxy::FormulaProxy;
pub use server::{configure, serve};
