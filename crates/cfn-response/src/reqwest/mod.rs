//! Reqwest-based HTTPS transport for status documents.
//!
//! This module provides a reqwest-based implementation of the [`ResponseTransport`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use cfn_response::reqwest::ReqwestTransport;
//! use cfn_response::{ReporterConfig, ResponseReporter, TransportConfig};
//!
//! let transport = ReqwestTransport::new(TransportConfig::default())?;
//! let reporter = ResponseReporter::new(transport, ReporterConfig::default());
//! ```
//!
//! [`ResponseTransport`]: crate::ResponseTransport

mod client;
mod error;

pub use client::ReqwestTransport;
pub use error::{Error, Result};

/// Tracing target for reqwest transport operations.
pub const TRACING_TARGET: &str = "cfn_response::reqwest";
