//! API Access
//!
//! HTTP client functions and error types for the remote API.

pub mod client;

pub use client::*;
