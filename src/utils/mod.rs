//! Utility functions and helpers for the Vadu client.
//!
//! This module provides cross-cutting concerns like structured logging,
//! token masking, and the retry policy shared by every remote operation.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization, token masking and log sanitizing.
//! - `retry`: Attempt budgets and the exponential backoff schedule.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
