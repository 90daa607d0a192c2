//! `cp-domain` — types shared by every ChatPal crate: the error type,
//! the layered configuration, and structured trace events.

pub mod config;
pub mod error;
pub mod trace;

pub use error::{Error, Result};
