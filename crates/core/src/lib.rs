//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all shopfront components:
//! - `storefront` - The storefront edge service (`shopfront-server`)
//! - `cli` - Command-line tools for migrations and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Locale resolution, Shopify ID newtypes, the cart action
//!   model, and chat messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
