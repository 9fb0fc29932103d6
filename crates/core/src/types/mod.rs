//! Core types for shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod locale;
pub mod message;

pub use cart::{CartAction, CartActionError, CartAttribute, CartRequest};
pub use id::*;
pub use locale::{CountryCode, LanguageCode, Locale, LocaleCodeError, PrefixCheck};
pub use message::{ChatMessage, ChatRole, ChatRoleError};
