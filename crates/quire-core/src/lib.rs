//! Core library for Quire.
//!
//! Contains the document store (filename rules, duplication), the content
//! renderer (extension-driven body + content type), the credential store
//! (username → Argon2 hash file), the session store, and the auth gate.
//! This crate depends on `quire-storage` for the document backend trait
//! and knows nothing about HTTP.

pub mod auth;
pub mod credentials;
pub mod document;
pub mod error;
pub mod render;
pub mod session;
