//! Shared domain types for the Agora demo site.
//!
//! This crate contains the types used across the chat core, the rendering
//! collaborators, and the HTTP layer: participants, session state,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod participant;
pub mod session;
