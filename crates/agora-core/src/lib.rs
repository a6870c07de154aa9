//! Chat core for the Agora demo site.
//!
//! This crate holds the only stateful pieces of the site: the channel bus
//! (named publish/subscribe fan-out), the connection registry, the per-connection
//! chat session state machine, and the visitor simulator that populates the
//! demo chat with synthetic participants.
//!
//! Depends only on `agora-types` -- never on the HTTP or rendering layers.

pub mod bus;
pub mod escape;
pub mod registry;
pub mod session;
pub mod visitor;
