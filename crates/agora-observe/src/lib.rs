//! Observability setup for the Agora binary.

pub mod tracing_setup;

pub use tracing_setup::init_tracing;
