//! Core: configuration and server state.

mod config;
mod state;

pub use config::Config;
pub use state::ServerState;
