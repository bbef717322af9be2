//! Packlist Client
//!
//! Typed bindings for the packlist RPC API, used by the UI.

pub mod models;
pub mod commands;

pub use commands::{RpcClient, RpcError};
