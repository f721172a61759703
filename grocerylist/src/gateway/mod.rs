//! Remote-method gateway
//!
//! Publishes a subset of grocery operations as JSON-RPC 2.0 methods served
//! over line-delimited stdio.

pub mod methods;
pub mod protocol;
pub mod server;

pub use methods::{encode_outcome, GatewayMethod, GatewayMethods};
pub use protocol::RpcError;
pub use server::GatewayServer;
