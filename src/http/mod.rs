//! HTTP server startup and graceful shutdown.
//!
//! TLS is expected to terminate in front of the service (load balancer or
//! platform router), so the listener is plain HTTP.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
