//! Dashboard HTTP API.
//!
//! Exposes each tab bundle and the exports as JSON/attachment endpoints
//! under `/api/`. Every request runs the load → filter → aggregate
//! pipeline on the blocking pool under the configured query timeout.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::{dashboard_router, dashboard_router_with_static};
pub use server::{start_server, DashboardServer, ServerError};
pub use types::ApiContext;
