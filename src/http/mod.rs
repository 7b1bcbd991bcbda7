//! HTTP server module: routes and the throttling middleware.

mod middleware;
mod routes;
mod server;

pub use middleware::throttle;
pub use routes::router;
pub use server::HttpServer;
