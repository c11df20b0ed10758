// src/lib.rs

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod resolver;
pub mod router;
pub mod routes;

pub use config::Config;
pub use error::RouterError;
pub use history::{ListenerId, WebHistory};
pub use model::{Resolution, RouteDescriptor, RouteMatch, View};
pub use router::Router;
pub use routes::{create_router, create_web_history, routes};
