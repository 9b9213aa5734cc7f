//! HTTP API handlers for moodmix-server

pub mod buildinfo;
pub mod catalog;
pub mod health;
pub mod recommend;

pub use buildinfo::buildinfo_routes;
pub use catalog::catalog_routes;
pub use health::health_routes;
pub use recommend::recommend_routes;
