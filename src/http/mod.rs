pub mod render;
pub mod routes;
pub mod session;
pub mod types;
