pub mod cache;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
