pub mod auth;
pub mod credentials;
pub mod error;
pub mod library;
pub mod middleware;
pub mod routes;
pub mod token;
pub mod videos;

pub use routes::router;
