pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod offers;
pub mod session;
pub mod stats;
pub mod workspace;

pub use error::ApiError;
pub use session::Session;
pub use workspace::Workspace;
