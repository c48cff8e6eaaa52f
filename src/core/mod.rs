pub mod credentials;
pub mod error;
pub mod models;
pub mod notifications;
pub mod resolver;
pub mod settings;
pub mod store;
