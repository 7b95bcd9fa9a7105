pub mod chat;
pub mod config;
pub mod credential;
pub mod dashboard;
pub mod http;
pub mod model;
pub mod render;
pub mod types;
