pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod platform;
pub mod session;
pub mod utils;
