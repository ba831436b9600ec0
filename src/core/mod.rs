pub mod analysis;
pub mod app;
pub mod config;
pub mod constants;
pub mod message;
pub mod selection;
