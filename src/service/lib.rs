pub mod config;
pub mod http;
pub mod models;
pub mod persistence;
pub mod services;
