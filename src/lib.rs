pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;
