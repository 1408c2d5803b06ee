pub mod app;
pub mod clock;
pub mod config;
pub mod format;
pub mod models;
pub mod output;
pub mod rates;
