pub mod commands;
pub mod config;
pub mod discord;
pub mod error;
pub mod help;
