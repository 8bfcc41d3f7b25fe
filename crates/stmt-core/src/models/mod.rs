//! Data models for the statement engine.

pub mod config;
pub mod record;
