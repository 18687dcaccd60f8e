//! Data models shared across the classification pipeline.

pub mod classification;
pub mod config;
pub mod supplier;
