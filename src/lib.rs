#![forbid(unsafe_code)]

pub mod agents;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod filesystem;
pub mod promptz;
pub mod utils;
pub mod workspace;
