pub mod config;
pub mod humanize;
pub mod lines;
pub mod observability;
pub mod pool;
pub mod service;
pub mod util;
