pub mod config;
pub mod http_error;
pub mod kernel;
pub mod plugins;
pub mod rules;
pub mod stats;
pub mod store;

pub use crate::kernel::*;
