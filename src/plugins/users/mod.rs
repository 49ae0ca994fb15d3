pub mod handlers;
pub mod models;
mod plugin;

pub use plugin::UsersPlugin;
