pub mod handlers;
pub mod models;
pub mod password;
pub mod plugin;
pub mod token;

pub use handlers::Identity;
pub use password::PasswordHasher;
pub use plugin::LoginPlugin;
pub use token::{TokenAuthority, TokenError};
