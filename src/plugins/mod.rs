pub mod auth;
pub mod blogs;
pub mod health;
pub mod shared;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;
