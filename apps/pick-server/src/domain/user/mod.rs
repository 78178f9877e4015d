//! User Bounded Context

pub mod repository;
pub mod user;

pub use repository::UserRepository;
pub use user::{CreateUserCommand, MAX_NICKNAME_CHARS, User};
