pub mod memory;
pub mod post_repository;
pub mod user_repository;

pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
pub use post_repository::{PostRepository, PostgresPostRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
