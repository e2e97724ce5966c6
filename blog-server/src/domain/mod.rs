pub mod error;
pub mod pagination;
pub mod patch;
pub mod post;
pub mod user;

pub use error::{DomainError, FieldError};
pub use post::Post;
pub use user::{AuthUser, User};
