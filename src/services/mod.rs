//! Business logic services
//!
//! Services sit between the API layer and the repositories. Each service
//! validates input, orchestrates the repository calls, and keeps the search
//! index in sync with the relational store.

pub mod article;
pub mod category;
pub mod user;

pub use article::{ArticleRecord, ArticleService, ArticleServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use user::{UserService, UserServiceError};
