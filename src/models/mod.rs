//! Domain models
//!
//! This module contains the core domain entities for the Inkdex blog platform:
//! - User: author accounts referenced by articles
//! - Category: flat content categories
//! - Article: blog articles with a type and a category set
//! - Pagination types shared by list and search queries

pub mod article;
pub mod category;
pub mod user;

pub use article::{
    Article, ArticleType, CreateArticleInput, ListParams, PagedResult, UpdateArticleInput,
};
pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use user::{CreateUserInput, UpdateUserInput, User};
