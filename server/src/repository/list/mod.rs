//! List Repository Module
//!
//! - list_repo: Core CRUD operations
//! - list_category: Category operations scoped to a list

mod list_repo;
mod list_category;

pub use list_repo::ListRepository;
pub use list_category::ListCategoryOperations;
