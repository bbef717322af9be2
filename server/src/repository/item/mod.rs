//! Item Repository Module
//!
//! This module provides item repository functionality split into specialized sub-modules:
//! - item_repo: Core CRUD operations
//! - item_list: Operations scoped to one list

mod item_repo;
mod item_list;

pub use item_repo::ItemRepository;
pub(crate) use item_repo::{row_to_item, ITEM_COLUMNS};

// Re-export the operation trait so it can be used by importing ItemRepository
pub use item_list::ItemListOperations;
