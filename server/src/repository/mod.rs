//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
pub mod db;
pub mod list;
pub mod item;
mod unused_image_repo;
mod session_repo;

#[cfg(test)]
mod tests;

pub use traits::{Repository, OwnedRepository};
pub use db::{init_db, DbState, SharedConnection};
pub use list::{ListRepository, ListCategoryOperations};
pub use item::{ItemRepository, ItemListOperations};
pub use unused_image_repo::UnusedImageRepository;
pub use session_repo::{hash_token, SessionRepository};
