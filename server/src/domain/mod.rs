//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! Storage, HTTP and the file host live in the layers above.

mod entity;
mod list;
mod item;
mod image;
mod filter;
mod session;

pub use entity::{Entity, DomainError, DomainResult, require_name};
pub use list::{List, Category, ListDetail, normalize_category_names};
pub use item::{Item, MAX_BAG, validate_bag, validate_quantity};
pub use image::{UnusedImage, hosted_key, hosted_url, is_valid_image_url};
pub use filter::{ItemFilter, MatchRank};
pub use session::UserIdentity;
