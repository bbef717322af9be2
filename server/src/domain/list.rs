//! List and Category Entities
//!
//! A list is owned by one user and groups its items under named categories.

use serde::{Deserialize, Serialize};
use super::entity::{Entity, DomainError, DomainResult, require_name};
use super::item::Item;

/// A packing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: u32,
    pub name: String,
    /// User identifier of the owner
    pub owner: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl List {
    pub fn new(id: u32, name: String, owner: String) -> Self {
        Self {
            id,
            name,
            owner,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }
}

impl Entity for List {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A user-defined grouping of items within one list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub list_id: u32,
}

impl Entity for Category {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A list with its categories and items loaded on request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: List,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
}

/// Trim and validate a set of category names.
///
/// Every name must be non-empty and names must be unique (case-insensitive).
pub fn normalize_category_names(names: &[String]) -> DomainResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = require_name("category name", name)?;
        if out.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            return Err(DomainError::InvalidInput(format!("Duplicate category: {}", name)));
        }
        out.push(name);
    }
    Ok(out)
}
