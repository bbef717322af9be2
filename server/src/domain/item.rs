//! Item Entity
//!
//! A single inventory entry inside a list, assigned to one of the list's
//! categories and to a numbered bag.

use serde::{Deserialize, Serialize};
use super::entity::{Entity, DomainError, DomainResult};

/// Highest bag number an item can be assigned to
pub const MAX_BAG: u32 = 9;

/// An inventory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: u32,
    pub name: String,
    pub description: String,
    /// URL of the hosted image
    pub image: String,
    /// How many of this item, at least 1
    pub quantity: u32,
    /// Bag number, 1..=MAX_BAG
    pub bag: u32,
    pub packed: bool,
    pub list_id: u32,
    pub category_id: u32,
    /// User identifier of the owner
    pub owner: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Item {
    /// Create an unpacked item with quantity 1 in bag 1
    pub fn new(id: u32, name: String, list_id: u32, category_id: u32, owner: String) -> Self {
        Self {
            id,
            name,
            description: String::new(),
            image: String::new(),
            quantity: 1,
            bag: 1,
            packed: false,
            list_id,
            category_id,
            owner,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    /// Check the numeric bounds and the name
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("item name must not be empty".into()));
        }
        validate_quantity(self.quantity)?;
        validate_bag(self.bag)
    }
}

impl Entity for Item {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

pub fn validate_quantity(quantity: u32) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::InvalidInput("quantity must be positive".into()));
    }
    Ok(())
}

pub fn validate_bag(bag: u32) -> DomainResult<()> {
    if bag == 0 || bag > MAX_BAG {
        return Err(DomainError::InvalidInput(format!(
            "bag must be between 1 and {}",
            MAX_BAG
        )));
    }
    Ok(())
}
