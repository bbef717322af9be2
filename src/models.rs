//! Client Models
//!
//! Data structures matching the server's procedure outputs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: u32,
    pub name: String,
    pub owner: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub list_id: u32,
}

/// A list plus whichever relations were requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: List,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub items: Option<Vec<Item>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub bag: u32,
    pub packed: bool,
    pub list_id: u32,
    pub category_id: u32,
    pub owner: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedImage {
    pub id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub success: bool,
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

/// Category edits needed to go from the saved set to the edited set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl CategoryChanges {
    /// Names compare case-insensitively after trimming; blank entries are ignored.
    pub fn between(current: &[Category], desired: &[String]) -> Self {
        let desired: Vec<&str> = desired
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .collect();

        let mut added: Vec<String> = Vec::new();
        for name in &desired {
            let known = current.iter().any(|c| c.name.eq_ignore_ascii_case(name))
                || added.iter().any(|a| a.eq_ignore_ascii_case(name));
            if !known {
                added.push(name.to_string());
            }
        }

        let removed = current
            .iter()
            .filter(|c| !desired.iter().any(|d| d.eq_ignore_ascii_case(&c.name)))
            .map(|c| c.name.clone())
            .collect();

        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
