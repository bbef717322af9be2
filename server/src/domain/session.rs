//! Session identity
//!
//! The OAuth login flow is external; what reaches the service is a bearer
//! token that resolves to the user below.

use serde::{Deserialize, Serialize};

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable provider user id; stored as the owner of lists and items
    pub id: String,
    /// Display name
    pub name: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
