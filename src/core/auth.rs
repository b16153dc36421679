//! Caller identity consumed by the catalog core
//!
//! Login, token storage and role-based redirects live outside the core.
//! The session only receives an already authenticated caller and its role.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses the catalog, negotiates and fills a cart
    Client,
    /// Lists products
    Seller,
    /// Platform administrator
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Seller => write!(f, "seller"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Authenticated caller of a browsing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Shorthand for a client caller
    pub fn client(id: Uuid) -> Self {
        Self::new(id, Role::Client)
    }

    /// Whether the caller may submit price offers
    pub fn can_negotiate(&self) -> bool {
        self.role == Role::Client
    }
}
