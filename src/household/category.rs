//! Domain types for expense categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the synthetic category that tags settlement transfer legs.
pub const TRANSFER_CATEGORY_NAME: &str = "Transferencia";

/// Classifies household spending and carries the flags that drive splitting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub scope: CategoryScope,
    /// Whether the cost is split across the household at all.
    pub is_shared: bool,
    /// Whether a member on vacation still owes their share.
    pub is_shared_on_leave: bool,
    /// Marks the synthetic legs created by direct settlement transfers.
    pub is_transfer: bool,
    pub hidden: bool,
}

impl Category {
    /// Creates a shared category; flags can be adjusted with the builders.
    pub fn new(name: impl Into<String>, scope: CategoryScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            scope,
            is_shared: true,
            is_shared_on_leave: true,
            is_transfer: false,
            hidden: false,
        }
    }

    /// Builds the synthetic transfer category used by settlement legs.
    pub fn transfer() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: TRANSFER_CATEGORY_NAME.into(),
            scope: CategoryScope::Global,
            is_shared: false,
            is_shared_on_leave: false,
            is_transfer: true,
            hidden: false,
        }
    }

    /// Marks the category as personal: costs are never split.
    pub fn not_shared(mut self) -> Self {
        self.is_shared = false;
        self
    }

    /// Exempts vacationing members from shares in this category.
    pub fn exempt_on_leave(mut self) -> Self {
        self.is_shared_on_leave = false;
        self
    }

    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Whether a category is a global builtin or belongs to one household.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryScope {
    Global,
    Household,
}

impl fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryScope::Global => "Global",
            CategoryScope::Household => "Household",
        };
        f.write_str(label)
    }
}
