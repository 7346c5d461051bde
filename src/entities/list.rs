//! List and item entities - the shopping-list data model.
//!
//! A list owns its items in display order and tracks an optional budget
//! (`0.0` means no budget is set). Entities are plain serde documents;
//! the storage layer persists them as JSON strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a shopping list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    /// Weekly groceries (the default)
    #[default]
    Grocery,
    /// General shopping
    Shopping,
    /// Meal planning
    MealPlan,
    /// Ingredients for a recipe
    Recipe,
    /// Anything else
    Custom,
}

/// A single entry on a shopping list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (UUID v4), immutable after creation
    pub id: String,
    /// Display name of the product (e.g., "Milk", "Eggs")
    pub name: String,
    /// Unit price in dollars, never negative
    #[serde(default)]
    pub price: f64,
    /// Purchase quantity, defaults to one
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Whether the item has been checked off
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

fn default_quantity() -> f64 {
    1.0
}

/// A shopping list with its items and ownership metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Unique identifier (UUID v4), immutable after creation
    pub id: String,
    /// Display name, non-empty and at most 100 characters
    pub name: String,
    /// Budget in dollars; `0.0` means no budget
    #[serde(default)]
    pub budget: f64,
    /// Category of the list
    #[serde(default)]
    pub list_type: ListType,
    /// Items in display order (creation order)
    #[serde(default)]
    pub items: Vec<Item>,
    /// `uid` of the owning user
    pub owner_id: String,
    /// `uid`s of users the list is shared with
    #[serde(default)]
    pub shared_with: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Refreshed on every list or item mutation
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Returns the budget as an optional amount, treating `0.0` as unset.
    #[must_use]
    pub fn budget_amount(&self) -> Option<f64> {
        (self.budget > 0.0).then_some(self.budget)
    }
}

/// Fields supplied when creating a list.
#[derive(Clone, Debug, Default)]
pub struct NewList {
    pub name: String,
    pub budget: f64,
    pub list_type: ListType,
}

/// Partial update for a list; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub budget: Option<f64>,
    pub list_type: Option<ListType>,
}

/// Fields supplied when adding an item to a list.
#[derive(Clone, Debug)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub quantity: f64,
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            quantity: 1.0,
        }
    }
}

/// Partial update for an item; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub completed: Option<bool>,
}
