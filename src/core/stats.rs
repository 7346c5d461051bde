//! Shopping statistics business logic.
//!
//! This module computes aggregate counts and monetary totals for a list of
//! items against an optional budget. The function is pure and deterministic;
//! stats are derived on demand and never persisted.

use crate::entities::Item;

/// Derived statistics for one shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingStats {
    /// Number of items on the list
    pub total_items: usize,
    /// Number of items checked off
    pub completed_items: usize,
    /// Σ price×quantity over all items, rounded to cents
    pub total_value: f64,
    /// Σ price×quantity over completed items, rounded to cents
    pub completed_value: f64,
    /// Budget minus completed value, rounded to cents; `None` without a budget
    pub remaining_budget: Option<f64>,
    /// Whether the completed value has overrun the budget
    pub budget_exceeded: bool,
}

/// Computes aggregate statistics for a slice of items.
///
/// Malformed values are coerced rather than rejected: a non-finite price
/// counts as `0`, a non-finite or zero quantity counts as `1`. Totals
/// accumulate unrounded and each monetary output is rounded to two decimals
/// independently, so `remaining_budget` is derived from the exact completed
/// sum rather than its rounded form.
///
/// # Arguments
/// * `items` - Items of one list, in any order
/// * `budget` - Budget to measure completed spending against, if one is set
///
/// # Returns
/// A `ShoppingStats` snapshot; `remaining_budget` is `None` when no budget
/// was supplied and `budget_exceeded` is only ever `true` with a budget.
#[must_use]
pub fn calculate_shopping_stats(items: &[Item], budget: Option<f64>) -> ShoppingStats {
    let total_items = items.len();
    let mut total_value = 0.0_f64;
    let mut completed_items = 0_usize;
    let mut completed_value = 0.0_f64;

    for item in items {
        let price = if item.price.is_finite() { item.price } else { 0.0 };
        let quantity = if item.quantity.is_finite() && item.quantity != 0.0 {
            item.quantity
        } else {
            1.0
        };
        let item_value = price * quantity;
        total_value += item_value;
        if item.completed {
            completed_items += 1;
            completed_value += item_value;
        }
    }

    let remaining_budget = budget.map(|b| round2(b - completed_value));
    let budget_exceeded = remaining_budget.is_some_and(|r| r < 0.0);

    ShoppingStats {
        total_items,
        completed_items,
        total_value: round2(total_value),
        completed_value: round2(completed_value),
        remaining_budget,
        budget_exceeded,
    }
}

/// Rounds a monetary amount to two decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
