//! Shared test utilities for `GroceryBuddy`.
//!
//! Fixtures build fully wired stores over in-memory storage and the mock
//! identity provider, plus sample entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;

use crate::auth::MockAuthProvider;
use crate::entities::{Item, NewItem, NewProfile};
use crate::storage::{MemoryStorage, Storage};
use crate::store::{AuthStore, ListsStore};

/// Email used by the fixture account.
pub const TEST_EMAIL: &str = "test@example.com";
/// Password used by the fixture account.
pub const TEST_PASSWORD: &str = "Passw0rd!";

/// Builds an auth store and a lists store over one shared in-memory
/// backend, with nobody signed in.
pub fn setup_stores() -> (Arc<AuthStore>, ListsStore) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let provider = Arc::new(MockAuthProvider::new(Arc::clone(&storage)));
    let auth = Arc::new(AuthStore::new(provider, Arc::clone(&storage)));
    let lists = ListsStore::new(storage, Arc::clone(&auth));
    (auth, lists)
}

/// Like [`setup_stores`], but with the fixture account created and signed
/// in.
pub async fn signed_in_stores() -> (Arc<AuthStore>, ListsStore) {
    let (auth, lists) = setup_stores();
    auth.sign_up(TEST_EMAIL, TEST_PASSWORD, NewProfile::default())
        .await
        .unwrap();
    (auth, lists)
}

/// Builds an item with the given fields and a fresh id.
pub fn sample_item(name: &str, price: f64, quantity: f64, completed: bool) -> Item {
    Item {
        id: crate::core::id::generate_id(),
        name: name.to_string(),
        price,
        quantity,
        completed,
        created_at: Utc::now(),
    }
}

/// Constructor shorthand for [`NewItem`] in tests.
pub trait NewItemExt {
    /// Builds a `NewItem` with the given name, price, and quantity.
    fn named(name: &str, price: f64, quantity: f64) -> NewItem;
}

impl NewItemExt for NewItem {
    fn named(name: &str, price: f64, quantity: f64) -> NewItem {
        NewItem {
            name: name.to_string(),
            price,
            quantity,
        }
    }
}
