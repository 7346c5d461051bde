//! Shopping lists store.
//!
//! Owns the canonical in-memory collection of the signed-in user's lists.
//! Mutations go through the pure reducer, then the full collection is
//! written to the user's storage key. Persistence is best effort: a failed
//! write is logged and recorded in `state.error`, but the in-memory
//! mutation has already succeeded and the operation reports success.
//!
//! The current list is tracked by id and resolved on read, so the state
//! never aliases one list in two places.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::core::id::generate_id;
use crate::core::stats::{calculate_shopping_stats, ShoppingStats};
use crate::core::validation::{validate_item_name, validate_list_name};
use crate::entities::{Item, ItemUpdate, List, ListUpdate, NewItem, NewList};
use crate::errors::{Error, Result};
use crate::storage::{keys, Storage};
use crate::store::{AuthStore, Reducer};

/// Lists store state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListsState {
    /// All lists of the signed-in user, newest first
    pub lists: Vec<List>,
    /// Id of the list currently open in the UI, if any
    pub current_list_id: Option<String>,
    /// True while a load/refresh is in flight; suppresses persistence
    pub is_loading: bool,
    /// Message of the most recent failure, until cleared
    pub error: Option<String>,
}

/// Lists state transitions.
///
/// Mutating events carry the mutation timestamp so the reducer stays
/// deterministic.
#[derive(Clone, Debug)]
pub enum ListsEvent {
    /// Load/refresh started or finished
    LoadingChanged(bool),
    /// The persisted collection was (re)loaded
    ListsLoaded(Vec<List>),
    /// A new list was created (prepended)
    ListAdded(List),
    /// An existing list was replaced with its updated form
    ListUpdated(List),
    /// A list was removed
    ListDeleted(String),
    /// The UI opened or closed a list
    CurrentListChanged(Option<String>),
    /// An item was appended to a list
    ItemAdded {
        list_id: String,
        item: Item,
        at: DateTime<Utc>,
    },
    /// An item was replaced with its updated form
    ItemUpdated {
        list_id: String,
        item: Item,
        at: DateTime<Utc>,
    },
    /// An item was removed from a list
    ItemDeleted {
        list_id: String,
        item_id: String,
        at: DateTime<Utc>,
    },
    /// An item's completion flag was flipped
    ItemToggled {
        list_id: String,
        item_id: String,
        at: DateTime<Utc>,
    },
    /// An operation failed
    ErrorSet(String),
    /// The UI acknowledged the error
    ErrorCleared,
}

/// Pure reducer for [`ListsState`].
pub struct ListsReducer;

impl Reducer for ListsReducer {
    type State = ListsState;
    type Event = ListsEvent;

    #[allow(clippy::too_many_lines)]
    fn reduce(mut state: Self::State, event: Self::Event) -> Self::State {
        match event {
            ListsEvent::LoadingChanged(is_loading) => state.is_loading = is_loading,
            ListsEvent::ListsLoaded(lists) => {
                state.lists = lists;
                state.is_loading = false;
                state.error = None;
            }
            ListsEvent::ListAdded(list) => {
                state.lists.insert(0, list);
                state.error = None;
            }
            ListsEvent::ListUpdated(updated) => {
                if let Some(list) = state.lists.iter_mut().find(|l| l.id == updated.id) {
                    *list = updated;
                }
                state.error = None;
            }
            ListsEvent::ListDeleted(id) => {
                state.lists.retain(|l| l.id != id);
                if state.current_list_id.as_deref() == Some(id.as_str()) {
                    state.current_list_id = None;
                }
                state.error = None;
            }
            ListsEvent::CurrentListChanged(id) => {
                state.current_list_id = id;
                state.error = None;
            }
            ListsEvent::ItemAdded { list_id, item, at } => {
                if let Some(list) = state.lists.iter_mut().find(|l| l.id == list_id) {
                    list.items.push(item);
                    list.updated_at = at;
                }
            }
            ListsEvent::ItemUpdated { list_id, item, at } => {
                if let Some(list) = state.lists.iter_mut().find(|l| l.id == list_id) {
                    if let Some(existing) = list.items.iter_mut().find(|i| i.id == item.id) {
                        *existing = item;
                        list.updated_at = at;
                    }
                }
            }
            ListsEvent::ItemDeleted {
                list_id,
                item_id,
                at,
            } => {
                if let Some(list) = state.lists.iter_mut().find(|l| l.id == list_id) {
                    list.items.retain(|i| i.id != item_id);
                    list.updated_at = at;
                }
            }
            ListsEvent::ItemToggled {
                list_id,
                item_id,
                at,
            } => {
                if let Some(list) = state.lists.iter_mut().find(|l| l.id == list_id) {
                    if let Some(item) = list.items.iter_mut().find(|i| i.id == item_id) {
                        item.completed = !item.completed;
                        list.updated_at = at;
                    }
                }
            }
            ListsEvent::ErrorSet(message) => {
                state.error = Some(message);
                state.is_loading = false;
            }
            ListsEvent::ErrorCleared => state.error = None,
        }
        state
    }
}

/// Owns the lists state and sequences storage I/O around the reducer.
pub struct ListsStore {
    state: RwLock<ListsState>,
    storage: Arc<dyn Storage>,
    auth: Arc<AuthStore>,
}

impl ListsStore {
    /// Creates a store over the given storage backend, scoped to the
    /// session held by `auth`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, auth: Arc<AuthStore>) -> Self {
        Self {
            state: RwLock::new(ListsState::default()),
            storage,
            auth,
        }
    }

    fn apply(&self, event: ListsEvent) {
        let mut state = self.state.write();
        *state = ListsReducer::reduce(state.clone(), event);
    }

    /// Writes the full collection to the user's storage key.
    ///
    /// Skipped while a load is in flight, so a concurrent reload is never
    /// clobbered by stale in-memory state. Failures are logged and recorded
    /// in `state.error`, never returned.
    async fn persist(&self) {
        let (lists, is_loading) = {
            let state = self.state.read();
            (state.lists.clone(), state.is_loading)
        };
        if is_loading {
            debug!("Reload in flight, skipping lists persistence");
            return;
        }
        let Some(user) = self.auth.current_user() else {
            debug!("No session, skipping lists persistence");
            return;
        };

        let raw = match serde_json::to_string(&lists) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize lists");
                self.apply(ListsEvent::ErrorSet("Failed to save lists.".to_string()));
                return;
            }
        };
        if let Err(e) = self.storage.set(&keys::lists_key(&user.uid), &raw).await {
            warn!(error = %e, "Failed to save lists to storage");
            self.apply(ListsEvent::ErrorSet("Failed to save lists.".to_string()));
        }
    }

    /// Loads the persisted collection for the current session.
    ///
    /// Without a session the collection is emptied. A corrupted stored
    /// document is logged and treated as empty.
    pub async fn load(&self) {
        let Some(user) = self.auth.current_user() else {
            self.apply(ListsEvent::ListsLoaded(Vec::new()));
            return;
        };

        self.apply(ListsEvent::LoadingChanged(true));
        match self.storage.get(&keys::lists_key(&user.uid)).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(lists) => self.apply(ListsEvent::ListsLoaded(lists)),
                Err(e) => {
                    warn!(error = %e, "Corrupted lists document, starting empty");
                    self.apply(ListsEvent::ListsLoaded(Vec::new()));
                }
            },
            Ok(None) => self.apply(ListsEvent::ListsLoaded(Vec::new())),
            Err(e) => {
                warn!(error = %e, "Failed to load lists from storage");
                self.apply(ListsEvent::ErrorSet("Failed to load lists.".to_string()));
            }
        }
        self.apply(ListsEvent::LoadingChanged(false));
    }

    /// Re-reads the persisted collection; derived stats are recomputed on
    /// demand from the reloaded lists.
    ///
    /// # Errors
    /// Currently infallible; load failures land in `state.error`.
    pub async fn refresh_lists(&self) -> Result<()> {
        self.load().await;
        Ok(())
    }

    /// Creates a list owned by the session user and prepends it.
    ///
    /// # Errors
    /// `Error::NotAuthenticated` without a session, `Error::Validation`
    /// for a bad name.
    pub async fn create_list(&self, data: NewList) -> Result<List> {
        let user = self.auth.current_user().ok_or(Error::NotAuthenticated)?;
        let check = validate_list_name(&data.name);
        if !check.is_valid {
            return Err(Error::Validation {
                message: check.message,
            });
        }

        let now = Utc::now();
        let list = List {
            id: generate_id(),
            name: data.name.trim().to_string(),
            budget: data.budget,
            list_type: data.list_type,
            items: Vec::new(),
            owner_id: user.uid,
            shared_with: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.apply(ListsEvent::ListAdded(list.clone()));
        self.persist().await;
        info!(list_id = %list.id, "Created list");
        Ok(list)
    }

    /// Merges a patch into an existing list.
    ///
    /// # Errors
    /// `Error::ListNotFound` for an unknown id, `Error::Validation` for a
    /// bad name.
    pub async fn update_list(&self, id: &str, patch: ListUpdate) -> Result<List> {
        let mut list = self.list_by_id(id).ok_or_else(|| Error::ListNotFound {
            id: id.to_string(),
        })?;

        if let Some(name) = patch.name {
            let check = validate_list_name(&name);
            if !check.is_valid {
                return Err(Error::Validation {
                    message: check.message,
                });
            }
            list.name = name.trim().to_string();
        }
        if let Some(budget) = patch.budget {
            list.budget = budget;
        }
        if let Some(list_type) = patch.list_type {
            list.list_type = list_type;
        }
        list.updated_at = Utc::now();

        self.apply(ListsEvent::ListUpdated(list.clone()));
        self.persist().await;
        Ok(list)
    }

    /// Deletes a list and all of its items. Deleting an absent id is not
    /// an error.
    ///
    /// # Errors
    /// Currently infallible; persistence failures land in `state.error`.
    pub async fn delete_list(&self, id: &str) -> Result<()> {
        self.apply(ListsEvent::ListDeleted(id.to_string()));
        self.persist().await;
        info!(list_id = %id, "Deleted list");
        Ok(())
    }

    /// Looks a list up by id.
    ///
    /// # Errors
    /// `Error::ListNotFound` for an unknown id.
    pub fn get_list(&self, id: &str) -> Result<List> {
        self.list_by_id(id).ok_or_else(|| Error::ListNotFound {
            id: id.to_string(),
        })
    }

    /// Snapshot lookup; `None` for an unknown id.
    #[must_use]
    pub fn list_by_id(&self, id: &str) -> Option<List> {
        self.state.read().lists.iter().find(|l| l.id == id).cloned()
    }

    /// Opens (or closes, with `None`) a list in the UI.
    pub fn set_current_list(&self, id: Option<String>) {
        self.apply(ListsEvent::CurrentListChanged(id));
    }

    /// The currently open list, resolved from the tracked id.
    #[must_use]
    pub fn current_list(&self) -> Option<List> {
        let id = self.state.read().current_list_id.clone()?;
        self.list_by_id(&id)
    }

    /// Appends a new item to a list.
    ///
    /// # Errors
    /// `Error::ListNotFound` for an unknown list, `Error::Validation` for
    /// a bad item name.
    pub async fn add_item(&self, list_id: &str, data: NewItem) -> Result<Item> {
        if self.list_by_id(list_id).is_none() {
            return Err(Error::ListNotFound {
                id: list_id.to_string(),
            });
        }
        let check = validate_item_name(&data.name);
        if !check.is_valid {
            return Err(Error::Validation {
                message: check.message,
            });
        }

        let now = Utc::now();
        let item = Item {
            id: generate_id(),
            name: data.name.trim().to_string(),
            price: data.price,
            quantity: data.quantity,
            completed: false,
            created_at: now,
        };
        self.apply(ListsEvent::ItemAdded {
            list_id: list_id.to_string(),
            item: item.clone(),
            at: now,
        });
        self.persist().await;
        Ok(item)
    }

    /// Merges a patch into an item.
    ///
    /// # Errors
    /// `Error::ListNotFound` / `Error::ItemNotFound` when either id is
    /// unknown, `Error::Validation` for a bad name.
    pub async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        patch: ItemUpdate,
    ) -> Result<Item> {
        let list = self.get_list(list_id)?;
        let mut item = list
            .items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
            .ok_or_else(|| Error::ItemNotFound {
                list_id: list_id.to_string(),
                item_id: item_id.to_string(),
            })?;

        if let Some(name) = patch.name {
            let check = validate_item_name(&name);
            if !check.is_valid {
                return Err(Error::Validation {
                    message: check.message,
                });
            }
            item.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(completed) = patch.completed {
            item.completed = completed;
        }

        self.apply(ListsEvent::ItemUpdated {
            list_id: list_id.to_string(),
            item: item.clone(),
            at: Utc::now(),
        });
        self.persist().await;
        Ok(item)
    }

    /// Removes an item from a list. Removing an absent item is not an
    /// error, but the list itself must exist.
    ///
    /// # Errors
    /// `Error::ListNotFound` for an unknown list.
    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
        if self.list_by_id(list_id).is_none() {
            return Err(Error::ListNotFound {
                id: list_id.to_string(),
            });
        }
        self.apply(ListsEvent::ItemDeleted {
            list_id: list_id.to_string(),
            item_id: item_id.to_string(),
            at: Utc::now(),
        });
        self.persist().await;
        Ok(())
    }

    /// Flips an item's completion flag and returns the updated item.
    ///
    /// # Errors
    /// `Error::ListNotFound` / `Error::ItemNotFound` when either id is
    /// unknown.
    pub async fn toggle_item(&self, list_id: &str, item_id: &str) -> Result<Item> {
        let list = self.get_list(list_id)?;
        if !list.items.iter().any(|i| i.id == item_id) {
            return Err(Error::ItemNotFound {
                list_id: list_id.to_string(),
                item_id: item_id.to_string(),
            });
        }

        self.apply(ListsEvent::ItemToggled {
            list_id: list_id.to_string(),
            item_id: item_id.to_string(),
            at: Utc::now(),
        });
        let item = self
            .list_by_id(list_id)
            .and_then(|l| l.items.iter().find(|i| i.id == item_id).cloned())
            .ok_or_else(|| Error::ItemNotFound {
                list_id: list_id.to_string(),
                item_id: item_id.to_string(),
            })?;
        self.persist().await;
        Ok(item)
    }

    /// Stats for one list against its own budget. An unknown id yields the
    /// stats of an empty list.
    #[must_use]
    pub fn get_list_stats(&self, list_id: &str) -> ShoppingStats {
        self.list_by_id(list_id).map_or_else(
            || calculate_shopping_stats(&[], None),
            |list| calculate_shopping_stats(&list.items, list.budget_amount()),
        )
    }

    /// Number of lists.
    #[must_use]
    pub fn total_lists_count(&self) -> usize {
        self.state.read().lists.len()
    }

    /// Number of items across all lists.
    #[must_use]
    pub fn total_items_count(&self) -> usize {
        self.state.read().lists.iter().map(|l| l.items.len()).sum()
    }

    /// Sum of every list's total value.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.state
            .read()
            .lists
            .iter()
            .map(|l| calculate_shopping_stats(&l.items, None).total_value)
            .sum()
    }

    /// Clears the recorded error message.
    pub fn clear_error(&self) {
        self.apply(ListsEvent::ErrorCleared);
    }

    /// Snapshot of all lists.
    #[must_use]
    pub fn lists(&self) -> Vec<List> {
        self.state.read().lists.clone()
    }

    /// Snapshot of the full state.
    #[must_use]
    pub fn state(&self) -> ListsState {
        self.state.read().clone()
    }
}
