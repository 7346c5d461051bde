//! Entity module - Contains the data model shared across the crate.
//! Entities are plain serde types; derived values (stats, display names)
//! are computed on demand and never stored.

pub mod list;
pub mod theme;
pub mod user;

pub use list::{Item, ItemUpdate, List, ListType, ListUpdate, NewItem, NewList};
pub use theme::{ColorScheme, Theme, ThemeMode, DARK_THEME, LIGHT_THEME};
pub use user::{NewProfile, ProfileUpdate, User, UserRole};
