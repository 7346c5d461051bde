//! Reducer-driven state stores.
//!
//! Each store pairs a pure state-transition function with a thin async
//! shell that sequences storage I/O around it. The transition function is
//! the only place state changes happen, which keeps every mutation
//! unit-testable without a backend.

/// Authentication/session store
pub mod auth;
/// Shopping lists store
pub mod lists;
/// Theme preference store
pub mod theme;

pub use auth::{AuthEvent, AuthState, AuthStore};
pub use lists::{ListsEvent, ListsState, ListsStore};
pub use theme::{ThemeEvent, ThemeState, ThemeStore};

/// Pure state transition: `(State, Event) -> State`.
///
/// `reduce` must be a pure function with no side effects; the store's
/// async operations own all I/O.
pub trait Reducer {
    /// State the reducer operates on.
    type State: Clone + PartialEq + Default + Send + 'static;

    /// Event type the reducer handles.
    type Event: Send + 'static;

    /// Applies one event and returns the next state.
    fn reduce(state: Self::State, event: Self::Event) -> Self::State;
}
