//! Theme preference store.
//!
//! Tracks the user's mode preference and the system color scheme, deriving
//! `is_dark` from the pair. The preference is written to storage before the
//! state changes, so a failed write leaves the previous theme in place.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::entities::{ColorScheme, Theme, ThemeMode, DARK_THEME, LIGHT_THEME};
use crate::errors::Result;
use crate::storage::{keys, Storage};
use crate::store::Reducer;

/// Theme store state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    /// User preference
    pub mode: ThemeMode,
    /// Resolved darkness: dark mode, or auto with a dark system scheme
    pub is_dark: bool,
    /// Last reported system color scheme
    pub system_theme: ColorScheme,
}

/// Theme state transitions.
#[derive(Clone, Debug)]
pub enum ThemeEvent {
    /// The user picked a mode
    ModeSet(ThemeMode),
    /// The host platform reported an appearance change
    SystemThemeChanged(ColorScheme),
}

/// Pure reducer for [`ThemeState`].
pub struct ThemeReducer;

impl Reducer for ThemeReducer {
    type State = ThemeState;
    type Event = ThemeEvent;

    fn reduce(state: Self::State, event: Self::Event) -> Self::State {
        let next = match event {
            ThemeEvent::ModeSet(mode) => ThemeState { mode, ..state },
            ThemeEvent::SystemThemeChanged(system_theme) => ThemeState {
                system_theme,
                ..state
            },
        };
        ThemeState {
            is_dark: resolve_is_dark(next.mode, next.system_theme),
            ..next
        }
    }
}

fn resolve_is_dark(mode: ThemeMode, system_theme: ColorScheme) -> bool {
    mode == ThemeMode::Dark || (mode == ThemeMode::Auto && system_theme == ColorScheme::Dark)
}

/// Owns the theme state and persists the mode preference.
pub struct ThemeStore {
    state: RwLock<ThemeState>,
    storage: Arc<dyn Storage>,
}

impl ThemeStore {
    /// Creates a store over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            state: RwLock::new(ThemeState::default()),
            storage,
        }
    }

    fn apply(&self, event: ThemeEvent) {
        let mut state = self.state.write();
        *state = ThemeReducer::reduce(state.clone(), event);
    }

    /// Loads the persisted mode preference.
    ///
    /// An absent or unrecognized stored value falls back to
    /// [`ThemeMode::Auto`].
    pub async fn load(&self) {
        let mode = match self.storage.get(keys::THEME_PREFERENCE).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                warn!(stored = %raw, "Unknown stored theme mode, falling back to auto");
                ThemeMode::Auto
            }),
            Ok(None) => ThemeMode::Auto,
            Err(e) => {
                warn!(error = %e, "Failed to load theme preference");
                ThemeMode::Auto
            }
        };
        self.apply(ThemeEvent::ModeSet(mode));
    }

    /// Sets and persists the mode preference.
    ///
    /// # Errors
    /// Returns the storage error when the preference cannot be written; the
    /// in-memory state is left unchanged in that case.
    pub async fn set_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        self.storage
            .set(keys::THEME_PREFERENCE, mode.as_str())
            .await?;
        self.apply(ThemeEvent::ModeSet(mode));
        debug!(mode = %mode, "Theme mode updated");
        Ok(())
    }

    /// Switches to the opposite of the currently resolved appearance.
    ///
    /// # Errors
    /// Propagates the persistence error from [`Self::set_theme_mode`].
    pub async fn toggle_theme(&self) -> Result<()> {
        let target = if self.is_dark() {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        self.set_theme_mode(target).await
    }

    /// Reacts to a system appearance change without touching the stored
    /// preference.
    pub fn system_theme_changed(&self, scheme: ColorScheme) {
        self.apply(ThemeEvent::SystemThemeChanged(scheme));
    }

    /// The active palette for the resolved appearance.
    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        if self.is_dark() {
            &DARK_THEME
        } else {
            &LIGHT_THEME
        }
    }

    /// Current mode preference.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.state.read().mode
    }

    /// Whether the resolved appearance is dark.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.state.read().is_dark
    }

    /// Last reported system color scheme.
    #[must_use]
    pub fn system_theme(&self) -> ColorScheme {
        self.state.read().system_theme
    }

    /// Snapshot of the full state.
    #[must_use]
    pub fn state(&self) -> ThemeState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::Result;
    use crate::storage::MemoryStorage;

    fn store() -> ThemeStore {
        ThemeStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_is_dark_resolution_table() {
        let cases = [
            (ThemeMode::Light, ColorScheme::Light, false),
            (ThemeMode::Light, ColorScheme::Dark, false),
            (ThemeMode::Dark, ColorScheme::Light, true),
            (ThemeMode::Dark, ColorScheme::Dark, true),
            (ThemeMode::Auto, ColorScheme::Light, false),
            (ThemeMode::Auto, ColorScheme::Dark, true),
        ];
        for (mode, system, expected) in cases {
            let state = ThemeReducer::reduce(
                ThemeReducer::reduce(ThemeState::default(), ThemeEvent::SystemThemeChanged(system)),
                ThemeEvent::ModeSet(mode),
            );
            assert_eq!(state.is_dark, expected, "mode {mode:?} system {system:?}");
        }
    }

    #[tokio::test]
    async fn test_set_theme_mode_persists_preference() -> Result<()> {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::new(Arc::clone(&storage) as Arc<dyn Storage>);

        store.set_theme_mode(ThemeMode::Dark).await?;
        assert!(store.is_dark());
        assert_eq!(
            storage.get(keys::THEME_PREFERENCE).await?.as_deref(),
            Some("dark")
        );

        // A fresh store sees the saved preference
        let reloaded = ThemeStore::new(storage);
        reloaded.load().await;
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
        assert!(reloaded.is_dark());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_defaults_to_auto_on_unknown_value() -> Result<()> {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::THEME_PREFERENCE, "sepia").await?;

        let store = ThemeStore::new(storage);
        store.load().await;
        assert_eq!(store.mode(), ThemeMode::Auto);
        Ok(())
    }

    #[tokio::test]
    async fn test_system_change_updates_auto_but_not_preference() -> Result<()> {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::new(Arc::clone(&storage) as Arc<dyn Storage>);
        store.set_theme_mode(ThemeMode::Auto).await?;
        assert!(!store.is_dark());

        store.system_theme_changed(ColorScheme::Dark);
        assert!(store.is_dark());
        assert_eq!(store.mode(), ThemeMode::Auto);
        // The stored preference is untouched
        assert_eq!(
            storage.get(keys::THEME_PREFERENCE).await?.as_deref(),
            Some("auto")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_system_change_does_not_override_explicit_mode() {
        let store = store();
        store.system_theme_changed(ColorScheme::Dark);
        assert!(store.is_dark());

        store.set_theme_mode(ThemeMode::Light).await.unwrap();
        assert!(!store.is_dark());
        store.system_theme_changed(ColorScheme::Light);
        store.system_theme_changed(ColorScheme::Dark);
        assert!(!store.is_dark());
    }

    #[tokio::test]
    async fn test_toggle_flips_resolved_appearance() -> Result<()> {
        let store = store();
        store.toggle_theme().await?;
        assert_eq!(store.mode(), ThemeMode::Dark);
        store.toggle_theme().await?;
        assert_eq!(store.mode(), ThemeMode::Light);
        Ok(())
    }

    #[test]
    fn test_active_palette_follows_resolved_mode() {
        let store = store();
        assert_eq!(store.theme(), &LIGHT_THEME);
        store.apply(ThemeEvent::ModeSet(ThemeMode::Dark));
        assert_eq!(store.theme(), &DARK_THEME);
    }
}
