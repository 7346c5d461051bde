//! Theme entities - mode selection and the two color palettes.
//!
//! Palettes are compile-time constants of semantic tokens; the active one
//! is picked from the resolved mode, never mutated.

use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// User-selected theme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    /// Always light
    Light,
    /// Always dark
    Dark,
    /// Follow the system color scheme (the default)
    #[default]
    Auto,
}

impl ThemeMode {
    /// Stable string form used for persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            other => Err(Error::Config {
                message: format!("Unknown theme mode: {other}"),
            }),
        }
    }
}

/// Color scheme reported by the host platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// Light system appearance (the default)
    #[default]
    Light,
    /// Dark system appearance
    Dark,
}

/// Semantic color tokens for one palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub primary: &'static str,
    pub primary_light: &'static str,
    pub primary_dark: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub white: &'static str,
}

pub const LIGHT_THEME: Theme = Theme {
    primary: "#2DA62D",
    primary_light: "#C3E6C3",
    primary_dark: "#1D641D",
    secondary: "#FFC107",
    background: "#FFFFFF",
    surface: "#FFFFFF",
    text: "#212121",
    text_secondary: "#757575",
    border: "#E0E0E0",
    success: "#4CAF50",
    error: "#F44336",
    warning: "#FF9800",
    info: "#2196F3",
    white: "#FFFFFF",
};

pub const DARK_THEME: Theme = Theme {
    primary: "#51B651",
    primary_light: "#9DD69D",
    primary_dark: "#154315",
    secondary: "#FFCA28",
    background: "#121212",
    surface: "#1E1E1E",
    text: "#FFFFFF",
    text_secondary: "#BDBDBD",
    border: "#616161",
    success: "#66BB6A",
    error: "#EF5350",
    warning: "#FFA726",
    info: "#42A5F5",
    white: "#FFFFFF",
};

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_mode_round_trips_through_string_form() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto] {
            assert_eq!(mode.as_str().parse::<ThemeMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_mode_string_is_rejected() {
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_palettes_differ_where_it_matters() {
        assert_ne!(LIGHT_THEME.background, DARK_THEME.background);
        assert_ne!(LIGHT_THEME.text, DARK_THEME.text);
        assert_eq!(LIGHT_THEME.white, DARK_THEME.white);
    }
}
