use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}', expected 'light' or 'dark'")),
        }
    }
}

/// Process-wide display preference. Initialised once at startup and
/// changed only through `set` / `toggle`. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct ThemePreference {
    cell: Arc<RwLock<Theme>>,
}

impl ThemePreference {
    pub fn init(initial: Theme) -> Self {
        Self {
            cell: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn get(&self) -> Theme {
        *self.cell.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, theme: Theme) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = theme;
    }

    /// Flips the theme and returns the new value.
    pub fn toggle(&self) -> Theme {
        let mut theme = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        *theme = theme.toggled();
        *theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        assert_eq!(ThemePreference::default().get(), Theme::Light);
    }

    #[test]
    fn test_toggle_round_trip() {
        let pref = ThemePreference::init(Theme::Light);
        assert_eq!(pref.toggle(), Theme::Dark);
        assert_eq!(pref.toggle(), Theme::Light);
    }

    #[test]
    fn test_clones_share_the_cell() {
        let pref = ThemePreference::init(Theme::Light);
        let other = pref.clone();
        other.set(Theme::Dark);
        assert_eq!(pref.get(), Theme::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert!("sepia".parse::<Theme>().is_err());
    }
}
