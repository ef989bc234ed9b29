//! Creator settings: expiration, theme colors.

use std::{fmt, str::FromStr};

use secret_proto::SelectedColors;

use crate::error::SettingsError;

/// Supported secret lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// One hour.
    #[default]
    OneHour,
    /// One day.
    OneDay,
    /// One week.
    OneWeek,
}

impl Expiration {
    /// All supported choices, shortest first.
    pub const ALL: [Self; 3] = [Self::OneHour, Self::OneDay, Self::OneWeek];

    /// Lifetime in seconds (wire representation).
    pub fn as_secs(self) -> u64 {
        match self {
            Self::OneHour => 60 * 60,
            Self::OneDay => 24 * 60 * 60,
            Self::OneWeek => 7 * 24 * 60 * 60,
        }
    }

    /// Match a wire value back to a choice. `None` for unsupported values.
    pub fn from_secs(secs: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_secs() == secs)
    }
}

impl FromStr for Expiration {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "1h" | "hour" => Ok(Self::OneHour),
            "1d" | "day" => Ok(Self::OneDay),
            "1w" | "week" => Ok(Self::OneWeek),
            secs => secs
                .parse()
                .ok()
                .and_then(Self::from_secs)
                .ok_or_else(|| SettingsError::InvalidExpiration { value: s.to_string() }),
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_expiration(self.as_secs()))
    }
}

/// A `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeColor(String);

impl ThemeColor {
    /// The color string, including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ThemeColor {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == 7
            && s.starts_with('#')
            && s[1..].chars().all(|c| c.is_ascii_hexdigit());

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(SettingsError::InvalidColor { value: s.to_string() })
        }
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Light or dark appearance; selects the default theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    /// Light background, dark text.
    Light,
    /// Dark background, light text.
    #[default]
    Dark,
}

impl FromStr for Appearance {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(SettingsError::InvalidAppearance { value: s.to_string() }),
        }
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// One of the three theme color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    /// Background.
    Background,
    /// Foreground (text).
    Foreground,
    /// Accent.
    Accent,
}

/// The three colors a secret is presented with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTheme {
    /// Background color.
    pub background: ThemeColor,
    /// Foreground (text) color.
    pub foreground: ThemeColor,
    /// Accent color.
    pub accent: ThemeColor,
}

impl ColorTheme {
    /// Default theme for an appearance.
    pub fn for_appearance(appearance: Appearance) -> Self {
        let (background, foreground) = match appearance {
            Appearance::Dark => ("#1f2937", "#f9fafb"),
            Appearance::Light => ("#ffffff", "#111827"),
        };
        Self {
            background: ThemeColor(background.to_string()),
            foreground: ThemeColor(foreground.to_string()),
            accent: ThemeColor("#3b82f6".to_string()),
        }
    }

    /// Color in a slot.
    pub fn get(&self, slot: ColorSlot) -> &ThemeColor {
        match slot {
            ColorSlot::Background => &self.background,
            ColorSlot::Foreground => &self.foreground,
            ColorSlot::Accent => &self.accent,
        }
    }

    /// Replace the color in a slot.
    pub fn set(&mut self, slot: ColorSlot, color: ThemeColor) {
        match slot {
            ColorSlot::Background => self.background = color,
            ColorSlot::Foreground => self.foreground = color,
            ColorSlot::Accent => self.accent = color,
        }
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::for_appearance(Appearance::default())
    }
}

impl From<&ColorTheme> for SelectedColors {
    fn from(theme: &ColorTheme) -> Self {
        Self {
            foreground: theme.foreground.to_string(),
            background: theme.background.to_string(),
            accent: theme.accent.to_string(),
        }
    }
}

impl TryFrom<&SelectedColors> for ColorTheme {
    type Error = SettingsError;

    fn try_from(colors: &SelectedColors) -> Result<Self, Self::Error> {
        Ok(Self {
            background: colors.background.parse()?,
            foreground: colors.foreground.parse()?,
            accent: colors.accent.parse()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn appearance_parses_case_insensitively() {
        assert_eq!(" Light ".parse::<Appearance>(), Ok(Appearance::Light));
        assert_eq!("dark".parse::<Appearance>(), Ok(Appearance::Dark));
        assert!(matches!(
            "sepia".parse::<Appearance>(),
            Err(SettingsError::InvalidAppearance { .. })
        ));
        assert_eq!(Appearance::Light.to_string(), "light");
    }

    #[test]
    fn expiration_defaults_to_one_hour() {
        assert_eq!(Expiration::default().as_secs(), 3600);
    }

    #[test]
    fn expiration_secs_roundtrip() {
        for e in Expiration::ALL {
            assert_eq!(Expiration::from_secs(e.as_secs()), Some(e));
        }
        assert_eq!(Expiration::from_secs(42), None);
    }

    #[test]
    fn expiration_parses_short_forms() {
        assert_eq!("1d".parse::<Expiration>(), Ok(Expiration::OneDay));
        assert_eq!(" 1W ".parse::<Expiration>(), Ok(Expiration::OneWeek));
        assert!("2h".parse::<Expiration>().is_err());
        assert_eq!("86400".parse::<Expiration>(), Ok(Expiration::OneDay));
        assert!("42".parse::<Expiration>().is_err());
        assert!("-1".parse::<Expiration>().is_err());
    }

    #[test]
    fn color_validation() {
        assert!("#3b82f6".parse::<ThemeColor>().is_ok());
        assert!("#ABCDEF".parse::<ThemeColor>().is_ok());
        assert!("3b82f6".parse::<ThemeColor>().is_err());
        assert!("#3b82f".parse::<ThemeColor>().is_err());
        assert!("#3b82fg".parse::<ThemeColor>().is_err());
        assert!("#ééé".parse::<ThemeColor>().is_err());
    }

    #[test]
    fn theme_defaults_differ_by_appearance() {
        let dark = ColorTheme::for_appearance(Appearance::Dark);
        let light = ColorTheme::for_appearance(Appearance::Light);

        assert_eq!(dark.background.as_str(), "#1f2937");
        assert_eq!(light.background.as_str(), "#ffffff");
        assert_eq!(dark.accent, light.accent);
    }

    #[test]
    fn theme_set_replaces_one_slot() {
        let mut theme = ColorTheme::default();
        theme.set(ColorSlot::Accent, "#ff0000".parse().unwrap());

        assert_eq!(theme.get(ColorSlot::Accent).as_str(), "#ff0000");
        assert_eq!(theme.get(ColorSlot::Background).as_str(), "#1f2937");
    }

    #[test]
    fn theme_rejects_invalid_wire_colors() {
        let colors = SelectedColors {
            foreground: "white".into(),
            background: "#000000".into(),
            accent: "#3b82f6".into(),
        };
        assert!(ColorTheme::try_from(&colors).is_err());
    }
}
