use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::labels::{Labels, EN, RU};

/// Language of a catalog and of every fixed label in the generated workbook.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ru];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }

    /// The JSON catalog shipped for this locale.
    pub(crate) fn builtin_catalog_json(self) -> &'static str {
        match self {
            Locale::En => include_str!("../assets/catalog.en.json"),
            Locale::Ru => include_str!("../assets/catalog.ru.json"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale `{0}` (expected one of: en, ru)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept region-qualified ids like `en-US` / `ru_RU`.
        let lang = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_and_region_ids() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("RU".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!("ru-RU".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!("en_GB".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "de".parse::<Locale>(),
            Err(UnknownLocale("de".to_string()))
        );
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for locale in Locale::ALL {
            assert_eq!(locale.to_string().parse::<Locale>(), Ok(locale));
        }
    }
}
