//! Locale pair resolution.
//!
//! A storefront URL may carry a locale prefix as its first path segment
//! (`/fr-ca/products/shirt`). The [`Locale`] resolved from that segment
//! determines the language and country context sent to the Storefront API.
//!
//! Resolution never fails: anything that is not a `xx-yy` segment resolves to
//! [`Locale::DEFAULT`] (`EN`/`US`), and the default is indistinguishable from
//! an explicit `/en-us` prefix.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`LanguageCode`] or [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleCodeError {
    /// The input is not exactly two characters long.
    #[error("locale code must be exactly 2 letters (got {0:?})")]
    InvalidLength(String),
    /// The input contains something other than ASCII letters.
    #[error("locale code must contain only ASCII letters (got {0:?})")]
    InvalidCharacter(String),
}

/// Macro to define a two-letter, uppercase locale code.
///
/// Creates a `Copy` newtype around `[u8; 2]` that:
/// - accepts any ASCII-letter case on input and stores it uppercased
/// - serializes as a plain string (`"EN"`)
/// - implements `Display` and `FromStr`
macro_rules! define_code {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; 2]);

        impl $name {
            /// Parse a code from a two-letter string (any case).
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not exactly two ASCII letters.
            pub fn parse(s: &str) -> Result<Self, LocaleCodeError> {
                let [a, b] = <[u8; 2]>::try_from(s.as_bytes())
                    .map_err(|_| LocaleCodeError::InvalidLength(s.to_owned()))?;
                if !a.is_ascii_alphabetic() || !b.is_ascii_alphabetic() {
                    return Err(LocaleCodeError::InvalidCharacter(s.to_owned()));
                }
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }

            /// Returns the uppercase code as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                // Only ASCII letters are ever stored.
                core::str::from_utf8(&self.0).unwrap_or_default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LocaleCodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_code!(
    /// ISO 639-1 language code, stored uppercase (`EN`, `FR`).
    LanguageCode
);

define_code!(
    /// ISO 3166-1 alpha-2 country code, stored uppercase (`US`, `CA`).
    CountryCode
);

/// A (language, country) pair that determines content localization and
/// pricing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// Content language.
    pub language: LanguageCode,
    /// Buyer country (drives currency and availability).
    pub country: CountryCode,
}

/// Result of comparing a route's locale segment against the resolved locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixCheck {
    /// The segment names the resolved locale (case-insensitive).
    Matches,
    /// The segment is not shaped like a locale at all.
    NotALocale,
    /// The segment is locale-shaped but names a different locale.
    Mismatch(Locale),
}

impl Locale {
    /// The fallback locale used whenever a request carries no usable prefix.
    pub const DEFAULT: Self = Self {
        language: LanguageCode(*b"EN"),
        country: CountryCode(*b"US"),
    };

    /// Create a locale from its parts.
    #[must_use]
    pub const fn new(language: LanguageCode, country: CountryCode) -> Self {
        Self { language, country }
    }

    /// Parse a single path segment of the form `xx-yy` (case-insensitive).
    ///
    /// Returns `None` for anything else, including `xx_yy`, `xxx-yy` and
    /// segments with non-letter characters.
    #[must_use]
    pub fn parse_segment(segment: &str) -> Option<Self> {
        let (language, country) = segment.split_once('-')?;
        Some(Self {
            language: LanguageCode::parse(language).ok()?,
            country: CountryCode::parse(country).ok()?,
        })
    }

    /// Resolve the locale from a request path (`/fr-ca/products/x`).
    ///
    /// Only the first path segment is considered. A query string or fragment
    /// attached to the path is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        path.trim_start_matches('/')
            .split('/')
            .next()
            .and_then(Self::parse_segment)
            .unwrap_or(Self::DEFAULT)
    }

    /// Resolve the locale from an absolute URL or an origin-relative path.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let path = match url.split_once("://") {
            Some((_, rest)) => rest.find('/').and_then(|i| rest.get(i..)).unwrap_or(""),
            None => url,
        };
        Self::from_path(path)
    }

    /// The lowercase URL prefix for this locale (`fr-ca`).
    #[must_use]
    pub fn path_prefix(&self) -> String {
        format!(
            "{}-{}",
            self.language.as_str().to_ascii_lowercase(),
            self.country.as_str().to_ascii_lowercase()
        )
    }

    /// Compare a route's locale segment against this (resolved) locale.
    #[must_use]
    pub fn check_prefix(&self, segment: &str) -> PrefixCheck {
        match Self::parse_segment(segment) {
            Some(requested) if requested == *self => PrefixCheck::Matches,
            Some(requested) => PrefixCheck::Mismatch(requested),
            None => PrefixCheck::NotALocale,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.country)
    }
}
