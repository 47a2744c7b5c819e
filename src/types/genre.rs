// TVA classification scheme genres

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BinaryError, Result};

/// Publication year of the TVA classification schemes referenced by the
/// binary encoding.
const CS_YEAR: &str = "2002";

/// The fixed table of classification schemes addressable by the 4-bit
/// scheme code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenreScheme {
    Intention,
    Format,
    Content,
    IntendedAudience,
    Origination,
    ContentAlert,
    MediaType,
    Atmosphere,
}

impl GenreScheme {
    /// The 4-bit wire code for this scheme.
    pub fn code(self) -> u8 {
        match self {
            GenreScheme::Intention => 1,
            GenreScheme::Format => 2,
            GenreScheme::Content => 3,
            GenreScheme::IntendedAudience => 4,
            GenreScheme::Origination => 5,
            GenreScheme::ContentAlert => 6,
            GenreScheme::MediaType => 7,
            GenreScheme::Atmosphere => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(GenreScheme::Intention),
            2 => Some(GenreScheme::Format),
            3 => Some(GenreScheme::Content),
            4 => Some(GenreScheme::IntendedAudience),
            5 => Some(GenreScheme::Origination),
            6 => Some(GenreScheme::ContentAlert),
            7 => Some(GenreScheme::MediaType),
            8 => Some(GenreScheme::Atmosphere),
            _ => None,
        }
    }

    /// Scheme name as it appears in the URN.
    pub fn name(self) -> &'static str {
        match self {
            GenreScheme::Intention => "IntentionCS",
            GenreScheme::Format => "FormatCS",
            GenreScheme::Content => "ContentCS",
            GenreScheme::IntendedAudience => "IntendedAudienceCS",
            GenreScheme::Origination => "OriginationCS",
            GenreScheme::ContentAlert => "ContentAlertCS",
            GenreScheme::MediaType => "MediaTypeCS",
            GenreScheme::Atmosphere => "AtmosphereCS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "IntentionCS" => Some(GenreScheme::Intention),
            "FormatCS" => Some(GenreScheme::Format),
            "ContentCS" => Some(GenreScheme::Content),
            "IntendedAudienceCS" => Some(GenreScheme::IntendedAudience),
            "OriginationCS" => Some(GenreScheme::Origination),
            "ContentAlertCS" => Some(GenreScheme::ContentAlert),
            "MediaTypeCS" => Some(GenreScheme::MediaType),
            "AtmosphereCS" => Some(GenreScheme::Atmosphere),
            _ => None,
        }
    }
}

/// A genre term: classification scheme plus the sub-levels after the
/// leading term level. TVA term ids repeat the scheme code as their
/// first dotted segment, so `urn:...:ContentCS:2002:3.6.8` is scheme
/// Content with sub-levels `[6, 8]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub scheme: GenreScheme,
    pub sublevels: Vec<u8>,
}

impl Genre {
    pub fn new(scheme: GenreScheme, sublevels: Vec<u8>) -> Self {
        Self { scheme, sublevels }
    }

    /// The textual URI form of this genre term.
    pub fn href(&self) -> String {
        let mut levels = self.scheme.code().to_string();
        for sublevel in &self.sublevels {
            levels.push('.');
            levels.push_str(&sublevel.to_string());
        }
        format!(
            "urn:tva:metadata:cs:{}:{}:{}",
            self.scheme.name(),
            CS_YEAR,
            levels
        )
    }

    /// Parse a genre from its URI form
    /// `urn:tva:metadata:cs:<Scheme>:<year>:<levels>`.
    pub fn from_href(href: &str) -> Result<Self> {
        let segments: Vec<&str> = href.split(':').collect();
        if segments.len() < 7 || segments[..4] != ["urn", "tva", "metadata", "cs"] {
            return Err(BinaryError::InvalidGenreHref {
                href: href.to_string(),
            });
        }
        let scheme =
            GenreScheme::from_name(segments[4]).ok_or_else(|| BinaryError::InvalidGenreHref {
                href: href.to_string(),
            })?;
        let mut levels = Vec::new();
        for level in segments[6].split('.') {
            let level = level
                .parse::<u8>()
                .map_err(|_| BinaryError::InvalidGenreHref {
                    href: href.to_string(),
                })?;
            levels.push(level);
        }
        // The leading term level repeats the scheme code; keep only the
        // sub-levels below it.
        let sublevels = match levels.split_first() {
            Some((first, rest)) if *first == scheme.code() => rest.to_vec(),
            _ => levels,
        };
        Ok(Self { scheme, sublevels })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_table() {
        for code in 1..=8 {
            let scheme = GenreScheme::from_code(code).unwrap();
            assert_eq!(scheme.code(), code);
            assert_eq!(GenreScheme::from_name(scheme.name()), Some(scheme));
        }
        assert!(GenreScheme::from_code(0).is_none());
        assert!(GenreScheme::from_code(9).is_none());
    }

    #[test]
    fn test_href_round_trip() {
        let genre = Genre::new(GenreScheme::Content, vec![6, 8]);
        assert_eq!(genre.href(), "urn:tva:metadata:cs:ContentCS:2002:3.6.8");
        assert_eq!(Genre::from_href(&genre.href()).unwrap(), genre);
    }

    #[test]
    fn test_href_without_sublevels() {
        let genre = Genre::new(GenreScheme::Atmosphere, vec![]);
        assert_eq!(genre.href(), "urn:tva:metadata:cs:AtmosphereCS:2002:8");
        assert_eq!(Genre::from_href(&genre.href()).unwrap(), genre);
    }

    #[test]
    fn test_bad_href_rejected() {
        assert!(Genre::from_href("urn:tva:metadata:cs:NoSuchCS:2002:1.2").is_err());
        assert!(Genre::from_href("http://example.com/genre").is_err());
        assert!(Genre::from_href("urn:tva:metadata:cs:ContentCS:2002:3.x").is_err());
    }
}
