use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminates movies from series, since TMDB reuses numeric ids across both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TitleKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl TitleKind {
    /// Wire name, as used by TMDB paths and the persisted watchlist
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Series => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TitleKind::Movie => "Movie",
            TitleKind::Series => "Series",
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown title kind '{}' (expected 'movie' or 'tv')", self.0)
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for TitleKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(TitleKind::Movie),
            "tv" | "series" | "show" => Ok(TitleKind::Series),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}
