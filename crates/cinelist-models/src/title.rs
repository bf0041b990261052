use serde::{Deserialize, Serialize};
use crate::kind::TitleKind;

/// A movie or series as returned by TMDB list and search endpoints.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`;
/// both shapes deserialize into this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Title {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
    /// Only present on multi-search and trending results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Title {
    /// `title` when set, otherwise `name`; empty strings count as unset.
    pub fn display_name(&self) -> &str {
        [self.title.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    pub fn release_date_any(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Release year parsed from whichever date field is set
    pub fn year(&self) -> Option<u32> {
        self.release_date_any()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    pub fn kind(&self) -> Option<TitleKind> {
        match self.media_type.as_deref() {
            Some("movie") => Some(TitleKind::Movie),
            Some("tv") => Some(TitleKind::Series),
            _ => None,
        }
    }
}
