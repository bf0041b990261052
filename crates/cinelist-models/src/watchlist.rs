use serde::{Deserialize, Deserializer, Serialize};
use crate::kind::TitleKind;
use crate::title::Title;

/// Identity of a watchlist entry: the same id may exist once per kind
pub type EntryKey = (u64, TitleKind);

/// One favorited title, in the persisted layout shared with earlier sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TitleKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64, // Rating when added, not refreshed
    #[serde(rename = "addedAt")]
    pub added_at: i64, // Milliseconds since epoch
}

/// Earlier sessions wrote `null` for unknown titles and ratings
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WatchlistEntry {
    pub fn from_title(title: &Title, kind: TitleKind, added_at: i64) -> Self {
        Self {
            id: title.id,
            kind,
            title: title.display_name().to_string(),
            poster_path: title.poster_path.clone(),
            backdrop_path: title.backdrop_path.clone(),
            vote_average: title.vote_average,
            added_at,
        }
    }

    pub fn key(&self) -> EntryKey {
        (self.id, self.kind)
    }

    pub fn matches(&self, id: u64, kind: TitleKind) -> bool {
        self.id == id && self.kind == kind
    }
}
