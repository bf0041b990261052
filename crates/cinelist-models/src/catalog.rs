use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::kind::TitleKind;

/// Paginated result envelope used by TMDB list and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    NowPlaying,
    Trending,
    Popular,
    TopRated,
}

impl Feed {
    pub const ALL: [Feed; 4] = [Feed::NowPlaying, Feed::Trending, Feed::Popular, Feed::TopRated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::NowPlaying => "now_playing",
            Feed::Trending => "trending",
            Feed::Popular => "popular",
            Feed::TopRated => "top_rated",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Feed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "now_playing" => Ok(Feed::NowPlaying),
            "trending" => Ok(Feed::Trending),
            "popular" => Ok(Feed::Popular),
            "top_rated" => Ok(Feed::TopRated),
            other => Err(format!(
                "Invalid feed: {}. Use 'now_playing', 'trending', 'popular', or 'top_rated'",
                other
            )),
        }
    }
}

/// A browsable list: one feed for one kind of title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub feed: Feed,
    pub kind: TitleKind,
}

impl Category {
    pub fn new(feed: Feed, kind: TitleKind) -> Self {
        Self { feed, kind }
    }

    /// TMDB v3 path for this category, relative to the API base URL
    pub fn endpoint(&self) -> &'static str {
        match (self.kind, self.feed) {
            (TitleKind::Movie, Feed::NowPlaying) => "movie/now_playing",
            (TitleKind::Movie, Feed::Trending) => "trending/movie/week",
            (TitleKind::Movie, Feed::Popular) => "movie/popular",
            (TitleKind::Movie, Feed::TopRated) => "movie/top_rated",
            (TitleKind::Series, Feed::NowPlaying) => "tv/on_the_air",
            (TitleKind::Series, Feed::Trending) => "trending/tv/week",
            (TitleKind::Series, Feed::Popular) => "tv/popular",
            (TitleKind::Series, Feed::TopRated) => "tv/top_rated",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.feed)
    }
}
