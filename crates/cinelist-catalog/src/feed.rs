use cinelist_models::{Category, Feed, Title, TitleKind};
use tracing::{info, warn};
use crate::error::CatalogError;
use crate::traits::CatalogSource;

/// The four home-screen rows for one kind of title
#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    pub kind: TitleKind,
    pub now_playing: Vec<Title>,
    pub trending: Vec<Title>,
    pub popular: Vec<Title>,
    pub top_rated: Vec<Title>,
}

impl HomeFeed {
    pub fn sections(&self) -> [(Feed, &[Title]); 4] {
        [
            (Feed::NowPlaying, self.now_playing.as_slice()),
            (Feed::Trending, self.trending.as_slice()),
            (Feed::Popular, self.popular.as_slice()),
            (Feed::TopRated, self.top_rated.as_slice()),
        ]
    }

    /// Title featured at the top of the home screen, picked from "now playing"
    pub fn highlight(&self, seed: u64) -> Option<&Title> {
        if self.now_playing.is_empty() {
            return None;
        }
        let index = (seed % self.now_playing.len() as u64) as usize;
        self.now_playing.get(index)
    }
}

/// Fetches all four categories concurrently. Any failure fails the whole
/// feed so a partial home screen is never shown.
pub async fn load_home_feed(
    source: &dyn CatalogSource,
    kind: TitleKind,
) -> Result<HomeFeed, CatalogError> {
    let fetch = |feed| source.list_by_category(Category::new(feed, kind));

    let result = futures::try_join!(
        fetch(Feed::NowPlaying),
        fetch(Feed::Trending),
        fetch(Feed::Popular),
        fetch(Feed::TopRated),
    );

    match result {
        Ok((now_playing, trending, popular, top_rated)) => {
            info!(
                "Loaded {} home feed from {} ({} / {} / {} / {} titles)",
                kind,
                source.source_name(),
                now_playing.len(),
                trending.len(),
                popular.len(),
                top_rated.len()
            );
            Ok(HomeFeed {
                kind,
                now_playing,
                trending,
                popular,
                top_rated,
            })
        }
        Err(e) => {
            warn!("Failed to load {} home feed: {}", kind, e);
            Err(e)
        }
    }
}
