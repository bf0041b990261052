pub mod error;
pub mod feed;
pub mod images;
pub mod tmdb;
pub mod traits;

pub use error::CatalogError;
pub use feed::{load_home_feed, HomeFeed};
pub use images::image_url;
pub use tmdb::TmdbClient;
pub use traits::CatalogSource;
