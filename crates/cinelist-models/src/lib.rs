pub mod catalog;
pub mod details;
pub mod kind;
pub mod theme;
pub mod title;
pub mod watchlist;

pub use catalog::{Category, Feed, PagedResponse};
pub use details::{CastMember, Credits, CrewMember, Genre, Network, ProductionCompany, TitleDetails};
pub use kind::{ParseKindError, TitleKind};
pub use theme::{interpolate, Rgb, ScrollTheme};
pub use title::Title;
pub use watchlist::{EntryKey, WatchlistEntry};
