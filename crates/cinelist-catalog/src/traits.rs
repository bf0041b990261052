use async_trait::async_trait;
use cinelist_models::{Category, Title, TitleDetails, TitleKind};
use crate::error::CatalogError;

/// Read-only access to the remote movie/series catalog.
///
/// Every call is a single independent request with no retries; callers
/// decide how to fan out and how to surface failures.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn list_by_category(&self, category: Category) -> Result<Vec<Title>, CatalogError>;

    async fn get_details(&self, id: u64, kind: TitleKind) -> Result<TitleDetails, CatalogError>;

    /// Movies and series matching `query`; other result types are dropped
    async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError>;
}
