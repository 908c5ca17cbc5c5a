// strata-core/src/ports/metadata.rs

// What the generator needs from a warehouse catalog, without knowing which one.

use async_trait::async_trait;

use crate::domain::metadata::TableSet;
use crate::error::StrataError;

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Tables of the requested datasets, columns merged and in ordinal order.
    async fn fetch_tables(&self, datasets: &[String]) -> Result<TableSet, StrataError>;

    fn source_name(&self) -> &str;
}
