//! Hotel provider trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::model::{HotelPage, LocationChoice};
use crate::session::QueryParams;

/// The search-provider boundary.
///
/// Implementations translate the typed query into the provider's wire
/// format and normalize its responses. Timeouts are the implementation's
/// responsibility and surface as ordinary `Provider` errors.
#[async_trait]
pub trait HotelProvider: Send + Sync {
    /// Resolves free text into city matches with their destination ids.
    ///
    /// An empty vector is a normal "no such city" result, not an error.
    async fn find_locations(&self, query: &str) -> Result<Vec<LocationChoice>>;

    /// Fetches one page of hotels for the given query.
    ///
    /// Pages are returned pre-sorted according to `params.sort_order`.
    async fn find_hotels(
        &self,
        params: &QueryParams,
        page_number: u32,
        page_size: usize,
    ) -> Result<HotelPage>;
}
