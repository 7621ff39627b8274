//! Single-page price-sorted search, used by /lowprice and /highprice.
//!
//! Price-only sorting needs no cross-page reconciliation, so exactly one
//! page of the requested size is fetched.

use tracing::debug;

use crate::error::Result;
use crate::search::model::SearchOutcome;
use crate::search::service::HotelProvider;
use crate::session::QueryParams;

/// Requests one page of `requested_size` hotels already sorted by the
/// query's price order. Provider errors are surfaced verbatim; a short
/// page gets a "found only K" note.
pub async fn simple_sort_search(
    provider: &dyn HotelProvider,
    params: &QueryParams,
    requested_size: usize,
) -> Result<SearchOutcome> {
    let page = provider.find_hotels(params, 1, requested_size).await?;
    debug!(
        hotels = page.records.len(),
        requested = requested_size,
        "price-sorted page fetched"
    );
    Ok(SearchOutcome::new(page.records, "").with_size_note(requested_size))
}
