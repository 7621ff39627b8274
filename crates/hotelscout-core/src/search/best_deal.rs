//! Paginated best-deal search, used by /bestdeal.
//!
//! The provider returns pages pre-sorted by distance from the city center,
//! ascending. Pages are fetched sequentially and merged into a final answer
//! honoring the accepted distance window and the requested result count,
//! without ever materializing the full result set: at most two pages plus
//! the in-window accumulator are held in memory.

use tracing::{debug, warn};

use crate::error::Result;
use crate::search::model::{HotelRecord, SearchOutcome};
use crate::search::service::HotelProvider;
use crate::search::simple_sort::simple_sort_search;
use crate::session::{QueryParams, SortOrder};

const PARTIAL_RESULT_NOTE: &str =
    "Errors occurred while querying the provider. The result may be incomplete!";

const NO_DISTANCE_NOTE: &str = "No hotels with a known distance from the city center were found \
in this location. Showing hotels by ascending price instead (as /lowprice does).";

/// What to do with the records of one fetched page.
#[derive(Debug, Clone, PartialEq)]
enum PageDecision {
    /// Fetch the next page, carrying this page along for potential padding
    Advance { carry_as_previous: Vec<HotelRecord> },
    /// Stop and deliver this record set after the final sort
    Finalize { records: Vec<HotelRecord>, note: String },
}

/// Incremental best-deal aggregation over distance-sorted pages.
pub struct BestDealSearch<'a> {
    provider: &'a dyn HotelProvider,
    params: &'a QueryParams,
    /// Accepted `[min, max]` distance window in km
    dist_range: (f64, f64),
    requested_size: usize,
    /// Fixed page size enforced by the provider
    page_size: usize,
    page_number: u32,
    /// Next page number as last reported by the provider
    next_page_number: u32,
}

impl<'a> BestDealSearch<'a> {
    pub fn new(
        provider: &'a dyn HotelProvider,
        params: &'a QueryParams,
        dist_range: (f64, f64),
        requested_size: usize,
        page_size: usize,
    ) -> Self {
        Self {
            provider,
            params,
            dist_range,
            requested_size,
            page_size,
            page_number: 1,
            next_page_number: 1,
        }
    }

    /// The provider signals the last page by reporting a next page number
    /// that does not advance.
    fn is_last_page(&self) -> bool {
        self.page_number >= self.next_page_number
    }

    /// Runs the per-page decision loop to completion.
    ///
    /// The loop terminates because the page number strictly increases on
    /// every non-terminal iteration and the provider signals a last page.
    pub async fn run(mut self) -> Result<SearchOutcome> {
        let mut accumulated: Vec<HotelRecord> = Vec::new();
        let mut previous_page: Vec<HotelRecord> = Vec::new();

        loop {
            let fetched = self
                .provider
                .find_hotels(self.params, self.page_number, self.page_size)
                .await;

            let page = match fetched {
                Err(err) if accumulated.is_empty() => return Err(err),
                Err(err) => {
                    // Partial data beats no data: deliver what was gathered,
                    // flagged as possibly incomplete.
                    warn!(page = self.page_number, error = %err, "page fetch failed, finalizing partial result");
                    return Ok(self.finalize(accumulated, PARTIAL_RESULT_NOTE.to_string()));
                }
                Ok(page) => page,
            };

            if page.records.is_empty() {
                if accumulated.is_empty() {
                    return Ok(SearchOutcome::default());
                }
                // Clean end of data, no note beyond the size check.
                return Ok(self.finalize(accumulated, String::new()));
            }

            // Records without a reported distance cannot be window-filtered.
            let with_dist: Vec<HotelRecord> = page
                .records
                .into_iter()
                .filter(|h| h.to_center_exact.is_some())
                .collect();
            if with_dist.is_empty() {
                // This provider response is incompatible with distance
                // filtering; fall back to a plain ascending price sort.
                let mut fallback = self.params.clone();
                fallback.sort_order = Some(SortOrder::PriceAscending);
                let outcome =
                    simple_sort_search(self.provider, &fallback, self.requested_size).await?;
                let note = if outcome.note.is_empty() {
                    NO_DISTANCE_NOTE.to_string()
                } else {
                    format!("{NO_DISTANCE_NOTE}\n{}", outcome.note)
                };
                return Ok(SearchOutcome::new(outcome.hotels, note));
            }

            debug!(
                page = self.page_number,
                records = with_dist.len(),
                accumulated = accumulated.len(),
                "best-deal page fetched"
            );

            // Window left of the page: decidable without pagination state.
            if self.window_is_left_of(&with_dist) {
                let decision = Self::decide_window_left(with_dist, &mut accumulated, self.requested_size);
                match decision {
                    PageDecision::Finalize { records, note } => return Ok(self.finalize(records, note)),
                    PageDecision::Advance { .. } => unreachable!("left-of-window always finalizes"),
                }
            }

            self.next_page_number = page.next_page_number;

            let decision = if self.window_is_right_of(&with_dist) {
                Self::decide_window_right(
                    with_dist,
                    std::mem::take(&mut previous_page),
                    self.requested_size,
                    self.is_last_page(),
                )
            } else {
                Self::decide_window_intersects(
                    with_dist,
                    &mut accumulated,
                    self.dist_range,
                    self.requested_size,
                    self.is_last_page(),
                )
            };

            match decision {
                PageDecision::Finalize { records, note } => return Ok(self.finalize(records, note)),
                PageDecision::Advance { carry_as_previous } => {
                    previous_page = carry_as_previous;
                    self.page_number += 1;
                }
            }
        }
    }

    /// The whole window lies before this page's closest hotel. Since data is
    /// distance-sorted, no later page can contain in-window records either.
    fn window_is_left_of(&self, page: &[HotelRecord]) -> bool {
        let min_page = page.first().and_then(|h| h.to_center_exact).unwrap_or(0.0);
        self.dist_range.1 < min_page
    }

    /// The whole window lies beyond this page's farthest hotel.
    fn window_is_right_of(&self, page: &[HotelRecord]) -> bool {
        let max_page = page.last().and_then(|h| h.to_center_exact).unwrap_or(0.0);
        max_page < self.dist_range.0
    }

    /// Window entirely left of the page. Prior pages win when they already
    /// produced matches; otherwise the page's closest records substitute,
    /// with a note. (The asymmetry with the right-of-window case, which pads
    /// from the previous page instead, is intentional and preserved.)
    fn decide_window_left(
        page: Vec<HotelRecord>,
        accumulated: &mut Vec<HotelRecord>,
        requested_size: usize,
    ) -> PageDecision {
        if !accumulated.is_empty() {
            return PageDecision::Finalize {
                records: std::mem::take(accumulated),
                note: String::new(),
            };
        }
        let min_page = page.first().and_then(|h| h.to_center_exact).unwrap_or(0.0);
        let closest: Vec<HotelRecord> = page.into_iter().take(requested_size).collect();
        PageDecision::Finalize {
            records: closest,
            note: format!(
                "No hotel falls within the requested distance window. The minimum \
distance from the center is {min_page} km. Showing the closest hotels available!"
            ),
        }
    }

    /// Window entirely right of the page. Advance while pages remain; on the
    /// last page the window is unreachable, so the farthest records
    /// substitute, padded from the previous page when the final page is short.
    fn decide_window_right(
        page: Vec<HotelRecord>,
        mut previous_page: Vec<HotelRecord>,
        requested_size: usize,
        is_last_page: bool,
    ) -> PageDecision {
        if !is_last_page {
            return PageDecision::Advance {
                carry_as_previous: page,
            };
        }
        let max_page = page.last().and_then(|h| h.to_center_exact).unwrap_or(0.0);
        let note = format!(
            "No hotel falls within the requested distance window. The maximum \
distance from the center is {max_page} km. Showing the most distant hotels available!"
        );
        let pool = if page.len() < requested_size {
            previous_page.extend(page);
            previous_page
        } else {
            page
        };
        let skip = pool.len().saturating_sub(requested_size);
        PageDecision::Finalize {
            records: pool.into_iter().skip(skip).collect(),
            note,
        }
    }

    /// Window intersects the page: accumulate the in-window subset. Stop when
    /// enough records are gathered and the window's right edge lies below the
    /// page's maximum (no further in-window records can exist on later,
    /// more-distant pages), or unconditionally on the last page.
    fn decide_window_intersects(
        page: Vec<HotelRecord>,
        accumulated: &mut Vec<HotelRecord>,
        dist_range: (f64, f64),
        requested_size: usize,
        is_last_page: bool,
    ) -> PageDecision {
        let (min_d, max_d) = dist_range;
        let max_page = page.last().and_then(|h| h.to_center_exact).unwrap_or(0.0);
        accumulated.extend(page.into_iter().filter(|h| {
            h.to_center_exact
                .map(|d| min_d <= d && d <= max_d)
                .unwrap_or(false)
        }));
        if (accumulated.len() >= requested_size && max_d < max_page) || is_last_page {
            PageDecision::Finalize {
                records: std::mem::take(accumulated),
                note: String::new(),
            }
        } else {
            PageDecision::Advance {
                carry_as_previous: Vec::new(),
            }
        }
    }

    /// Final sort by the composite key (exact price, then exact distance),
    /// truncation to the requested size, and the short-result note.
    fn finalize(&self, mut records: Vec<HotelRecord>, note: String) -> SearchOutcome {
        records.sort_by(|a, b| {
            a.price_exact.total_cmp(&b.price_exact).then_with(|| {
                a.to_center_exact
                    .unwrap_or(f64::MAX)
                    .total_cmp(&b.to_center_exact.unwrap_or(f64::MAX))
            })
        });
        records.truncate(self.requested_size);
        SearchOutcome::new(records, note).with_size_note(self.requested_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: f64, dist: f64) -> HotelRecord {
        HotelRecord {
            name: format!("hotel {price}/{dist}"),
            address: String::new(),
            price_exact: price,
            price: format!("${price}"),
            price_info: String::new(),
            to_center: format!("{dist} km"),
            to_center_exact: Some(dist),
            photo_url: String::new(),
        }
    }

    #[test]
    fn test_window_left_prefers_accumulated_without_note() {
        let mut accumulated = vec![record(100.0, 1.0), record(90.0, 1.1)];
        let page = vec![record(10.0, 2.0), record(20.0, 2.2)];

        let decision = BestDealSearch::decide_window_left(page, &mut accumulated, 5);

        match decision {
            PageDecision::Finalize { records, note } => {
                assert_eq!(records.len(), 2);
                assert!(note.is_empty());
            }
            PageDecision::Advance { .. } => panic!("expected finalize"),
        }
    }

    #[test]
    fn test_window_left_substitutes_closest_with_note() {
        let mut accumulated = Vec::new();
        let page = vec![record(30.0, 0.7), record(10.0, 0.8), record(20.0, 0.9)];

        let decision = BestDealSearch::decide_window_left(page, &mut accumulated, 2);

        match decision {
            PageDecision::Finalize { records, note } => {
                // First N by distance order, not the cheapest of the page
                assert_eq!(records[0].to_center_exact, Some(0.7));
                assert_eq!(records[1].to_center_exact, Some(0.8));
                assert!(note.contains("minimum distance from the center is 0.7"));
            }
            PageDecision::Advance { .. } => panic!("expected finalize"),
        }
    }

    #[test]
    fn test_window_right_advances_until_last_page() {
        let page = vec![record(10.0, 1.0)];
        let decision = BestDealSearch::decide_window_right(page.clone(), Vec::new(), 3, false);
        assert_eq!(
            decision,
            PageDecision::Advance {
                carry_as_previous: page
            }
        );
    }

    #[test]
    fn test_window_right_pads_short_last_page_from_previous() {
        let previous = vec![record(10.0, 1.0), record(20.0, 1.1)];
        let page = vec![record(30.0, 1.5)];

        let decision = BestDealSearch::decide_window_right(page, previous, 2, true);

        match decision {
            PageDecision::Finalize { records, note } => {
                // Last N of previous + current
                assert_eq!(records[0].to_center_exact, Some(1.1));
                assert_eq!(records[1].to_center_exact, Some(1.5));
                assert!(note.contains("maximum distance from the center is 1.5"));
            }
            PageDecision::Advance { .. } => panic!("expected finalize"),
        }
    }

    #[test]
    fn test_intersection_stops_when_window_exhausted_on_page() {
        let mut accumulated = Vec::new();
        let page = vec![record(10.0, 1.0), record(20.0, 1.2), record(30.0, 1.6)];

        // Window right edge 1.3 is below the page maximum 1.6, and two
        // records satisfy the requested size of two.
        let decision = BestDealSearch::decide_window_intersects(
            page,
            &mut accumulated,
            (1.0, 1.3),
            2,
            false,
        );

        match decision {
            PageDecision::Finalize { records, .. } => assert_eq!(records.len(), 2),
            PageDecision::Advance { .. } => panic!("expected finalize"),
        }
    }

    #[test]
    fn test_intersection_advances_when_window_may_continue() {
        let mut accumulated = Vec::new();
        let page = vec![record(10.0, 1.0), record(20.0, 1.2)];

        // Page maximum equals the window's right edge: later pages may still
        // hold in-window records.
        let decision = BestDealSearch::decide_window_intersects(
            page,
            &mut accumulated,
            (1.0, 1.2),
            2,
            false,
        );

        assert_eq!(
            decision,
            PageDecision::Advance {
                carry_as_previous: Vec::new()
            }
        );
        assert_eq!(accumulated.len(), 2);
    }
}
