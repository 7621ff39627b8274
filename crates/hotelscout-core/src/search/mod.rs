//! Hotel search: domain models, the provider boundary, and the two
//! execution strategies (single-page price sort and paginated best-deal).

pub mod best_deal;
pub mod model;
pub mod service;
pub mod simple_sort;

pub use best_deal::BestDealSearch;
pub use model::{HotelPage, HotelRecord, LocationChoice, SearchOutcome};
pub use service::HotelProvider;
pub use simple_sort::simple_sort_search;
