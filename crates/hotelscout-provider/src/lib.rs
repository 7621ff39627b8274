//! Hotels RapidAPI adapter.
//!
//! Implements the [`hotelscout_core::search::HotelProvider`] boundary
//! against the `hotels4.p.rapidapi.com` endpoints: location lookup and the
//! paginated property listing. Responses are normalized into the core
//! domain records; upstream schema drift degrades to empty results instead
//! of failing the conversation.

pub mod parse;
pub mod rapid_api;

pub use rapid_api::RapidApiProvider;
