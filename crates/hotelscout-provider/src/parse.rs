//! Response normalization for the hotels API.
//!
//! The upstream JSON is deeply nested and loosely specified; every field is
//! optional here and records missing the essentials (destination id, exact
//! price) are skipped rather than failing the whole page.

use serde::Deserialize;
use tracing::warn;

use hotelscout_core::search::{HotelPage, HotelRecord, LocationChoice};

const UNKNOWN: &str = "unknown";

/// Landmark labels under which the provider reports the city-center
/// distance, by locale.
const CITY_CENTER_LABELS: &[&str] = &["City center", "City centre", "Центр города"];

const THUMBNAIL_HOST: &str = "https://exp.cdn-hotels.com/";

// ============================================================================
// Location lookup
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub suggestions: Vec<SuggestionGroup>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionGroup {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub entities: Vec<LocationEntity>,
}

#[derive(Debug, Deserialize)]
pub struct LocationEntity {
    #[serde(rename = "destinationId")]
    pub destination_id: Option<String>,
    pub caption: Option<String>,
}

/// Extracts the city suggestions from a location response. Entities without
/// a usable id or caption are skipped.
pub fn parse_locations(response: LocationsResponse) -> Vec<LocationChoice> {
    let Some(city_group) = response
        .suggestions
        .into_iter()
        .find(|group| group.group == "CITY_GROUP")
    else {
        return Vec::new();
    };

    city_group
        .entities
        .into_iter()
        .filter_map(|entity| {
            let id: u64 = entity.destination_id?.parse().ok()?;
            let caption = entity.caption?;
            if caption.is_empty() {
                return None;
            }
            Some(LocationChoice {
                name: strip_highlight(&caption),
                destination_id: id,
            })
        })
        .collect()
}

/// Removes the search-term highlight markup the provider embeds in captions.
pub fn strip_highlight(caption: &str) -> String {
    caption
        .replace("<span class='highlighted'>", "")
        .replace("</span>", "")
}

// ============================================================================
// Hotel listing
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HotelsResponse {
    #[serde(default)]
    pub result: String,
    pub error_message: Option<String>,
    pub data: Option<HotelsData>,
}

#[derive(Debug, Deserialize)]
pub struct HotelsData {
    pub body: Option<HotelsBody>,
}

#[derive(Debug, Deserialize)]
pub struct HotelsBody {
    #[serde(rename = "searchResults")]
    pub search_results: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<RawHotel>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(rename = "nextPageNumber")]
    pub next_page_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawHotel {
    pub name: Option<String>,
    pub address: Option<RawAddress>,
    #[serde(rename = "ratePlan")]
    pub rate_plan: Option<RawRatePlan>,
    #[serde(default)]
    pub landmarks: Vec<RawLandmark>,
    #[serde(rename = "optimizedThumbUrls")]
    pub thumb_urls: Option<RawThumbUrls>,
}

#[derive(Debug, Deserialize)]
pub struct RawAddress {
    #[serde(rename = "streetAddress")]
    pub street_address: Option<String>,
    pub locality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawRatePlan {
    pub price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
pub struct RawPrice {
    #[serde(rename = "exactCurrent")]
    pub exact_current: Option<f64>,
    pub current: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawLandmark {
    #[serde(default)]
    pub label: String,
    pub distance: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawThumbUrls {
    #[serde(rename = "srpDesktop")]
    pub srp_desktop: Option<String>,
}

/// Normalizes a hotel-listing response into a page of records. A missing
/// search-results block is upstream schema drift: logged and treated as an
/// empty page.
pub fn parse_hotels(response: HotelsResponse, page_size: usize) -> HotelPage {
    let Some(search_results) = response
        .data
        .and_then(|data| data.body)
        .and_then(|body| body.search_results)
    else {
        warn!("hotel listing response is missing the search results block");
        return HotelPage::default();
    };

    let next_page_number = search_results
        .pagination
        .and_then(|p| p.next_page_number)
        .unwrap_or(0);

    let records = search_results
        .results
        .into_iter()
        .take(page_size)
        .filter_map(normalize_hotel)
        .collect();

    HotelPage {
        records,
        next_page_number,
    }
}

fn normalize_hotel(raw: RawHotel) -> Option<HotelRecord> {
    let price = raw.rate_plan.and_then(|plan| plan.price)?;
    // Records without an exact price cannot be ranked and are skipped
    let price_exact = price.exact_current?;

    let address = raw
        .address
        .map(|addr| {
            format!(
                "{}, {}",
                addr.street_address.unwrap_or_else(|| UNKNOWN.to_string()),
                addr.locality.unwrap_or_else(|| UNKNOWN.to_string())
            )
        })
        .unwrap_or_else(|| UNKNOWN.to_string());

    let (to_center, to_center_exact) = city_center_distance(&raw.landmarks);

    Some(HotelRecord {
        name: raw.name.unwrap_or_else(|| UNKNOWN.to_string()),
        address,
        price_exact,
        price: price.current.unwrap_or_else(|| UNKNOWN.to_string()),
        price_info: price.info.unwrap_or_else(|| UNKNOWN.to_string()),
        to_center,
        to_center_exact,
        photo_url: raw
            .thumb_urls
            .and_then(|urls| urls.srp_desktop)
            .and_then(|url| rewrite_thumbnail(&url))
            .unwrap_or_default(),
    })
}

/// Finds the city-center landmark and parses its displayed distance, e.g.
/// "1.2 km" or "0,4 km". The numeric part is absent when the provider does
/// not report it or the text is not parseable.
fn city_center_distance(landmarks: &[RawLandmark]) -> (String, Option<f64>) {
    let Some(landmark) = landmarks
        .iter()
        .find(|l| CITY_CENTER_LABELS.contains(&l.label.as_str()))
    else {
        return (UNKNOWN.to_string(), None);
    };
    let Some(display) = landmark.distance.clone() else {
        return (UNKNOWN.to_string(), None);
    };

    let exact = display
        .split_whitespace()
        .next()
        .and_then(|token| token.replace(',', ".").parse::<f64>().ok());
    (display, exact)
}

/// The provider hands out thumbnail URLs on a mirror host; rebase them onto
/// the CDN.
fn rewrite_thumbnail(url: &str) -> Option<String> {
    let start = url.find("hotels")?;
    Some(format!("{THUMBNAIL_HOST}{}", &url[start..]))
}
