//! RapidApiProvider - HTTP client for the hotels4 RapidAPI endpoints.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

use hotelscout_core::config::AppConfig;
use hotelscout_core::error::{Result, ScoutError};
use hotelscout_core::search::{HotelPage, HotelProvider, LocationChoice};
use hotelscout_core::session::QueryParams;

use crate::parse::{parse_hotels, parse_locations, HotelsResponse, LocationsResponse};

const LOCATION_URL: &str = "https://hotels4.p.rapidapi.com/locations/search";
const LIST_HOTELS_URL: &str = "https://hotels4.p.rapidapi.com/properties/list";
const API_HOST: &str = "hotels4.p.rapidapi.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Hotel provider backed by the hotels4 RapidAPI.
#[derive(Clone, Debug)]
pub struct RapidApiProvider {
    client: Client,
    api_key: String,
    locale: String,
    currency: String,
}

impl RapidApiProvider {
    /// Creates a provider from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.rapid_api_key.is_empty() {
            return Err(ScoutError::config(
                "RAPID_API_KEY is not set (config file or environment)",
            ));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ScoutError::internal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            api_key: config.rapid_api_key.clone(),
            locale: config.locale.clone(),
            currency: config.currency.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", API_HOST)
            .query(query)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    error!(url, "provider request timed out");
                    ScoutError::provider("response timeout exceeded")
                } else {
                    error!(url, error = %err, "provider request failed");
                    ScoutError::provider(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!(url, %status, %body, "provider returned non-success status");
            return Err(ScoutError::provider(format!(
                "status {status} from provider"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ScoutError::data_shape(format!("malformed provider response: {err}")))
    }

    /// Builds the wire query for a hotel listing request, passing the typed
    /// parameters through verbatim.
    fn hotel_query(
        &self,
        params: &QueryParams,
        page_number: u32,
        page_size: usize,
    ) -> Vec<(String, String)> {
        let mut query = vec![
            ("pageNumber".to_string(), page_number.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
            ("locale".to_string(), self.locale.clone()),
            ("currency".to_string(), self.currency.clone()),
        ];
        if let Some(id) = params.destination_id {
            query.push(("destinationId".to_string(), id.to_string()));
        }
        if let Some(adults) = params.adults {
            query.push(("adults1".to_string(), adults.to_string()));
        }
        if let Some(date) = params.check_in {
            query.push(("checkIn".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = params.check_out {
            query.push(("checkOut".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some((low, high)) = params.price_range {
            query.push(("priceMin".to_string(), low.to_string()));
            query.push(("priceMax".to_string(), high.to_string()));
        }
        if let Some(order) = params.sort_order {
            query.push(("sortOrder".to_string(), order.as_token().to_string()));
        }
        query
    }
}

/// Upstream schema drift degrades to an empty result instead of failing
/// the conversation; transport and provider errors still propagate.
fn recover_data_shape<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_data_shape() => {
            warn!(error = %err, "malformed provider response treated as empty");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[async_trait]
impl HotelProvider for RapidApiProvider {
    async fn find_locations(&self, query: &str) -> Result<Vec<LocationChoice>> {
        debug!(query, "looking up locations");
        let wire_query = vec![
            ("query".to_string(), query.to_string()),
            ("locale".to_string(), self.locale.clone()),
        ];
        let fetched = self.get_json::<LocationsResponse>(LOCATION_URL, &wire_query).await;
        let Some(response) = recover_data_shape(fetched)? else {
            return Ok(Vec::new());
        };
        Ok(parse_locations(response))
    }

    async fn find_hotels(
        &self,
        params: &QueryParams,
        page_number: u32,
        page_size: usize,
    ) -> Result<HotelPage> {
        debug!(page_number, page_size, "fetching hotel page");
        let wire_query = self.hotel_query(params, page_number, page_size);
        let fetched = self.get_json::<HotelsResponse>(LIST_HOTELS_URL, &wire_query).await;
        let Some(response) = recover_data_shape(fetched)? else {
            return Ok(HotelPage::default());
        };

        if response.result != "OK" {
            let message = response
                .error_message
                .unwrap_or_else(|| "result not OK".to_string());
            error!(%message, "provider rejected the hotel listing request");
            return Err(ScoutError::provider(message));
        }

        Ok(parse_hotels(response, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hotelscout_core::session::SortOrder;

    fn provider() -> RapidApiProvider {
        let config = AppConfig {
            rapid_api_key: "test-key".to_string(),
            ..Default::default()
        };
        RapidApiProvider::new(&config).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        let err = RapidApiProvider::new(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn test_hotel_query_passes_params_through() {
        let params = QueryParams {
            destination_id: Some(1706),
            adults: Some(2),
            check_in: NaiveDate::from_ymd_opt(2025, 6, 10),
            check_out: NaiveDate::from_ymd_opt(2025, 6, 12),
            price_range: Some((50, 200)),
            sort_order: Some(SortOrder::DistanceFromLandmark),
        };
        let query = provider().hotel_query(&params, 3, 25);

        let find = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(find("destinationId"), Some("1706"));
        assert_eq!(find("adults1"), Some("2"));
        assert_eq!(find("checkIn"), Some("2025-06-10"));
        assert_eq!(find("checkOut"), Some("2025-06-12"));
        assert_eq!(find("priceMin"), Some("50"));
        assert_eq!(find("priceMax"), Some("200"));
        assert_eq!(find("sortOrder"), Some("DISTANCE_FROM_LANDMARK"));
        assert_eq!(find("pageNumber"), Some("3"));
        assert_eq!(find("pageSize"), Some("25"));
        assert_eq!(find("locale"), Some("en_US"));
        assert_eq!(find("currency"), Some("USD"));
    }

    #[test]
    fn test_malformed_response_recovers_to_empty() {
        let result: Result<HotelPage> =
            recover_data_shape(Err(ScoutError::data_shape("result: expected a string")))
                .map(Option::unwrap_or_default);
        assert_eq!(result.unwrap(), HotelPage::default());
    }

    #[test]
    fn test_recovery_passes_values_and_other_errors_through() {
        let page = HotelPage {
            records: Vec::new(),
            next_page_number: 2,
        };
        assert_eq!(
            recover_data_shape(Ok(page.clone())).unwrap(),
            Some(page)
        );

        let err = recover_data_shape::<HotelPage>(Err(ScoutError::provider("timeout")))
            .unwrap_err();
        assert!(err.is_provider());
    }

    #[test]
    fn test_unset_params_are_omitted() {
        let query = provider().hotel_query(&QueryParams::default(), 1, 25);
        assert!(query.iter().all(|(k, _)| k != "destinationId"));
        assert!(query.iter().all(|(k, _)| k != "priceMin"));
        assert!(query.iter().all(|(k, _)| k != "sortOrder"));
    }
}
