//! hotels.com RapidAPI client implementation.

use crate::error::{Error, Result};
use crate::models::*;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_API_HOST: &str = "hotels4.p.rapidapi.com";
const LOCALE: &str = "en_US";
const LANG_ID: &str = "1033";
const SITE_ID: u32 = 300_000_001;
const EAPID: u32 = 1;
const CURRENCY: &str = "USD";

/// Client for the hotels.com endpoints behind RapidAPI.
///
/// All requests carry the RapidAPI key/host headers and time out after
/// 30 seconds.
pub struct HotelsClient {
    client: reqwest::Client,
    api_key: String,
    host: String,
}

impl HotelsClient {
    pub fn new(api_key: String, host: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            host: host.unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let key_value = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::Other("API key is not a valid header value".to_string()))?;
        let host_value = HeaderValue::from_str(&self.host)
            .map_err(|_| Error::Other("API host is not a valid header value".to_string()))?;

        headers.insert("X-RapidAPI-Key", key_value);
        headers.insert("X-RapidAPI-Host", host_value);

        Ok(headers)
    }

    /// GET request with query parameters.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("https://{}{}", self.host, path);
        let headers = self.build_headers()?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let result: T = serde_json::from_str(&text)?;
        Ok(result)
    }

    /// POST request with a JSON body.
    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("https://{}{}", self.host, path);
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let result: T = serde_json::from_str(&text)?;
        Ok(result)
    }

    /// Search regions matching a free-text name.
    pub async fn search_locations(&self, query: &str) -> Result<RegionSearchResponse> {
        let params = vec![
            ("q", query.to_string()),
            ("locale", LOCALE.to_string()),
            ("langid", LANG_ID.to_string()),
            ("siteid", SITE_ID.to_string()),
        ];

        tracing::debug!("Searching locations for {:?}", query);
        self.get("/locations/v3/search", &params).await
    }

    /// Search properties for a destination and stay window.
    pub async fn search_properties(
        &self,
        request: &PropertySearchRequest,
    ) -> Result<PropertySearchResponse> {
        tracing::debug!(
            "Searching properties for region {}",
            request.destination.region_id
        );
        self.post("/properties/v2/list", request).await
    }

    /// Fetch the detail record (address, gallery) of one property.
    pub async fn property_detail(&self, property_id: &str) -> Result<PropertyDetailResponse> {
        let request = PropertyDetailRequest {
            currency: CURRENCY.to_string(),
            eapid: EAPID,
            locale: LOCALE.to_string(),
            site_id: SITE_ID,
            property_id: property_id.to_string(),
        };

        tracing::debug!("Fetching detail for property {}", property_id);
        self.post("/properties/v2/detail", &request).await
    }

    /// Build the fixed search request the bot always issues: two adults with
    /// two children aged 5 and 7, first 10 results.
    pub fn standard_request(
        region_id: String,
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
        sort: Option<SortOrder>,
    ) -> PropertySearchRequest {
        PropertySearchRequest {
            site_id: SITE_ID,
            destination: Destination { region_id },
            check_in_date: check_in.into(),
            check_out_date: check_out.into(),
            rooms: vec![Room {
                adults: 2,
                children: vec![Child { age: 5 }, Child { age: 7 }],
            }],
            results_starting_index: 0,
            results_size: 10,
            sort,
        }
    }
}
