//! Data models for the hotels.com API.
//!
//! Only the fields the bot actually reads are declared; everything else in
//! the responses is ignored by serde.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ==================== Region search ====================

/// Response of `GET /locations/v3/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionSearchResponse {
    #[serde(default)]
    pub sr: Vec<Region>,
}

/// One suggested region.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(rename = "type")]
    pub region_type: String,
    /// Opaque destination identifier; absent for some region types
    #[serde(default)]
    pub gaia_id: Option<String>,
    pub region_names: RegionNames,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionNames {
    pub short_name: String,
}

/// A city the user can pick from, with its destination id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCandidate {
    pub name: String,
    pub id: String,
}

impl RegionSearchResponse {
    /// Suggestions of type `CITY` that carry a destination id, in API order.
    pub fn city_candidates(&self) -> Vec<CityCandidate> {
        self.sr
            .iter()
            .filter(|region| region.region_type == "CITY")
            .filter_map(|region| {
                region.gaia_id.as_ref().map(|id| CityCandidate {
                    name: region.region_names.short_name.clone(),
                    id: id.clone(),
                })
            })
            .collect()
    }
}

// ==================== Property search ====================

/// Calendar date in the wire format of `properties/v2/list`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ApiDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<NaiveDate> for ApiDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub region_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub adults: u32,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Child {
    pub age: u32,
}

/// Server-side sort orders accepted by `properties/v2/list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[serde(rename = "PRICE_LOW_TO_HIGH")]
    PriceLowToHigh,
}

/// Request body of `POST /properties/v2/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchRequest {
    pub site_id: u32,
    pub destination: Destination,
    pub check_in_date: ApiDate,
    pub check_out_date: ApiDate,
    pub rooms: Vec<Room>,
    pub results_starting_index: u32,
    pub results_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySearchResponse {
    pub data: PropertySearchData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchData {
    pub property_search: PropertySearch,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySearch {
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// One hotel candidate from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    pub destination_info: DestinationInfo,
    pub price: PropertyPrice,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationInfo {
    pub distance_from_destination: Distance,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Distance {
    pub unit: String,
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyPrice {
    pub lead: LeadPrice,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPrice {
    pub amount: f64,
    pub currency_info: CurrencyInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
}

impl PropertySearchResponse {
    pub fn properties(&self) -> &[Property] {
        &self.data.property_search.properties
    }
}

// ==================== Property detail ====================

/// Request body of `POST /properties/v2/detail`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetailRequest {
    pub currency: String,
    pub eapid: u32,
    pub locale: String,
    pub site_id: u32,
    pub property_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDetailResponse {
    pub data: PropertyDetailData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetailData {
    pub property_info: PropertyInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub summary: PropertySummary,
    #[serde(default)]
    pub property_gallery: Option<PropertyGallery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySummary {
    pub location: SummaryLocation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryLocation {
    pub address: Address,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyGallery {
    #[serde(default)]
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImage {
    pub image: GalleryImageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImageInfo {
    pub url: String,
}

impl PropertyDetailResponse {
    pub fn address_line(&self) -> &str {
        &self
            .data
            .property_info
            .summary
            .location
            .address
            .address_line
    }

    /// Gallery URLs in the order the API returns them.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.data
            .property_info
            .property_gallery
            .iter()
            .flat_map(|gallery| gallery.images.iter())
            .map(|image| image.image.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_search_city_candidates() {
        let json = r#"{
            "sr": [
                {
                    "type": "CITY",
                    "gaiaId": "2734",
                    "regionNames": {"shortName": "Paris"}
                },
                {
                    "type": "AIRPORT",
                    "gaiaId": "553248",
                    "regionNames": {"shortName": "Paris (CDG)"}
                },
                {
                    "type": "CITY",
                    "regionNames": {"shortName": "Paris, TX"}
                }
            ]
        }"#;

        let response: RegionSearchResponse = serde_json::from_str(json).unwrap();
        let candidates = response.city_candidates();

        // Airports are skipped, and so are cities without a gaiaId
        assert_eq!(
            candidates,
            vec![CityCandidate {
                name: "Paris".to_string(),
                id: "2734".to_string(),
            }]
        );
    }

    #[test]
    fn test_region_search_missing_sr() {
        let response: RegionSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.city_candidates().is_empty());
    }

    #[test]
    fn test_property_search_response() {
        let json = r#"{
            "data": {
                "propertySearch": {
                    "properties": [
                        {
                            "id": "12345",
                            "name": "Hotel du Centre",
                            "destinationInfo": {
                                "distanceFromDestination": {"unit": "MILE", "value": 1.3}
                            },
                            "price": {
                                "lead": {
                                    "amount": 187.5,
                                    "currencyInfo": {"code": "USD"}
                                }
                            }
                        }
                    ]
                }
            }
        }"#;

        let response: PropertySearchResponse = serde_json::from_str(json).unwrap();
        let properties = response.properties();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "Hotel du Centre");
        assert_eq!(properties[0].destination_info.distance_from_destination.value, 1.3);
        assert_eq!(properties[0].price.lead.currency_info.code, "USD");
    }

    #[test]
    fn test_property_detail_accessors() {
        let json = r#"{
            "data": {
                "propertyInfo": {
                    "summary": {
                        "location": {
                            "address": {"addressLine": "1 Rue de Rivoli, Paris"}
                        }
                    },
                    "propertyGallery": {
                        "images": [
                            {"image": {"url": "https://img.example/1.jpg"}},
                            {"image": {"url": "https://img.example/2.jpg"}}
                        ]
                    }
                }
            }
        }"#;

        let response: PropertyDetailResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.address_line(), "1 Rue de Rivoli, Paris");
        let urls: Vec<&str> = response.image_urls().collect();
        assert_eq!(urls, vec!["https://img.example/1.jpg", "https://img.example/2.jpg"]);
    }

    #[test]
    fn test_property_detail_without_gallery() {
        let json = r#"{
            "data": {
                "propertyInfo": {
                    "summary": {
                        "location": {
                            "address": {"addressLine": "somewhere"}
                        }
                    }
                }
            }
        }"#;

        let response: PropertyDetailResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.image_urls().count(), 0);
    }

    #[test]
    fn test_search_request_wire_format() {
        let request = PropertySearchRequest {
            site_id: 300_000_001,
            destination: Destination {
                region_id: "2734".to_string(),
            },
            check_in_date: ApiDate::from(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()),
            check_out_date: ApiDate::from(NaiveDate::from_ymd_opt(2099, 1, 5).unwrap()),
            rooms: vec![Room {
                adults: 2,
                children: vec![Child { age: 5 }, Child { age: 7 }],
            }],
            results_starting_index: 0,
            results_size: 10,
            sort: Some(SortOrder::PriceLowToHigh),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["destination"]["regionId"], "2734");
        assert_eq!(value["checkInDate"]["day"], 1);
        assert_eq!(value["checkInDate"]["year"], 2099);
        assert_eq!(value["rooms"][0]["children"][1]["age"], 7);
        assert_eq!(value["sort"], "PRICE_LOW_TO_HIGH");
        assert_eq!(value["resultsSize"], 10);
    }

    #[test]
    fn test_search_request_omits_sort_when_unset() {
        let request = PropertySearchRequest {
            site_id: 300_000_001,
            destination: Destination {
                region_id: "2734".to_string(),
            },
            check_in_date: ApiDate {
                day: 1,
                month: 1,
                year: 2099,
            },
            check_out_date: ApiDate {
                day: 5,
                month: 1,
                year: 2099,
            },
            rooms: Vec::new(),
            results_starting_index: 0,
            results_size: 10,
            sort: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("sort").is_none());
    }
}
