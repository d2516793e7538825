//! Search orchestration: turns a finished survey into API calls and
//! display-ready results.

use anyhow::{Context, Result};
use hotels_client::{HotelsClient, SortOrder};
use std::cmp::Ordering;

use crate::bot::state::{SearchKind, SearchPlan};

/// A fully resolved search hit.
#[derive(Debug, Clone)]
pub(crate) struct HotelResult {
    pub name: String,
    pub address: String,
    pub distance_value: f64,
    pub distance_unit: String,
    pub price: f64,
    pub currency_code: String,
    /// Empty unless photos were requested
    pub images: Vec<String>,
}

/// The per-hotel text block, used both in chat and in history records.
pub(crate) fn hotel_caption(hotel: &HotelResult) -> String {
    format!(
        "Название: {}\nАдрес: {}\nДо центра: {} {}\nЦена: {} {}",
        hotel.name,
        hotel.address,
        hotel.distance_value,
        hotel.distance_unit,
        hotel.price,
        hotel.currency_code
    )
}

/// Run the full search: one list request, one detail request per
/// candidate, then kind-specific post-processing.
pub(crate) async fn run_search(
    hotels: &HotelsClient,
    plan: &SearchPlan,
) -> Result<Vec<HotelResult>> {
    // Only the cheapest-first search relies on a server-side sort
    let sort = match plan.kind {
        SearchKind::CheapestFirst => Some(SortOrder::PriceLowToHigh),
        _ => None,
    };

    let request =
        HotelsClient::standard_request(plan.city_id.clone(), plan.check_in, plan.check_out, sort);
    let response = hotels
        .search_properties(&request)
        .await
        .context("Property search failed")?;

    let mut candidates = Vec::new();
    for property in response.properties() {
        let detail = hotels
            .property_detail(&property.id)
            .await
            .with_context(|| format!("Detail fetch failed for property {}", property.id))?;

        // Take at most photo_count gallery URLs; a shorter gallery is fine
        let images = if plan.photo_count > 0 {
            detail
                .image_urls()
                .take(plan.photo_count)
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        candidates.push(HotelResult {
            name: property.name.clone(),
            address: detail.address_line().to_string(),
            distance_value: property.destination_info.distance_from_destination.value,
            distance_unit: property.destination_info.distance_from_destination.unit.clone(),
            price: property.price.lead.amount,
            currency_code: property.price.lead.currency_info.code.clone(),
            images,
        });
    }

    Ok(select_results(plan, candidates))
}

/// Kind-specific ordering, filtering and truncation. Pure.
pub(crate) fn select_results(
    plan: &SearchPlan,
    mut candidates: Vec<HotelResult>,
) -> Vec<HotelResult> {
    match plan.kind {
        // Already sorted ascending by the server
        SearchKind::CheapestFirst => {}
        SearchKind::PriciestFirst => {
            // sort_by is stable: equal prices keep their original order
            candidates.sort_by(|a, b| {
                b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal)
            });
        }
        SearchKind::BestDeal => {
            if let Some((min, max)) = plan.distance {
                candidates
                    .retain(|hotel| min < hotel.distance_value && hotel.distance_value < max);
            }
        }
    }

    candidates.truncate(plan.hotel_count);
    candidates
}
