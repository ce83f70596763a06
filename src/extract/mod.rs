use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Listing, NOT_AVAILABLE};

/// Extract listing records from a raw page.
///
/// Tries the embedded JSON-LD block first; when the page carries none (or it
/// yields no records) falls back to scanning `.listing-item` cards. Returns
/// an empty vector when neither path matches — extraction never fails the
/// caller.
pub fn extract_listings(html: &str, fecha: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);

    let mut listings = from_json_ld(&document, fecha);
    if listings.is_empty() {
        listings = from_selectors(&document, fecha);
    }

    debug!("Extracted {} listings", listings.len());
    listings
}

/// Strip currency markers and grouping dots from a price string.
pub fn clean_price(raw: &str) -> String {
    let cleaned = raw.replace("COP", "").replace(['$', '.'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Structured-data path: `script[type="application/ld+json"]`, expected to
/// hold an array whose first entry lists properties under `about`.
fn from_json_ld(document: &Html, fecha: &str) -> Vec<Listing> {
    let script_selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    let Some(script) = document.select(&script_selector).next() else {
        return Vec::new();
    };

    let raw = script.text().collect::<String>();
    let data: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed JSON-LD block, falling back to selectors: {}", e);
            return Vec::new();
        }
    };

    let properties = data
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("about"))
        .and_then(Value::as_array);

    let Some(properties) = properties else {
        warn!("JSON-LD block present but carries no property list");
        return Vec::new();
    };

    properties
        .iter()
        .map(|prop| {
            let barrio = prop
                .get("address")
                .and_then(|address| address.get("streetAddress"))
                .and_then(Value::as_str)
                .and_then(|street| street.split(',').next())
                .map(str::trim)
                .unwrap_or(NOT_AVAILABLE)
                .to_string();

            // The price only appears in free text, after the last "$".
            let description = prop
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let valor = match description.rsplit_once('$') {
                Some((_, tail)) => {
                    let raw_price = tail.split('\n').next().unwrap_or("").trim();
                    clean_price(raw_price)
                }
                None => NOT_AVAILABLE.to_string(),
            };

            Listing {
                fecha_descarga: fecha.to_string(),
                barrio,
                valor,
                habitaciones: value_text(prop.get("numberOfBedrooms")),
                banos: value_text(prop.get("numberOfBathroomsTotal")),
                mts2: value_text(prop.get("floorSize").and_then(|size| size.get("value"))),
            }
        })
        .collect()
}

/// Selector fallback: one record per `.listing-item` card, each field read
/// independently so a missing child only blanks that field.
fn from_selectors(document: &Html, fecha: &str) -> Vec<Listing> {
    let item_selector = Selector::parse(".listing-item").unwrap();
    let location_selector = Selector::parse(".listing-location").unwrap();
    let price_selector = Selector::parse(".listing-price").unwrap();
    let rooms_selector = Selector::parse(".listing-rooms").unwrap();
    let bathrooms_selector = Selector::parse(".listing-bathrooms").unwrap();
    let area_selector = Selector::parse(".listing-area").unwrap();

    document
        .select(&item_selector)
        .map(|item| Listing {
            fecha_descarga: fecha.to_string(),
            barrio: child_text(&item, &location_selector).unwrap_or_else(not_available),
            valor: child_text(&item, &price_selector)
                .map(|price| clean_price(&price))
                .unwrap_or_else(not_available),
            habitaciones: child_text(&item, &rooms_selector).unwrap_or_else(not_available),
            banos: child_text(&item, &bathrooms_selector).unwrap_or_else(not_available),
            mts2: child_text(&item, &area_selector).unwrap_or_else(not_available),
        })
        .collect()
}

fn child_text(item: &ElementRef, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FECHA: &str = "2025-03-10";

    #[test]
    fn json_ld_block_maps_to_one_listing() {
        let html = r#"<script type="application/ld+json">
            [{"about": [{"address": {"streetAddress": "Chapinero, Bogotá"},
            "description": "Apartamento $200.000.000", "numberOfBedrooms": 2,
            "numberOfBathroomsTotal": 1, "floorSize": {"value": 60}}]}]
            </script>"#;

        let listings = extract_listings(html, FECHA);
        assert_eq!(
            listings,
            vec![Listing {
                fecha_descarga: FECHA.to_string(),
                barrio: "Chapinero".to_string(),
                valor: "200000000".to_string(),
                habitaciones: "2".to_string(),
                banos: "1".to_string(),
                mts2: "60".to_string(),
            }]
        );
    }

    #[test]
    fn json_ld_missing_fields_default_to_sentinel() {
        let html = r#"<script type="application/ld+json">
            [{"about": [{"description": "Sin precio publicado"}]}]
            </script>"#;

        let listings = extract_listings(html, FECHA);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].barrio, "N/A");
        assert_eq!(listings[0].valor, "N/A");
        assert_eq!(listings[0].habitaciones, "N/A");
        assert_eq!(listings[0].banos, "N/A");
        assert_eq!(listings[0].mts2, "N/A");
    }

    #[test]
    fn selector_fallback_reads_card_text() {
        let html = r#"
            <div class="listing-item">
                <div class="listing-location">Chapinero</div>
                <div class="listing-price">$200.000.000</div>
                <div class="listing-rooms">2</div>
                <div class="listing-bathrooms">1</div>
                <div class="listing-area">60</div>
            </div>
            <div class="listing-item">
                <div class="listing-location">Usaquén</div>
                <div class="listing-price">COP 350.000.000</div>
            </div>"#;

        let listings = extract_listings(html, FECHA);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].barrio, "Chapinero");
        assert_eq!(listings[0].valor, "200000000");
        assert_eq!(listings[0].habitaciones, "2");
        assert_eq!(listings[1].barrio, "Usaquén");
        assert_eq!(listings[1].valor, "350000000");
        // Missing children on the second card blank only those fields.
        assert_eq!(listings[1].habitaciones, "N/A");
        assert_eq!(listings[1].banos, "N/A");
        assert_eq!(listings[1].mts2, "N/A");
    }

    #[test]
    fn page_without_listings_yields_empty_set() {
        let listings = extract_listings("<html><body>No data</body></html>", FECHA);
        assert!(listings.is_empty());
    }

    #[test]
    fn malformed_json_ld_degrades_to_selector_fallback() {
        let html = r#"
            <script type="application/ld+json">{not valid json</script>
            <div class="listing-item">
                <div class="listing-location">Teusaquillo</div>
            </div>"#;

        let listings = extract_listings(html, FECHA);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].barrio, "Teusaquillo");
    }

    #[test]
    fn empty_json_ld_property_list_falls_back() {
        let html = r#"
            <script type="application/ld+json">[{"about": []}]</script>
            <div class="listing-item">
                <div class="listing-location">Suba</div>
            </div>"#;

        let listings = extract_listings(html, FECHA);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].barrio, "Suba");
    }

    #[test]
    fn clean_price_strips_currency_and_grouping() {
        assert_eq!(clean_price("$200.000.000"), "200000000");
        assert_eq!(clean_price("COP 350.000.000 "), "350000000");
        assert_eq!(clean_price(""), "N/A");
        assert_eq!(clean_price("COP $ "), "N/A");
    }
}
