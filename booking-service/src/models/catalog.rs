use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Bookable ceremony listed in the catalog.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ceremony {
    #[serde(rename = "id")]
    pub ceremony_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub samagri: Value,
    pub process_steps: Value,
    pub base_price: Decimal,
    pub duration_minutes: Option<i32>,
    pub image_url: Option<String>,
    pub videos: Value,
    pub reviews: Value,
    pub translations: Value,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// One price point of a dosha remedy or e-puja.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses a JSONB tier list, skipping malformed entries.
pub fn pricing_tiers(raw: &Value) -> Vec<PricingTier> {
    raw.as_array()
        .map(|tiers| {
            tiers
                .iter()
                .filter_map(|t| serde_json::from_value(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dosha {
    #[serde(rename = "id")]
    pub dosha_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub benefits: Value,
    pub pricing_tiers: Value,
    pub translations: Value,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Dosha {
    pub fn tier(&self, name: &str) -> Option<PricingTier> {
        pricing_tiers(&self.pricing_tiers)
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Epuja {
    #[serde(rename = "id")]
    pub epuja_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub benefits: Value,
    pub pricing_tiers: Value,
    pub translations: Value,
    pub image_url: Option<String>,
    pub temple: Option<String>,
    pub deity: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Epuja {
    pub fn tier(&self, name: &str) -> Option<PricingTier> {
        pricing_tiers(&self.pricing_tiers)
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_tiers_are_skipped() {
        let raw = json!([
            { "name": "Basic", "price": 1100 },
            { "name": "Missing price" },
            { "name": "Premium", "price": "5100.50", "description": "With havan" }
        ]);

        let tiers = pricing_tiers(&raw);
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].price, Decimal::from(1100));
        assert_eq!(tiers[1].price, Decimal::new(510050, 2));
    }

    #[test]
    fn non_array_yields_no_tiers() {
        assert!(pricing_tiers(&json!({})).is_empty());
    }
}
