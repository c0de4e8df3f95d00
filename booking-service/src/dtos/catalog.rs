use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Ceremony, Dosha, Epuja, PricingTier};

fn empty_list() -> Value {
    json!([])
}

fn empty_object() -> Value {
    json!({})
}

/// Lowercase, hyphen-separated form of a slug or title. `None` when nothing
/// usable remains.
pub fn normalize_slug(raw: &str) -> Option<String> {
    let slug = raw
        .trim()
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CeremonyRequest {
    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "empty_list")]
    pub samagri: Value,

    #[serde(default = "empty_list")]
    pub process_steps: Value,

    pub base_price: Decimal,

    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration_minutes: Option<i32>,

    pub image_url: Option<String>,

    #[serde(default = "empty_list")]
    pub videos: Value,

    #[serde(default = "empty_list")]
    pub reviews: Value,

    #[serde(default = "empty_object")]
    pub translations: Value,

    pub is_active: Option<bool>,
}

impl CeremonyRequest {
    /// Builds the row to save. Updates keep the id, creation time and, when
    /// not given, the slug and active flag of `existing`.
    pub fn into_ceremony(self, slug: String, existing: Option<&Ceremony>) -> Ceremony {
        let now = Utc::now();
        Ceremony {
            ceremony_id: existing.map_or_else(Uuid::new_v4, |c| c.ceremony_id),
            slug,
            title: self.title.trim().to_string(),
            description: self.description,
            samagri: self.samagri,
            process_steps: self.process_steps,
            base_price: self.base_price,
            duration_minutes: self.duration_minutes,
            image_url: self.image_url,
            videos: self.videos,
            reviews: self.reviews,
            translations: self.translations,
            is_active: self
                .is_active
                .unwrap_or_else(|| existing.map_or(true, |c| c.is_active)),
            created_utc: existing.map_or(now, |c| c.created_utc),
            updated_utc: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DoshaRequest {
    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "empty_list")]
    pub benefits: Value,

    #[validate(length(min = 1, message = "At least one pricing tier is required"))]
    pub pricing_tiers: Vec<PricingTier>,

    #[serde(default = "empty_object")]
    pub translations: Value,

    pub image_url: Option<String>,

    pub is_active: Option<bool>,
}

impl DoshaRequest {
    pub fn into_dosha(self, slug: String, existing: Option<&Dosha>) -> Result<Dosha, serde_json::Error> {
        let now = Utc::now();
        Ok(Dosha {
            dosha_id: existing.map_or_else(Uuid::new_v4, |d| d.dosha_id),
            slug,
            name: self.name.trim().to_string(),
            description: self.description,
            benefits: self.benefits,
            pricing_tiers: serde_json::to_value(&self.pricing_tiers)?,
            translations: self.translations,
            image_url: self.image_url,
            is_active: self
                .is_active
                .unwrap_or_else(|| existing.map_or(true, |d| d.is_active)),
            created_utc: existing.map_or(now, |d| d.created_utc),
            updated_utc: now,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EpujaRequest {
    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "empty_list")]
    pub benefits: Value,

    #[validate(length(min = 1, message = "At least one pricing tier is required"))]
    pub pricing_tiers: Vec<PricingTier>,

    #[serde(default = "empty_object")]
    pub translations: Value,

    pub image_url: Option<String>,

    pub temple: Option<String>,

    pub deity: Option<String>,

    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration_minutes: Option<i32>,

    pub is_active: Option<bool>,
}

impl EpujaRequest {
    pub fn into_epuja(self, slug: String, existing: Option<&Epuja>) -> Result<Epuja, serde_json::Error> {
        let now = Utc::now();
        Ok(Epuja {
            epuja_id: existing.map_or_else(Uuid::new_v4, |e| e.epuja_id),
            slug,
            name: self.name.trim().to_string(),
            description: self.description,
            benefits: self.benefits,
            pricing_tiers: serde_json::to_value(&self.pricing_tiers)?,
            translations: self.translations,
            image_url: self.image_url,
            temple: self.temple,
            deity: self.deity,
            duration_minutes: self.duration_minutes,
            is_active: self
                .is_active
                .unwrap_or_else(|| existing.map_or(true, |e| e.is_active)),
            created_utc: existing.map_or(now, |e| e.created_utc),
            updated_utc: now,
        })
    }
}

/// Every tier needs a name and a positive price.
pub fn tiers_are_valid(tiers: &[PricingTier]) -> bool {
    tiers
        .iter()
        .all(|t| !t.name.trim().is_empty() && t.price > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_normalized() {
        assert_eq!(
            normalize_slug("  Satyanarayan Puja "),
            Some("satyanarayan-puja".to_string())
        );
        assert_eq!(
            normalize_slug("Griha--Pravesh!"),
            Some("griha-pravesh".to_string())
        );
        assert_eq!(normalize_slug(" -- "), None);
    }

    #[test]
    fn update_keeps_identity_of_existing_row() {
        let req: CeremonyRequest = serde_json::from_value(json!({
            "title": "Griha Pravesh",
            "basePrice": "5100.00"
        }))
        .unwrap();
        let first = req.into_ceremony("griha-pravesh".into(), None);
        assert!(first.is_active);
        assert_eq!(first.samagri, json!([]));

        let req: CeremonyRequest = serde_json::from_value(json!({
            "title": "Griha Pravesh Puja",
            "basePrice": 6100,
            "isActive": false
        }))
        .unwrap();
        let second = req.into_ceremony(first.slug.clone(), Some(&first));
        assert_eq!(second.ceremony_id, first.ceremony_id);
        assert_eq!(second.created_utc, first.created_utc);
        assert!(!second.is_active);
    }

    #[test]
    fn tiers_need_positive_prices() {
        let good = vec![PricingTier {
            name: "Basic".into(),
            price: Decimal::from(1100),
            description: None,
        }];
        assert!(tiers_are_valid(&good));

        let bad = vec![PricingTier {
            name: "Free".into(),
            price: Decimal::ZERO,
            description: None,
        }];
        assert!(!tiers_are_valid(&bad));
    }
}
