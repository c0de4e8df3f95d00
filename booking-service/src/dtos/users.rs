use serde::Deserialize;
use validator::Validate;

use crate::services::PanditProfileUpdate;

/// Profile edits. The pandit-only fields are ignored for customer accounts.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 7, max = 20, message = "Invalid phone number"))]
    pub phone: Option<String>,

    pub specialization: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    #[serde(alias = "experience")]
    pub experience_years: Option<i32>,

    pub languages: Option<Vec<String>>,

    pub city: Option<String>,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

impl From<UpdateProfileRequest> for PanditProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        PanditProfileUpdate {
            name: req.name,
            phone: req.phone,
            specialization: req.specialization,
            experience_years: req.experience_years,
            languages: req.languages,
            city: req.city,
            bio: req.bio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineStatusRequest {
    pub is_online: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PanditListQuery {
    pub specialization: Option<String>,
    pub city: Option<String>,
    pub online: Option<bool>,
}

impl From<PanditListQuery> for crate::services::PanditFilter {
    fn from(q: PanditListQuery) -> Self {
        crate::services::PanditFilter {
            specialization: q.specialization.filter(|s| !s.trim().is_empty()),
            city: q.city.filter(|s| !s.trim().is_empty()),
            online: q.online,
        }
    }
}
