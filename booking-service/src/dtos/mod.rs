//! Request and response bodies for the REST API.

pub mod admin;
pub mod auth;
pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod content;
pub mod payments;
pub mod reviews;
pub mod service_bookings;
pub mod users;

use serde::Deserialize;

pub use service_core::error::ErrorResponse;

/// `?lang=` on localized catalog and page reads.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    /// Requested language, ignoring blanks and the base language.
    pub fn language(&self) -> Option<&str> {
        self.lang
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != "en")
    }
}

/// Wall-clock times arrive as `HH:MM` or `HH:MM:SS`.
pub(crate) mod clock_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{de::Error, Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    D::Error::custom(format!("invalid time '{}', expected HH:MM", raw))
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn clock_time_accepts_minutes_and_seconds() {
        assert_eq!(
            clock_time::parse("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            clock_time::parse("23:15:45"),
            NaiveTime::from_hms_opt(23, 15, 45)
        );
        assert_eq!(clock_time::parse("25:00"), None);
    }

    #[test]
    fn base_language_is_not_an_overlay() {
        let q = LangQuery {
            lang: Some("en".into()),
        };
        assert_eq!(q.language(), None);

        let q = LangQuery {
            lang: Some(" hi ".into()),
        };
        assert_eq!(q.language(), Some("hi"));
    }
}
