use serde_json::Value;

/// `(translation key, record field)` pairs overlaid for ceremonies.
pub const CEREMONY_FIELDS: &[(&str, &str)] = &[
    ("title", "title"),
    ("description", "description"),
    ("samagri", "samagri"),
    ("process", "processSteps"),
];

/// Overlay fields for doshas and e-pujas.
pub const OFFERING_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("description", "description"),
    ("benefits", "benefits"),
];

pub const PAGE_FIELDS: &[(&str, &str)] = &[("title", "title"), ("content", "content")];

/// Replaces `fields` of a serialized record with `translations[lang]`.
///
/// Missing languages, missing keys and `null` values leave the base value
/// in place. Non-object records are returned unchanged.
pub fn localize(
    mut record: Value,
    translations: &Value,
    lang: Option<&str>,
    fields: &[(&str, &str)],
) -> Value {
    let Some(overlay) = lang.and_then(|l| translations.get(l)) else {
        return record;
    };

    if let Value::Object(map) = &mut record {
        for (source, target) in fields {
            match overlay.get(*source) {
                Some(Value::Null) | None => {}
                Some(Value::String(s)) if s.is_empty() => {}
                Some(value) => {
                    map.insert((*target).to_string(), value.clone());
                }
            }
        }
    }

    record
}
