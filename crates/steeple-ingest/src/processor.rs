use std::future::Future;

use serde_json::{Map, Value, json};
use thiserror::Error;

/// Why a task payload was rejected before any write.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("bot operations are disabled")]
    BotDisabled,
    #[error("expected a JSON object payload")]
    NotAnObject,
    #[error("missing or empty church name")]
    MissingName,
}

/// A payload is usable when it is a JSON object with a non-empty string
/// `name`.
pub fn validate_task(payload: &Value) -> Result<(), TaskError> {
    let object = payload.as_object().ok_or(TaskError::NotAnObject)?;
    match object.get("name").and_then(|v| v.as_str()) {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(TaskError::MissingName),
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'ą' => 'a',
        'ć' => 'c',
        'ę' => 'e',
        'ł' => 'l',
        'ń' => 'n',
        'ó' => 'o',
        'ś' => 's',
        'ź' | 'ż' => 'z',
        other => other,
    }
}

/// Slug from a church name: lowercase, Polish diacritics folded to
/// ASCII, everything outside `[a-z0-9 -]` stripped, whitespace runs and
/// repeated dashes collapsed to a single dash. An empty outcome falls
/// back to `"church"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.trim().to_lowercase().chars() {
        let c = fold_diacritic(c);
        match c {
            'a'..='z' | '0'..='9' => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            }
            '-' => pending_dash = true,
            c if c.is_whitespace() => pending_dash = true,
            _ => {}
        }
    }
    if slug.is_empty() {
        "church".to_string()
    } else {
        slug
    }
}

/// Resolve a free slug by probing `base`, `base-1`, `base-2`, ... against
/// an existence check until one is unoccupied.
pub async fn unique_slug<F, Fut>(base: &str, mut exists: F) -> String
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = bool>,
{
    let mut candidate = base.to_string();
    let mut n = 0usize;
    while exists(candidate.clone()).await {
        n += 1;
        candidate = format!("{base}-{n}");
    }
    candidate
}

fn as_nullable_string(raw: &Value, key: &str) -> Value {
    match raw.get(key) {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(s)) => Value::String(s.clone()),
        Some(other) => Value::String(other.to_string()),
    }
}

fn as_nullable_object(raw: &Value, key: &str) -> Value {
    match raw.get(key) {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        _ => Value::Null,
    }
}

/// Map a validated payload to the `church_submission` record. `metadata`
/// defaults to the whole raw payload when the task did not carry one.
pub fn to_submission_record(raw: &Value, slug: &str) -> Value {
    let name = raw
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();
    let metadata = match raw.get("metadata") {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        _ => Value::Object(raw.as_object().cloned().unwrap_or_else(Map::new)),
    };
    json!({
        "name": name,
        "slug": slug,
        "seo_description": as_nullable_string(raw, "seo_description"),
        "people": as_nullable_object(raw, "people"),
        "architectural_style": as_nullable_string(raw, "architectural_style"),
        "full_address": as_nullable_string(raw, "full_address"),
        "metadata": metadata,
    })
}

/// Full task processing: bot gate, validation, slug resolution, record
/// mapping. Performs no writes; the caller persists the returned record.
pub async fn process_task<F, Fut>(
    payload: &Value,
    bot_active: bool,
    slug_exists: F,
) -> Result<Value, TaskError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = bool>,
{
    if !bot_active {
        return Err(TaskError::BotDisabled);
    }
    validate_task(payload)?;
    let base = slugify(payload.get("name").and_then(|v| v.as_str()).unwrap_or_default());
    let slug = unique_slug(&base, slug_exists).await;
    Ok(to_submission_record(payload, &slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_folds_polish_diacritics() {
        assert_eq!(slugify("Kościół Św. Marii"), "kosciol-sw-marii");
        assert_eq!(slugify("Żółta Łódź"), "zolta-lodz");
    }

    #[test]
    fn slugify_collapses_separators_and_trims() {
        assert_eq!(slugify("  St.   Mary --- Basilica  "), "st-mary-basilica");
        assert_eq!(slugify("-leading and trailing-"), "leading-and-trailing");
    }

    #[test]
    fn slugify_falls_back_when_nothing_survives() {
        assert_eq!(slugify(""), "church");
        assert_eq!(slugify("!!! ???"), "church");
    }

    #[test]
    fn validation_rejects_non_objects_and_missing_names() {
        assert_eq!(validate_task(&json!([1, 2])), Err(TaskError::NotAnObject));
        assert_eq!(validate_task(&json!("x")), Err(TaskError::NotAnObject));
        assert_eq!(validate_task(&json!({})), Err(TaskError::MissingName));
        assert_eq!(
            validate_task(&json!({"name": "   "})),
            Err(TaskError::MissingName)
        );
        assert_eq!(validate_task(&json!({"name": 42})), Err(TaskError::MissingName));
        assert!(validate_task(&json!({"name": "St. Mary"})).is_ok());
    }

    #[tokio::test]
    async fn unique_slug_probes_suffixes_until_free() {
        let taken: HashSet<&str> = ["st-mary", "st-mary-1", "st-mary-2"].into();
        let slug = unique_slug("st-mary", |candidate| {
            let hit = taken.contains(candidate.as_str());
            async move { hit }
        })
        .await;
        assert_eq!(slug, "st-mary-3");
    }

    #[tokio::test]
    async fn unique_slug_keeps_the_base_when_unoccupied() {
        let slug = unique_slug("st-mary", |_| async { false }).await;
        assert_eq!(slug, "st-mary");
    }

    #[test]
    fn record_maps_known_fields_and_nulls_the_rest() {
        let raw = json!({
            "name": "  St. Mary  ",
            "seo_description": "A basilica",
            "people": {"parish_priest": "Jan Kowalski"},
        });
        let record = to_submission_record(&raw, "st-mary");
        assert_eq!(record["name"], "St. Mary");
        assert_eq!(record["slug"], "st-mary");
        assert_eq!(record["seo_description"], "A basilica");
        assert_eq!(record["people"]["parish_priest"], "Jan Kowalski");
        assert_eq!(record["architectural_style"], Value::Null);
        assert_eq!(record["full_address"], Value::Null);
    }

    #[test]
    fn metadata_defaults_to_the_whole_raw_payload() {
        let raw = json!({"name": "St. Mary", "extra": true});
        let record = to_submission_record(&raw, "st-mary");
        assert_eq!(record["metadata"]["extra"], true);
        assert_eq!(record["metadata"]["name"], "St. Mary");

        let with_meta = json!({"name": "St. Mary", "metadata": {"source": "dify"}});
        let record = to_submission_record(&with_meta, "st-mary");
        assert_eq!(record["metadata"], json!({"source": "dify"}));
    }

    #[tokio::test]
    async fn bot_gate_rejects_before_anything_else() {
        let probed = std::cell::Cell::new(false);
        let err = process_task(&json!({"name": "St. Mary"}), false, |_| {
            probed.set(true);
            async { false }
        })
        .await
        .unwrap_err();
        assert_eq!(err, TaskError::BotDisabled);
        assert!(!probed.get(), "probe must not run when the bot is disabled");
    }

    #[tokio::test]
    async fn process_task_produces_a_record_with_a_free_slug() {
        let record = process_task(&json!({"name": "Kościół Mariacki"}), true, |candidate| async move {
            candidate == "kosciol-mariacki"
        })
        .await
        .unwrap();
        assert_eq!(record["slug"], "kosciol-mariacki-1");
        assert_eq!(record["name"], "Kościół Mariacki");
    }
}
