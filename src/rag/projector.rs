//! Maps raw index metadata into [`ScoredResult`]s.

use super::ScoredResult;
use crate::catalog::Catalog;
use crate::vector_store::{MetadataValue, ScoredMatch};

/// Unwrap the `&{value}` form some indexed records carry.
///
/// Older ingestion wrote Go pointer formatting into string metadata, so a
/// title may arrive as `&{Intro}`. Anything else is returned unchanged.
pub fn clean_pointer_format(s: &str) -> &str {
    if s.len() > 3 && s.starts_with("&{") && s.ends_with('}') {
        &s[2..s.len() - 1]
    } else {
        s
    }
}

/// A cleaned string field. Non-string values are ignored.
fn string_field(value: &MetadataValue) -> Option<String> {
    match value {
        MetadataValue::String(s) => Some(clean_pointer_format(s).to_string()),
        _ => None,
    }
}

/// A numeric field given either as a number or as a (possibly wrapped) string.
fn float_field(value: &MetadataValue) -> f64 {
    match value {
        MetadataValue::Number(n) => *n,
        MetadataValue::String(s) => clean_pointer_format(s).trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Project one index match, joining the catalog entry named by `source_file`.
pub fn project(m: &ScoredMatch, catalog: &Catalog) -> ScoredResult {
    let mut result = ScoredResult {
        id: m.id.clone(),
        score: m.score,
        ..Default::default()
    };

    for (key, value) in &m.metadata {
        match key.as_str() {
            "title" => {
                if let Some(s) = string_field(value) {
                    result.title = s;
                }
            }
            "text" => {
                if let Some(s) = string_field(value) {
                    result.text = s;
                }
            }
            "source_file" => {
                if let Some(s) = string_field(value) {
                    result.video = s;
                }
            }
            "start_sec" => result.start_sec = float_field(value),
            _ => {}
        }
    }

    if let Some(video) = catalog.get(&result.video) {
        result.source = video.source.clone();
        result.url = video.url.clone();
    }

    result
}

/// Project every match, keeping the index order.
pub fn project_all(matches: &[ScoredMatch], catalog: &Catalog) -> Vec<ScoredResult> {
    matches.iter().map(|m| project(m, catalog)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scored(id: &str, score: f32, fields: &[(&str, MetadataValue)]) -> ScoredMatch {
        ScoredMatch {
            id: id.to_string(),
            score,
            metadata: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn s(v: &str) -> MetadataValue {
        MetadataValue::String(v.to_string())
    }

    #[test]
    fn test_clean_pointer_format() {
        assert_eq!(clean_pointer_format("&{Hello}"), "Hello");
        assert_eq!(clean_pointer_format("&{12.5}"), "12.5");
        assert_eq!(clean_pointer_format("plain"), "plain");
        // too short to carry content
        assert_eq!(clean_pointer_format("&{}"), "&{}");
        assert_eq!(clean_pointer_format("&{x"), "&{x");
        assert_eq!(clean_pointer_format("{x}"), "{x}");
    }

    #[test]
    fn test_project_unwraps_string_fields() {
        let catalog = Catalog::from_json(
            r#"{"videos":[{"id":"ml-101","source":"Lecture series","url":"https://example.com/ml"}]}"#,
        )
        .unwrap();

        let m = scored(
            "ml-101#3",
            0.87,
            &[
                ("title", s("&{Gradient descent}")),
                ("text", s("We step against the gradient.")),
                ("source_file", s("&{ml-101}")),
                ("start_sec", s("&{93.5}")),
                ("speaker", s("ignored")),
            ],
        );

        let result = project(&m, &catalog);
        assert_eq!(result.id, "ml-101#3");
        assert_eq!(result.title, "Gradient descent");
        assert_eq!(result.text, "We step against the gradient.");
        assert_eq!(result.video, "ml-101");
        assert_eq!(result.source, "Lecture series");
        assert_eq!(result.url, "https://example.com/ml");
        assert_eq!(result.start_sec, 93.5);
        assert_eq!(result.score, 0.87);
    }

    #[test]
    fn test_project_handles_odd_value_kinds() {
        let m = scored(
            "x",
            0.1,
            &[
                ("title", MetadataValue::Number(7.0)),
                ("start_sec", MetadataValue::Number(12.0)),
                ("text", MetadataValue::Bool(true)),
            ],
        );
        let result = project(&m, &Catalog::empty());
        assert_eq!(result.title, "");
        assert_eq!(result.text, "");
        assert_eq!(result.start_sec, 12.0);

        let m = scored("y", 0.1, &[("start_sec", s("soon"))]);
        assert_eq!(project(&m, &Catalog::empty()).start_sec, 0.0);
    }

    #[test]
    fn test_project_all_keeps_order() {
        let matches = vec![
            scored("c", 0.3, &[]),
            scored("a", 0.9, &[]),
            scored("b", 0.5, &[]),
        ];
        let ids: Vec<String> = project_all(&matches, &Catalog::empty())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
