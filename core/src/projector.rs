//! Re-shapes a parsed cleaning response to match the caller's input.
//!
//! A single input reads the rule from the response itself. A batch walks
//! the input keys in order and matches each to the response entry at the
//! same position. Missing entries, missing fields and `null` fields all
//! yield `None`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::types::{CleanInput, CleanOutput, ExtractionRule};

pub fn project(input: &CleanInput, raw: &Value, rule: &ExtractionRule) -> CleanOutput {
    match input {
        CleanInput::Single(_) => CleanOutput::Single(project_single(raw, rule)),
        CleanInput::Batch(items) => CleanOutput::Batch(
            items
                .keys()
                .enumerate()
                .map(|(position, key)| (key.clone(), project_item(raw, position, rule)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

fn project_single(raw: &Value, rule: &ExtractionRule) -> Option<Value> {
    match rule {
        ExtractionRule::Projection(f) => f(raw),
        // The service answers a one-item request with a one-item array, so
        // the field is read from its first element instead of being treated
        // as absent.
        ExtractionRule::Field(field) => match raw {
            Value::Array(items) => items.first().and_then(|item| field_value(item, field)),
            other => field_value(other, field),
        },
    }
}

fn project_item(raw: &Value, position: usize, rule: &ExtractionRule) -> Option<Value> {
    match rule {
        ExtractionRule::Projection(f) => f(raw),
        ExtractionRule::Field(field) => raw.get(position).and_then(|item| field_value(item, field)),
    }
}

fn field_value(item: &Value, field: &str) -> Option<Value> {
    item.get(field).filter(|value| !value.is_null()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemKey;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn single_reads_field_from_object() {
        let out = project(
            &CleanInput::from("x"),
            &json!({"phone": "+7 495 123-45-67"}),
            &ExtractionRule::field("phone"),
        );
        assert_eq!(out, CleanOutput::Single(Some(json!("+7 495 123-45-67"))));
    }

    #[test]
    fn single_reads_field_from_one_item_array() {
        let out = project(
            &CleanInput::from("x"),
            &json!([{"email": "a@b.ru"}]),
            &ExtractionRule::field("email"),
        );
        assert_eq!(out.single(), Some(&json!("a@b.ru")));
    }

    #[test]
    fn single_missing_field_is_none() {
        let out = project(&CleanInput::from("x"), &json!({"qc": 1}), &ExtractionRule::field("result"));
        assert_eq!(out, CleanOutput::Single(None));
    }

    #[test]
    fn null_field_counts_as_absent() {
        let out = project(&CleanInput::from("x"), &json!({"result": null}), &ExtractionRule::field("result"));
        assert_eq!(out, CleanOutput::Single(None));
    }

    #[test]
    fn batch_matches_keys_by_position() {
        let input = CleanInput::from(json!({"first": "a", "second": "b", "third": "c"}));
        let raw = json!([{"result": "A"}, {"qc": 2}, {"result": "C"}]);
        let out = project(&input, &raw, &ExtractionRule::field("result"));

        let mut expected = IndexMap::new();
        expected.insert(ItemKey::from("first"), Some(json!("A")));
        expected.insert(ItemKey::from("second"), None);
        expected.insert(ItemKey::from("third"), Some(json!("C")));
        assert_eq!(out, CleanOutput::Batch(expected));
    }

    #[test]
    fn short_response_fills_missing_items_with_none() {
        let input = CleanInput::from(vec!["a", "b"]);
        let out = project(&input, &json!([{"phone": "1"}]), &ExtractionRule::field("phone"));
        assert_eq!(out.len(), 2);
        assert_eq!(out.get(0usize), Some(&json!("1")));
        assert_eq!(out.get(1usize), None);
    }

    #[test]
    fn non_array_response_for_batch_yields_none() {
        let input = CleanInput::from(vec!["a"]);
        let out = project(&input, &json!({"detail": "oops"}), &ExtractionRule::field("phone"));
        assert_eq!(out.batch().map(|items| items.len()), Some(1));
        assert_eq!(out.get(0usize), None);
    }

    #[test]
    fn projection_sees_whole_response() {
        let input = CleanInput::from(vec!["a", "b", "c"]);
        let raw = json!([{"qc": 0}, {"qc": 1}, {"qc": 0}]);
        let rule = ExtractionRule::projection(|raw| raw.as_array().map(|items| json!(items.len())));
        let out = project(&input, &raw, &rule);
        for position in 0..3usize {
            assert_eq!(out.get(position), Some(&json!(3)));
        }
    }

    #[test]
    fn projection_applies_to_single_input() {
        let rule = ExtractionRule::projection(|raw| {
            let item = raw.get(0)?;
            let series = item.get("series")?.as_str()?;
            let number = item.get("number")?.as_str()?;
            Some(json!(format!("{series} {number}")))
        });
        let raw = json!([{"series": "45 08", "number": "123456"}]);
        let out = project(&CleanInput::from("4508 123456"), &raw, &rule);
        assert_eq!(out.single(), Some(&json!("45 08 123456")));
    }

    #[test]
    fn empty_batch_projects_to_empty_mapping() {
        let out = project(&CleanInput::from(Vec::<String>::new()), &json!([]), &ExtractionRule::field("x"));
        assert_eq!(out, CleanOutput::Batch(IndexMap::new()));
    }
}
