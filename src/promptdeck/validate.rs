//! Schema validation for untrusted library documents.
//!
//! This is the sole gate between an imported document and the store. Checks
//! run in a fixed order and the first failure wins; every rejection carries
//! the specific rule that was violated. Locally-persisted state never goes
//! through here; it is healed leniently by [`crate::model::Library::normalize`].

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{DeckError, Result};

pub fn validate(doc: &Value) -> Result<()> {
    let root = doc
        .as_object()
        .ok_or_else(|| invalid("Root must be an object."))?;

    let categories = required_array(root, "categories")?;
    let prompts = required_array(root, "prompts")?;
    let checkpoint_categories = optional_array(root, "checkpointCategories")?;
    let checkpoints = optional_array(root, "checkpoints")?;

    for category in categories {
        check_category(category, "category")?;
    }
    if let Some(entries) = checkpoint_categories {
        for category in entries {
            check_category(category, "checkpoint category")?;
        }
    }
    for prompt in prompts {
        check_prompt(prompt)?;
    }
    if let Some(entries) = checkpoints {
        for checkpoint in entries {
            check_checkpoint(checkpoint)?;
        }
    }

    let category_ids = id_set(categories);
    for prompt in prompts {
        let category_id = str_field(prompt, "categoryId").unwrap_or_default();
        if !category_ids.contains(category_id) {
            return Err(invalid(format!(
                "Prompt \"{}\" references missing categoryId \"{}\".",
                str_field(prompt, "title").unwrap_or_default(),
                category_id
            )));
        }
    }
    if let Some(entries) = checkpoints {
        // checkpoints resolve against their own family when it is present,
        // otherwise against the prompt categories
        let source = checkpoint_categories.unwrap_or(categories);
        let checkpoint_category_ids = id_set(source);
        for checkpoint in entries {
            let category_id = str_field(checkpoint, "categoryId").unwrap_or_default();
            if !checkpoint_category_ids.contains(category_id) {
                return Err(invalid(format!(
                    "Checkpoint \"{}\" references missing categoryId \"{}\".",
                    str_field(checkpoint, "title").unwrap_or_default(),
                    category_id
                )));
            }
        }
    }

    check_duplicates(categories, "category")?;
    check_duplicates(prompts, "prompt")?;
    if let Some(entries) = checkpoint_categories {
        check_duplicates(entries, "checkpoint category")?;
    }
    if let Some(entries) = checkpoints {
        check_duplicates(entries, "checkpoint")?;
    }

    Ok(())
}

fn invalid(reason: impl Into<String>) -> DeckError {
    DeckError::Validation(reason.into())
}

fn required_array<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
    root.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| invalid(format!("Missing \"{}\" array.", key)))
}

fn optional_array<'a>(root: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match root.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_array()
            .map(Some)
            .ok_or_else(|| invalid(format!("\"{}\" must be an array when provided.", key))),
    }
}

fn str_field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

fn has_nonempty_str(entry: &Value, key: &str) -> bool {
    str_field(entry, key).is_some_and(|s| !s.trim().is_empty())
}

fn has_str(entry: &Value, key: &str) -> bool {
    str_field(entry, key).is_some()
}

fn check_category(entry: &Value, label: &str) -> Result<()> {
    if !entry.is_object() {
        return Err(invalid(format!("{} entries must be objects.", capitalize(label))));
    }
    if !has_nonempty_str(entry, "id") {
        return Err(invalid(format!(
            "Each {} must have a non-empty string id.",
            label
        )));
    }
    if !has_nonempty_str(entry, "name") {
        return Err(invalid(format!(
            "Each {} must have a non-empty string name.",
            label
        )));
    }
    Ok(())
}

fn check_prompt(entry: &Value) -> Result<()> {
    if !entry.is_object() {
        return Err(invalid("Prompt entries must be objects."));
    }
    for key in ["id", "categoryId", "title"] {
        if !has_nonempty_str(entry, key) {
            return Err(invalid(format!(
                "Each prompt must have a non-empty string {}.",
                key
            )));
        }
    }
    if !has_str(entry, "body") {
        return Err(invalid("Each prompt must have a string body."));
    }
    Ok(())
}

fn check_checkpoint(entry: &Value) -> Result<()> {
    if !entry.is_object() {
        return Err(invalid("Checkpoint entries must be objects."));
    }
    for key in ["id", "categoryId", "title"] {
        if !has_nonempty_str(entry, key) {
            return Err(invalid(format!(
                "Each checkpoint must have a non-empty string {}.",
                key
            )));
        }
    }
    if !has_str(entry, "description") {
        return Err(invalid("Each checkpoint must have a string description."));
    }
    if !has_str(entry, "body") {
        return Err(invalid("Each checkpoint must have a string body."));
    }
    if !has_nonempty_str(entry, "savedAt") {
        return Err(invalid("Each checkpoint must have a savedAt ISO string."));
    }
    Ok(())
}

fn check_duplicates(entries: &[Value], label: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if let Some(id) = str_field(entry, "id") {
            if !seen.insert(id) {
                return Err(invalid(format!("Duplicate {} id: {}", label, id)));
            }
        }
    }
    Ok(())
}

fn id_set(entries: &[Value]) -> HashSet<&str> {
    entries
        .iter()
        .filter_map(|e| str_field(e, "id"))
        .collect()
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(doc: &Value) -> String {
        match validate(doc) {
            Err(DeckError::Validation(reason)) => reason,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn accepts_the_sample_library() {
        let doc = serde_json::to_value(crate::model::sample_library()).unwrap();
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn accepts_minimal_document_without_checkpoint_collections() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [{"id": "p1", "categoryId": "c1", "title": "T", "body": ""}],
        });
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn rejects_non_object_root() {
        assert_eq!(reason(&json!([1, 2])), "Root must be an object.");
    }

    #[test]
    fn rejects_missing_required_arrays() {
        assert_eq!(
            reason(&json!({"prompts": []})),
            "Missing \"categories\" array."
        );
        assert_eq!(
            reason(&json!({"categories": []})),
            "Missing \"prompts\" array."
        );
    }

    #[test]
    fn rejects_non_array_optional_collections() {
        let doc = json!({"categories": [], "prompts": [], "checkpoints": 3});
        assert_eq!(reason(&doc), "\"checkpoints\" must be an array when provided.");
    }

    #[test]
    fn rejects_blank_category_name() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "   "}],
            "prompts": [],
        });
        assert_eq!(
            reason(&doc),
            "Each category must have a non-empty string name."
        );
    }

    #[test]
    fn rejects_prompt_without_title() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [{"id": "p1", "categoryId": "c1", "body": "x"}],
        });
        assert_eq!(
            reason(&doc),
            "Each prompt must have a non-empty string title."
        );
    }

    #[test]
    fn allows_empty_prompt_body_but_not_missing() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [{"id": "p1", "categoryId": "c1", "title": "T"}],
        });
        assert_eq!(reason(&doc), "Each prompt must have a string body.");
    }

    #[test]
    fn rejects_prompt_referencing_missing_category() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [{"id": "p1", "categoryId": "ghost", "title": "T", "body": ""}],
        });
        assert_eq!(
            reason(&doc),
            "Prompt \"T\" references missing categoryId \"ghost\"."
        );
    }

    #[test]
    fn checkpoints_fall_back_to_prompt_categories_when_family_absent() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [],
            "checkpoints": [{
                "id": "cp1", "categoryId": "c1", "title": "T",
                "description": "", "body": "", "savedAt": "2026-01-01T00:00:00Z",
            }],
        });
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn checkpoints_do_not_fall_back_when_family_present() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [],
            "checkpointCategories": [],
            "checkpoints": [{
                "id": "cp1", "categoryId": "c1", "title": "T",
                "description": "", "body": "", "savedAt": "2026-01-01T00:00:00Z",
            }],
        });
        assert_eq!(
            reason(&doc),
            "Checkpoint \"T\" references missing categoryId \"c1\"."
        );
    }

    #[test]
    fn rejects_checkpoint_without_saved_at() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "One"}],
            "prompts": [],
            "checkpoints": [{
                "id": "cp1", "categoryId": "c1", "title": "T",
                "description": "", "body": "",
            }],
        });
        assert_eq!(reason(&doc), "Each checkpoint must have a savedAt ISO string.");
    }

    #[test]
    fn rejects_duplicate_ids_per_collection() {
        let doc = json!({
            "categories": [{"id": "c1", "name": "A"}, {"id": "c1", "name": "B"}],
            "prompts": [],
        });
        assert_eq!(reason(&doc), "Duplicate category id: c1");

        let doc = json!({
            "categories": [{"id": "c1", "name": "A"}],
            "prompts": [
                {"id": "p1", "categoryId": "c1", "title": "T", "body": ""},
                {"id": "p1", "categoryId": "c1", "title": "U", "body": ""},
            ],
        });
        assert_eq!(reason(&doc), "Duplicate prompt id: p1");
    }

    #[test]
    fn same_id_across_collections_is_allowed() {
        let doc = json!({
            "categories": [{"id": "shared", "name": "A"}],
            "prompts": [{"id": "shared", "categoryId": "shared", "title": "T", "body": ""}],
        });
        assert!(validate(&doc).is_ok());
    }
}
