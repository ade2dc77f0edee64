//! Response envelope handling.
//!
//! The API has no shared schema: list endpoints answer with a bare array,
//! with `{data: [...]}`, or with `{data: {rows|docs|list: [...], total}}`,
//! and writes answer 2xx with `{status, message, data}` where
//! `status: false` still means failure. Everything that turns a response
//! body into rows, options or a stored file name lives here so the clients
//! never index into raw JSON themselves.

use lexcomply_core::{value_text, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

const ROW_KEYS: &[&str] = &["rows", "docs", "list", "items", "result", "records"];
const TOTAL_KEYS: &[&str] = &["total", "totalDocs", "totalCount", "count"];
const FILE_NAME_KEYS: &[&str] = &["filename", "fileName", "file_name", "storedName", "key", "name"];

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    /// Rows on this page (all rows for unpaginated endpoints).
    pub rows: Vec<Record>,
    /// Total row count reported by the server, if any.
    pub total: Option<u64>,
}

/// A `{value, label}` option for selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value stored in the draft.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

/// The failure message of a 2xx body flagged `status: false` or
/// `success: false`.
pub(crate) fn rejection(body: &Value) -> Option<String> {
    let flagged = ["status", "success"]
        .iter()
        .any(|k| matches!(body.get(*k), Some(Value::Bool(false))));
    if !flagged {
        return None;
    }
    Some(
        ["message", "error", "msg"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
    )
}

/// Extract rows and total from a list response.
pub(crate) fn list_page(endpoint: &str, body: Value) -> Result<ListPage, ApiError> {
    let shape_err = |detail: &str| ApiError::UnexpectedShape {
        endpoint: endpoint.to_string(),
        detail: detail.to_string(),
    };

    let outer_total = body.as_object().and_then(total_in);
    let (rows, inner_total) = match body {
        Value::Array(items) => (items, None),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => (items, None),
            Some(Value::Object(mut data)) => {
                let total = total_in(&data);
                let items = take_rows(&mut data).ok_or_else(|| shape_err("no row array in data"))?;
                (items, total)
            }
            Some(Value::Null) => (Vec::new(), None),
            Some(_) => return Err(shape_err("data is neither an array nor an object")),
            None => {
                let items = take_rows(&mut obj).ok_or_else(|| shape_err("no row array"))?;
                (items, None)
            }
        },
        _ => return Err(shape_err("body is neither an array nor an object")),
    };

    let rows = rows
        .into_iter()
        .map(|row| match row {
            Value::Object(rec) => Ok(rec),
            _ => Err(shape_err("row is not an object")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListPage {
        rows,
        total: inner_total.or(outer_total),
    })
}

fn take_rows(obj: &mut serde_json::Map<String, Value>) -> Option<Vec<Value>> {
    ROW_KEYS.iter().find_map(|k| match obj.remove(*k) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    })
}

fn total_in(obj: &serde_json::Map<String, Value>) -> Option<u64> {
    TOTAL_KEYS.iter().find_map(|k| {
        obj.get(*k).and_then(|t| {
            t.as_u64()
                .or_else(|| t.as_str().and_then(|s| s.trim().parse().ok()))
        })
    })
}

/// Extract `{value,label}` options. Accepts arrays of strings or of
/// objects carrying `value|_id|id` and `label|name|title`.
pub(crate) fn options(endpoint: &str, body: Value) -> Result<Vec<SelectOption>, ApiError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            data => {
                if let Some(data) = data {
                    obj.insert("data".to_string(), data);
                }
                list_page(endpoint, Value::Object(obj))?
                    .rows
                    .into_iter()
                    .map(Value::Object)
                    .collect()
            }
        },
        _ => {
            return Err(ApiError::UnexpectedShape {
                endpoint: endpoint.to_string(),
                detail: "options body is neither an array nor an object".to_string(),
            })
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(SelectOption {
                value: s.clone(),
                label: s,
            }),
            Value::Object(obj) => {
                let value = ["value", "_id", "id"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(value_text));
                let label = ["label", "name", "title"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(value_text));
                match (value, label) {
                    (Some(value), Some(label)) => Ok(SelectOption { value, label }),
                    (Some(value), None) => Ok(SelectOption {
                        label: value.clone(),
                        value,
                    }),
                    _ => Err(ApiError::UnexpectedShape {
                        endpoint: endpoint.to_string(),
                        detail: "option without a value".to_string(),
                    }),
                }
            }
            _ => Err(ApiError::UnexpectedShape {
                endpoint: endpoint.to_string(),
                detail: "option is neither a string nor an object".to_string(),
            }),
        })
        .collect()
}

/// Build options out of list rows: the id field is the value, the first
/// non-empty label field is the label.
pub fn options_from_rows(rows: &[Record], id_field: &str, label_fields: &[&str]) -> Vec<SelectOption> {
    rows.iter()
        .filter_map(|row| {
            let value = lexcomply_core::record_id(row, id_field)?;
            let label = label_fields
                .iter()
                .find_map(|f| row.get(*f).and_then(value_text).filter(|s| !s.is_empty()))
                .unwrap_or_else(|| value.clone());
            Some(SelectOption { value, label })
        })
        .collect()
}

/// Extract the stored file name from an upload response.
pub(crate) fn stored_name(endpoint: &str, body: &Value) -> Result<String, ApiError> {
    let from_obj = |v: &Value| {
        FILE_NAME_KEYS
            .iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str))
            .map(str::to_string)
    };
    let found = match body.get("data") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(items)) => items.first().and_then(from_obj),
        Some(data @ Value::Object(_)) => from_obj(data),
        _ => from_obj(body),
    };
    found
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            detail: "upload response carries no file name".to_string(),
        })
}

/// Find a string under one of `keys`, at top level or inside `data`.
pub(crate) fn find_text(body: &Value, keys: &[&str]) -> Option<String> {
    let lookup = |v: &Value| keys.iter().find_map(|k| v.get(*k).and_then(value_text));
    match body.get("data") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(data @ Value::Object(_)) => lookup(data).or_else(|| lookup(body)),
        Some(Value::Array(items)) => items.first().and_then(lookup).or_else(|| lookup(body)),
        _ => lookup(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_is_a_page() {
        let page = list_page("GET x", json!([{"_id": "1"}, {"_id": "2"}])).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total, None);
    }

    #[test]
    fn data_array_with_top_level_total() {
        let page = list_page("GET x", json!({"status": true, "data": [{"_id": "1"}], "total": 40}))
            .unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.total, Some(40));
    }

    #[test]
    fn nested_docs_with_string_total() {
        let page = list_page(
            "GET x",
            json!({"data": {"docs": [{"_id": "1"}, {"_id": "2"}], "totalDocs": "12"}}),
        )
        .unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total, Some(12));
    }

    #[test]
    fn null_data_is_empty() {
        let page = list_page("GET x", json!({"status": true, "data": null})).unwrap();
        assert!(page.rows.is_empty());
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = list_page("GET x", json!({"data": [1, 2]})).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape { .. }));
    }

    #[test]
    fn missing_rows_is_unexpected_shape() {
        let err = list_page("GET x", json!({"message": "ok"})).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape { .. }));
    }

    #[test]
    fn rejection_detects_false_status() {
        assert_eq!(
            rejection(&json!({"status": false, "message": "Duplicate act"})),
            Some("Duplicate act".to_string())
        );
        assert_eq!(rejection(&json!({"success": false})), Some(String::new()));
        assert_eq!(rejection(&json!({"status": true})), None);
        assert_eq!(rejection(&json!({"status": "false"})), None);
    }

    #[test]
    fn options_accept_objects_and_strings() {
        let opts = options(
            "GET o",
            json!({"data": [{"_id": "a1", "name": "Factories Act"}, {"value": "a2", "label": "Companies Act"}]}),
        )
        .unwrap();
        assert_eq!(opts[0], SelectOption { value: "a1".into(), label: "Factories Act".into() });
        assert_eq!(opts[1].label, "Companies Act");

        let opts = options("GET o", json!(["asia", "europe"])).unwrap();
        assert_eq!(opts[1].value, "europe");
    }

    #[test]
    fn stored_name_shapes() {
        assert_eq!(stored_name("u", &json!({"data": "abc.pdf"})).unwrap(), "abc.pdf");
        assert_eq!(
            stored_name("u", &json!({"data": {"filename": "x-1.pdf"}})).unwrap(),
            "x-1.pdf"
        );
        assert_eq!(stored_name("u", &json!({"fileName": "y.pdf"})).unwrap(), "y.pdf");
        assert_eq!(
            stored_name("u", &json!({"data": [{"key": "z.pdf"}]})).unwrap(),
            "z.pdf"
        );
        assert!(stored_name("u", &json!({"status": true})).is_err());
    }

    #[test]
    fn options_from_rows_uses_label_fields() {
        let rows = vec![
            json!({"_id": "1", "name": "Factories Act"}),
            json!({"_id": "2"}),
            json!({"name": "orphan"}),
        ]
        .into_iter()
        .map(|v| match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        })
        .collect::<Vec<_>>();
        let opts = options_from_rows(&rows, "_id", &["name"]);
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].label, "Factories Act");
        assert_eq!(opts[1].label, "2");
    }

    #[test]
    fn find_text_looks_inside_data() {
        assert_eq!(
            find_text(&json!({"data": {"periodicity": "Monthly"}}), &["periodicity"]),
            Some("Monthly".into())
        );
        assert_eq!(
            find_text(&json!({"periodicity": "Ongoing"}), &["periodicity"]),
            Some("Ongoing".into())
        );
    }
}
