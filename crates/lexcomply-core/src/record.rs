//! # Records and Drafts
//!
//! A [`Record`] is a flat JSON object exactly as the API returned it. A
//! [`Draft`] is the dialog-local editable copy, keyed by UI field names.
//! Moving between the two always goes through the schema's field mapping:
//! [`Draft::from_record`] maps API names back to UI names when an edit
//! dialog opens, and [`Draft::to_payload`] maps UI names to API names (plus
//! constants and the identifier) when it submits.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ValidationError;
use crate::schema::{EntitySchema, FieldKind};

/// A record as fetched from the API.
pub type Record = serde_json::Map<String, Value>;

/// Whether a dialog creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    /// No identifier yet.
    Create,
    /// Editing the record with this identifier.
    Edit {
        /// Identifier of the record being edited.
        id: String,
    },
}

impl DraftMode {
    /// `true` in create mode.
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }
}

/// Render a JSON value the way a text input would show it.
///
/// `null` renders as `None`; strings are returned verbatim; numbers and
/// booleans use their JSON spelling; arrays and objects are serialized.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Identifier of a fetched record under `id_field`, if present.
pub fn record_id(record: &Record, id_field: &str) -> Option<String> {
    record
        .get(id_field)
        .and_then(value_text)
        .filter(|s| !s.trim().is_empty())
}

/// Dialog-local editable copy of a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    values: BTreeMap<String, Value>,
}

impl Draft {
    /// A draft holding each field's default, or an empty string.
    pub fn empty(schema: &EntitySchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| {
                let v = f.default.map(Value::from).unwrap_or_else(|| Value::from(""));
                (f.name.to_string(), v)
            })
            .collect();
        Self { values }
    }

    /// A draft seeded from a fetched record. Password fields are never
    /// seeded; missing keys fall back to an empty string.
    pub fn from_record(schema: &EntitySchema, record: &Record) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| {
                let v = match f.kind {
                    FieldKind::Password => Value::from(""),
                    _ => match record.get(f.api_name) {
                        Some(Value::Null) | None => Value::from(""),
                        Some(v) => v.clone(),
                    },
                };
                (f.name.to_string(), v)
            })
            .collect();
        Self { values }
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Trimmed text of a field; `None` when empty.
    pub fn text(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .and_then(value_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Set a field by UI name. Unknown names are rejected so a typo cannot
    /// silently drop input.
    pub fn set(
        &mut self,
        schema: &EntitySchema,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        if schema.field(name).is_none() {
            return Err(ValidationError::UnknownField {
                field: name.to_string(),
                entity: schema.label.to_string(),
            });
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Iterate `(ui_name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build the request body for this draft.
    ///
    /// Every field is emitted under its API name. Blank numbers, booleans
    /// and dates become `null`; blank passwords are omitted so an edit does
    /// not reset them; other blank fields are sent as `""`. The schema's
    /// create or update constants are added, and in edit mode the
    /// identifier is added under the schema's id field.
    pub fn to_payload(&self, schema: &EntitySchema, mode: &DraftMode) -> Record {
        let mut body = Record::new();
        for field in schema.fields {
            let text = self.text(field.name);
            let encoded = match (field.kind, text) {
                (FieldKind::Password, None) => continue,
                (FieldKind::Number | FieldKind::Boolean | FieldKind::Date, None) => Value::Null,
                (_, None) => Value::from(""),
                (FieldKind::Number, Some(t)) => t
                    .parse::<i64>()
                    .map(Value::from)
                    .or_else(|_| t.parse::<f64>().map(Value::from))
                    .unwrap_or(Value::String(t)),
                (FieldKind::Boolean, Some(t)) => match t.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => Value::String(t),
                },
                (_, Some(t)) => Value::String(t),
            };
            body.insert(field.api_name.to_string(), encoded);
        }

        let constants = match mode {
            DraftMode::Create => schema.create_constants,
            DraftMode::Edit { .. } => schema.update_constants,
        };
        for (key, value) in constants {
            body.insert((*key).to_string(), Value::from(*value));
        }

        if let DraftMode::Edit { id } = mode {
            body.insert(schema.id_field.to_string(), Value::from(id.as_str()));
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_draft_uses_defaults() {
        let draft = Draft::empty(&registry::ADMIN);
        assert_eq!(draft.text("role").as_deref(), Some("admin"));
        assert_eq!(draft.text("active").as_deref(), Some("true"));
        assert_eq!(draft.text("name"), None);
    }

    #[test]
    fn edit_seeding_maps_api_names_to_ui_names() {
        let rec = record(json!({
            "_id": "f-1",
            "form_name": "Form A",
            "form_no": 12,
            "act_id": "act-9",
            "description": null,
            "form_file": "stored-a.pdf"
        }));
        let draft = Draft::from_record(&registry::FORM, &rec);
        assert_eq!(draft.text("formName").as_deref(), Some("Form A"));
        assert_eq!(draft.text("formNumber").as_deref(), Some("12"));
        assert_eq!(draft.text("actId").as_deref(), Some("act-9"));
        assert_eq!(draft.text("description"), None);
        assert_eq!(draft.text("file").as_deref(), Some("stored-a.pdf"));
        assert_eq!(record_id(&rec, "_id").as_deref(), Some("f-1"));
    }

    #[test]
    fn passwords_are_never_seeded() {
        let rec = record(json!({"name": "A", "email": "a@x.io", "password": "hash"}));
        let draft = Draft::from_record(&registry::ADMIN, &rec);
        assert_eq!(draft.text("password"), None);
    }

    #[test]
    fn create_payload_adds_create_constants() {
        let schema = &registry::ACT;
        let mut draft = Draft::empty(schema);
        draft.set(schema, "name", "Factories Act").unwrap();
        draft.set(schema, "description", "Workplace safety").unwrap();
        draft.set(schema, "continent", "asia").unwrap();
        draft.set(schema, "actType", "central").unwrap();

        let body = draft.to_payload(schema, &DraftMode::Create);
        assert_eq!(body["name"], "Factories Act");
        assert_eq!(body["type"], "central");
        assert_eq!(body["category"], "statutory");
        assert_eq!(body["edit"], "0");
        assert!(!body.contains_key("actType"));
        assert!(!body.contains_key("_id"));
    }

    #[test]
    fn edit_payload_carries_id_and_update_constants() {
        let schema = &registry::ACT;
        let draft = Draft::empty(schema);
        let body = draft.to_payload(
            schema,
            &DraftMode::Edit {
                id: "act-1".into(),
            },
        );
        assert_eq!(body["_id"], "act-1");
        assert_eq!(body["edit"], "1");
    }

    #[test]
    fn blank_password_is_omitted_and_booleans_are_typed() {
        let schema = &registry::ADMIN;
        let mut draft = Draft::empty(schema);
        draft.set(schema, "active", "false").unwrap();
        let body = draft.to_payload(schema, &DraftMode::Edit { id: "a".into() });
        assert!(!body.contains_key("password"));
        assert_eq!(body["is_active"], Value::Bool(false));
    }

    #[test]
    fn blank_dates_become_null() {
        let schema = &registry::COMPLIANCE;
        let body = Draft::empty(schema).to_payload(schema, &DraftMode::Create);
        assert_eq!(body["due_date"], Value::Null);
        assert_eq!(body["title"], "");
    }

    #[test]
    fn setting_unknown_field_fails() {
        let schema = &registry::STATE;
        let mut draft = Draft::empty(schema);
        let err = draft.set(schema, "capital", "x").unwrap_err();
        assert_eq!(err.field(), Some("capital"));
    }

    mod mapping_props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_text_field_lands_under_its_api_name(
                name in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
                desc in "[a-z]{1,30}",
            ) {
                let schema = &registry::ACT_TYPE;
                let mut draft = Draft::empty(schema);
                draft.set(schema, "typeName", name.clone()).unwrap();
                draft.set(schema, "description", desc.clone()).unwrap();
                let body = draft.to_payload(schema, &DraftMode::Create);
                prop_assert_eq!(body["type_name"].as_str(), Some(name.trim()));
                prop_assert_eq!(body["description"].as_str(), Some(desc.as_str()));
                prop_assert_eq!(body.len(), schema.fields.len());
            }

            #[test]
            fn seeding_then_mapping_preserves_values(
                state in "[A-Z][a-z]{2,12}",
                code in "[A-Z]{2}",
            ) {
                let schema = &registry::STATE;
                let mut rec = Record::new();
                rec.insert("_id".into(), Value::from("s-1"));
                rec.insert("state_name".into(), Value::from(state.clone()));
                rec.insert("state_code".into(), Value::from(code.clone()));
                rec.insert("country".into(), Value::from("India"));
                let draft = Draft::from_record(schema, &rec);
                let body = draft.to_payload(schema, &DraftMode::Edit { id: "s-1".into() });
                prop_assert_eq!(body, rec);
            }
        }
    }
}
