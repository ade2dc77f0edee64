//! Client-side draft validation.
//!
//! Rules run in field order and the first failure wins, so a form shows one
//! message at a time. Per-field rules run before the schema's cross-field
//! [`FormRule`]s. These checks mirror what the panel enforces before it
//! sends anything; the server remains free to reject more.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::record::{Draft, DraftMode};
use crate::schema::{EntitySchema, FieldKind, FieldSpec, FormRule};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate a draft against its schema.
pub fn validate_draft(
    schema: &EntitySchema,
    draft: &Draft,
    mode: &DraftMode,
) -> Result<(), ValidationError> {
    for field in schema.fields {
        match draft.text(field.name) {
            None if field.is_required(mode.is_create()) => {
                return Err(ValidationError::Required {
                    field: field.name.to_string(),
                    label: field.label.to_string(),
                });
            }
            None => {}
            Some(value) => check_value(field, &value)?,
        }
    }

    for rule in schema.rules {
        let FormRule::RequiredWhen {
            field,
            when,
            equals,
        } = rule;
        let triggered = draft
            .text(when)
            .map(|v| equals.iter().any(|e| e.eq_ignore_ascii_case(&v)))
            .unwrap_or(false);
        if triggered && draft.text(field).is_none() {
            let label = schema.field(field).map(|f| f.label).unwrap_or(*field);
            let when_label = schema.field(when).map(|f| f.label).unwrap_or(*when);
            return Err(ValidationError::Form(format!(
                "{label} is required when {when_label} is \"{}\"",
                draft.text(when).unwrap_or_default()
            )));
        }
    }
    Ok(())
}

/// Check one non-empty value against its field kind.
pub fn check_value(field: &FieldSpec, value: &str) -> Result<(), ValidationError> {
    let name = || field.name.to_string();
    let label = || field.label.to_string();
    match field.kind {
        FieldKind::Number => {
            if value.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false) {
                Ok(())
            } else {
                Err(ValidationError::InvalidNumber {
                    field: name(),
                    label: label(),
                    value: value.to_string(),
                })
            }
        }
        FieldKind::Date => parse_date(value).map(|_| ()).ok_or_else(|| {
            ValidationError::InvalidDate {
                field: name(),
                label: label(),
                value: value.to_string(),
            }
        }),
        FieldKind::Email => {
            if is_plausible_email(value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidEmail {
                    field: name(),
                    label: label(),
                })
            }
        }
        FieldKind::Password => {
            if value.chars().count() >= MIN_PASSWORD_LEN {
                Ok(())
            } else {
                Err(ValidationError::PasswordTooShort {
                    field: name(),
                    label: label(),
                    min: MIN_PASSWORD_LEN,
                })
            }
        }
        FieldKind::Boolean => match value {
            "true" | "false" => Ok(()),
            _ => Err(ValidationError::InvalidBoolean {
                field: name(),
                label: label(),
                value: value.to_string(),
            }),
        },
        FieldKind::Select(options) => {
            if options.contains(&value) {
                Ok(())
            } else {
                Err(ValidationError::NotAnOption {
                    field: name(),
                    label: label(),
                    value: value.to_string(),
                    allowed: options.join(", "),
                })
            }
        }
        FieldKind::Text
        | FieldKind::LongText
        | FieldKind::Reference(_)
        | FieldKind::File => Ok(()),
    }
}

/// Parse a `YYYY-MM-DD` date. Records sometimes carry a full ISO timestamp;
/// only the date part is considered.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let (date_part, rest) = if value.len() > 10 {
        match (value.get(..10), value.get(10..)) {
            (Some(date), Some(rest)) => (date, rest),
            _ => return None,
        }
    } else {
        (value, "")
    };
    if !rest.is_empty() && !rest.starts_with('T') {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn is_plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn act_draft() -> Draft {
        let schema = &registry::ACT;
        let mut d = Draft::empty(schema);
        d.set(schema, "name", "Factories Act").unwrap();
        d.set(schema, "description", "Workplace safety").unwrap();
        d.set(schema, "continent", "asia").unwrap();
        d.set(schema, "actType", "central").unwrap();
        d
    }

    #[test]
    fn complete_act_passes() {
        validate_draft(&registry::ACT, &act_draft(), &DraftMode::Create).unwrap();
    }

    #[test]
    fn first_missing_required_field_is_reported() {
        let schema = &registry::ACT;
        let mut d = act_draft();
        d.set(schema, "description", "   ").unwrap();
        d.set(schema, "continent", "").unwrap();
        let err = validate_draft(schema, &d, &DraftMode::Create).unwrap_err();
        assert_eq!(err.field(), Some("description"));
        assert_eq!(err.to_string(), "Description is required");
    }

    #[test]
    fn select_values_must_be_options() {
        let schema = &registry::ACT;
        let mut d = act_draft();
        d.set(schema, "continent", "atlantis").unwrap();
        let err = validate_draft(schema, &d, &DraftMode::Create).unwrap_err();
        assert!(matches!(err, ValidationError::NotAnOption { .. }));
    }

    #[test]
    fn state_acts_need_a_state() {
        let schema = &registry::ACT;
        let mut d = act_draft();
        d.set(schema, "actType", "state").unwrap();
        let err = validate_draft(schema, &d, &DraftMode::Create).unwrap_err();
        assert_eq!(err.field(), None);
        assert!(err.to_string().contains("State is required"));
        d.set(schema, "state", "Gujarat").unwrap();
        validate_draft(schema, &d, &DraftMode::Create).unwrap();
    }

    #[test]
    fn password_required_on_create_only() {
        let schema = &registry::ADMIN;
        let mut d = Draft::empty(schema);
        d.set(schema, "name", "Asha").unwrap();
        d.set(schema, "email", "asha@lexcomply.in").unwrap();
        let err = validate_draft(schema, &d, &DraftMode::Create).unwrap_err();
        assert_eq!(err.field(), Some("password"));
        validate_draft(schema, &d, &DraftMode::Edit { id: "1".into() }).unwrap();

        d.set(schema, "password", "short").unwrap();
        let err = validate_draft(schema, &d, &DraftMode::Edit { id: "1".into() }).unwrap_err();
        assert!(matches!(err, ValidationError::PasswordTooShort { min: 8, .. }));
    }

    #[test]
    fn email_shapes() {
        for good in ["a@b.co", "first.last@lexcomply.in"] {
            assert!(is_plausible_email(good), "{good}");
        }
        for bad in ["", "a", "@b.co", "a@b", "a@.co", "a b@c.io", "a@b@c.io", "a@b."] {
            assert!(!is_plausible_email(bad), "{bad}");
        }
    }

    #[test]
    fn dates_accept_plain_and_timestamp_forms() {
        assert!(parse_date("2025-03-31").is_some());
        assert!(parse_date("2025-03-31T00:00:00.000Z").is_some());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("31/03/2025").is_none());
        assert!(parse_date("2025-03-31 junk").is_none());
    }

    #[test]
    fn one_time_compliance_needs_due_date() {
        let schema = &registry::COMPLIANCE;
        let mut d = Draft::empty(schema);
        d.set(schema, "actId", "act-1").unwrap();
        d.set(schema, "title", "Annual return").unwrap();
        d.set(schema, "description", "File annual return").unwrap();
        d.set(schema, "periodicity", "one time").unwrap();
        assert!(matches!(
            validate_draft(schema, &d, &DraftMode::Create),
            Err(ValidationError::Form(_))
        ));
        d.set(schema, "dueDate", "2025-04-30").unwrap();
        validate_draft(schema, &d, &DraftMode::Create).unwrap();
    }
}
