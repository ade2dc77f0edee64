//! # Error Hierarchy
//!
//! Structured errors for schemas and drafts, built with `thiserror`.
//!
//! [`ValidationError`] is the client-side rejection of a draft: it always
//! names the offending field (when there is one) so a form can attach the
//! message next to the input. [`SchemaError`] reports drift inside a
//! declarative entity schema and is only ever raised by
//! [`EntitySchema::check`](crate::schema::EntitySchema::check).

use thiserror::Error;

/// A draft failed a client-side rule. No request has been sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{label} is required")]
    Required {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
    },

    /// A numeric field does not parse as a number.
    #[error("{label} must be a number (got \"{value}\")")]
    InvalidNumber {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
        /// The rejected input.
        value: String,
    },

    /// A date field is not a calendar date in `YYYY-MM-DD` form.
    #[error("{label} must be a date in YYYY-MM-DD format (got \"{value}\")")]
    InvalidDate {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
        /// The rejected input.
        value: String,
    },

    /// An email field is not a plausible address.
    #[error("{label} must be a valid email address")]
    InvalidEmail {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
    },

    /// A password is shorter than the minimum length.
    #[error("{label} must be at least {min} characters")]
    PasswordTooShort {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
        /// Minimum accepted length.
        min: usize,
    },

    /// A boolean field holds something other than `true` or `false`.
    #[error("{label} must be true or false (got \"{value}\")")]
    InvalidBoolean {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
        /// The rejected input.
        value: String,
    },

    /// A select field holds a value outside its option list.
    #[error("{label} must be one of [{allowed}] (got \"{value}\")")]
    NotAnOption {
        /// UI field name.
        field: String,
        /// Human label of the field.
        label: String,
        /// The rejected input.
        value: String,
        /// Comma-separated option list.
        allowed: String,
    },

    /// The draft refers to a field the schema does not declare.
    #[error("unknown field \"{field}\" for {entity}")]
    UnknownField {
        /// The unknown UI field name.
        field: String,
        /// Entity label.
        entity: String,
    },

    /// An attached file is empty.
    #[error("{file_name} is empty")]
    EmptyFile {
        /// UI field name of the file input.
        field: String,
        /// Name of the attached file.
        file_name: String,
    },

    /// An attached file has an extension outside the allowed list.
    #[error("{file_name} is not an accepted file type (allowed: {allowed})")]
    FileType {
        /// UI field name of the file input.
        field: String,
        /// Name of the attached file.
        file_name: String,
        /// Comma-separated list of accepted extensions.
        allowed: String,
    },

    /// An attached file exceeds the size limit.
    #[error("{file_name} is {size} bytes, larger than the {max} byte limit")]
    FileTooLarge {
        /// UI field name of the file input.
        field: String,
        /// Name of the attached file.
        file_name: String,
        /// Actual size.
        size: u64,
        /// Maximum size.
        max: u64,
    },

    /// A file field was given text instead of an attached file.
    #[error("{label} must be attached as a file")]
    FileNotAttached {
        /// UI field name of the file input.
        field: String,
        /// Human label of the field.
        label: String,
    },

    /// A rule spanning several fields failed.
    #[error("{0}")]
    Form(String),
}

impl ValidationError {
    /// The UI field this error should be attached to, or `None` for a
    /// form-level message.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Required { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::PasswordTooShort { field, .. }
            | Self::InvalidBoolean { field, .. }
            | Self::NotAnOption { field, .. }
            | Self::UnknownField { field, .. }
            | Self::EmptyFile { field, .. }
            | Self::FileType { field, .. }
            | Self::FileTooLarge { field, .. }
            | Self::FileNotAttached { field, .. } => Some(field),
            Self::Form(_) => None,
        }
    }
}

/// An entity schema is internally inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema declares no fields.
    #[error("{entity}: schema declares no fields")]
    NoFields {
        /// Entity label.
        entity: &'static str,
    },

    /// Two fields share a UI name.
    #[error("{entity}: duplicate UI field name \"{name}\"")]
    DuplicateName {
        /// Entity label.
        entity: &'static str,
        /// The repeated name.
        name: &'static str,
    },

    /// Two fields map to the same API name.
    #[error("{entity}: duplicate API field name \"{name}\"")]
    DuplicateApiName {
        /// Entity label.
        entity: &'static str,
        /// The repeated name.
        name: &'static str,
    },

    /// A constant payload key collides with a field's API name or the id.
    #[error("{entity}: constant \"{name}\" collides with a mapped field")]
    ConstantCollision {
        /// Entity label.
        entity: &'static str,
        /// The colliding key.
        name: &'static str,
    },

    /// The identifier key is also used by a field.
    #[error("{entity}: id field \"{name}\" is also a form field")]
    IdCollision {
        /// Entity label.
        entity: &'static str,
        /// The id key.
        name: &'static str,
    },

    /// The upload settings targets a field that is missing or not a file input.
    #[error("{entity}: upload target \"{name}\" is not a file field")]
    UploadTarget {
        /// Entity label.
        entity: &'static str,
        /// The targeted UI field name.
        name: &'static str,
    },

    /// A select field has no options.
    #[error("{entity}: select field \"{name}\" has no options")]
    EmptySelect {
        /// Entity label.
        entity: &'static str,
        /// The select field.
        name: &'static str,
    },

    /// A form rule names a field the schema does not declare.
    #[error("{entity}: form rule references unknown field \"{name}\"")]
    RuleField {
        /// Entity label.
        entity: &'static str,
        /// The unknown field.
        name: &'static str,
    },

    /// The schema has a writable field set but no write endpoints, or a
    /// list parent parameter without a list endpoint.
    #[error("{entity}: {reason}")]
    Endpoints {
        /// Entity label.
        entity: &'static str,
        /// What is wrong with the endpoint set.
        reason: &'static str,
    },
}
