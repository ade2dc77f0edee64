//! # Entity Schemas
//!
//! Declarative description of one entity type: which fields the form
//! shows, how each UI field name maps onto the API request-body name, which
//! constant keys every create/update carries, where the list/write endpoints
//! live, and whether the entity uploads a file before saving.
//!
//! The list view, the add/edit dialog and the CLI all read the same
//! [`EntitySchema`], so the field-name mapping exists exactly once per
//! entity. [`EntitySchema::check`] rejects schemas whose mapping has drifted
//! (duplicate names, constants shadowing fields, dangling upload targets).

use std::collections::BTreeSet;

use crate::error::SchemaError;
use crate::kind::EntityKind;

/// How a field is edited and how its value is checked and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    LongText,
    /// Decimal number, sent as a JSON number.
    Number,
    /// Checkbox, sent as a JSON boolean.
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Email address.
    Email,
    /// Password; never seeded from a record and omitted when left blank.
    Password,
    /// One of a fixed set of values.
    Select(&'static [&'static str]),
    /// Identifier picked from another entity's option list.
    Reference(EntityKind),
    /// Stored file name obtained from the upload endpoint.
    File,
}

impl FieldKind {
    /// Short name for listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "long-text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Email => "email",
            Self::Password => "password",
            Self::Select(_) => "select",
            Self::Reference(_) => "reference",
            Self::File => "file",
        }
    }
}

/// When a field must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// May be left empty.
    Optional,
    /// Must be filled in on create and on edit.
    Always,
    /// Must be filled in on create only (passwords, initial files).
    OnCreate,
}

/// One form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name used by the form and the draft.
    pub name: &'static str,
    /// Name used in the API request body and in fetched records.
    pub api_name: &'static str,
    /// Human label, used in messages.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Requirement rule.
    pub requirement: Requirement,
    /// Shown as a list column, searchable and sortable.
    pub listed: bool,
    /// Initial value in create mode.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// An optional, unlisted field.
    pub const fn new(
        name: &'static str,
        api_name: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            api_name,
            label,
            kind,
            requirement: Requirement::Optional,
            listed: false,
            default: None,
        }
    }

    /// Mark the field as always required.
    pub const fn required(mut self) -> Self {
        self.requirement = Requirement::Always;
        self
    }

    /// Mark the field as required on create only.
    pub const fn required_on_create(mut self) -> Self {
        self.requirement = Requirement::OnCreate;
        self
    }

    /// Show the field as a list column.
    pub const fn listed(mut self) -> Self {
        self.listed = true;
        self
    }

    /// Initial value in create mode.
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether the field must be non-empty for the given mode.
    pub fn is_required(&self, creating: bool) -> bool {
        match self.requirement {
            Requirement::Optional => false,
            Requirement::Always => true,
            Requirement::OnCreate => creating,
        }
    }
}

/// A rule spanning more than one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRule {
    /// `field` is required whenever `when` holds one of `equals`.
    RequiredWhen {
        /// Field that becomes required.
        field: &'static str,
        /// Field whose value switches the rule on.
        when: &'static str,
        /// Values of `when` that switch the rule on.
        equals: &'static [&'static str],
    },
}

/// How the list of an entity is paginated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// The whole collection is fetched once and paged locally.
    Client,
    /// Each page/search/sort change refetches with query parameters.
    Server,
}

/// REST paths of an entity, relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSet {
    /// `GET` list endpoint.
    pub list: Option<&'static str>,
    /// `POST` create endpoint.
    pub create: Option<&'static str>,
    /// `POST` update endpoint.
    pub update: Option<&'static str>,
    /// `DELETE` endpoint, called with `?id=<id>`.
    pub delete: Option<&'static str>,
    /// Query parameter carrying the selector value (e.g. the chosen act)
    /// for selector-driven lists.
    pub parent_param: Option<&'static str>,
    /// `GET` endpoint returning `{value,label}` options for this entity.
    pub options: Option<&'static str>,
}

impl EndpointSet {
    /// An endpoint set with only a list path.
    pub const fn list_only(list: &'static str) -> Self {
        Self {
            list: Some(list),
            create: None,
            update: None,
            delete: None,
            parent_param: None,
            options: None,
        }
    }

    /// The usual list/create/update/delete quadruple.
    pub const fn crud(
        list: &'static str,
        create: &'static str,
        update: &'static str,
        delete: &'static str,
    ) -> Self {
        Self {
            list: Some(list),
            create: Some(create),
            update: Some(update),
            delete: Some(delete),
            parent_param: None,
            options: None,
        }
    }

    /// Add a selector query parameter to the list endpoint.
    pub const fn with_parent(mut self, param: &'static str) -> Self {
        self.parent_param = Some(param);
        self
    }

    /// Add an options endpoint.
    pub const fn with_options(mut self, path: &'static str) -> Self {
        self.options = Some(path);
        self
    }
}

/// File upload performed before the metadata request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSpec {
    /// Value of the `from` query parameter on the upload endpoint.
    pub from: &'static str,
    /// UI name of the [`FieldKind::File`] field receiving the stored name.
    pub field: &'static str,
    /// Accepted extensions, lowercase, without the dot.
    pub allowed_extensions: &'static [&'static str],
    /// Maximum accepted size in bytes.
    pub max_bytes: u64,
}

/// Declarative description of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Entity kind.
    pub kind: EntityKind,
    /// Singular display label ("Act").
    pub label: &'static str,
    /// Key of the identifier in records and update/delete requests.
    pub id_field: &'static str,
    /// REST paths.
    pub endpoints: EndpointSet,
    /// List pagination mode.
    pub pagination: PaginationMode,
    /// Form fields, in display order.
    pub fields: &'static [FieldSpec],
    /// Cross-field rules, checked after per-field rules.
    pub rules: &'static [FormRule],
    /// Constant keys added to every create request.
    pub create_constants: &'static [(&'static str, &'static str)],
    /// Constant keys added to every update request.
    pub update_constants: &'static [(&'static str, &'static str)],
    /// Upload performed before create/update, if any.
    pub upload: Option<UploadSpec>,
}

impl EntitySchema {
    /// Look up a field by UI name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields shown as list columns.
    pub fn listed_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.listed)
    }

    /// Verify the schema is internally consistent.
    pub fn check(&self) -> Result<(), SchemaError> {
        let entity = self.label;
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields { entity });
        }

        let mut names = BTreeSet::new();
        let mut api_names = BTreeSet::new();
        for field in self.fields {
            if !names.insert(field.name) {
                return Err(SchemaError::DuplicateName {
                    entity,
                    name: field.name,
                });
            }
            if !api_names.insert(field.api_name) {
                return Err(SchemaError::DuplicateApiName {
                    entity,
                    name: field.api_name,
                });
            }
            if let FieldKind::Select(options) = field.kind {
                if options.is_empty() {
                    return Err(SchemaError::EmptySelect {
                        entity,
                        name: field.name,
                    });
                }
            }
        }

        if api_names.contains(self.id_field) {
            return Err(SchemaError::IdCollision {
                entity,
                name: self.id_field,
            });
        }

        for (key, _) in self.create_constants.iter().chain(self.update_constants) {
            if api_names.contains(key) || *key == self.id_field {
                return Err(SchemaError::ConstantCollision { entity, name: *key });
            }
        }

        if let Some(upload) = &self.upload {
            match self.field(upload.field) {
                Some(f) if f.kind == FieldKind::File => {}
                _ => {
                    return Err(SchemaError::UploadTarget {
                        entity,
                        name: upload.field,
                    })
                }
            }
        }

        for rule in self.rules {
            let FormRule::RequiredWhen { field, when, .. } = rule;
            for name in [*field, *when] {
                if !names.contains(name) {
                    return Err(SchemaError::RuleField { entity, name });
                }
            }
        }

        // Create-only schemas (copy) are fine; update-only ones are not.
        if self.endpoints.update.is_some() && self.endpoints.create.is_none() {
            return Err(SchemaError::Endpoints {
                entity,
                reason: "update endpoint without create endpoint",
            });
        }
        if self.endpoints.parent_param.is_some() && self.endpoints.list.is_none() {
            return Err(SchemaError::Endpoints {
                entity,
                reason: "parent parameter without list endpoint",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::new("formName", "form_name", "Form name", FieldKind::Text)
            .required()
            .listed(),
        FieldSpec::new("file", "form_file", "File", FieldKind::File).required_on_create(),
    ];

    fn base() -> EntitySchema {
        EntitySchema {
            kind: EntityKind::Form,
            label: "Form",
            id_field: "_id",
            endpoints: EndpointSet::crud("f/list", "f/create", "f/update", "f/remove"),
            pagination: PaginationMode::Client,
            fields: FIELDS,
            rules: &[],
            create_constants: &[],
            update_constants: &[],
            upload: Some(UploadSpec {
                from: "form",
                field: "file",
                allowed_extensions: &["pdf"],
                max_bytes: 1024,
            }),
        }
    }

    #[test]
    fn consistent_schema_passes() {
        base().check().unwrap();
    }

    #[test]
    fn requirement_depends_on_mode() {
        let file = base().field("file").unwrap();
        assert!(file.is_required(true));
        assert!(!file.is_required(false));
        assert!(base().field("formName").unwrap().is_required(false));
    }

    #[test]
    fn constant_shadowing_a_field_is_rejected() {
        let mut schema = base();
        schema.create_constants = &[("form_name", "x")];
        assert_eq!(
            schema.check(),
            Err(SchemaError::ConstantCollision {
                entity: "Form",
                name: "form_name"
            })
        );
    }

    #[test]
    fn upload_must_target_a_file_field() {
        let mut schema = base();
        schema.upload = Some(UploadSpec {
            from: "form",
            field: "formName",
            allowed_extensions: &["pdf"],
            max_bytes: 1,
        });
        assert!(matches!(schema.check(), Err(SchemaError::UploadTarget { .. })));
    }

    #[test]
    fn duplicate_api_names_are_rejected() {
        const DUP: &[FieldSpec] = &[
            FieldSpec::new("a", "same", "A", FieldKind::Text),
            FieldSpec::new("b", "same", "B", FieldKind::Text),
        ];
        let mut schema = base();
        schema.fields = DUP;
        schema.upload = None;
        assert!(matches!(
            schema.check(),
            Err(SchemaError::DuplicateApiName { name: "same", .. })
        ));
    }

    #[test]
    fn rule_with_unknown_field_is_rejected() {
        let mut schema = base();
        schema.rules = &[FormRule::RequiredWhen {
            field: "dueDate",
            when: "formName",
            equals: &["x"],
        }];
        assert!(matches!(
            schema.check(),
            Err(SchemaError::RuleField { name: "dueDate", .. })
        ));
    }

    #[test]
    fn id_field_may_not_be_a_form_field() {
        let mut schema = base();
        schema.id_field = "form_name";
        assert!(matches!(schema.check(), Err(SchemaError::IdCollision { .. })));
    }
}
