//! # Schema Registry
//!
//! The one place where every entity's field mapping, constants and
//! endpoints are declared. Paths are relative to the configured API base.

use crate::kind::EntityKind;
use crate::schema::{
    EndpointSet, EntitySchema, FieldKind, FieldSpec, FormRule, PaginationMode, UploadSpec,
};

const MIB: u64 = 1024 * 1024;

/// Periodicity values offered by the compliance form.
pub const PERIODICITIES: &[&str] = &[
    "one time",
    "monthly",
    "quarterly",
    "half yearly",
    "yearly",
    "event based",
    "ongoing",
];

const CONTINENTS: &[&str] = &[
    "asia",
    "africa",
    "europe",
    "north_america",
    "south_america",
    "oceania",
];

// -- Act ---------------------------------------------------------------------

const ACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "name", "Name", FieldKind::Text).required().listed(),
    FieldSpec::new("description", "description", "Description", FieldKind::LongText)
        .required()
        .listed(),
    FieldSpec::new("continent", "continent", "Continent", FieldKind::Select(CONTINENTS))
        .required()
        .listed(),
    FieldSpec::new(
        "actType",
        "type",
        "Type",
        FieldKind::Select(&["central", "state", "international"]),
    )
    .required()
    .listed(),
    FieldSpec::new("state", "state", "State", FieldKind::Text),
];

/// Act master. The only server-paginated list.
pub const ACT: EntitySchema = EntitySchema {
    kind: EntityKind::Act,
    label: "Act",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "actMaster/actMasterList",
        "actMaster/createActMaster",
        "actMaster/updateActMaster",
        "actMaster/removeActMaster",
    )
    .with_options("actMaster/getInternationalActDrop"),
    pagination: PaginationMode::Server,
    fields: ACT_FIELDS,
    rules: &[FormRule::RequiredWhen {
        field: "state",
        when: "actType",
        equals: &["state"],
    }],
    create_constants: &[("category", "statutory"), ("edit", "0")],
    update_constants: &[("category", "statutory"), ("edit", "1")],
    upload: None,
};

// -- Compliance --------------------------------------------------------------

const COMPLIANCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("actId", "act_id", "Act", FieldKind::Reference(EntityKind::Act)).required(),
    FieldSpec::new("title", "title", "Title", FieldKind::Text).required().listed(),
    FieldSpec::new("description", "description", "Description", FieldKind::LongText).required(),
    FieldSpec::new(
        "periodicity",
        "periodicity",
        "Periodicity",
        FieldKind::Select(PERIODICITIES),
    )
    .required()
    .listed(),
    FieldSpec::new("dueDate", "due_date", "Due date", FieldKind::Date).listed(),
    FieldSpec::new("section", "section", "Section", FieldKind::Text).listed(),
    FieldSpec::new("penalty", "penalty", "Penalty", FieldKind::LongText),
];

/// Compliance master; listed per selected act.
pub const COMPLIANCE: EntitySchema = EntitySchema {
    kind: EntityKind::Compliance,
    label: "Compliance",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "complianceMaster/complianceList",
        "complianceMaster/createCompliance",
        "complianceMaster/updateCompliance",
        "complianceMaster/removeCompliance",
    )
    .with_parent("act_id"),
    pagination: PaginationMode::Client,
    fields: COMPLIANCE_FIELDS,
    rules: &[FormRule::RequiredWhen {
        field: "dueDate",
        when: "periodicity",
        equals: &["one time"],
    }],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

const COMPLIANCE_COPY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("complianceId", "compliance_id", "Compliance", FieldKind::Text).required(),
    FieldSpec::new("actId", "act_id", "Target act", FieldKind::Reference(EntityKind::Act))
        .required(),
    FieldSpec::new("title", "title", "New title", FieldKind::Text),
    FieldSpec::new("stateId", "state_id", "Target state", FieldKind::Reference(EntityKind::State)),
];

/// Copy of an existing compliance onto another act. Create only.
pub const COMPLIANCE_COPY: EntitySchema = EntitySchema {
    kind: EntityKind::ComplianceCopy,
    label: "Compliance copy",
    id_field: "_id",
    endpoints: EndpointSet {
        list: None,
        create: Some("complianceMaster/copyCompliance"),
        update: None,
        delete: None,
        parent_param: None,
        options: None,
    },
    pagination: PaginationMode::Client,
    fields: COMPLIANCE_COPY_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

// -- Document / Form ---------------------------------------------------------

const DOCUMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("documentName", "document_name", "Document name", FieldKind::Text)
        .required()
        .listed(),
    FieldSpec::new(
        "documentType",
        "document_type",
        "Document type",
        FieldKind::Select(&["notification", "circular", "amendment", "gazette"]),
    )
    .required()
    .listed(),
    FieldSpec::new("actId", "act_id", "Act", FieldKind::Reference(EntityKind::Act)),
    FieldSpec::new("publishDate", "publish_date", "Publish date", FieldKind::Date).listed(),
    FieldSpec::new("file", "file_name", "File", FieldKind::File).required_on_create(),
];

/// Regulatory document with an uploaded file.
pub const DOCUMENT: EntitySchema = EntitySchema {
    kind: EntityKind::Document,
    label: "Document",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "documentMaster/documentList",
        "documentMaster/createDocument",
        "documentMaster/updateDocument",
        "documentMaster/removeDocument",
    ),
    pagination: PaginationMode::Client,
    fields: DOCUMENT_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: Some(UploadSpec {
        from: "document",
        field: "file",
        allowed_extensions: &["pdf", "doc", "docx"],
        max_bytes: 10 * MIB,
    }),
};

const FORM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("formName", "form_name", "Form name", FieldKind::Text)
        .required()
        .listed(),
    FieldSpec::new("formNumber", "form_no", "Form number", FieldKind::Text).listed(),
    FieldSpec::new("actId", "act_id", "Act", FieldKind::Reference(EntityKind::Act)).required(),
    FieldSpec::new("description", "description", "Description", FieldKind::LongText),
    FieldSpec::new("file", "form_file", "Form file", FieldKind::File).required_on_create(),
];

/// Statutory form template.
pub const FORM: EntitySchema = EntitySchema {
    kind: EntityKind::Form,
    label: "Form",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "formMaster/formMasterList",
        "formMaster/createFormMaster",
        "formMaster/updateFormMaster",
        "formMaster/removeFormMaster",
    ),
    pagination: PaginationMode::Client,
    fields: FORM_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: Some(UploadSpec {
        from: "form",
        field: "file",
        allowed_extensions: &["pdf", "doc", "docx", "xls", "xlsx"],
        max_bytes: 10 * MIB,
    }),
};

// -- Event -------------------------------------------------------------------

const EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("eventName", "event_name", "Event name", FieldKind::Text)
        .required()
        .listed(),
    FieldSpec::new("description", "description", "Description", FieldKind::LongText).listed(),
    FieldSpec::new(
        "periodicity",
        "periodicity",
        "Periodicity",
        FieldKind::Select(&["one time", "recurring"]),
    )
    .listed()
    .default_value("one time"),
];

/// Triggering event.
pub const EVENT: EntitySchema = EntitySchema {
    kind: EntityKind::Event,
    label: "Event",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "eventMaster/eventList",
        "eventMaster/createEvent",
        "eventMaster/updateEvent",
        "eventMaster/removeEvent",
    ),
    pagination: PaginationMode::Client,
    fields: EVENT_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

const EVENT_COMPLIANCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "title", "Compliance", FieldKind::Text).listed(),
    FieldSpec::new("actName", "act_name", "Act", FieldKind::Text).listed(),
    FieldSpec::new("periodicity", "periodicity", "Periodicity", FieldKind::Text).listed(),
];

/// Compliances linked to one event.
pub const EVENT_COMPLIANCE: EntitySchema = EntitySchema {
    kind: EntityKind::EventCompliance,
    label: "Event compliance",
    id_field: "_id",
    endpoints: EndpointSet::list_only("eventMaster/getEventCompliance").with_parent("event_id"),
    pagination: PaginationMode::Client,
    fields: EVENT_COMPLIANCE_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

// -- Dossier (news) ----------------------------------------------------------

const DOSSIER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "title", "Title", FieldKind::Text).required().listed(),
    FieldSpec::new("summary", "description", "Summary", FieldKind::LongText).required(),
    FieldSpec::new("newsDate", "news_date", "Date", FieldKind::Date)
        .required()
        .listed(),
    FieldSpec::new("state", "state", "State", FieldKind::Text).listed(),
    FieldSpec::new("sourceUrl", "source_url", "Source URL", FieldKind::Text),
    FieldSpec::new("attachment", "attachment", "Attachment", FieldKind::File),
];

/// News update / dossier entry.
pub const DOSSIER: EntitySchema = EntitySchema {
    kind: EntityKind::Dossier,
    label: "News",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "documentMaster/getIndianUpdateList",
        "documentMaster/createIndianUpdate",
        "documentMaster/updateIndianUpdate",
        "documentMaster/removeIndianUpdate",
    ),
    pagination: PaginationMode::Client,
    fields: DOSSIER_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: Some(UploadSpec {
        from: "news",
        field: "attachment",
        allowed_extensions: &["pdf", "png", "jpg", "jpeg"],
        max_bytes: 5 * MIB,
    }),
};

// -- Admin / State / Act type / Act category ---------------------------------

const ADMIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "name", "Name", FieldKind::Text).required().listed(),
    FieldSpec::new("email", "email", "Email", FieldKind::Email)
        .required()
        .listed(),
    FieldSpec::new("password", "password", "Password", FieldKind::Password).required_on_create(),
    FieldSpec::new(
        "role",
        "role",
        "Role",
        FieldKind::Select(&["super_admin", "admin", "editor"]),
    )
    .required()
    .listed()
    .default_value("admin"),
    FieldSpec::new("active", "is_active", "Active", FieldKind::Boolean).default_value("true"),
];

/// Administrator account.
pub const ADMIN: EntitySchema = EntitySchema {
    kind: EntityKind::Admin,
    label: "Admin",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "admin/adminList",
        "admin/createAdmin",
        "admin/updateAdmin",
        "admin/removeAdmin",
    ),
    pagination: PaginationMode::Client,
    fields: ADMIN_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

const STATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("stateName", "state_name", "State", FieldKind::Text)
        .required()
        .listed(),
    FieldSpec::new("stateCode", "state_code", "Code", FieldKind::Text).listed(),
    FieldSpec::new("country", "country", "Country", FieldKind::Text)
        .required()
        .listed()
        .default_value("India"),
];

/// State master.
pub const STATE: EntitySchema = EntitySchema {
    kind: EntityKind::State,
    label: "State",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "stateMaster/stateList",
        "stateMaster/createState",
        "stateMaster/updateState",
        "stateMaster/removeState",
    ),
    pagination: PaginationMode::Client,
    fields: STATE_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

const ACT_TYPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("typeName", "type_name", "Act type", FieldKind::Text)
        .required()
        .listed(),
    FieldSpec::new("description", "description", "Description", FieldKind::LongText),
];

/// Act type master.
pub const ACT_TYPE: EntitySchema = EntitySchema {
    kind: EntityKind::ActType,
    label: "Act type",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "actTypeMaster/actTypeList",
        "actTypeMaster/createActType",
        "actTypeMaster/updateActType",
        "actTypeMaster/removeActType",
    ),
    pagination: PaginationMode::Client,
    fields: ACT_TYPE_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

const ACT_CATEGORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("categoryName", "category_name", "Act category", FieldKind::Text)
        .required()
        .listed(),
    FieldSpec::new("description", "description", "Description", FieldKind::LongText),
];

/// Act category master.
pub const ACT_CATEGORY: EntitySchema = EntitySchema {
    kind: EntityKind::ActCategory,
    label: "Act category",
    id_field: "_id",
    endpoints: EndpointSet::crud(
        "actCategoryMaster/actCategoryList",
        "actCategoryMaster/createActCategory",
        "actCategoryMaster/updateActCategory",
        "actCategoryMaster/removeActCategory",
    ),
    pagination: PaginationMode::Client,
    fields: ACT_CATEGORY_FIELDS,
    rules: &[],
    create_constants: &[],
    update_constants: &[],
    upload: None,
};

/// The schema registered for `kind`.
pub fn schema(kind: EntityKind) -> &'static EntitySchema {
    match kind {
        EntityKind::Act => &ACT,
        EntityKind::Compliance => &COMPLIANCE,
        EntityKind::ComplianceCopy => &COMPLIANCE_COPY,
        EntityKind::Document => &DOCUMENT,
        EntityKind::Form => &FORM,
        EntityKind::Event => &EVENT,
        EntityKind::EventCompliance => &EVENT_COMPLIANCE,
        EntityKind::Dossier => &DOSSIER,
        EntityKind::Admin => &ADMIN,
        EntityKind::State => &STATE,
        EntityKind::ActType => &ACT_TYPE,
        EntityKind::ActCategory => &ACT_CATEGORY,
    }
}

/// Every registered schema, in [`EntityKind::all`] order.
pub fn all_schemas() -> impl Iterator<Item = &'static EntitySchema> {
    EntityKind::all().iter().map(|k| schema(*k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_schema_is_consistent() {
        for schema in all_schemas() {
            if let Err(e) = schema.check() {
                panic!("{e}");
            }
        }
    }

    #[test]
    fn registry_kind_matches_schema_kind() {
        for kind in EntityKind::all() {
            assert_eq!(schema(*kind).kind, *kind);
        }
    }

    #[test]
    fn only_the_act_list_is_server_paginated() {
        let server: Vec<_> = all_schemas()
            .filter(|s| s.pagination == PaginationMode::Server)
            .map(|s| s.kind)
            .collect();
        assert_eq!(server, vec![EntityKind::Act]);
    }

    #[test]
    fn references_point_at_kinds_with_options_or_lists() {
        for schema in all_schemas() {
            for field in schema.fields {
                if let FieldKind::Reference(target) = field.kind {
                    let target = super::schema(target);
                    assert!(
                        target.endpoints.options.is_some() || target.endpoints.list.is_some(),
                        "{}.{} references {} which has no option source",
                        schema.label,
                        field.name,
                        target.label
                    );
                }
            }
        }
    }

    #[test]
    fn form_name_maps_to_snake_case() {
        assert_eq!(FORM.field("formName").unwrap().api_name, "form_name");
    }
}
