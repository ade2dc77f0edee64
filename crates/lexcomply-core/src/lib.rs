//! # lexcomply-core -- Entity Schemas for the LexComply Admin Toolkit
//!
//! Every screen of the admin panel is the same list + dialog pair applied
//! to a different entity. This crate holds the part that differs per
//! entity, written down once and declaratively:
//!
//! - [`EntitySchema`]: fields, UI→API name mapping, constants, endpoints,
//!   pagination mode and upload rules, one per [`EntityKind`]
//!   (see [`registry`]).
//! - [`Draft`] / [`Record`]: the dialog-local copy and the fetched row, with
//!   the mapping applied in both directions.
//! - [`validate_draft`]: synchronous client-side validation, first failure
//!   wins.
//! - [`TransferType`] / [`TransferRequest`]: the periodicity lookup and body
//!   of the compliance transfer wizard.
//! - [`FileUpload`]: files attached to upload-bearing dialogs.
//!
//! No I/O beyond reading a local file; HTTP lives in `lexcomply-client`.

pub mod error;
pub mod file;
pub mod kind;
pub mod record;
pub mod registry;
pub mod schema;
pub mod transfer;
pub mod validate;

pub use error::{SchemaError, ValidationError};
pub use file::FileUpload;
pub use kind::EntityKind;
pub use record::{record_id, value_text, Draft, DraftMode, Record};
pub use schema::{
    EndpointSet, EntitySchema, FieldKind, FieldSpec, FormRule, PaginationMode, Requirement,
    UploadSpec,
};
pub use transfer::{TransferRequest, TransferType};
pub use validate::validate_draft;
