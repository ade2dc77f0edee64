//! # lexcomply-views -- Headless admin panel controllers
//!
//! State machines behind the admin panel's screens, with no rendering:
//!
//! - [`ListView`]: fetch, filter, sort, paginate, row actions.
//! - [`Dialog`]: add/edit form with validation, upload and delayed close.
//! - [`TransferWizard`]: two-step compliance transfer.
//! - [`OptionSelector`]: option list with type-ahead.
//!
//! Every controller owns its state and talks to the API through a
//! [`Backend`]; [`lexcomply_client::LexClient`] implements it.

pub mod backend;
pub mod dialog;
pub mod error;
pub mod list;
pub mod notice;
pub mod selector;
pub mod transfer;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::Backend;
pub use dialog::{Dialog, DialogOptions, SuccessCallback, DEFAULT_CLOSE_DELAY};
pub use error::ViewError;
pub use list::{ListSettings, ListView, RowAction, DEFAULT_PAGE_SIZE};
pub use notice::{Notice, NoticeKind};
pub use selector::OptionSelector;
pub use transfer::{TransferWizard, WizardStep};
