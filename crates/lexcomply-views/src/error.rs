//! Controller error type.

use lexcomply_client::ApiError;
use lexcomply_core::ValidationError;

/// Why a controller action did not complete.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The draft failed a client-side rule; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request failed or the server rejected it.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A request from this controller is still in flight.
    #[error("a request is already in progress")]
    Busy,

    /// The dialog has been closed.
    #[error("the dialog is closed")]
    Closed,

    /// The action is not available at the wizard's current step.
    #[error("{action} is not available in the {step} step")]
    WrongStep {
        action: &'static str,
        step: &'static str,
    },

    /// A record handed to an edit dialog carries no identifier.
    #[error("{entity} record has no {id_field}")]
    MissingId {
        entity: &'static str,
        id_field: &'static str,
    },

    /// No fetched row carries this identifier.
    #[error("no {entity} with id {id} in the current list")]
    NoSuchRow { entity: &'static str, id: String },
}

impl ViewError {
    /// Text for the inline error or banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Whether this is a client-side validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
