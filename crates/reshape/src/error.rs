use plmkit_sheet::SheetError;
use thiserror::Error;

/// Errors that abort a transform.
///
/// Anything else (unparsable dates, non-numeric measures, empty results)
/// degrades to the documented fallback instead of erroring.
#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("Missing required columns for {context}: {}", missing.join(", "))]
    MissingColumns {
        context: String,
        missing: Vec<String>,
    },

    #[error("No transform implemented for {account}")]
    NotImplemented { account: String },

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub type Result<T> = std::result::Result<T, ReshapeError>;
