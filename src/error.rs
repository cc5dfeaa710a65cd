//! Error types for the access flow

use thiserror::Error;

/// Notice shown when a step rejects its commit with field-level detail.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please check the integrity of the form";

/// Errors a step's content may raise from its commit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    /// The step's form has invalid fields
    #[error("{} field(s) failed validation", fields.len())]
    Invalid { fields: Vec<String> },

    /// The step failed to persist without field-level detail
    #[error("{0}")]
    Failed(String),
}

impl CommitError {
    pub fn invalid<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommitError::Invalid {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        CommitError::Failed(message.into())
    }
}

/// Errors from the manager backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The manager answered with `success = false`
    #[error("{0}")]
    Rejected(String),

    /// The response body could not be parsed
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Errors surfaced by the flow controller
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    /// Another transition is still in flight
    #[error("A transition is already in progress")]
    Busy,

    /// The active step rejected its commit with invalid fields
    #[error("Form incomplete: {}", fields.join(", "))]
    Incomplete { fields: Vec<String> },

    /// A commit, fetch or submit failed without field-level detail
    #[error("{0}")]
    Operation(String),

    #[error("Step {index} is out of range ({len} visible steps)")]
    StepOutOfRange { index: usize, len: usize },

    /// Forward jump to a step that was never opened
    #[error("Step {0} has not been opened yet")]
    StepNotOpened(usize),

    /// Previous/next was asked for a step other than the one on screen
    #[error("Step {index} is not the current step ({current})")]
    NotCurrentStep { index: usize, current: usize },

    #[error("Already on the first step")]
    NoPreviousStep,

    #[error("Submit is only available from the last step")]
    NotOnFinalStep,

    #[error("The access group has no id yet")]
    MissingGroupId,

    /// The controller was torn down while the operation was outstanding
    #[error("The flow was closed before the operation completed")]
    Detached,
}

impl FlowError {
    /// Text to show the user for this failure, if any.
    pub fn notice_message(&self) -> Option<String> {
        match self {
            FlowError::Incomplete { .. } => Some(INCOMPLETE_FORM_MESSAGE.to_string()),
            FlowError::Operation(message) => Some(message.clone()),
            FlowError::MissingGroupId => Some(self.to_string()),
            _ => None,
        }
    }
}

impl From<CommitError> for FlowError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Invalid { fields } if !fields.is_empty() => FlowError::Incomplete { fields },
            CommitError::Invalid { .. } => FlowError::Operation("Form validation failed".to_string()),
            CommitError::Failed(message) => FlowError::Operation(message),
        }
    }
}

impl From<BackendError> for FlowError {
    fn from(err: BackendError) -> Self {
        FlowError::Operation(err.to_string())
    }
}

/// Result type alias for flow operations
pub type FlowResult<T> = Result<T, FlowError>;
