use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod route;
pub mod step;

pub use route::{NavigationMode, Route, RouteTable};
pub use step::{Step, StepKey, StepRegistry};

use crate::error::{BackendError, CommitError};

/// Message queue flavour backing an access group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MiddlewareType {
    Pulsar,
    #[serde(rename = "TUBEMQ", alias = "TUBE")]
    TubeMq,
    Kafka,
    #[serde(other)]
    Unknown,
}

/// Lifecycle status code of an access group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupStatus(pub i32);

impl GroupStatus {
    pub const DRAFT: GroupStatus = GroupStatus(0);
    pub const TO_BE_APPROVAL: GroupStatus = GroupStatus(101);
    pub const APPROVE_REJECTED: GroupStatus = GroupStatus(102);

    /// Groups in these states cannot be edited from the flow.
    pub fn is_readonly(self) -> bool {
        matches!(
            self,
            GroupStatus::DRAFT | GroupStatus::TO_BE_APPROVAL | GroupStatus::APPROVE_REJECTED
        )
    }
}

/// Access group as returned by the manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlongGroup {
    pub inlong_group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: GroupStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middleware_type: Option<MiddlewareType>,
}

/// Response envelope used by every manager endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            err_msg: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            err_msg: Some(message.into()),
        }
    }

    /// Unwraps the envelope; `data` may legitimately be absent.
    pub fn into_result(self) -> Result<Option<T>, BackendError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(BackendError::Rejected(
                self.err_msg.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }

    /// Unwraps the envelope, requiring `data`.
    pub fn into_data(self) -> Result<T, BackendError> {
        self.into_result()?
            .ok_or_else(|| BackendError::Decode("No data in response".to_string()))
    }
}

/// What a successful step commit may report back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    pub group_id: Option<String>,
    pub middleware_type: Option<MiddlewareType>,
}

impl CommitOutcome {
    pub fn created(group_id: impl Into<String>, middleware_type: Option<MiddlewareType>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            middleware_type,
        }
    }
}

/// Shared, read-only view of the resource handed to every step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceContext {
    pub group_id: Option<String>,
    pub readonly: bool,
    pub middleware_type: Option<MiddlewareType>,
    pub is_create: bool,
}

impl ResourceContext {
    pub fn new(group_id: Option<String>, is_create: bool) -> Self {
        Self {
            group_id,
            readonly: false,
            middleware_type: None,
            is_create,
        }
    }

    /// Whether the one-shot enrichment fetch still has work to do.
    pub fn needs_enrichment(&self) -> bool {
        self.group_id.is_some() && self.middleware_type.is_none()
    }

    /// Records the result of the first step's commit in create mode.
    ///
    /// The id only ever moves from empty to populated; a later commit that
    /// reports an id again leaves the known one in place.
    pub fn capture(&mut self, outcome: &CommitOutcome) {
        if self.group_id.is_none() {
            self.group_id = outcome.group_id.clone();
        }
        if outcome.middleware_type.is_some() {
            self.middleware_type = outcome.middleware_type;
        }
    }

    /// Applies a fetched group: sub-type and readonly flag.
    pub fn enrich(&mut self, group: &InlongGroup) {
        self.middleware_type = group.middleware_type;
        self.readonly = group.status.is_readonly();
    }
}

/// Capability a step's content may expose to gate forward progress.
///
/// Steps without it advance unconditionally.
#[async_trait(?Send)]
pub trait StepCommit: Send + Sync {
    async fn commit(&self) -> Result<CommitOutcome, CommitError>;
}

/// Manager operations the flow itself needs
#[async_trait(?Send)]
pub trait AccessBackend: Send + Sync {
    async fn fetch_group(&self, group_id: &str) -> Result<InlongGroup, BackendError>;
    async fn start_process(&self, group_id: &str) -> Result<(), BackendError>;
}

/// Read and push the page's addressable route.
pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;
    fn push(&self, route: Route);
}

/// User-facing message raised by the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Receives notices and state-change signals from the controller.
pub trait FlowListener: Send + Sync {
    fn notice(&self, notice: Notice);

    /// Called after any change to cursor, mounts, context or busy state.
    fn changed(&self) {}
}
