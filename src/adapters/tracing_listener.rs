use crate::domain::{FlowListener, Notice};

/// Renders flow notices as log events for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl FlowListener for TracingListener {
    fn notice(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => tracing::info!(%message, "notice"),
            Notice::Error(message) => tracing::error!(%message, "notice"),
        }
    }
}
