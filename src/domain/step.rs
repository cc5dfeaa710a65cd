//! Steps of the access flow and the rule deciding which are visible.

use serde::{Deserialize, Serialize};

/// Identity of a step's content. Stable across visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKey {
    Info,
    DataStream,
    DataSources,
    DataStorage,
    Audit,
}

impl StepKey {
    /// Every step in display order.
    pub const ALL: [StepKey; 5] = [
        StepKey::Info,
        StepKey::DataStream,
        StepKey::DataSources,
        StepKey::DataStorage,
        StepKey::Audit,
    ];

    /// Tab key used by the tab view.
    pub fn value(self) -> &'static str {
        match self {
            StepKey::Info => "groupInfo",
            StepKey::DataStream => "dataStream",
            StepKey::DataSources => "dataSources",
            StepKey::DataStorage => "streamSink",
            StepKey::Audit => "audit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StepKey::Info => "Business Info",
            StepKey::DataStream => "Data Streams",
            StepKey::DataSources => "Data Sources",
            StepKey::DataStorage => "Data Storages",
            StepKey::Audit => "Audit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub key: StepKey,
    pub label: &'static str,
    pub visible: bool,
}

/// Pure derivation of the step list from `readonly` and `is_create`.
pub struct StepRegistry;

impl StepRegistry {
    /// All steps with their visibility flag, in fixed order.
    pub fn all(readonly: bool, is_create: bool) -> [Step; 5] {
        StepKey::ALL.map(|key| Step {
            key,
            label: key.label(),
            visible: match key {
                StepKey::Audit => !(readonly || is_create),
                _ => true,
            },
        })
    }

    pub fn visible_steps(readonly: bool, is_create: bool) -> Vec<Step> {
        Self::all(readonly, is_create)
            .into_iter()
            .filter(|step| step.visible)
            .collect()
    }
}
