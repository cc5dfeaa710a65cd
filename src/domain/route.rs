//! Addressable routes of the flow page.

use serde::{Deserialize, Serialize};

const STEP_PARAM: &str = "step";

/// How the flow is navigated, fixed when the controller is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Sequential, forward-gated steps used while creating a group
    Wizard,
    /// Freely selectable tabs used for an existing group
    TabView,
}

impl NavigationMode {
    pub fn is_create(self) -> bool {
        self == NavigationMode::Wizard
    }

    /// The footer and step indicator only belong to the wizard.
    pub fn shows_footer(self) -> bool {
        self == NavigationMode::Wizard
    }
}

/// A path plus the step indicator carried in its query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub step: Option<usize>,
}

impl Route {
    pub fn new(path: impl Into<String>, step: Option<usize>) -> Self {
        Self {
            path: path.into(),
            step,
        }
    }

    /// Parses `path?query`. A missing or non-numeric `step` yields `None`.
    pub fn parse(href: &str) -> Self {
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        Self::from_parts(path, query)
    }

    /// Builds a route from a path and a raw query string (leading `?` optional).
    pub fn from_parts(path: &str, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let step = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == STEP_PARAM)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .and_then(|value| value.trim().parse::<usize>().ok());

        Self {
            path: path.to_string(),
            step,
        }
    }

    pub fn with_step(&self, step: usize) -> Self {
        Self {
            path: self.path.clone(),
            step: Some(step),
        }
    }

    pub fn to_href(&self) -> String {
        match self.step {
            Some(step) => format!("{}?{}={}", self.path, STEP_PARAM, step),
            None => self.path.clone(),
        }
    }
}

/// Where the flow lives in the application's route space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Listing page the flow returns to
    #[serde(default = "default_listing")]
    pub listing: String,
    /// Paths under this prefix are navigated as a wizard
    #[serde(default = "default_create_prefix")]
    pub create_prefix: String,
    /// Id-parameterized detail path for existing groups
    #[serde(default = "default_detail_prefix")]
    pub detail_prefix: String,
}

fn default_listing() -> String {
    "/access".to_string()
}

fn default_create_prefix() -> String {
    "/access/create".to_string()
}

fn default_detail_prefix() -> String {
    "/access/detail".to_string()
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            listing: default_listing(),
            create_prefix: default_create_prefix(),
            detail_prefix: default_detail_prefix(),
        }
    }
}

impl RouteTable {
    pub fn mode_for(&self, path: &str) -> NavigationMode {
        if path.starts_with(&self.create_prefix) {
            NavigationMode::Wizard
        } else {
            NavigationMode::TabView
        }
    }

    fn base(&self, mode: NavigationMode) -> &str {
        match mode {
            NavigationMode::Wizard => &self.create_prefix,
            NavigationMode::TabView => &self.detail_prefix,
        }
    }

    /// Group id carried in the first path segment after either prefix.
    pub fn group_id(&self, path: &str) -> Option<String> {
        [&self.create_prefix, &self.detail_prefix]
            .into_iter()
            .find_map(|prefix| path.strip_prefix(prefix.as_str()))
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.split('/').next())
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| segment.to_string())
            })
    }

    /// Route for `step` of the group, keeping the flow in `mode`.
    pub fn step_route(&self, mode: NavigationMode, group_id: Option<&str>, step: usize) -> Route {
        let base = self.base(mode);
        let path = match group_id {
            Some(id) => format!("{}/{}", base, urlencoding::encode(id)),
            None => base.to_string(),
        };
        Route::new(path, Some(step))
    }

    pub fn listing_route(&self) -> Route {
        Route::new(self.listing.clone(), None)
    }
}
