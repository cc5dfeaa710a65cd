use thiserror::Error;

use crate::config::{ManagerSettings, Settings};
use crate::domain::RouteTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Route conflict: {0}")]
    RouteConflict(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_manager(&settings.manager) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_routes(&settings.routes) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_manager(manager: &ManagerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if manager.base_url.is_empty() {
            errors.push(ValidationError::MissingField("manager.base_url".to_string()));
        } else if !(manager.base_url.starts_with("http://") || manager.base_url.starts_with("https://")) {
            errors.push(ValidationError::InvalidValue {
                field: "manager.base_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }

        if manager.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "manager.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_routes(routes: &RouteTable) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("routes.listing", &routes.listing),
            ("routes.create_prefix", &routes.create_prefix),
            ("routes.detail_prefix", &routes.detail_prefix),
        ] {
            if !value.starts_with('/') {
                errors.push(ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{}' must start with '/'", value),
                });
            }
        }

        if routes.create_prefix == routes.detail_prefix {
            errors.push(ValidationError::RouteConflict(
                "create_prefix and detail_prefix must differ".to_string(),
            ));
        }
        if routes.listing == routes.create_prefix || routes.listing == routes.detail_prefix {
            errors.push(ValidationError::RouteConflict(
                "listing must differ from the flow prefixes".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
