use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregate result of evaluating every check in a registry.
///
/// `errors` maps the name of every failing check to its error message.
/// Passing checks are left out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub errors: BTreeMap<String, String>,
}

impl HealthStatus {
    pub fn from_errors(errors: BTreeMap<String, String>) -> Self {
        HealthStatus {
            healthy: errors.is_empty(),
            errors,
        }
    }
}

/// Renders the status as `healthy`, or `unhealthy: ` followed by the
/// failing checks.
impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.healthy {
            return write!(f, "healthy");
        }
        write!(f, "unhealthy")?;
        if !self.errors.is_empty() {
            let details: Vec<String> = self
                .errors
                .iter()
                .map(|(name, message)| format!("{}: {}", name, message))
                .collect();
            write!(f, ": {}", details.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_errors_is_healthy() {
        let status = HealthStatus::from_errors(BTreeMap::new());
        assert!(status.healthy);
        assert_eq!(status.to_string(), "healthy");
    }

    #[test]
    fn test_from_errors() {
        let mut errors = BTreeMap::new();
        errors.insert("disk".to_string(), "disk full".to_string());
        errors.insert("db".to_string(), "connection refused".to_string());
        let status = HealthStatus::from_errors(errors);
        assert!(!status.healthy);
        assert_eq!(
            status.to_string(),
            "unhealthy: db: connection refused, disk: disk full"
        );
    }

    #[test]
    fn test_json_shape() {
        let mut errors = BTreeMap::new();
        errors.insert("some_check".to_string(), "failed".to_string());
        let status = HealthStatus::from_errors(errors);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"healthy": false, "errors": {"some_check": "failed"}})
        );
        let parsed: HealthStatus = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, status);
    }
}
