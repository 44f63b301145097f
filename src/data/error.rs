use crate::data::day_key::DayKey;
use std::path::PathBuf;

/// Failures raised by the planner core.
///
/// Validation variants leave the targeted store untouched. `Persistence` is
/// only produced for I/O failures other than a missing file.
#[derive(thiserror::Error, Debug)]
pub enum PlannerError {
    #[error("{0} is a holiday and cannot hold a note")]
    InvalidTarget(DayKey),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("month index {0} is outside 0..=11")]
    OutOfRange(i64),
    #[error("invalid day key: {0}")]
    InvalidDayKey(String),
    #[error("failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlannerError {
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlannerError::Persistence {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_message_names_the_day() {
        let key = DayKey::new(1, 1).unwrap();
        let err = PlannerError::InvalidTarget(key);
        assert_eq!(err.to_string(), "1_1 is a holiday and cannot hold a note");
    }

    #[test]
    fn test_persistence_message_includes_path() {
        let err = PlannerError::persistence(
            "/tmp/agenda/data.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/agenda/data.json"));
        assert!(msg.contains("denied"));
    }
}
