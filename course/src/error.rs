use thiserror::Error;

/// Structural misuse of the course or sequencer API.
///
/// Frame-time anomalies (missing bodies, duplicate contacts, drifting
/// numbers) are never reported through this type; they are absorbed where
/// they are detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    #[error("course has no zones")]
    Empty,
    #[error("duplicate zone id `{0}`")]
    DuplicateZone(String),
    #[error("zone `{0}` has an empty travel span")]
    EmptySpan(String),
    #[error("zones `{first}` and `{second}` overlap on the travel axis")]
    OverlappingZones { first: String, second: String },
    #[error("unknown zone `{0}`")]
    UnknownZone(String),
    #[error("zone `{0}` does not take a free-text answer")]
    NotFreeText(String),
    #[error("zone `{0}` already has an answer")]
    AlreadyAnswered(String),
}
