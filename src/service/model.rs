use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Emotion, Track};

pub const ANONYMOUS_SESSION: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionObservation {
    pub id: String,
    pub emotion: String,
    pub confidence: f64,
    pub session_id: String,
    /// Kept as given by the client; only server-generated values are guaranteed RFC 3339.
    pub timestamp: String,
}

/// Input for recording an observation. Everything is optional here so that
/// missing fields surface as validation errors rather than decode errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObservation {
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Confidence as sent by clients, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Number(f64),
    Text(String),
}

impl Confidence {
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Confidence::Number(n) => *n,
            Confidence::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Confidence {
    fn from(n: f64) -> Self {
        Confidence::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
    pub intensity: Option<f64>,
    pub shuffle: bool,
}

#[derive(Debug, Clone)]
pub struct Recommendations {
    /// The lowercased label that was asked for, even when it fell back to neutral.
    pub requested: String,
    pub resolved: Emotion,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub timestamp: DateTime<Utc>,
    pub emotion_types: Vec<Emotion>,
    pub total_tracks: usize,
    pub active_sessions: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
