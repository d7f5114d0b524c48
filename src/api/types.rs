use serde::{Deserialize, Serialize};

use crate::catalog::{Emotion, Track};
use crate::service::{EmotionObservation, Session};
use crate::util::format_timestamp;

/// Endpoints listed by the catch-all response.
pub const ENDPOINTS: [&str; 6] = [
    "GET /api/status",
    "POST /api/emotions",
    "GET /api/recommendations/:emotion",
    "GET /api/music/:trackId",
    "GET /api/session",
    "GET /api/emotions",
];

pub const DEMO_TRACK_MESSAGE: &str = "Demo mode - no actual audio file";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub emotion_types: Vec<Emotion>,
    pub total_tracks: usize,
    pub active_sessions: usize,
}

/// `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub url: String,
    pub recommended_at: String,
}

impl RecommendedTrack {
    pub fn new(track: Track, recommended_at: &str) -> Self {
        Self {
            url: track.url(),
            track,
            recommended_at: recommended_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub emotion: String,
    pub recommendations: Vec<RecommendedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoTrack {
    #[serde(flatten)]
    pub track: Track,
    pub demo: bool,
    pub message: String,
}

impl From<Track> for DemoTrack {
    fn from(track: Track) -> Self {
        Self {
            track,
            demo: true,
            message: DEMO_TRACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
    pub track: DemoTrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub created_at: String,
    pub last_activity: String,
    pub emotion_history: Vec<EmotionObservation>,
}

impl SessionInfo {
    pub fn new(session: Session, emotion_history: Vec<EmotionObservation>) -> Self {
        Self {
            id: session.id,
            created_at: format_timestamp(session.created_at),
            last_activity: format_timestamp(session.last_activity),
            emotion_history,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDescription {
    pub message: String,
    pub endpoints: Vec<String>,
}

impl ApiDescription {
    pub fn new(service_name: &str) -> Self {
        Self {
            message: service_name.to_string(),
            endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
