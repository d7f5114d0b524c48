use chrono::Utc;
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::{Catalog, Emotion, Track};
use crate::util::{now_timestamp, parse_timestamp};

use super::filter::{apply_limit, matches_intensity, recommendation_limit, shuffle_tracks};
use super::model::*;

/// Owns the catalog, the observation log and the session map.
///
/// The log and the map only live as long as the process. The log is never
/// pruned, so it grows with every recorded observation.
pub struct RecommendationService {
    catalog: Catalog,
    observations: RwLock<Vec<EmotionObservation>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl RecommendationService {
    pub fn new(catalog: Catalog) -> Self {
        info!(
            tracks = catalog.total_tracks(),
            "Recommendation service ready"
        );
        Self {
            catalog,
            observations: RwLock::new(Vec::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn status(&self) -> ServiceStatus {
        let active_sessions = self.sessions.read().await.len();
        ServiceStatus {
            timestamp: Utc::now(),
            emotion_types: self.catalog.emotions().collect(),
            total_tracks: self.catalog.total_tracks(),
            active_sessions,
        }
    }

    pub async fn record_emotion(&self, new: NewObservation) -> ServiceResult<EmotionObservation> {
        let emotion = new.emotion.filter(|e| !e.is_empty());
        let (emotion, confidence) = match (emotion, new.confidence) {
            (Some(e), Some(c)) => (e, c),
            _ => {
                return Err(ServiceError::Validation(
                    "Missing emotion or confidence".to_string(),
                ))
            }
        };
        let confidence = confidence
            .to_f64()
            .ok_or_else(|| ServiceError::Validation("Invalid confidence".to_string()))?;

        let observation = EmotionObservation {
            id: uuid::Uuid::new_v4().to_string(),
            emotion: emotion.to_lowercase(),
            confidence,
            session_id: new
                .session_id
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| ANONYMOUS_SESSION.to_string()),
            timestamp: new
                .timestamp
                .filter(|t| !t.is_empty())
                .unwrap_or_else(now_timestamp),
        };

        self.observations.write().await.push(observation.clone());
        debug!(
            id = %observation.id,
            emotion = %observation.emotion,
            session = %observation.session_id,
            "Recorded emotion"
        );

        Ok(observation)
    }

    pub fn recommendations(&self, emotion: &str, query: &RecommendationQuery) -> Recommendations {
        let requested = emotion.to_lowercase();
        let resolved = Emotion::resolve(&requested);

        let mut tracks: Vec<Track> = self
            .catalog
            .tracks_for(resolved)
            .iter()
            .filter(|t| matches_intensity(t, query.intensity))
            .cloned()
            .collect();

        if query.shuffle {
            shuffle_tracks(&mut tracks);
        }

        let tracks = apply_limit(tracks, recommendation_limit(query.limit));

        Recommendations {
            requested,
            resolved,
            tracks,
        }
    }

    pub fn get_track(&self, id: &str) -> ServiceResult<&Track> {
        self.catalog
            .find_track(id)
            .ok_or_else(|| ServiceError::NotFound("Track not found".to_string()))
    }

    /// Returns the session with this id, creating it if needed. Without an id
    /// a fresh one is generated.
    pub async fn get_or_create_session(&self, id: Option<&str>) -> Session {
        let id = match id.filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(id).or_insert_with_key(|id| {
            debug!(session = %id, "Created session");
            Session {
                id: id.clone(),
                created_at: now,
                last_activity: now,
            }
        });
        session.last_activity = session.last_activity.max(now);
        session.clone()
    }

    /// Observations, newest first, optionally restricted to one session.
    /// Timestamps that do not parse sort after all others.
    pub async fn list_emotions(
        &self,
        session_id: Option<&str>,
        limit: usize,
    ) -> Vec<EmotionObservation> {
        let mut filtered: Vec<EmotionObservation> = {
            let observations = self.observations.read().await;
            observations
                .iter()
                .filter(|o| session_id.map_or(true, |id| o.session_id == id))
                .cloned()
                .collect()
        };

        filtered.sort_by_cached_key(|o| Reverse(parse_timestamp(&o.timestamp)));
        apply_limit(filtered, limit)
    }
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new(Catalog::seeded())
    }
}
