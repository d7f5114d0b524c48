use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::debug;

use super::error::ApiResult;
use super::types::*;
use crate::server::AppState;
use crate::service::filter::DEFAULT_HISTORY_LIMIT;
use crate::service::{EmotionObservation, NewObservation, RecommendationQuery};
use crate::util::{format_timestamp, now_timestamp, QueryParams};

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.service.status().await;

    Json(StatusResponse {
        status: "online".to_string(),
        timestamp: format_timestamp(status.timestamp),
        emotion_types: status.emotion_types,
        total_tracks: status.total_tracks,
        active_sessions: status.active_sessions,
    })
}

pub async fn record_emotion(
    State(state): State<AppState>,
    body: Result<Json<NewObservation>, JsonRejection>,
) -> ApiResult<Json<DataResponse<EmotionObservation>>> {
    let Json(new) = body?;
    let observation = state.service.record_emotion(new).await?;
    Ok(Json(DataResponse::new(observation)))
}

pub async fn get_recommendations(
    State(state): State<AppState>,
    emotion: Result<Path<String>, PathRejection>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<RecommendationsResponse>> {
    let Path(emotion) = emotion?;
    let query = RecommendationQuery {
        limit: params.get_parsed::<usize>("limit"),
        intensity: params.get_parsed::<f64>("intensity"),
        shuffle: params
            .get("shuffle")
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
    };

    let recs = state.service.recommendations(&emotion, &query);
    if recs.resolved.as_str() != recs.requested {
        debug!(
            requested = %recs.requested,
            resolved = %recs.resolved,
            "Unknown emotion, serving fallback tracks"
        );
    }
    let now = now_timestamp();

    Ok(Json(RecommendationsResponse {
        success: true,
        emotion: recs.requested,
        recommendations: recs
            .tracks
            .into_iter()
            .map(|t| RecommendedTrack::new(t, &now))
            .collect(),
    }))
}

pub async fn get_track(
    State(state): State<AppState>,
    track_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<TrackResponse>> {
    let Path(track_id) = track_id?;
    let track = state.service.get_track(&track_id)?.clone();

    Ok(Json(TrackResponse {
        success: true,
        track: track.into(),
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<SessionResponse> {
    let session = state
        .service
        .get_or_create_session(params.get_nonempty("sessionId"))
        .await;
    let history = state
        .service
        .list_emotions(Some(&session.id), usize::MAX)
        .await;

    Json(SessionResponse {
        success: true,
        session: SessionInfo::new(session, history),
    })
}

pub async fn list_emotions(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<DataResponse<Vec<EmotionObservation>>> {
    let limit = params
        .get_parsed::<usize>("limit")
        .unwrap_or(DEFAULT_HISTORY_LIMIT);
    let observations = state
        .service
        .list_emotions(params.get_nonempty("sessionId"), limit)
        .await;

    Json(DataResponse::new(observations))
}
