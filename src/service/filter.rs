use rand::seq::SliceRandom;

use crate::catalog::Track;

/// Intensity at or above which only high energy tracks are kept.
pub const HIGH_INTENSITY: f64 = 0.7;
/// Intensity at or below which only low energy tracks are kept.
pub const LOW_INTENSITY: f64 = 0.3;
pub const HIGH_ENERGY_MIN: u8 = 6;
pub const LOW_ENERGY_MAX: u8 = 4;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Returns true if the track fits the requested intensity.
/// Intensities between the two thresholds, or no intensity at all, keep everything.
pub fn matches_intensity(track: &Track, intensity: Option<f64>) -> bool {
    match intensity {
        Some(i) if i >= HIGH_INTENSITY => track.energy >= HIGH_ENERGY_MIN,
        Some(i) if i <= LOW_INTENSITY => track.energy <= LOW_ENERGY_MAX,
        _ => true,
    }
}

pub fn shuffle_tracks(tracks: &mut [Track]) {
    let mut rng = rand::thread_rng();
    tracks.shuffle(&mut rng);
}

/// Zero means "not given" for recommendations.
pub fn recommendation_limit(limit: Option<usize>) -> usize {
    match limit {
        Some(n) if n > 0 => n,
        _ => DEFAULT_RECOMMENDATION_LIMIT,
    }
}

pub fn apply_limit<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}
