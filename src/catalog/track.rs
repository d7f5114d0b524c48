use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub mood: String,
    /// 1 (calm) to 9 (intense).
    pub energy: u8,
}

impl Track {
    pub fn new(id: &str, title: &str, artist: &str, genre: &str, mood: &str, energy: u8) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            genre: genre.to_string(),
            mood: mood.to_string(),
            energy,
        }
    }

    /// Playback location advertised to clients.
    pub fn url(&self) -> String {
        format!("/api/music/{}", self.id)
    }
}
