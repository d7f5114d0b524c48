pub mod emotion;
pub mod track;

pub use emotion::Emotion;
pub use track::Track;

/// Fixed set of tracks, grouped by emotion.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(Emotion, Vec<Track>)>,
}

impl Catalog {
    pub fn seeded() -> Self {
        let entries = vec![
            (
                Emotion::Happy,
                vec![
                    Track::new("h1", "Sunshine Day", "Happy Vibes", "Pop", "uplifting", 8),
                    Track::new("h2", "Dancing Lights", "Joy Band", "Dance", "energetic", 9),
                    Track::new("h3", "Celebration Time", "Euphoria", "Rock", "triumphant", 7),
                ],
            ),
            (
                Emotion::Sad,
                vec![
                    Track::new("s1", "Melancholy Rain", "Blue Mood", "Ambient", "reflective", 2),
                    Track::new("s2", "Quiet Thoughts", "Solitude", "Indie", "contemplative", 3),
                    Track::new("s3", "Gentle Tears", "Peace", "Classical", "healing", 1),
                ],
            ),
            (
                Emotion::Neutral,
                vec![
                    Track::new("n1", "Calm Waters", "Tranquil", "Ambient", "peaceful", 3),
                    Track::new("n2", "Morning Coffee", "Chill", "Jazz", "relaxed", 4),
                    Track::new("n3", "Steady Flow", "Balance", "Electronic", "focused", 5),
                ],
            ),
            (
                Emotion::Angry,
                vec![
                    Track::new("a1", "Storm Break", "Thunder", "Metal", "releasing", 9),
                    Track::new("a2", "Fire Storm", "Rage", "Rock", "cathartic", 8),
                    Track::new("a3", "Intense Focus", "Power", "Industrial", "channeling", 7),
                ],
            ),
            (
                Emotion::Surprised,
                vec![
                    Track::new("su1", "Wonder Struck", "Amazing", "Pop", "curious", 6),
                    Track::new("su2", "Unexpected Joy", "Surprise", "Electronic", "excited", 7),
                    Track::new("su3", "Magic Moments", "Wonder", "Orchestral", "awe", 5),
                ],
            ),
            (
                Emotion::Fearful,
                vec![
                    Track::new("f1", "Safe Harbor", "Comfort", "Ambient", "soothing", 2),
                    Track::new("f2", "Gentle Waves", "Calm Shore", "Nature", "grounding", 3),
                    Track::new("f3", "Peaceful Mind", "Zen", "Meditation", "protective", 1),
                ],
            ),
            (
                Emotion::Disgusted,
                vec![
                    Track::new("d1", "Clean Slate", "Fresh", "Indie", "cleansing", 4),
                    Track::new("d2", "New Beginning", "Reset", "Electronic", "refreshing", 5),
                    Track::new("d3", "Pure Light", "Clarity", "Ambient", "purifying", 3),
                ],
            ),
        ];

        Self { entries }
    }

    pub fn emotions(&self) -> impl Iterator<Item = Emotion> + '_ {
        self.entries.iter().map(|(emotion, _)| *emotion)
    }

    pub fn tracks_for(&self, emotion: Emotion) -> &[Track] {
        self.entries
            .iter()
            .find(|(e, _)| *e == emotion)
            .map(|(_, tracks)| tracks.as_slice())
            .unwrap_or(&[])
    }

    /// Searches every category and returns the first track with this id.
    pub fn find_track(&self, id: &str) -> Option<&Track> {
        self.entries
            .iter()
            .flat_map(|(_, tracks)| tracks.iter())
            .find(|t| t.id == id)
    }

    pub fn total_tracks(&self) -> usize {
        self.entries.iter().map(|(_, tracks)| tracks.len()).sum()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
