//! Render settings
//!
//! `RenderConfigInput` is what callers send; every field is optional.
//! It is resolved once, at enqueue time, into a `RenderConfig` that is stored
//! on the job and never changes afterwards.

use serde::{Deserialize, Serialize};

/// Default narration voice
pub const DEFAULT_VOICE: &str = "af_heart";

/// Default silence appended after the last scene, in milliseconds
pub const DEFAULT_PADDING_BACK_MS: u64 = 1500;

/// Upper bound accepted for `padding_back_ms`
pub const MAX_PADDING_BACK_MS: u64 = 60_000;

/// Frame orientation of the rendered video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Whether a clip of the given dimensions fits this orientation.
    ///
    /// Square clips fit both.
    pub fn admits(self, width: u32, height: u32) -> bool {
        match self {
            Orientation::Portrait => height >= width,
            Orientation::Landscape => width >= height,
        }
    }

    /// Output frame size in pixels (width, height)
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Orientation::Portrait => (1080, 1920),
            Orientation::Landscape => (1920, 1080),
        }
    }

    /// Name of the render composition for this orientation
    pub fn composition(self) -> &'static str {
        match self {
            Orientation::Portrait => "PortraitVideo",
            Orientation::Landscape => "LandscapeVideo",
        }
    }
}

/// Background music mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicMood {
    Sad,
    Melancholic,
    Happy,
    Euphoric,
    Excited,
    #[default]
    Chill,
    Uneasy,
    Angry,
    Dark,
    Hopeful,
    Contemplative,
    Funny,
}

impl MusicMood {
    pub const ALL: [MusicMood; 12] = [
        MusicMood::Sad,
        MusicMood::Melancholic,
        MusicMood::Happy,
        MusicMood::Euphoric,
        MusicMood::Excited,
        MusicMood::Chill,
        MusicMood::Uneasy,
        MusicMood::Angry,
        MusicMood::Dark,
        MusicMood::Hopeful,
        MusicMood::Contemplative,
        MusicMood::Funny,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MusicMood::Sad => "sad",
            MusicMood::Melancholic => "melancholic",
            MusicMood::Happy => "happy",
            MusicMood::Euphoric => "euphoric",
            MusicMood::Excited => "excited",
            MusicMood::Chill => "chill",
            MusicMood::Uneasy => "uneasy",
            MusicMood::Angry => "angry",
            MusicMood::Dark => "dark",
            MusicMood::Hopeful => "hopeful",
            MusicMood::Contemplative => "contemplative",
            MusicMood::Funny => "funny",
        }
    }
}

impl std::fmt::Display for MusicMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MusicMood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MusicMood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown music mood '{}'", s))
    }
}

/// Background music loudness relative to narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicVolume {
    Muted,
    Low,
    #[default]
    Medium,
    High,
}

impl MusicVolume {
    /// Linear gain applied to the music track
    pub fn gain(self) -> f32 {
        match self {
            MusicVolume::Muted => 0.0,
            MusicVolume::Low => 0.2,
            MusicVolume::Medium => 0.45,
            MusicVolume::High => 0.7,
        }
    }
}

/// Vertical placement of burned-in captions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPosition {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Resolved render settings stored on a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub orientation: Orientation,
    pub voice: String,
    pub music: MusicMood,
    pub music_volume: MusicVolume,
    pub padding_back_ms: u64,
    pub caption_position: CaptionPosition,
    pub caption_background_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            voice: DEFAULT_VOICE.to_string(),
            music: MusicMood::default(),
            music_volume: MusicVolume::default(),
            padding_back_ms: DEFAULT_PADDING_BACK_MS,
            caption_position: CaptionPosition::default(),
            caption_background_color: "blue".to_string(),
        }
    }
}

/// Render settings as submitted by a caller; unset fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfigInput {
    pub orientation: Option<Orientation>,
    pub voice: Option<String>,
    pub music: Option<MusicMood>,
    pub music_volume: Option<MusicVolume>,
    pub padding_back_ms: Option<u64>,
    pub caption_position: Option<CaptionPosition>,
    pub caption_background_color: Option<String>,
}

impl RenderConfigInput {
    /// Resolves the input against defaults, rejecting out-of-range values
    pub fn resolve(self) -> Result<RenderConfig, String> {
        let defaults = RenderConfig::default();

        let padding_back_ms = self.padding_back_ms.unwrap_or(defaults.padding_back_ms);
        if padding_back_ms > MAX_PADDING_BACK_MS {
            return Err(format!(
                "paddingBackMs must be at most {} (got {})",
                MAX_PADDING_BACK_MS, padding_back_ms
            ));
        }

        let voice = match self.voice {
            Some(voice) if voice.trim().is_empty() => {
                return Err("voice cannot be empty".to_string());
            }
            Some(voice) => voice,
            None => defaults.voice,
        };

        Ok(RenderConfig {
            orientation: self.orientation.unwrap_or(defaults.orientation),
            voice,
            music: self.music.unwrap_or(defaults.music),
            music_volume: self.music_volume.unwrap_or(defaults.music_volume),
            padding_back_ms,
            caption_position: self.caption_position.unwrap_or(defaults.caption_position),
            caption_background_color: self
                .caption_background_color
                .unwrap_or(defaults.caption_background_color),
        })
    }
}
