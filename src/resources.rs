//! Image metadata and sound voice bookkeeping
//!
//! The engine never decodes pixels or plays audio. It needs image dimensions
//! to size sprites, and it hands sound cues to whatever audio backend the
//! host provides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

pub const BIRD_UPFLAP: &str = "assets/sprites/bluebird-upflap.png";
pub const BIRD_MIDFLAP: &str = "assets/sprites/bluebird-midflap.png";
pub const BIRD_DOWNFLAP: &str = "assets/sprites/bluebird-downflap.png";
pub const PIPE: &str = "assets/sprites/pipe-green.png";
pub const BACKGROUND: &str = "assets/sprites/background-day.png";
pub const BASE: &str = "assets/sprites/base.png";
pub const GAME_OVER: &str = "assets/sprites/gameover.png";

/// Pixel sizes of the stock sprite set
const DEFAULT_MANIFEST: &str = r#"{
    "assets/sprites/bluebird-upflap.png": { "width": 34, "height": 24 },
    "assets/sprites/bluebird-midflap.png": { "width": 34, "height": 24 },
    "assets/sprites/bluebird-downflap.png": { "width": 34, "height": 24 },
    "assets/sprites/pipe-green.png": { "width": 52, "height": 320 },
    "assets/sprites/background-day.png": { "width": 288, "height": 512 },
    "assets/sprites/base.png": { "width": 336, "height": 112 },
    "assets/sprites/gameover.png": { "width": 192, "height": 42 }
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Something that can fetch image metadata by key
pub trait ImageSource {
    fn fetch(&mut self, key: &str) -> Result<ImageInfo, String>;
}

/// Loaded image metadata by key
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: HashMap<String, ImageInfo>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog for the stock sprite set
    pub fn with_defaults() -> Self {
        // The embedded manifest is static and known to parse
        Self::from_manifest(DEFAULT_MANIFEST).unwrap_or_default()
    }

    /// Parse a `{ key: { width, height } }` JSON manifest
    pub fn from_manifest(json: &str) -> Result<Self, ResourceError> {
        let images: HashMap<String, ImageInfo> = serde_json::from_str(json)?;
        Ok(Self { images })
    }

    pub fn insert(&mut self, key: impl Into<String>, info: ImageInfo) {
        self.images.insert(key.into(), info);
    }

    /// Load every key from `source`, stopping at the first failure
    pub fn load_images<L: ImageSource>(
        &mut self,
        source: &mut L,
        keys: &[&str],
    ) -> Result<(), ResourceError> {
        for key in keys {
            let info = source.fetch(key).map_err(|reason| {
                log::error!("Image load failed: {key}: {reason}");
                ResourceError::LoadFailed {
                    key: key.to_string(),
                    reason,
                }
            })?;
            self.images.insert(key.to_string(), info);
        }
        log::debug!("Loaded {} images", keys.len());
        Ok(())
    }

    pub fn image(&self, key: &str) -> Result<ImageInfo, ResourceError> {
        self.images
            .get(key)
            .copied()
            .ok_or_else(|| ResourceError::NotLoaded {
                key: key.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Sound cues the game requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Flap,
    Hit,
    Score,
}

impl SoundCue {
    pub fn asset(&self) -> &'static str {
        match self {
            SoundCue::Flap => "assets/audio/wing.ogg",
            SoundCue::Hit => "assets/audio/hit.ogg",
            SoundCue::Score => "assets/audio/point.ogg",
        }
    }
}

/// Round-robin voices so rapid repeats overlap instead of cutting off
#[derive(Debug, Clone)]
pub struct SoundPool {
    voices: usize,
    offset: usize,
}

impl SoundPool {
    pub const DEFAULT_VOICES: usize = 16;

    pub fn new(voices: usize) -> Self {
        Self {
            voices: voices.max(1),
            offset: 0,
        }
    }

    pub fn voices(&self) -> usize {
        self.voices
    }

    /// Voice index to use for the next play
    pub fn next_voice(&mut self) -> usize {
        let voice = self.offset;
        self.offset = (self.offset + 1) % self.voices;
        voice
    }

    pub fn stop_all(&mut self) {
        self.offset = 0;
    }
}

/// A cue bound to a concrete voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub cue: SoundCue,
    pub index: usize,
}

/// Voice pools per cue
#[derive(Debug, Clone)]
pub struct SoundBank {
    pools: HashMap<SoundCue, SoundPool>,
}

impl Default for SoundBank {
    fn default() -> Self {
        let mut pools = HashMap::new();
        pools.insert(SoundCue::Flap, SoundPool::new(SoundPool::DEFAULT_VOICES));
        // Single voice: a new hit restarts the old one
        pools.insert(SoundCue::Hit, SoundPool::new(1));
        pools.insert(SoundCue::Score, SoundPool::new(SoundPool::DEFAULT_VOICES));
        Self { pools }
    }
}

impl SoundBank {
    pub fn play(&mut self, cue: SoundCue) -> Voice {
        let pool = self
            .pools
            .entry(cue)
            .or_insert_with(|| SoundPool::new(SoundPool::DEFAULT_VOICES));
        Voice {
            cue,
            index: pool.next_voice(),
        }
    }

    pub fn stop_all(&mut self) {
        self.pools.values_mut().for_each(SoundPool::stop_all);
    }
}
