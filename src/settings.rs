//! Page configuration
//!
//! Defaults reproduce the shipped page. A page can override any field with an
//! inline `<script type="application/json" id="page-config">` block; nothing is
//! ever written back.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::flow::emoji::{EMOJIS, EmojiPool, EmojiSchedule};
use crate::flow::typing::TypingScript;

/// Everything the page reads at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    // === Intro typing ===
    /// Lines revealed on the intro step
    pub type_lines: Vec<String>,
    /// Delay after each character (ms)
    pub type_speed_ms: u32,
    /// Extra pause before each line break (ms)
    pub line_pause_ms: u32,

    // === Photo slider ===
    /// Number of photos at images/1.<ext> ... images/N.<ext>
    pub photo_count: usize,
    pub photo_ext: String,

    // === Ending ===
    /// Recipient digits for the WhatsApp link (empty = let the visitor pick)
    pub whatsapp_phone: String,

    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f64,

    // === Floating emojis ===
    pub emoji_palette: Vec<String>,
    /// Maximum live elements
    pub emoji_capacity: usize,
    pub emoji_schedule: EmojiSchedule,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            type_lines: vec![
                "I didn’t know how to say this in a message…".to_string(),
                "so I made something small.".to_string(),
            ],
            type_speed_ms: TYPE_SPEED_MS,
            line_pause_ms: LINE_PAUSE_MS,

            photo_count: PHOTO_COUNT,
            photo_ext: PHOTO_EXT.to_string(),

            whatsapp_phone: WHATSAPP_PHONE.to_string(),

            music_volume: MUSIC_VOLUME,

            emoji_palette: EMOJIS.iter().map(|s| s.to_string()).collect(),
            emoji_capacity: EMOJI_CAPACITY,
            emoji_schedule: EmojiSchedule::default(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective music volume, clamped to the media element's range
    pub fn effective_music_volume(&self) -> f64 {
        self.music_volume.clamp(0.0, 1.0)
    }

    /// Keystroke script for the intro
    pub fn typing_script(&self) -> TypingScript {
        TypingScript::new(&self.type_lines, self.type_speed_ms, self.line_pause_ms)
    }

    pub fn emoji_pool(&self) -> EmojiPool {
        EmojiPool::new(self.emoji_palette.clone(), self.emoji_capacity)
    }

    /// Element id of the inline JSON block
    const CONFIG_ELEMENT_ID: &'static str = "page-config";

    /// Load configuration from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded page config from #{}", Self::CONFIG_ELEMENT_ID);
                    return config;
                }
                Err(e) => log::warn!("Ignoring invalid page config: {}", e),
            }
        }

        log::info!("Using default page config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} on native, using defaults", Self::CONFIG_ELEMENT_ID);
        Self::default()
    }
}
