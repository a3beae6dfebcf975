//! Page state and core data types
//!
//! All state that changes while the page is open lives here. Nothing is persisted;
//! a reload starts from `PageState::new` again.

use serde::{Deserialize, Serialize};

use super::ending::Ending;
use super::slider::PhotoSlider;
use crate::consts::*;
use crate::settings::PageConfig;

/// Which of the four mutually exclusive panels is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Step(u8);

impl Step {
    pub const INTRO: Step = Step(0);
    pub const PHOTOS: Step = Step(1);
    pub const OFFER: Step = Step(2);
    pub const ENDING: Step = Step(ENDING_STEP);

    /// Clamp any requested index into [0, STEP_COUNT - 1] (no wraparound)
    pub fn clamped(requested: i64) -> Self {
        Step(requested.clamp(0, ENDING_STEP as i64) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn advance(self) -> Self {
        Self::clamped(self.0 as i64 + 1)
    }

    pub fn retreat(self) -> Self {
        Self::clamped(self.0 as i64 - 1)
    }

    pub fn is_ending(self) -> bool {
        self.0 == ENDING_STEP
    }

    /// Progress indicator text, e.g. "2 / 4"
    pub fn progress_text(self) -> String {
        crate::counter_text(self.0 as usize, STEP_COUNT as usize)
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "Intro",
            1 => "Photos",
            2 => "Offer",
            _ => "Ending",
        }
    }
}

/// The visitor's answer on the final step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Choice {
    #[default]
    Unset,
    Yes,
    No,
}

impl Choice {
    pub fn is_set(self) -> bool {
        self != Choice::Unset
    }

    pub fn ending(self) -> Option<Ending> {
        match self {
            Choice::Unset => None,
            Choice::Yes => Some(Ending::Yes),
            Choice::No => Some(Ending::No),
        }
    }
}

impl From<Ending> for Choice {
    fn from(ending: Ending) -> Self {
        match ending {
            Ending::Yes => Choice::Yes,
            Ending::No => Choice::No,
        }
    }
}

/// Background music flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicState {
    /// One-way latch: playback has been requested once
    pub started: bool,
    pub muted: bool,
}

impl MusicState {
    /// Returns true exactly once: the caller should attempt playback
    pub fn start_once(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        true
    }

    /// Flip mute, returning the new muted flag
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn glyph(&self) -> &'static str {
        if self.muted { GLYPH_MUTED } else { GLYPH_AUDIBLE }
    }
}

/// Complete page state (single writer: `flow::dispatch`)
#[derive(Debug, Clone)]
pub struct PageState {
    /// Visible panel
    pub step: Step,
    /// Answer on the ending step; set only while the ending is shown
    pub choice: Choice,
    /// One-shot latch for the intro typing effect
    pub typing_started: bool,
    pub music: MusicState,
    pub slider: PhotoSlider,
    /// Card replaced by the farewell message; further intents are ignored
    pub exited: bool,
    /// Recipient digits for the outbound link
    pub recipient: String,
}

impl PageState {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            step: Step::INTRO,
            choice: Choice::Unset,
            typing_started: false,
            music: MusicState::default(),
            slider: PhotoSlider::new(config.photo_count, &config.photo_ext),
            exited: false,
            recipient: config.whatsapp_phone.clone(),
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(&PageConfig::default())
    }
}
