//! Story Page - a four-step interactive page for the browser
//!
//! Core modules:
//! - `flow`: Headless page logic (step machine, typing script, slider, ending, emoji pool)
//! - `settings`: Page configuration with defaults matching the shipped page
//! - `audio`: Background music element control (browser only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod flow;
pub mod settings;

pub use flow::{Choice, Effect, Intent, PageState, Step, boot, dispatch};
pub use settings::PageConfig;

/// Page configuration constants
pub mod consts {
    /// Number of step panels (Intro, Photos, Offer, Ending)
    pub const STEP_COUNT: u8 = 4;
    /// Index of the ending panel
    pub const ENDING_STEP: u8 = STEP_COUNT - 1;

    /// Typing effect: delay after each character (ms)
    pub const TYPE_SPEED_MS: u32 = 26;
    /// Typing effect: pause before each line break (ms)
    pub const LINE_PAUSE_MS: u32 = 420;

    /// Slider photos live at images/1.<ext> ... images/N.<ext>
    pub const PHOTO_COUNT: usize = 4;
    pub const PHOTO_EXT: &str = "jpeg";
    pub const PHOTO_DIR: &str = "images";

    /// Outbound messaging recipient (digits only, no +)
    pub const WHATSAPP_PHONE: &str = "27838582088";

    /// Background music volume (0.0 - 1.0)
    pub const MUSIC_VOLUME: f64 = 0.25;
    pub const GLYPH_AUDIBLE: &str = "🔈";
    pub const GLYPH_MUTED: &str = "🔇";

    /// Floating emoji timing
    pub const EMOJI_BURST: u32 = 8;
    pub const EMOJI_BURST_SPACING_MS: u32 = 250;
    pub const EMOJI_INTERVAL_MS: u32 = 650;
    /// Extra time an element lingers after its animation ends
    pub const EMOJI_LINGER_MS: u32 = 1000;
    /// Steady state is ~20s lifetime / 0.65s interval = 31 live elements
    pub const EMOJI_CAPACITY: usize = 32;
}

/// Render a 0-based position as "<pos+1> / <total>"
#[inline]
pub fn counter_text(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}
