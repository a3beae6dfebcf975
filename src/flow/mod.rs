//! Headless page logic
//!
//! Everything the page does lives here as plain data and pure transitions:
//! - No DOM, timers or audio handles
//! - `dispatch` is the single writer of `PageState`
//! - Randomness only through a caller-supplied RNG

pub mod dispatch;
pub mod emoji;
pub mod ending;
pub mod slider;
pub mod state;
pub mod typing;

pub use dispatch::{Effect, Intent, boot, dispatch};
pub use emoji::{EmojiPool, EmojiSchedule, FloatingEmoji, timer_delay_ms};
pub use ending::{Ending, encode_uri_component, whatsapp_link};
pub use slider::{PhotoSequence, PhotoSlider, SlideView, wrap_index};
pub use state::{Choice, MusicState, PageState, Step};
pub use typing::{Keystroke, TypingHandle, TypingScript};
