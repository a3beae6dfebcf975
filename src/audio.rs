//! Background music using an `<audio>` element
//!
//! The audio file itself is referenced by the page markup; this only drives playback.
//! Start/mute bookkeeping lives in `flow::MusicState`, this applies it to the element.

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Wrapper around the page's background `<audio>` element
pub struct BackgroundMusic {
    el: Option<HtmlAudioElement>,
}

impl BackgroundMusic {
    /// Bind to the element (if present) and set its volume
    pub fn new(el: Option<HtmlAudioElement>, volume: f64) -> Self {
        match &el {
            Some(el) => el.set_volume(volume),
            None => log::warn!("No background audio element - music disabled"),
        }
        Self { el }
    }

    pub fn is_available(&self) -> bool {
        self.el.is_some()
    }

    /// Request playback; a rejected request (autoplay policy) is expected and ignored
    pub fn play(&self) {
        let Some(el) = &self.el else { return };
        match el.play() {
            Ok(promise) => {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::debug!("Background music blocked: {:?}", e);
                    }
                });
            }
            Err(e) => log::debug!("Background music play() threw: {:?}", e),
        }
    }

    pub fn set_muted(&self, muted: bool) {
        if let Some(el) = &self.el {
            el.set_muted(muted);
        }
    }
}
