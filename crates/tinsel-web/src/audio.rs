//! Looping background music over an `HtmlAudioElement`.
//!
//! Playback can be rejected by the browser's autoplay policy; that is logged
//! and ignored so the visuals run regardless.

use tinsel_core::{MUSIC_LOOP, MUSIC_URL, MUSIC_VOLUME};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub struct Music {
    element: web::HtmlAudioElement,
}

impl Music {
    pub fn new() -> anyhow::Result<Self> {
        let element = web::HtmlAudioElement::new_with_src(MUSIC_URL)
            .map_err(|e| anyhow::anyhow!("audio element: {:?}", e))?;
        element.set_loop(MUSIC_LOOP);
        element.set_volume(MUSIC_VOLUME);
        Ok(Self { element })
    }

    /// Best-effort start; a rejected play promise is logged and dropped.
    pub fn play(&self) {
        match self.element.play() {
            Ok(promise) => {
                spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("music play rejected: {:?}", e);
                    }
                });
            }
            Err(e) => log::warn!("music play error: {:?}", e),
        }
    }

    pub fn pause(&self) {
        if let Err(e) = self.element.pause() {
            log::warn!("music pause error: {:?}", e);
        }
    }

    pub fn set_volume(&self, volume: f64) {
        self.element.set_volume(volume.clamp(0.0, 1.0));
    }
}
