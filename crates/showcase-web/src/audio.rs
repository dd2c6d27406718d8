use showcase_core::ENGINE_AUDIO_VOLUME;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Best-effort engine-start sample. Autoplay policies or a missing file both
/// land in the rejection branch; nothing beyond the log and dialog happens.
pub fn play_engine_start(src: &str) {
    let audio = match web::HtmlAudioElement::new_with_src(src) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("audio element unavailable: {e:?}");
            return;
        }
    };
    audio.set_volume(ENGINE_AUDIO_VOLUME);
    match audio.play() {
        Ok(promise) => {
            let src = src.to_string();
            spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::error!("engine audio failed: {e:?}");
                    crate::dom::alert(&format!("Audio file '{src}' is missing or blocked."));
                }
            });
        }
        Err(e) => log::error!("engine audio failed to start: {e:?}"),
    }
}
