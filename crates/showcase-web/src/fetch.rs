use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Fetch a URL into bytes. Each asset load is fire-and-forget; the caller
/// decides what a failure means for the scene.
pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {url}: {e:?}"))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("fetch {url}: not a Response: {e:?}"))?;
    if !resp.ok() {
        anyhow::bail!("fetch {url}: HTTP {}", resp.status());
    }
    let buf = JsFuture::from(
        resp.array_buffer()
            .map_err(|e| anyhow::anyhow!("fetch {url}: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("fetch {url}: {e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}
