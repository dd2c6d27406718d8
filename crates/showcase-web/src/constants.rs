// DOM ids and selectors used by the showcase page.

pub const CANVAS_ID: &str = "webgl";
pub const LOADER_ID: &str = "loader";
pub const UI_CONTAINER_ID: &str = "ui-container";
pub const STATUS_ID: &str = "sys-status";
pub const WARP_BTN_ID: &str = "warp-btn";
pub const XRAY_BTN_ID: &str = "xray-btn";
pub const ENGINE_BTN_ID: &str = "start-engine";
pub const PAINT_BTN_SELECTOR: &str = ".color-btn";
pub const CAM_BTN_SELECTOR: &str = ".cam-btn";
pub const PAINT_LABEL_SELECTOR: &str = ".current-paint";
pub const ACTIVE_CLASS: &str = "active";
pub const WARPING_BODY_CLASS: &str = "warping";

// Seed for the deterministic warp shake / chroma jitter stream.
pub const TICKER_SEED: u64 = 42;
pub const PARTICLE_SEED: u64 = 7;
