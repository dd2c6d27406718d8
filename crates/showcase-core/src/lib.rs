pub mod asset;
pub mod calibrate;
pub mod camera;
pub mod constants;
pub mod decor;
pub mod fit;
pub mod motion;
pub mod scene;
pub mod state;
pub mod tick;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use calibrate::*;
pub use camera::*;
pub use constants::*;
pub use decor::*;
pub use fit::*;
pub use motion::*;
pub use scene::*;
pub use state::*;
pub use tick::*;
