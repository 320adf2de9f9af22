pub mod scene;

pub use scene::{CIRCLE_RADIUS, SceneEntity, SceneLayout, sync_scene};
