use bevy::camera::ScalingMode;
use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoardCamera>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, update_camera_resource);
    }
}

#[derive(Resource)]
pub struct BoardCamera {
    pub scale: f32,
    pub aspect_ratio: f32,
    pub bounds: CameraBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for BoardCamera {
    fn default() -> Self {
        let scale = 8.0;
        let aspect_ratio = 16.0 / 9.0;

        Self {
            scale,
            aspect_ratio,
            bounds: CameraBounds::from_scale_and_aspect(scale, aspect_ratio),
        }
    }
}

impl BoardCamera {
    /// Square region the graph is laid out in
    pub fn board(&self) -> CameraBounds {
        self.bounds.centered_square(0.08)
    }
}

impl CameraBounds {
    pub fn from_scale_and_aspect(scale: f32, aspect_ratio: f32) -> Self {
        // For orthographic, scale determines the vertical view
        let half_height = scale * 0.5;
        let half_width = half_height * aspect_ratio;

        Self {
            left: -half_width,
            right: half_width,
            bottom: -half_height,
            top: half_height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Largest centered square, inset by a fraction of its side
    pub fn centered_square(&self, padding_percent: f32) -> CameraBounds {
        let side = self.width().min(self.height()) * (1.0 - 2.0 * padding_percent);
        let center_x = (self.left + self.right) * 0.5;
        let center_z = (self.bottom + self.top) * 0.5;

        CameraBounds {
            left: center_x - side * 0.5,
            right: center_x + side * 0.5,
            bottom: center_z - side * 0.5,
            top: center_z + side * 0.5,
        }
    }

    /// Normalized (0..1, 0..1) -> world point on the y=0 plane
    pub fn to_world(&self, normalized: Vec2) -> Vec3 {
        Vec3::new(
            self.left + self.width() * normalized.x,
            0.0,
            self.bottom + self.height() * normalized.y,
        )
    }

    /// World point on the y=0 plane -> normalized coordinates
    pub fn to_normalized(&self, world: Vec3) -> Vec2 {
        Vec2::new(
            (world.x - self.left) / self.width(),
            (world.z - self.bottom) / self.height(),
        )
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Top-down orthographic camera looking at the XZ plane,
/// +Z pointing up on screen
fn setup_camera(mut commands: Commands, board_camera: Res<BoardCamera>) {
    let projection = Projection::Orthographic(OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: board_camera.scale,
        },
        near: 0.0,
        far: 1000.0,
        ..OrthographicProjection::default_3d()
    });
    commands.spawn((
        Camera3d::default(),
        projection,
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        MainCamera,
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(2.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));
}

/// Update camera resource when window is resized
fn update_camera_resource(mut board_camera: ResMut<BoardCamera>, windows: Query<&Window>) {
    if let Ok(window) = windows.single() {
        let new_aspect = window.width() / window.height();

        // Only update if aspect ratio changed
        if (new_aspect - board_camera.aspect_ratio).abs() > 0.01 {
            board_camera.aspect_ratio = new_aspect;
            board_camera.bounds =
                CameraBounds::from_scale_and_aspect(board_camera.scale, board_camera.aspect_ratio);

            debug!("Camera bounds updated: {:?}", board_camera.bounds);
        }
    }
}
