use bevy::prelude::*;

use crate::{
    camera::{BoardCamera, CameraBounds},
    game::document::GraphDocument,
    visual::{
        edges::{ConnectionLink, links::IDLE_LINK_COLOR},
        nodes::{CircleNode, CircleVisual, circle_color},
    },
};

/// Circle radius as a fraction of the board side (normalized units)
pub const CIRCLE_RADIUS: f32 = 0.05;

/// Connection thickness as a fraction of the circle radius
const LINK_THICKNESS_FRACTION: f32 = 0.15;

/// Everything spawned for the current graph; despawned on rebuild
#[derive(Component)]
pub struct SceneEntity;

/// Board the scene was laid out on, and for which document revision
#[derive(Resource, Debug, Clone, Copy)]
pub struct SceneLayout {
    pub board: CameraBounds,
    pub built_revision: u64,
}

/// System: (Re)build circle and connection entities when the document layout changes
pub fn sync_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    board_camera: Res<BoardCamera>,
    document: Res<GraphDocument>,
    layout: Option<Res<SceneLayout>>,
    existing: Query<Entity, With<SceneEntity>>,
) {
    if layout.is_some_and(|layout| layout.built_revision == document.layout_revision()) {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let board = board_camera.board();
    let radius = CIRCLE_RADIUS * board.width();
    let sphere = meshes.add(Sphere::new(radius));

    for circle in document.circles() {
        let Some(position) = document.position(circle.id) else {
            warn!("Circle {} has no layout position, skipping", circle.id);
            continue;
        };
        let center = board.to_world(position);
        let color = circle_color(circle);

        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(color.x, color.y, color.z, color.w),
            alpha_mode: AlphaMode::Blend,
            ..default()
        });

        commands.spawn((
            Mesh3d(sphere.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(center + Vec3::Y * radius),
            CircleNode {
                circle_id: circle.id,
            },
            CircleVisual::new(color),
            SceneEntity,
        ));
    }

    let thickness = radius * LINK_THICKNESS_FRACTION;
    for connection in document.connections() {
        let (Some(a), Some(b)) = (
            document.position(connection.entity1_id),
            document.position(connection.entity2_id),
        ) else {
            continue;
        };

        let start = board.to_world(a);
        let end = board.to_world(b);
        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            continue;
        }

        let mesh = meshes.add(Cuboid::new(length, thickness, thickness));
        let material = materials.add(StandardMaterial {
            base_color: IDLE_LINK_COLOR,
            unlit: true,
            ..default()
        });

        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation((start + end) * 0.5)
                .with_rotation(Quat::from_rotation_arc(Vec3::X, delta / length)),
            ConnectionLink {
                connection_id: connection.id,
            },
            SceneEntity,
        ));
    }

    commands.insert_resource(SceneLayout {
        board,
        built_revision: document.layout_revision(),
    });

    info!(
        "Scene built for '{}': {} circles, {} connections",
        document.scenario_name(),
        document.circles().len(),
        document.connections().len()
    );
}
