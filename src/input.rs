use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::CursorMoved;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPos>()
            .add_message::<PointerEvent>()
            .add_message::<AutomatonCommand>()
            .add_systems(
                Update,
                (track_cursor_pos, collect_pointer_events, collect_automaton_commands),
            );
    }
}

/// Something the user asked the automaton to do
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonCommand {
    /// Manual single step
    Step,
    ToggleMode,
    ApplyAll,
    /// Apply the pending change at this index
    ApplyIndex(usize),
    IterateNow,
    /// Stop if running, restart otherwise
    ToggleRunning,
    NextScenario,
    /// Halve the delay between automatic iterations
    FasterIterations,
    /// Double the delay between automatic iterations
    SlowerIterations,
}

const INDEX_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

#[derive(Message, Debug, Clone)]
pub struct PointerEvent {
    /// Window (logical) coordinates
    pub position: Vec2,
    pub event_type: PointerEventType,
    /// 0 = mouse, >0 = touch id
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Up,
}

impl PointerEvent {
    /// Convert window coords to a point on the y=0 board plane
    pub fn to_world_position(
        &self,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) -> Option<Vec3> {
        camera
            .viewport_to_world(camera_transform, self.position)
            .ok()
            .map(|ray| {
                let t = -ray.origin.y / ray.direction.y;
                ray.origin + ray.direction * t
            })
    }
}

#[derive(Resource, Default, Debug, Clone, Copy)]
struct CursorPos(pub Option<Vec2>);

fn track_cursor_pos(mut ev_cursor: MessageReader<CursorMoved>, mut pos: ResMut<CursorPos>) {
    for e in ev_cursor.read() {
        // last event wins
        pos.0 = Some(e.position);
    }
}

fn collect_pointer_events(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorPos>,
    mut touch_events: MessageReader<TouchInput>,
    mut out: MessageWriter<PointerEvent>,
) {
    if let Some(p) = cursor.0 {
        if mouse_buttons.just_pressed(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Down,
                id: 0,
            });
        }
        if mouse_buttons.just_released(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Up,
                id: 0,
            });
        }
    }

    for ev in touch_events.read() {
        let event_type = match ev.phase {
            TouchPhase::Started => PointerEventType::Down,
            TouchPhase::Ended | TouchPhase::Canceled => PointerEventType::Up,
            TouchPhase::Moved => continue,
        };
        out.write(PointerEvent {
            position: ev.position,
            event_type,
            id: ev.id,
        });
    }
}

fn collect_automaton_commands(
    keys: Res<ButtonInput<KeyCode>>,
    mut out: MessageWriter<AutomatonCommand>,
) {
    let bindings = [
        (KeyCode::Space, AutomatonCommand::Step),
        (KeyCode::KeyM, AutomatonCommand::ToggleMode),
        (KeyCode::Enter, AutomatonCommand::ApplyAll),
        (KeyCode::KeyI, AutomatonCommand::IterateNow),
        (KeyCode::KeyP, AutomatonCommand::ToggleRunning),
        (KeyCode::KeyN, AutomatonCommand::NextScenario),
        (KeyCode::Equal, AutomatonCommand::FasterIterations),
        (KeyCode::Minus, AutomatonCommand::SlowerIterations),
    ];

    for (key, command) in bindings {
        if keys.just_pressed(key) {
            out.write(command);
        }
    }

    for (index, key) in INDEX_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            out.write(AutomatonCommand::ApplyIndex(index));
        }
    }
}
