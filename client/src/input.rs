use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

/// Semantic input actions fed to the climbing controller as edges.
///
/// Desktop mapping: `Use` is the left hand, `Drop` the right. `Grab` is
/// the VR grip semantic and stays inert on the desktop sandbox rig.
#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Use,
    Grab,
    Drop,
    Jump,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Use, MouseButton::Left);
    input_map.insert(InputAction::Grab, KeyCode::KeyG);
    input_map.insert(InputAction::Drop, MouseButton::Right);
    input_map.insert(InputAction::Jump, KeyCode::Space);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}
