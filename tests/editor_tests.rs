use eggdevice::assembly::AssembledSolid;
use eggdevice::device::Variant;
use eggdevice::float_types::Real;
use eggdevice::params::{ParamValue, ShapeParameters, helpers_from_fragment};
use eggdevice::scene::{DeviceEditor, EditorState, HeadlessScene, SceneComposer, SolidHandle};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Register(u64),
    Release(u64),
    Helpers(bool),
    Screen(Real),
}

/// Composer that only records what it was asked to do
#[derive(Default)]
struct Recorder {
    next: u64,
    calls: Vec<Call>,
}

impl SceneComposer for Recorder {
    fn register_solid(&mut self, _solid: &AssembledSolid) -> SolidHandle {
        self.next += 1;
        self.calls.push(Call::Register(self.next));
        SolidHandle::new(self.next)
    }

    fn release_solid(&mut self, handle: SolidHandle) {
        self.calls.push(Call::Release(handle.id()));
    }

    fn set_helpers_visible(&mut self, visible: bool) {
        self.calls.push(Call::Helpers(visible));
    }

    fn set_screen_depth(&mut self, z: Real) {
        self.calls.push(Call::Screen(z));
    }
}

fn small_params() -> ShapeParameters {
    ShapeParameters::default()
}

#[test]
fn repeated_rebuilds_keep_one_live_solid() {
    let mut editor = DeviceEditor::new(HeadlessScene::default(), Variant::Simple, small_params());
    for _ in 0..4 {
        editor.rebuild();
    }

    assert_eq!(editor.rebuilds(), 5);
    let scene = editor.scene();
    assert_eq!(scene.live_count(), 1);
    assert_eq!(scene.released_count(), 4);
    assert_eq!(scene.live()[0].handle, editor.current_handle().unwrap());

    // every released handle is distinct and none of them is the live one
    let mut released: Vec<u64> = scene.released().iter().map(|h| h.id()).collect();
    released.sort_unstable();
    released.dedup();
    assert_eq!(released.len(), 4);
    assert!(!released.contains(&editor.current_handle().unwrap().id()));
}

#[test]
fn live_memory_does_not_grow_across_rebuilds() {
    let mut editor = DeviceEditor::new(HeadlessScene::default(), Variant::Simple, small_params());
    let first = editor.scene().live_bytes();
    for _ in 0..3 {
        editor.rebuild();
    }
    assert_eq!(editor.scene().live_bytes(), first);
}

#[test]
fn old_solid_is_released_before_the_new_one_registers() {
    let mut editor = DeviceEditor::new(Recorder::default(), Variant::Simple, small_params());
    editor
        .on_parameter_changed("eggGirth", ParamValue::Number(0.9))
        .unwrap();
    editor
        .on_parameter_changed("screenPositionZ", ParamValue::Number(-0.3))
        .unwrap();
    let scene = editor.into_scene();

    let defaults = small_params();
    assert_eq!(
        scene.calls,
        vec![
            Call::Helpers(defaults.helpers),
            Call::Screen(defaults.screen_position_z),
            Call::Register(1),
            Call::Release(1),
            Call::Register(2),
            Call::Helpers(defaults.helpers),
            Call::Screen(-0.3),
            Call::Release(2),
        ]
    );
}

#[test]
fn editor_is_idle_between_edits() {
    let mut editor = DeviceEditor::new(HeadlessScene::default(), Variant::Simple, small_params());
    assert_eq!(editor.state(), EditorState::Idle);

    let change = editor
        .on_parameter_changed("insetRadiusTop", ParamValue::Number(0.5))
        .unwrap();
    assert_eq!(change.value, ParamValue::Number(0.5));
    assert_eq!(editor.state(), EditorState::Idle);
    assert_eq!(editor.rebuilds(), 2);
    assert_eq!(editor.params().inset_radius_top, 0.5);
}

#[test]
fn panel_values_are_clamped() {
    let mut editor = DeviceEditor::new(HeadlessScene::default(), Variant::Simple, small_params());
    let change = editor
        .on_parameter_changed("eggGirth", ParamValue::Number(50.0))
        .unwrap();
    assert_eq!(change.value, ParamValue::Number(2.0));
    assert_eq!(editor.params().egg_girth, 2.0);
}

#[test]
fn variant_switch_rebuilds_once() {
    let mut editor = DeviceEditor::new(HeadlessScene::default(), Variant::Simple, small_params());
    let simple_steps = editor.current_solid().unwrap().steps;

    editor.set_variant(Variant::Buttons);
    editor.set_variant(Variant::Buttons);

    assert_eq!(editor.rebuilds(), 2);
    assert!(editor.current_solid().unwrap().steps > simple_steps);
    assert_eq!(editor.scene().live_count(), 1);
}

#[test]
fn helpers_follow_the_url_fragment() {
    let params = ShapeParameters {
        helpers: helpers_from_fragment("#debug"),
        ..small_params()
    };
    let editor = DeviceEditor::new(HeadlessScene::new(false, -0.251), Variant::Simple, params);
    assert!(editor.scene().helpers.visible);

    let params = ShapeParameters {
        helpers: helpers_from_fragment(""),
        ..small_params()
    };
    let editor = DeviceEditor::new(HeadlessScene::new(true, -0.251), Variant::Simple, params);
    assert!(!editor.scene().helpers.visible);
}
