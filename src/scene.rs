//! The seam between the geometry pipeline and whatever draws it.
//!
//! A [`SceneComposer`] owns render-side resources. The [`DeviceEditor`] owns the knobs and
//! the single "current solid" slot, and drives the composer: every rebuild registers the
//! new solid and releases the previous one exactly once, so the scene never holds two
//! generations of the device.

use crate::assembly::AssembledSolid;
use crate::device::{DeviceConfig, Variant, build_device};
use crate::errors::DeviceError;
use crate::float_types::{PI, Real};
use crate::material::{BLACK, Color, Material, WHITE};
use crate::mesh::MeshBuffers;
use crate::params::{Effect, ParamValue, ParameterChange, ShapeParameters, apply_change};
use crate::placement::Placement;

/// Opaque id of a registered solid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolidHandle(u64);

impl SolidHandle {
    pub const fn new(id: u64) -> Self {
        SolidHandle(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// What the editor needs from a scene graph
pub trait SceneComposer {
    /// Upload `solid` and start drawing it
    fn register_solid(&mut self, solid: &AssembledSolid) -> SolidHandle;

    /// Stop drawing the solid and free its resources
    fn release_solid(&mut self, handle: SolidHandle);

    /// Show or hide the debug overlays
    fn set_helpers_visible(&mut self, _visible: bool) {}

    /// Move the screen plane along Z
    fn set_screen_depth(&mut self, _z: Real) {}
}

/// Axes overlay
#[derive(Clone, Debug, PartialEq)]
pub struct AxesHelper {
    pub size: Real,
    pub y: Real,
}

/// Square floor grid
#[derive(Clone, Debug, PartialEq)]
pub struct GridHelper {
    pub size: Real,
    pub divisions: usize,
    pub color: Color,
    pub y: Real,
}

/// Debug overlays sharing one visibility toggle
#[derive(Clone, Debug, PartialEq)]
pub struct Helpers {
    pub visible: bool,
    pub axes: AxesHelper,
    pub grid: GridHelper,
}

impl Helpers {
    pub fn new(visible: bool) -> Self {
        Helpers {
            visible,
            // just above the grid so the lines do not z-fight
            axes: AxesHelper { size: 10.0, y: -0.999 },
            grid: GridHelper {
                size: 10.0,
                divisions: 10,
                color: WHITE,
                y: -1.0,
            },
        }
    }
}

/// Flat black quad standing in for the display, facing -Z
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenPlane {
    pub placement: Placement,
    pub material: Material,
}

impl ScreenPlane {
    pub const SCALE: Real = 0.7;

    pub fn new(z: Real) -> Self {
        ScreenPlane {
            placement: Placement::at(0.0, 0.0, z)
                .rotated(PI, 0.0, 0.0)
                .uniform_scale(Self::SCALE),
            material: Material::basic(BLACK),
        }
    }

    pub fn z(&self) -> Real {
        self.placement.position.z
    }
}

/// A registered solid's render-side copy
#[derive(Clone, Debug)]
pub struct GeometryRecord {
    pub handle: SolidHandle,
    pub buffers: MeshBuffers<Material>,
}

/// In-memory scene: keeps the flattened buffers a GPU renderer would upload and counts
/// registrations and releases.
#[derive(Debug)]
pub struct HeadlessScene {
    next_id: u64,
    live: Vec<GeometryRecord>,
    released: Vec<SolidHandle>,
    pub helpers: Helpers,
    pub screen: ScreenPlane,
}

impl HeadlessScene {
    pub fn new(helpers_visible: bool, screen_z: Real) -> Self {
        HeadlessScene {
            next_id: 1,
            live: Vec::new(),
            released: Vec::new(),
            helpers: Helpers::new(helpers_visible),
            screen: ScreenPlane::new(screen_z),
        }
    }

    pub fn live(&self) -> &[GeometryRecord] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn released(&self) -> &[SolidHandle] {
        &self.released
    }

    pub fn released_count(&self) -> usize {
        self.released.len()
    }

    /// Bytes held by live geometry
    pub fn live_bytes(&self) -> usize {
        self.live.iter().map(|r| r.buffers.byte_len()).sum()
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        let params = ShapeParameters::default();
        Self::new(params.helpers, params.screen_position_z)
    }
}

impl SceneComposer for HeadlessScene {
    fn register_solid(&mut self, solid: &AssembledSolid) -> SolidHandle {
        let handle = SolidHandle::new(self.next_id);
        self.next_id += 1;
        let buffers = solid.to_buffers();
        tracing::debug!(
            handle = handle.0,
            vertices = buffers.vertex_count(),
            groups = buffers.groups.len(),
            bytes = buffers.byte_len(),
            "registered solid"
        );
        self.live.push(GeometryRecord { handle, buffers });
        handle
    }

    fn release_solid(&mut self, handle: SolidHandle) {
        match self.live.iter().position(|r| r.handle == handle) {
            Some(index) => {
                self.live.swap_remove(index);
                self.released.push(handle);
                tracing::debug!(handle = handle.0, "released solid");
            },
            None => tracing::warn!(handle = handle.0, "release of a solid that is not live"),
        }
    }

    fn set_helpers_visible(&mut self, visible: bool) {
        self.helpers.visible = visible;
    }

    fn set_screen_depth(&mut self, z: Real) {
        self.screen.placement.position.z = z;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Rebuilding,
}

/// GUI state object: current knob values plus the one live solid.
pub struct DeviceEditor<C: SceneComposer> {
    params: ShapeParameters,
    variant: Variant,
    scene: C,
    current: Option<(SolidHandle, AssembledSolid)>,
    state: EditorState,
    rebuilds: usize,
}

impl<C: SceneComposer> DeviceEditor<C> {
    /// Push the scene-only knobs into `scene` and run the initial build
    pub fn new(mut scene: C, variant: Variant, params: ShapeParameters) -> Self {
        scene.set_helpers_visible(params.helpers);
        scene.set_screen_depth(params.screen_position_z);
        let mut editor = DeviceEditor {
            params,
            variant,
            scene,
            current: None,
            state: EditorState::Idle,
            rebuilds: 0,
        };
        editor.rebuild();
        editor
    }

    pub const fn params(&self) -> &ShapeParameters {
        &self.params
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    pub const fn scene(&self) -> &C {
        &self.scene
    }

    pub const fn state(&self) -> EditorState {
        self.state
    }

    /// Builds run so far, the initial one included
    pub const fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn current_solid(&self) -> Option<&AssembledSolid> {
        self.current.as_ref().map(|(_, solid)| solid)
    }

    pub fn current_handle(&self) -> Option<SolidHandle> {
        self.current.as_ref().map(|(handle, _)| *handle)
    }

    /// Panel callback. Shape knobs trigger a full rebuild, scene-only knobs update the
    /// scene in place.
    pub fn on_parameter_changed(
        &mut self,
        name: &str,
        value: ParamValue,
    ) -> Result<ParameterChange, DeviceError> {
        let change = apply_change(&mut self.params, name, value)?;
        match change.effect {
            Effect::Rebuild => self.rebuild(),
            Effect::SceneOnly => {
                self.scene.set_helpers_visible(self.params.helpers);
                self.scene.set_screen_depth(self.params.screen_position_z);
            },
        }
        Ok(change)
    }

    /// Switch to another variant and rebuild
    pub fn set_variant(&mut self, variant: Variant) {
        if self.variant != variant {
            self.variant = variant;
            self.rebuild();
        }
    }

    /// Regenerate the device from the current knobs and swap it into the scene.
    ///
    /// The new solid is fully built before the old one is released, then registered in
    /// the same call, so no frame sees either two solids or a half-built one.
    pub fn rebuild(&mut self) {
        self.state = EditorState::Rebuilding;

        let solid = build_device(&DeviceConfig::from_params(&self.params, self.variant));

        if let Some((old, _)) = self.current.take() {
            self.scene.release_solid(old);
        }
        let handle = self.scene.register_solid(&solid);
        self.current = Some((handle, solid));
        self.rebuilds += 1;

        self.state = EditorState::Idle;
        tracing::info!(
            rebuild = self.rebuilds,
            variant = %self.variant,
            handle = handle.id(),
            "device rebuilt"
        );
    }

    /// Release the current solid and hand back the scene
    pub fn into_scene(mut self) -> C {
        if let Some((handle, _)) = self.current.take() {
            self.scene.release_solid(handle);
        }
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_knobs_do_not_rebuild() {
        let mut editor = DeviceEditor::new(
            HeadlessScene::default(),
            Variant::Simple,
            ShapeParameters::default(),
        );
        let handle = editor.current_handle();

        editor
            .on_parameter_changed("screenPositionZ", ParamValue::Number(-0.3))
            .unwrap();
        editor
            .on_parameter_changed("helpers", ParamValue::Flag(false))
            .unwrap();

        assert_eq!(editor.rebuilds(), 1);
        assert_eq!(editor.current_handle(), handle);
        assert_eq!(editor.scene().screen.z(), -0.3);
        assert!(!editor.scene().helpers.visible);
    }

    #[test]
    fn unknown_parameter_leaves_scene_alone() {
        let mut editor = DeviceEditor::new(
            HeadlessScene::default(),
            Variant::Simple,
            ShapeParameters::default(),
        );
        assert!(editor
            .on_parameter_changed("eggWidth", ParamValue::Number(1.0))
            .is_err());
        assert_eq!(editor.rebuilds(), 1);
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[test]
    fn double_release_is_ignored() {
        let mut scene = HeadlessScene::default();
        let solid = crate::device::build_device(&DeviceConfig::from_params(
            &ShapeParameters::default(),
            Variant::Simple,
        ));
        let handle = scene.register_solid(&solid);
        scene.release_solid(handle);
        scene.release_solid(handle);
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.released_count(), 1);
    }

    #[test]
    fn into_scene_releases_the_last_solid() {
        let editor = DeviceEditor::new(
            HeadlessScene::default(),
            Variant::Simple,
            ShapeParameters::default(),
        );
        let scene = editor.into_scene();
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.released_count(), 1);
        assert_eq!(scene.live_bytes(), 0);
    }

    #[test]
    fn screen_plane_layout() {
        let screen = ScreenPlane::new(-0.251);
        assert_eq!(screen.z(), -0.251);
        assert_eq!(screen.placement.scale.x, 0.7);
        assert_eq!(screen.placement.rotation.x, PI);
    }
}
