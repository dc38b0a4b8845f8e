mod support;

use eggdevice::assembly::BoolOp;
use eggdevice::device::{DeviceConfig, Variant, build_device};
use eggdevice::errors::DeviceError;
use eggdevice::material::{BLACK, Material, MaterialPreset};
use eggdevice::params::ShapeParameters;
use eggdevice::primitive::PrimitiveSpec;
use eggdevice::scene::{DeviceEditor, HeadlessScene};

use crate::support::{approx_eq, demo_path};

#[test]
fn desk_toy_loads() {
    let config = DeviceConfig::load(demo_path("desk_toy.json")).unwrap();
    assert_eq!(config.body.segments, 32);
    assert_eq!(config.body.placement.scale.z, 0.5);
    assert_eq!(config.steps.len(), 2);
    assert_eq!(config.steps[0].op, BoolOp::Subtract);
    assert_eq!(config.steps[1].op, BoolOp::Union);
    assert!(matches!(
        config.steps[1].primitive,
        PrimitiveSpec::Torus {
            radial_segments: 12,
            tubular_segments: 48,
            ..
        }
    ));
    // omitted placement fields fall back to the identity
    assert_eq!(config.steps[0].placement.scale.x, 1.0);
    assert_eq!(config.steps[1].placement.position.y, 0.0);
}

#[test]
fn desk_toy_stands_flat_and_wears_a_belt() {
    let config = DeviceConfig::load(demo_path("desk_toy.json")).unwrap();
    let solid = build_device(&config);
    let bb = solid.bounding_box();

    assert!(approx_eq(bb.mins.y, -0.9, 1e-9));
    assert!(approx_eq(bb.maxs.y, 1.0, 1e-9));
    assert!(approx_eq(bb.maxs.x, 0.85, 1e-9));

    // the cut face at the base takes the box's material, the belt its own
    let materials = solid.materials();
    assert_eq!(materials.len(), 3);
    assert!(materials.contains(&MaterialPreset::matcap().body));
    assert!(materials.contains(&Material::basic(BLACK)));
    assert!(materials.contains(&MaterialPreset::matcap().trim));
}

#[test]
fn stock_configs_survive_a_json_round_trip() {
    for variant in Variant::ALL {
        let config = DeviceConfig::from_params(&ShapeParameters::default(), variant);
        let json = config.to_json_pretty().unwrap();
        assert_eq!(DeviceConfig::from_json(&json).unwrap(), config);
    }
}

#[test]
fn missing_file_names_the_path() {
    let path = demo_path("no_such_device.json");
    match DeviceConfig::load(&path) {
        Err(DeviceError::Io { path: reported, .. }) => {
            assert!(reported.ends_with("no_such_device.json"))
        },
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn partial_parameter_files_keep_defaults() {
    let json = std::fs::read_to_string(demo_path("chunky_params.json")).unwrap();
    let params: ShapeParameters = serde_json::from_str(&json).unwrap();
    let defaults = ShapeParameters::default();

    assert!(!params.helpers);
    assert_eq!(params.egg_girth, 1.1);
    assert_eq!(params.device_scale_z, 0.7);
    assert_eq!(params.inset_height, defaults.inset_height);
    assert_eq!(params.inset2_position_z, defaults.inset2_position_z);

    let editor = DeviceEditor::new(HeadlessScene::default(), Variant::Simple, params);
    assert!(!editor.scene().helpers.visible);
    assert_eq!(editor.scene().screen.z(), -0.3);
    assert!(editor.current_solid().unwrap().bounding_box().maxs.x > 1.0);
}
