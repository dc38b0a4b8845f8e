//! The egg-shaped handheld device: configuration, variants and the build entry points.
//!
//! A [`DeviceConfig`] is the whole recipe as data: the egg body plus an ordered list of
//! boolean steps. The three stock variants are generated from [`ShapeParameters`]; a
//! config can also be written out as JSON, edited, and loaded back.

use crate::assembly::{AssembledSolid, BoolOp, Operation, assemble};
use crate::errors::DeviceError;
use crate::float_types::{PI, Real};
use crate::material::{Material, MaterialPreset};
use crate::params::ShapeParameters;
use crate::placement::Placement;
use crate::primitive::PrimitiveSpec;
use crate::profile::ProfileResolution;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Body with the two screen insets
    Simple,
    /// Insets plus three recessed buttons
    #[default]
    Buttons,
    /// As `Buttons` with a finer profile and lathe, lit materials
    HighDetail,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Simple, Variant::Buttons, Variant::HighDetail];

    pub const fn name(self) -> &'static str {
        match self {
            Variant::Simple => "simple",
            Variant::Buttons => "buttons",
            Variant::HighDetail => "high-detail",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "simple" => Ok(Variant::Simple),
            "buttons" => Ok(Variant::Buttons),
            "high-detail" | "highdetail" => Ok(Variant::HighDetail),
            _ => Err(DeviceError::UnknownVariant(s.to_string())),
        }
    }
}

/// Egg silhouette knobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    pub girth: Real,
    pub apex: Real,
    #[serde(default)]
    pub resolution: ProfileResolution,
}

/// The revolved body everything else is cut from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyConfig {
    /// Lathe segments around the vertical axis
    pub segments: usize,
    /// Placement of the body; the stock variants only squash it in X and Z
    #[serde(default)]
    pub placement: Placement,
    pub material: Material,
}

/// One boolean step of the recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    pub name: String,
    pub op: BoolOp,
    pub primitive: PrimitiveSpec,
    #[serde(default)]
    pub placement: Placement,
    pub material: Material,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    pub profile: ProfileConfig,
    pub body: BodyConfig,
    /// Applied in order
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl DeviceConfig {
    /// Recipe for `variant` at the current knob values
    pub fn from_params(params: &ShapeParameters, variant: Variant) -> Self {
        let materials = match variant {
            Variant::Simple | Variant::Buttons => MaterialPreset::matcap(),
            Variant::HighDetail => MaterialPreset::standard(),
        };
        let (resolution, segments) = match variant {
            Variant::Simple | Variant::Buttons => (ProfileResolution::STANDARD, 32),
            Variant::HighDetail => (ProfileResolution::HIGH_DETAIL, 100),
        };

        let mut steps = presets::insets(params, &materials.trim);
        if variant != Variant::Simple {
            steps.extend(presets::button_recesses(&materials.recess));
            steps.extend(presets::buttons(&materials.trim));
        }

        DeviceConfig {
            profile: ProfileConfig {
                girth: params.egg_girth,
                apex: params.egg_apex,
                resolution,
            },
            body: BodyConfig {
                segments,
                placement: Placement::default().scaled(
                    params.device_scale_x,
                    1.0,
                    params.device_scale_z,
                ),
                material: materials.body,
            },
            steps,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DeviceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DeviceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, DeviceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn body_spec(&self) -> PrimitiveSpec {
        PrimitiveSpec::Egg {
            girth: self.profile.girth,
            apex: self.profile.apex,
            resolution: self.profile.resolution,
            segments: self.body.segments,
        }
    }
}

/// Build the solid a config describes. Pure and deterministic: identical configs give
/// geometrically identical solids.
pub fn build_device(config: &DeviceConfig) -> AssembledSolid {
    let body = config
        .body_spec()
        .build(config.body.material.clone())
        .place(&config.body.placement);

    let operations = config.steps.iter().map(|step| {
        let operand = step
            .primitive
            .build(step.material.clone())
            .place(&step.placement);
        Operation::new(step.op, step.name.as_str(), operand)
    });

    let solid = assemble(body, operations);
    tracing::info!(
        steps = solid.steps,
        polygons = solid.mesh.polygons.len(),
        vertices = solid.vertex_count(),
        "built device"
    );
    solid
}

/// Build the full device (insets and buttons) for `params`
pub fn build_solid(params: &ShapeParameters) -> AssembledSolid {
    build_device(&DeviceConfig::from_params(params, Variant::Buttons))
}

/// Placement constants of the stock insets and buttons. They are hand tuned; keep them as
/// they are.
pub mod presets {
    use super::*;

    pub const INSET_SEGMENTS: usize = 4;
    /// Fixed scale of the second inset
    pub const INSET2_SCALE: Real = 0.8;

    pub const RECESS_RADIUS: Real = 0.1;
    pub const BUTTON_RADIUS: Real = 0.09;
    /// Buttons are flattened to half depth along local Z
    pub const BUTTON_DEPTH_SCALE: Real = 0.5;

    /// (name, position) of each button recess
    pub const RECESSES: [(&str, [Real; 3]); 3] = [
        ("recess A", [0.0, -0.7, -0.3]),
        ("recess B", [-0.3, -0.6, -0.3]),
        ("recess C", [0.3, -0.6, -0.3]),
    ];

    /// (name, position, rotation as fractions of π) of each raised button
    pub const BUTTONS: [(&str, [Real; 3], [Real; 3]); 3] = [
        ("button A", [0.0, -0.71, -0.31], [-0.15, 0.0, 0.0]),
        ("button B", [-0.3, -0.61, -0.31], [-0.1, 0.1, 0.0]),
        ("button C", [0.3, -0.61, -0.31], [-0.1, -0.1, 0.0]),
    ];

    /// The two diamond-shaped screen insets, larger first
    pub fn insets(params: &ShapeParameters, material: &Material) -> Vec<StepConfig> {
        vec![
            StepConfig {
                name: "inset".into(),
                op: BoolOp::Subtract,
                primitive: PrimitiveSpec::tapered_cylinder(
                    params.inset_radius_top,
                    params.inset_radius_bottom,
                    params.inset_height,
                    INSET_SEGMENTS,
                ),
                placement: Placement::at(
                    params.inset_position_x,
                    params.inset_position_y,
                    params.inset_position_z,
                )
                .rotated(-PI * 0.5, PI * 0.25, 0.0),
                material: material.clone(),
            },
            StepConfig {
                name: "inset 2".into(),
                op: BoolOp::Subtract,
                primitive: PrimitiveSpec::tapered_cylinder(
                    params.inset2_radius_top,
                    params.inset2_radius_bottom,
                    params.inset2_height,
                    INSET_SEGMENTS,
                ),
                placement: Placement::at(
                    params.inset2_position_x,
                    params.inset2_position_y,
                    params.inset2_position_z,
                )
                .rotated(-PI * 0.5, PI * 0.05, 0.0)
                .uniform_scale(INSET2_SCALE),
                material: material.clone(),
            },
        ]
    }

    pub fn button_recesses(material: &Material) -> Vec<StepConfig> {
        RECESSES
            .iter()
            .map(|&(name, [x, y, z])| StepConfig {
                name: name.into(),
                op: BoolOp::Subtract,
                primitive: PrimitiveSpec::sphere(RECESS_RADIUS),
                placement: Placement::at(x, y, z),
                material: material.clone(),
            })
            .collect()
    }

    pub fn buttons(material: &Material) -> Vec<StepConfig> {
        BUTTONS
            .iter()
            .map(|&(name, [x, y, z], [rx, ry, rz])| StepConfig {
                name: name.into(),
                op: BoolOp::Union,
                primitive: PrimitiveSpec::sphere(BUTTON_RADIUS),
                placement: Placement::at(x, y, z)
                    .rotated(PI * rx, PI * ry, PI * rz)
                    .scaled(1.0, 1.0, BUTTON_DEPTH_SCALE),
                material: material.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_order_of_full_variant() {
        let config = DeviceConfig::from_params(&ShapeParameters::default(), Variant::Buttons);
        let names: Vec<&str> = config.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "inset", "inset 2", "recess A", "recess B", "recess C", "button A", "button B",
                "button C"
            ]
        );
        let ops: Vec<BoolOp> = config.steps.iter().map(|s| s.op).collect();
        assert_eq!(&ops[..5], &[BoolOp::Subtract; 5]);
        assert_eq!(&ops[5..], &[BoolOp::Union; 3]);
    }

    #[test]
    fn simple_variant_has_only_insets() {
        let config = DeviceConfig::from_params(&ShapeParameters::default(), Variant::Simple);
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.body.segments, 32);
    }

    #[test]
    fn high_detail_resolution() {
        let config = DeviceConfig::from_params(&ShapeParameters::default(), Variant::HighDetail);
        assert_eq!(config.body.segments, 100);
        assert_eq!(config.profile.resolution.sample_count(), 91);
        assert!(config.body.material.is_lit());
    }

    #[test]
    fn body_is_squashed_by_device_scale() {
        let params = ShapeParameters::default();
        let config = DeviceConfig::from_params(&params, Variant::Simple);
        assert_eq!(config.body.placement.scale.x, params.device_scale_x);
        assert_eq!(config.body.placement.scale.y, 1.0);
        assert_eq!(config.body.placement.scale.z, params.device_scale_z);
    }

    #[test]
    fn second_inset_scale_is_uniform() {
        let steps = presets::insets(&ShapeParameters::default(), &Material::basic(0));
        let scale = steps[1].placement.scale;
        assert_eq!(scale.x, 0.8);
        assert_eq!(scale.y, 0.8);
        assert_eq!(scale.z, 0.8);
    }

    #[test]
    fn variant_names() {
        assert_eq!("simple".parse::<Variant>().unwrap(), Variant::Simple);
        assert_eq!("High_Detail".parse::<Variant>().unwrap(), Variant::HighDetail);
        assert_eq!("highdetail".parse::<Variant>().unwrap(), Variant::HighDetail);
        assert!(matches!(
            "deluxe".parse::<Variant>(),
            Err(DeviceError::UnknownVariant(_))
        ));
    }

    #[test]
    fn config_json_round_trip() {
        let config = DeviceConfig::from_params(&ShapeParameters::default(), Variant::Buttons);
        let json = config.to_json_pretty().unwrap();
        assert_eq!(DeviceConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(
            DeviceConfig::from_json("{\"profile\": 3}"),
            Err(DeviceError::Config(_))
        ));
        assert!(matches!(
            DeviceConfig::load("/nonexistent/device.json"),
            Err(DeviceError::Io { .. })
        ));
    }
}
