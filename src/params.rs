//! Shape knobs and the parameter panel model.
//!
//! [`ShapeParameters`] is the single current snapshot of every knob. The panel declares a
//! `{min, max, step}` range per knob and clamps writes into it; the build pipeline itself
//! never validates anything.

use crate::errors::DeviceError;
use crate::float_types::Real;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeParameters {
    /// Show the axes and grid overlays
    pub helpers: bool,

    pub egg_girth: Real,
    pub egg_apex: Real,

    pub inset_radius_top: Real,
    pub inset_radius_bottom: Real,
    pub inset_height: Real,
    pub inset_position_x: Real,
    pub inset_position_y: Real,
    pub inset_position_z: Real,

    pub inset2_radius_top: Real,
    pub inset2_radius_bottom: Real,
    pub inset2_height: Real,
    pub inset2_position_x: Real,
    pub inset2_position_y: Real,
    pub inset2_position_z: Real,

    pub device_scale_x: Real,
    pub device_scale_z: Real,

    /// Depth of the black screen plane, a scene-only knob
    pub screen_position_z: Real,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        ShapeParameters {
            helpers: true,
            egg_girth: 0.8,
            egg_apex: 0.15,
            inset_radius_top: 1.0,
            inset_radius_bottom: 0.5,
            inset_height: 0.5,
            inset_position_x: 0.0,
            inset_position_y: 0.0,
            inset_position_z: -0.5,
            inset2_radius_top: 1.0,
            inset2_radius_bottom: 0.4,
            inset2_height: 0.3,
            inset2_position_x: 0.02,
            inset2_position_y: 0.04,
            inset2_position_z: -0.37,
            device_scale_x: 1.0,
            device_scale_z: 0.5,
            screen_position_z: -0.251,
        }
    }
}

/// Panel name to field mapping for the numeric knobs
macro_rules! numeric_knobs {
    ($($name:literal => $field:ident),* $(,)?) => {
        impl ShapeParameters {
            fn number(&self, name: &str) -> Option<Real> {
                match name {
                    $($name => Some(self.$field),)*
                    _ => None,
                }
            }

            fn number_mut(&mut self, name: &str) -> Option<&mut Real> {
                match name {
                    $($name => Some(&mut self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

numeric_knobs! {
    "eggGirth" => egg_girth,
    "eggApex" => egg_apex,
    "insetRadiusTop" => inset_radius_top,
    "insetRadiusBottom" => inset_radius_bottom,
    "insetHeight" => inset_height,
    "insetPositionX" => inset_position_x,
    "insetPositionY" => inset_position_y,
    "insetPositionZ" => inset_position_z,
    "inset2RadiusTop" => inset2_radius_top,
    "inset2RadiusBottom" => inset2_radius_bottom,
    "inset2Height" => inset2_height,
    "inset2PositionX" => inset2_position_x,
    "inset2PositionY" => inset2_position_y,
    "inset2PositionZ" => inset2_position_z,
    "deviceScaleX" => device_scale_x,
    "deviceScaleZ" => device_scale_z,
    "screenPositionZ" => screen_position_z,
}

impl ShapeParameters {
    /// Current value of a knob by its panel name
    pub fn get(&self, name: &str) -> Result<ParamValue, DeviceError> {
        if name == HELPERS {
            return Ok(ParamValue::Flag(self.helpers));
        }
        self.number(name)
            .map(ParamValue::Number)
            .ok_or_else(|| DeviceError::UnknownParameter(name.to_string()))
    }
}

/// Name of the overlay toggle
pub const HELPERS: &str = "helpers";

/// What a knob change requires of the editor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Regenerate the assembled solid
    Rebuild,
    /// Only a scene object moves or toggles
    SceneOnly,
}

/// Declared range of one numeric control
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub min: Real,
    pub max: Real,
    pub step: Real,
    pub effect: Effect,
}

impl ParameterSpec {
    const fn rebuild(name: &'static str, min: Real, max: Real, step: Real) -> Self {
        ParameterSpec {
            name,
            min,
            max,
            step,
            effect: Effect::Rebuild,
        }
    }

    pub fn clamp(&self, value: Real) -> Real {
        value.clamp(self.min, self.max)
    }
}

/// Every numeric control, in panel order
pub static PARAMETERS: [ParameterSpec; 17] = [
    ParameterSpec::rebuild("eggGirth", 0.0, 2.0, 0.001),
    ParameterSpec::rebuild("eggApex", 0.0, 2.0, 0.001),
    ParameterSpec::rebuild("insetRadiusTop", 0.0, 10.0, 0.01),
    ParameterSpec::rebuild("insetRadiusBottom", 0.0, 10.0, 0.01),
    ParameterSpec::rebuild("insetHeight", 0.0, 10.0, 0.01),
    ParameterSpec::rebuild("insetPositionX", -5.0, 5.0, 0.01),
    ParameterSpec::rebuild("insetPositionY", -5.0, 5.0, 0.01),
    ParameterSpec::rebuild("insetPositionZ", -5.0, 5.0, 0.01),
    ParameterSpec::rebuild("inset2RadiusTop", 0.0, 10.0, 0.01),
    ParameterSpec::rebuild("inset2RadiusBottom", 0.0, 10.0, 0.01),
    ParameterSpec::rebuild("inset2Height", 0.0, 10.0, 0.01),
    ParameterSpec::rebuild("inset2PositionX", -5.0, 5.0, 0.01),
    ParameterSpec::rebuild("inset2PositionY", -5.0, 5.0, 0.01),
    ParameterSpec::rebuild("inset2PositionZ", -5.0, 5.0, 0.01),
    ParameterSpec::rebuild("deviceScaleX", 0.0, 2.0, 0.001),
    ParameterSpec::rebuild("deviceScaleZ", 0.0, 2.0, 0.001),
    ParameterSpec {
        name: "screenPositionZ",
        min: -1.0,
        max: 1.0,
        step: 0.001,
        effect: Effect::SceneOnly,
    },
];

pub fn parameter_spec(name: &str) -> Option<&'static ParameterSpec> {
    PARAMETERS.iter().find(|spec| spec.name == name)
}

/// A value written through the panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Number(Real),
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Result of a panel write
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterChange {
    pub name: String,
    /// Value actually stored, after clamping
    pub value: ParamValue,
    pub effect: Effect,
}

/// Write `value` to the knob `name`, clamped to its declared range.
pub fn apply_change(
    params: &mut ShapeParameters,
    name: &str,
    value: ParamValue,
) -> Result<ParameterChange, DeviceError> {
    if name == HELPERS {
        let ParamValue::Flag(visible) = value else {
            return Err(DeviceError::WrongKind {
                name: name.to_string(),
                expected: "boolean",
            });
        };
        params.helpers = visible;
        return Ok(ParameterChange {
            name: name.to_string(),
            value,
            effect: Effect::SceneOnly,
        });
    }

    let spec =
        parameter_spec(name).ok_or_else(|| DeviceError::UnknownParameter(name.to_string()))?;
    let ParamValue::Number(raw) = value else {
        return Err(DeviceError::WrongKind {
            name: name.to_string(),
            expected: "numeric",
        });
    };
    if raw.is_nan() {
        return Err(DeviceError::MalformedAssignment(format!("{name}={raw}")));
    }

    let clamped = spec.clamp(raw);
    if clamped != raw {
        tracing::debug!(name, raw, clamped, "clamped parameter to panel range");
    }
    if let Some(slot) = params.number_mut(name) {
        *slot = clamped;
    }

    Ok(ParameterChange {
        name: name.to_string(),
        value: ParamValue::Number(clamped),
        effect: spec.effect,
    })
}

/// Parse a `name=value` assignment. `true`/`false` parse as flags, everything else as a
/// number.
pub fn parse_assignment(text: &str) -> Result<(String, ParamValue), DeviceError> {
    let malformed = || DeviceError::MalformedAssignment(text.to_string());
    let (name, value) = text.split_once('=').ok_or_else(malformed)?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() {
        return Err(malformed());
    }

    let value = match value {
        "true" => ParamValue::Flag(true),
        "false" => ParamValue::Flag(false),
        v => ParamValue::Number(v.parse::<Real>().map_err(|_| malformed())?),
    };
    Ok((name.to_string(), value))
}

/// Overlay visibility seeded from a URL fragment: shown only for `#debug`.
pub fn helpers_from_fragment(fragment: &str) -> bool {
    fragment.strip_prefix('#').unwrap_or(fragment) == "debug"
}
