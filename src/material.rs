//! Material tags carried as face metadata.
//!
//! The boolean evaluator keeps each polygon's metadata through splits, so after assembly
//! every face still knows which primitive's material it was cut from. A renderer groups
//! faces by tag (see [`Mesh::to_buffers`](crate::mesh::Mesh::to_buffers)).

use crate::float_types::Real;
use serde::{Deserialize, Serialize};

/// Packed `0xRRGGBB` colour
pub type Color = u32;

pub const BLACK: Color = 0x000000;
pub const WHITE: Color = 0xffffff;
/// Viewport clear colour
pub const CLEAR_COLOR: Color = 0x888888;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Material {
    /// Normal-to-colour lookup in a prebaked lighting image, no scene lights needed
    Matcap { texture: String },
    /// Unlit flat colour
    Basic { color: Color },
    /// Lit material for the high detail variant
    Standard {
        color: Color,
        roughness: Real,
        metalness: Real,
    },
}

impl Material {
    pub fn matcap(texture: impl Into<String>) -> Self {
        Material::Matcap {
            texture: texture.into(),
        }
    }

    pub const fn basic(color: Color) -> Self {
        Material::Basic { color }
    }

    pub const fn standard(color: Color, roughness: Real, metalness: Real) -> Self {
        Material::Standard {
            color,
            roughness,
            metalness,
        }
    }

    /// Texture asset this material needs loaded, if any
    pub fn texture(&self) -> Option<&str> {
        match self {
            Material::Matcap { texture } => Some(texture.as_str()),
            _ => None,
        }
    }

    /// Whether shading depends on scene lights
    pub const fn is_lit(&self) -> bool {
        matches!(self, Material::Standard { .. })
    }
}

/// The material set a device variant is drawn with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPreset {
    /// Egg body
    pub body: Material,
    /// Insets and raised buttons
    pub trim: Material,
    /// Walls of the button recesses
    pub recess: Material,
}

impl MaterialPreset {
    pub const EGG_MATCAP: &'static str = "./matcaps/matcap1.png";
    pub const INSET_MATCAP: &'static str = "./matcaps/matcap2.png";

    /// Two matcap images plus black recesses
    pub fn matcap() -> Self {
        MaterialPreset {
            body: Material::matcap(Self::EGG_MATCAP),
            trim: Material::matcap(Self::INSET_MATCAP),
            recess: Material::basic(BLACK),
        }
    }

    /// Lit materials, no texture assets
    pub fn standard() -> Self {
        MaterialPreset {
            body: Material::standard(0xf2efe6, 0.45, 0.0),
            trim: Material::standard(0x3a3f47, 0.3, 0.2),
            recess: Material::basic(BLACK),
        }
    }

    /// Distinct texture assets needed by this preset
    pub fn textures(&self) -> Vec<&str> {
        let mut textures: Vec<&str> = [&self.body, &self.trim, &self.recess]
            .into_iter()
            .filter_map(Material::texture)
            .collect();
        textures.dedup();
        textures
    }
}

impl Default for MaterialPreset {
    fn default() -> Self {
        Self::matcap()
    }
}
