//! A parametric **egg-shaped handheld device**, built by revolving an egg silhouette into a
//! body and carving insets and button recesses out of it with **Constructive Solid
//! Geometry (CSG)** on polygons stored in [BSP](mesh::bsp) trees.
//!
//! The pipeline is
//! [`profile`] → [`primitive`] → [`placement`] → [`assembly`], driven by a
//! [`device::DeviceConfig`]. [`scene::DeviceEditor`] rebuilds the device whenever a knob
//! changes and hands the result to a [`scene::SceneComposer`].
//!
//! ```no_run
//! use eggdevice::{ShapeParameters, build_solid};
//!
//! let solid = build_solid(&ShapeParameters::default());
//! println!("{} vertices", solid.vertex_count());
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **hashmap**: enables use of hashbrown for `is_manifold`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod traits;

pub mod assembly;
pub mod device;
pub mod material;
pub mod params;
pub mod placement;
pub mod primitive;
pub mod profile;
pub mod scene;
pub mod viewport;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use assembly::{AssembledSolid, BoolOp, Operation, assemble};
pub use device::{DeviceConfig, Variant, build_device, build_solid};
pub use errors::{DeviceError, ValidationError};
pub use material::Material;
pub use mesh::Mesh;
pub use params::{ParamValue, ShapeParameters};
pub use placement::Placement;
pub use primitive::{PlacedPrimitive, Primitive, PrimitiveSpec};
pub use profile::{Profile, ProfileResolution};
pub use scene::{DeviceEditor, HeadlessScene, SceneComposer};
pub use traits::CSG;
