//! eggdevice - build the parametric handheld device headlessly and report on it

use anyhow::{Context, Result};
use clap::Parser;
use eggdevice::AssembledSolid;
use eggdevice::device::{DeviceConfig, Variant, build_device};
use eggdevice::float_types::{Real, set_tolerance};
use eggdevice::params::{ParamValue, ShapeParameters, helpers_from_fragment, parse_assignment};
use eggdevice::scene::{DeviceEditor, HeadlessScene, SceneComposer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eggdevice")]
#[command(about = "Build the egg-shaped handheld device and print a summary")]
#[command(version)]
struct Cli {
    /// Stock variant: simple, buttons or high-detail
    #[arg(short, long, default_value = "buttons")]
    variant: Variant,

    /// Build from a device config JSON file instead of a stock variant
    #[arg(short, long, conflicts_with_all = ["variant", "params", "set"])]
    config: Option<PathBuf>,

    /// Shape parameters JSON file
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Panel edit, applied in order (e.g. --set eggGirth=0.9)
    #[arg(short, long = "set", value_parser = parse_assignment)]
    set: Vec<(String, ParamValue)>,

    /// Extra full rebuilds after the edits
    #[arg(short, long, default_value_t = 0)]
    rebuilds: usize,

    /// URL fragment seeding helper visibility (`#debug` shows them)
    #[arg(long)]
    fragment: Option<String>,

    /// Plane classification tolerance
    #[arg(long)]
    tolerance: Option<Real>,

    /// Print the resolved device config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(tolerance) = cli.tolerance {
        set_tolerance(tolerance);
    }

    if let Some(path) = &cli.config {
        let config = DeviceConfig::load(path)
            .with_context(|| format!("loading device config {}", path.display()))?;
        if cli.dump_config {
            println!("{}", config.to_json_pretty()?);
            return Ok(());
        }
        let solid = build_device(&config);
        let mut scene = HeadlessScene::default();
        scene.register_solid(&solid);
        report(&solid, &scene);
        return Ok(());
    }

    let mut params = match &cli.params {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<ShapeParameters>(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        },
        None => ShapeParameters::default(),
    };
    if let Some(fragment) = &cli.fragment {
        params.helpers = helpers_from_fragment(fragment);
    }

    if cli.dump_config {
        let mut preview = params.clone();
        for (name, value) in &cli.set {
            eggdevice::params::apply_change(&mut preview, name, *value)?;
        }
        let config = DeviceConfig::from_params(&preview, cli.variant);
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut editor = DeviceEditor::new(HeadlessScene::default(), cli.variant, params);
    for (name, value) in &cli.set {
        let change = editor.on_parameter_changed(name, *value)?;
        tracing::info!(name = %change.name, value = %change.value, "parameter changed");
    }
    for _ in 0..cli.rebuilds {
        editor.rebuild();
    }

    if let Some(solid) = editor.current_solid() {
        report(solid, editor.scene());
    }
    Ok(())
}

fn report(solid: &AssembledSolid, scene: &HeadlessScene) {
    let bb = solid.bounding_box();
    println!("steps:      {}", solid.steps);
    println!("polygons:   {}", solid.mesh.polygons.len());
    println!("vertices:   {}", solid.vertex_count());
    println!("triangles:  {}", solid.mesh.triangle_count());
    println!(
        "bounds:     ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z
    );
    println!("volume:     {:.4}", solid.mesh.volume());
    println!("area:       {:.4}", solid.mesh.surface_area());
    for material in solid.materials() {
        println!("material:   {material:?}");
    }
    println!(
        "scene:      {} live ({} bytes), {} released, helpers {}",
        scene.live_count(),
        scene.live_bytes(),
        scene.released_count(),
        if scene.helpers.visible { "shown" } else { "hidden" },
    );
}
