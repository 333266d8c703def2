// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! hullslice CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hullslice::cli::{parse_region, parse_vector3, Reporter};
use hullslice::geometry::{analyze, Primitive};
use hullslice::{io, Plane, SliceConfig, Slicer, TextureRegion};
use nalgebra::{Point3, Vector3};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hullslice")]
#[command(about = "Slice triangle meshes into capped upper and lower hulls", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a mesh by a plane
    Slice {
        /// Input mesh (.stl or .json)
        input: PathBuf,

        /// Plane normal as x,y,z (need not be unit length)
        #[arg(short, long, value_parser = parse_vector3, allow_hyphen_values = true)]
        normal: Vector3<f64>,

        /// Signed distance of the plane from the origin along the normal
        #[arg(short, long, conflicts_with = "point", allow_hyphen_values = true)]
        distance: Option<f64>,

        /// A point on the plane as x,y,z
        #[arg(short, long, value_parser = parse_vector3, allow_hyphen_values = true)]
        point: Option<Vector3<f64>>,

        /// Output file for the upper hull (.stl, .json, .glb or .gltf)
        #[arg(long)]
        upper: PathBuf,

        /// Output file for the lower hull
        #[arg(long)]
        lower: PathBuf,

        /// Cross-section texture region as start_u,start_v,end_u,end_v
        #[arg(long, value_parser = parse_region)]
        region: Option<TextureRegion>,

        /// Submesh range that receives the cross-section
        #[arg(long)]
        cross_index: Option<usize>,

        /// Split submeshes in parallel
        #[arg(long)]
        parallel: bool,

        /// Config file (defaults to ./hullslice.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print statistics for a mesh
    Inspect {
        /// Input mesh (.stl or .json)
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a primitive mesh
    Primitive {
        shape: Shape,

        /// Output file (.stl, .json, .glb or .gltf)
        #[arg(short, long)]
        output: PathBuf,

        /// Cube edge length or sphere diameter
        #[arg(short, long, default_value = "1.0")]
        size: f64,

        /// Sphere segments around the equator
        #[arg(long, default_value = "32")]
        segments: u32,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Cube,
    Sphere,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Slice {
            input,
            normal,
            distance,
            point,
            upper,
            lower,
            region,
            cross_index,
            parallel,
            config,
        } => {
            let plane = match (distance, point) {
                (_, Some(point)) => Plane::try_from_point_direction(&Point3::from(point), normal)?,
                (distance, None) => Plane::try_from_vector(normal, distance.unwrap_or(0.0))?,
            };

            let mut slice_config = match config {
                Some(path) => SliceConfig::from_file(path)?,
                None => SliceConfig::load()?,
            };
            if let Some(region) = region {
                slice_config.cross_section_region = region;
            }
            if cross_index.is_some() {
                slice_config.cross_section_index = cross_index;
            }
            slice_config.parallel |= parallel;

            slice_command(&input, &plane, slice_config, &upper, &lower)
        }
        Commands::Inspect { input, json } => inspect_command(&input, json),
        Commands::Primitive {
            shape,
            output,
            size,
            segments,
        } => primitive_command(shape, &output, size, segments),
        Commands::Version => {
            println!("hullslice v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(err) = &result {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = filter::Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("hullslice", level);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn slice_command(
    input: &Path,
    plane: &Plane,
    config: SliceConfig,
    upper: &Path,
    lower: &Path,
) -> Result<()> {
    let mesh = io::load_mesh(input)?;

    let start = Instant::now();
    let hull = Slicer::new(config)
        .slice_by_plane(&mesh, plane)
        .with_context(|| format!("Cannot slice {:?}", input))?;
    let duration = start.elapsed();

    let Some(hull) = hull else {
        bail!("The plane does not intersect {:?}", input);
    };

    let file = input.display().to_string();
    Reporter::report_slice(&file, &hull, duration);
    if hull.cap_submesh().is_none() {
        Reporter::report_warning("Cross-section could not be triangulated");
    }

    let (upper_mesh, lower_mesh) = hull.into_parts();
    io::save_mesh(&upper_mesh, upper)?;
    io::save_mesh(&lower_mesh, lower)?;

    Reporter::success(&format!(
        "Wrote {} and {}",
        upper.display(),
        lower.display()
    ));
    Ok(())
}

fn inspect_command(input: &Path, json: bool) -> Result<()> {
    let mesh = io::load_mesh(input)?;
    let stats = analyze(&mesh);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        Reporter::report_stats(&input.display().to_string(), &stats);
    }
    Ok(())
}

fn primitive_command(shape: Shape, output: &Path, size: f64, segments: u32) -> Result<()> {
    if !(size.is_finite() && size > 0.0) {
        bail!("Size must be a positive number, got {}", size);
    }

    let primitive = match shape {
        Shape::Cube => Primitive::cube(size),
        Shape::Sphere => Primitive::sphere(size / 2.0, segments),
    };

    let mesh = primitive.to_mesh();
    io::save_mesh(&mesh, output)?;

    Reporter::success(&format!(
        "Wrote {} triangles to {}",
        mesh.triangle_count(),
        output.display()
    ));
    Ok(())
}
