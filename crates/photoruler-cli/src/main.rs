use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use image::DynamicImage;
use log::{debug, LevelFilter};
use photoruler::pipeline::{AngleSpec, InterpolationKind, ProjectiveWarper, RectifyOptions, Rectifier};
use photoruler::prelude::{CameraCatalog, Known, Measurement, MeasurementResult, Polygon};
use serde::Serialize;

/// Measure lengths and distances in photographs.
#[derive(Debug, Parser)]
#[command(author, version, about = "Photo ruler: lengths, distances and rectification")]
struct Args {
    /// JSON camera catalog. Its entries are added to the built-in presets.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log debug output unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the known cameras and their calibration.
    Cameras,
    /// Distance to an object of known real length.
    Distance {
        #[command(flatten)]
        span: SpanArgs,
        /// Real length of the object in cm.
        #[arg(long)]
        real_cm: f64,
    },
    /// Real length of an object at a known distance.
    Length {
        #[command(flatten)]
        span: SpanArgs,
        /// Distance from the lens to the object in cm.
        #[arg(long)]
        distance_cm: f64,
    },
    /// Warp a quadrilateral region into a rectangle.
    Rectify(RectifyArgs),
}

#[derive(Debug, clap::Args)]
struct SpanArgs {
    /// Camera name from the catalog.
    #[arg(long)]
    camera: String,
    /// Pixel length of the object in the image.
    #[arg(long)]
    length_px: f64,
    /// Viewing angle in degrees, 0 = fronto-parallel. Omit to skip correction.
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<f64>,
    /// Pixel row of the object's top edge.
    #[arg(long, default_value_t = 0.0)]
    y1: f64,
}

#[derive(Debug, clap::Args)]
struct RectifyArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// The four corners as `x,y`.
    #[arg(long, num_args = 4, required = true, value_parser = parse_point)]
    points: Vec<[f64; 2]>,
    /// Canvas width; defaults to the rectified region's size.
    #[arg(long, requires = "height")]
    width: Option<u32>,
    #[arg(long, requires = "width")]
    height: Option<u32>,
    #[arg(long, allow_hyphen_values = true)]
    angle_x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    angle_y: Option<f64>,
    /// Margin fraction around the region when a canvas size is given.
    #[arg(long, default_value_t = 0.0)]
    pad: f64,
    #[arg(long, value_enum, default_value_t = Interp::Bilinear)]
    interpolation: Interp,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Interp {
    Nearest,
    Bilinear,
    Bicubic,
}

impl From<Interp> for InterpolationKind {
    fn from(value: Interp) -> Self {
        match value {
            Interp::Nearest => InterpolationKind::Nearest,
            Interp::Bilinear => InterpolationKind::Bilinear,
            Interp::Bicubic => InterpolationKind::Bicubic,
        }
    }
}

#[derive(Debug, Serialize)]
struct MeasurementReport<'a> {
    camera: &'a str,
    #[serde(flatten)]
    result: MeasurementResult,
}

#[derive(Debug, Serialize)]
struct RectifyReport<'a> {
    output: &'a Path,
    output_size: [u32; 2],
    transform: [[f64; 3]; 3],
    output_polygon: Polygon,
}

fn parse_point(s: &str) -> Result<[f64; 2], String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok([parse(x)?, parse(y)?])
}

fn load_catalog(path: Option<&Path>) -> Result<CameraCatalog> {
    let mut catalog = CameraCatalog::with_reference_presets();
    if let Some(path) = path {
        catalog.extend(CameraCatalog::from_path(path)?);
    }
    Ok(catalog)
}

fn run_measure(catalog: &CameraCatalog, span: &SpanArgs, known: Known) -> Result<String> {
    let ruler = catalog.ruler(&span.camera)?;
    let request = Measurement {
        length_px: span.length_px,
        known,
        angle_degrees: span.angle,
        y1_px: span.y1,
    };
    debug!("measuring {:?} with {}", request, span.camera);
    let result = ruler
        .measure(&request)
        .with_context(|| format!("measuring with camera {:?}", span.camera))?;
    Ok(serde_json::to_string_pretty(&MeasurementReport {
        camera: &span.camera,
        result,
    })?)
}

fn run_rectify(args: &RectifyArgs) -> Result<String> {
    let image = image::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .to_rgba8();
    let corners = Polygon::from_rows(&args.points)?;
    let opts = RectifyOptions {
        output_shape: args.width.zip(args.height).map(|(w, h)| [w, h]),
        angle: AngleSpec::PerAxis {
            x: args.angle_x,
            y: args.angle_y,
        },
        pad: args.pad,
    };
    let rectifier = Rectifier::new(ProjectiveWarper {
        interpolation: args.interpolation.into(),
        ..Default::default()
    });
    let rectified = rectifier.rectify(&image, &corners, &opts)?;

    let is_jpeg = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let out = DynamicImage::ImageRgba8(rectified.image);
    let out = if is_jpeg { DynamicImage::ImageRgb8(out.to_rgb8()) } else { out };
    out.save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let t = &rectified.transform;
    let transform = [0, 1, 2].map(|r| [t[(r, 0)], t[(r, 1)], t[(r, 2)]]);
    Ok(serde_json::to_string_pretty(&RectifyReport {
        output: &args.output,
        output_size: rectified.output_size,
        transform,
        output_polygon: rectified.output_polygon,
    })?)
}

fn run(args: &Args) -> Result<String> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    match &args.command {
        Command::Cameras => Ok(catalog.to_json()?),
        Command::Distance { span, real_cm } => run_measure(&catalog, span, Known::RealLength(*real_cm)),
        Command::Length { span, distance_cm } => run_measure(&catalog, span, Known::Distance(*distance_cm)),
        Command::Rectify(rectify) => run_rectify(rectify),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(err) = try_main(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main(args: &Args) -> Result<()> {
    let json = run(args)?;
    println!("{}", json);
    Ok(())
}
