// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — command line front end.
//
// Entry point. Initialises logging, builds the scanner configuration from a
// file and flags, then scans each input image and writes the result as PNG.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::human_errors::{humanize_error, no_document_found};
use scanwerk_core::{BoundingBox, CornerOrdering, OutputSize, ScanConfig};
use scanwerk_document::{DocumentScanner, Frame, ScanMethod, ScanOutcome, draw_detection};

/// Corner ordering strategy as spelled on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Ordering {
    VerticalSplit,
    Clockwise,
}

impl From<Ordering> for CornerOrdering {
    fn from(o: Ordering) -> Self {
        match o {
            Ordering::VerticalSplit => CornerOrdering::VerticalSplit,
            Ordering::Clockwise => CornerOrdering::Clockwise,
        }
    }
}

/// Detect the document in each photo and write an upright scan of it.
#[derive(Parser, Debug)]
#[command(name = "scanwerk", version, about)]
struct Cli {
    /// Input images.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Directory for the scanned PNGs.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON scanner configuration. Flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Corner ordering strategy.
    #[arg(long, value_enum)]
    ordering: Option<Ordering>,

    /// Fixed output size, e.g. 1240x1754.
    #[arg(long, value_parser = parse_size, conflicts_with = "fit")]
    size: Option<(u32, u32)>,

    /// Size the output to the document instead of the input frame.
    #[arg(long)]
    fit: bool,

    /// Only search this region, given as x,y,width,height.
    #[arg(long, value_parser = parse_region)]
    region: Option<BoundingBox>,

    /// Also write `<name>-overlay.png` showing the detected outline.
    #[arg(long)]
    overlay: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("size must be non-zero".into());
    }
    Ok((w, h))
}

fn parse_region(s: &str) -> std::result::Result<BoundingBox, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<std::result::Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] if *w > 0 && *h > 0 => Ok(BoundingBox::new(*x, *y, *w, *h)),
        _ => Err(format!("expected x,y,width,height with non-zero size, got {s:?}")),
    }
}

fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if let Some(ordering) = cli.ordering {
        config.corner_ordering = ordering.into();
    }
    if let Some((width, height)) = cli.size {
        config.output_size = OutputSize::Fixed { width, height };
    } else if cli.fit {
        config.output_size = OutputSize::FromCorners;
    }
    config.validate()?;
    Ok(config)
}

fn output_path(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".into());
    dir.join(format!("{stem}-{suffix}.png"))
}

fn load_frame(path: &Path) -> Result<Frame> {
    let image = image::open(path)
        .map_err(|e| ScanError::Image(format!("{}: {e}", path.display())))?;
    Ok(Frame::from_dynamic(image))
}

/// Scan one image. Returns `false` when no document was found.
fn scan_one(scanner: &DocumentScanner, cli: &Cli, input: &Path) -> Result<bool> {
    let frame = load_frame(input)?;

    // One detection pass feeds both the overlay and the scan.
    let detection = scanner.detect_in_region(&frame, cli.region)?;
    if cli.overlay {
        if let Some(detection) = &detection {
            let path = output_path(&cli.output_dir, input, "overlay");
            draw_detection(&frame, detection)
                .save(&path)
                .map_err(|e| ScanError::Image(format!("{}: {e}", path.display())))?;
        }
    }

    match scanner.scan_detection(&frame, detection.as_ref())? {
        ScanOutcome::Document(doc) => {
            let path = output_path(&cli.output_dir, input, "scan");
            doc.image
                .save(&path)
                .map_err(|e| ScanError::Image(format!("{}: {e}", path.display())))?;
            let method = match &doc.method {
                ScanMethod::Perspective => "perspective".to_string(),
                ScanMethod::BoundingBoxCrop(reason) => format!("crop ({reason:?})"),
            };
            tracing::info!(input = %input.display(), output = %path.display(), %method, "Scan written");
            println!("{} -> {} [{method}]", input.display(), path.display());
            Ok(true)
        }
        ScanOutcome::NoDocumentFound => {
            let human = no_document_found();
            println!("{}: {} {}", input.display(), human.message, human.suggestion);
            Ok(false)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = build_config(cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(true);
    }

    std::fs::create_dir_all(&cli.output_dir)?;
    let scanner = DocumentScanner::new(config)?;

    let mut all_found = true;
    for input in &cli.images {
        all_found &= scan_one(&scanner, cli, input)?;
    }
    Ok(all_found)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(images = cli.images.len(), "Scanwerk starting");

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!(error = %e, "scan failed");
            let human = humanize_error(&e);
            eprintln!("{} {}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}
