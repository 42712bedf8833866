//! # CLI Module
//!
//! Command-line interface for img-hasher.
//!
//! ## Usage
//! ```bash
//! # Grayscale dHash of one or more images
//! img-hash hash photo.jpg other.png
//!
//! # Per-channel hashes as JSON
//! img-hash hash photo.jpg --rgb --output json
//!
//! # Distance between an image and another image or a stored hash
//! img-hash compare photo.jpg 9114861776524122264
//!
//! # Per-channel distances between two images
//! img-hash compare photo.jpg edited.png --rgb
//!
//! # Group near-duplicates in a directory tree
//! img-hash scan ~/Photos --threshold 5
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use img_hasher::core::comparator::{CompareOperand, MatchType};
use img_hasher::core::hasher::{
    Channel, DifferenceHasher, FastDecoder, HashedImage, HasherConfig, ImageHash,
    ResampleFilter,
};
use img_hasher::core::pipeline::{hash_files, HashFailure, Pipeline, PipelineResult};
use img_hasher::core::scanner::ScanConfig;
use img_hasher::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// img-hash - perceptual difference hashes for images
#[derive(Parser, Debug)]
#[command(name = "img-hash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the dHash of each image
    Hash {
        /// Images to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Hash the red, green and blue channels separately
        #[arg(long)]
        rgb: bool,

        /// Resampling filter
        #[arg(short, long, default_value = "area")]
        filter: Filter,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Hamming distance between an image and another image or hash
    Compare {
        /// Reference image
        image: PathBuf,

        /// Image path, or a hash (decimal or 0x-prefixed hex)
        other: String,

        /// Report red, green and blue distances separately (OTHER must be an image)
        #[arg(long)]
        rgb: bool,

        /// Resampling filter
        #[arg(short, long, default_value = "area")]
        filter: Filter,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Scan directories and group near-duplicate images
    Scan {
        /// Directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Maximum Hamming distance for a near-duplicate (0-64)
        #[arg(short, long, default_value = "8")]
        threshold: u32,

        /// Resampling filter
        #[arg(short, long, default_value = "area")]
        filter: Filter,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// List files that could not be hashed
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    /// Box / area averaging (default)
    Area,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl From<Filter> for ResampleFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Area => ResampleFilter::Area,
            Filter::Bilinear => ResampleFilter::Bilinear,
            Filter::CatmullRom => ResampleFilter::CatmullRom,
            Filter::Lanczos3 => ResampleFilter::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (values only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            files,
            rgb,
            filter,
            output,
        } => run_hash(files, rgb, filter.into(), output),
        Commands::Compare {
            image,
            other,
            rgb,
            filter,
            output,
        } => {
            if rgb {
                run_compare_channels(image, &other, filter.into(), output)
            } else {
                run_compare(image, &other, filter.into(), output)
            }
        }
        Commands::Scan {
            paths,
            threshold,
            filter,
            include_hidden,
            max_depth,
            output,
            verbose,
        } => {
            let scan_config = ScanConfig {
                include_hidden,
                max_depth,
                ..Default::default()
            };
            let pipeline = Pipeline::builder()
                .paths(paths)
                .threshold(threshold)
                .filter(filter.into())
                .scan_config(scan_config)
                .build();
            run_scan(&pipeline, output, verbose)
        }
    }
}

fn build_hasher(filter: ResampleFilter) -> DifferenceHasher {
    HasherConfig::new().filter(filter).build()
}

fn run_hash(
    files: Vec<PathBuf>,
    rgb: bool,
    filter: ResampleFilter,
    output: OutputFormat,
) -> Result<()> {
    let hasher = build_hasher(filter);
    let term = Term::stdout();

    let (records, failures) = if rgb {
        let batch = hash_files(&files, |path| hasher.hash_file_channels(path), |_| {});
        for (path, hashes) in &batch.hashed {
            match output {
                OutputFormat::Pretty => {
                    term.write_line(&format!("{}", style(path.display()).bold())).ok();
                    for (channel, hash) in hashes.iter() {
                        term.write_line(&format!(
                            "  {} {:>20}  {}",
                            style(channel).cyan(),
                            hash,
                            style(hash.to_hex()).dim()
                        ))
                        .ok();
                    }
                }
                OutputFormat::Minimal => println!("{} {} {}", hashes.r, hashes.g, hashes.b),
                OutputFormat::Json => {}
            }
        }
        let records: Vec<_> = batch
            .hashed
            .iter()
            .map(|(path, hashes)| serde_json::json!({ "path": path, "dhash_rgb": hashes }))
            .collect();
        (records, batch.failures)
    } else {
        let batch = hash_files(&files, |path| hasher.hash_file(path), |_| {});
        for (path, hash) in &batch.hashed {
            match output {
                OutputFormat::Pretty => {
                    term.write_line(&format!(
                        "{:>20}  {}  {}",
                        style(hash).cyan(),
                        style(hash.to_hex()).dim(),
                        path.display()
                    ))
                    .ok();
                }
                OutputFormat::Minimal => println!("{}", hash),
                OutputFormat::Json => {}
            }
        }
        let records: Vec<_> = batch
            .hashed
            .iter()
            .map(|(path, hash)| serde_json::json!({ "path": path, "dhash": hash }))
            .collect();
        (records, batch.failures)
    };

    match output {
        OutputFormat::Json => {
            let value = serde_json::json!({ "hashes": records, "failures": failures });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => print_failures(&Term::stderr(), &failures),
    }

    Ok(())
}

fn print_failures(term: &Term, failures: &[HashFailure]) {
    for failure in failures {
        term.write_line(&format!(
            "{} {}: {}",
            style("✗").red(),
            failure.path.display(),
            failure.reason
        ))
        .ok();
    }
}

fn run_compare(
    image_path: PathBuf,
    other: &str,
    filter: ResampleFilter,
    output: OutputFormat,
) -> Result<()> {
    let image = FastDecoder::decode(&image_path)?;
    let hashed = HashedImage::with_hasher(&image, build_hasher(filter))?;
    let operand = CompareOperand::parse(other)?;

    let distance = hashed.compare_to(operand.as_target())?;
    let hash: ImageHash = hashed.dhash()?;
    let match_type = MatchType::from_distance(distance);

    match output {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            term.write_line(&format!(
                "{} {}",
                style("Distance:").bold(),
                style(distance).cyan()
            ))
            .ok();
            let verdict = if match_type.is_duplicate() {
                style("near-duplicate").green()
            } else {
                style("different").red()
            };
            term.write_line(&format!(
                "{} {} ({})",
                style("Match:").bold(),
                style(match_type).yellow(),
                verdict
            ))
            .ok();
            term.write_line(&format!(
                "{} {} ({})",
                style("Reference dHash:").dim(),
                hash,
                image_path.display()
            ))
            .ok();
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "image": image_path,
                "dhash": hash,
                "other": other,
                "distance": distance,
                "match_type": match_type,
                "near_duplicate": match_type.is_duplicate(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Minimal => println!("{}", distance),
    }

    Ok(())
}

fn run_compare_channels(
    image_path: PathBuf,
    other: &str,
    filter: ResampleFilter,
    output: OutputFormat,
) -> Result<()> {
    let hasher = build_hasher(filter);
    let reference = hasher.hash_file_channels(&image_path)?;
    let other_hashes = CompareOperand::parse(other)?.channel_hashes(&hasher)?;
    let distances = reference.distance(&other_hashes);

    match output {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            for channel in Channel::ALL {
                term.write_line(&format!(
                    "{} {}",
                    style(format!("{}:", channel)).bold(),
                    style(distances.get(channel)).cyan()
                ))
                .ok();
            }
            term.write_line(&format!(
                "{} {}",
                style("Worst channel:").bold(),
                style(MatchType::from_distance(distances.max())).yellow()
            ))
            .ok();
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "image": image_path,
                "dhash_rgb": reference,
                "other": other,
                "distance": distances,
                "max_distance": distances.max(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Minimal => println!("{} {} {}", distances.r, distances.g, distances.b),
    }

    Ok(())
}

fn run_scan(pipeline: &Pipeline, output: OutputFormat, verbose: bool) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("img-hash scan").bold().cyan(),
            style(format!(
                "threshold {} / filter {}",
                pipeline.config().threshold,
                pipeline.config().filter
            ))
            .dim()
        ))
        .ok();
    }

    let progress = matches!(output, OutputFormat::Pretty).then(|| {
        let pb = ProgressBar::new(0);
        if let Ok(progress_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(progress_style.progress_chars("█▓░"));
        }
        pb.set_message("hashing");
        pb
    });

    let result = pipeline.run_with_progress(
        |total, _| {
            if let Some(ref pb) = progress {
                pb.set_length(total as u64);
            }
        },
        |_| {
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        },
    )?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} images scanned in {:.1}s",
        style(result.total_photos).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} near-duplicate groups",
        style(result.groups.len()).cyan()
    ))
    .ok();

    if !result.failures.is_empty() {
        term.write_line(&format!(
            "  {} files could not be hashed",
            style(result.failures.len()).red()
        ))
        .ok();
    }

    if verbose {
        print_failures(term, &result.failures);
        for error in &result.scan_errors {
            term.write_line(&format!("    {} {}", style("✗").red(), error)).ok();
        }
    }

    term.write_line("").ok();

    for (i, group) in result.groups.iter().enumerate() {
        term.write_line(&format!(
            "  {} {} ({} duplicates, avg distance {:.1})",
            style(format!("Group {}:", i + 1)).bold(),
            style(group.match_type).yellow(),
            group.duplicate_count(),
            group.average_distance
        ))
        .ok();

        for photo in &group.photos {
            let marker = if photo == &group.representative {
                style("★").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!("    {} {}", marker, photo.display())).ok();
        }

        term.write_line("").ok();
    }
}

fn print_minimal_results(result: &PipelineResult) {
    for group in &result.groups {
        let line: Vec<String> = group
            .photos
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("{}", line.join("\t"));
    }
}
