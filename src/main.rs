// smartalign CLI entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{error, info};

use smartalign_core::align::audio_energy;
use smartalign_core::align::engine::{apply_smart_alignment, AlignmentRequest};
use smartalign_core::align::refine::{refine_captions, validate_captions, RefineOptions};
use smartalign_core::align::types::Caption;
use smartalign_core::config::AlignmentConfig;
use smartalign_core::media::{probe, thumbs, transcode};

#[derive(Parser)]
#[command(name = "smartalign")]
#[command(about = "Smart alignment engine for video/voiceover/caption timing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align video, voiceover and script into a timed caption track
    Align {
        /// Input video path
        #[arg(short, long)]
        video: PathBuf,

        /// Input voiceover audio path
        #[arg(short, long)]
        audio: PathBuf,

        /// Script text file
        #[arg(short, long)]
        script: PathBuf,

        /// Existing captions JSON (optional)
        #[arg(short, long)]
        captions: Option<PathBuf>,

        /// Declared video duration in seconds (probed when omitted)
        #[arg(long)]
        video_duration: Option<f64>,

        /// Declared audio duration in seconds (probed when omitted)
        #[arg(long)]
        audio_duration: Option<f64>,

        /// Write the alignment result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Refine an existing caption track against its audio
    Refine {
        /// Voiceover audio path
        #[arg(short, long)]
        audio: PathBuf,

        /// Captions JSON to refine
        #[arg(short, long)]
        captions: PathBuf,

        /// Minimum gap between captions in seconds
        #[arg(long, default_value = "0.1")]
        min_gap: f64,
    },

    /// Validate caption timings and report problems
    Validate {
        /// Captions JSON
        #[arg(short, long)]
        captions: PathBuf,
    },

    /// Generate a timeline thumbnail strip
    Thumbs {
        /// Input video path
        #[arg(short, long)]
        video: PathBuf,

        /// Number of thumbnails
        #[arg(short, long, default_value = "30")]
        count: usize,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Trim a clip to a range (fast stream copy)
    Trim {
        /// Input video path
        #[arg(short, long)]
        input: PathBuf,

        /// Start time in seconds
        #[arg(short, long)]
        start: f64,

        /// Duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Output video path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Downscale a clip to 480p for preview playback
    Downscale {
        /// Input video path
        #[arg(short, long)]
        input: PathBuf,

        /// Output video path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print media duration in seconds
    Probe {
        /// Input media path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn load_captions(path: &PathBuf) -> anyhow::Result<Vec<Caption>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AlignmentConfig::load();

    match cli.command {
        Commands::Align {
            video,
            audio,
            script,
            captions,
            video_duration,
            audio_duration,
            output,
        } => {
            let script_text = std::fs::read_to_string(&script)?;
            let existing_captions = match captions {
                Some(path) => load_captions(&path)?,
                None => Vec::new(),
            };

            let request = AlignmentRequest {
                video,
                video_duration: video_duration.unwrap_or(0.0),
                audio,
                audio_duration: audio_duration.unwrap_or(0.0),
                script: script_text,
                existing_captions,
            };

            let progress: smartalign_core::align::engine::ProgressFn =
                Box::new(|message: &str, percent: u8| {
                    info!("[CLI] {:>3}% {}", percent, message);
                });
            let result = apply_smart_alignment(request, &config, Some(progress)).await?;

            let json = serde_json::to_string_pretty(&result)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!("[CLI] Result written to {:?}", path);
                }
                None => println!("{json}"),
            }

            info!(
                "[CLI] Strategy: {} (confidence {:.2})",
                result.strategy, result.confidence
            );
            for recommendation in &result.recommendations {
                info!("[CLI] {}", recommendation);
            }
        }

        Commands::Refine {
            audio,
            captions,
            min_gap,
        } => {
            let caption_list = load_captions(&captions)?;
            let analysis = audio_energy::analyze_audio_file(&audio).await?;
            let options = RefineOptions {
                min_caption_gap: min_gap,
                ..Default::default()
            };
            let report = refine_captions(&caption_list, &analysis, &options);

            println!("{}", serde_json::to_string_pretty(&report.aligned_captions)?);
            for improvement in &report.improvements {
                info!("[CLI] {}", improvement);
            }
            info!(
                "[CLI] Duration {:.2}s -> {:.2}s",
                report.original_duration, report.new_duration
            );
        }

        Commands::Validate { captions } => {
            let caption_list = load_captions(&captions)?;
            let report = validate_captions(&caption_list);
            if report.valid {
                info!("[CLI] {} captions, no problems found", caption_list.len());
            } else {
                for problem in &report.errors {
                    println!("{problem}");
                }
                anyhow::bail!("{} caption problems found", report.errors.len());
            }
        }

        Commands::Thumbs {
            video,
            count,
            out_dir,
        } => {
            let paths = thumbs::generate_thumbnails(&video, count, &out_dir).await?;
            for path in &paths {
                println!("{}", path.display());
            }
            info!("[CLI] {} thumbnails written", paths.len());
        }

        Commands::Trim {
            input,
            start,
            duration,
            output,
        } => {
            let result = transcode::trim_video(&input, start, duration, &output).await?;
            info!(
                "[CLI] Trimmed to {:?} ({:.2} MB)",
                result.output_path, result.size_mb
            );
        }

        Commands::Downscale { input, output } => {
            let result = transcode::downscale_video(&input, &output).await?;
            info!(
                "[CLI] Downscaled to {:?} ({:.2} MB)",
                result.output_path, result.size_mb
            );
        }

        Commands::Probe { input } => {
            let duration = probe::media_duration(&input).await?;
            println!("{duration:.3}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("[CLI] {}", e);
        std::process::exit(1);
    }
}
