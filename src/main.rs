use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use tokio::sync::mpsc;

use framegrab::services::download::{self, DownloadProgress};
use framegrab::services::frames;
use framegrab::timecode::{self, burst::BurstSpec};
use framegrab::utils::{common, logger, tools};

/// Grab a burst of still frames from a streaming video.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Video URL (an embedded ?t=8s / &t=180 / &start= time is honored)
    #[arg(long)]
    url: String,

    /// Start timestamp, e.g. "3:00", "00:03:00", "180", "3m0s"
    #[arg(long)]
    start: Option<String>,

    /// Number of frames to capture
    #[arg(long, default_value_t = 10)]
    count: u32,

    /// Seconds between frames
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    /// Output directory (defaults to the sanitized video title)
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// Filename prefix for the saved frames
    #[arg(long, default_value = "frame_")]
    prefix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger();
    let cli = Cli::parse();

    if !cli.step.is_finite() || cli.step < 0.0 {
        anyhow::bail!("--step must be a non-negative number of seconds");
    }

    let toolset = tools::ensure_tools()?;

    // Explicit --start wins over a time embedded in the URL; with neither,
    // the burst starts at the beginning of the video.
    let base = timecode::resolve_base_time(cli.start.as_deref(), &cli.url)?;
    let spec = BurstSpec::new(base, cli.count, cli.step);

    let video_info = download::get_video_info(&toolset.ytdlp, &cli.url).await?;
    let outdir = match cli.outdir {
        Some(dir) => dir,
        None => PathBuf::from(common::sanitize_filename(&video_info.title)),
    };
    tokio::fs::create_dir_all(&outdir).await?;
    info!("Output directory: {}", outdir.display());

    if let Some(duration) = video_info.duration {
        if duration > 0.0 && spec.end() > duration {
            warn!(
                "Burst reaches {} but the video ends at {}; late frames may come out empty",
                timecode::render_timestamp(spec.end()),
                timecode::render_timestamp(duration)
            );
        }
    }

    let (progress_tx, mut progress_rx) = mpsc::channel::<DownloadProgress>(32);
    let progress_printer = tokio::spawn(async move {
        let mut last_reported = f32::NEG_INFINITY;
        while let Some(progress) = progress_rx.recv().await {
            if progress.progress - last_reported >= 10.0 {
                info!(
                    "Downloading: {:.1}% at {} (ETA {})",
                    progress.progress,
                    progress.speed.as_deref().unwrap_or("?"),
                    progress.eta.as_deref().unwrap_or("?")
                );
                last_reported = progress.progress;
            }
        }
    });

    let video_file =
        download::download_video(&toolset.ytdlp, &cli.url, &outdir, Some(progress_tx)).await?;
    let _ = progress_printer.await;

    let instants = spec.timestamps();
    info!(
        "Extracting {} frames starting at {}",
        instants.len(),
        timecode::render_timestamp(base)
    );
    let saved = frames::extract_burst(
        &toolset.ffmpeg,
        &video_file,
        &outdir,
        &cli.prefix,
        &instants,
    )
    .await?;

    info!("Done. {} frames in {}", saved.len(), outdir.display());
    Ok(())
}
