//! ffmpeg driver: one still frame per capture instant.

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::{AppError, AppResult};
use crate::timecode;
use crate::utils::tools::ExternalTool;

/// Output path for one frame: the rendered timestamp with `:` swapped for
/// `-` so the name stays filesystem-safe.
pub fn frame_path(output_dir: &Path, prefix: &str, timestamp: &str) -> PathBuf {
    output_dir.join(format!("{}{}.png", prefix, timestamp.replace(':', "-")))
}

/// Grab a single frame at `timestamp`. `-ss` goes after `-i` so the seek is
/// frame-accurate rather than keyframe-aligned.
pub async fn grab_frame(
    ffmpeg: &ExternalTool,
    input: &Path,
    timestamp: &str,
    out_file: &Path,
) -> AppResult<()> {
    let mut command = Command::new(&ffmpeg.path);
    command
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-nostdin")
        .arg("-i")
        .arg(input)
        .arg("-ss")
        .arg(timestamp)
        .arg("-frames:v")
        .arg("1")
        .arg("-y")
        .arg(out_file)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("Executing command: {:?}", command);
    let output = command.output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::FrameExtraction(format!(
            "ffmpeg failed at {}: {}",
            timestamp,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Extract every frame of the burst, in sequence order.
pub async fn extract_burst(
    ffmpeg: &ExternalTool,
    input: &Path,
    output_dir: &Path,
    prefix: &str,
    instants: &[f64],
) -> AppResult<Vec<PathBuf>> {
    let mut saved = Vec::with_capacity(instants.len());
    for (idx, &instant) in instants.iter().enumerate() {
        let timestamp = timecode::render_timestamp(instant);
        let out_file = frame_path(output_dir, prefix, &timestamp);
        grab_frame(ffmpeg, input, &timestamp, &out_file).await?;
        info!(
            "[{}/{}] Saved {}",
            idx + 1,
            instants.len(),
            out_file.display()
        );
        saved.push(out_file);
    }
    Ok(saved)
}
