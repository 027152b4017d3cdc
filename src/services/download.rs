//! yt-dlp driver: metadata probe and the single download pass.

use anyhow::anyhow;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::errors::{AppError, AppResult};
use crate::utils::common::check_file_exists_and_valid;
use crate::utils::tools::ExternalTool;

/// Metadata reported by `yt-dlp --dump-json`, reduced to what the
/// orchestrator needs. Unknown fields are ignored; live streams may carry
/// no duration.
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// One parsed `[download]` progress line.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DownloadProgress {
    pub status: String,
    pub progress: f32,
    pub speed: Option<String>,
    pub eta: Option<String>,
}

/// Fetch title and duration without downloading any media.
pub async fn get_video_info(ytdlp: &ExternalTool, url: &str) -> AppResult<VideoInfo> {
    info!("Fetching video metadata for {}", url);

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::Download(format!(
            "invalid URL (expected http:// or https://): {url}"
        )));
    }

    let output = Command::new(&ytdlp.path)
        .arg(url)
        .arg("--dump-json")
        .arg("--no-playlist")
        .arg("--no-warnings")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Download(format!(
            "yt-dlp metadata probe failed: {}",
            stderr.trim()
        )));
    }

    let info: VideoInfo = serde_json::from_slice(&output.stdout)
        .map_err(|e| AppError::Download(format!("unexpected yt-dlp metadata: {e}")))?;
    debug!(
        "Video title: {:?}, duration: {:?}s",
        info.title, info.duration
    );
    Ok(info)
}

/// Download the media once into `output_dir` under the fixed stem `video`.
///
/// Tries the highest-quality video-only stream first, which is the fastest
/// route to stills. On any failure there, falls back once to merged best
/// video+audio in an mp4 container. No further retries at this layer; yt-dlp
/// handles transient network errors itself.
pub async fn download_video(
    ytdlp: &ExternalTool,
    url: &str,
    output_dir: &Path,
    progress_sender: Option<mpsc::Sender<DownloadProgress>>,
) -> AppResult<PathBuf> {
    info!("Starting video download for {}", url);
    tokio::fs::create_dir_all(output_dir).await?;

    let template = output_dir.join("video.%(ext)s");

    info!("Downloading highest-quality video-only stream...");
    let video_only = run_download(
        ytdlp,
        url,
        &template,
        &["-f", "bestvideo"],
        progress_sender.clone(),
    )
    .await;
    if let Err(e) = video_only {
        warn!("Video-only download failed ({e}); falling back to merged best video+audio");
        run_download(
            ytdlp,
            url,
            &template,
            &[
                "-f",
                "bestvideo*+bestaudio/best",
                "--merge-output-format",
                "mp4",
            ],
            progress_sender,
        )
        .await?;
    }

    // yt-dlp picks the container, so the extension is not known up front.
    let expected = output_dir.join("video.mp4");
    if check_file_exists_and_valid(&expected).await {
        info!("Downloaded to {}", expected.display());
        return Ok(expected);
    }
    find_downloaded_file(output_dir).await
}

async fn run_download(
    ytdlp: &ExternalTool,
    url: &str,
    template: &Path,
    format_args: &[&str],
    progress_sender: Option<mpsc::Sender<DownloadProgress>>,
) -> AppResult<()> {
    let mut command = Command::new(&ytdlp.path);
    command
        .arg(url)
        .args(format_args)
        .arg("--output")
        .arg(template.as_os_str())
        .arg("--no-continue")
        .arg("--no-part")
        .arg("--retries")
        .arg("5")
        .arg("--retry-sleep")
        .arg("2")
        .arg("--newline")
        .arg("--progress")
        .arg("--no-playlist")
        .arg("--no-warnings")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("Executing command: {:?}", command);

    let mut child = command.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("failed to get stdout handle"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("failed to get stderr handle"))?;

    // Keep the last stderr line around so a failure can say why.
    let stderr_handler = tokio::spawn(async move {
        let mut reader = BufReader::new(stderr);
        let mut line = String::new();
        let mut tail = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        error!("yt-dlp stderr: {}", trimmed);
                        tail = trimmed.to_string();
                    }
                }
                Err(e) => {
                    error!("Error reading yt-dlp stderr: {}", e);
                    break;
                }
            }
        }
        tail
    });

    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                debug!("yt-dlp: {}", line.trim());
                if let Some(progress) = parse_progress(&line) {
                    if let Some(sender) = &progress_sender {
                        if let Err(e) = sender.send(progress).await {
                            debug!("Progress receiver dropped: {}", e);
                        }
                    }
                }
            }
            Err(e) => {
                error!("Error reading yt-dlp stdout: {}", e);
                break;
            }
        }
    }

    let stderr_tail = stderr_handler.await.unwrap_or_default();
    let status = child.wait().await?;
    if !status.success() {
        return Err(AppError::Download(format!(
            "yt-dlp exited with {status}: {stderr_tail}"
        )));
    }
    Ok(())
}

/// Parse progress information from a yt-dlp `--newline` output line, e.g.
/// `[download]  42.3% of 10.00MiB at 1.25MiB/s ETA 00:05`.
pub(crate) fn parse_progress(line: &str) -> Option<DownloadProgress> {
    if !line.starts_with("[download]") {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    let progress = parts[1].trim_end_matches('%').parse::<f32>().ok()?;

    let speed = parts
        .iter()
        .position(|&p| p == "at")
        .and_then(|idx| parts.get(idx + 1))
        .map(|s| s.to_string());

    let eta = parts
        .iter()
        .position(|&p| p == "ETA")
        .and_then(|idx| parts.get(idx + 1))
        .map(|s| s.to_string());

    Some(DownloadProgress {
        status: "downloading".to_string(),
        progress,
        speed,
        eta,
    })
}

/// Locate the download when the container is not mp4 (video-only streams
/// often land in webm). Newest `video.*` file wins.
async fn find_downloaded_file(output_dir: &Path) -> AppResult<PathBuf> {
    debug!("Searching for video.* in {}", output_dir.display());

    let mut candidates = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let stem_matches = path.file_stem().and_then(|s| s.to_str()) == Some("video");
        if stem_matches && check_file_exists_and_valid(&path).await {
            if let Ok(metadata) = entry.metadata().await {
                candidates.push((path, metadata));
            }
        }
    }

    if candidates.is_empty() {
        return Err(AppError::Download(format!(
            "download finished but no video.* file was found in {}",
            output_dir.display()
        )));
    }

    candidates.sort_by(|(_, a), (_, b)| {
        let time_a = a.modified().unwrap_or(std::time::UNIX_EPOCH);
        let time_b = b.modified().unwrap_or(std::time::UNIX_EPOCH);
        time_b.cmp(&time_a)
    });

    info!("Downloaded to {}", candidates[0].0.display());
    Ok(candidates[0].0.clone())
}
