//! Discovery and version checks for the external tools the program shells
//! out to. Both are required, so a missing one is reported up front, before
//! any download starts.

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use which::which;

use crate::errors::{AppError, AppResult};

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub name: &'static str,
    pub path: PathBuf,
    pub version: Option<Version>,
}

/// The resolved toolchain, handed to the orchestrator as a plain value.
#[derive(Debug, Clone)]
pub struct ToolSet {
    pub ytdlp: ExternalTool,
    pub ffmpeg: ExternalTool,
}

/// Resolve both required tools on PATH and probe their versions.
pub fn ensure_tools() -> AppResult<ToolSet> {
    let ytdlp = resolve_tool("yt-dlp", "--version", Version::new(2023, 11, 16))?;
    let ffmpeg = resolve_tool("ffmpeg", "-version", Version::new(4, 0, 0))?;
    Ok(ToolSet { ytdlp, ffmpeg })
}

fn resolve_tool(
    name: &'static str,
    version_flag: &str,
    min_version: Version,
) -> AppResult<ExternalTool> {
    let path = which(name).map_err(|_| AppError::MissingTool(name.to_string()))?;
    info!("Found {} at {}", name, path.display());

    let version = probe_version(&path, version_flag);
    match &version {
        Some(version) => {
            info!("{} version: {}", name, version);
            if *version < min_version {
                warn!(
                    "{} {} is older than the known-good {}, continuing anyway",
                    name, version, min_version
                );
            }
        }
        None => debug!("Could not determine {} version", name),
    }

    Ok(ExternalTool {
        name,
        path,
        version,
    })
}

fn probe_version(path: &Path, flag: &str) -> Option<Version> {
    let output = Command::new(path)
        .arg(flag)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_version(&String::from_utf8_lossy(&output.stdout))
}

/// Extract the first version triple from `--version` output. ffmpeg reports
/// "ffmpeg version 6.1.1 ..."; yt-dlp prints a bare "2024.03.10".
pub(crate) fn parse_version(text: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(text)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = match caps.get(3) {
        Some(patch) => patch.as_str().parse().ok()?,
        None => 0,
    };
    Some(Version::new(major, minor, patch))
}
