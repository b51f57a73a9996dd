use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{KioskError, KioskResult};

/// File extensions accepted as background images (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "heic"];

fn is_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Replace the background at `dest` with a copy of `src`.
///
/// The copy is staged as `tmp-<timestamp>-<name>` beside `dest` and renamed into place,
/// so a poller never sees a half-written file.
pub fn install_background(src: &Path, dest: &Path) -> KioskResult<PathBuf> {
    if !is_allowed(src) {
        return Err(KioskError::config(format!(
            "unsupported background type '{}' (allowed: {})",
            src.display(),
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create background dir '{}'", dir.display()))?;

    let name = src
        .file_name()
        .and_then(|n| n.to_str())
        .map(sanitize_file_name)
        .unwrap_or_else(|| "upload".to_string());
    let ts = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let tmp = dir.join(format!("tmp-{ts}-{name}"));

    std::fs::copy(src, &tmp)
        .with_context(|| format!("stage '{}' as '{}'", src.display(), tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, dest) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("move '{}' into '{}'", tmp.display(), dest.display()))
            .into());
    }

    tracing::info!(src = %src.display(), dest = %dest.display(), "background installed");
    Ok(dest.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/background/install.rs"]
mod tests;
