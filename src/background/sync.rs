use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use image::DynamicImage;

use crate::{
    assets::{
        decode::{fit_to_canvas, read_and_decode},
        luminance::{Theme, classify},
    },
    foundation::core::{Canvas, Point},
    surface::{DisplaySurface, Item, ItemId},
};

/// Result of one background check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOutcome {
    /// A previously shown background was replaced by a new one.
    pub changed: bool,
    /// Text theme for the newly published background, if any.
    pub theme: Option<Theme>,
}

impl SyncOutcome {
    const UNCHANGED: Self = Self {
        changed: false,
        theme: None,
    };
}

/// Polls one image file and keeps the bottom layer of a surface in sync with it.
#[derive(Debug)]
pub struct BackgroundSynchronizer {
    path: PathBuf,
    canvas: Canvas,
    last_mtime: Option<SystemTime>,
    item: Option<ItemId>,
    theme: Option<Theme>,
    decode_count: usize,
}

impl BackgroundSynchronizer {
    pub fn new(path: impl Into<PathBuf>, canvas: Canvas) -> Self {
        Self {
            path: path.into(),
            canvas,
            last_mtime: None,
            item: None,
            theme: None,
            decode_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of decode attempts so far, successful or not.
    pub fn decode_count(&self) -> usize {
        self.decode_count
    }

    /// Theme of the background currently shown.
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn background_item(&self) -> Option<ItemId> {
        self.item
    }

    /// Reload the background if the file's modification time moved.
    ///
    /// The mtime is recorded before decoding, so a file that fails to decode is not
    /// retried until it is replaced again.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub fn check_and_update(&mut self, surface: &mut dyn DisplaySurface) -> SyncOutcome {
        let mtime = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(error = %e, "background not readable");
                return SyncOutcome::UNCHANGED;
            }
        };
        if self.last_mtime == Some(mtime) {
            return SyncOutcome::UNCHANGED;
        }
        self.last_mtime = Some(mtime);

        self.decode_count += 1;
        let img = match read_and_decode(&self.path) {
            Ok(img) => DynamicImage::ImageRgb8(img.to_rgb8()),
            Err(e) => {
                tracing::warn!(error = %e, "background decode failed; keeping previous image");
                return SyncOutcome::UNCHANGED;
            }
        };

        let theme = classify(&img);
        let layer = Item::Image {
            origin: Point::ORIGIN,
            image: Arc::new(fit_to_canvas(&img, self.canvas)),
        };

        let first_load = self.item.is_none();
        let id = match self.item {
            Some(id) if surface.update(id, layer.clone()) => id,
            _ => surface.create(layer),
        };
        surface.send_to_back(id);
        self.item = Some(id);
        self.theme = Some(theme);

        tracing::info!(?theme, first_load, "background published");
        SyncOutcome {
            changed: !first_load,
            theme: Some(theme),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/sync.rs"]
mod tests;
