use crate::{
    background::sync::{BackgroundSynchronizer, SyncOutcome},
    effects::{
        Emitter, Wake,
        bubble::BubbleEmitter,
        ripple::{RippleAnchors, RippleEmitter},
    },
    foundation::{
        config::{KioskConfig, Labels},
        core::{Point, Rgba8},
        error::{KioskError, KioskResult},
    },
    runtime::scheduler::EmitterKind,
    surface::{DisplaySurface, Item, ItemId},
    transit::{Arrival, ArrivalQuery, DisplayText, TransitFeed},
};

const TITLE_Y: f64 = 70.0;
const TITLE_SIZE_PX: f32 = 36.0;
const PRIMARY_SIZE_PX: f32 = 80.0;
const SECONDARY_INSET_Y: f64 = 80.0;
const SECONDARY_SIZE_PX: f32 = 28.0;

/// Handles of the three text lines, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextLayers {
    pub title: ItemId,
    pub primary: ItemId,
    pub secondary: ItemId,
}

impl TextLayers {
    fn create(surface: &mut dyn DisplaySurface, title: &str) -> Self {
        let canvas = surface.canvas();
        let cx = f64::from(canvas.width / 2);
        let loading = DisplayText::loading();
        let mut line = |y: f64, text: String, size_px: f32| {
            surface.create(Item::Text {
                anchor: Point::new(cx, y),
                text,
                size_px,
                fill: Rgba8::WHITE,
            })
        };
        Self {
            title: line(TITLE_Y, title.to_string(), TITLE_SIZE_PX),
            primary: line(canvas.center().y, loading.primary, PRIMARY_SIZE_PX),
            secondary: line(
                f64::from(canvas.height) - SECONDARY_INSET_Y,
                loading.secondary,
                SECONDARY_SIZE_PX,
            ),
        }
    }

    fn all(self) -> [ItemId; 3] {
        [self.title, self.primary, self.secondary]
    }
}

/// What one refresh tick did.
#[derive(Debug)]
pub struct RefreshReport {
    /// `false` when the feed reported failure.
    pub fetched: bool,
    pub background: SyncOutcome,
    /// Ripple emitter answer; `Wake::Start` means a frame chain must be armed.
    pub ripples: Wake,
    /// Text now on screen.
    pub text: DisplayText,
    /// Failure caught at the tick boundary, if any.
    pub error: Option<KioskError>,
}

/// Owns the background synchronizer, both emitters, and the feed, and applies one
/// refresh tick at a time to a surface.
pub struct PresentationController {
    background: BackgroundSynchronizer,
    bubbles: BubbleEmitter,
    ripples: RippleEmitter,
    feed: Box<dyn TransitFeed>,
    query: ArrivalQuery,
    labels: Labels,
    layers: TextLayers,
}

impl PresentationController {
    /// Create the text layers on `surface` and take ownership of the collaborators.
    pub fn new(
        surface: &mut dyn DisplaySurface,
        background: BackgroundSynchronizer,
        feed: Box<dyn TransitFeed>,
        query: ArrivalQuery,
        labels: Labels,
        seed: Option<u64>,
    ) -> Self {
        let layers = TextLayers::create(surface, &labels.title);
        Self {
            background,
            bubbles: BubbleEmitter::new(seed),
            ripples: RippleEmitter::new(),
            feed,
            query,
            labels,
            layers,
        }
    }

    /// Wire a controller from configuration and an already built feed.
    pub fn from_config(
        surface: &mut dyn DisplaySurface,
        cfg: &KioskConfig,
        feed: Box<dyn TransitFeed>,
    ) -> Self {
        let background = BackgroundSynchronizer::new(&cfg.background_path, surface.canvas());
        Self::new(
            surface,
            background,
            feed,
            cfg.feed.query(),
            cfg.labels.clone(),
            cfg.seed,
        )
    }

    pub fn layers(&self) -> TextLayers {
        self.layers
    }

    pub fn background(&self) -> &BackgroundSynchronizer {
        &self.background
    }

    pub fn bubbles(&self) -> &BubbleEmitter {
        &self.bubbles
    }

    pub fn ripples(&self) -> &RippleEmitter {
        &self.ripples
    }

    pub fn emitter_mut(&mut self, kind: EmitterKind) -> &mut dyn Emitter {
        match kind {
            EmitterKind::Bubbles => &mut self.bubbles,
            EmitterKind::Ripples => &mut self.ripples,
        }
    }

    /// Spawn bubbles at a touch point.
    pub fn touch(&mut self, surface: &mut dyn DisplaySurface, at: Point) -> Wake {
        self.bubbles.spawn(surface, at)
    }

    /// Run one refresh tick. Never fails: unexpected errors are logged, shown as the
    /// error text, and returned in the report.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn refresh(&mut self, surface: &mut dyn DisplaySurface) -> RefreshReport {
        let arrivals = self.feed.fetch_arrivals(&self.query);
        let background = self.background.check_and_update(surface);

        let mut ripples = Wake::Idle;
        let (text, error) = match self.present(surface, arrivals.as_deref(), background, &mut ripples)
        {
            Ok(text) => (text, None),
            Err(e) => {
                tracing::error!(error = %e, transient = e.is_transient(), "refresh tick failed");
                let text = DisplayText::error();
                surface.set_text(self.layers.primary, &text.primary);
                surface.set_text(self.layers.secondary, &text.secondary);
                (text, Some(e))
            }
        };

        tracing::info!(
            fetched = arrivals.is_some(),
            trains = arrivals.as_ref().map_or(0, Vec::len),
            background_changed = background.changed,
            primary = %text.primary,
            secondary = %text.secondary,
            "refresh"
        );
        RefreshReport {
            fetched: arrivals.is_some(),
            background,
            ripples,
            text,
            error,
        }
    }

    fn present(
        &mut self,
        surface: &mut dyn DisplaySurface,
        arrivals: Option<&[Arrival]>,
        background: SyncOutcome,
        ripples: &mut Wake,
    ) -> KioskResult<DisplayText> {
        if let Some(bg) = self.background.background_item() {
            self.ripples.set_anchors(RippleAnchors {
                background: bg,
                title: self.layers.title,
            });
        }

        if let Some(theme) = background.theme {
            let color = theme.text_color();
            for id in self.layers.all() {
                if !surface.set_fill(id, color) {
                    return Err(missing_layer(id));
                }
            }
            tracing::debug!(?theme, "text theme applied");
        }

        if background.changed {
            *ripples = self.ripples.start(surface);
        }

        let text = DisplayText::from_arrivals(arrivals, &self.labels.destination_label);
        for (id, value) in [
            (self.layers.primary, &text.primary),
            (self.layers.secondary, &text.secondary),
        ] {
            if !surface.set_text(id, value) {
                return Err(missing_layer(id));
            }
        }
        Ok(text)
    }
}

fn missing_layer(id: ItemId) -> KioskError {
    KioskError::surface(format!("text layer {} is not on the surface", id.as_u64()))
}

#[cfg(test)]
#[path = "../../tests/unit/present/controller.rs"]
mod tests;
