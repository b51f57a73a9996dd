use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context as _;
use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::decode::premultiply_rgba8_in_place,
    foundation::{
        core::{Point, Rgba8},
        error::{KioskError, KioskResult},
    },
    render::{frame::Frame, text::TextLayoutEngine},
    surface::{DisplaySurface, Item, ItemId, Scene},
};

const CLEAR: Rgba8 = Rgba8::BLACK;
const CURVE_TOLERANCE: f64 = 0.1;

struct CachedImage {
    source: Arc<image::RgbaImage>,
    paint: vello_cpu::Image,
}

/// Software compositor for a [`Scene`].
///
/// Decoded image layers are converted to pixmaps once and reused until the item's
/// image changes.
pub struct Compositor {
    text: TextLayoutEngine,
    font: Option<vello_cpu::peniko::FontData>,
    image_cache: HashMap<ItemId, CachedImage>,
    warned_no_font: bool,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// A compositor without a font; text items are skipped.
    pub fn new() -> Self {
        Self {
            text: TextLayoutEngine::new(),
            font: None,
            image_cache: HashMap::new(),
            warned_no_font: false,
        }
    }

    pub fn with_font_bytes(font_bytes: Vec<u8>) -> KioskResult<Self> {
        let mut out = Self::new();
        out.text.register_font(&font_bytes)?;
        out.font = Some(vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes),
            0,
        ));
        Ok(out)
    }

    pub fn with_font_path(path: &Path) -> KioskResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::with_font_bytes(bytes)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some() && self.text.has_font()
    }

    /// Draw every item bottom to top over a black clear.
    pub fn render_scene(&mut self, scene: &Scene) -> KioskResult<Frame> {
        let canvas = scene.canvas();
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| KioskError::surface("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| KioskError::surface("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(KioskError::surface("canvas must be non-empty"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(color(CLEAR));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        self.image_cache.retain(|id, _| scene.contains(*id));
        for (id, item) in scene.iter() {
            self.draw_item(&mut ctx, id, item)?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(Frame {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn draw_item(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        id: ItemId,
        item: &Item,
    ) -> KioskResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match item {
            Item::Image { origin, image } => {
                let paint = self.image_paint_for(id, image)?;
                let (w, h) = (f64::from(image.width()), f64::from(image.height()));
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
            Item::Disc {
                center,
                radius,
                fill,
            } => {
                if *radius > 0.0 {
                    ctx.set_paint(color(*fill));
                    ctx.fill_path(&circle_path(*center, *radius));
                }
            }
            Item::Ring {
                center,
                radius,
                stroke,
                width,
            } => {
                if *radius > 0.0 && *width > 0.0 {
                    ctx.set_paint(color(*stroke));
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.stroke_path(&circle_path(*center, *radius));
                }
            }
            Item::Text {
                anchor,
                text,
                size_px,
                fill,
            } => self.draw_text(ctx, *anchor, text, *size_px, *fill)?,
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        anchor: Point,
        text: &str,
        size_px: f32,
        fill: Rgba8,
    ) -> KioskResult<()> {
        let Some(font) = self.font.clone() else {
            if !self.warned_no_font {
                tracing::warn!("no font configured; text layers are not rasterized");
                self.warned_no_font = true;
            }
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }

        let layout = self.text.layout_line(text, size_px, fill)?;
        let dx = anchor.x - f64::from(layout.width()) / 2.0;
        let dy = anchor.y - f64::from(layout.height()) / 2.0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((dx, dy)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                ctx.set_paint(color(run.style().brush));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn image_paint_for(
        &mut self,
        id: ItemId,
        image: &Arc<image::RgbaImage>,
    ) -> KioskResult<vello_cpu::Image> {
        if let Some(cached) = self.image_cache.get(&id)
            && Arc::ptr_eq(&cached.source, image)
        {
            return Ok(cached.paint.clone());
        }

        let pixmap = rgba_image_to_pixmap(image)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(
            id,
            CachedImage {
                source: Arc::clone(image),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }
}

fn color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    vello_cpu::kurbo::Circle::new((center.x, center.y), radius).to_path(CURVE_TOLERANCE)
}

fn rgba_image_to_pixmap(image: &image::RgbaImage) -> KioskResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width()
        .try_into()
        .map_err(|_| KioskError::surface("image width exceeds u16"))?;
    let h: u16 = image
        .height()
        .try_into()
        .map_err(|_| KioskError::surface("image height exceeds u16"))?;

    let mut bytes = image.as_raw().clone();
    premultiply_rgba8_in_place(&mut bytes);

    let mut may_have_opacities = false;
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
