use super::*;
use crate::foundation::core::Canvas;

fn assert_near(got: [u8; 4], want: [u8; 4]) {
    for (g, w) in got.iter().zip(want) {
        assert!(g.abs_diff(w) <= 2, "got {got:?}, want {want:?}");
    }
}

#[test]
fn empty_scene_clears_to_black() {
    let scene = Scene::new(Canvas::new(16, 8));
    let frame = Compositor::new().render_scene(&scene).unwrap();
    assert_eq!((frame.width, frame.height), (16, 8));
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert_near(frame.pixel(0, 0).unwrap(), [0, 0, 0, 255]);
    assert_near(frame.pixel(15, 7).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn image_then_disc_in_stacking_order() {
    let mut scene = Scene::new(Canvas::new(40, 40));
    let bg = image::RgbaImage::from_pixel(40, 40, image::Rgba([0, 0, 255, 255]));
    scene.create(Item::Image {
        origin: Point::ORIGIN,
        image: Arc::new(bg),
    });
    scene.create(Item::Disc {
        center: Point::new(20.0, 20.0),
        radius: 8.0,
        fill: Rgba8::opaque(255, 0, 0),
    });

    let frame = Compositor::new().render_scene(&scene).unwrap();
    assert_near(frame.pixel(20, 20).unwrap(), [255, 0, 0, 255]);
    assert_near(frame.pixel(2, 2).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn ring_is_hollow_and_skipped_at_zero_radius() {
    let mut scene = Scene::new(Canvas::new(60, 60));
    scene.create(Item::Ring {
        center: Point::new(30.0, 30.0),
        radius: 20.0,
        stroke: Rgba8::WHITE,
        width: 3.0,
    });
    scene.create(Item::Ring {
        center: Point::new(5.0, 5.0),
        radius: 0.0,
        stroke: Rgba8::WHITE,
        width: 3.0,
    });

    let frame = Compositor::new().render_scene(&scene).unwrap();
    assert_near(frame.pixel(30, 30).unwrap(), [0, 0, 0, 255]);
    assert_near(frame.pixel(50, 30).unwrap(), [255, 255, 255, 255]);
    assert_near(frame.pixel(5, 5).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn text_without_font_is_skipped() {
    let mut scene = Scene::new(Canvas::new(20, 20));
    scene.create(Item::Text {
        anchor: Point::new(10.0, 10.0),
        text: "hi".to_string(),
        size_px: 12.0,
        fill: Rgba8::WHITE,
    });
    let mut c = Compositor::new();
    assert!(!c.has_font());
    let frame = c.render_scene(&scene).unwrap();
    assert_near(frame.pixel(10, 10).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn text_with_local_font_if_present() {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    ];
    let Some(path) = candidates
        .iter()
        .map(std::path::Path::new)
        .find(|p| p.is_file())
    else {
        return;
    };

    let mut scene = Scene::new(Canvas::new(200, 80));
    scene.create(Item::Text {
        anchor: Point::new(100.0, 40.0),
        text: "Loop".to_string(),
        size_px: 48.0,
        fill: Rgba8::WHITE,
    });
    let mut c = Compositor::with_font_path(path).unwrap();
    assert!(c.has_font());
    let frame = c.render_scene(&scene).unwrap();
    let lit = frame
        .data
        .chunks_exact(4)
        .filter(|px| px[0] > 128)
        .count();
    assert!(lit > 50, "only {lit} lit pixels");
}

#[test]
fn image_cache_follows_item_contents() {
    let mut scene = Scene::new(Canvas::new(4, 4));
    let id = scene.create(Item::Image {
        origin: Point::ORIGIN,
        image: Arc::new(image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]))),
    });
    let mut c = Compositor::new();
    c.render_scene(&scene).unwrap();

    scene.update(
        id,
        Item::Image {
            origin: Point::ORIGIN,
            image: Arc::new(image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]))),
        },
    );
    let frame = c.render_scene(&scene).unwrap();
    assert_near(frame.pixel(1, 1).unwrap(), [0, 255, 0, 255]);

    scene.remove(id);
    c.render_scene(&scene).unwrap();
    assert!(c.image_cache.is_empty());
}

#[test]
fn frame_round_trips_to_png() {
    let scene = Scene::new(Canvas::new(8, 8));
    let frame = Compositor::new().render_scene(&scene).unwrap();
    let path = std::path::PathBuf::from("target")
        .join("kiosk_render_tests")
        .join("black.png");
    frame.save_png(&path).unwrap();
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (8, 8));
    assert_eq!(back.get_pixel(3, 3).0, [0, 0, 0, 255]);
}

#[test]
fn oversized_canvas_is_rejected() {
    let scene = Scene::new(Canvas::new(70_000, 10));
    assert!(Compositor::new().render_scene(&scene).is_err());
}
