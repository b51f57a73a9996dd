use super::*;
use crate::surface::Scene;

struct Layers {
    scene: Scene,
    background: ItemId,
    title: ItemId,
    primary: ItemId,
}

fn layered() -> Layers {
    let mut scene = Scene::new(Canvas::new(800, 480));
    let text = |s: &str| Item::Text {
        anchor: Point::new(400.0, 70.0),
        text: s.to_string(),
        size_px: 36.0,
        fill: Rgba8::WHITE,
    };
    let title = scene.create(text("title"));
    let primary = scene.create(text("primary"));
    let background = scene.create(Item::Disc {
        center: Point::new(0.0, 0.0),
        radius: 1.0,
        fill: Rgba8::BLACK,
    });
    scene.send_to_back(background);
    Layers {
        scene,
        background,
        title,
        primary,
    }
}

fn emitter_for(l: &Layers) -> RippleEmitter {
    let mut e = RippleEmitter::new();
    e.set_anchors(RippleAnchors {
        background: l.background,
        title: l.title,
    });
    e
}

fn assert_between_background_and_text(l: &Layers, e: &RippleEmitter) {
    let bg = l.scene.z_index(l.background).unwrap();
    let title = l.scene.z_index(l.title).unwrap();
    let primary = l.scene.z_index(l.primary).unwrap();
    for r in e.ripples() {
        let z = l.scene.z_index(r.item()).unwrap();
        assert!(bg < z && z < title && z < primary, "ring at {z}");
    }
}

#[test]
fn max_radius_covers_the_screen_from_center() {
    assert_eq!(max_radius_for(Canvas::new(800, 480)), 517.0);
    assert_eq!(max_radius_for(Canvas::new(3, 4)), 53.0);
    assert_eq!(max_radius_for(Canvas::new(6, 8)), 55.0);
}

#[test]
fn start_creates_three_staggered_rings_at_center() {
    let mut l = layered();
    let mut e = emitter_for(&l);
    assert_eq!(e.start(&mut l.scene), Wake::Start);

    let radii: Vec<f64> = e.ripples().iter().map(|r| r.radius).collect();
    assert_eq!(radii, vec![0.0, -30.0, -60.0]);
    for r in e.ripples() {
        assert_eq!(r.center, Point::new(400.0, 240.0));
        assert_eq!(r.max_radius, 517.0);
        assert_eq!(r.speed, RIPPLE_SPEED_PX);
    }
    assert_between_background_and_text(&l, &e);
}

#[test]
fn radii_follow_linear_staggered_schedule() {
    let mut l = layered();
    let mut e = emitter_for(&l);
    e.start(&mut l.scene);

    for t in 1..=100u32 {
        assert!(e.tick(&mut l.scene));
        for (k, r) in e.ripples().iter().enumerate() {
            let expected = RIPPLE_SPEED_PX * f64::from(t) - RIPPLE_STAGGER_PX * k as f64;
            assert_eq!(r.radius, expected, "ring {k} at tick {t}");
        }
        assert_between_background_and_text(&l, &e);
    }
}

#[test]
fn unborn_rings_are_not_resized() {
    let mut l = layered();
    let mut e = emitter_for(&l);
    e.start(&mut l.scene);
    e.tick(&mut l.scene);

    let last = e.ripples()[2].clone();
    assert_eq!(last.radius, -55.0);
    match l.scene.item(last.item()) {
        Some(Item::Ring { radius, .. }) => assert_eq!(*radius, 0.0),
        other => panic!("unexpected item {other:?}"),
    }

    let first = &e.ripples()[0];
    match l.scene.item(first.item()) {
        Some(Item::Ring { radius, .. }) => assert_eq!(*radius, 5.0),
        other => panic!("unexpected item {other:?}"),
    }
}

#[test]
fn rings_are_removed_past_max_radius_and_emitter_idles() {
    let mut l = layered();
    let mut e = emitter_for(&l);
    e.start(&mut l.scene);
    let before = l.scene.len();

    let mut ticks = 0;
    while e.tick(&mut l.scene) {
        ticks += 1;
        for r in e.ripples() {
            assert!(r.radius <= r.max_radius);
        }
    }
    ticks += 1;

    // slowest ring starts at -60: 5t - 60 > 517 first holds at t = 116
    assert_eq!(ticks, 116);
    assert!(!e.is_running());
    assert_eq!(l.scene.len(), before - RIPPLE_COUNT);
}

#[test]
fn start_while_live_extends_the_set() {
    let mut l = layered();
    let mut e = emitter_for(&l);
    e.start(&mut l.scene);
    for _ in 0..10 {
        e.tick(&mut l.scene);
    }
    let first_radius = e.ripples()[0].radius;

    assert_eq!(e.start(&mut l.scene), Wake::AlreadyRunning);
    assert_eq!(e.live_count(), 2 * RIPPLE_COUNT);
    assert_eq!(e.ripples()[0].radius, first_radius);
    assert_eq!(e.ripples()[3].radius, 0.0);
    assert_between_background_and_text(&l, &e);
}

#[test]
fn without_anchors_rings_still_animate() {
    let mut scene = Scene::new(Canvas::new(100, 100));
    let mut e = RippleEmitter::new();
    assert_eq!(e.start(&mut scene), Wake::Start);
    while e.tick(&mut scene) {}
    assert!(scene.is_empty());
}
