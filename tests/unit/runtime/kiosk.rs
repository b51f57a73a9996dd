use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use super::*;
use crate::{
    effects::Emitter,
    foundation::core::Canvas,
    transit::{Arrival, StaticFeed},
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("kiosk_runtime_tests").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_solid(path: &Path, rgb: [u8; 3], mtime_secs: u64) {
    image::RgbImage::from_pixel(16, 10, image::Rgb(rgb))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs))
        .unwrap();
}

fn kiosk(bg: &Path, feed: StaticFeed) -> Kiosk<Scene> {
    let cfg = KioskConfig {
        canvas: Canvas::new(200, 120),
        background_path: bg.to_path_buf(),
        seed: Some(11),
        ..KioskConfig::default()
    };
    Kiosk::with_feed(Scene::new(cfg.canvas), &cfg, Box::new(feed))
}

fn pending(k: &Kiosk<Scene>, task: Task) -> usize {
    k.queue().count_where(|t| *t == task)
}

#[test]
fn refresh_chain_repeats_every_interval() {
    let dir = scratch_dir("refresh");
    let mut k = kiosk(&dir.join("none.png"), StaticFeed::always(Some(vec![Arrival::live(4)])));
    k.start();
    k.start();
    assert_eq!(pending(&k, Task::Refresh), 1);

    assert_eq!(k.run_for(Duration::ZERO), 1);
    assert_eq!(k.last_report().unwrap().text.primary, "4 mins away");
    assert_eq!(pending(&k, Task::Refresh), 1);
    assert_eq!(k.queue().next_due(), Some(Duration::from_secs(15)));

    assert_eq!(k.run_for(Duration::from_secs(45)), 3);
    assert_eq!(k.now(), Duration::from_secs(45));
    assert_eq!(pending(&k, Task::Refresh), 1);
}

#[test]
fn touch_runs_one_bubble_chain_until_idle() {
    let dir = scratch_dir("touch");
    let mut k = kiosk(&dir.join("none.png"), StaticFeed::default());
    let text_items = k.surface().len();

    k.touch(Point::new(100.0, 60.0));
    k.touch(Point::new(20.0, 20.0));
    // Touch never runs physics on its own.
    assert_eq!(k.surface().len(), text_items);

    k.run_for(Duration::ZERO);
    let live = k.controller().bubbles().live_count();
    assert!((6..=10).contains(&live));
    assert!(k.scheduler().is_armed(EmitterKind::Bubbles));
    assert_eq!(pending(&k, Task::Frame(EmitterKind::Bubbles)), 1);

    k.run_for(Duration::from_millis(33 * 10));
    assert_eq!(pending(&k, Task::Frame(EmitterKind::Bubbles)), 1);
    k.touch(Point::new(50.0, 50.0));
    k.run_for(Duration::ZERO);
    assert_eq!(pending(&k, Task::Frame(EmitterKind::Bubbles)), 1);

    k.run_for(Duration::from_secs(4));
    assert!(!k.controller().bubbles().is_running());
    assert!(!k.scheduler().is_armed(EmitterKind::Bubbles));
    assert_eq!(pending(&k, Task::Frame(EmitterKind::Bubbles)), 0);
    assert_eq!(k.surface().len(), text_items);
}

#[test]
fn background_swap_drives_a_ripple_chain() {
    let dir = scratch_dir("ripples");
    let bg = dir.join("current.png");
    write_solid(&bg, [255, 255, 255], 1_000);
    let mut k = kiosk(&bg, StaticFeed::always(Some(vec![])));
    k.start();

    k.run_for(Duration::ZERO);
    assert!(!k.scheduler().is_armed(EmitterKind::Ripples));

    write_solid(&bg, [0, 0, 0], 2_000);
    k.run_for(Duration::from_secs(15));
    assert!(k.last_report().unwrap().background.changed);
    assert!(k.scheduler().is_armed(EmitterKind::Ripples));
    assert_eq!(k.controller().ripples().live_count(), 3);

    // 200x120 canvas: max radius 167; the last ring starts at -60 and passes it on tick 46.
    k.run_for(Duration::from_millis(33 * 45));
    assert!(k.controller().ripples().is_running());
    k.run_for(Duration::from_millis(33));
    assert!(!k.controller().ripples().is_running());
    assert!(!k.scheduler().is_armed(EmitterKind::Ripples));
    assert_eq!(pending(&k, Task::Frame(EmitterKind::Ripples)), 0);
}

#[test]
fn from_config_rejects_missing_key() {
    let cfg = KioskConfig::default();
    assert!(Kiosk::from_config(&cfg).is_err());
}

#[test]
fn config_reaches_scheduler_and_background() {
    let dir = scratch_dir("wiring");
    let bg = dir.join("bg.png");
    let k = kiosk(&bg, StaticFeed::always(None));
    assert_eq!(k.scheduler().interval(), Duration::from_millis(33));
    assert_eq!(k.controller().background().path(), bg.as_path());
}
