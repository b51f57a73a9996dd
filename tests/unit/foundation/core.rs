use super::*;

#[test]
fn canvas_center_and_diagonal() {
    let c = Canvas::new(800, 480);
    assert_eq!(c.center(), Point::new(400.0, 240.0));
    let d = c.diagonal();
    assert!((d - 932.952_303_175_248).abs() < 1e-6);

    let odd = Canvas::new(801, 481);
    assert_eq!(odd.center(), Point::new(400.0, 240.0));
    assert!(Canvas::new(0, 10).is_empty());
}

#[test]
fn colors() {
    assert_eq!(Rgba8::default(), Rgba8 { r: 0, g: 0, b: 0, a: 0 });
    assert_eq!(Rgba8::BLACK, Rgba8::opaque(0, 0, 0));
    assert_eq!(Rgba8::WHITE.a, 255);
}
