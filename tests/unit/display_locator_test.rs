//! Tests for display selection: which display a window is on at capture time,
//! and which live display a captured window goes back to.

use rstest::rstest;

use tabstash::services::display_locator::{best_match, is_same_display, locate};
use tabstash::types::browser::WindowType;
use tabstash::types::display::{DisplayDescriptor, Rect};
use tabstash::types::session::{NormalizedPosition, NormalizedSize, WindowRecord};

fn display(id: &str, left: i32, top: i32, width: i32, height: i32) -> DisplayDescriptor {
    DisplayDescriptor {
        id: id.to_string(),
        bounds: Rect::new(left, top, width, height),
        work_area: Rect::new(left, top, width, height),
        is_primary: false,
        is_internal: false,
        rotation: 0,
    }
}

/// Laptop panel on the left, external monitor to its right.
fn dual_setup() -> Vec<DisplayDescriptor> {
    let mut laptop = display("internal", 0, 0, 1920, 1080);
    laptop.is_primary = true;
    laptop.is_internal = true;
    vec![laptop, display("external", 1920, 0, 2560, 1440)]
}

fn captured_on(source: DisplayDescriptor) -> WindowRecord {
    WindowRecord {
        window_type: WindowType::Normal,
        position: NormalizedPosition::default(),
        size: NormalizedSize {
            relative_width: 0.5,
            relative_height: 0.5,
        },
        window_bounds: source.bounds,
        source_display: source,
        tabs: vec![],
    }
}

// === locate ===

#[rstest]
#[case::inside_laptop(Rect::new(100, 50, 800, 600), "internal")]
#[case::inside_external(Rect::new(2000, 100, 800, 600), "external")]
#[case::mostly_external(Rect::new(1800, 100, 800, 600), "external")]
#[case::mostly_laptop(Rect::new(1300, 100, 800, 600), "internal")]
#[case::offscreen(Rect::new(-5000, -5000, 100, 100), "internal")]
fn test_locate_by_overlap(#[case] bounds: Rect, #[case] expected: &str) {
    let displays = dual_setup();
    assert_eq!(locate(&displays, &bounds).unwrap().id, expected);
}

#[test]
fn test_locate_tie_goes_to_first_listed() {
    let displays = vec![display("a", 0, 0, 1000, 1000), display("b", 1000, 0, 1000, 1000)];
    // 200px on each side of the seam.
    let bounds = Rect::new(800, 0, 400, 400);
    assert_eq!(locate(&displays, &bounds).unwrap().id, "a");

    let reversed = vec![displays[1].clone(), displays[0].clone()];
    assert_eq!(locate(&reversed, &bounds).unwrap().id, "b");
}

#[test]
fn test_locate_single_display_always_wins() {
    let displays = vec![display("only", 0, 0, 1280, 720)];
    assert_eq!(locate(&displays, &Rect::new(5000, 5000, 10, 10)).unwrap().id, "only");
}

#[test]
fn test_locate_without_displays() {
    assert!(locate(&[], &Rect::new(0, 0, 100, 100)).is_none());
}

// === is_same_display ===

#[test]
fn test_same_display_after_id_change_matches_on_position() {
    let source = display("old-id", 1920, 0, 2560, 1440);
    let live = display("new-id", 1920, 0, 2560, 1440);
    assert!(is_same_display(&live, &source));
}

#[test]
fn test_same_id_moved_display_still_matches() {
    let source = display("ext", 1920, 0, 2560, 1440);
    let live = display("ext", -2560, 200, 2560, 1440);
    assert!(is_same_display(&live, &source));
}

#[rstest]
#[case::different_work_area(display("ext", 1920, 0, 1920, 1080))]
#[case::nothing_positional_in_common(display("other", 0, 1080, 2560, 1440))]
fn test_not_same_display(#[case] live: DisplayDescriptor) {
    let source = display("ext", 1920, 0, 2560, 1440);
    assert!(!is_same_display(&live, &source));
}

#[test]
fn test_rotation_and_flags_must_match() {
    let source = display("ext", 1920, 0, 2560, 1440);

    let mut rotated = source.clone();
    rotated.rotation = 90;
    assert!(!is_same_display(&rotated, &source));

    let mut primary = source.clone();
    primary.is_primary = true;
    assert!(!is_same_display(&primary, &source));

    let mut internal = source.clone();
    internal.is_internal = true;
    assert!(!is_same_display(&internal, &source));
}

// === best_match ===

#[test]
fn test_best_match_finds_source_display() {
    let displays = dual_setup();
    let record = captured_on(displays[1].clone());
    assert_eq!(best_match(&displays, &record).unwrap().id, "external");
}

#[test]
fn test_best_match_falls_back_to_first_display() {
    let displays = dual_setup();
    let record = captured_on(display("gone", 5000, 5000, 3840, 2160));
    assert_eq!(best_match(&displays, &record).unwrap().id, "internal");
}

#[test]
fn test_best_match_without_displays() {
    let record = captured_on(display("gone", 0, 0, 100, 100));
    assert!(best_match(&[], &record).is_none());
}
