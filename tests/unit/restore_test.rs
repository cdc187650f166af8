//! Restore against the in-memory browser: geometry, tab order, pinning,
//! activation, zoom, group recreation and failure handling.

use tabstash::host::memory::{FixtureGroup, FixtureTab, FixtureWindow, HostCall, HostOperation, InMemoryBrowser, LayoutFixture, NEW_TAB_URL};
use tabstash::host::{GroupTarget, GroupUpdate};
use tabstash::services::capture::capture;
use tabstash::services::restore::restore;
use tabstash::services::url_policy::UrlPolicy;
use tabstash::types::browser::{GroupId, WindowType};
use tabstash::types::color::TagColor;
use tabstash::types::display::{DisplayDescriptor, Rect};
use tabstash::types::errors::RestoreError;
use tabstash::types::session::{NormalizedPosition, NormalizedSize, Snapshot, TabRecord, WindowRecord};

fn primary() -> DisplayDescriptor {
    DisplayDescriptor::primary("0", Rect::new(0, 0, 1920, 1080))
}

fn empty_browser() -> InMemoryBrowser {
    InMemoryBrowser::new(vec![primary()])
}

fn record(tabs: Vec<TabRecord>) -> WindowRecord {
    WindowRecord {
        window_type: WindowType::Normal,
        position: NormalizedPosition {
            relative_x: 100.0 / 1920.0,
            relative_y: 50.0 / 1080.0,
        },
        size: NormalizedSize {
            relative_width: 800.0 / 1920.0,
            relative_height: 600.0 / 1080.0,
        },
        source_display: primary(),
        window_bounds: Rect::new(100, 50, 800, 600),
        tabs,
    }
}

fn snapshot(windows: Vec<WindowRecord>) -> Snapshot {
    Snapshot::new("s1", "Test", "2024-05-01 09:30", TagColor::Blue, windows)
}

fn grouped(url: &str, group: i64) -> TabRecord {
    TabRecord {
        group_id: GroupId(group),
        group_title: Some("Research".to_string()),
        group_color: Some(TagColor::Purple),
        group_collapsed: true,
        ..TabRecord::new(url, url)
    }
}

#[tokio::test]
async fn test_restore_reference_window_geometry() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![TabRecord::new("https://a.dev", "A")])]);

    let summary = restore(&host, &snap).await.unwrap();

    assert_eq!(summary.windows.len(), 1);
    let windows = host.current_windows();
    let bounds = windows[0].bounds;
    assert!((bounds.left - 100).abs() <= 1);
    assert!((bounds.top - 50).abs() <= 1);
    assert!((bounds.width - 800).abs() <= 1);
    assert!((bounds.height - 600).abs() <= 1);
}

#[tokio::test]
async fn test_restore_reproduces_tab_order_and_urls() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![
        TabRecord::new("https://a.dev", "A"),
        TabRecord::new("https://b.dev", "B"),
        TabRecord::new("https://c.dev", "C"),
    ])]);

    let summary = restore(&host, &snap).await.unwrap();
    assert_eq!(summary.tabs_restored, 3);

    let urls: Vec<Option<String>> = host.current_windows()[0].tabs.iter().map(|t| t.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            Some("https://a.dev".to_string()),
            Some("https://b.dev".to_string()),
            Some("https://c.dev".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_group_scenario_recreates_one_group() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![
        grouped("https://a.dev", 5),
        TabRecord::new("https://b.dev", "B"),
        grouped("https://c.dev", 5),
    ])]);

    let summary = restore(&host, &snap).await.unwrap();
    assert_eq!(summary.groups_created, 1);

    let window = &host.current_windows()[0];
    let groups = host.current_groups();
    assert_eq!(groups.len(), 1);
    let real = groups[0].id;
    assert_ne!(real, GroupId(5), "captured group ids are not reused");
    assert_eq!(groups[0].window_id, window.id);
    assert_eq!(groups[0].title.as_deref(), Some("Research"));
    assert_eq!(groups[0].color, TagColor::Purple);
    assert!(groups[0].collapsed);

    assert_eq!(window.tabs[0].group_id, real);
    assert!(window.tabs[1].group_id.is_none());
    assert_eq!(window.tabs[2].group_id, real);
}

#[tokio::test]
async fn test_group_calls_follow_first_sighting_then_join() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![
        grouped("https://a.dev", 5),
        TabRecord::new("https://b.dev", "B"),
        grouped("https://c.dev", 5),
    ])]);
    restore(&host, &snap).await.unwrap();

    let group_calls: Vec<HostCall> = host
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HostCall::GroupTabs { .. } | HostCall::UpdateGroup(..)))
        .collect();
    assert_eq!(group_calls.len(), 4);

    let window = &host.current_windows()[0];
    let real = window.tabs[0].group_id;
    assert_eq!(
        group_calls[0],
        HostCall::GroupTabs {
            target: GroupTarget::New(window.id),
            tab_ids: vec![window.tabs[0].id],
            group_id: real,
        }
    );
    assert_eq!(
        group_calls[1],
        HostCall::UpdateGroup(
            real,
            GroupUpdate {
                title: Some("Research".to_string()),
                color: Some(TagColor::Purple),
                collapsed: Some(true),
            }
        )
    );
    assert_eq!(
        group_calls[2],
        HostCall::GroupTabs {
            target: GroupTarget::Existing(real),
            tab_ids: vec![window.tabs[2].id],
            group_id: real,
        }
    );
    assert_eq!(
        group_calls[3],
        HostCall::UpdateGroup(
            real,
            GroupUpdate {
                collapsed: Some(true),
                ..GroupUpdate::default()
            }
        )
    );
}

#[tokio::test]
async fn test_same_group_id_in_two_windows_makes_two_groups() {
    let host = empty_browser();
    let snap = snapshot(vec![
        record(vec![grouped("https://a.dev", 5)]),
        record(vec![grouped("https://b.dev", 5)]),
    ]);

    let summary = restore(&host, &snap).await.unwrap();
    assert_eq!(summary.groups_created, 2);
    let groups = host.current_groups();
    assert_eq!(groups.len(), 2);
    assert_ne!(groups[0].window_id, groups[1].window_id);
}

#[tokio::test]
async fn test_window_without_tabs_restores_blank() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![])]);

    let summary = restore(&host, &snap).await.unwrap();
    assert_eq!(summary.windows.len(), 1);
    assert_eq!(summary.tabs_restored, 0);

    let window = &host.current_windows()[0];
    assert_eq!(window.tabs.len(), 1);
    assert_eq!(window.tabs[0].url.as_deref(), Some(NEW_TAB_URL));

    let calls = host.calls();
    assert_eq!(calls.len(), 1, "only the window is created: {:?}", calls);
    match &calls[0] {
        HostCall::CreateWindow(request) => assert_eq!(request.url, None),
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_pinned_first_tab_and_pinned_later_tabs() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![
        TabRecord {
            pinned: true,
            ..TabRecord::new("https://mail.dev", "Mail")
        },
        TabRecord {
            pinned: true,
            ..TabRecord::new("https://chat.dev", "Chat")
        },
        TabRecord::new("https://a.dev", "A"),
    ])]);

    restore(&host, &snap).await.unwrap();
    let tabs = &host.current_windows()[0].tabs;
    assert_eq!(tabs[0].url.as_deref(), Some("https://mail.dev"));
    assert!(tabs[0].pinned);
    assert_eq!(tabs[1].url.as_deref(), Some("https://chat.dev"));
    assert!(tabs[1].pinned);
    assert!(!tabs[2].pinned);
}

#[tokio::test]
async fn test_active_tab_is_activated_last() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![
        TabRecord::new("https://a.dev", "A"),
        TabRecord {
            active: true,
            ..TabRecord::new("https://b.dev", "B")
        },
        TabRecord::new("https://c.dev", "C"),
    ])]);

    restore(&host, &snap).await.unwrap();
    let tabs = &host.current_windows()[0].tabs;
    let active: Vec<bool> = tabs.iter().map(|t| t.active).collect();
    assert_eq!(active, vec![false, true, false]);

    match host.calls().last() {
        Some(HostCall::UpdateTab(id, update)) => {
            assert_eq!(*id, tabs[1].id);
            assert_eq!(update.active, Some(true));
        }
        other => panic!("expected activation last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_zoom_is_applied_to_every_tab() {
    let host = empty_browser();
    let snap = snapshot(vec![record(vec![
        TabRecord {
            zoom_factor: 1.5,
            ..TabRecord::new("https://a.dev", "A")
        },
        TabRecord {
            zoom_factor: 0.8,
            ..TabRecord::new("https://b.dev", "B")
        },
    ])]);

    restore(&host, &snap).await.unwrap();
    let tabs = &host.current_windows()[0].tabs;
    assert_eq!(host.zoom_of(tabs[0].id), Some(1.5));
    assert_eq!(host.zoom_of(tabs[1].id), Some(0.8));
}

#[tokio::test]
async fn test_zoom_failure_does_not_abort_restore() {
    let host = empty_browser();
    host.fail_operation(HostOperation::SetZoom);
    let snap = snapshot(vec![record(vec![
        TabRecord::new("https://a.dev", "A"),
        TabRecord::new("https://b.dev", "B"),
    ])]);

    let summary = restore(&host, &snap).await.unwrap();
    assert_eq!(summary.zoom_failures, 2);
    assert_eq!(host.current_windows()[0].tabs.len(), 2);
}

#[tokio::test]
async fn test_create_tab_failure_aborts_and_keeps_created_windows() {
    let host = empty_browser();
    host.fail_operation(HostOperation::CreateTab);
    let snap = snapshot(vec![
        record(vec![TabRecord::new("https://a.dev", "A")]),
        record(vec![
            TabRecord::new("https://b.dev", "B"),
            TabRecord::new("https://c.dev", "C"),
        ]),
        record(vec![TabRecord::new("https://d.dev", "D")]),
    ]);

    let err = restore(&host, &snap).await.unwrap_err();
    assert!(matches!(err, RestoreError::Host(_)));
    // First window done, second window opened before its second tab failed.
    assert_eq!(host.current_windows().len(), 2);
}

#[tokio::test]
async fn test_inconsistent_group_is_rejected_before_creating_the_window() {
    let host = empty_browser();
    let mut other = grouped("https://b.dev", 5);
    other.group_color = Some(TagColor::Green);
    let snap = snapshot(vec![record(vec![grouped("https://a.dev", 5), other])]);

    let err = restore(&host, &snap).await.unwrap_err();
    assert_eq!(
        err,
        RestoreError::InconsistentGroup {
            window_index: 0,
            group_id: GroupId(5),
        }
    );
    assert!(host.current_windows().is_empty());
}

#[tokio::test]
async fn test_invalid_geometry_is_rejected() {
    let host = empty_browser();
    let mut bad = record(vec![TabRecord::new("https://a.dev", "A")]);
    bad.size.relative_width = f64::NAN;
    let snap = snapshot(vec![record(vec![]), bad]);

    let err = restore(&host, &snap).await.unwrap_err();
    assert_eq!(err, RestoreError::InvalidGeometry { window_index: 1 });
}

#[tokio::test]
async fn test_restore_without_displays_fails() {
    let host = InMemoryBrowser::new(vec![]);
    let snap = snapshot(vec![record(vec![TabRecord::new("https://a.dev", "A")])]);
    assert_eq!(restore(&host, &snap).await.unwrap_err(), RestoreError::NoDisplays);
}

#[tokio::test]
async fn test_unknown_source_display_restores_onto_first_display() {
    let small = DisplayDescriptor::primary("laptop", Rect::new(0, 0, 1280, 800));
    let host = InMemoryBrowser::new(vec![small]);
    let mut captured = record(vec![TabRecord::new("https://a.dev", "A")]);
    captured.source_display = DisplayDescriptor::primary("4k", Rect::new(0, 0, 3840, 2160));
    captured.position = NormalizedPosition {
        relative_x: 0.5,
        relative_y: 0.5,
    };
    captured.size = NormalizedSize {
        relative_width: 0.5,
        relative_height: 0.5,
    };

    restore(&host, &snapshot(vec![captured])).await.unwrap();
    assert_eq!(host.current_windows()[0].bounds, Rect::new(640, 400, 640, 400));
}

#[tokio::test]
async fn test_capture_then_restore_on_fresh_browser() {
    let source = InMemoryBrowser::from_fixture(LayoutFixture {
        displays: vec![primary()],
        windows: vec![
            FixtureWindow {
                window_type: WindowType::Normal,
                bounds: Rect::new(100, 50, 800, 600),
                tabs: vec![
                    FixtureTab {
                        pinned: true,
                        ..FixtureTab::new("https://mail.dev")
                    },
                    FixtureTab {
                        group: Some(0),
                        active: true,
                        zoom: 1.1,
                        ..FixtureTab::new("https://a.dev")
                    },
                    FixtureTab {
                        group: Some(0),
                        ..FixtureTab::new("https://b.dev")
                    },
                    FixtureTab::new("chrome://settings"),
                ],
                groups: vec![FixtureGroup {
                    title: Some("Work".to_string()),
                    color: TagColor::Cyan,
                    collapsed: false,
                }],
            },
            FixtureWindow {
                window_type: WindowType::Normal,
                bounds: Rect::new(960, 0, 960, 1080),
                tabs: vec![FixtureTab::new("https://c.dev")],
                groups: vec![],
            },
        ],
    });
    let snap = capture(&source, "round trip", &UrlPolicy::default()).await.unwrap();

    let target = empty_browser();
    let summary = restore(&target, &snap).await.unwrap();
    assert_eq!(summary.windows.len(), 2);
    assert_eq!(summary.tabs_restored, 4);
    assert_eq!(summary.groups_created, 1);

    let before = source.current_windows();
    let after = target.current_windows();
    for (b, a) in before.iter().zip(after.iter()) {
        assert!((a.bounds.left - b.bounds.left).abs() <= 1);
        assert!((a.bounds.top - b.bounds.top).abs() <= 1);
        assert!((a.bounds.width - b.bounds.width).abs() <= 1);
        assert!((a.bounds.height - b.bounds.height).abs() <= 1);
    }

    let tabs = &after[0].tabs;
    assert_eq!(tabs.len(), 3);
    assert!(tabs[0].pinned);
    assert!(tabs[1].active);
    assert_eq!(tabs[1].group_id, tabs[2].group_id);
    assert!(tabs[1].group_id.is_some());
    assert_eq!(target.zoom_of(tabs[1].id), Some(1.1));
    assert_eq!(target.current_groups()[0].color, TagColor::Cyan);
}

#[tokio::test]
async fn test_zero_area_window_survives_capture_and_restore() {
    let source = InMemoryBrowser::from_fixture(LayoutFixture {
        displays: vec![primary()],
        windows: vec![
            FixtureWindow {
                window_type: WindowType::Normal,
                bounds: Rect::new(100, 100, 0, 0),
                tabs: vec![FixtureTab::new("https://a.dev")],
                groups: vec![],
            },
            FixtureWindow {
                window_type: WindowType::Normal,
                bounds: Rect::new(0, 0, 800, 600),
                tabs: vec![FixtureTab::new("https://b.dev")],
                groups: vec![],
            },
        ],
    });
    let snap = capture(&source, "tiny", &UrlPolicy::default()).await.unwrap();
    assert_eq!(snap.windows()[0].size.relative_width, 0.0);
    assert_eq!(snap.windows()[0].size.relative_height, 0.0);

    let target = empty_browser();
    let summary = restore(&target, &snap).await.unwrap();
    assert_eq!(summary.windows.len(), 2);
    assert_eq!(summary.tabs_restored, 2);

    let after = target.current_windows();
    assert_eq!(after[0].bounds, Rect::new(100, 100, 1, 1));
    assert_eq!(after[0].tabs[0].url.as_deref(), Some("https://a.dev"));
    assert_eq!(after[1].bounds, Rect::new(0, 0, 800, 600));
}
