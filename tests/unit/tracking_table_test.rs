//! Unit tests for the workspace/window tracking table.

use tabspace::managers::tracking_table::TrackingTable;
use tabspace::types::browser::BrowserTab;

fn tab(id: i64, window_id: i64, index: i64) -> BrowserTab {
    BrowserTab {
        id: Some(id),
        window_id,
        index,
        title: Some(format!("tab {}", id)),
        url: Some(format!("https://example.com/{}", id)),
        pinned: false,
        active: false,
    }
}

#[test]
fn test_activate_and_lookup_both_ways() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, vec![tab(1, 10, 0)]);

    assert_eq!(table.window_for_workspace("ws-a"), Some(10));
    assert_eq!(table.workspace_for_window(10), Some("ws-a"));
    assert!(table.is_tracked_window(10));
    assert_eq!(table.len(), 1);
    assert_eq!(table.window_tabs(10).map(|t| t.len()), Some(1));
}

#[test]
fn test_untracked_window_operations_are_noops() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, Vec::new());
    let before = table.clone();

    assert!(!table.add_tab_to_window(tab(5, 99, 0)));
    assert!(!table.replace_window_tabs(99, vec![tab(5, 99, 0)]));
    assert!(!table.set_tab_pinned(99, 5, true));
    assert_eq!(table, before);
    assert!(table.workspace_for_window(99).is_none());
}

#[test]
fn test_add_and_replace_tabs() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, vec![tab(1, 10, 0)]);

    assert!(table.add_tab_to_window(tab(2, 10, 1)));
    assert_eq!(table.window_tabs(10).unwrap().len(), 2);

    assert!(table.replace_window_tabs(10, vec![tab(3, 10, 0)]));
    let tabs = table.window_tabs(10).unwrap();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].id, Some(3));
}

#[test]
fn test_set_tab_pinned_only_touches_matching_tab() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, vec![tab(1, 10, 0), tab(2, 10, 1)]);

    assert!(table.set_tab_pinned(10, 2, true));
    assert!(!table.set_tab_pinned(10, 77, true));
    let tabs = table.window_tabs(10).unwrap();
    assert!(!tabs[0].pinned);
    assert!(tabs[1].pinned);
}

#[test]
fn test_reactivate_in_new_window_drops_old_cache() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, vec![tab(1, 10, 0)]);
    table.activate("ws-a", 20, vec![tab(2, 20, 0)]);

    assert_eq!(table.window_for_workspace("ws-a"), Some(20));
    assert!(table.window_tabs(10).is_none());
    assert!(!table.is_tracked_window(10));
}

#[test]
fn test_deactivate_returns_last_tabs() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, vec![tab(1, 10, 0)]);

    let (window_id, tabs) = table.deactivate("ws-a").unwrap();
    assert_eq!(window_id, 10);
    assert_eq!(tabs.len(), 1);
    assert!(table.is_empty());
    assert!(table.deactivate("ws-a").is_none());
}

#[test]
fn test_state_round_trip() {
    let mut table = TrackingTable::new();
    table.activate("ws-a", 10, vec![tab(1, 10, 0)]);
    table.activate("ws-b", 11, Vec::new());

    let state = table.to_state();
    let json = serde_json::to_string(&state).unwrap();
    let restored = TrackingTable::from_state(serde_json::from_str(&json).unwrap());
    assert_eq!(restored, table);
}
