//! Property-based tests for the compact sync codec.
//!
//! Any `Persist` survives compress/decompress unchanged, and no input string
//! makes `decompress` panic.

use proptest::option;
use proptest::prelude::*;

use tabspace::services::codec::{compress, decompress};
use tabspace::types::persist::Persist;
use tabspace::types::settings::{Settings, SyncMode, ThemeMode};
use tabspace::types::workspace::{Workspace, WorkspaceTab};

const SAFE: i64 = 9_007_199_254_740_991;

fn tab_strategy() -> impl Strategy<Value = WorkspaceTab> {
    (-1i64..100_000, 0i64..64, "\\PC{0,24}", "\\PC{0,48}", any::<bool>()).prop_map(
        |(id, index, title, url, pinned)| WorkspaceTab {
            id,
            index,
            title,
            url,
            pinned,
        },
    )
}

fn workspace_strategy() -> impl Strategy<Value = Workspace> {
    (
        "wid-[0-9]{13}-[0-9a-z]{16}",
        "\\PC{0,20}",
        "#[0-9a-f]{6}",
        proptest::collection::vec(tab_strategy(), 0..6),
        (0..SAFE, 0..SAFE),
        option::of(1i64..100_000),
        prop_oneof![Just(String::new()), "[0-9a-f]{64}"],
        "\\PC{0,12}",
        (option::of(0u32..10), option::of(0..SAFE)),
    )
        .prop_map(
            |(id, name, color, tabs, (created_at, last_opened), window_id, password, passpeek, (failed_attempts, lock_until))| {
                Workspace {
                    id,
                    name,
                    color,
                    tabs,
                    created_at,
                    last_opened,
                    window_id,
                    password,
                    passpeek,
                    failed_attempts,
                    lock_until,
                }
            },
        )
}

fn settings_strategy() -> impl Strategy<Value = Settings> {
    (
        prop_oneof![Just(ThemeMode::Auto), Just(ThemeMode::Light), Just(ThemeMode::Dark)],
        any::<bool>(),
    )
        .prop_map(|(theme, sync)| Settings {
            theme,
            sync: SyncMode::from(sync),
        })
}

fn persist_strategy() -> impl Strategy<Value = Persist> {
    (
        0..SAFE,
        proptest::collection::vec(workspace_strategy(), 0..5),
        settings_strategy(),
    )
        .prop_map(|(timestamp, workspaces, settings)| Persist {
            timestamp,
            workspaces,
            settings,
        })
}

// **Property: codec round trip**
//
// *For any* Persist P, decompress(compress(P)) == P.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn compress_then_decompress_is_identity(persist in persist_strategy()) {
        let text = compress(&persist).expect("compress should succeed");
        let decoded = decompress(&text);
        prop_assert_eq!(decoded, Some(persist));
    }

    #[test]
    fn arbitrary_text_never_panics(input in "\\PC{0,200}") {
        // Either rejected or decoded; never a panic.
        let _ = decompress(&input);
    }
}

#[test]
fn malformed_input_is_none() {
    assert!(decompress("").is_none());
    assert!(decompress("not base64 !!").is_none());
    // Valid base64, not a deflate stream.
    assert!(decompress("aGVsbG8gd29ybGQ=").is_none());
}

#[test]
fn compact_form_is_smaller_than_json() {
    let workspace = Workspace {
        id: "wid-1700000000000-abcdefghijklmnop".to_string(),
        name: "Research".to_string(),
        color: "#1f6feb".to_string(),
        tabs: (0..20)
            .map(|i| WorkspaceTab {
                id: -1,
                index: i,
                title: format!("Paper {}", i),
                url: format!("https://example.org/papers/{}", i),
                pinned: i == 0,
            })
            .collect(),
        created_at: 1_700_000_000_000,
        last_opened: 1_700_000_100_000,
        window_id: None,
        password: String::new(),
        passpeek: String::new(),
        failed_attempts: None,
        lock_until: None,
    };
    let persist = Persist {
        timestamp: 1_700_000_200_000,
        workspaces: vec![workspace],
        settings: Settings::default(),
    };

    let plain = serde_json::to_string(&persist).unwrap();
    let compact = compress(&persist).unwrap();
    assert!(compact.len() < plain.len());
}
