//! In-memory browser used by tests and the headless host.
//!
//! Mirrors the event behaviour the engine relies on: new tabs fire
//! `TabCreated` then a `TabUpdated` with `status = complete`, closing a window
//! fires `TabRemoved { is_window_closing: true }` per tab then `WindowRemoved`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::BrowserApi;
use crate::types::browser::{
    Badge, BrowserEvent, BrowserTab, BrowserWindow, CreateTabOptions, CreateWindowOptions,
    TabChangeInfo, WindowKind,
};
use crate::types::errors::BrowserError;

pub const NEW_TAB_URL: &str = "chrome://newtab/";

#[derive(Default)]
struct MockState {
    next_id: i64,
    windows: BTreeMap<i64, Vec<BrowserTab>>,
    window_kinds: HashMap<i64, WindowKind>,
    badges: HashMap<i64, Badge>,
    focused: Option<i64>,
    failing_urls: HashSet<String>,
    /// tab id -> polls left before a requested pin becomes visible
    pending_pins: HashMap<i64, u32>,
    pin_lag: u32,
    emit_ready: bool,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn reindex(tabs: &mut [BrowserTab]) {
        for (i, tab) in tabs.iter_mut().enumerate() {
            tab.index = i as i64;
        }
    }

    fn find_tab_mut(&mut self, tab_id: i64) -> Option<&mut BrowserTab> {
        self.windows
            .values_mut()
            .flat_map(|tabs| tabs.iter_mut())
            .find(|t| t.id == Some(tab_id))
    }
}

pub struct MockBrowser {
    state: Mutex<MockState>,
    events: UnboundedSender<BrowserEvent>,
}

impl MockBrowser {
    /// Creates the browser and the receiving end of its event stream.
    pub fn new() -> (Self, UnboundedReceiver<BrowserEvent>) {
        let (tx, rx) = unbounded_channel();
        let state = MockState {
            next_id: 100,
            emit_ready: true,
            ..MockState::default()
        };
        (
            Self {
                state: Mutex::new(state),
                events: tx,
            },
            rx,
        )
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn emit(&self, event: BrowserEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn emit_created(&self, tab: &BrowserTab, emit_ready: bool) {
        self.emit(BrowserEvent::TabCreated { tab: tab.clone() });
        if emit_ready {
            if let Some(id) = tab.id {
                self.emit(BrowserEvent::TabUpdated {
                    tab_id: id,
                    change: TabChangeInfo {
                        status: Some("complete".to_string()),
                        ..TabChangeInfo::default()
                    },
                    tab: tab.clone(),
                });
            }
        }
    }

    /// Makes tab creation for `url` fail.
    pub fn fail_url(&self, url: &str) {
        self.state().failing_urls.insert(url.to_string());
    }

    /// Number of `get_tab` polls before a pin request becomes visible.
    pub fn set_pin_lag(&self, polls: u32) {
        self.state().pin_lag = polls;
    }

    /// Whether new tabs fire the "complete" update the engine waits for.
    pub fn set_emit_ready(&self, emit: bool) {
        self.state().emit_ready = emit;
    }

    pub fn window_ids(&self) -> Vec<i64> {
        self.state().windows.keys().copied().collect()
    }

    pub fn window_count(&self) -> usize {
        self.state().windows.len()
    }

    pub fn window_kind(&self, window_id: i64) -> Option<WindowKind> {
        self.state().window_kinds.get(&window_id).copied()
    }

    pub fn tabs_of(&self, window_id: i64) -> Vec<BrowserTab> {
        self.state().windows.get(&window_id).cloned().unwrap_or_default()
    }

    pub fn badge(&self, window_id: i64) -> Option<Badge> {
        self.state().badges.get(&window_id).cloned()
    }

    pub fn focused_window(&self) -> Option<i64> {
        self.state().focused
    }

    /// Simulates the user opening a tab at the end of a window.
    pub fn user_open_tab(&self, window_id: i64, url: &str) -> Option<BrowserTab> {
        let (tab, emit_ready) = {
            let mut st = self.state();
            let id = st.next_id();
            let tabs = st.windows.get_mut(&window_id)?;
            let tab = BrowserTab {
                id: Some(id),
                window_id,
                index: tabs.len() as i64,
                title: Some(url.to_string()),
                url: Some(url.to_string()),
                pinned: false,
                active: false,
            };
            tabs.push(tab.clone());
            (tab, st.emit_ready)
        };
        self.emit_created(&tab, emit_ready);
        Some(tab)
    }

    /// Simulates the user dragging a tab to another position.
    pub fn user_move_tab(&self, tab_id: i64, new_index: usize) -> bool {
        let window_id = {
            let mut st = self.state();
            let mut moved = None;
            for (wid, tabs) in st.windows.iter_mut() {
                if let Some(pos) = tabs.iter().position(|t| t.id == Some(tab_id)) {
                    let tab = tabs.remove(pos);
                    let at = new_index.min(tabs.len());
                    tabs.insert(at, tab);
                    MockState::reindex(tabs);
                    moved = Some(*wid);
                    break;
                }
            }
            moved
        };
        match window_id {
            Some(window_id) => {
                self.emit(BrowserEvent::TabMoved { tab_id, window_id });
                true
            }
            None => false,
        }
    }

    /// Simulates dragging a tab out of its window and dropping it at the end of another.
    pub fn user_move_tab_to_window(&self, tab_id: i64, new_window_id: i64) -> bool {
        let old_window_id = {
            let mut st = self.state();
            if !st.windows.contains_key(&new_window_id) {
                return false;
            }
            let mut detached = None;
            for (wid, tabs) in st.windows.iter_mut() {
                if let Some(pos) = tabs.iter().position(|t| t.id == Some(tab_id)) {
                    let tab = tabs.remove(pos);
                    MockState::reindex(tabs);
                    detached = Some((*wid, tab));
                    break;
                }
            }
            let Some((old_window_id, mut tab)) = detached else {
                return false;
            };
            if let Some(tabs) = st.windows.get_mut(&new_window_id) {
                tab.window_id = new_window_id;
                tabs.push(tab);
                MockState::reindex(tabs);
            }
            old_window_id
        };
        self.emit(BrowserEvent::TabDetached {
            tab_id,
            old_window_id,
        });
        self.emit(BrowserEvent::TabAttached {
            tab_id,
            new_window_id,
        });
        true
    }

    /// Simulates the user closing a single tab.
    pub fn user_close_tab(&self, tab_id: i64) -> bool {
        let window_id = {
            let mut st = self.state();
            let mut found = None;
            for (wid, tabs) in st.windows.iter_mut() {
                if let Some(pos) = tabs.iter().position(|t| t.id == Some(tab_id)) {
                    tabs.remove(pos);
                    MockState::reindex(tabs);
                    found = Some(*wid);
                    break;
                }
            }
            found
        };
        match window_id {
            Some(window_id) => {
                self.emit(BrowserEvent::TabRemoved {
                    tab_id,
                    window_id,
                    is_window_closing: false,
                });
                true
            }
            None => false,
        }
    }

    /// Simulates the user toggling a tab's pin from the tab strip.
    pub fn user_toggle_pin(&self, tab_id: i64) -> Option<BrowserTab> {
        let tab = {
            let mut st = self.state();
            let tab = st.find_tab_mut(tab_id)?;
            tab.pinned = !tab.pinned;
            tab.clone()
        };
        self.emit(BrowserEvent::TabUpdated {
            tab_id,
            change: TabChangeInfo {
                pinned: Some(tab.pinned),
                ..TabChangeInfo::default()
            },
            tab: tab.clone(),
        });
        Some(tab)
    }

    /// Closes a window the way the browser reports it.
    pub fn user_close_window(&self, window_id: i64) -> bool {
        let removed = {
            let mut st = self.state();
            st.window_kinds.remove(&window_id);
            st.badges.remove(&window_id);
            if st.focused == Some(window_id) {
                st.focused = None;
            }
            st.windows.remove(&window_id)
        };
        let Some(tabs) = removed else {
            return false;
        };
        for tab in tabs {
            if let Some(tab_id) = tab.id {
                self.emit(BrowserEvent::TabRemoved {
                    tab_id,
                    window_id,
                    is_window_closing: true,
                });
            }
        }
        self.emit(BrowserEvent::WindowRemoved { window_id });
        true
    }

    /// Removes a window without firing any event, as happens when events are missed.
    pub fn drop_window_silently(&self, window_id: i64) {
        let mut st = self.state();
        st.windows.remove(&window_id);
        st.window_kinds.remove(&window_id);
    }
}

#[async_trait]
impl BrowserApi for MockBrowser {
    async fn create_window(&self, options: CreateWindowOptions) -> Result<BrowserWindow, BrowserError> {
        let url = options.url.unwrap_or_else(|| NEW_TAB_URL.to_string());
        let (window, emit_ready) = {
            let mut st = self.state();
            if st.failing_urls.contains(&url) {
                return Err(BrowserError::Api(format!("Cannot open {}", url)));
            }
            let window_id = st.next_id();
            let tab_id = st.next_id();
            let tab = BrowserTab {
                id: Some(tab_id),
                window_id,
                index: 0,
                title: Some(url.clone()),
                url: Some(url),
                pinned: false,
                active: true,
            };
            st.windows.insert(window_id, vec![tab.clone()]);
            st.window_kinds.insert(window_id, options.kind);
            if options.focused {
                st.focused = Some(window_id);
            }
            (
                BrowserWindow {
                    id: window_id,
                    focused: options.focused,
                    tabs: vec![tab],
                },
                st.emit_ready,
            )
        };
        if let Some(tab) = window.tabs.first() {
            self.emit_created(tab, emit_ready);
        }
        Ok(window)
    }

    async fn focus_window(&self, window_id: i64) -> Result<(), BrowserError> {
        let mut st = self.state();
        if !st.windows.contains_key(&window_id) {
            return Err(BrowserError::WindowNotFound(window_id));
        }
        st.focused = Some(window_id);
        Ok(())
    }

    async fn create_tab(&self, options: CreateTabOptions) -> Result<BrowserTab, BrowserError> {
        let (tab, emit_ready) = {
            let mut st = self.state();
            if st.failing_urls.contains(&options.url) {
                return Err(BrowserError::Api(format!("Cannot open {}", options.url)));
            }
            if !st.windows.contains_key(&options.window_id) {
                return Err(BrowserError::WindowNotFound(options.window_id));
            }
            let tab_id = st.next_id();
            let emit_ready = st.emit_ready;
            let tabs = st
                .windows
                .get_mut(&options.window_id)
                .ok_or(BrowserError::WindowNotFound(options.window_id))?;
            let at = options
                .index
                .map(|i| (i.max(0) as usize).min(tabs.len()))
                .unwrap_or(tabs.len());
            tabs.insert(
                at,
                BrowserTab {
                    id: Some(tab_id),
                    window_id: options.window_id,
                    index: at as i64,
                    title: Some(options.url.clone()),
                    url: Some(options.url.clone()),
                    pinned: false,
                    active: options.active,
                },
            );
            MockState::reindex(tabs);
            (tabs[at].clone(), emit_ready)
        };
        self.emit_created(&tab, emit_ready);
        Ok(tab)
    }

    async fn get_tab(&self, tab_id: i64) -> Result<BrowserTab, BrowserError> {
        let (tab, became_pinned) = {
            let mut st = self.state();
            let mut became_pinned = false;
            if let Some(left) = st.pending_pins.get_mut(&tab_id) {
                if *left <= 1 {
                    st.pending_pins.remove(&tab_id);
                    became_pinned = true;
                } else {
                    *left -= 1;
                }
            }
            let tab = st.find_tab_mut(tab_id).ok_or(BrowserError::TabNotFound(tab_id))?;
            if became_pinned {
                tab.pinned = true;
            }
            (tab.clone(), became_pinned)
        };
        if became_pinned {
            self.emit(BrowserEvent::TabUpdated {
                tab_id,
                change: TabChangeInfo {
                    pinned: Some(true),
                    ..TabChangeInfo::default()
                },
                tab: tab.clone(),
            });
        }
        Ok(tab)
    }

    async fn set_tab_pinned(&self, tab_id: i64, pinned: bool) -> Result<BrowserTab, BrowserError> {
        let (tab, changed) = {
            let mut st = self.state();
            let lag = st.pin_lag;
            if pinned && lag > 0 {
                st.pending_pins.entry(tab_id).or_insert(lag);
                let tab = st.find_tab_mut(tab_id).ok_or(BrowserError::TabNotFound(tab_id))?;
                (tab.clone(), false)
            } else {
                let tab = st.find_tab_mut(tab_id).ok_or(BrowserError::TabNotFound(tab_id))?;
                let changed = tab.pinned != pinned;
                tab.pinned = pinned;
                (tab.clone(), changed)
            }
        };
        if changed {
            self.emit(BrowserEvent::TabUpdated {
                tab_id,
                change: TabChangeInfo {
                    pinned: Some(pinned),
                    ..TabChangeInfo::default()
                },
                tab: tab.clone(),
            });
        }
        Ok(tab)
    }

    async fn query_tabs(&self, window_id: i64) -> Result<Vec<BrowserTab>, BrowserError> {
        self.state()
            .windows
            .get(&window_id)
            .cloned()
            .ok_or(BrowserError::WindowNotFound(window_id))
    }

    async fn set_badge(&self, window_id: i64, badge: &Badge) -> Result<(), BrowserError> {
        let mut st = self.state();
        if !st.windows.contains_key(&window_id) {
            return Err(BrowserError::WindowNotFound(window_id));
        }
        st.badges.insert(window_id, badge.clone());
        Ok(())
    }
}
