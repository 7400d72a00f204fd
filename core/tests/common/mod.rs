// core/tests/common/mod.rs
//
// Recording doubles for the engine and host sides of the bridge.
//
// Every call made on the factory, the session, its context or the host is
// appended to one shared log, so tests can assert on the order of effects
// across both sides.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use imbridge_core::{
    BridgeConfig, EngineSession, HistoryContext, Host, HotkeyProfile, KeyEvent, LookupTable,
    PinyinScheme, Preedit, PreeditText, Property, RedrawMask, SessionBridge, SessionFactory,
    ShuangpinLayout, StatusFlag, WindowHandler,
};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    // factory
    SetScheme(PinyinScheme, ShuangpinLayout),
    SetWindowSize(usize),
    Create,
    Destroy,
    // session
    HistoryPower(u32),
    SetHotkeys(HotkeyProfile),
    Key(KeyEvent),
    PageRequest(i32, bool),
    Select(usize),
    Clear,
    Redraw(RedrawMask),
    SetStatus(StatusFlag, bool),
    // host
    Commit(String),
    Preedit(String),
    HidePreedit,
    Lookup(Vec<String>, usize),
    HideLookup,
    Register(Vec<String>),
    UpdateProperty(String, String),
    LaunchSetup,
}

pub type Log = Rc<RefCell<Vec<Call>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct RecordingContext {
    log: Log,
}

impl HistoryContext for RecordingContext {
    fn set_history_power(&mut self, power: u32) {
        self.log.borrow_mut().push(Call::HistoryPower(power));
    }
}

/// A tiny engine: lowercase letters compose, every composition offers
/// `CANDIDATES` candidates paged by the factory window size, space commits
/// the highlighted first candidate of the current page.
pub struct RecordingSession {
    log: Log,
    context: RecordingContext,
    window: usize,
    hotkeys: HotkeyProfile,
    buffer: String,
    page: usize,
    chinese: bool,
    full_symbol: bool,
    full_punct: bool,
}

pub const CANDIDATES: usize = 25;

impl RecordingSession {
    fn candidates(&self) -> Vec<String> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        (0..CANDIDATES)
            .skip(self.page * self.window)
            .take(self.window)
            .map(|i| format!("{}{}", self.buffer, i))
            .collect()
    }

    fn page_count(&self) -> usize {
        CANDIDATES.div_ceil(self.window)
    }

    fn show(&self, mask: RedrawMask, win: &mut dyn WindowHandler) {
        if mask.contains(RedrawMask::PREEDIT) {
            win.update_preedit(&Preedit::from_text(&self.buffer));
        }
        if mask.contains(RedrawMask::CANDIDATE) {
            win.update_candidates(&self.candidates());
        }
    }

    fn turn_page(&mut self, delta: i32, win: &mut dyn WindowHandler) {
        let last = self.page_count() as i32 - 1;
        let next = (self.page as i32 + delta).clamp(0, last.max(0)) as usize;
        if next != self.page {
            self.page = next;
            win.update_candidates(&self.candidates());
        }
    }

    fn flag_mut(&mut self, flag: StatusFlag) -> &mut bool {
        match flag {
            StatusFlag::Chinese => &mut self.chinese,
            StatusFlag::FullSymbol => &mut self.full_symbol,
            StatusFlag::FullPunct => &mut self.full_punct,
        }
    }
}

impl EngineSession for RecordingSession {
    fn on_key_event(&mut self, key: &KeyEvent, win: &mut dyn WindowHandler) -> bool {
        self.log.borrow_mut().push(Call::Key(*key));

        if self.hotkeys.is_mode_switch_key(key) {
            self.chinese = !self.chinese;
            win.update_status(StatusFlag::Chinese, self.chinese);
            return true;
        }
        if key.is_release() {
            return false;
        }
        if !self.buffer.is_empty() && self.hotkeys.is_page_up_key(key) {
            self.turn_page(-1, win);
            return true;
        }
        if !self.buffer.is_empty() && self.hotkeys.is_page_down_key(key) {
            self.turn_page(1, win);
            return true;
        }
        // whitespace arrives code-matched
        if key.value == 0 && key.code == ' ' as u32 && !self.buffer.is_empty() {
            self.on_candidate_select_request(0, win);
            return true;
        }
        match key.char() {
            Some(ch) if ch.is_ascii_lowercase() => {
                self.buffer.push(ch);
                self.page = 0;
                self.show(RedrawMask::all(), win);
                true
            }
            _ => false,
        }
    }

    fn on_candidate_page_request(
        &mut self,
        direction: i32,
        relative: bool,
        win: &mut dyn WindowHandler,
    ) {
        self.log
            .borrow_mut()
            .push(Call::PageRequest(direction, relative));
        if relative {
            self.turn_page(direction, win);
        }
    }

    fn on_candidate_select_request(&mut self, index: usize, win: &mut dyn WindowHandler) {
        self.log.borrow_mut().push(Call::Select(index));
        let Some(text) = self.candidates().get(index).cloned() else {
            return;
        };
        win.commit(&text);
        self.buffer.clear();
        self.page = 0;
        self.show(RedrawMask::all(), win);
    }

    fn clear_preedit_and_candidates(&mut self) -> RedrawMask {
        self.log.borrow_mut().push(Call::Clear);
        self.buffer.clear();
        self.page = 0;
        RedrawMask::all()
    }

    fn redraw(&mut self, mask: RedrawMask, win: &mut dyn WindowHandler) {
        self.log.borrow_mut().push(Call::Redraw(mask));
        self.show(mask, win);
    }

    fn set_status_flag(&mut self, flag: StatusFlag, value: bool) {
        self.log.borrow_mut().push(Call::SetStatus(flag, value));
        *self.flag_mut(flag) = value;
    }

    fn status_flag(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Chinese => self.chinese,
            StatusFlag::FullSymbol => self.full_symbol,
            StatusFlag::FullPunct => self.full_punct,
        }
    }

    fn set_hotkey_profile(&mut self, profile: &HotkeyProfile) {
        self.log.borrow_mut().push(Call::SetHotkeys(profile.clone()));
        self.hotkeys = profile.clone();
    }

    fn context(&mut self) -> &mut dyn HistoryContext {
        &mut self.context
    }
}

pub struct RecordingFactory {
    pub log: Log,
    pub available: bool,
    pub window: Cell<usize>,
}

impl RecordingFactory {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            available: true,
            window: Cell::new(10),
        }
    }

    pub fn unavailable(log: Log) -> Self {
        Self {
            available: false,
            ..Self::new(log)
        }
    }
}

impl SessionFactory for RecordingFactory {
    type Session = RecordingSession;

    fn set_pinyin_scheme(&self, scheme: PinyinScheme, layout: ShuangpinLayout) {
        self.log.borrow_mut().push(Call::SetScheme(scheme, layout));
    }

    fn set_candidate_window_size(&self, size: usize) {
        self.log.borrow_mut().push(Call::SetWindowSize(size));
        self.window.set(size);
    }

    fn create_session(&self) -> Option<RecordingSession> {
        if !self.available {
            return None;
        }
        self.log.borrow_mut().push(Call::Create);
        Some(RecordingSession {
            log: self.log.clone(),
            context: RecordingContext {
                log: self.log.clone(),
            },
            window: self.window.get(),
            hotkeys: HotkeyProfile::new(),
            buffer: String::new(),
            page: 0,
            chinese: true,
            full_symbol: false,
            full_punct: true,
        })
    }

    fn destroy_session(&self, _session: RecordingSession) {
        self.log.borrow_mut().push(Call::Destroy);
    }
}

/// Host double that records calls and keeps what would be on screen.
pub struct RecordingHost {
    log: Log,
    pub preedit: Option<PreeditText>,
    pub lookup: Vec<String>,
    pub lookup_cursor: usize,
    pub properties: Vec<Property>,
    pub committed: String,
}

impl RecordingHost {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            preedit: None,
            lookup: Vec::new(),
            lookup_cursor: 0,
            properties: Vec::new(),
            committed: String::new(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }
}

impl Host for RecordingHost {
    fn commit_text(&mut self, text: &str) {
        self.log.borrow_mut().push(Call::Commit(text.to_string()));
        self.committed.push_str(text);
    }

    fn update_preedit_text(&mut self, preedit: &PreeditText) {
        self.log.borrow_mut().push(Call::Preedit(preedit.text.clone()));
        self.preedit = Some(preedit.clone());
    }

    fn hide_preedit_text(&mut self) {
        self.log.borrow_mut().push(Call::HidePreedit);
        self.preedit = None;
    }

    fn update_lookup_table(&mut self, table: &LookupTable<'_>, _visible: bool) {
        self.log
            .borrow_mut()
            .push(Call::Lookup(table.candidates.to_vec(), table.cursor));
        self.lookup = table.candidates.to_vec();
        self.lookup_cursor = table.cursor;
    }

    fn hide_lookup_table(&mut self) {
        self.log.borrow_mut().push(Call::HideLookup);
        self.lookup.clear();
    }

    fn register_properties(&mut self, properties: &[Property]) {
        self.log
            .borrow_mut()
            .push(Call::Register(properties.iter().map(|p| p.key.clone()).collect()));
        self.properties = properties.to_vec();
    }

    fn update_property(&mut self, property: &Property) {
        self.log
            .borrow_mut()
            .push(Call::UpdateProperty(property.key.clone(), property.label.clone()));
        if let Some(slot) = self.properties.iter_mut().find(|p| p.key == property.key) {
            *slot = property.clone();
        }
    }

    fn launch_setup(&mut self) {
        self.log.borrow_mut().push(Call::LaunchSetup);
    }
}

pub type TestBridge = SessionBridge<RecordingFactory, RecordingHost>;

/// Build a focused bridge over fresh doubles and return it with its log.
pub fn bridge_with(config: BridgeConfig) -> (TestBridge, Rc<RecordingFactory>, Log) {
    let log = new_log();
    let factory = Rc::new(RecordingFactory::new(log.clone()));
    let host = RecordingHost::new(log.clone());
    let mut bridge = SessionBridge::new(factory.clone(), host, config);
    bridge.focus_in();
    (bridge, factory, log)
}

pub fn bridge() -> (TestBridge, Rc<RecordingFactory>, Log) {
    bridge_with(BridgeConfig::default())
}

/// Drain the log.
pub fn take(log: &Log) -> Vec<Call> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Host key value, code and modifiers for a printable character.
pub fn press(ch: char) -> (u32, u32, u32) {
    (ch as u32, 0x1e, 0)
}
