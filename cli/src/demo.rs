// cli/src/demo.rs
//
// A toy engine session good enough to exercise the bridge from a script:
// a fixed syllable table instead of a language model, no learning.

use std::cell::Cell;

use imbridge_core::{
    keysym, CharType, EngineSession, HistoryContext, HotkeyProfile, KeyEvent, PinyinScheme,
    Preedit, RedrawMask, SessionFactory, ShuangpinLayout, StatusFlag, WindowHandler,
};
use tracing::debug;

const TABLE: &[(&str, &[&str])] = &[
    ("ni", &["你", "呢", "泥", "尼", "拟", "逆", "倪"]),
    ("hao", &["好", "号", "浩", "毫", "耗"]),
    ("nihao", &["你好"]),
    ("zhong", &["中", "种", "重", "众", "钟", "忠"]),
    ("guo", &["国", "过", "果", "锅", "郭"]),
    ("zhongguo", &["中国"]),
    ("wo", &["我", "握", "窝", "沃"]),
    (
        "shi",
        &["是", "十", "时", "事", "使", "市", "式", "世", "室", "试", "视", "石", "师"],
    ),
];

/// Keys that cannot start a pinyin syllable.
const BAD_INITIALS: [char; 3] = ['i', 'u', 'v'];

pub struct DemoHistory {
    power: u32,
}

impl HistoryContext for DemoHistory {
    fn set_history_power(&mut self, power: u32) {
        debug!(power, "demo history power");
        self.power = power;
    }
}

pub struct DemoSession {
    window: usize,
    buffer: String,
    page: usize,
    chinese: bool,
    full_symbol: bool,
    full_punct: bool,
    hotkeys: HotkeyProfile,
    history: DemoHistory,
}

impl DemoSession {
    fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            buffer: String::new(),
            page: 0,
            chinese: true,
            full_symbol: false,
            full_punct: true,
            hotkeys: HotkeyProfile::new(),
            history: DemoHistory { power: 0 },
        }
    }

    pub fn history_power(&self) -> u32 {
        self.history.power
    }

    fn all_candidates(&self) -> Vec<String> {
        let key = self.buffer.replace('\'', "");
        let mut out: Vec<String> = TABLE
            .iter()
            .find(|(syllable, _)| *syllable == key)
            .map(|(_, words)| words.iter().map(|w| w.to_string()).collect())
            .unwrap_or_default();
        out.push(key);
        out
    }

    fn window_candidates(&self) -> Vec<String> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        self.all_candidates()
            .into_iter()
            .skip(self.page * self.window)
            .take(self.window)
            .collect()
    }

    fn preedit(&self) -> Preedit {
        let mut preedit = Preedit::from_text(&self.buffer);
        let mut initial = true;
        for (i, ch) in self.buffer.chars().enumerate() {
            if initial && BAD_INITIALS.contains(&ch) {
                preedit.mark(i..i + 1, CharType::ILLEGAL);
            }
            initial = ch == '\'';
        }
        preedit
    }

    fn show(&self, mask: RedrawMask, win: &mut dyn WindowHandler) {
        if mask.contains(RedrawMask::PREEDIT) {
            win.update_preedit(&self.preedit());
        }
        if mask.contains(RedrawMask::CANDIDATE) {
            win.update_candidates(&self.window_candidates());
        }
    }

    fn turn_page(&mut self, delta: i32, win: &mut dyn WindowHandler) {
        let pages = self.all_candidates().len().div_ceil(self.window);
        let last = pages.saturating_sub(1) as i64;
        let next = (self.page as i64 + delta as i64).clamp(0, last) as usize;
        if next != self.page {
            self.page = next;
            win.update_candidates(&self.window_candidates());
        }
    }

    fn commit(&mut self, text: &str, win: &mut dyn WindowHandler) {
        win.commit(text);
        self.buffer.clear();
        self.page = 0;
        self.show(RedrawMask::all(), win);
    }

    fn full_width(&self, ch: char) -> Option<char> {
        if self.full_punct {
            let punct = match ch {
                ',' => Some('，'),
                '.' => Some('。'),
                '?' => Some('？'),
                '!' => Some('！'),
                ';' => Some('；'),
                ':' => Some('：'),
                _ => None,
            };
            if punct.is_some() {
                return punct;
            }
        }
        if self.full_symbol && ch.is_ascii_graphic() {
            return char::from_u32(ch as u32 + 0xFEE0);
        }
        None
    }
}

impl EngineSession for DemoSession {
    fn on_key_event(&mut self, key: &KeyEvent, win: &mut dyn WindowHandler) -> bool {
        if self.hotkeys.is_mode_switch_key(key) {
            self.chinese = !self.chinese;
            if !self.buffer.is_empty() {
                let raw = self.buffer.clone();
                self.commit(&raw, win);
            }
            win.update_status(StatusFlag::Chinese, self.chinese);
            return true;
        }
        if key.is_release() || !self.chinese {
            return false;
        }

        let composing = !self.buffer.is_empty();
        if composing && (self.hotkeys.is_page_up_key(key) || key.code == keysym::PAGE_UP) {
            self.turn_page(-1, win);
            return true;
        }
        if composing && (self.hotkeys.is_page_down_key(key) || key.code == keysym::PAGE_DOWN) {
            self.turn_page(1, win);
            return true;
        }

        if key.value == 0 {
            return match key.code {
                0x20 if composing => {
                    self.on_candidate_select_request(0, win);
                    true
                }
                keysym::RETURN if composing => {
                    let raw = self.buffer.clone();
                    self.commit(&raw, win);
                    true
                }
                keysym::BACKSPACE if composing => {
                    self.buffer.pop();
                    self.page = 0;
                    self.show(RedrawMask::all(), win);
                    true
                }
                keysym::ESCAPE if composing => {
                    self.buffer.clear();
                    self.page = 0;
                    self.show(RedrawMask::all(), win);
                    true
                }
                _ => false,
            };
        }

        let Some(ch) = key.char() else {
            return false;
        };
        match ch {
            'a'..='z' | '\'' if composing || ch != '\'' => {
                self.buffer.push(ch);
                self.page = 0;
                self.show(RedrawMask::all(), win);
                true
            }
            '1'..='9' if composing => {
                let index = ch as usize - '1' as usize;
                self.on_candidate_select_request(index, win);
                true
            }
            _ if !composing => match self.full_width(ch) {
                Some(wide) => {
                    win.commit(&wide.to_string());
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn on_candidate_page_request(
        &mut self,
        direction: i32,
        relative: bool,
        win: &mut dyn WindowHandler,
    ) {
        if self.buffer.is_empty() {
            return;
        }
        if relative {
            self.turn_page(direction, win);
        } else {
            let page = direction.max(0) - self.page as i32;
            self.turn_page(page, win);
        }
    }

    fn on_candidate_select_request(&mut self, index: usize, win: &mut dyn WindowHandler) {
        if let Some(text) = self.window_candidates().get(index).cloned() {
            self.commit(&text, win);
        }
    }

    fn clear_preedit_and_candidates(&mut self) -> RedrawMask {
        if self.buffer.is_empty() {
            return RedrawMask::empty();
        }
        self.buffer.clear();
        self.page = 0;
        RedrawMask::all()
    }

    fn redraw(&mut self, mask: RedrawMask, win: &mut dyn WindowHandler) {
        self.show(mask, win);
    }

    fn set_status_flag(&mut self, flag: StatusFlag, value: bool) {
        match flag {
            StatusFlag::Chinese => self.chinese = value,
            StatusFlag::FullSymbol => self.full_symbol = value,
            StatusFlag::FullPunct => self.full_punct = value,
        }
    }

    fn status_flag(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Chinese => self.chinese,
            StatusFlag::FullSymbol => self.full_symbol,
            StatusFlag::FullPunct => self.full_punct,
        }
    }

    fn set_hotkey_profile(&mut self, profile: &HotkeyProfile) {
        self.hotkeys = profile.clone();
    }

    fn context(&mut self) -> &mut dyn HistoryContext {
        &mut self.history
    }
}

/// Hands out `DemoSession`s and keeps the settings new sessions start with.
#[derive(Default)]
pub struct DemoFactory {
    scheme: Cell<(PinyinScheme, ShuangpinLayout)>,
    window: Cell<usize>,
    live: Cell<usize>,
}

impl DemoFactory {
    pub fn new() -> Self {
        Self {
            window: Cell::new(10),
            ..Default::default()
        }
    }

    pub fn live_sessions(&self) -> usize {
        self.live.get()
    }

    pub fn scheme(&self) -> (PinyinScheme, ShuangpinLayout) {
        self.scheme.get()
    }
}

impl SessionFactory for DemoFactory {
    type Session = DemoSession;

    fn set_pinyin_scheme(&self, scheme: PinyinScheme, layout: ShuangpinLayout) {
        debug!(?scheme, ?layout, "demo factory scheme");
        self.scheme.set((scheme, layout));
    }

    fn set_candidate_window_size(&self, size: usize) {
        self.window.set(size);
    }

    fn create_session(&self) -> Option<DemoSession> {
        self.live.set(self.live.get() + 1);
        Some(DemoSession::new(self.window.get()))
    }

    fn destroy_session(&self, _session: DemoSession) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}
