// core/src/engine.rs
//
// Interfaces of the input-method engine the bridge drives. The engine itself
// (decoding, candidate generation, history learning) lives elsewhere; the
// bridge only sees a session object created by a process-wide factory.

use std::rc::Rc;

use crate::composition::Preedit;
use crate::config::{PinyinScheme, ShuangpinLayout};
use crate::error::BridgeError;
use crate::hotkey::HotkeyProfile;
use crate::key::KeyEvent;

/// Engine status flags mirrored by the toggle groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    /// Chinese input on (off means English passthrough)
    Chinese,
    /// Full-width letters and symbols
    FullSymbol,
    /// Full-width punctuation
    FullPunct,
}

bitflags::bitflags! {
    /// Regions of the host UI an engine operation touched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RedrawMask: u32 {
        const PREEDIT   = 1 << 0;
        const CANDIDATE = 1 << 1;
    }
}

/// Callbacks an engine session issues while handling a request.
///
/// Sessions call these synchronously from inside `on_key_event` and the
/// other request methods; implementations must not assume deferred delivery.
pub trait WindowHandler {
    /// Commit finished text to the application.
    fn commit(&mut self, text: &str);

    /// Replace the preedit. An empty preedit means nothing is being composed.
    fn update_preedit(&mut self, preedit: &Preedit);

    /// Replace the visible candidate window. Empty means no candidates.
    fn update_candidates(&mut self, candidates: &[String]);

    /// A status flag changed on the engine side.
    fn update_status(&mut self, flag: StatusFlag, value: bool);
}

/// Per-session decoding context.
pub trait HistoryContext {
    /// Set how strongly input history weighs on candidate ranking.
    fn set_history_power(&mut self, power: u32);
}

/// A live engine session.
pub trait EngineSession {
    /// Handle a key. Returns whether the session consumed it.
    fn on_key_event(&mut self, key: &KeyEvent, win: &mut dyn WindowHandler) -> bool;

    /// Move the candidate window. `direction` is a page offset when
    /// `relative`, otherwise an absolute page index.
    fn on_candidate_page_request(
        &mut self,
        direction: i32,
        relative: bool,
        win: &mut dyn WindowHandler,
    );

    /// Select a candidate of the visible window. The session validates the index.
    fn on_candidate_select_request(&mut self, index: usize, win: &mut dyn WindowHandler);

    /// Drop in-flight preedit and candidates. Returns the regions that changed.
    fn clear_preedit_and_candidates(&mut self) -> RedrawMask;

    /// Re-send the current contents of the regions in `mask`.
    fn redraw(&mut self, mask: RedrawMask, win: &mut dyn WindowHandler);

    fn set_status_flag(&mut self, flag: StatusFlag, value: bool);

    fn status_flag(&self, flag: StatusFlag) -> bool;

    fn set_hotkey_profile(&mut self, profile: &HotkeyProfile);

    fn context(&mut self) -> &mut dyn HistoryContext;
}

/// Process-wide registry creating and releasing engine sessions.
///
/// Factories are shared between bridges, so every method takes `&self`.
pub trait SessionFactory {
    type Session: EngineSession;

    /// Scheme applied to sessions created from now on.
    fn set_pinyin_scheme(&self, scheme: PinyinScheme, layout: ShuangpinLayout);

    /// Window size applied to sessions created from now on.
    fn set_candidate_window_size(&self, size: usize);

    fn create_session(&self) -> Option<Self::Session>;

    fn destroy_session(&self, session: Self::Session);
}

/// Scoped ownership of a session created by a factory.
///
/// The session goes back to its factory exactly once: on the first
/// `release` call or on drop, whichever comes first.
pub struct SessionHandle<F: SessionFactory> {
    factory: Rc<F>,
    session: Option<F::Session>,
}

impl<F: SessionFactory> SessionHandle<F> {
    /// Create a session from `factory`.
    pub fn acquire(factory: Rc<F>) -> Result<Self, BridgeError> {
        let session = factory
            .create_session()
            .ok_or(BridgeError::SessionUnavailable)?;
        Ok(Self {
            factory,
            session: Some(session),
        })
    }

    pub fn session(&self) -> Option<&F::Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut F::Session> {
        self.session.as_mut()
    }

    pub fn factory(&self) -> &Rc<F> {
        &self.factory
    }

    pub fn is_released(&self) -> bool {
        self.session.is_none()
    }

    /// Return the session to its factory. Returns false if it was already
    /// released.
    pub fn release(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                self.factory.destroy_session(session);
                true
            }
            None => false,
        }
    }
}

impl<F: SessionFactory> Drop for SessionHandle<F> {
    fn drop(&mut self) {
        self.release();
    }
}
