use heapless::{String as StackString, Vec as StackVec};
use log::{debug, trace};

use crate::buffers::{DualBuffer, MAX_CHARS};
use crate::chars::Char;
use crate::config::EngineConfig;
use crate::history::WordHistory;
use crate::keys;
use crate::modes::{InputMethod, Mode, mode_for};
use crate::modifier::{ComposeOptions, Composer};
use crate::restore::{self, Decision, RestoreInput};
use crate::shortcut::{Expansion, Shortcut, ShortcutTable, TriggerCondition};
use crate::validation::SyllableState;

/// Most characters one key result can carry.
pub const MAX_OUTPUT: usize = 256;

const PREFIX_LEN: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Action {
    /// Let the key through untouched.
    #[default]
    None = 0,
    /// Replace the end of the text.
    Send = 1,
    /// Replace the word with the keys as typed.
    Restore = 2,
}

/// What the host does for one key: delete `backspace` characters, insert
/// `chars`, then forward the key itself when `forward_key` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyResult {
    pub action: Action,
    pub backspace: u8,
    pub chars: StackVec<char, MAX_OUTPUT>,
    pub forward_key: bool,
}

impl Default for KeyResult {
    fn default() -> Self {
        Self::none()
    }
}

impl KeyResult {
    pub fn none() -> Self {
        Self {
            action: Action::None,
            backspace: 0,
            chars: StackVec::new(),
            forward_key: true,
        }
    }

    fn replace(
        action: Action,
        backspace: usize,
        text: impl IntoIterator<Item = char>,
        boundary: Option<char>,
        forward_key: bool,
    ) -> Self {
        let mut chars = StackVec::new();
        for c in text.into_iter().chain(boundary.filter(|_| !forward_key)) {
            if chars.push(c).is_err() {
                break;
            }
        }
        Self {
            action,
            backspace: backspace.min(usize::from(u8::MAX)) as u8,
            chars,
            forward_key,
        }
    }

    /// Key swallowed without anything to redraw.
    fn swallowed() -> Self {
        Self::replace(Action::Send, 0, core::iter::empty(), None, false)
    }

    #[inline(always)]
    pub fn is_none(&self) -> bool {
        self.action == Action::None
    }

    /// This edit, then `next` as the result of `typed`, as one edit.
    fn followed_by(mut self, next: &KeyResult, typed: char) -> Self {
        self.forward_key = false;
        if next.is_none() {
            let _ = self.chars.push(typed);
            return self;
        }
        for _ in 0..next.backspace {
            if self.chars.pop().is_none() {
                self.backspace = self.backspace.saturating_add(1);
            }
        }
        for &c in &next.chars {
            if self.chars.push(c).is_err() {
                break;
            }
        }
        if next.forward_key {
            let _ = self.chars.push(typed);
        }
        self
    }

    /// Plays the result onto `screen` like a host text field. `typed` is what
    /// the key produces by itself (`'\u{8}'` deletes one character, Esc
    /// inserts nothing).
    pub fn apply_to(&self, screen: &mut String, typed: Option<char>) {
        if self.action != Action::None {
            for _ in 0..self.backspace {
                screen.pop();
            }
            screen.extend(self.chars.iter());
            if !self.forward_key {
                return;
            }
        }
        match typed {
            Some('\u{8}') => {
                screen.pop();
            }
            Some('\u{1b}') | None => {}
            Some(c) => screen.push(c),
        }
    }
}

type Rendered = StackVec<char, MAX_CHARS>;

/// One typing session: the word being composed, recent words and settings.
/// Hosts keep one engine per input context and feed it from a single thread.
pub struct Engine {
    config: EngineConfig,
    mode: &'static Mode,
    word: Composer,
    history: WordHistory,
    shortcuts: ShortcutTable,
    /// Punctuation typed right before the current word.
    prefix: StackString<PREFIX_LEN>,
    /// A single space typed after the last committed word.
    spaces_after_commit: u8,
    capitalize: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Shortcuts listed in `config` move into the engine's table.
    pub fn with_config(mut config: EngineConfig) -> Self {
        let mut shortcuts = ShortcutTable::new();
        for s in core::mem::take(&mut config.shortcuts) {
            shortcuts.add(s);
        }
        Self {
            mode: mode_for(config.method),
            config,
            word: Composer::new(),
            history: WordHistory::new(),
            shortcuts,
            prefix: StackString::new(),
            spaces_after_commit: 0,
            capitalize: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn set_input_method(&mut self, method: InputMethod) {
        debug!("input method {method:?}");
        self.config.method = method;
        self.mode = mode_for(method);
        self.clear();
    }

    pub fn input_method(&self) -> InputMethod {
        self.config.method
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        debug!("enabled {enabled}");
        self.config.enabled = enabled;
        self.clear_all();
    }

    pub fn set_modern_tone(&mut self, on: bool) {
        self.config.modern_tone = on;
    }

    pub fn set_skip_w_shortcut(&mut self, on: bool) {
        self.config.skip_w_shortcut = on;
    }

    pub fn set_bracket_shortcut(&mut self, on: bool) {
        self.config.bracket_shortcut = on;
    }

    pub fn set_esc_restore(&mut self, on: bool) {
        self.config.esc_restore = on;
    }

    pub fn set_english_auto_restore(&mut self, on: bool) {
        self.config.english_auto_restore = on;
    }

    pub fn set_auto_capitalize(&mut self, on: bool) {
        self.config.auto_capitalize = on;
        if !on {
            self.capitalize = false;
        }
    }

    pub fn add_shortcut(&mut self, shortcut: Shortcut) -> bool {
        self.shortcuts.add(shortcut)
    }

    pub fn remove_shortcut(&mut self, trigger: &str) -> bool {
        self.shortcuts.remove(trigger).is_some()
    }

    pub fn clear_shortcuts(&mut self) {
        self.shortcuts.clear();
    }

    pub fn set_shortcuts(&mut self, table: ShortcutTable) {
        self.shortcuts = table;
    }

    /// Forgets the current word.
    pub fn clear(&mut self) {
        self.word.clear();
        self.prefix.clear();
        self.spaces_after_commit = 0;
    }

    /// Forgets the current word and every committed one, e.g. on focus change.
    pub fn clear_all(&mut self) {
        self.clear();
        self.history.clear();
        self.capitalize = false;
    }

    /// Makes `word` the current word, as if it had just been typed.
    /// Returns false when it holds characters the engine cannot compose.
    pub fn restore_word(&mut self, word: &str) -> bool {
        let mut buf = DualBuffer::new();
        for ch in word.chars() {
            let Some(c) = Char::from_char(ch) else {
                return false;
            };
            if buf.push_char(c).is_err() {
                return false;
            }
        }
        if buf.rebuild_raw(self.mode).is_err() {
            return false;
        }
        self.clear();
        self.word.load(buf);
        debug!("reopened {word:?}");
        true
    }

    pub fn buffer_string(&self) -> String {
        self.word.buffer().render().collect()
    }

    pub fn raw_string(&self) -> String {
        self.word.buffer().raw_chars().collect()
    }

    pub fn state(&self) -> SyllableState {
        self.word.state()
    }

    /// Convenience for text-driven hosts: types `ch` on a US layout.
    pub fn feed(&mut self, ch: char) -> KeyResult {
        match keys::from_char(ch) {
            Some((key, shift)) => self.process_key(key, false, false, shift),
            None => {
                self.clear();
                KeyResult::none()
            }
        }
    }

    /// Handles one key press, `key` being a code from [`keys`].
    pub fn process_key(&mut self, key: u16, caps: bool, ctrl: bool, shift: bool) -> KeyResult {
        if ctrl {
            trace!("ctrl combination ends the word");
            self.clear();
            self.capitalize = false;
            return KeyResult::none();
        }
        if !self.config.enabled {
            return KeyResult::none();
        }
        match key {
            keys::DELETE => self.on_delete(),
            keys::ESC => self.on_cancel(),
            keys::SPACE => self.on_boundary(' ', false),
            keys::TAB => self.on_boundary('\t', true),
            keys::RETURN | keys::ENTER => {
                let result = self.on_boundary('\n', true);
                self.capitalize = self.config.auto_capitalize;
                result
            }
            k if keys::is_cursor(k) => {
                self.clear_all();
                KeyResult::none()
            }
            _ => match keys::to_char(key, caps, shift) {
                Some(ch) if ch.is_ascii_alphanumeric() => self.on_word_key(ch),
                Some(ch) => self.on_symbol(ch),
                None => KeyResult::none(),
            },
        }
    }

    fn options(&self) -> ComposeOptions {
        ComposeOptions {
            modern_tone: self.config.modern_tone,
            skip_w_shortcut: self.config.skip_w_shortcut,
        }
    }

    fn rendered(&self) -> Rendered {
        self.word.buffer().render().collect()
    }

    fn on_word_key(&mut self, ch: char) -> KeyResult {
        if self.word.overflowed() {
            return KeyResult::none();
        }
        if self.word.starts_new_word(ch as u8, self.mode) {
            let sealed = self.seal_foreign();
            let result = self.compose(ch);
            if sealed.is_none() {
                return result;
            }
            return sealed.followed_by(&result, ch);
        }
        self.compose(ch)
    }

    fn compose(&mut self, ch: char) -> KeyResult {
        let mut byte = ch as u8;
        if core::mem::take(&mut self.capitalize) && self.word.is_empty() {
            byte = byte.to_ascii_uppercase();
        }
        self.spaces_after_commit = 0;
        let before = self.rendered();
        let opts = self.options();
        if !self.word.push_key(byte, self.mode, opts) {
            return KeyResult::none();
        }
        if let Some(result) = self.immediate_shortcut(before.len()) {
            return result;
        }
        self.redraw(&before, ch)
    }

    fn on_symbol(&mut self, ch: char) -> KeyResult {
        if self.config.bracket_shortcut
            && self.config.method == InputMethod::Telex
            && matches!(ch, ']' | '[')
        {
            let before = self.rendered();
            let base = if ch == ']' { b'u' } else { b'o' };
            let opts = self.options();
            if self.word.push_bracket(ch as u8, base, opts) {
                self.spaces_after_commit = 0;
                return self.redraw(&before, ch);
            }
        }
        let result = self.commit(ch, false);
        self.spaces_after_commit = 0;
        if self.prefix.push(ch).is_err() {
            self.prefix.clear();
        }
        self.capitalize = self.config.auto_capitalize && keys::ends_sentence(ch);
        result
    }

    /// Ends a foreign word without a boundary key, putting back its typed keys
    /// when they differ from what is on screen.
    fn seal_foreign(&mut self) -> KeyResult {
        let result = match restore::decide_restart(self.word.buffer()) {
            Decision::Restore => KeyResult::replace(
                Action::Restore,
                self.word.buffer().len(),
                self.word.buffer().raw_chars(),
                None,
                false,
            ),
            Decision::Keep => KeyResult::none(),
        };
        debug!("foreign word ends before a new initial");
        self.word.clear();
        self.prefix.clear();
        result
    }

    /// Result for the word having changed from `before` after `typed`.
    fn redraw(&self, before: &[char], typed: char) -> KeyResult {
        let after = self.rendered();
        let n = before.len();
        if after.len() == n + 1 && after[..n] == *before && after[n] == typed {
            return KeyResult::none();
        }
        if after.as_slice() == before {
            return KeyResult::swallowed();
        }
        trace!("redraw {n} -> {}", after.len());
        KeyResult::replace(Action::Send, n, after, None, false)
    }

    /// Looks the word up, with its punctuation prefix first. Returns the
    /// expansion and whether the prefix is part of the match.
    fn find_shortcut(&self, condition: TriggerCondition) -> Option<(Expansion, bool)> {
        if self.shortcuts.is_empty() || self.word.is_empty() || self.word.overflowed() {
            return None;
        }
        let method = self.config.method;
        let mut text: StackString<128> = StackString::new();
        if !self.prefix.is_empty() {
            text.push_str(&self.prefix).ok()?;
            for c in self.word.buffer().render() {
                text.push(c).ok()?;
            }
            if let Some(e) = self.shortcuts.lookup(&text, method, condition) {
                return Some((e, true));
            }
            text.clear();
        }
        for c in self.word.buffer().render() {
            text.push(c).ok()?;
        }
        self.shortcuts
            .lookup(&text, method, condition)
            .map(|e| (e, false))
    }

    fn immediate_shortcut(&mut self, on_screen: usize) -> Option<KeyResult> {
        let (expansion, with_prefix) = self.find_shortcut(TriggerCondition::Immediate)?;
        let backspace = on_screen + if with_prefix { self.prefix.len() } else { 0 };
        debug!("immediate shortcut, {backspace} characters replaced");
        self.word.clear();
        self.prefix.clear();
        Some(KeyResult::replace(Action::Send, backspace, expansion, None, false))
    }

    /// Ends the current word with `boundary`.
    fn on_boundary(&mut self, boundary: char, forward_key: bool) -> KeyResult {
        let committed = !self.word.is_empty() && !self.word.overflowed();
        let result = self.commit(boundary, forward_key);
        self.prefix.clear();
        self.spaces_after_commit = u8::from(committed && boundary == ' ');
        result
    }

    fn commit(&mut self, boundary: char, forward_key: bool) -> KeyResult {
        if self.word.is_empty() {
            return KeyResult::none();
        }
        let word_len = self.word.buffer().len();

        if let Some((expansion, with_prefix)) = self.find_shortcut(TriggerCondition::OnWordBoundary)
        {
            let backspace = word_len + if with_prefix { self.prefix.len() } else { 0 };
            debug!("shortcut expanded at boundary");
            self.word.clear();
            self.prefix.clear();
            return KeyResult::replace(
                Action::Send,
                backspace,
                expansion,
                Some(boundary),
                forward_key,
            );
        }

        let decision = restore::decide(&RestoreInput {
            buffer: self.word.buffer(),
            history: self.word.history(),
            mode: self.mode,
            overflowed: self.word.overflowed(),
            english_auto_restore: self.config.english_auto_restore,
        });
        // a truncated word cannot be reopened
        let remember = !self.word.overflowed();
        let result = match decision {
            Decision::Keep => {
                if remember {
                    self.history.push(self.word.buffer());
                }
                KeyResult::none()
            }
            Decision::Restore => {
                let result = KeyResult::replace(
                    Action::Restore,
                    word_len,
                    self.word.buffer().raw_chars(),
                    Some(boundary),
                    forward_key,
                );
                if remember {
                    self.history.push(&literal_word(self.word.buffer()));
                }
                result
            }
        };
        debug!("word committed: {decision:?}");
        self.word.clear();
        self.prefix.clear();
        result
    }

    fn on_delete(&mut self) -> KeyResult {
        if self.word.overflowed() {
            return KeyResult::none();
        }
        if !self.word.is_empty() {
            self.word.backspace(self.mode);
            return KeyResult::none();
        }
        if self.prefix.pop().is_some() {
            return KeyResult::none();
        }
        if core::mem::take(&mut self.spaces_after_commit) > 0 {
            if let Some(word) = self.history.pop() {
                trace!("backspace reopens the previous word");
                self.word.load(word);
            }
        }
        KeyResult::none()
    }

    /// ESC: put the typed keys back when enabled.
    fn on_cancel(&mut self) -> KeyResult {
        if self.word.is_empty() || self.word.overflowed() {
            self.clear();
            return KeyResult::none();
        }
        let result = match restore::decide_cancel(self.word.buffer(), self.config.esc_restore) {
            Decision::Restore => {
                debug!("cancel restores the typed keys");
                KeyResult::replace(
                    Action::Restore,
                    self.word.buffer().len(),
                    self.word.buffer().raw_chars(),
                    None,
                    false,
                )
            }
            Decision::Keep => KeyResult::none(),
        };
        self.clear();
        result
    }
}

/// The word as its raw keys, each a plain character.
fn literal_word(word: &DualBuffer) -> DualBuffer {
    let mut out = DualBuffer::new();
    for k in word.raw() {
        if out.push_literal(k.byte).is_err() {
            break;
        }
    }
    out
}
