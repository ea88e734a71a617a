//! Per-word composition: every in-word key goes through the syllable state
//! machine, then tones, vowel marks and the stroke are applied, deferred or
//! reverted on the dual buffer.

use heapless::Vec;
use log::{debug, trace, warn};

use crate::buffers::{DualBuffer, MAX_CHARS, Overflow, Transform};
use crate::chars::{Char, Mark, Tone};
use crate::modes::{
    InputMethod, KeyCategory, MARK_BREVE, MARK_CIRCUMFLEX, MARK_HORN, Mode, TONE_REMOVE,
};
use crate::phonology;
use crate::restore::TransformHistory;
use crate::syllable::{self, parse, tone_position, toned};
use crate::validation::{Action, SyllableState, derive, dispatch, validate};

/// A transform waiting on the next key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pending {
    #[default]
    None,
    /// Telex `w` after a word-final `a` stays a letter until a final consonant
    /// confirms ă ("raw" vs "răn").
    Breve { pos: u8, literal: u8, raw: u8 },
    /// Horn for the vowel at `pos`, applied once the next key shows ươ.
    Horn { pos: u8 },
    /// Telex `d` after the vowel of an untouched word ("ded"): strokes the
    /// initial only if the next key marks the vowel ("dede" → đê).
    Stroke { literal: u8, raw: u8 },
    /// `key` just undid a transform; pressing it again types it once more.
    MarkRevert { key: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComposeOptions {
    pub modern_tone: bool,
    pub skip_w_shortcut: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            modern_tone: true,
            skip_w_shortcut: false,
        }
    }
}

type Scratch = Vec<Char, MAX_CHARS>;

/// Whether `chars` with the mark edits applied is still a valid prefix.
fn valid_with(chars: &[Char], edits: &[(usize, Mark)]) -> bool {
    let Ok(mut scratch) = Scratch::from_slice(chars) else {
        return false;
    };
    for &(pos, mark) in edits {
        match scratch.get_mut(pos) {
            Some(c) => c.mark = mark,
            None => return false,
        }
    }
    validate(&scratch, false)
}

fn valid_after_push(chars: &[Char], c: Char) -> bool {
    let Ok(mut scratch) = Scratch::from_slice(chars) else {
        return false;
    };
    scratch.push(c).is_ok() && validate(&scratch, false)
}

fn ends_in_stop(chars: &[Char]) -> bool {
    let s = parse(chars);
    s.has_final() && phonology::is_stop_final(&syllable::bases(chars, s.final_))
}

#[derive(Clone, Debug, Default)]
pub struct Composer {
    buf: DualBuffer,
    state: SyllableState,
    pending: Pending,
    history: TransformHistory,
    overflow: bool,
    /// Position of a ư typed with a lone `w`.
    w_vowel_at: Option<u8>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.state = SyllableState::Empty;
        self.pending = Pending::None;
        self.history = TransformHistory::default();
        self.overflow = false;
        self.w_vowel_at = None;
    }

    #[inline(always)]
    pub fn buffer(&self) -> &DualBuffer {
        &self.buf
    }

    #[inline(always)]
    pub fn state(&self) -> SyllableState {
        self.state
    }

    #[inline(always)]
    pub fn pending(&self) -> Pending {
        self.pending
    }

    #[inline(always)]
    pub fn history(&self) -> &TransformHistory {
        &self.history
    }

    #[inline(always)]
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reopens a committed word for editing.
    pub fn load(&mut self, word: DualBuffer) {
        self.clear();
        self.history.any = !word.render_eq_raw();
        self.buf = word;
        self.state = derive(self.buf.chars());
    }

    /// Whether `byte` opens a new word after the foreign one in the buffer.
    /// Runs of digits never split ("149k").
    pub fn starts_new_word(&self, byte: u8, mode: &Mode) -> bool {
        !self.overflow
            && dispatch(self.state, mode.category(byte.to_ascii_lowercase())).0 == Action::Restart
            && self.buf.chars().iter().any(|c| c.base.is_ascii_lowercase())
    }

    /// Feeds one in-word key. Returns false when the key was not recorded
    /// because the word no longer fits.
    pub fn push_key(&mut self, byte: u8, mode: &Mode, opts: ComposeOptions) -> bool {
        if self.overflow {
            return false;
        }
        match self.step(byte, mode, opts) {
            Ok(()) => true,
            Err(Overflow) => {
                self.mark_overflow();
                false
            }
        }
    }

    /// Types ư or ơ (`base` u or o) for a bracket key. Returns false when the
    /// vowel does not fit the word.
    pub fn push_bracket(&mut self, byte: u8, base: u8, opts: ComposeOptions) -> bool {
        if self.overflow
            || self.state == SyllableState::Foreign
            || matches!(
                self.pending,
                Pending::Breve { .. } | Pending::Horn { .. } | Pending::Stroke { .. }
            )
        {
            return false;
        }
        let c = Char {
            mark: Mark::Horn,
            ..Char::literal(base, false)
        };
        if !valid_after_push(self.buf.chars(), c) {
            return false;
        }
        let pushed = self
            .buf
            .push_composed(c, byte, false)
            .and_then(|()| {
                self.pending = Pending::None;
                self.history.any = true;
                self.settle(opts)
            });
        if pushed.is_err() {
            self.mark_overflow();
            return false;
        }
        true
    }

    /// Deletes the last composed character.
    pub fn backspace(&mut self, mode: &Mode) {
        self.pending = Pending::None;
        let Some(c) = self.buf.pop_char() else {
            self.clear();
            return;
        };
        let typed_as_is = c.is_plain()
            && self
                .buf
                .raw()
                .last()
                .is_some_and(|k| !k.consumed && k.byte.to_ascii_lowercase() == c.base);
        if typed_as_is {
            self.buf.pop_raw();
        } else if self.buf.rebuild_raw(mode).is_err() {
            self.mark_overflow();
            return;
        }
        if self.buf.chars().is_empty() {
            self.clear();
            return;
        }
        let len = self.buf.len() as u8;
        if self.history.inferred_stroke.is_some_and(|at| at >= len) {
            self.history.inferred_stroke = None;
        }
        if self.w_vowel_at.is_some_and(|at| at >= len) {
            self.w_vowel_at = None;
        }
        self.state = derive(self.buf.chars());
        trace!("backspace -> {:?}", self.state);
    }

    fn mark_overflow(&mut self) {
        warn!("word longer than {MAX_CHARS} characters, passing keys through");
        self.overflow = true;
        self.pending = Pending::None;
        self.state = SyllableState::Foreign;
    }

    fn step(&mut self, byte: u8, mode: &Mode, opts: ComposeOptions) -> Result<(), Overflow> {
        let key = byte.to_ascii_lowercase();
        let category = mode.category(key);
        let mut keep_horn = None;

        match core::mem::take(&mut self.pending) {
            Pending::None => {}
            Pending::Breve { pos, literal, raw } => {
                if matches!(category, KeyCategory::Final | KeyCategory::Stop) {
                    self.buf.remove_char(usize::from(literal));
                    if let Some(c) = self.buf.get_mut(usize::from(pos)) {
                        c.mark = Mark::Breve;
                    }
                    self.buf.set_consumed(usize::from(raw), true);
                    self.history.any = true;
                    trace!("breve confirmed at {pos}");
                    self.settle(opts)?;
                } else if category == KeyCategory::Tone {
                    return self.tone_under_breve(byte, mode, opts, (pos, literal, raw));
                } else {
                    trace!("breve dropped");
                    self.enter_foreign()?;
                }
            }
            Pending::Horn { pos } => {
                if matches!(category, KeyCategory::Final | KeyCategory::Stop)
                    || matches!(key, b'i' | b'u')
                {
                    if let Some(c) = self.buf.get_mut(usize::from(pos)) {
                        c.mark = Mark::Horn;
                    }
                    self.history.any = true;
                    self.settle(opts)?;
                } else if category == KeyCategory::Tone {
                    keep_horn = Some(pos);
                }
            }
            Pending::Stroke { literal, raw } => {
                if self.confirms_stroke(key, category, mode) {
                    self.buf.remove_char(usize::from(literal));
                    self.buf.set_consumed(usize::from(raw), true);
                    if let Some(c) = self.buf.get_mut(0) {
                        c.stroke = true;
                    }
                    self.history.inferred_stroke = Some(literal);
                    self.history.any = true;
                    trace!("stroke confirmed");
                }
                self.settle(opts)?;
            }
            Pending::MarkRevert { key: last } if last == key => {
                self.pending = Pending::MarkRevert { key: last };
                return self.append(byte, SyllableState::Foreign, opts);
            }
            Pending::MarkRevert { .. } => {}
        }

        let (action, next) = dispatch(self.state, category);
        let applied = match action {
            Action::AppendInitial | Action::AppendFinal | Action::Literal => {
                self.append(byte, next, opts)?;
                true
            }
            // the host did not split the word, so the key joins it
            Action::Restart => {
                self.append(byte, SyllableState::Foreign, opts)?;
                true
            }
            Action::AppendVowel => {
                self.vowel(byte, next, mode, opts)?;
                true
            }
            Action::Tone => self.tone(byte, mode, opts)?,
            Action::Mark => self.mark(byte, mode, opts)?,
            Action::Stroke => self.stroke(byte, mode, opts)?,
        };
        if !applied {
            trace!("{:?} typed as a letter", byte as char);
            self.buf.push_literal(byte)?;
            self.settle(opts)?;
        }

        if let Some(pos) = keep_horn {
            if self.pending == Pending::None && self.state != SyllableState::Foreign {
                self.pending = Pending::Horn { pos };
            }
        }
        Ok(())
    }

    /// Re-derives the state after a transform.
    fn settle(&mut self, opts: ComposeOptions) -> Result<(), Overflow> {
        self.state = derive(self.buf.chars());
        if self.state == SyllableState::Foreign {
            return self.enter_foreign();
        }
        self.relocate_tone(opts.modern_tone);
        Ok(())
    }

    fn append(
        &mut self,
        byte: u8,
        next: SyllableState,
        opts: ComposeOptions,
    ) -> Result<(), Overflow> {
        self.buf.push_literal(byte)?;
        if next != SyllableState::Foreign && validate(self.buf.chars(), false) {
            self.relocate_tone(opts.modern_tone);
            self.state = next;
            return Ok(());
        }
        self.enter_foreign()
    }

    /// Once the word cannot be Vietnamese, an inferred stroke goes back to `d`.
    fn enter_foreign(&mut self) -> Result<(), Overflow> {
        self.state = SyllableState::Foreign;
        let Some(at) = self.history.inferred_stroke.take() else {
            return Ok(());
        };
        if let Some(c) = self.buf.get_mut(0) {
            c.stroke = false;
        }
        let caps = self
            .buf
            .release_raw(b'd')
            .and_then(|i| self.buf.raw().get(i))
            .is_some_and(|k| k.byte.is_ascii_uppercase());
        let at = usize::from(at).min(self.buf.len());
        self.buf.insert_char(at, Char::literal(b'd', caps))?;
        self.history.stroke_reverted = true;
        debug!("inferred stroke undone");
        Ok(())
    }

    fn relocate_tone(&mut self, modern: bool) {
        let chars = self.buf.chars();
        let (Some(from), Some(to)) = (toned(chars), tone_position(chars, modern)) else {
            return;
        };
        if from == to {
            return;
        }
        let tone = chars[from].tone;
        if let Some(c) = self.buf.get_mut(from) {
            c.tone = Tone::None;
        }
        if let Some(c) = self.buf.get_mut(to) {
            c.tone = tone;
        }
        trace!("tone moved {from} -> {to}");
    }

    fn undo(
        &mut self,
        pos: usize,
        t: Transform,
        byte: u8,
        opts: ComposeOptions,
    ) -> Result<(), Overflow> {
        self.buf.revert(pos, t, byte)?;
        match t {
            Transform::Stroke => self.history.stroke_reverted = true,
            _ => self.history.mark_reverted = true,
        }
        self.pending = Pending::MarkRevert {
            key: byte.to_ascii_lowercase(),
        };
        debug!("{t:?} reverted by {:?}", byte as char);
        self.settle(opts)
    }

    fn vowel(
        &mut self,
        byte: u8,
        next: SyllableState,
        mode: &Mode,
        opts: ComposeOptions,
    ) -> Result<(), Overflow> {
        let key = byte.to_ascii_lowercase();
        if mode.circumflex_by_vowel
            && matches!(key, b'a' | b'e' | b'o')
            && self.circumflex(byte, opts)?
        {
            return Ok(());
        }
        let after_horn_u = key == b'o'
            && self
                .buf
                .last()
                .is_some_and(|c| c.base == b'u' && c.mark == Mark::Horn);
        self.append(byte, next, opts)?;
        if after_horn_u && self.state != SyllableState::Foreign {
            self.pending = Pending::Horn {
                pos: (self.buf.len() - 1) as u8,
            };
        }
        Ok(())
    }

    /// Telex aa, ee, oo, also reaching back over a final ("nanag" → nâng).
    fn circumflex(&mut self, byte: u8, opts: ComposeOptions) -> Result<bool, Overflow> {
        let key = byte.to_ascii_lowercase();
        let chars = self.buf.chars();
        let Some(pos) = chars.iter().rposition(Char::is_vowel) else {
            return Ok(false);
        };
        let target = chars[pos];
        if target.base != key {
            return Ok(false);
        }
        if target.mark == Mark::Circumflex {
            self.undo(pos, Transform::Mark(Mark::Circumflex), byte, opts)?;
            return Ok(true);
        }
        let adjacent = pos + 1 == chars.len();
        // over a stop final only once a tone is set, so "data" stays as typed
        if !adjacent && ends_in_stop(chars) && toned(chars).is_none() {
            return Ok(false);
        }
        if !valid_with(chars, &[(pos, Mark::Circumflex)]) {
            return Ok(false);
        }
        self.buf
            .apply(pos, Transform::Mark(Mark::Circumflex), byte)?;
        self.history.any = true;
        if !adjacent {
            self.history.vowel_circumflex = true;
        }
        self.settle(opts)?;
        Ok(true)
    }

    fn tone(&mut self, byte: u8, mode: &Mode, opts: ComposeOptions) -> Result<bool, Overflow> {
        let chars = self.buf.chars();
        if !chars.iter().any(Char::is_vowel) {
            return Ok(false);
        }
        let value = mode.tone_of(byte);
        let current = toned(chars);

        if value == TONE_REMOVE {
            let Some(pos) = current else {
                return Ok(false);
            };
            self.buf.apply(pos, Transform::Tone(Tone::None), byte)?;
            self.history.any = true;
            self.settle(opts)?;
            return Ok(true);
        }

        let tone = Tone::from_index(value);
        if let Some(pos) = current.filter(|&p| chars[p].tone == tone) {
            self.undo(pos, Transform::Tone(tone), byte, opts)?;
            return Ok(true);
        }
        if ends_in_stop(chars) && !tone.fits_stop_final() {
            debug!("{tone:?} cannot sit on a stop final");
            return Ok(false);
        }
        let Some(target) = tone_position(chars, opts.modern_tone) else {
            return Ok(false);
        };
        if let Some(c) = current.and_then(|p| self.buf.get_mut(p)) {
            c.tone = Tone::None;
        }
        self.buf.apply(target, Transform::Tone(tone), byte)?;
        self.history.any = true;
        self.settle(opts)?;
        Ok(true)
    }

    fn mark(&mut self, byte: u8, mode: &Mode, opts: ComposeOptions) -> Result<bool, Overflow> {
        let key = byte.to_ascii_lowercase();
        let kinds = mode.marks_of(key);
        if mode.w_vowel && matches!(self.state, SyllableState::Empty | SyllableState::Initial) {
            return self.w_vowel(byte, opts);
        }
        if kinds & MARK_HORN != 0 {
            if let Some(applied) = self.horn_pair(byte, opts)? {
                return Ok(applied);
            }
        }

        let chars = self.buf.chars();
        let s = parse(chars);
        for pos in s.nucleus.range().rev() {
            let c = chars[pos];
            let mark = match c.base {
                b'a' if kinds & MARK_BREVE != 0 => Mark::Breve,
                b'a' | b'e' | b'o' if kinds & MARK_CIRCUMFLEX != 0 => Mark::Circumflex,
                b'o' | b'u' if kinds & MARK_HORN != 0 => Mark::Horn,
                _ => continue,
            };
            if c.mark == mark {
                if key == b'w' && self.w_vowel_at == Some(pos as u8) {
                    self.unwind_w_vowel(pos, byte, opts)?;
                } else {
                    self.undo(pos, Transform::Mark(mark), byte, opts)?;
                }
                return Ok(true);
            }
            if !valid_with(chars, &[(pos, mark)]) {
                continue;
            }
            let last = pos + 1 == chars.len();
            if mark == Mark::Breve && key == b'w' && last && !s.initial.is_empty() {
                let literal = chars.len() as u8;
                self.buf.push_literal(byte)?;
                self.pending = Pending::Breve {
                    pos: pos as u8,
                    literal,
                    raw: (self.buf.raw().len() - 1) as u8,
                };
                trace!("breve deferred");
                return Ok(true);
            }
            self.buf.apply(pos, Transform::Mark(mark), byte)?;
            self.history.any = true;
            self.settle(opts)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// uo + horn: both vowels take it, except that a word-final "uo" horns
    /// only the o until the next key ("huơ", then "hương").
    fn horn_pair(&mut self, byte: u8, opts: ComposeOptions) -> Result<Option<bool>, Overflow> {
        let chars = self.buf.chars();
        let n = parse(chars).nucleus.range();
        let Some(u) = n
            .clone()
            .find(|&i| i + 1 < n.end && chars[i].base == b'u' && chars[i + 1].base == b'o')
        else {
            return Ok(None);
        };
        let o = u + 1;

        if chars[o].mark == Mark::Horn {
            if let Some(c) = self.buf.get_mut(u).filter(|c| c.mark == Mark::Horn) {
                c.mark = Mark::None;
            }
            self.undo(o, Transform::Mark(Mark::Horn), byte, opts)?;
            return Ok(Some(true));
        }

        let defer = o + 1 == chars.len() && chars[u].mark != Mark::Horn;
        let both = [(u, Mark::Horn), (o, Mark::Horn)];
        let edits = if defer { &both[1..] } else { &both[..] };
        if !valid_with(chars, edits) {
            return Ok(None);
        }
        self.buf.apply(o, Transform::Mark(Mark::Horn), byte)?;
        if defer {
            self.pending = Pending::Horn { pos: u as u8 };
        } else if let Some(c) = self.buf.get_mut(u) {
            c.mark = Mark::Horn;
        }
        self.history.any = true;
        self.settle(opts)?;
        Ok(Some(true))
    }

    /// A tone typed between the deferred `w` and the final ("trawsng"): the
    /// tone goes on the syllable without the `w`, which stays pending.
    fn tone_under_breve(
        &mut self,
        byte: u8,
        mode: &Mode,
        opts: ComposeOptions,
        (pos, literal, raw): (u8, u8, u8),
    ) -> Result<(), Overflow> {
        let w = self.buf.remove_char(usize::from(literal));
        let applied = self.tone(byte, mode, opts)?;
        if let Some(w) = w {
            let at = usize::from(literal).min(self.buf.len());
            self.buf.insert_char(at, w)?;
        }
        if applied && self.state != SyllableState::Foreign {
            if self.pending == Pending::None {
                self.pending = Pending::Breve { pos, literal, raw };
            }
            trace!("breve kept across a tone");
            return Ok(());
        }
        trace!("breve dropped");
        self.enter_foreign()?;
        if !applied {
            self.buf.push_literal(byte)?;
        }
        Ok(())
    }

    fn confirms_stroke(&self, key: u8, category: KeyCategory, mode: &Mode) -> bool {
        if category == KeyCategory::Mark {
            return true;
        }
        mode.circumflex_by_vowel
            && matches!(key, b'a' | b'e' | b'o')
            && self
                .buf
                .chars()
                .iter()
                .rev()
                .find(|c| c.is_vowel())
                .is_some_and(|c| c.base == key && c.mark == Mark::None)
    }

    /// A lone Telex `w` is ư.
    fn w_vowel(&mut self, byte: u8, opts: ComposeOptions) -> Result<bool, Overflow> {
        if opts.skip_w_shortcut && self.buf.is_empty() {
            return Ok(false);
        }
        let u = Char {
            mark: Mark::Horn,
            ..Char::literal(b'u', byte.is_ascii_uppercase())
        };
        if !valid_after_push(self.buf.chars(), u) {
            return Ok(false);
        }
        let at = self.buf.len() as u8;
        self.buf.push_composed(u, byte, true)?;
        self.w_vowel_at = Some(at);
        self.history.any = true;
        self.settle(opts)?;
        Ok(true)
    }

    /// "ww": the ư from a lone `w` turns back into the letter.
    fn unwind_w_vowel(&mut self, pos: usize, byte: u8, opts: ComposeOptions) -> Result<(), Overflow> {
        if let Some(c) = self.buf.get_mut(pos) {
            *c = Char::literal(b'w', c.caps);
        }
        self.buf.release_raw(b'w');
        self.buf.push_raw(byte, true)?;
        self.w_vowel_at = None;
        self.history.mark_reverted = true;
        self.pending = Pending::MarkRevert { key: b'w' };
        debug!("w vowel reverted");
        self.settle(opts)
    }

    fn stroke(&mut self, byte: u8, mode: &Mode, opts: ComposeOptions) -> Result<bool, Overflow> {
        let chars = self.buf.chars();
        let s = parse(chars);
        if s.initial.len() != 1 || chars[0].base != b'd' {
            return Ok(false);
        }
        if chars[0].stroke {
            self.history.inferred_stroke = None;
            self.undo(0, Transform::Stroke, byte, opts)?;
            return Ok(true);
        }
        // Telex `d` typed later in the word ("dojcd" → đọc)
        let inferred = mode.method == InputMethod::Telex && chars.len() > 1;
        if inferred && !self.history.any {
            let literal = chars.len() as u8;
            self.buf.push_literal(byte)?;
            self.pending = Pending::Stroke {
                literal,
                raw: (self.buf.raw().len() - 1) as u8,
            };
            trace!("stroke deferred");
            return Ok(true);
        }
        let at = chars.len() as u8;
        self.buf.apply(0, Transform::Stroke, byte)?;
        if inferred {
            self.history.inferred_stroke = Some(at);
        }
        self.history.any = true;
        self.settle(opts)?;
        Ok(true)
    }
}
