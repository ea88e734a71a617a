//! The dual buffer: composed characters on screen plus the keys that produced them.

use heapless::Vec;
use thiserror::Error;

use crate::chars::{Char, Mark, Tone};
use crate::modes::Mode;

pub const MAX_CHARS: usize = 32;
pub const MAX_RAW: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("word buffer is full")]
pub struct Overflow;

/// A physical key press. `consumed` keys were turned into diacritics and have
/// no character of their own in the transformed view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawKey {
    pub byte: u8,
    pub consumed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Tone(Tone),
    Mark(Mark),
    Stroke,
}

#[derive(Clone, Debug, Default)]
pub struct DualBuffer {
    chars: Vec<Char, MAX_CHARS>,
    raw: Vec<RawKey, MAX_RAW>,
}

impl DualBuffer {
    pub const fn new() -> Self {
        Self {
            chars: Vec::new(),
            raw: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.chars.clear();
        self.raw.clear();
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty() && self.raw.is_empty()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline(always)]
    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    #[inline(always)]
    pub fn raw(&self) -> &[RawKey] {
        &self.raw
    }

    #[inline(always)]
    pub fn get(&self, pos: usize) -> Option<&Char> {
        self.chars.get(pos)
    }

    #[inline(always)]
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut Char> {
        self.chars.get_mut(pos)
    }

    #[inline(always)]
    pub fn last(&self) -> Option<&Char> {
        self.chars.last()
    }

    /// Appends the typed key as a plain character.
    pub fn push_literal(&mut self, byte: u8) -> Result<(), Overflow> {
        if self.chars.is_full() || self.raw.is_full() {
            return Err(Overflow);
        }
        self.push_char(Char::literal(byte.to_ascii_lowercase(), byte.is_ascii_uppercase()))?;
        self.push_raw(byte, false)
    }

    /// Appends a character produced by `byte` in one step.
    pub fn push_composed(&mut self, c: Char, byte: u8, consumed: bool) -> Result<(), Overflow> {
        if self.chars.is_full() || self.raw.is_full() {
            return Err(Overflow);
        }
        self.push_char(c)?;
        self.push_raw(byte, consumed)
    }

    pub fn push_char(&mut self, c: Char) -> Result<(), Overflow> {
        self.chars.push(c).map_err(|_| Overflow)
    }

    pub fn push_raw(&mut self, byte: u8, consumed: bool) -> Result<(), Overflow> {
        self.raw.push(RawKey { byte, consumed }).map_err(|_| Overflow)
    }

    pub fn insert_char(&mut self, pos: usize, c: Char) -> Result<(), Overflow> {
        self.chars.insert(pos, c).map_err(|_| Overflow)
    }

    pub fn remove_char(&mut self, pos: usize) -> Option<Char> {
        (pos < self.chars.len()).then(|| self.chars.remove(pos))
    }

    pub fn pop_char(&mut self) -> Option<Char> {
        self.chars.pop()
    }

    pub fn pop_raw(&mut self) -> Option<RawKey> {
        self.raw.pop()
    }

    pub fn set_consumed(&mut self, idx: usize, consumed: bool) {
        if let Some(k) = self.raw.get_mut(idx) {
            k.consumed = consumed;
        }
    }

    /// Applies `t` at `pos`, recording `key` as the consuming keystroke.
    /// Returns the value the slot held before.
    pub fn apply(&mut self, pos: usize, t: Transform, key: u8) -> Result<Transform, Overflow> {
        if self.raw.is_full() {
            return Err(Overflow);
        }
        let c = self.chars.get_mut(pos).ok_or(Overflow)?;
        let old = match t {
            Transform::Tone(tone) => Transform::Tone(core::mem::replace(&mut c.tone, tone)),
            Transform::Mark(mark) => Transform::Mark(core::mem::replace(&mut c.mark, mark)),
            Transform::Stroke => {
                c.stroke = true;
                Transform::Stroke
            }
        };
        self.push_raw(key, true)?;
        Ok(old)
    }

    /// Undoes the transform of kind `t` at `pos`. The key that applied it turns
    /// back into a literal, and the repeated `key` is kept as a plain character
    /// so the screen shows both letters the user typed.
    pub fn revert(&mut self, pos: usize, t: Transform, key: u8) -> Result<(), Overflow> {
        if self.chars.is_full() || self.raw.is_full() {
            return Err(Overflow);
        }
        let Some(c) = self.chars.get_mut(pos) else {
            return Err(Overflow);
        };
        match t {
            Transform::Tone(_) => c.tone = Tone::None,
            Transform::Mark(_) => c.mark = Mark::None,
            Transform::Stroke => c.stroke = false,
        }
        self.release_raw(key);
        self.push_literal(key)?;
        if let Some(k) = self.raw.last_mut() {
            k.consumed = true;
        }
        Ok(())
    }

    /// Marks the most recent consumed press of `key` as literal again.
    pub fn release_raw(&mut self, key: u8) -> Option<usize> {
        let lower = key.to_ascii_lowercase();
        let idx = self
            .raw
            .iter()
            .rposition(|k| k.consumed && k.byte.to_ascii_lowercase() == lower)?;
        self.raw[idx].consumed = false;
        Some(idx)
    }

    /// Replaces the raw view with keystrokes that would type the current chars
    /// in `mode`, the tone key last. Leaves the raw view alone when the keys
    /// do not fit.
    pub fn rebuild_raw(&mut self, mode: &Mode) -> Result<(), Overflow> {
        let mut raw: Vec<RawKey, MAX_RAW> = Vec::new();
        let mut full = false;
        let mut tone = Tone::None;
        for c in &self.chars {
            mode.keystrokes(c, |byte, consumed| {
                full |= raw.push(RawKey { byte, consumed }).is_err();
            });
            if c.tone != Tone::None {
                tone = c.tone;
            }
        }
        if let Some(k) = mode.tone_key(tone) {
            full |= raw
                .push(RawKey {
                    byte: k,
                    consumed: true,
                })
                .is_err();
        }
        if full {
            return Err(Overflow);
        }
        self.raw = raw;
        Ok(())
    }

    /// Literal text of every key pressed, transforms discarded.
    pub fn raw_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.raw.iter().map(|k| k.byte as char)
    }

    pub fn render(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().map(Char::to_char)
    }

    pub fn render_eq_raw(&self) -> bool {
        self.render().eq(self.raw_chars())
    }
}
