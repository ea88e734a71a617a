//! Decides whether a finished or cancelled word goes back to its raw keys.

use log::debug;

use crate::buffers::DualBuffer;
use crate::english::{self, Likelihood};
use crate::modes::{KeyCategory, Mode};
use crate::validation;

/// What happened to the current word so far; reset at every boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformHistory {
    pub any: bool,
    pub stroke_reverted: bool,
    pub mark_reverted: bool,
    /// A vowel key reached back over the final for a circumflex.
    pub vowel_circumflex: bool,
    /// Where the `d` of an inferred stroke would have stood.
    pub inferred_stroke: Option<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Restore,
}

/// Raw words this short that were reverted on purpose keep the reverted text.
const SHORT_REVERT: usize = 4;

pub struct RestoreInput<'a> {
    pub buffer: &'a DualBuffer,
    pub history: &'a TransformHistory,
    pub mode: &'a Mode,
    pub overflowed: bool,
    pub english_auto_restore: bool,
}

/// Boundary decision for the word in `input.buffer`.
pub fn decide(input: &RestoreInput<'_>) -> Decision {
    let buf = input.buffer;
    if input.overflowed || buf.render_eq_raw() {
        return Decision::Keep;
    }
    let raw = buf.raw();
    if !validation::validate(buf.chars(), true) {
        let reverted = input.history.mark_reverted || input.history.stroke_reverted;
        if reverted && raw.len() <= SHORT_REVERT {
            debug!("keeping short reverted word");
            return Decision::Keep;
        }
        debug!("restoring invalid word");
        return Decision::Restore;
    }
    if !input.english_auto_restore {
        return Decision::Keep;
    }
    let ends_in_tone = raw
        .last()
        .is_some_and(|k| k.consumed && input.mode.category(k.byte) == KeyCategory::Tone);
    if ends_in_tone {
        return Decision::Keep;
    }
    let mut letters = [0u8; 64];
    for (dst, k) in letters.iter_mut().zip(raw) {
        *dst = k.byte;
    }
    let score = english::likelihood(&letters[..raw.len()]);
    let threshold = if input.history.vowel_circumflex {
        Likelihood::Possible
    } else {
        Likelihood::Likely
    };
    debug!("english likelihood {score:?}, threshold {threshold:?}");
    if score >= threshold {
        Decision::Restore
    } else {
        Decision::Keep
    }
}

/// A foreign word cut short by a new initial consonant goes back to its keys
/// whenever the screen shows something else.
pub fn decide_restart(buffer: &DualBuffer) -> Decision {
    if buffer.render_eq_raw() {
        Decision::Keep
    } else {
        Decision::Restore
    }
}

/// Explicit cancel: restore when enabled and the word differs from its keys.
pub fn decide_cancel(buffer: &DualBuffer, esc_restore: bool) -> Decision {
    if esc_restore && !buffer.render_eq_raw() {
        Decision::Restore
    } else {
        Decision::Keep
    }
}
