//! Phonotactic validation and the syllable state machine.

use log::trace;

use crate::chars::{Char, Mark, Tone};
use crate::modes::{CATEGORY_COUNT, KeyCategory};
use crate::phonology;
use crate::syllable::{self, Syllable};

/// Checks `chars` against the Vietnamese syllable rules. An in-progress word
/// (`complete == false`) only has to be a prefix of something valid; a
/// finished word must be a whole syllable.
pub fn validate(chars: &[Char], complete: bool) -> bool {
    if chars.is_empty() {
        return true;
    }
    if chars.iter().any(|c| !c.base.is_ascii_lowercase()) {
        return false;
    }
    let s = syllable::parse(chars);
    if s.broken {
        return false;
    }
    if !initial_ok(chars, &s, complete) {
        return false;
    }
    if s.nucleus.is_empty() && s.glide.is_none() {
        return !complete && s.final_.is_empty();
    }
    if !spelling_ok(chars, &s, complete) {
        return false;
    }
    if !nucleus_ok(chars, &s, complete) {
        return false;
    }
    if !final_ok(chars, &s, complete) {
        return false;
    }
    tone_ok(chars, &s, complete)
}

fn initial_ok(chars: &[Char], s: &Syllable, complete: bool) -> bool {
    let initial = syllable::bases(chars, s.initial);
    for (i, c) in chars.iter().enumerate() {
        if c.stroke && (i != 0 || initial.as_slice() != b"d") {
            return false;
        }
    }
    if initial.is_empty() {
        return true;
    }
    let no_vowel = s.nucleus.is_empty() && s.glide.is_none();
    if no_vowel && !complete {
        return phonology::is_initial_prefix(&initial);
    }
    phonology::is_initial(&initial)
}

fn spelling_ok(chars: &[Char], s: &Syllable, complete: bool) -> bool {
    let initial = syllable::bases(chars, s.initial);
    let first = chars[s.vowel_start()];
    let front = matches!(first.base, b'e' | b'i' | b'y');
    match initial.as_slice() {
        b"c" => !front,
        b"g" => first.base != b'e',
        b"ng" => !matches!(first.base, b'e' | b'i'),
        b"k" | b"gh" | b"ngh" => front,
        b"q" => match s.glide {
            Some(_) => first.mark == Mark::None,
            // "qu" still waiting for its nucleus
            None => {
                !complete
                    && first.base == b'u'
                    && first.mark == Mark::None
                    && s.nucleus.len() == 1
                    && !s.has_final()
            }
        },
        _ => true,
    }
}

fn nucleus_ok(chars: &[Char], s: &Syllable, complete: bool) -> bool {
    let nucleus = &chars[s.nucleus.range()];
    let Some(p) = phonology::pattern(&syllable::bases(chars, s.nucleus)) else {
        return false;
    };
    if nucleus
        .iter()
        .zip(p.marks)
        .any(|(c, &allowed)| allowed & c.mark.bit() == 0)
    {
        return false;
    }
    if s.has_final() && !p.closable {
        return false;
    }
    if complete {
        let mut text: heapless::String<16> = heapless::String::new();
        for c in nucleus {
            if text.push(c.toneless()).is_err() {
                return false;
            }
        }
        return phonology::is_nucleus(&text, s.has_final());
    }
    true
}

fn final_ok(chars: &[Char], s: &Syllable, complete: bool) -> bool {
    if !s.has_final() {
        return true;
    }
    let fin = syllable::bases(chars, s.final_);
    if !phonology::is_final(&fin) {
        return false;
    }
    let last = chars[s.nucleus.end as usize - 1];
    match fin.as_slice() {
        b"ch" | b"nh" => match (last.base, last.mark) {
            (b'a', Mark::None) | (b'i', _) | (b'y', _) => true,
            (b'e', Mark::Circumflex) => true,
            (b'e', Mark::None) => !complete,
            _ => false,
        },
        b"c" | b"ng" | b"k" => !matches!(last.base, b'i' | b'y'),
        _ => true,
    }
}

fn tone_ok(chars: &[Char], s: &Syllable, complete: bool) -> bool {
    let mut toned = chars.iter().filter(|c| c.tone != Tone::None);
    let tone = toned.next().map(|c| c.tone).unwrap_or_default();
    if toned.next().is_some() {
        return false;
    }
    if !s.has_final() || !phonology::is_stop_final(&syllable::bases(chars, s.final_)) {
        return true;
    }
    if complete {
        matches!(tone, Tone::Sac | Tone::Nang)
    } else {
        tone.fits_stop_final()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SyllableState {
    #[default]
    Empty = 0,
    Initial = 1,
    VowelStart = 2,
    VowelCompound = 3,
    Final = 4,
    Marked = 5,
    Foreign = 6,
}

pub const STATE_COUNT: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    AppendInitial,
    AppendVowel,
    AppendFinal,
    Tone,
    Mark,
    Stroke,
    Literal,
    /// A consonant after a foreign word begins the next word.
    Restart,
}

use Action as A;
use SyllableState as S;

// Columns follow KeyCategory: vowel, initial, final, stop, tone, mark, stroke, other.
const DISPATCH: [[(Action, SyllableState); CATEGORY_COUNT]; STATE_COUNT] = [
    // Empty
    [
        (A::AppendVowel, S::VowelStart),
        (A::AppendInitial, S::Initial),
        (A::AppendInitial, S::Initial),
        (A::AppendInitial, S::Initial),
        (A::AppendInitial, S::Initial),
        (A::Mark, S::VowelStart),
        (A::AppendInitial, S::Initial),
        (A::Literal, S::Foreign),
    ],
    // Initial
    [
        (A::AppendVowel, S::VowelStart),
        (A::AppendInitial, S::Initial),
        (A::AppendInitial, S::Initial),
        (A::AppendInitial, S::Initial),
        (A::AppendInitial, S::Initial),
        (A::Mark, S::VowelStart),
        (A::Stroke, S::Initial),
        (A::Literal, S::Foreign),
    ],
    // VowelStart
    [
        (A::AppendVowel, S::VowelCompound),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::Tone, S::Marked),
        (A::Mark, S::Marked),
        (A::Stroke, S::VowelStart),
        (A::Literal, S::Foreign),
    ],
    // VowelCompound
    [
        (A::AppendVowel, S::VowelCompound),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::Tone, S::Marked),
        (A::Mark, S::Marked),
        (A::Stroke, S::VowelCompound),
        (A::Literal, S::Foreign),
    ],
    // Final: a vowel may still reach back for a circumflex
    [
        (A::AppendVowel, S::Final),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::Tone, S::Final),
        (A::Mark, S::Final),
        (A::Stroke, S::Final),
        (A::Literal, S::Foreign),
    ],
    // Marked
    [
        (A::AppendVowel, S::Marked),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::AppendFinal, S::Final),
        (A::Tone, S::Marked),
        (A::Mark, S::Marked),
        (A::Stroke, S::Marked),
        (A::Literal, S::Foreign),
    ],
    // Foreign: only a fresh initial consonant gets out
    [
        (A::Literal, S::Foreign),
        (A::Restart, S::Initial),
        (A::Literal, S::Foreign),
        (A::Literal, S::Foreign),
        (A::Literal, S::Foreign),
        (A::Literal, S::Foreign),
        (A::Literal, S::Foreign),
        (A::Literal, S::Foreign),
    ],
];

/// Single table lookup for the next action and state.
#[inline(always)]
pub fn dispatch(state: SyllableState, category: KeyCategory) -> (Action, SyllableState) {
    let next = DISPATCH[state as usize][category as usize];
    trace!("dispatch {state:?} x {category:?} -> {next:?}");
    next
}

/// State implied by the buffer contents.
pub fn derive(chars: &[Char]) -> SyllableState {
    if chars.is_empty() {
        return SyllableState::Empty;
    }
    if !validate(chars, false) {
        return SyllableState::Foreign;
    }
    let s = syllable::parse(chars);
    if s.nucleus.is_empty() && s.glide.is_none() {
        return SyllableState::Initial;
    }
    if s.has_final() {
        return SyllableState::Final;
    }
    if chars.iter().any(|c| !c.is_plain() && c.is_vowel()) {
        return SyllableState::Marked;
    }
    if s.nucleus.len() + usize::from(s.glide.is_some()) == 1 {
        SyllableState::VowelStart
    } else {
        SyllableState::VowelCompound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> heapless::Vec<Char, 16> {
        s.chars().filter_map(Char::from_char).collect()
    }

    fn ok(s: &str) -> bool {
        validate(&word(s), true)
    }

    fn partial(s: &str) -> bool {
        validate(&word(s), false)
    }

    #[test]
    fn finished_words() {
        for w in [
            "việt", "chào", "người", "nghiêng", "quyết", "giữa", "gì", "khuya", "đọc", "hoàn",
            "thuở", "rượu", "xoong", "ăn", "của", "huỳnh",
        ] {
            assert!(ok(w), "{w} should be valid");
        }
    }

    #[test]
    fn rejected_words() {
        for w in [
            "test", "class", "ưo", "tiên1", "ka", "ghà", "cen", "kư", "qư", "àc", "ìch", "ing",
            "ăch", "bain", "dđ",
        ] {
            assert!(!ok(w), "{w} should be invalid");
        }
    }

    #[test]
    fn prefixes_are_accepted_in_progress() {
        assert!(partial("ngh"));
        assert!(partial("qu"));
        assert!(partial("ie"));
        assert!(partial("ưo"));
        assert!(partial("ac"));
        assert!(partial("ech"));
        assert!(!partial("str"));
        assert!(!partial("ec1"));
    }

    #[test]
    fn stop_finals_limit_tones() {
        assert!(partial("át"));
        assert!(partial("ạt"));
        assert!(!partial("àt"));
        assert!(!partial("ảch"));
        assert!(!ok("at"));
    }

    #[test]
    fn stroke_only_on_initial_d() {
        assert!(ok("đi"));
        assert!(!partial("ađ"));
    }

    #[test]
    fn states_follow_the_buffer() {
        assert_eq!(derive(&word("")), SyllableState::Empty);
        assert_eq!(derive(&word("ch")), SyllableState::Initial);
        assert_eq!(derive(&word("ca")), SyllableState::VowelStart);
        assert_eq!(derive(&word("cao")), SyllableState::VowelCompound);
        assert_eq!(derive(&word("cá")), SyllableState::Marked);
        assert_eq!(derive(&word("cán")), SyllableState::Final);
        assert_eq!(derive(&word("cx")), SyllableState::Foreign);
    }

    #[test]
    fn table_routes_keys() {
        assert_eq!(
            dispatch(SyllableState::Empty, KeyCategory::Vowel),
            (Action::AppendVowel, SyllableState::VowelStart)
        );
        assert_eq!(
            dispatch(SyllableState::VowelStart, KeyCategory::Tone),
            (Action::Tone, SyllableState::Marked)
        );
        assert_eq!(
            dispatch(SyllableState::Foreign, KeyCategory::Vowel),
            (Action::Literal, SyllableState::Foreign)
        );
        assert_eq!(
            dispatch(SyllableState::Foreign, KeyCategory::Initial),
            (Action::Restart, SyllableState::Initial)
        );
        assert_eq!(
            dispatch(SyllableState::Foreign, KeyCategory::Final),
            (Action::Literal, SyllableState::Foreign)
        );
    }
}
