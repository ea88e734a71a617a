//! Splits a buffer into initial, glide, nucleus and final.

use core::ops::Range;

use crate::chars::{Char, Mark, Tone};
use crate::phonology;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: u8,
    pub end: u8,
}

impl Span {
    const fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u8,
            end: end as u8,
        }
    }

    #[inline(always)]
    pub fn range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    #[inline(always)]
    pub fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Syllable {
    pub initial: Span,
    pub glide: Option<u8>,
    pub nucleus: Span,
    pub final_: Span,
    /// Something follows the final consonant.
    pub broken: bool,
}

impl Syllable {
    /// First vowel position, glide included.
    pub fn vowel_start(&self) -> usize {
        self.glide.map_or(self.nucleus.start as usize, usize::from)
    }

    pub fn has_final(&self) -> bool {
        !self.final_.is_empty()
    }
}

/// Structural split of `chars`. Legality is left to validation.
pub fn parse(chars: &[Char]) -> Syllable {
    let len = chars.len();
    let mut i = 0;
    while i < len && !chars[i].is_vowel() {
        i += 1;
    }
    let mut initial_end = i;
    while i < len && chars[i].is_vowel() {
        i += 1;
    }
    let mut vowel_start = initial_end;
    let vowel_end = i;

    // "gi" takes the i when another vowel follows (gia, giờ), "gì" keeps it.
    if initial_end == 1
        && chars[0].base == b'g'
        && vowel_end - vowel_start >= 2
        && chars[1].base == b'i'
        && chars[1].mark == Mark::None
    {
        initial_end = 2;
        vowel_start = 2;
    }

    let mut glide = None;
    if initial_end == 1
        && chars[0].base == b'q'
        && vowel_end - vowel_start >= 2
        && chars[vowel_start].base == b'u'
    {
        glide = Some(vowel_start as u8);
        vowel_start += 1;
    }

    while i < len && !chars[i].is_vowel() {
        i += 1;
    }

    Syllable {
        initial: Span::new(0, initial_end),
        glide,
        nucleus: Span::new(vowel_start, vowel_end),
        final_: Span::new(vowel_end, i),
        broken: i < len,
    }
}

/// Lowercase base letters of `span`, for table lookups.
pub fn bases(chars: &[Char], span: Span) -> heapless::Vec<u8, 8> {
    chars[span.range()].iter().take(8).map(|c| c.base).collect()
}

/// Position the tone belongs on.
pub fn tone_position(chars: &[Char], modern: bool) -> Option<usize> {
    let s = parse(chars);
    if s.nucleus.is_empty() {
        return s.glide.map(usize::from);
    }
    let start = s.nucleus.start as usize;
    if let Some(p) = phonology::pattern(&bases(chars, s.nucleus)) {
        let offset = if s.has_final() {
            p.tone_closed
        } else if p.classic && !modern {
            0
        } else {
            p.tone_open
        };
        return Some(start + offset as usize);
    }
    let nucleus = &chars[s.nucleus.range()];
    if let Some(p) = nucleus.iter().position(|c| c.mark != Mark::None) {
        return Some(start + p);
    }
    Some(s.nucleus.end as usize - 1)
}

/// Position of the vowel currently carrying a tone.
pub fn toned(chars: &[Char]) -> Option<usize> {
    chars.iter().position(|c| c.tone != Tone::None)
}
