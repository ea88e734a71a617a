//! Static Vietnamese phonotactic data: initials, finals, vowel nuclei and
//! tone placement. Nuclei are keyed by their base letters ("uo" covers uô,
//! ươ, uơ and the in-progress ưo).

use crate::chars::Mark;

pub const INITIALS: [&str; 27] = [
    "b", "c", "ch", "d", "g", "gh", "gi", "h", "k", "kh", "kr", "l", "m", "n", "ng", "ngh", "nh",
    "p", "ph", "q", "r", "s", "t", "th", "tr", "v", "x",
];

pub const FINALS: [&str; 9] = ["c", "ch", "k", "m", "n", "ng", "nh", "p", "t"];

/// Finals after which only sắc and nặng are possible.
pub const STOP_FINALS: [&str; 5] = ["c", "ch", "k", "p", "t"];

const N: u8 = Mark::None.bit();
const C: u8 = Mark::Circumflex.bit();
const B: u8 = Mark::Breve.bit();
const H: u8 = Mark::Horn.bit();

/// A vowel nucleus shape while it is being typed.
pub struct VowelPattern {
    pub bases: &'static [u8],
    /// Marks each position may carry, as [`Mark::bit`] sets.
    pub marks: &'static [u8],
    /// Whether a final consonant may follow.
    pub closable: bool,
    pub tone_open: u8,
    pub tone_closed: u8,
    /// Open syllables put the tone on the first vowel in the classic style.
    pub classic: bool,
}

const fn pat(
    bases: &'static [u8],
    marks: &'static [u8],
    closable: bool,
    tone_open: u8,
    tone_closed: u8,
) -> VowelPattern {
    VowelPattern {
        bases,
        marks,
        closable,
        tone_open,
        tone_closed,
        classic: false,
    }
}

const fn classic(bases: &'static [u8], marks: &'static [u8]) -> VowelPattern {
    VowelPattern {
        bases,
        marks,
        closable: true,
        tone_open: 1,
        tone_closed: 1,
        classic: true,
    }
}

pub const PATTERNS: [VowelPattern; 37] = [
    pat(b"a", &[N | B | C], true, 0, 0),
    pat(b"e", &[N | C], true, 0, 0),
    pat(b"i", &[N], true, 0, 0),
    pat(b"o", &[N | C | H], true, 0, 0),
    pat(b"u", &[N | H], true, 0, 0),
    pat(b"y", &[N], true, 0, 0),
    pat(b"ai", &[N, N], false, 0, 0),
    pat(b"ao", &[N, N], false, 0, 0),
    pat(b"au", &[N | C, N], false, 0, 0),
    pat(b"ay", &[N | C, N], false, 0, 0),
    pat(b"eo", &[N, N], false, 0, 0),
    pat(b"eu", &[N | C, N], false, 0, 0),
    pat(b"ia", &[N, N], false, 0, 0),
    pat(b"ie", &[N, N | C], true, 1, 1),
    pat(b"iu", &[N, N], false, 0, 0),
    classic(b"oa", &[N, N | B]),
    classic(b"oe", &[N, N]),
    pat(b"oi", &[N | C | H, N], false, 0, 0),
    pat(b"oo", &[N, N], true, 1, 1),
    pat(b"ua", &[N | H, N | C], true, 0, 1),
    pat(b"ue", &[N, N | C], true, 1, 1),
    pat(b"ui", &[N | H, N], false, 0, 0),
    pat(b"uo", &[N | H, N | C | H], true, 1, 1),
    pat(b"uu", &[N | H, N], false, 0, 0),
    classic(b"uy", &[N, N]),
    pat(b"ye", &[N, N | C], true, 1, 1),
    pat(b"ieu", &[N, N | C, N], false, 1, 1),
    pat(b"yeu", &[N, N | C, N], false, 1, 1),
    pat(b"oai", &[N, N, N], false, 1, 1),
    pat(b"oay", &[N, N, N], false, 1, 1),
    pat(b"oeo", &[N, N, N], false, 1, 1),
    pat(b"uay", &[N, N | C, N], false, 1, 1),
    pat(b"uoi", &[N | H, N | C | H, N], false, 1, 1),
    pat(b"uou", &[N | H, N | H, N], false, 1, 1),
    pat(b"uya", &[N, N, N], false, 1, 1),
    pat(b"uye", &[N, N, N | C], true, 2, 2),
    pat(b"uyu", &[N, N, N], false, 1, 1),
];

pub fn pattern(bases: &[u8]) -> Option<&'static VowelPattern> {
    PATTERNS.iter().find(|p| p.bases == bases)
}

/// Finished nuclei rendered without tone: (nucleus, may end the syllable, takes a final).
pub const NUCLEI: [(&str, bool, bool); 54] = [
    ("a", true, true),
    ("ă", true, true),
    ("â", false, true),
    ("e", true, true),
    ("ê", true, true),
    ("i", true, true),
    ("o", true, true),
    ("ô", true, true),
    ("ơ", true, true),
    ("u", true, true),
    ("ư", true, true),
    ("y", true, true),
    ("ai", true, false),
    ("ao", true, false),
    ("au", true, false),
    ("âu", true, false),
    ("ay", true, false),
    ("ây", true, false),
    ("eo", true, false),
    ("êu", true, false),
    ("ia", true, false),
    ("iu", true, false),
    ("oi", true, false),
    ("ôi", true, false),
    ("ơi", true, false),
    ("ui", true, false),
    ("ưi", true, false),
    ("ưu", true, false),
    ("ưa", true, false),
    ("ua", true, false),
    ("uơ", true, false),
    ("iê", false, true),
    ("uô", false, true),
    ("ươ", false, true),
    ("yê", false, true),
    ("oă", false, true),
    ("uâ", false, true),
    ("oo", false, true),
    ("oa", true, true),
    ("oe", true, true),
    ("uy", true, true),
    ("uê", true, true),
    ("iêu", true, false),
    ("yêu", true, false),
    ("oai", true, false),
    ("oay", true, false),
    ("oeo", true, false),
    ("uây", true, false),
    ("uôi", true, false),
    ("ươi", true, false),
    ("ươu", true, false),
    ("uya", true, false),
    ("uyu", true, false),
    ("uyê", false, true),
];

/// Whether the toneless nucleus `s` is a finished Vietnamese nucleus for an
/// open (`closed == false`) or closed syllable.
pub fn is_nucleus(s: &str, closed: bool) -> bool {
    NUCLEI
        .iter()
        .find(|(n, _, _)| *n == s)
        .is_some_and(|&(_, open, close)| if closed { close } else { open })
}

#[inline]
pub fn is_initial(s: &[u8]) -> bool {
    INITIALS.iter().any(|i| i.as_bytes() == s)
}

/// True when `s` can still grow into an initial ("n" → "ng" → "ngh").
#[inline]
pub fn is_initial_prefix(s: &[u8]) -> bool {
    INITIALS.iter().any(|i| i.as_bytes().starts_with(s))
}

#[inline]
pub fn is_final(s: &[u8]) -> bool {
    FINALS.iter().any(|f| f.as_bytes() == s)
}

#[inline]
pub fn is_stop_final(s: &[u8]) -> bool {
    STOP_FINALS.iter().any(|f| f.as_bytes() == s)
}
