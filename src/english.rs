//! Scores raw keystrokes on how much they look like an English word.

/// Consonant pairs that can start an English word.
const ONSETS: [&[u8; 2]; 39] = [
    b"bl", b"br", b"ch", b"cl", b"cr", b"cy", b"dr", b"dw", b"fl", b"fr", b"gh", b"gl", b"gn",
    b"gr", b"kn", b"kw", b"ph", b"pl", b"pr", b"ps", b"pt", b"sc", b"sh", b"sk", b"sl", b"sm",
    b"sn", b"sp", b"sq", b"st", b"sw", b"th", b"tr", b"tw", b"wh", b"wr", b"wy", b"rh", b"zh",
];

/// Consonant pairs that can end an English word.
const CODAS: [&[u8; 2]; 46] = [
    b"ck", b"ft", b"lc", b"ld", b"lf", b"lk", b"ll", b"lm", b"lp", b"ls", b"lt", b"mp", b"ms",
    b"nc", b"nd", b"ng", b"nk", b"nn", b"ns", b"nt", b"rc", b"rd", b"rf", b"rg", b"rk", b"rl",
    b"rm", b"rn", b"rp", b"rr", b"rs", b"rt", b"sc", b"sh", b"sk", b"sp", b"ss", b"st", b"ct",
    b"ff", b"gs", b"gt", b"pt", b"tt", b"xt", b"zz",
];

/// Bit `b` of row `a` set means letter `b` never follows letter `a`.
const IMPOSSIBLE_AFTER: [u32; 26] = [
    0x0000_0000, // a
    0x0200_0200, // b
    0x0020_0200, // c
    0x0001_0200, // d
    0x0000_0000, // e
    0x0201_0200, // f
    0x0001_0200, // g
    0x0200_0200, // h
    0x0000_0000, // i
    0xFFEF_BEEE, // j: vowels only
    0x0200_0200, // k
    0x0001_0200, // l
    0x0001_0200, // m
    0x0001_0200, // n
    0x0000_0000, // o
    0x0021_0200, // p
    0xFFEF_FFFF, // q: u only
    0x0001_0200, // r
    0x0000_0000, // s
    0x0001_0200, // t
    0x0000_0000, // u
    0x02D9_76E2, // v
    0x0201_0200, // w
    0x02D7_FFEE, // x
    0x0001_0200, // y
    0x02D9_36EE, // z
];

const SUFFIXES: [&[u8]; 10] = [
    b"ing", b"ed", b"ly", b"ness", b"tion", b"ment", b"able", b"er", b"est", b"ful",
];

const PREFIXES: [&[u8]; 7] = [b"un", b"re", b"pre", b"dis", b"mis", b"over", b"ex"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Likelihood {
    NotEnglish = 0,
    Possible = 1,
    Likely = 2,
    VeryLikely = 3,
}

#[inline(always)]
fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

#[inline]
pub fn is_impossible_bigram(a: u8, b: u8) -> bool {
    if !a.is_ascii_lowercase() || !b.is_ascii_lowercase() {
        return true;
    }
    (IMPOSSIBLE_AFTER[(a - b'a') as usize] >> (b - b'a')) & 1 == 1
}

/// Likelihood that `word` (ASCII letters, any case) is English.
pub fn likelihood(word: &[u8]) -> Likelihood {
    if word.len() < 2 || word.len() > 32 {
        return Likelihood::NotEnglish;
    }
    let mut buf = [0u8; 32];
    for (dst, &b) in buf.iter_mut().zip(word) {
        if !b.is_ascii_alphabetic() {
            return Likelihood::NotEnglish;
        }
        *dst = b.to_ascii_lowercase();
    }
    let w = &buf[..word.len()];

    if w.windows(2).any(|p| is_impossible_bigram(p[0], p[1])) {
        return Likelihood::NotEnglish;
    }

    let mut score = 1;
    if !is_vowel(w[0]) && !is_vowel(w[1]) {
        if !ONSETS.iter().any(|o| o[..] == w[..2]) {
            return Likelihood::NotEnglish;
        }
        score += 1;
    }
    let n = w.len();
    if !is_vowel(w[n - 2]) && !is_vowel(w[n - 1]) && CODAS.iter().any(|c| c[..] == w[n - 2..]) {
        score += 1;
    }
    if SUFFIXES.iter().any(|s| n > s.len() && w.ends_with(s)) {
        score += 1;
    }
    if PREFIXES.iter().any(|p| n > p.len() && w.starts_with(p)) {
        score += 1;
    }

    match score {
        1 => Likelihood::Possible,
        2 => Likelihood::Likely,
        _ => Likelihood::VeryLikely,
    }
}
