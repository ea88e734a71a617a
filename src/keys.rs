//! Canonical key codes (macOS virtual-key numbering) and their US-layout characters.
//! Hosts translate native key events into these codes before calling the engine.

pub const A: u16 = 0;
pub const S: u16 = 1;
pub const D: u16 = 2;
pub const F: u16 = 3;
pub const H: u16 = 4;
pub const G: u16 = 5;
pub const Z: u16 = 6;
pub const X: u16 = 7;
pub const C: u16 = 8;
pub const V: u16 = 9;
pub const B: u16 = 11;
pub const Q: u16 = 12;
pub const W: u16 = 13;
pub const E: u16 = 14;
pub const R: u16 = 15;
pub const Y: u16 = 16;
pub const T: u16 = 17;
pub const N1: u16 = 18;
pub const N2: u16 = 19;
pub const N3: u16 = 20;
pub const N4: u16 = 21;
pub const N6: u16 = 22;
pub const N5: u16 = 23;
pub const EQUAL: u16 = 24;
pub const N9: u16 = 25;
pub const N7: u16 = 26;
pub const MINUS: u16 = 27;
pub const N8: u16 = 28;
pub const N0: u16 = 29;
pub const RBRACKET: u16 = 30;
pub const O: u16 = 31;
pub const U: u16 = 32;
pub const LBRACKET: u16 = 33;
pub const I: u16 = 34;
pub const P: u16 = 35;
pub const RETURN: u16 = 36;
pub const L: u16 = 37;
pub const J: u16 = 38;
pub const QUOTE: u16 = 39;
pub const K: u16 = 40;
pub const SEMICOLON: u16 = 41;
pub const BACKSLASH: u16 = 42;
pub const COMMA: u16 = 43;
pub const SLASH: u16 = 44;
pub const N: u16 = 45;
pub const M: u16 = 46;
pub const DOT: u16 = 47;
pub const TAB: u16 = 48;
pub const SPACE: u16 = 49;
pub const BACKQUOTE: u16 = 50;
pub const DELETE: u16 = 51;
pub const ESC: u16 = 53;
pub const ENTER: u16 = 76;
pub const LEFT: u16 = 123;
pub const RIGHT: u16 = 124;
pub const DOWN: u16 = 125;
pub const UP: u16 = 126;

const UNSHIFTED: [u8; 128] = {
    let mut t = [0u8; 128];
    t[A as usize] = b'a';
    t[B as usize] = b'b';
    t[C as usize] = b'c';
    t[D as usize] = b'd';
    t[E as usize] = b'e';
    t[F as usize] = b'f';
    t[G as usize] = b'g';
    t[H as usize] = b'h';
    t[I as usize] = b'i';
    t[J as usize] = b'j';
    t[K as usize] = b'k';
    t[L as usize] = b'l';
    t[M as usize] = b'm';
    t[N as usize] = b'n';
    t[O as usize] = b'o';
    t[P as usize] = b'p';
    t[Q as usize] = b'q';
    t[R as usize] = b'r';
    t[S as usize] = b's';
    t[T as usize] = b't';
    t[U as usize] = b'u';
    t[V as usize] = b'v';
    t[W as usize] = b'w';
    t[X as usize] = b'x';
    t[Y as usize] = b'y';
    t[Z as usize] = b'z';

    t[N0 as usize] = b'0';
    t[N1 as usize] = b'1';
    t[N2 as usize] = b'2';
    t[N3 as usize] = b'3';
    t[N4 as usize] = b'4';
    t[N5 as usize] = b'5';
    t[N6 as usize] = b'6';
    t[N7 as usize] = b'7';
    t[N8 as usize] = b'8';
    t[N9 as usize] = b'9';

    t[EQUAL as usize] = b'=';
    t[MINUS as usize] = b'-';
    t[RBRACKET as usize] = b']';
    t[LBRACKET as usize] = b'[';
    t[QUOTE as usize] = b'\'';
    t[SEMICOLON as usize] = b';';
    t[BACKSLASH as usize] = b'\\';
    t[COMMA as usize] = b',';
    t[SLASH as usize] = b'/';
    t[DOT as usize] = b'.';
    t[BACKQUOTE as usize] = b'`';
    t[SPACE as usize] = b' ';
    t
};

const SHIFTED: [u8; 128] = {
    let mut t = UNSHIFTED;
    t[N1 as usize] = b'!';
    t[N2 as usize] = b'@';
    t[N3 as usize] = b'#';
    t[N4 as usize] = b'$';
    t[N5 as usize] = b'%';
    t[N6 as usize] = b'^';
    t[N7 as usize] = b'&';
    t[N8 as usize] = b'*';
    t[N9 as usize] = b'(';
    t[N0 as usize] = b')';

    t[EQUAL as usize] = b'+';
    t[MINUS as usize] = b'_';
    t[RBRACKET as usize] = b'}';
    t[LBRACKET as usize] = b'{';
    t[QUOTE as usize] = b'"';
    t[SEMICOLON as usize] = b':';
    t[BACKSLASH as usize] = b'|';
    t[COMMA as usize] = b'<';
    t[SLASH as usize] = b'?';
    t[DOT as usize] = b'>';
    t[BACKQUOTE as usize] = b'~';
    t
};

/// Character the key produces; letters are uppercase when exactly one of
/// caps-lock and shift is active.
pub fn to_char(key: u16, caps: bool, shift: bool) -> Option<char> {
    let table = if shift { &SHIFTED } else { &UNSHIFTED };
    let b = *table.get(key as usize)?;
    if b == 0 {
        return None;
    }
    if b.is_ascii_lowercase() && caps != shift {
        return Some(b.to_ascii_uppercase() as char);
    }
    Some(b as char)
}

/// Key code and shift state that type `ch` on a US layout. Control
/// characters map to their keys (`\n` Return, `\u{8}` Delete, `\u{1b}` Esc).
pub fn from_char(ch: char) -> Option<(u16, bool)> {
    match ch {
        '\n' => return Some((RETURN, false)),
        '\t' => return Some((TAB, false)),
        '\u{8}' => return Some((DELETE, false)),
        '\u{1b}' => return Some((ESC, false)),
        _ if !ch.is_ascii() => return None,
        _ => {}
    }
    let b = ch as u8;
    if b.is_ascii_uppercase() {
        let key = UNSHIFTED.iter().position(|&c| c == b.to_ascii_lowercase())?;
        return Some((key as u16, true));
    }
    if let Some(key) = UNSHIFTED.iter().position(|&c| c == b && c != 0) {
        return Some((key as u16, false));
    }
    SHIFTED
        .iter()
        .position(|&c| c == b && c != 0)
        .map(|key| (key as u16, true))
}

#[inline(always)]
pub fn is_cursor(key: u16) -> bool {
    matches!(key, LEFT | RIGHT | DOWN | UP)
}

/// Sentence-ending punctuation that arms auto-capitalization.
#[inline(always)]
pub fn ends_sentence(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}
