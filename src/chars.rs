//! Composed characters: a base letter carrying tone, vowel mark and stroke
//! as independent attributes, plus the Unicode tables to render and parse them.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tone {
    #[default]
    None = 0,
    Sac = 1,
    Huyen = 2,
    Hoi = 3,
    Nga = 4,
    Nang = 5,
}

impl Tone {
    pub const fn from_index(i: u8) -> Tone {
        match i {
            1 => Tone::Sac,
            2 => Tone::Huyen,
            3 => Tone::Hoi,
            4 => Tone::Nga,
            5 => Tone::Nang,
            _ => Tone::None,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Tones a syllable closed by a stop consonant may carry while being typed.
    #[inline(always)]
    pub const fn fits_stop_final(self) -> bool {
        matches!(self, Tone::None | Tone::Sac | Tone::Nang)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    None,
    Circumflex,
    Breve,
    Horn,
}

impl Mark {
    /// Bit used by the phonotactic mark sets.
    #[inline(always)]
    pub const fn bit(self) -> u8 {
        match self {
            Mark::None => 1 << 0,
            Mark::Circumflex => 1 << 1,
            Mark::Breve => 1 << 2,
            Mark::Horn => 1 << 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Char {
    /// Lowercase ASCII letter (or the literal byte for non-letters).
    pub base: u8,
    pub caps: bool,
    pub tone: Tone,
    pub mark: Mark,
    pub stroke: bool,
}

#[inline(always)]
pub const fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

// Rows follow ROW_KEYS, columns follow Tone.
const VOWEL_ROWS: [[char; 6]; 12] = [
    ['a', 'á', 'à', 'ả', 'ã', 'ạ'],
    ['ă', 'ắ', 'ằ', 'ẳ', 'ẵ', 'ặ'],
    ['â', 'ấ', 'ầ', 'ẩ', 'ẫ', 'ậ'],
    ['e', 'é', 'è', 'ẻ', 'ẽ', 'ẹ'],
    ['ê', 'ế', 'ề', 'ể', 'ễ', 'ệ'],
    ['i', 'í', 'ì', 'ỉ', 'ĩ', 'ị'],
    ['o', 'ó', 'ò', 'ỏ', 'õ', 'ọ'],
    ['ô', 'ố', 'ồ', 'ổ', 'ỗ', 'ộ'],
    ['ơ', 'ớ', 'ờ', 'ở', 'ỡ', 'ợ'],
    ['u', 'ú', 'ù', 'ủ', 'ũ', 'ụ'],
    ['ư', 'ứ', 'ừ', 'ử', 'ữ', 'ự'],
    ['y', 'ý', 'ỳ', 'ỷ', 'ỹ', 'ỵ'],
];

const ROW_KEYS: [(u8, Mark); 12] = [
    (b'a', Mark::None),
    (b'a', Mark::Breve),
    (b'a', Mark::Circumflex),
    (b'e', Mark::None),
    (b'e', Mark::Circumflex),
    (b'i', Mark::None),
    (b'o', Mark::None),
    (b'o', Mark::Circumflex),
    (b'o', Mark::Horn),
    (b'u', Mark::None),
    (b'u', Mark::Horn),
    (b'y', Mark::None),
];

#[inline(always)]
fn row(base: u8, mark: Mark) -> Option<usize> {
    ROW_KEYS.iter().position(|&(b, m)| b == base && m == mark)
}

/// Whether `base` can carry `mark` at all (â ă ê ô ơ ư).
#[inline(always)]
pub fn accepts_mark(base: u8, mark: Mark) -> bool {
    row(base, mark).is_some()
}

impl Char {
    #[inline(always)]
    pub const fn literal(base: u8, caps: bool) -> Self {
        Self {
            base,
            caps,
            tone: Tone::None,
            mark: Mark::None,
            stroke: false,
        }
    }

    #[inline(always)]
    pub const fn is_vowel(&self) -> bool {
        is_vowel(self.base)
    }

    /// True when the character carries no diacritic of any kind.
    #[inline(always)]
    pub fn is_plain(&self) -> bool {
        self.tone == Tone::None && self.mark == Mark::None && !self.stroke
    }

    pub fn lower(&self) -> char {
        if self.is_vowel() {
            let r = row(self.base, self.mark)
                .or_else(|| row(self.base, Mark::None))
                .unwrap_or(0);
            return VOWEL_ROWS[r][self.tone.index()];
        }
        if self.base == b'd' && self.stroke {
            return 'đ';
        }
        self.base as char
    }

    pub fn to_char(&self) -> char {
        let c = self.lower();
        if self.caps {
            c.to_uppercase().next().unwrap_or(c)
        } else {
            c
        }
    }

    /// Vowel rendered with its mark but without tone, used to look up nuclei.
    pub fn toneless(&self) -> char {
        Char {
            tone: Tone::None,
            caps: false,
            ..*self
        }
        .lower()
    }

    /// Parses a rendered character back into its attributes.
    pub fn from_char(ch: char) -> Option<Char> {
        let lower = ch.to_lowercase().next()?;
        let caps = lower != ch;
        if lower.is_ascii() {
            let b = lower as u8;
            return b.is_ascii_alphanumeric().then(|| Char::literal(b, caps));
        }
        if lower == 'đ' {
            return Some(Char {
                stroke: true,
                ..Char::literal(b'd', caps)
            });
        }
        for (r, tones) in VOWEL_ROWS.iter().enumerate() {
            if let Some(t) = tones.iter().position(|&c| c == lower) {
                let (base, mark) = ROW_KEYS[r];
                return Some(Char {
                    base,
                    caps,
                    tone: Tone::from_index(t as u8),
                    mark,
                    stroke: false,
                });
            }
        }
        None
    }
}
