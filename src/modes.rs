use serde::{Deserialize, Serialize};

use crate::chars::{Char, Mark, Tone};
use crate::config::ConfigError;
use crate::keys;

pub const MARK_CIRCUMFLEX: u8 = 1 << 0;
pub const MARK_BREVE: u8 = 1 << 1;
pub const MARK_HORN: u8 = 1 << 2;

/// Tone table value for the key that clears the tone (Telex `z`, VNI `0`).
pub const TONE_REMOVE: u8 = 0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    #[default]
    Telex,
    Vni,
}

impl TryFrom<u8> for InputMethod {
    type Error = ConfigError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(InputMethod::Telex),
            1 => Ok(InputMethod::Vni),
            other => Err(ConfigError::UnknownMethod(other)),
        }
    }
}

/// Semantic category of a key for the syllable state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCategory {
    Vowel = 0,
    Initial = 1,
    Final = 2,
    Stop = 3,
    Tone = 4,
    Mark = 5,
    Stroke = 6,
    Other = 7,
}

pub const CATEGORY_COUNT: usize = 8;

impl KeyCategory {
    const fn from_u8(v: u8) -> KeyCategory {
        match v {
            0 => KeyCategory::Vowel,
            1 => KeyCategory::Initial,
            2 => KeyCategory::Final,
            3 => KeyCategory::Stop,
            4 => KeyCategory::Tone,
            5 => KeyCategory::Mark,
            6 => KeyCategory::Stroke,
            _ => KeyCategory::Other,
        }
    }
}

pub struct Mode {
    pub method: InputMethod,
    pub classify: &'static [u8; 256],
    pub tone: &'static [u8; 256],
    pub mark: &'static [u8; 256],
    pub stroke_key: u8,
    /// Typing a vowel again puts a circumflex on it (aa, ee, oo).
    pub circumflex_by_vowel: bool,
    /// The mark key alone produces ư.
    pub w_vowel: bool,
}

pub fn mode_for(method: InputMethod) -> &'static Mode {
    match method {
        InputMethod::Telex => &TELEX_MODE,
        InputMethod::Vni => &VNI_MODE,
    }
}

const TELEX_MODE: Mode = Mode {
    method: InputMethod::Telex,
    classify: &CLASSIFY_TELEX,
    tone: &TONE_TELEX,
    mark: &MARK_TELEX,
    stroke_key: b'd',
    circumflex_by_vowel: true,
    w_vowel: true,
};

const VNI_MODE: Mode = Mode {
    method: InputMethod::Vni,
    classify: &CLASSIFY_VNI,
    tone: &TONE_VNI,
    mark: &MARK_VNI,
    stroke_key: b'9',
    circumflex_by_vowel: false,
    w_vowel: false,
};

const fn shared_letters() -> [u8; 256] {
    let mut t = [KeyCategory::Other as u8; 256];
    let mut b = b'a';
    while b <= b'z' {
        t[b as usize] = KeyCategory::Initial as u8;
        b += 1;
    }
    t[b'a' as usize] = KeyCategory::Vowel as u8;
    t[b'e' as usize] = KeyCategory::Vowel as u8;
    t[b'i' as usize] = KeyCategory::Vowel as u8;
    t[b'o' as usize] = KeyCategory::Vowel as u8;
    t[b'u' as usize] = KeyCategory::Vowel as u8;
    t[b'y' as usize] = KeyCategory::Vowel as u8;

    t[b'm' as usize] = KeyCategory::Final as u8;
    t[b'n' as usize] = KeyCategory::Final as u8;

    t[b'c' as usize] = KeyCategory::Stop as u8;
    t[b'p' as usize] = KeyCategory::Stop as u8;
    t[b't' as usize] = KeyCategory::Stop as u8;
    t
}

pub const CLASSIFY_TELEX: [u8; 256] = {
    let mut t = shared_letters();
    t[b's' as usize] = KeyCategory::Tone as u8;
    t[b'f' as usize] = KeyCategory::Tone as u8;
    t[b'r' as usize] = KeyCategory::Tone as u8;
    t[b'x' as usize] = KeyCategory::Tone as u8;
    t[b'j' as usize] = KeyCategory::Tone as u8;
    t[b'z' as usize] = KeyCategory::Tone as u8;

    t[b'w' as usize] = KeyCategory::Mark as u8;
    t[b'd' as usize] = KeyCategory::Stroke as u8;
    t
};

pub const CLASSIFY_VNI: [u8; 256] = {
    let mut t = shared_letters();
    t[b'0' as usize] = KeyCategory::Tone as u8;
    t[b'1' as usize] = KeyCategory::Tone as u8;
    t[b'2' as usize] = KeyCategory::Tone as u8;
    t[b'3' as usize] = KeyCategory::Tone as u8;
    t[b'4' as usize] = KeyCategory::Tone as u8;
    t[b'5' as usize] = KeyCategory::Tone as u8;

    t[b'6' as usize] = KeyCategory::Mark as u8;
    t[b'7' as usize] = KeyCategory::Mark as u8;
    t[b'8' as usize] = KeyCategory::Mark as u8;
    t[b'9' as usize] = KeyCategory::Stroke as u8;
    t
};

pub const TONE_TELEX: [u8; 256] = {
    let mut t = [0u8; 256];
    t[b's' as usize] = 1;
    t[b'f' as usize] = 2;
    t[b'r' as usize] = 3;
    t[b'x' as usize] = 4;
    t[b'j' as usize] = 5;
    t[b'z' as usize] = TONE_REMOVE;
    t
};

pub const TONE_VNI: [u8; 256] = {
    let mut t = [0u8; 256];
    t[b'0' as usize] = TONE_REMOVE;
    t[b'1' as usize] = 1;
    t[b'2' as usize] = 2;
    t[b'3' as usize] = 3;
    t[b'4' as usize] = 4;
    t[b'5' as usize] = 5;
    t
};

pub const MARK_TELEX: [u8; 256] = {
    let mut t = [0u8; 256];
    t[b'w' as usize] = MARK_BREVE | MARK_HORN;
    t
};

pub const MARK_VNI: [u8; 256] = {
    let mut t = [0u8; 256];
    t[b'6' as usize] = MARK_CIRCUMFLEX;
    t[b'7' as usize] = MARK_HORN;
    t[b'8' as usize] = MARK_BREVE;
    t
};

const TONE_KEYS_TELEX: [u8; 6] = [0, b's', b'f', b'r', b'x', b'j'];
const TONE_KEYS_VNI: [u8; 6] = [0, b'1', b'2', b'3', b'4', b'5'];

impl Mode {
    #[inline(always)]
    pub fn category(&self, key: u8) -> KeyCategory {
        KeyCategory::from_u8(self.classify[key.to_ascii_lowercase() as usize])
    }

    #[inline(always)]
    pub fn tone_of(&self, key: u8) -> u8 {
        self.tone[key.to_ascii_lowercase() as usize]
    }

    #[inline(always)]
    pub fn marks_of(&self, key: u8) -> u8 {
        self.mark[key.to_ascii_lowercase() as usize]
    }

    /// Key that puts `tone` on a vowel.
    pub fn tone_key(&self, tone: Tone) -> Option<u8> {
        let table = match self.method {
            InputMethod::Telex => &TONE_KEYS_TELEX,
            InputMethod::Vni => &TONE_KEYS_VNI,
        };
        match table[tone.index()] {
            0 => None,
            k => Some(k),
        }
    }

    fn mark_key(&self, base: u8, mark: Mark) -> Option<u8> {
        match (self.method, mark) {
            (_, Mark::None) => None,
            (InputMethod::Telex, Mark::Circumflex) => Some(base),
            (InputMethod::Telex, _) => Some(b'w'),
            (InputMethod::Vni, Mark::Circumflex) => Some(b'6'),
            (InputMethod::Vni, Mark::Horn) => Some(b'7'),
            (InputMethod::Vni, Mark::Breve) => Some(b'8'),
        }
    }

    /// Keystrokes that produce `c` without its tone, as `(byte, consumed)` pairs.
    /// Tones are typed once per word; see [`Mode::tone_key`].
    pub fn keystrokes(&self, c: &Char, mut emit: impl FnMut(u8, bool)) {
        let letter = if c.caps {
            c.base.to_ascii_uppercase()
        } else {
            c.base
        };
        emit(letter, false);
        if c.stroke {
            emit(self.stroke_key, true);
        }
        if let Some(k) = self.mark_key(c.base, c.mark) {
            emit(k, true);
        }
    }
}

/// Category of a canonical key code; keys that produce no character are `Other`.
pub fn classify_key(key: u16, method: InputMethod) -> KeyCategory {
    match keys::to_char(key, false, false) {
        Some(ch) if ch.is_ascii() => mode_for(method).category(ch as u8),
        _ => KeyCategory::Other,
    }
}
