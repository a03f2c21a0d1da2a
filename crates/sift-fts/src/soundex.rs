//! Phonetic encoders.
//!
//! A [`SoundexGenerator`] wraps one [`PhoneticEncoder`] chosen per language:
//! a domain override names an encoder, otherwise German uses Kölner Phonetik
//! and every other language the classic (American) Soundex.
//!
//! Phonetic codes are a secondary match path. Word rows store the code next to
//! the literal word so queries with a typo still surface something.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Turns a word into a phonetic key.
pub trait PhoneticEncoder: Send + Sync {
    /// Short identifier used in configuration (`soundex`, `cologne`, `none`).
    fn name(&self) -> &'static str;

    /// Encode a single word. Returns an empty string when nothing encodable
    /// is left after normalization.
    fn encode(&self, word: &str) -> String;
}

// ============================================================================
// Classic Soundex
// ============================================================================

/// Classic American Soundex: first letter plus three digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicSoundex;

impl ClassicSoundex {
    fn code(c: char) -> Option<char> {
        match c {
            'b' | 'f' | 'p' | 'v' => Some('1'),
            'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
            'd' | 't' => Some('3'),
            'l' => Some('4'),
            'm' | 'n' => Some('5'),
            'r' => Some('6'),
            // vowels separate equal codes, h and w do not
            'a' | 'e' | 'i' | 'o' | 'u' | 'y' => Some('0'),
            _ => None,
        }
    }
}

impl PhoneticEncoder for ClassicSoundex {
    fn name(&self) -> &'static str {
        "soundex"
    }

    fn encode(&self, word: &str) -> String {
        let mut letters = word
            .chars()
            .flat_map(char::to_lowercase)
            .filter(char::is_ascii_lowercase);

        let Some(first) = letters.next() else {
            return String::new();
        };

        let mut key = String::with_capacity(4);
        key.push(first.to_ascii_uppercase());
        let mut last = Self::code(first);

        for c in letters {
            if key.len() == 4 {
                break;
            }
            match Self::code(c) {
                None => continue,
                Some('0') => last = Some('0'),
                Some(code) => {
                    if last != Some(code) {
                        key.push(code);
                    }
                    last = Some(code);
                }
            }
        }

        while key.len() < 4 {
            key.push('0');
        }
        key
    }
}

// ============================================================================
// Kölner Phonetik
// ============================================================================

/// Kölner Phonetik (Cologne phonetics) for German.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColognePhonetic;

impl ColognePhonetic {
    fn normalize(word: &str) -> Vec<char> {
        word.chars()
            .flat_map(char::to_lowercase)
            .filter_map(|c| match c {
                'ä' => Some('a'),
                'ö' => Some('o'),
                'ü' => Some('u'),
                'ß' => Some('s'),
                c if c.is_ascii_lowercase() => Some(c),
                _ => None,
            })
            .collect()
    }

    fn code(prev: Option<char>, c: char, next: Option<char>, initial: bool) -> &'static str {
        let next_in = |set: &str| next.is_some_and(|n| set.contains(n));
        let prev_in = |set: &str| prev.is_some_and(|p| set.contains(p));

        match c {
            'a' | 'e' | 'i' | 'j' | 'o' | 'u' | 'y' => "0",
            'h' => "",
            'b' => "1",
            'p' if next == Some('h') => "3",
            'p' => "1",
            'd' | 't' if next_in("csz") => "8",
            'd' | 't' => "2",
            'f' | 'v' | 'w' => "3",
            'g' | 'k' | 'q' => "4",
            'c' if initial => {
                if next_in("ahkloqrux") {
                    "4"
                } else {
                    "8"
                }
            }
            'c' if prev_in("sz") => "8",
            'c' if next_in("ahkoqux") => "4",
            'c' => "8",
            'x' if prev_in("ckq") => "8",
            'x' => "48",
            'l' => "5",
            'm' | 'n' => "6",
            'r' => "7",
            's' | 'z' => "8",
            _ => "",
        }
    }
}

impl PhoneticEncoder for ColognePhonetic {
    fn name(&self) -> &'static str {
        "cologne"
    }

    fn encode(&self, word: &str) -> String {
        let chars = Self::normalize(word);

        let mut raw = String::with_capacity(chars.len() + 1);
        for (i, &c) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            raw.push_str(Self::code(prev, c, next, i == 0));
        }

        let mut key = String::with_capacity(raw.len());
        let mut last = None;
        for (i, digit) in raw.chars().enumerate() {
            if last == Some(digit) {
                continue;
            }
            last = Some(digit);
            if digit != '0' || i == 0 {
                key.push(digit);
            }
        }
        key
    }
}

// ============================================================================
// No-op encoder
// ============================================================================

/// Encoder that disables the phonetic match path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPhonetic;

impl PhoneticEncoder for NoPhonetic {
    fn name(&self) -> &'static str {
        "none"
    }

    fn encode(&self, _word: &str) -> String {
        String::new()
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Look up an encoder by its configuration name.
pub fn encoder_by_name(name: &str) -> Option<Arc<dyn PhoneticEncoder>> {
    match name.trim().to_lowercase().as_str() {
        "soundex" | "classic" => Some(Arc::new(ClassicSoundex)),
        "cologne" | "koelner" | "german" => Some(Arc::new(ColognePhonetic)),
        "none" | "off" => Some(Arc::new(NoPhonetic)),
        _ => None,
    }
}

/// Phonetic encoder resolved for one language.
#[derive(Clone)]
pub struct SoundexGenerator {
    language: String,
    encoder: Arc<dyn PhoneticEncoder>,
}

impl SoundexGenerator {
    /// Resolve the generator for a language code.
    ///
    /// `overrides` maps language codes to encoder names. An override naming an
    /// unknown encoder is logged and ignored.
    pub fn for_language(code: &str, overrides: &BTreeMap<String, String>) -> Self {
        let code = code.to_lowercase();

        if let Some(name) = overrides.get(&code) {
            match encoder_by_name(name) {
                Some(encoder) => return Self::with_encoder(&code, encoder),
                None => log::warn!(
                    "Unknown phonetic encoder '{name}' for language '{code}', using built-in"
                ),
            }
        }

        let encoder: Arc<dyn PhoneticEncoder> = match code.as_str() {
            "de" => Arc::new(ColognePhonetic),
            _ => Arc::new(ClassicSoundex),
        };
        Self::with_encoder(&code, encoder)
    }

    /// Wrap an explicit encoder.
    pub fn with_encoder(code: &str, encoder: Arc<dyn PhoneticEncoder>) -> Self {
        Self {
            language: code.to_string(),
            encoder,
        }
    }

    /// Encode a word.
    pub fn encode(&self, word: &str) -> String {
        self.encoder.encode(word)
    }

    /// Name of the wrapped encoder.
    pub fn encoder_name(&self) -> &'static str {
        self.encoder.name()
    }

    /// Language code the generator was resolved for.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl fmt::Debug for SoundexGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundexGenerator")
            .field("language", &self.language)
            .field("encoder", &self.encoder.name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
