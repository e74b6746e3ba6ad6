//! Scalar built-in domains: `Int`, `Boolean`, `Singleton`, `Char`, `Str`
//! (the `String` domain), and `Name`.

use crate::domain::{AnyDomain, Domain};
use crate::error::ConfigError;
use crate::rng::PrngHandle;

/// `Int(min_value, max_value)`. Not exhaustible.
///
/// The first canonical sample is `0` whenever `0` is in range — a
/// deliberate boundary bias that catches divide-by-zero bugs early.
#[derive(Debug, Clone)]
pub struct Int {
    min_value: i64,
    max_value: i64,
}

impl Int {
    pub fn new(min_value: i64, max_value: i64) -> Result<Self, ConfigError> {
        if min_value > max_value {
            return Err(ConfigError::InvalidLengthBounds {
                min_len: min_value.max(0) as usize,
                max_len: max_value.max(0) as usize,
            });
        }
        Ok(Self {
            min_value,
            max_value,
        })
    }

    pub fn default_range() -> Self {
        Self::new(0, 10_000).expect("default Int range is always valid")
    }
}

impl Default for Int {
    fn default() -> Self {
        Self::default_range()
    }
}

impl Domain<i64> for Int {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = i64>> {
        let min = self.min_value;
        let max = self.max_value;
        let zero_first = if min <= 0 && 0 <= max { Some(0) } else { None };
        let rng = rng.clone();
        Box::new(zero_first.into_iter().chain(std::iter::repeat_with(move || rng.randint(min, max))))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = i64>>> {
        None
    }
}

/// Always exhaustible; exhaustive order is `false, true`.
#[derive(Debug, Clone, Default)]
pub struct Boolean;

impl Boolean {
    pub fn new() -> Self {
        Self
    }
}

impl Domain<bool> for Boolean {
    fn is_exhaustible(&self) -> bool {
        true
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = bool>> {
        let rng = rng.clone();
        Box::new(std::iter::repeat_with(move || rng.gen_bool()))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = bool>>> {
        Some(Box::new([false, true].into_iter()))
    }
}

/// Always exhaustible: an infinite stream of `v` canonically, a single `v`
/// exhaustively.
#[derive(Debug, Clone)]
pub struct Singleton<T>(T);

impl<T> Singleton<T> {
    pub fn new(v: T) -> Self {
        Self(v)
    }
}

impl<T: Clone + 'static> Domain<T> for Singleton<T> {
    fn is_exhaustible(&self) -> bool {
        true
    }

    fn canonical(&self, _rng: &PrngHandle) -> Box<dyn Iterator<Item = T>> {
        let v = self.0.clone();
        Box::new(std::iter::repeat_with(move || v.clone()))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = T>>> {
        Some(Box::new(std::iter::once(self.0.clone())))
    }
}

/// Character encodings `Char` and `String` accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coding {
    Ascii,
    AsciiPrintable,
    Utf8,
}

impl Coding {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "ascii" => Ok(Coding::Ascii),
            "ascii.printable" => Ok(Coding::AsciiPrintable),
            "utf-8" => Ok(Coding::Utf8),
            other => Err(ConfigError::UnknownCharCoding {
                coding: other.to_string(),
            }),
        }
    }

    fn sample(self, rng: &PrngHandle) -> char {
        match self {
            Coding::Ascii => rng.randint(0, 127) as u8 as char,
            Coding::AsciiPrintable => rng.randint(0x20, 0x7e) as u8 as char,
            Coding::Utf8 => loop {
                // Reject-sample away from the control-character category.
                let cp = rng.randint(0x20, 0x10_FFFF) as u32;
                if let Some(c) = char::from_u32(cp) {
                    if !c.is_control() {
                        return c;
                    }
                }
            },
        }
    }
}

/// `Char(coding)`. Not exhaustible (the codepoint space is too large to
/// enumerate for any of the three codings).
#[derive(Debug, Clone)]
pub struct Char {
    coding: Coding,
}

impl Char {
    pub fn new(coding: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            coding: Coding::parse(coding)?,
        })
    }
}

impl Domain<char> for Char {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = char>> {
        let coding = self.coding;
        let rng = rng.clone();
        Box::new(std::iter::repeat_with(move || coding.sample(&rng)))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = char>>> {
        None
    }
}

/// `String(coding, min_len, max_len, alphabet)`. Not exhaustible.
///
/// If `min_len == 0` the first sample is the empty string; every sample's
/// length is otherwise drawn uniformly from `[min_len, max_len]`. When an
/// `alphabet` domain is supplied, characters are drawn from its exhaustive
/// enumeration instead of `coding`'s codepoint range — `coding` is still
/// required (and still validated) so a caller that later drops the
/// alphabet falls back to a coherent default.
#[derive(Clone)]
pub struct Str {
    coding: Coding,
    min_len: usize,
    max_len: usize,
    alphabet: Option<AnyDomain>,
}

impl Str {
    pub fn new(coding: &str, min_len: usize, max_len: usize) -> Result<Self, ConfigError> {
        if min_len > max_len {
            return Err(ConfigError::InvalidLengthBounds { min_len, max_len });
        }
        Ok(Self {
            coding: Coding::parse(coding)?,
            min_len,
            max_len,
            alphabet: None,
        })
    }

    /// `alphabet` must be an exhaustible domain of `Value::Char`; its
    /// exhaustive enumeration is materialised once here and drawn from
    /// uniformly, in place of `coding`'s own codepoint range.
    pub fn with_alphabet(
        coding: &str,
        min_len: usize,
        max_len: usize,
        alphabet: AnyDomain,
    ) -> Result<Self, ConfigError> {
        let mut s = Self::new(coding, min_len, max_len)?;
        s.alphabet = Some(alphabet);
        Ok(s)
    }

    pub fn default_bounds(coding: &str) -> Result<Self, ConfigError> {
        Self::new(coding, 0, 80)
    }

    fn alphabet_chars(&self) -> Option<Vec<char>> {
        self.alphabet.as_ref().map(|a| {
            a.exhaustive()
                .expect("String's alphabet domain must be exhaustible")
                .filter_map(|v| match v {
                    crate::value::Value::Char(c) => Some(c),
                    _ => None,
                })
                .collect()
        })
    }
}

impl Domain<String> for Str {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = String>> {
        let coding = self.coding;
        let min_len = self.min_len;
        let max_len = self.max_len;
        let alphabet = self.alphabet_chars();
        let rng = rng.clone();
        let mut first_is_empty = min_len == 0;
        Box::new(std::iter::repeat_with(move || {
            if first_is_empty {
                first_is_empty = false;
                return String::new();
            }
            let len = rng.randint(min_len as i64, max_len as i64) as usize;
            match &alphabet {
                Some(chars) if !chars.is_empty() => (0..len).map(|_| rng.gen_char_in(chars)).collect(),
                _ => (0..len).map(|_| coding.sample(&rng)).collect(),
            }
        }))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = String>>> {
        None
    }
}

/// `Name(min_len, max_len)`: identifier-like strings. First character from
/// `[A-Za-z_]`, the rest from `[A-Za-z0-9_]`. Not exhaustible.
///
/// Length is drawn uniformly from `[min_len, max_len]` independently per
/// sample.
#[derive(Debug, Clone)]
pub struct Name {
    min_len: usize,
    max_len: usize,
}

const NAME_HEAD: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L',
    'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '_',
];

const NAME_TAIL_EXTRA: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

impl Name {
    pub fn new(min_len: usize, max_len: usize) -> Result<Self, ConfigError> {
        if min_len < 1 {
            return Err(ConfigError::NameMinLenTooSmall { min_len });
        }
        if min_len > max_len {
            return Err(ConfigError::InvalidLengthBounds { min_len, max_len });
        }
        Ok(Self { min_len, max_len })
    }
}

impl Domain<String> for Name {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = String>> {
        let min_len = self.min_len;
        let max_len = self.max_len;
        let rng = rng.clone();
        Box::new(std::iter::repeat_with(move || {
            let len = rng.randint(min_len as i64, max_len as i64) as usize;
            let mut s = String::with_capacity(len);
            s.push(rng.gen_char_in(NAME_HEAD));
            for _ in 1..len {
                if rng.gen_bool() {
                    s.push(rng.gen_char_in(NAME_HEAD));
                } else {
                    s.push(rng.gen_char_in(NAME_TAIL_EXTRA));
                }
            }
            s
        }))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = String>>> {
        None
    }
}
