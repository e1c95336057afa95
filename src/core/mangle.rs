//! Short key generation for mangled translation keys.
//!
//! Keys are drawn from every printable ASCII character except the ones that
//! need escaping inside a quoted string literal (`"`, `'` and `\`), so a
//! generated key can be dropped into source code as-is.

/// Number of symbols in [`ALPHABET`].
pub const ALPHABET_LEN: usize = 92;

/// Printable ASCII `0x20..=0x7E` minus `"`, `'` and `\`, in ascending order.
pub const ALPHABET: [u8; ALPHABET_LEN] = build_alphabet();

const fn build_alphabet() -> [u8; ALPHABET_LEN] {
    let mut alphabet = [0u8; ALPHABET_LEN];
    let mut len = 0;
    let mut byte = 0x20u8;
    while byte <= 0x7e {
        if byte != b'"' && byte != b'\'' && byte != b'\\' {
            alphabet[len] = byte;
            len += 1;
        }
        byte += 1;
    }
    alphabet
}

/// Encode an index as a short key, most significant symbol first.
///
/// Indices `0..92` map to single symbols; `92` is the first two-symbol key.
///
/// ```
/// use transkey::core::mangle::encode;
///
/// assert_eq!(encode(0), " ");
/// assert_eq!(encode(1), "!");
/// assert_eq!(encode(92), "! ");
/// ```
pub fn encode(index: u64) -> String {
    let base = ALPHABET_LEN as u64;
    let mut remainder = index;
    let mut symbols = Vec::new();
    loop {
        symbols.push(ALPHABET[(remainder % base) as usize] as char);
        remainder /= base;
        if remainder == 0 {
            break;
        }
    }
    symbols.iter().rev().collect()
}

/// Infinite, forward-only source of unique short keys.
///
/// Every generator starts at index 0; two generators never coordinate, so
/// callers that need globally unique keys must share a single instance.
#[derive(Debug, Default)]
pub struct KeyGenerator {
    next_index: u64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next unused key and advance.
    pub fn next_key(&mut self) -> String {
        let key = encode(self.next_index);
        self.next_index += 1;
        key
    }

    /// Number of keys handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_index
    }
}

impl Iterator for KeyGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_key())
    }
}
