//! Table-driven UTF-8 legality checking and codepoint iteration.
//!
//! Mirrors the classification in the Unicode Standard (D92): sequence
//! length is determined by the lead byte, trailing bytes must match
//! `10xxxxxx`, and the second byte of 3- and 4-byte sequences has a
//! narrower legal range for the lead bytes `E0`, `ED`, `F0`, `F4` (these
//! rule out overlong encodings, UTF-8-encoded surrogates, and code points
//! past `U+10FFFF`).

use super::{CodecError, DecodeResult, Flags, REPLACEMENT_CHARACTER};

/// Number of continuation bytes that follow a sequence starting with `lead`,
/// or `0` if `lead` can never start a legal sequence.
#[must_use]
pub fn codepoint_length(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn trail_range(lead: u8, index: usize) -> (u8, u8) {
    match (lead, index) {
        (0xE0, 1) => (0xA0, 0xBF),
        (0xED, 1) => (0x80, 0x9F),
        (0xF0, 1) => (0x90, 0xBF),
        (0xF4, 1) => (0x80, 0x8F),
        _ => (0x80, 0xBF),
    }
}

/// `true` iff `src[..length]` is a legal UTF-8 encoding of one code point.
#[must_use]
pub fn is_legal(src: &[u8], length: usize) -> bool {
    if length == 0 || src.len() < length {
        return false;
    }
    let lead = src[0];
    if codepoint_length(lead) != length {
        return false;
    }
    for i in 1..length {
        let (lo, hi) = trail_range(lead, i);
        if !(lo..=hi).contains(&src[i]) {
            return false;
        }
    }
    true
}

/// Decodes one code point starting at `src[0]`. `advance` (the second tuple
/// element on success) is the number of bytes consumed.
pub fn next_codepoint(src: &[u8], flags: Flags) -> DecodeResult {
    if src.is_empty() {
        return Err(CodecError::SourceExhausted);
    }
    let lead = src[0];
    let length = codepoint_length(lead);
    if length == 0 {
        return illegal(flags, 1);
    }
    if src.len() < length {
        return if is_prefix_legal(src) {
            Err(CodecError::SourceExhausted)
        } else {
            illegal(flags, 1)
        };
    }
    if !is_legal(src, length) {
        return illegal(flags, 1);
    }
    let cp = decode_unchecked(src, length);
    Ok((cp, length))
}

fn is_prefix_legal(src: &[u8]) -> bool {
    let lead = src[0];
    for (i, &b) in src.iter().enumerate().skip(1) {
        let (lo, hi) = trail_range(lead, i);
        if !(lo..=hi).contains(&b) {
            return false;
        }
    }
    true
}

fn illegal(flags: Flags, advance: usize) -> DecodeResult {
    match flags {
        Flags::Strict => Err(CodecError::SourceIllegal),
        Flags::Lenient => Ok((REPLACEMENT_CHARACTER as u32, advance)),
    }
}

fn decode_unchecked(src: &[u8], length: usize) -> u32 {
    match length {
        1 => u32::from(src[0]),
        2 => (u32::from(src[0] & 0x1F) << 6) | u32::from(src[1] & 0x3F),
        3 => {
            (u32::from(src[0] & 0x0F) << 12)
                | (u32::from(src[1] & 0x3F) << 6)
                | u32::from(src[2] & 0x3F)
        }
        4 => {
            (u32::from(src[0] & 0x07) << 18)
                | (u32::from(src[1] & 0x3F) << 12)
                | (u32::from(src[2] & 0x3F) << 6)
                | u32::from(src[3] & 0x3F)
        }
        _ => unreachable!("codepoint_length only returns 0..=4"),
    }
}

/// Appends the minimal legal UTF-8 encoding of `cp` to `out`.
pub fn append_codepoint(cp: u32, out: &mut String) {
    if let Some(c) = char::from_u32(cp) {
        out.push(c);
    } else {
        out.push(REPLACEMENT_CHARACTER);
    }
}

/// Bulk-transcodes `src` to UTF-8, replacing illegal sequences with
/// `U+FFFD` under `Flags::Lenient` or stopping at the first one under
/// `Flags::Strict`.
pub fn from_utf8(src: &[u8], flags: Flags) -> Result<String, CodecError> {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while !rest.is_empty() {
        let (cp, advance) = next_codepoint(rest, flags)?;
        append_codepoint(cp, &mut out);
        rest = &rest[advance..];
    }
    Ok(out)
}

/// Identity transcode: `s` is already legal UTF-8 (the `&str` invariant),
/// so this only exists to keep the three width-keyed modules symmetric.
#[must_use]
pub fn to_utf8(s: &str) -> String {
    s.to_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let (cp, adv) = next_codepoint(b"A", Flags::Strict).unwrap();
        assert_eq!(cp, b'A' as u32);
        assert_eq!(adv, 1);
    }

    #[test]
    fn overlong_two_byte_is_illegal() {
        // 0xC0 0x80 would encode U+0000 as two bytes: an overlong form.
        assert_eq!(codepoint_length(0xC0), 0);
        assert!(next_codepoint(&[0xC0, 0x80], Flags::Strict).is_err());
    }

    #[test]
    fn surrogate_range_is_illegal_in_utf8() {
        // U+D800 encoded as ED A0 80 is an illegal UTF-8-encoded surrogate.
        assert!(!is_legal(&[0xED, 0xA0, 0x80], 3));
        assert!(next_codepoint(&[0xED, 0xA0, 0x80], Flags::Strict).is_err());
    }

    #[test]
    fn lenient_mode_substitutes_replacement_character() {
        let (cp, adv) = next_codepoint(&[0xFF], Flags::Lenient).unwrap();
        assert_eq!(cp, REPLACEMENT_CHARACTER as u32);
        assert_eq!(adv, 1);
    }

    #[test]
    fn four_byte_sequence_decodes_above_bmp() {
        let bytes = "\u{1F600}".as_bytes();
        let (cp, adv) = next_codepoint(bytes, Flags::Strict).unwrap();
        assert_eq!(cp, 0x1_F600);
        assert_eq!(adv, 4);
        assert_eq!(codepoint_length(bytes[0]), 4);
    }

    #[test]
    fn codepoint_length_agrees_with_next_codepoint_advance() {
        for s in ["a", "\u{7f}", "\u{80}", "\u{7ff}", "\u{800}", "\u{ffff}", "\u{10000}", "\u{10ffff}"] {
            let bytes = s.as_bytes();
            let len = codepoint_length(bytes[0]);
            let (_, adv) = next_codepoint(bytes, Flags::Strict).unwrap();
            assert_eq!(len, adv, "mismatch for {s:?}");
        }
    }

    #[test]
    fn from_utf8_is_identity_on_legal_input_under_lenient_flags() {
        let s = "héllo \u{1F600} wörld";
        let decoded = from_utf8(s.as_bytes(), Flags::Lenient).unwrap();
        assert_eq!(decoded, s);
    }
}
