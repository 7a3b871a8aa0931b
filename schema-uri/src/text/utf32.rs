//! UTF-32: one code unit per code point. Legality is just the scalar-value
//! range check (surrogates and values past `U+10FFFF` are illegal).

use super::{is_scalar_value, CodecError, DecodeResult, Flags, REPLACEMENT_CHARACTER};

#[must_use]
pub fn codepoint_length(_units: &[u32]) -> usize {
    1
}

pub fn next_codepoint(units: &[u32], flags: Flags) -> DecodeResult {
    let Some(&cp) = units.first() else {
        return Err(CodecError::SourceExhausted);
    };
    if is_scalar_value(cp) {
        Ok((cp, 1))
    } else {
        match flags {
            Flags::Strict => Err(CodecError::SourceIllegal),
            Flags::Lenient => Ok((REPLACEMENT_CHARACTER as u32, 1)),
        }
    }
}

pub fn append_codepoint(cp: u32, out: &mut Vec<u32>) {
    out.push(if is_scalar_value(cp) { cp } else { REPLACEMENT_CHARACTER as u32 });
}

pub fn from_utf8(s: &str, _flags: Flags) -> Result<Vec<u32>, CodecError> {
    Ok(s.chars().map(|c| c as u32).collect())
}

pub fn to_utf8(units: &[u32], flags: Flags) -> Result<String, CodecError> {
    let mut out = String::with_capacity(units.len());
    for &u in units {
        let (cp, _) = next_codepoint(&[u], flags)?;
        super::utf8::append_codepoint(cp, &mut out);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn surrogate_value_is_illegal_in_strict_mode() {
        assert!(next_codepoint(&[0xD800], Flags::Strict).is_err());
        assert_eq!(next_codepoint(&[0xD800], Flags::Lenient).unwrap().0, REPLACEMENT_CHARACTER as u32);
    }

    #[test]
    fn out_of_range_value_is_illegal() {
        assert!(next_codepoint(&[0x0011_0000], Flags::Strict).is_err());
    }

    #[test]
    fn legal_scalar_round_trips() {
        let (cp, adv) = next_codepoint(&[0x1_F600], Flags::Strict).unwrap();
        assert_eq!(cp, 0x1_F600);
        assert_eq!(adv, 1);
    }
}
