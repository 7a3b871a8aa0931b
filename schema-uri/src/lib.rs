//! A URI paired with a fragment that is either a JSON Pointer (starts with
//! `/`) or an opaque plain-name identifier (an anchor), plus the UTF
//! transcoding engine used to measure string lengths in code points.

pub mod error;
pub mod text;

use std::{cmp::Ordering, fmt, hash::Hash};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use snafu::ResultExt;
use url::Url;

pub use error::UriError;

const FRAGMENT_ENCODE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// A path step to append to a [`SchemaUri`]'s JSON Pointer fragment.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    Field(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Step<'a> {
    fn from(value: &'a str) -> Self {
        Step::Field(value)
    }
}
impl From<usize> for Step<'static> {
    fn from(value: usize) -> Self {
        Step::Index(value)
    }
}

/// A URI combined with an identifier: either a JSON Pointer fragment
/// (`has_pointer()`) or an opaque anchor name (`has_identifier()`).
///
/// Once constructed via [`SchemaUri::parse`] or [`SchemaUri::resolve`], the
/// URI portion is always absolute.
#[derive(Debug, Clone)]
pub struct SchemaUri {
    url: Url,
    identifier: String,
}

impl SchemaUri {
    /// Parses an absolute URI, splitting off and percent-decoding any
    /// fragment.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let (uri_part, frag_part) = split_fragment(input);
        let mut url = Url::parse(uri_part).context(error::ParseCtx { input })?;
        url.set_fragment(None);
        let identifier = frag_part.map(decode_fragment).unwrap_or_default();
        Ok(Self { url, identifier })
    }

    #[must_use]
    pub fn uri(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `true` iff the identifier is a JSON Pointer (starts with `/`).
    #[must_use]
    pub fn has_pointer(&self) -> bool {
        self.identifier.starts_with('/')
    }

    /// `true` iff the identifier is a non-empty, non-pointer anchor name.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty() && !self.has_pointer()
    }

    /// Resolves `reference` (possibly relative, per RFC 3986) against
    /// `self`. If `reference` carries no fragment at all, the receiver's
    /// identifier is preserved rather than cleared — this keeps the
    /// ambient JSON Pointer location intact while a schema builder rebases
    /// onto a new `$id` with no fragment of its own.
    pub fn resolve(&self, reference: &str) -> Result<Self, UriError> {
        let (uri_part, frag_part) = split_fragment(reference);
        let mut url = self
            .url
            .join(uri_part)
            .context(error::ResolveCtx { base: self.url.as_str(), reference })?;
        url.set_fragment(None);
        let identifier = match frag_part {
            Some(raw) => decode_fragment(raw),
            None => self.identifier.clone(),
        };
        Ok(Self { url, identifier })
    }

    /// Extends the JSON Pointer fragment by one step. A no-op when
    /// [`has_identifier`](Self::has_identifier) is `true` — appending is
    /// idempotent once the fragment has become an opaque anchor name.
    #[must_use]
    pub fn append<'a>(&self, step: impl Into<Step<'a>>) -> Self {
        if self.has_identifier() {
            return self.clone();
        }
        let mut identifier = self.identifier.clone();
        identifier.push('/');
        match step.into() {
            Step::Field(name) => {
                for ch in name.chars() {
                    match ch {
                        '~' => identifier.push_str("~0"),
                        '/' => identifier.push_str("~1"),
                        c => identifier.push(c),
                    }
                }
            }
            Step::Index(i) => identifier.push_str(itoa(i).as_str()),
        }
        Self { url: self.url.clone(), identifier }
    }

    /// Drops the identifier, leaving just the URI. A fresh `$id` starts a
    /// new base with no inherited JSON Pointer location, so a caller
    /// rebasing onto one resolves against this rather than `self` directly.
    #[must_use]
    pub fn without_identifier(&self) -> Self {
        Self { url: self.url.clone(), identifier: String::new() }
    }
}

fn itoa(i: usize) -> String {
    i.to_string()
}

fn split_fragment(s: &str) -> (&str, Option<&str>) {
    match s.split_once('#') {
        Some((before, after)) => (before, Some(after)),
        None => (s, None),
    }
}

/// Percent-decodes a fragment by scanning right-to-left in three-character
/// (`%XX`) windows, so overlapping candidate escapes resolve unambiguously
/// from the end of the string backward.
fn decode_fragment(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = bytes.len();
    while i > 0 {
        if i >= 3 && bytes[i - 3] == b'%' && is_hex(bytes[i - 2]) && is_hex(bytes[i - 1]) {
            out.push(hex_val(bytes[i - 2]) * 16 + hex_val(bytes[i - 1]));
            i -= 3;
        } else {
            out.push(bytes[i - 1]);
            i -= 1;
        }
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

impl fmt::Display for SchemaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if !self.identifier.is_empty() {
            write!(f, "#{}", utf8_percent_encode(&self.identifier, FRAGMENT_ENCODE))?;
        }
        Ok(())
    }
}

impl PartialEq for SchemaUri {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
impl Eq for SchemaUri {}

impl Hash for SchemaUri {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl PartialOrd for SchemaUri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SchemaUri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pointer_fragment_is_recognized() {
        let uri = SchemaUri::parse("https://example.com/schema.json#/properties/name").unwrap();
        assert!(uri.has_pointer());
        assert!(!uri.has_identifier());
    }

    #[test]
    fn plain_name_fragment_is_an_identifier() {
        let uri = SchemaUri::parse("https://example.com/schema.json#foo").unwrap();
        assert!(!uri.has_pointer());
        assert!(uri.has_identifier());
    }

    #[test]
    fn append_extends_pointer_fragment() {
        let uri = SchemaUri::parse("https://example.com/schema.json").unwrap();
        let stepped = uri.append("properties").append("name");
        assert_eq!(stepped.identifier(), "/properties/name");
    }

    #[test]
    fn append_escapes_tilde_and_slash() {
        let uri = SchemaUri::parse("https://example.com/schema.json").unwrap();
        let stepped = uri.append("a/b~c");
        assert_eq!(stepped.identifier(), "/a~1b~0c");
    }

    #[test]
    fn append_is_idempotent_on_plain_name_identifier() {
        let uri = SchemaUri::parse("https://example.com/schema.json#anchor").unwrap();
        let once = uri.append("x");
        let twice = once.append("y");
        assert_eq!(once.identifier(), "anchor");
        assert_eq!(twice.identifier(), "anchor");
    }

    #[test]
    fn resolve_adopts_relative_fragment() {
        let base = SchemaUri::parse("https://example.com/a/schema.json#/x").unwrap();
        let resolved = base.resolve("other.json#/defs/foo").unwrap();
        assert_eq!(resolved.uri().as_str(), "https://example.com/a/other.json");
        assert_eq!(resolved.identifier(), "/defs/foo");
    }

    #[test]
    fn resolve_preserves_receiver_identifier_when_reference_has_no_fragment() {
        let base = SchemaUri::parse("https://example.com/a/schema.json#/properties/x").unwrap();
        let resolved = base.resolve("other.json").unwrap();
        assert_eq!(resolved.uri().as_str(), "https://example.com/a/other.json");
        assert_eq!(resolved.identifier(), "/properties/x");
    }

    #[test]
    fn without_identifier_clears_the_fragment_before_a_fresh_id_resolves() {
        let base = SchemaUri::parse("https://example.com/root.json#/definitions/widget").unwrap();
        let rebased = base.without_identifier().resolve("widget.json").unwrap();
        assert_eq!(rebased.uri().as_str(), "https://example.com/widget.json");
        assert_eq!(rebased.identifier(), "");
    }

    #[test]
    fn equality_and_ordering_are_lexicographic_on_serialized_form() {
        let a = SchemaUri::parse("https://example.com/a").unwrap();
        let b = SchemaUri::parse("https://example.com/b").unwrap();
        assert!(a < b);
        assert_eq!(a, SchemaUri::parse("https://example.com/a").unwrap());
    }

    #[test]
    fn percent_decodes_fragment_right_to_left() {
        let uri = SchemaUri::parse("https://example.com/s.json#/a%2Fb/c%7E0").unwrap();
        assert_eq!(uri.identifier(), "/a/b/c~0");
    }
}
