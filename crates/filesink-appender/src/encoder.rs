//! Text to byte conversion.

use crate::errors::AppenderError;
use encoding_rs::{Encoding, EncoderResult, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;
use std::fmt;

/// Byte substituted for characters the charset cannot represent.
const UNMAPPABLE: u8 = b'?';

/// A resolved character encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// UTF-8, the platform default.
    Utf8,
    /// UTF-16, little-endian, no byte order mark.
    Utf16Le,
    /// UTF-16, big-endian, no byte order mark.
    Utf16Be,
    /// Any other single or multi-byte encoding known by label.
    Legacy(&'static Encoding),
}

impl Charset {
    /// The encoding used when none is configured or the configured one is
    /// unknown.
    pub fn platform_default() -> Self {
        Charset::Utf8
    }

    /// Looks up a charset by label (`"utf-8"`, `"UTF-16BE"`, `"latin1"`,
    /// `"shift_jis"`, ...), ignoring case and surrounding whitespace.
    pub fn for_name(name: &str) -> Result<Self, AppenderError> {
        let encoding = Encoding::for_label(name.trim().as_bytes())
            .filter(|e| *e != REPLACEMENT)
            .ok_or_else(|| AppenderError::UnknownCharset(name.to_string()))?;

        Ok(if encoding == UTF_8 {
            Charset::Utf8
        } else if encoding == UTF_16LE {
            Charset::Utf16Le
        } else if encoding == UTF_16BE {
            Charset::Utf16Be
        } else {
            Charset::Legacy(encoding)
        })
    }

    /// Canonical name of the charset.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => UTF_8.name(),
            Charset::Utf16Le => UTF_16LE.name(),
            Charset::Utf16Be => UTF_16BE.name(),
            Charset::Legacy(encoding) => encoding.name(),
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts text records to bytes in a fixed charset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    charset: Charset,
}

impl Encoder {
    /// Creates an encoder for `charset`.
    pub fn new(charset: Charset) -> Self {
        Self { charset }
    }

    /// The charset this encoder produces.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Encodes `text`. UTF-8 output borrows the input.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self.charset {
            Charset::Utf8 => Cow::Borrowed(text.as_bytes()),
            Charset::Utf16Le => Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Charset::Utf16Be => Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Charset::Legacy(encoding) => Cow::Owned(encode_legacy(encoding, text)),
        }
    }
}

fn encode_legacy(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(
        encoder
            .max_buffer_length_from_utf8_without_replacement(text.len())
            .unwrap_or(text.len()),
    );
    let mut remaining = text;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut out, true);
        remaining = &remaining[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::Unmappable(_) => out.push(UNMAPPABLE),
            EncoderResult::OutputFull => {
                let needed = encoder
                    .max_buffer_length_from_utf8_without_replacement(remaining.len())
                    .unwrap_or(remaining.len())
                    .max(8);
                out.reserve(needed);
            }
        }
    }

    out
}
