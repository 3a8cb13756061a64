//! Export code decoding for Path of Building
//!
//! Export codes are XML documents packed for clipboard sharing.
//!
//! Format:
//! 1. The build XML is deflate-compressed (raw, zlib, or gzip framing)
//! 2. The compressed bytes are base64-encoded
//! 3. `+` and `/` are replaced with `-` and `_` to make the code URL-safe
//! 4. Padding may be stripped, and pasted codes often carry line breaks

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use flate2::write::DeflateEncoder;
use flate2::Compression as Level;
use std::io::{Read, Write};

/// Codes at or below this many characters are rejected before decoding.
pub const MIN_CODE_LENGTH: usize = 51;

/// Default cap on the inflated document size (16 MiB).
pub const DEFAULT_MAX_DECOMPRESSED: usize = 16 * 1024 * 1024;

/// Markers that identify a decoded Path of Building document
const DOCUMENT_MARKERS: &[&str] = &["<?xml", "<PathOfBuilding"];

/// Standard alphabet, tolerant of missing padding and non-canonical trailing bits
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Fails the cheap pre-validation; no decode was attempted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Export code too short: expected at least {expected} characters, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("Export code contains invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
}

/// Errors that can occur while decoding an export code
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid base64 encoding: unexpected character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Invalid base64 encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decompress export code, the data may be corrupted")]
    Decompress,

    #[error("Decompressed document exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Decoded data is not valid UTF-8 text")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Decoded data does not appear to be a Path of Building document")]
    NotADocument,
}

/// Which stage of decoding rejected the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Bad characters or base64 structure
    Encoding,
    /// None of the compression strategies produced output
    Decompression,
    /// Decompressed fine, but not the expected kind of document
    Document,
}

impl DecodeError {
    /// Coarse error family, for "you pasted the wrong kind of code" diagnostics
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::InvalidCharacter { .. } | Self::Base64(_) => DecodeErrorKind::Encoding,
            Self::Decompress | Self::TooLarge { .. } => DecodeErrorKind::Decompression,
            Self::InvalidUtf8(_) | Self::NotADocument => DecodeErrorKind::Document,
        }
    }
}

/// Compression framing found around the deflate stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    RawDeflate,
    Zlib,
    Gzip,
}

impl Compression {
    /// Strategies in the order they are attempted (most common first)
    pub const ORDER: [Compression; 3] = [Self::RawDeflate, Self::Zlib, Self::Gzip];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RawDeflate => "raw deflate",
            Self::Zlib => "zlib",
            Self::Gzip => "gzip",
        }
    }

    /// Inflate `bytes`, reading at most `limit + 1` bytes of output
    fn inflate(&self, bytes: &[u8], limit: usize) -> Result<Vec<u8>, DecodeError> {
        let reader: Box<dyn Read + '_> = match self {
            Self::RawDeflate => Box::new(DeflateDecoder::new(bytes)),
            Self::Zlib => Box::new(ZlibDecoder::new(bytes)),
            Self::Gzip => Box::new(GzDecoder::new(bytes)),
        };

        let mut out = Vec::new();
        reader
            .take(limit as u64 + 1)
            .read_to_end(&mut out)
            .map_err(|_| DecodeError::Decompress)?;

        if out.len() > limit {
            return Err(DecodeError::TooLarge { limit });
        }
        Ok(out)
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunables for [`decode_with`]
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Inflated output above this size is rejected
    pub max_decompressed: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_decompressed: DEFAULT_MAX_DECOMPRESSED,
        }
    }
}

/// A successfully decoded export code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub xml: String,
    pub compression: Compression,
}

/// Remove all whitespace from a pasted code
pub fn clean(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[inline]
fn is_code_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '+' | '/' | '=' | '-' | '_')
}

fn first_invalid(cleaned: &str) -> Option<(usize, char)> {
    cleaned.chars().enumerate().find(|&(_, ch)| !is_code_char(ch))
}

/// Cheap format check to run before [`decode`]
///
/// Rejects codes that are too short or contain characters outside
/// `[A-Za-z0-9+/=_-]` (whitespace is ignored).
pub fn validate(code: &str) -> Result<(), FormatError> {
    let cleaned = clean(code);

    if let Some((position, ch)) = first_invalid(&cleaned) {
        return Err(FormatError::InvalidCharacter { ch, position });
    }

    let actual = cleaned.chars().count();
    if actual < MIN_CODE_LENGTH {
        return Err(FormatError::TooShort {
            expected: MIN_CODE_LENGTH,
            actual,
        });
    }

    Ok(())
}

/// Check whether a string looks like an export code
pub fn is_valid(code: &str) -> bool {
    validate(code).is_ok()
}

/// Decode an export code to its XML document
pub fn decode(code: &str) -> Result<Decoded, DecodeError> {
    decode_with(code, &DecodeOptions::default())
}

/// Decode an export code, returning only the XML text
pub fn decode_xml(code: &str) -> Result<String, DecodeError> {
    decode(code).map(|decoded| decoded.xml)
}

/// Decode an export code with explicit options
pub fn decode_with(code: &str, options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    let bytes = decode_base64(code)?;

    let (compression, inflated) = Compression::ORDER
        .iter()
        .find_map(|strategy| match strategy.inflate(&bytes, options.max_decompressed) {
            Ok(out) => Some(Ok((*strategy, out))),
            Err(DecodeError::TooLarge { limit }) => Some(Err(DecodeError::TooLarge { limit })),
            Err(_) => {
                tracing::trace!(strategy = strategy.name(), "decompression strategy failed");
                None
            }
        })
        .ok_or(DecodeError::Decompress)??;

    tracing::debug!(
        strategy = compression.name(),
        compressed = bytes.len(),
        inflated = inflated.len(),
        "decompressed export code"
    );

    let xml = String::from_utf8(inflated)?;
    if !DOCUMENT_MARKERS.iter().any(|marker| xml.contains(marker)) {
        return Err(DecodeError::NotADocument);
    }

    Ok(Decoded { xml, compression })
}

/// Undo whitespace, URL-safe substitution and missing padding, then base64-decode
fn decode_base64(code: &str) -> Result<Vec<u8>, DecodeError> {
    let cleaned = clean(code);
    if let Some((position, ch)) = first_invalid(&cleaned) {
        return Err(DecodeError::InvalidCharacter { ch, position });
    }

    let mut standard: String = cleaned
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    Ok(LENIENT_STANDARD.decode(standard.as_bytes())?)
}

/// Encode an XML document as an export code
///
/// Uses raw deflate framing and the URL-safe alphabet, so the result
/// round-trips through [`decode`].
pub fn encode(xml: &str) -> Result<String, std::io::Error> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Level::best());
    encoder.write_all(xml.as_bytes())?;
    let compressed = encoder.finish()?;

    Ok(base64::engine::general_purpose::STANDARD
        .encode(compressed)
        .chars()
        .map(|ch| match ch {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect())
}
