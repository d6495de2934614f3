//! Compact single-line layout encoding for clipboard transfer.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use bastion_core::LayoutSnapshot;

const SHARE_DOMAIN: &str = "bastion";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub const SHARE_HEADER: &str = "bastion:v1";
/// Delimiter used to separate the prefix, piece count and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a layout into a single-line string suitable for clipboard
/// transfer. The piece count travels in clear text so recipients can sanity
/// check a string before decoding it.
#[must_use]
pub fn encode(layout: &LayoutSnapshot) -> String {
    let piece_count: usize = layout.pieces.iter().map(Vec::len).sum();
    let json = serde_json::to_vec(layout).expect("layout serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{SHARE_HEADER}{FIELD_DELIMITER}{piece_count}{FIELD_DELIMITER}{encoded}")
}

/// Decodes a layout from its shared string representation.
pub fn decode(value: &str) -> Result<LayoutSnapshot, ShareDecodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShareDecodeError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(ShareDecodeError::MissingPrefix)?;
    let version = parts.next().ok_or(ShareDecodeError::MissingVersion)?;
    let count = parts.next().ok_or(ShareDecodeError::MissingPieceCount)?;
    let payload = parts.next().ok_or(ShareDecodeError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(ShareDecodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(ShareDecodeError::UnsupportedVersion(version.to_owned()));
    }
    let expected: usize = count
        .trim()
        .parse()
        .map_err(|_| ShareDecodeError::InvalidPieceCount(count.to_owned()))?;

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(ShareDecodeError::InvalidEncoding)?;
    let layout: LayoutSnapshot =
        serde_json::from_slice(&bytes).map_err(ShareDecodeError::InvalidPayload)?;
    let layout = layout.normalized();

    let actual: usize = layout.pieces.iter().map(Vec::len).sum();
    if actual != expected {
        return Err(ShareDecodeError::PieceCountMismatch { expected, actual });
    }

    Ok(layout)
}

/// Errors that can occur while decoding shared layout strings.
#[derive(Debug)]
pub enum ShareDecodeError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    MissingVersion,
    /// The encoded layout did not include a piece count.
    MissingPieceCount,
    /// The encoded layout did not include the payload segment.
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The piece count could not be parsed from the encoded layout.
    InvalidPieceCount(String),
    /// The declared piece count did not match the decoded payload.
    PieceCountMismatch {
        /// Count declared in the clear-text segment.
        expected: usize,
        /// Count found in the decoded payload.
        actual: usize,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ShareDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "shared layout string was empty"),
            Self::MissingPrefix => write!(f, "shared layout is missing the prefix"),
            Self::MissingVersion => write!(f, "shared layout is missing the version"),
            Self::MissingPieceCount => write!(f, "shared layout is missing the piece count"),
            Self::MissingPayload => write!(f, "shared layout is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "shared layout prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "shared layout version '{version}' is not supported")
            }
            Self::InvalidPieceCount(count) => {
                write!(f, "could not parse piece count '{count}'")
            }
            Self::PieceCountMismatch { expected, actual } => {
                write!(
                    f,
                    "declared piece count {expected} does not match payload ({actual})"
                )
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode shared layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse shared layout payload: {error}")
            }
        }
    }
}

impl Error for ShareDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
