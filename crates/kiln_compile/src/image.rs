//! The unit image container format.
//!
//! A compiled unit travels as a small binary container: a 4-byte
//! little-endian header length, a bincode-encoded header (magic bytes,
//! format version, unit identity, checksum), then the raw payload. Decoding
//! is fail-safe — any malformed input reads as "not a kiln image" rather
//! than an error, which lets the loader fall through to its raw variant.

use kiln_common::{ContentHash, UnitIdentity};
use serde::{Deserialize, Serialize};

/// Magic bytes identifying a kiln unit image.
const IMAGE_MAGIC: [u8; 4] = *b"KILN";

/// Current image format version. Increment on breaking changes to the
/// header or payload layout.
const IMAGE_FORMAT_VERSION: u32 = 1;

/// Header prepended to every unit image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageHeader {
    /// Magic bytes: must be `b"KILN"`.
    pub magic: [u8; 4],
    /// Image format version.
    pub format_version: u32,
    /// Name of the unit the image was compiled from.
    pub unit_name: String,
    /// Version of the unit the image was compiled from.
    pub unit_version: String,
    /// Content hash of the payload (for integrity checks).
    pub checksum: ContentHash,
}

/// Error raised when an image cannot be encoded.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode unit image: {reason}")]
pub struct ImageError {
    /// Description of the encoding failure.
    pub reason: String,
}

/// Encodes a payload into a unit image for `identity`.
pub fn encode_image(identity: &UnitIdentity, payload: &[u8]) -> Result<Vec<u8>, ImageError> {
    let header = ImageHeader {
        magic: IMAGE_MAGIC,
        format_version: IMAGE_FORMAT_VERSION,
        unit_name: identity.name.clone(),
        unit_version: identity.version.clone(),
        checksum: ContentHash::from_bytes(payload),
    };

    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| ImageError {
            reason: e.to_string(),
        })?;

    // Layout: 4-byte header length (little-endian) + header + payload
    let header_len = header_bytes.len() as u32;
    let mut image = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    image.extend_from_slice(&header_len.to_le_bytes());
    image.extend_from_slice(&header_bytes);
    image.extend_from_slice(payload);
    Ok(image)
}

/// Decodes a unit image, validating magic, version, and checksum.
///
/// Returns `None` if the input is not a well-formed image of the current
/// format. This is fail-safe by design.
pub fn decode_image(bytes: &[u8]) -> Option<(ImageHeader, Vec<u8>)> {
    if bytes.len() < 4 {
        return None;
    }

    let header_len = u32::from_le_bytes(bytes[..4].try_into().ok()?) as usize;
    if bytes.len() < 4 + header_len {
        return None;
    }

    let header: ImageHeader =
        bincode::serde::decode_from_slice(&bytes[4..4 + header_len], bincode::config::standard())
            .ok()?
            .0;

    if header.magic != IMAGE_MAGIC || header.format_version != IMAGE_FORMAT_VERSION {
        return None;
    }

    let payload = &bytes[4 + header_len..];
    if ContentHash::from_bytes(payload) != header.checksum {
        return None;
    }

    Some((header, payload.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let identity = UnitIdentity::new("Lib", "1.0");
        let image = encode_image(&identity, b"compiled payload").unwrap();
        let (header, payload) = decode_image(&image).unwrap();
        assert_eq!(header.unit_name, "Lib");
        assert_eq!(header.unit_version, "1.0");
        assert_eq!(payload, b"compiled payload");
    }

    #[test]
    fn decode_garbage_returns_none() {
        assert!(decode_image(b"not an image at all").is_none());
        assert!(decode_image(b"").is_none());
        assert!(decode_image(b"AB").is_none());
    }

    #[test]
    fn decode_tampered_payload_returns_none() {
        let identity = UnitIdentity::new("Lib", "1.0");
        let mut image = encode_image(&identity, b"payload").unwrap();
        let last = image.len() - 1;
        image[last] ^= 0xFF;
        assert!(decode_image(&image).is_none());
    }

    #[test]
    fn decode_wrong_magic_returns_none() {
        let identity = UnitIdentity::new("Lib", "1.0");
        let mut image = encode_image(&identity, b"payload").unwrap();
        // The header starts after the 4-byte length prefix; its first field
        // is the magic.
        image[4] = b'X';
        assert!(decode_image(&image).is_none());
    }

    #[test]
    fn empty_payload_roundtrips() {
        let identity = UnitIdentity::new("Empty", "0.1");
        let image = encode_image(&identity, b"").unwrap();
        let (_, payload) = decode_image(&image).unwrap();
        assert!(payload.is_empty());
    }
}
