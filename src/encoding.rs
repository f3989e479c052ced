//! Base64 embedding for image payloads.
//!
//! Every image in a presentation travels inline as a `data:` URI, so the
//! document has no external files to ship. Encoding is the standard RFC 4648
//! alphabet with `=` padding and no line wrapping, provided by the
//! [`base64`](https://docs.rs/base64) crate.
//!
//! ## MIME type
//!
//! All embedded images are labelled [`EMBED_MIME`] (`image/png`) regardless of
//! the real source format. Browsers sniff the actual bytes, so JPEG or BMP
//! payloads still render; the label is simply not round-tripped.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub use base64::DecodeError;

/// MIME type written into every embedded image URI.
pub const EMBED_MIME: &str = "image/png";

/// Encode bytes as standard, padded Base64. Empty input yields an empty string.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard, padded Base64 text.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(text)
}

/// Build a `data:` URI for an already-encoded payload.
///
/// ```text
/// data_uri("QUJD") → "data:image/png;base64,QUJD"
/// ```
pub fn data_uri(payload: &str) -> String {
    format!("data:{EMBED_MIME};base64,{payload}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_padding() {
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn pads_to_multiple_of_four() {
        assert_eq!(encode(b"A"), "QQ==");
        assert_eq!(encode(b"AB"), "QUI=");
        assert_eq!(encode(b"ABC"), "QUJD");
        assert_eq!(encode(b"ABCD"), "QUJDRA==");
    }

    #[test]
    fn uses_standard_alphabet() {
        // 0xfb 0xff → "+/8=" exercises both non-alphanumeric symbols
        assert_eq!(encode(&[0xfb, 0xff]), "+/8=");
    }

    #[test]
    fn no_line_wrapping_for_long_input() {
        let encoded = encode(&[7u8; 4096]);
        assert!(!encoded.contains('\n'));
        assert_eq!(encoded.len() % 4, 0);
    }

    #[test]
    fn decode_recovers_every_byte_value() {
        let all: Vec<u8> = (0..=255).collect();
        for len in [0, 1, 2, 3, 100, 256] {
            let slice = &all[..len];
            assert_eq!(decode(&encode(slice)).unwrap(), slice);
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let bytes = b"\x89PNG\r\n\x1a\n not really a png";
        assert_eq!(encode(bytes), encode(bytes));
    }

    #[test]
    fn data_uri_labels_payload_as_png() {
        assert_eq!(data_uri("QUJD"), "data:image/png;base64,QUJD");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("not base64!").is_err());
    }
}
