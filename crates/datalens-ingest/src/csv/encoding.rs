//! Text encoding detection and decoding.
//!
//! Detection looks at a bounded prefix only:
//!
//! 1. A byte order mark wins outright.
//! 2. A prefix that is valid UTF-8 is UTF-8. A multi-byte sequence cut off
//!    by the prefix boundary does not count against it; pure ASCII is UTF-8.
//! 3. A prefix holding C0 control bytes other than tab, CR, LF and ESC is
//!    binary, not text in any legacy encoding.
//! 4. Otherwise `chardetng` guesses a legacy encoding. An unconfident guess
//!    is an error rather than silently mis-decoded text.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// How the encoding was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// Given by the caller.
    Explicit,
    /// Byte order mark at the start of the input.
    Bom,
    /// The sampled prefix is valid UTF-8.
    Utf8Validation,
    /// Statistical guess.
    Detector,
}

/// Result of encoding detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub source: EncodingSource,
}

impl DetectedEncoding {
    /// The WHATWG name of the encoding (`UTF-8`, `Shift_JIS`, ...).
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Detects the encoding of `bytes` from its first `sample_size` bytes.
///
/// # Errors
///
/// Returns [`IngestError::EncodingUndetected`] when the input is not UTF-8
/// and either looks binary or the statistical detector is not confident in
/// its guess.
pub fn detect_encoding(
    bytes: &[u8],
    sample_size: usize,
    tld_hint: Option<&str>,
) -> Result<DetectedEncoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Ok(DetectedEncoding {
            encoding,
            source: EncodingSource::Bom,
        });
    }

    let prefix = &bytes[..bytes.len().min(sample_size.max(1))];
    let truncated = prefix.len() < bytes.len();
    match std::str::from_utf8(prefix) {
        Ok(_) => {
            return Ok(DetectedEncoding {
                encoding: UTF_8,
                source: EncodingSource::Utf8Validation,
            });
        }
        // Incomplete trailing sequence at the sample boundary.
        Err(err) if truncated && err.error_len().is_none() => {
            return Ok(DetectedEncoding {
                encoding: UTF_8,
                source: EncodingSource::Utf8Validation,
            });
        }
        Err(err) => {
            debug!(
                valid_up_to = err.valid_up_to(),
                "Sample is not UTF-8, running detector"
            );
        }
    }

    if let Some(offset) = prefix.iter().position(|&byte| is_binary_control(byte)) {
        return Err(IngestError::EncodingUndetected {
            reason: format!(
                "input is not UTF-8 and has control byte 0x{:02X} at offset {offset}",
                prefix[offset]
            ),
        });
    }

    let mut detector = EncodingDetector::new();
    detector.feed(prefix, !truncated);
    let (encoding, confident) = detector.guess_assess(tld_hint.map(str::as_bytes), false);
    if !confident {
        return Err(IngestError::EncodingUndetected {
            reason: format!(
                "input is not UTF-8 and the best guess ({}) is low confidence",
                encoding.name()
            ),
        });
    }
    Ok(DetectedEncoding {
        encoding,
        source: EncodingSource::Detector,
    })
}

/// C0 controls never used by text. ESC stays allowed for ISO-2022-JP.
fn is_binary_control(byte: u8) -> bool {
    byte < 0x20 && !matches!(byte, b'\t' | b'\n' | b'\r' | 0x1B)
}

/// Resolves an encoding label such as `shift_jis` or `cp1252`.
///
/// # Errors
///
/// Returns [`IngestError::UnknownEncoding`] for labels `encoding_rs` does not
/// recognise.
pub fn encoding_for_label(label: &str) -> Result<DetectedEncoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        IngestError::UnknownEncoding {
            label: label.to_string(),
        }
    })?;
    Ok(DetectedEncoding {
        encoding,
        source: EncodingSource::Explicit,
    })
}

/// Decodes the whole input, removing a matching BOM.
///
/// Malformed sequences become U+FFFD; how many were replaced is logged at
/// `warn`.
pub fn decode_text<'a>(bytes: &'a [u8], detected: &DetectedEncoding) -> Cow<'a, str> {
    let (text, had_errors) = detected.encoding.decode_with_bom_removal(bytes);
    if had_errors {
        let replaced = text.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count();
        warn!(
            encoding = detected.name(),
            replaced, "Replaced malformed byte sequences while decoding"
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use encoding_rs::{SHIFT_JIS, UTF_16LE, WINDOWS_1252};

    use super::*;

    #[test]
    fn test_ascii_is_utf8() {
        let detected = detect_encoding(b"id,name\n1,alice\n", 1024, None).unwrap();
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, EncodingSource::Utf8Validation);
    }

    #[test]
    fn test_bom_wins() {
        let detected = detect_encoding(b"\xEF\xBB\xBFa,b\n", 1024, None).unwrap();
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, EncodingSource::Bom);

        let detected = detect_encoding(b"\xFF\xFEa\x00", 1024, None).unwrap();
        assert_eq!(detected.encoding, UTF_16LE);
    }

    #[test]
    fn test_truncated_sequence_at_boundary_is_utf8() {
        // "é" is C3 A9; a 3-byte sample cuts it in half.
        let bytes = "ab\u{e9}".as_bytes();
        let detected = detect_encoding(bytes, 3, None).unwrap();
        assert_eq!(detected.encoding, UTF_8);
    }

    #[test]
    fn test_incomplete_sequence_at_end_of_input_is_not_utf8() {
        let bytes = b"ab\xC3";
        let result = detect_encoding(bytes, 1024, None);
        assert!(!matches!(
            result,
            Ok(DetectedEncoding {
                source: EncodingSource::Utf8Validation,
                ..
            })
        ));
    }

    #[test]
    fn test_shift_jis_detected_with_jp_hint() {
        let text = "氏名,部署,入社日,備考\n\
                    田中太郎,営業部,2024-04-01,東京の本社で新しいお客さまを担当しています\n\
                    山田花子,開発部,2023-10-15,データの集計とグラフの作成をお願いしました\n\
                    佐藤次郎,人事部,2022-07-01,来週から大阪の支店に移ることになりました\n";
        let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
        assert!(!had_errors);

        let detected = detect_encoding(&bytes, 10 * 1024, Some("jp")).unwrap();

        assert_eq!(detected.encoding, SHIFT_JIS);
        assert_eq!(detected.source, EncodingSource::Detector);
        assert_eq!(decode_text(&bytes, &detected), text);
    }

    #[test]
    fn test_binary_input_is_undetected() {
        let bytes = b"id,value\n\x01\x9F\xFF\x00\x83\n";
        let err = detect_encoding(bytes, 1024, None).unwrap_err();
        assert!(matches!(err, IngestError::EncodingUndetected { .. }));
        assert!(err.is_encoding());
        assert!(err.to_string().contains("0x01"));
    }

    #[test]
    fn test_binary_control_bytes() {
        assert!(is_binary_control(0x00));
        assert!(is_binary_control(0x07));
        assert!(!is_binary_control(b'\t'));
        assert!(!is_binary_control(b'\r'));
        assert!(!is_binary_control(0x1B));
        assert!(!is_binary_control(b'a'));
        assert!(!is_binary_control(0xE9));
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(encoding_for_label("cp1252").unwrap().encoding, WINDOWS_1252);
        assert_eq!(encoding_for_label("Shift_JIS").unwrap().encoding, SHIFT_JIS);
        assert!(matches!(
            encoding_for_label("not-an-encoding"),
            Err(IngestError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_decode_replaces_bad_bytes() {
        let detected = DetectedEncoding {
            encoding: UTF_8,
            source: EncodingSource::Explicit,
        };
        let decoded = decode_text(b"a,\xFFb", &detected);
        assert_eq!(decoded, "a,\u{FFFD}b");
    }

    #[test]
    fn test_decode_strips_bom() {
        let detected = detect_encoding(b"\xEF\xBB\xBFid\n1\n", 1024, None).unwrap();
        assert_eq!(decode_text(b"\xEF\xBB\xBFid\n1\n", &detected), "id\n1\n");
    }
}
