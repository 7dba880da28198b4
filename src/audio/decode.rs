//! Base64 audio payload decoding.

use base64::Engine as _;

use super::AudioError;

/// Decode the `data` field of an audio envelope.
///
/// Accepts plain standard-alphabet base64 as sent by the quiz client, and
/// tolerates a full `data:<mime>;base64,` URL in case a client forwards the
/// `FileReader` result unchanged.  Surrounding whitespace is ignored.
///
/// ```
/// use voice_quiz::audio::decode_audio;
///
/// assert_eq!(decode_audio("aGk=").unwrap(), b"hi");
/// assert_eq!(decode_audio("data:audio/webm;base64,aGk=").unwrap(), b"hi");
/// ```
pub fn decode_audio(payload: &str) -> Result<Vec<u8>, AudioError> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| AudioError::InvalidEncoding("data URL without payload".into()))?,
        None => payload,
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AudioError::InvalidEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_decodes_to_no_bytes() {
        assert!(decode_audio("").unwrap().is_empty());
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(decode_audio("  aGVsbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = decode_audio("not base64 at all!").unwrap_err();
        assert!(matches!(err, AudioError::InvalidEncoding(_)));
    }

    #[test]
    fn data_url_without_comma_is_rejected() {
        let err = decode_audio("data:audio/webm;base64").unwrap_err();
        assert!(matches!(err, AudioError::InvalidEncoding(_)));
    }
}
