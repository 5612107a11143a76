//! Video payload validation.
//!
//! Browsers submit camera clips and uploads as `data:` URIs. These are
//! split into mime type and base64 body here, and oversized payloads are
//! rejected before any provider request is built.

use crate::AnalysisError;

/// Largest decoded video accepted for analysis, in bytes.
pub const MAX_VIDEO_BYTES: usize = 20 * 1024 * 1024;

/// A validated media payload ready to embed in a provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Mime type, e.g. `video/webm`.
    pub media_type: String,
    /// Base64-encoded body, without the data URI wrapper.
    pub data: String,
}

/// Parses and validates a `data:<mimetype>;base64,<encoded_data>` URI.
///
/// # Errors
///
/// Returns [`AnalysisError::Media`] if the URI is malformed, empty, or
/// decodes to more than [`MAX_VIDEO_BYTES`].
pub fn parse_data_uri(uri: &str) -> Result<MediaPayload, AnalysisError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AnalysisError::Media {
            message: "Expected a data URI (data:<mimetype>;base64,<encoded_data>)".to_string(),
        })?;

    let (media_type, data) = rest
        .split_once(";base64,")
        .ok_or_else(|| AnalysisError::Media {
            message: "Data URI is missing the ';base64,' marker".to_string(),
        })?;

    if media_type.is_empty() {
        return Err(AnalysisError::Media {
            message: "Data URI has an empty mime type".to_string(),
        });
    }
    if data.is_empty() {
        return Err(AnalysisError::Media {
            message: "Data URI has an empty body".to_string(),
        });
    }

    let decoded = decoded_size(data);
    if decoded > MAX_VIDEO_BYTES {
        return Err(AnalysisError::Media {
            message: format!(
                "Video is too large: {decoded} bytes decoded exceeds the {MAX_VIDEO_BYTES} byte limit"
            ),
        });
    }

    Ok(MediaPayload {
        media_type: media_type.to_string(),
        data: data.to_string(),
    })
}

/// Decoded size of a base64 body, accounting for `=` padding.
fn decoded_size(data: &str) -> usize {
    let padding = data.bytes().rev().take_while(|&b| b == b'=').count();
    (data.len() / 4 * 3).saturating_sub(padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_data_uri() {
        let payload = parse_data_uri("data:video/webm;base64,QUJD").unwrap();
        assert_eq!(
            payload.media_type, "video/webm",
            "mime type should be the segment before ';base64,'"
        );
        assert_eq!(
            payload.data, "QUJD",
            "data should be the segment after ';base64,'"
        );
    }

    #[test]
    fn rejects_a_uri_without_the_data_prefix() {
        let err = parse_data_uri("video/webm;base64,QUJD").unwrap_err();
        assert!(
            matches!(err, AnalysisError::Media { .. }),
            "missing 'data:' prefix should be a media error: {err}"
        );
    }

    #[test]
    fn rejects_a_uri_without_the_base64_marker() {
        let err = parse_data_uri("data:video/webm,QUJD").unwrap_err();
        assert!(matches!(err, AnalysisError::Media { .. }));
    }

    #[test]
    fn rejects_an_empty_body() {
        let err = parse_data_uri("data:video/webm;base64,").unwrap_err();
        assert!(matches!(err, AnalysisError::Media { .. }));
    }

    #[test]
    fn rejects_an_oversized_video() {
        let body = "A".repeat(MAX_VIDEO_BYTES / 3 * 4 + 8);
        let uri = format!("data:video/mp4;base64,{body}");
        let err = parse_data_uri(&uri).unwrap_err();
        assert!(
            matches!(err, AnalysisError::Media { .. }),
            "payload over the decoded limit should be rejected"
        );
    }

    #[test]
    fn decoded_size_subtracts_padding() {
        assert_eq!(decoded_size("QUJD"), 3);
        assert_eq!(decoded_size("QUE="), 2);
        assert_eq!(decoded_size("QQ=="), 1);
    }
}
