//! Request body encoders
//!
//! Pure functions turning domain values into request bodies:
//!
//! - [`encode_json`] for resource endpoints
//! - [`encode_multipart_related`] for the token endpoint (a single
//!   `Content-ID: metadata` JSON part)
//! - [`encode_form_data`] for API generations that expect the token
//!   request as plain form fields

use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use uuid::Uuid;

const CRLF: &[u8] = b"\r\n";

/// Multipart flavour, which decides the `Content-Type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipartKind {
    /// `multipart/related`
    Related,
    /// `multipart/form-data`
    FormData,
}

impl MultipartKind {
    fn media_type(self) -> &'static str {
        match self {
            Self::Related => "multipart/related",
            Self::FormData => "multipart/form-data",
        }
    }
}

/// A finished multipart envelope
#[derive(Debug, Clone)]
pub struct MultipartBody {
    /// Encoded body
    pub body: Bytes,
    /// Boundary the `Content-Type` header must echo
    pub boundary: String,
    /// Envelope flavour
    pub kind: MultipartKind,
}

impl MultipartBody {
    /// Value for the request's `Content-Type` header
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", self.kind.media_type(), self.boundary)
    }
}

/// Serialize `payload` as a single JSON document
///
/// `None`, or a value that serializes to JSON `null`, is rejected with
/// [`Error::NilPayload`].
pub fn encode_json<T: Serialize + ?Sized>(payload: Option<&T>) -> Result<Bytes> {
    let payload = payload.ok_or(Error::NilPayload)?;
    let value = serde_json::to_value(payload).map_err(|e| Error::encoding(e.to_string()))?;
    if value.is_null() {
        return Err(Error::NilPayload);
    }
    let body = serde_json::to_vec(&value).map_err(|e| Error::encoding(e.to_string()))?;
    Ok(Bytes::from(body))
}

/// Wrap the JSON form of `payload` in a one-part `multipart/related` envelope
pub fn encode_multipart_related<T: Serialize + ?Sized>(
    payload: Option<&T>,
) -> Result<MultipartBody> {
    let json = encode_json(payload)?;

    let mut writer = MultipartWriter::new(MultipartKind::Related);
    writer.part(
        &[
            ("Content-Type", "application/json"),
            ("Content-ID", "metadata"),
        ],
        &json,
    );
    Ok(writer.finish())
}

/// Encode plain `name=value` fields as `multipart/form-data`
///
/// An empty field list is rejected with [`Error::NilPayload`].
pub fn encode_form_data(fields: &[(&str, &str)]) -> Result<MultipartBody> {
    if fields.is_empty() {
        return Err(Error::NilPayload);
    }

    let mut writer = MultipartWriter::new(MultipartKind::FormData);
    for (name, value) in fields {
        if name.is_empty() || name.contains(['"', '\r', '\n']) {
            return Err(Error::encoding(format!("invalid form field name {name:?}")));
        }
        let disposition = format!("form-data; name=\"{name}\"");
        writer.part(&[("Content-Disposition", disposition.as_str())], value.as_bytes());
    }
    Ok(writer.finish())
}

struct MultipartWriter {
    buf: BytesMut,
    boundary: String,
    kind: MultipartKind,
}

impl MultipartWriter {
    fn new(kind: MultipartKind) -> Self {
        Self {
            buf: BytesMut::new(),
            boundary: Uuid::new_v4().simple().to_string(),
            kind,
        }
    }

    fn part(&mut self, headers: &[(&str, &str)], content: &[u8]) {
        self.delimiter();
        for (name, value) in headers {
            self.buf.put_slice(name.as_bytes());
            self.buf.put_slice(b": ");
            self.buf.put_slice(value.as_bytes());
            self.buf.put_slice(CRLF);
        }
        self.buf.put_slice(CRLF);
        self.buf.put_slice(content);
        self.buf.put_slice(CRLF);
    }

    fn delimiter(&mut self) {
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(CRLF);
    }

    fn finish(mut self) -> MultipartBody {
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"--");
        self.buf.put_slice(CRLF);

        MultipartBody {
            body: self.buf.freeze(),
            boundary: self.boundary,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Person {
        #[serde(rename = "Name")]
        name: String,
    }

    fn text(body: &Bytes) -> String {
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[test]
    fn test_json_encodes_single_document() {
        let body = encode_json(Some(&Person { name: "Newman".into() })).unwrap();
        assert_eq!(&body[..], br#"{"Name":"Newman"}"#);
    }

    #[test]
    fn test_json_rejects_missing_payload() {
        let err = encode_json::<Person>(None).unwrap_err();
        assert!(matches!(err, Error::NilPayload));
    }

    #[test]
    fn test_json_rejects_null_payload() {
        let err = encode_json(Some(&Option::<Person>::None)).unwrap_err();
        assert!(matches!(err, Error::NilPayload));
    }

    #[test]
    fn test_json_reports_serialization_failure() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        let err = encode_json(Some(&map)).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_multipart_related_metadata_part() {
        let encoded =
            encode_multipart_related(Some(&Person { name: "Newman".into() })).unwrap();
        let body = text(&encoded.body);

        assert!(!encoded.boundary.is_empty());
        assert!(body.contains("Content-ID: metadata"));
        assert!(body.contains("Content-Type: application/json"));
        assert!(body.contains(r#"{"Name":"Newman"}"#));
        assert!(body.starts_with(&format!("--{}\r\n", encoded.boundary)));
        assert!(body.ends_with(&format!("--{}--\r\n", encoded.boundary)));
        assert_eq!(
            encoded.content_type(),
            format!("multipart/related; boundary={}", encoded.boundary)
        );
    }

    #[test]
    fn test_multipart_related_rejects_missing_payload() {
        let err = encode_multipart_related::<Person>(None).unwrap_err();
        assert!(matches!(err, Error::NilPayload));
    }

    #[test]
    fn test_boundaries_are_random() {
        let a = encode_form_data(&[("a", "1")]).unwrap();
        let b = encode_form_data(&[("a", "1")]).unwrap();
        assert_ne!(a.boundary, b.boundary);
        assert_eq!(a.boundary.len(), 32);
    }

    #[test]
    fn test_form_data_fields() {
        let encoded = encode_form_data(&[
            ("grant_type", "password"),
            ("username", "newman"),
        ])
        .unwrap();
        let body = text(&encoded.body);

        assert!(body.contains(
            "Content-Disposition: form-data; name=\"grant_type\"\r\n\r\npassword\r\n"
        ));
        assert!(body.contains(
            "Content-Disposition: form-data; name=\"username\"\r\n\r\nnewman\r\n"
        ));
        assert_eq!(body.matches(&format!("--{}\r\n", encoded.boundary)).count(), 2);
        assert!(encoded.content_type().starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_form_data_rejects_empty_and_bad_names() {
        assert!(matches!(encode_form_data(&[]), Err(Error::NilPayload)));
        assert!(matches!(
            encode_form_data(&[("bad\"name", "x")]),
            Err(Error::Encoding(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_multipart_always_carries_json(name in "[A-Za-z0-9 ]{0,32}") {
            let encoded = encode_multipart_related(Some(&Person { name: name.clone() })).unwrap();
            let expected = serde_json::to_string(&Person { name }).unwrap();
            let body = text(&encoded.body);
            prop_assert!(body.contains(&expected));
            let closing = format!("{}\r\n--{}--\r\n", expected, encoded.boundary);
            prop_assert!(body.ends_with(&closing));
        }
    }
}
