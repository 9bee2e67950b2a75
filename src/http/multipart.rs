//! Multipart form data support.
//!
//! Encodes `multipart/form-data` bodies with the fixed boundary `*****`.
//! File parts are streamed from disk in 1024-byte chunks while the request is
//! written; files are opened when the part is built so a missing file fails
//! before anything goes out on the wire.
//!
//! # Example
//! ```ignore
//! use simplehttp::http::{Form, Params};
//!
//! let params = Params::new().with("username", "user123").with_file("doc", "doc.txt");
//! let form = Form::from_params(&params).await?;
//! let body = form.into_body();
//! ```

use crate::http::mime;
use crate::http::params::{ParamValue, Params};
use crate::http::requestbody::RequestBody;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use std::borrow::Cow;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Boundary token used by every form this crate sends.
pub const BOUNDARY: &str = "*****";

/// Chunk size used when streaming file parts.
pub const UPLOAD_CHUNK_SIZE: usize = 1024;

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// A multipart form.
#[derive(Debug)]
pub struct Form {
    boundary: Cow<'static, str>,
    fields: Vec<(Cow<'static, str>, Part)>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form using [`BOUNDARY`].
    pub fn new() -> Self {
        Self {
            boundary: Cow::Borrowed(BOUNDARY),
            fields: Vec::new(),
        }
    }

    /// Build a form from request parameters, in parameter order.
    ///
    /// Text values become text parts; file values are opened now and become
    /// binary file parts.
    pub async fn from_params(params: &Params) -> io::Result<Self> {
        let mut form = Form::new();
        for (name, value) in params.iter() {
            let part = match value {
                ParamValue::Text(text) => Part::text(text.clone()),
                ParamValue::File(path) => Part::file(path).await?,
            };
            form = form.part(name.to_owned(), part);
        }
        Ok(form)
    }

    /// Get the boundary string.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Add a custom part.
    pub fn part<N>(mut self, name: N, part: Part) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.fields.push((name.into(), part));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the Content-Type header value.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data;boundary={}", self.boundary)
    }

    /// Total encoded length of the body.
    pub fn content_length(&self) -> u64 {
        let mut length = 0u64;

        for (name, part) in &self.fields {
            // --boundary\r\n
            length += (2 + self.boundary.len() + 2) as u64;

            // Part headers
            length += part.format_headers(name).len() as u64;

            // \r\n\r\n
            length += 4;

            // Body
            length += part.len();

            // \r\n
            length += 2;
        }

        // Final boundary: --boundary--\r\n
        length + (2 + self.boundary.len() + 4) as u64
    }

    /// Convert the form into a streaming request body with an exact length.
    pub fn into_body(self) -> RequestBody {
        let len = self.content_length();
        let boundary = self.boundary;

        let mut segments: Vec<BoxStream<'static, io::Result<Bytes>>> = Vec::new();
        for (name, part) in self.fields {
            let mut head = Vec::new();
            head.extend_from_slice(b"--");
            head.extend_from_slice(boundary.as_bytes());
            head.extend_from_slice(b"\r\n");
            head.extend_from_slice(part.format_headers(&name).as_bytes());
            head.extend_from_slice(b"\r\n\r\n");
            segments.push(once(Bytes::from(head)));

            match part.data {
                PartData::Bytes(data) => segments.push(once(data)),
                PartData::File { file, .. } => segments.push(file_chunks(file).boxed()),
            }

            segments.push(once(Bytes::from_static(b"\r\n")));
        }

        let mut tail = Vec::new();
        tail.extend_from_slice(b"--");
        tail.extend_from_slice(boundary.as_bytes());
        tail.extend_from_slice(b"--\r\n");
        segments.push(once(Bytes::from(tail)));

        RequestBody::stream(stream::iter(segments).flatten(), Some(len))
    }
}

/// Where a part's content comes from.
#[derive(Debug)]
enum PartData {
    Bytes(Bytes),
    File { file: File, len: u64 },
}

/// A part of a multipart form.
#[derive(Debug)]
pub struct Part {
    data: PartData,
    content_type: Option<String>,
    file_name: Option<Cow<'static, str>>,
    binary: bool,
}

impl Part {
    /// Create a text part (`text/plain; charset=UTF-8`).
    pub fn text<V>(value: V) -> Self
    where
        V: Into<Cow<'static, str>>,
    {
        let s = value.into();
        Self {
            data: PartData::Bytes(Bytes::from(s.into_owned())),
            content_type: Some(TEXT_CONTENT_TYPE.to_string()),
            file_name: None,
            binary: false,
        }
    }

    /// Open `path` and create a binary file part named after its base name,
    /// with a content type guessed from the extension.
    pub async fn file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let len = file.metadata().await?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime::guess_from_name(&file_name).to_string();

        Ok(Self {
            data: PartData::File { file, len },
            content_type: Some(content_type),
            file_name: Some(Cow::Owned(file_name)),
            binary: true,
        })
    }

    /// Format the part headers.
    fn format_headers(&self, name: &str) -> String {
        let mut header = format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape_quotes(name)
        );

        if let Some(ref filename) = self.file_name {
            header.push_str(&format!("; filename=\"{}\"", escape_quotes(filename)));
        }

        if let Some(ref mime) = self.content_type {
            header.push_str(&format!("\r\nContent-Type: {}", mime));
        }

        if self.binary {
            header.push_str("\r\nContent-Transfer-Encoding: binary");
        }

        header
    }

    /// Get the data length.
    pub fn len(&self) -> u64 {
        match &self.data {
            PartData::Bytes(b) => b.len() as u64,
            PartData::File { len, .. } => *len,
        }
    }

    /// Check if part is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn once(data: Bytes) -> BoxStream<'static, io::Result<Bytes>> {
    stream::once(async move { Ok(data) }).boxed()
}

fn file_chunks(file: File) -> impl futures::Stream<Item = io::Result<Bytes>> + Send {
    stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; UPLOAD_CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some((Bytes::from(buf), file)))
    })
}

/// Escape quotes and backslashes in a string.
fn escape_quotes(s: &str) -> Cow<'_, str> {
    if s.contains('"') || s.contains('\\') || s.contains('\r') || s.contains('\n') {
        Cow::Owned(
            s.replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\r', "\\r")
                .replace('\n', "\\n"),
        )
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io::Write;

    async fn encode(form: Form) -> String {
        let bytes = form.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[tokio::test]
    async fn test_empty_form() {
        let body = encode(Form::new()).await;
        assert_eq!(body, "--*****--\r\n");
    }

    #[tokio::test]
    async fn test_text_field() {
        let form = Form::from_params(&Params::new().with("name", "v")).await.unwrap();
        let body = encode(form).await;
        assert_eq!(
            body,
            "--*****\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\
             Content-Type: text/plain; charset=UTF-8\r\n\
             \r\n\
             v\r\n\
             --*****--\r\n"
        );
    }

    #[tokio::test]
    async fn test_field_name_is_escaped() {
        let params = Params::new().with("say \"hi\"", "x");
        let body = encode(Form::from_params(&params).await.unwrap()).await;
        assert!(body.contains("Content-Disposition: form-data; name=\"say \\\"hi\\\"\"\r\n"));
        assert!(!body.contains("Content-Transfer-Encoding"));
    }

    #[tokio::test]
    async fn test_file_part_streams_file_bytes() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let payload: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
        tmp.write_all(&payload).unwrap();

        let params = Params::new().with_file("avatar", tmp.path());
        let form = Form::from_params(&params).await.unwrap();
        let expected_len = form.content_length();
        let bytes = form.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.len() as u64, expected_len);

        let base = tmp.path().file_name().unwrap().to_string_lossy().into_owned();
        let head = format!(
            "--*****\r\n\
             Content-Disposition: form-data; name=\"avatar\"; filename=\"{base}\"\r\n\
             Content-Type: image/png\r\n\
             Content-Transfer-Encoding: binary\r\n\
             \r\n"
        );
        assert!(bytes.starts_with(head.as_bytes()));
        let start = head.len();
        assert_eq!(&bytes[start..start + payload.len()], &payload[..]);
        assert_eq!(&bytes[start + payload.len()..], b"\r\n--*****--\r\n");
    }

    #[tokio::test]
    async fn test_missing_file_fails_on_build() {
        let params = Params::new().with_file("f", "/definitely/not/here.bin");
        let err = Form::from_params(&params).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_from_params_keeps_order() {
        let params = Params::new().with("b", "2").with("a", 1);
        let form = Form::from_params(&params).await.unwrap();
        assert_eq!(form.len(), 2);

        let body = encode(form).await;
        let b = body.find("name=\"b\"").unwrap();
        let a = body.find("name=\"a\"").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(Form::new().content_type(), "multipart/form-data;boundary=*****");
        assert_eq!(Form::new().boundary(), BOUNDARY);
    }

    #[tokio::test]
    async fn test_content_length() {
        let params = Params::new().with("key", "value").with("k2", "é");
        let form = Form::from_params(&params).await.unwrap();
        let length = form.content_length();
        let body = form.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(length, body.len() as u64);
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes("normal"), "normal");
        assert_eq!(escape_quotes("with\"quote"), "with\\\"quote");
        assert_eq!(escape_quotes("with\\slash"), "with\\\\slash");
        assert_eq!(escape_quotes("a\r\nb"), "a\\r\\nb");
    }
}
