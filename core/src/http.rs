//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `PetFriendsClient` builds
//! `HttpRequest` values and normalizes `HttpResponse` values; only the
//! `PetFriends` facade performs network and file I/O.
//!
//! A multipart body is described rather than encoded: it names its text
//! fields and the path of the file to stream, and the executor assembles the
//! form when the request is sent.

use std::fmt;
use std::path::PathBuf;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file streamed as one part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

/// `multipart/form-data` content: text fields in order, then one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Already encoded; the content type travels in the request headers.
    Bytes(Vec<u8>),
    /// Encoded by the executor, which also sets the boundary content type.
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RequestBody::Bytes(bytes) => Some(bytes),
            RequestBody::Multipart(_) => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartBody> {
        match self {
            RequestBody::Bytes(_) => None,
            RequestBody::Multipart(form) => Some(form),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries any query string. Headers are kept
/// in insertion order.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// First header value whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `body` is already decoded to text, honouring any declared charset.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
