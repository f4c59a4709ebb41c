//! HTTP request and response types exchanged with a `Transport`.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The fetch
//! service builds an `HttpRequest`, hands it to whatever `Transport` it was
//! given, and decodes the returned `HttpResponse`. Nothing here performs I/O,
//! so the same values flow through the live transport and the recorded one.
//!
//! `HttpRequest` is only produced by `RequestBuilder::build`, which resolves
//! the URL template up front. Once built, a request is read-only.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
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

/// Ordered header list with case-insensitive lookup.
///
/// Insertion order is preserved so requests are reproducible; duplicate names
/// are allowed and `get` returns the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Headers,
    body: Option<String>,
    timeout: Option<Duration>,
}

impl HttpRequest {
    /// Start a request relative to `base`. The path template is appended to
    /// the base URL's path, so `https://host/api/v1/` + `lookup.php` keeps the
    /// `/api/v1` prefix.
    pub fn builder(method: HttpMethod, base: &Url) -> RequestBuilder {
        RequestBuilder {
            method,
            base: base.clone(),
            path: String::new(),
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Headers::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Per-call timeout. `None` defers to the transport's default.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builder for `HttpRequest`.
///
/// Path templates use whole-segment placeholders: `meals/{id}/photo` with
/// `path_param("id", "52772")`. Values are percent-encoded as single segments,
/// so a value containing `/` cannot escape its segment.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: HttpMethod,
    base: Url,
    path: String,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: Headers,
    body: Option<String>,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = template.into();
        self
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (name, value) in headers {
            self.headers.append(name, value);
        }
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve the template into a concrete URL.
    pub fn build(self) -> Result<HttpRequest, TransportError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                TransportError::InvalidRequest(format!("base URL `{}` cannot carry a path", self.base))
            })?;
            segments.pop_if_empty();
            for raw in self.path.split('/').filter(|s| !s.is_empty()) {
                segments.push(&expand_segment(raw, &self.path_params)?);
            }
        }
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(HttpRequest {
            method: self.method,
            url: url.into(),
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        })
    }
}

fn expand_segment(raw: &str, params: &[(String, String)]) -> Result<String, TransportError> {
    let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return Ok(raw.to_string());
    };
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| TransportError::InvalidRequest(format!("unbound path parameter `{name}`")))
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` and consumed by the decoder; it is never shared
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8. Used for error reporting only.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
