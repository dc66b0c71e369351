// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::{
    CONTENT_MD5, ROA_PATH_ENCODE_SET, ROA_QUERY_ENCODE_SET, X_ACS_ACTION, X_ACS_SECURITY_TOKEN,
    X_ACS_VERSION,
};
use http::header::{HeaderName, AUTHORIZATION};
use http::{HeaderMap, HeaderValue, Method, Uri};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use roasign_core::utils::Redact;
use roasign_core::Result;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::mem;

/// RoaRequest describes a ROA API call before signing.
///
/// Transport and vendor metadata live in dedicated fields. Everything else
/// goes to `headers`, keyed by lowercase header name.
///
/// ```
/// use roasign_aliyun_roa::RoaRequest;
///
/// let req = RoaRequest::new(http::Method::GET, "devops.cn-hangzhou.aliyuncs.com", "/repository/r1/branches")
///     .with_action("ListRepositoryBranches")
///     .with_version("2021-06-25")
///     .with_query("organizationId", "org1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoaRequest {
    /// HTTP method.
    pub method: Method,
    /// Host the request will be sent to, used to build the final url.
    pub host: String,
    /// Request path, e.g. `/repository/r1/branches`.
    pub pathname: String,
    /// API action, sent as `x-acs-action`.
    pub action: Option<String>,
    /// API version, sent as `x-acs-version`.
    pub version: Option<String>,
    /// `content-md5` of the body, if any.
    pub content_md5: Option<String>,
    /// `content-type` of the body, if any.
    pub content_type: Option<String>,
    /// Query parameters. Values are used verbatim, without url encoding.
    pub query: BTreeMap<String, String>,
    /// Other headers, `x-acs-*` ones take part in the signature.
    pub headers: BTreeMap<String, String>,
}

impl RoaRequest {
    /// Create a new request for given method, host and pathname.
    pub fn new(method: Method, host: &str, pathname: &str) -> Self {
        Self {
            method,
            host: host.to_string(),
            pathname: pathname.to_string(),
            ..Default::default()
        }
    }

    /// Set the API action.
    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    /// Set the API version.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a header.
    ///
    /// Header names are case-insensitive and stored lowercased. Names that
    /// map to a metadata field (`host`, `action`, `version`,
    /// `content-type`, `content-md5`) set that field instead.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    fn set_header(&mut self, name: &str, value: &str) {
        let name = name.to_lowercase();
        let value = value.to_string();

        match name.as_str() {
            "host" => self.host = value,
            "action" | X_ACS_ACTION => self.action = Some(value),
            "version" | X_ACS_VERSION => self.version = Some(value),
            "content-type" => self.content_type = Some(value),
            CONTENT_MD5 => self.content_md5 = Some(value),
            _ => {
                self.headers.insert(name, value);
            }
        }
    }

    /// Build a ROA request from `http::request::Parts`.
    ///
    /// Path and query pairs are percent-decoded, so the request signs the
    /// same values as one built with [`RoaRequest::with_query`]. Repeated
    /// header names keep their last value here; `sign_request` restores the
    /// other values of repeated pass-through headers after signing.
    pub fn from_parts(parts: &http::request::Parts) -> Result<Self> {
        let mut req = RoaRequest {
            method: parts.method.clone(),
            pathname: percent_decode_str(parts.uri.path())
                .decode_utf8_lossy()
                .to_string(),
            ..Default::default()
        };

        for (name, value) in parts.headers.iter() {
            req.set_header(name.as_str(), value.to_str()?);
        }
        // Uri authority wins over the host header.
        if let Some(authority) = parts.uri.authority() {
            req.host = authority.to_string();
        }

        if let Some(query) = parts.uri.query() {
            for pair in query.split('&').filter(|v| !v.is_empty()) {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                req.query.insert(
                    percent_decode_str(k).decode_utf8_lossy().to_string(),
                    percent_decode_str(v).decode_utf8_lossy().to_string(),
                );
            }
        }

        Ok(req)
    }
}

/// SignedRequest is a ready-to-send request descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Absolute url: `https://{host}{canonicalized resource}`.
    pub url: String,
    /// HTTP method.
    pub method: Method,
    /// All headers to send, including `authorization`.
    pub headers: BTreeMap<String, String>,
}

impl SignedRequest {
    /// Get header value by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Get the `authorization` header value.
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION.as_str())
    }

    /// Apply the signed request back to `http::request::Parts`.
    ///
    /// Existing headers are replaced by the signed header set. The uri is
    /// built from `url` with path and query values percent-encoded, the
    /// signature stays over the raw values.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        let uri: Uri = encode_url(&self.url).parse()?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let mut value = HeaderValue::from_str(&value)?;
            if name == AUTHORIZATION || name.as_str() == X_ACS_SECURITY_TOKEN {
                value.set_sensitive(true);
            }
            headers.insert(name, value);
        }

        parts.method = self.method;
        parts.uri = uri;
        let _ = mem::replace(&mut parts.headers, headers);
        Ok(())
    }

    /// Convert into an `http::Request` carrying the given body.
    pub fn into_request<T>(self, body: T) -> Result<http::Request<T>> {
        let (mut parts, body) = http::Request::new(body).into_parts();
        self.apply(&mut parts)?;
        Ok(http::Request::from_parts(parts, body))
    }
}

/// Percent-encode the path and query of a raw `scheme://host/path?query` url.
///
/// The query is split on `&` and the first `=` of each pair, so raw values
/// containing those characters can't be told apart from separators.
fn encode_url(url: &str) -> String {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };
    let (scheme, rest) = base.split_once("://").unwrap_or(("https", base));
    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let mut s = format!(
        "{scheme}://{authority}{}",
        utf8_percent_encode(path, &ROA_PATH_ENCODE_SET)
    );
    if let Some(query) = query {
        let query = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => format!(
                    "{}={}",
                    utf8_percent_encode(k, &ROA_QUERY_ENCODE_SET),
                    utf8_percent_encode(v, &ROA_QUERY_ENCODE_SET)
                ),
                None => utf8_percent_encode(pair, &ROA_QUERY_ENCODE_SET).to_string(),
            })
            .collect::<Vec<_>>()
            .join("&");
        s.push('?');
        s.push_str(&query);
    }
    s
}

impl Debug for SignedRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let headers = self
            .headers
            .iter()
            .map(|(k, v)| {
                let v = if k == AUTHORIZATION.as_str() || k == X_ACS_SECURITY_TOKEN {
                    format!("{:?}", Redact::from(v))
                } else {
                    v.clone()
                };
                (k.as_str(), v)
            })
            .collect::<BTreeMap<_, _>>();

        f.debug_struct("SignedRequest")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &headers)
            .finish()
    }
}
