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

use crate::constants::*;
use crate::{Credential, RoaRequest, SignedRequest};
use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE, HOST};
use http::{HeaderMap, HeaderValue, Method};
use log::debug;
use rand::Rng;
use roasign_core::hash::base64_hmac_sha1;
use roasign_core::time::{format_http_date, now, DateTime};
use roasign_core::{Context, Error, Result, SignRequest};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

/// RequestSigner that implements Aliyun ROA signature.
///
/// - [ROA signature](https://help.aliyun.com/document_detail/315526.html)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the signature nonce.
    ///
    /// # Note
    ///
    /// Reusing a nonce makes the server reject the request as a replay.
    /// Only use this function for testing.
    pub fn with_nonce(mut self, nonce: &str) -> Self {
        self.nonce = Some(nonce.to_string());
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    fn get_nonce(&self) -> String {
        match &self.nonce {
            Some(nonce) => nonce.clone(),
            None => generate_nonce(&mut rand::thread_rng()),
        }
    }

    /// Sign a ROA request with given credential.
    pub fn sign(&self, cred: &Credential, req: &RoaRequest) -> Result<SignedRequest> {
        if req.host.is_empty() {
            return Err(Error::request_invalid(
                "host is required to sign ROA request",
            ));
        }

        let mut headers = req.headers.clone();
        headers.insert(HOST.to_string(), req.host.clone());
        if let Some(v) = &req.content_type {
            headers.insert(CONTENT_TYPE.to_string(), v.clone());
        }
        if let Some(v) = &req.content_md5 {
            headers.insert(CONTENT_MD5.to_string(), v.clone());
        }

        headers.insert(DATE.to_string(), format_http_date(self.get_time()));
        headers.insert(ACCEPT.to_string(), ACCEPT_JSON.to_string());
        headers.insert(X_ACS_SIGNATURE_NONCE.to_string(), self.get_nonce());
        headers.insert(
            X_ACS_SIGNATURE_METHOD.to_string(),
            SIGNATURE_METHOD.to_string(),
        );
        headers.insert(
            X_ACS_SIGNATURE_VERSION.to_string(),
            SIGNATURE_VERSION.to_string(),
        );
        headers.insert(
            X_ACS_VERSION.to_string(),
            req.version.clone().unwrap_or_default(),
        );
        headers.insert(
            X_ACS_ACTION.to_string(),
            req.action.clone().unwrap_or_default(),
        );
        if let Some(token) = &cred.security_token {
            headers.insert(X_ACS_SECURITY_TOKEN.to_string(), token.clone());
        }

        let canonicalized_headers = canonicalize_headers(&headers);
        debug!("calculated canonicalized headers: {canonicalized_headers:?}");
        let canonicalized_resource = canonicalize_resource(&req.pathname, &req.query);
        debug!("calculated canonicalized resource: {canonicalized_resource}");

        let string_to_sign = string_to_sign(
            &req.method,
            &headers,
            &canonicalized_headers,
            &canonicalized_resource,
        )?;
        debug!("calculated string to sign: {string_to_sign:?}");

        let signature =
            base64_hmac_sha1(cred.access_key_secret.as_bytes(), string_to_sign.as_bytes());
        headers.insert(
            AUTHORIZATION.to_string(),
            format!("acs {}:{}", cred.access_key_id, signature),
        );

        Ok(SignedRequest {
            url: format!("https://{}{}", req.host, canonicalized_resource),
            method: req.method.clone(),
            headers,
        })
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        if expires_in.is_some() {
            return Err(Error::request_invalid(
                "ROA signature doesn't support presigned request",
            ));
        }
        let Some(cred) = credential else {
            return Ok(());
        };

        let roa = RoaRequest::from_parts(req)?;
        let original = req.headers.clone();
        self.sign(cred, &roa)?.apply(req)?;
        restore_repeated_headers(&original, &mut req.headers);
        Ok(())
    }
}

/// Put back every value of repeated pass-through headers.
///
/// Signing keeps one value per name. Headers outside `x-acs-*` don't take
/// part in the signature, so their other values are sent as they were, unless
/// signing replaced the header.
fn restore_repeated_headers(original: &HeaderMap, signed: &mut HeaderMap) {
    for name in original.keys() {
        if name.as_str().starts_with(X_ACS_PREFIX) {
            continue;
        }
        let values: Vec<HeaderValue> = original.get_all(name).iter().cloned().collect();
        if values.len() < 2 || signed.get(name) != values.last() {
            continue;
        }

        signed.remove(name);
        for value in values {
            signed.append(name.clone(), value);
        }
    }
}

/// Generate a signature nonce.
///
/// The nonce is `floor(x * 1_000_000)` for a uniformly random `x` in
/// `[1, 10)`, which always gives a seven digit number.
pub fn generate_nonce<R: Rng>(rng: &mut R) -> String {
    let v: f64 = rng.gen_range(1.0..10.0);
    ((v * 1_000_000.0).floor() as u64).to_string()
}

/// Build the canonicalized headers block.
///
/// Only `x-acs-` headers take part. Names are lowercased and sorted, values
/// have `\t`, `\n`, `\r` and `\x0c` removed before trimming.
pub fn canonicalize_headers<K, V>(headers: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let filtered: BTreeMap<String, String> = headers
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_lowercase(), v))
        .filter(|(k, _)| k.starts_with(X_ACS_PREFIX))
        .map(|(k, v)| {
            let v: String = v
                .as_ref()
                .chars()
                .filter(|c| !matches!(c, '\t' | '\n' | '\r' | '\x0c'))
                .collect();
            (k, v.trim().to_string())
        })
        .collect();

    let mut s = String::new();
    for (k, v) in filtered {
        s.push_str(&k);
        s.push(':');
        s.push_str(&v);
        s.push('\n');
    }
    s
}

/// Build the canonicalized resource.
///
/// Query values are used verbatim, without url encoding.
pub fn canonicalize_resource<K, V>(path: &str, query: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = query.into_iter().collect();
    if pairs.is_empty() {
        return path.to_string();
    }
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Build the string to sign.
///
/// ```text
/// METHOD\n
/// accept\n
/// content-md5\n
/// content-type\n
/// date\n
/// CanonicalizedHeaders
/// CanonicalizedResource
/// ```
pub fn string_to_sign(
    method: &Method,
    headers: &BTreeMap<String, String>,
    canonicalized_headers: &str,
    canonicalized_resource: &str,
) -> Result<String> {
    let header = |name: &str| headers.get(name).map(String::as_str).unwrap_or_default();

    let mut s = String::new();
    writeln!(&mut s, "{}", method.as_str())?;
    writeln!(&mut s, "{}", header(ACCEPT.as_str()))?;
    writeln!(&mut s, "{}", header(CONTENT_MD5))?;
    writeln!(&mut s, "{}", header(CONTENT_TYPE.as_str()))?;
    writeln!(&mut s, "{}", header(DATE.as_str()))?;
    write!(&mut s, "{canonicalized_headers}{canonicalized_resource}")?;
    Ok(s)
}
