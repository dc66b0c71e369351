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

//! Hash related utils.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use sha1::Sha1;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// HMAC with SHA1 hash.
pub fn hmac_sha1(key: &[u8], content: &[u8]) -> Vec<u8> {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha1>::new_from_slice(key).unwrap();
    h.update(content);

    h.finalize().into_bytes().to_vec()
}

/// Base64 encoded HMAC with SHA1 hash.
///
/// Use this function instead of `base64_encode(&hmac_sha1(key, content))` can
/// reduce extra copy.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha1>::new_from_slice(key).unwrap();
    h.update(content);

    base64_encode(&h.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"", "" ; "empty")]
    #[test_case(b"hello", "aGVsbG8=" ; "padded")]
    fn test_base64_encode(input: &[u8], expected: &str) {
        assert_eq!(base64_encode(input), expected);
    }

    #[test_case("key", "The quick brown fox jumps over the lazy dog", "3nybhbi3iqa8ino29wqQcBydtNk=" ; "rfc example")]
    #[test_case("secret", "GET\napplication/json\n\n\n\n/x", "QBktxV+ScEC4PHTsyW82hFzCdrM=" ; "roa string to sign")]
    fn test_base64_hmac_sha1(key: &str, content: &str, expected: &str) {
        assert_eq!(
            base64_hmac_sha1(key.as_bytes(), content.as_bytes()),
            expected
        );
        assert_eq!(
            base64_encode(&hmac_sha1(key.as_bytes(), content.as_bytes())),
            expected
        );
    }
}
