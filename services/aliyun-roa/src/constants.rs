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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Env values used in aliyun services.
pub const ALIBABA_CLOUD_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ALIBABA_CLOUD_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const ALIBABA_CLOUD_SECURITY_TOKEN: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";
pub const ALIBABA_CLOUD_PROFILE: &str = "ALIBABA_CLOUD_PROFILE";
pub const ALIBABA_CLOUD_CONFIG_FILE: &str = "ALIBABA_CLOUD_CONFIG_FILE";

/// Default location of the aliyun CLI config file.
pub const DEFAULT_CONFIG_FILE: &str = "~/.aliyun/config.json";

// Headers used in ROA signing.
pub const X_ACS_PREFIX: &str = "x-acs-";
pub const X_ACS_ACTION: &str = "x-acs-action";
pub const X_ACS_VERSION: &str = "x-acs-version";
pub const X_ACS_SIGNATURE_NONCE: &str = "x-acs-signature-nonce";
pub const X_ACS_SIGNATURE_METHOD: &str = "x-acs-signature-method";
pub const X_ACS_SIGNATURE_VERSION: &str = "x-acs-signature-version";
pub const X_ACS_SECURITY_TOKEN: &str = "x-acs-security-token";
pub const CONTENT_MD5: &str = "content-md5";

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const SIGNATURE_VERSION: &str = "1.0";
pub const ACCEPT_JSON: &str = "application/json";

/// AsciiSet used to encode query keys and values on the wire.
///
/// Every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static ROA_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet used to encode the pathname on the wire, keeps `/`.
pub static ROA_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
