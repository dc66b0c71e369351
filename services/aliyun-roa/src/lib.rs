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

//! Alibaba Cloud ROA signing implementation.
//!
//! This crate signs requests for Alibaba Cloud APIs following the ROA
//! (resource oriented architecture) style, such as the Codeup / DevOps
//! `ListRepositoryBranches` API. The signature is
//! `base64(HMAC-SHA1(access_key_secret, string_to_sign))` sent as
//! `authorization: acs {access_key_id}:{signature}`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use roasign_aliyun_roa::{Credential, RequestSigner, RoaRequest};
//!
//! fn main() -> roasign_core::Result<()> {
//!     let req = RoaRequest::new(
//!         http::Method::GET,
//!         "devops.cn-hangzhou.aliyuncs.com",
//!         "/repository/123/branches",
//!     )
//!     .with_action("ListRepositoryBranches")
//!     .with_version("2021-06-25")
//!     .with_query("organizationId", "org1");
//!
//!     let cred = Credential::new("access_key_id", "access_key_secret");
//!     let signed = RequestSigner::new().sign(&cred, &req)?;
//!
//!     println!("{} {}", signed.method, signed.url);
//!     Ok(())
//! }
//! ```
//!
//! ## Signing `http` requests
//!
//! `RequestSigner` implements [`roasign_core::SignRequest`], so it can be
//! combined with a credential provider in [`roasign_core::Signer`]:
//!
//! ```no_run
//! use roasign_aliyun_roa::{DefaultCredentialProvider, RequestSigner};
//! use roasign_core::{Context, OsEnv, Signer};
//! use roasign_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!     let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//!
//!     let (mut parts, body) = http::Request::get(
//!         "https://devops.cn-hangzhou.aliyuncs.com/repository/123/branches?organizationId=org1",
//!     )
//!     .header("x-acs-action", "ListRepositoryBranches")
//!     .header("x-acs-version", "2021-06-25")
//!     .body(())?
//!     .into_parts();
//!
//!     signer.sign(&mut parts, None).await?;
//!     let req = http::Request::from_parts(parts, body);
//!     println!("{:?}", req.headers());
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! ### Environment Variables
//!
//! ```bash
//! export ALIBABA_CLOUD_ACCESS_KEY_ID=your-access-key-id
//! export ALIBABA_CLOUD_ACCESS_KEY_SECRET=your-access-key-secret
//! export ALIBABA_CLOUD_SECURITY_TOKEN=your-sts-token  # Optional, for STS
//! ```
//!
//! ### Configuration File
//!
//! Profiles in `AK` and `StsToken` mode are loaded from the Aliyun CLI
//! configuration file (`~/.aliyun/config.json` or `ALIBABA_CLOUD_CONFIG_FILE`).

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod request;
pub use request::{RoaRequest, SignedRequest};

mod sign_request;
pub use sign_request::{
    canonicalize_headers, canonicalize_resource, generate_nonce, string_to_sign, RequestSigner,
};

mod provide_credential;
pub use provide_credential::*;
