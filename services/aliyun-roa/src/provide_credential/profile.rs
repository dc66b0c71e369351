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
use crate::Credential;
use async_trait::async_trait;
use log::debug;
use roasign_core::{Context, Error, ProvideCredential, Result};
use serde::Deserialize;

/// ProfileCredentialProvider loads credentials from the aliyun CLI config file.
///
/// The config file is read from:
///
/// 1. the path set via `with_config_file()`
/// 2. the `ALIBABA_CLOUD_CONFIG_FILE` environment variable
/// 3. `~/.aliyun/config.json`
///
/// The profile is selected by `with_profile()`, then `ALIBABA_CLOUD_PROFILE`,
/// then the `current` field of the file, and finally `default`.
///
/// Profiles in `AK` and `StsToken` mode are supported.
#[derive(Debug, Default, Clone)]
pub struct ProfileCredentialProvider {
    profile: Option<String>,
    config_file: Option<String>,
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the path to the config file.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    current: String,
    profiles: Vec<Profile>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Profile {
    name: String,
    mode: String,
    access_key_id: String,
    access_key_secret: String,
    sts_token: String,
    sts_expiration: i64,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let path = self
            .config_file
            .clone()
            .or_else(|| ctx.env_var(ALIBABA_CLOUD_CONFIG_FILE))
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let Some(expanded_path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read aliyun config file {expanded_path}: {err:?}");
                return Ok(None);
            }
        };

        let conf: ConfigFile = serde_json::from_slice(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse aliyun config file {expanded_path}"))
                .with_source(e)
        })?;

        let name = self
            .profile
            .clone()
            .or_else(|| ctx.env_var(ALIBABA_CLOUD_PROFILE))
            .or_else(|| Some(conf.current.clone()).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| "default".to_string());

        let Some(profile) = conf.profiles.into_iter().find(|p| p.name == name) else {
            debug!("profile {name} not found in aliyun config file {expanded_path}");
            return Ok(None);
        };
        debug!("loading credential from aliyun profile {profile:?}");

        if profile.access_key_id.is_empty() || profile.access_key_secret.is_empty() {
            debug!("profile {name} has no access key configured");
            return Ok(None);
        }

        match profile.mode.as_str() {
            "" | "AK" => Ok(Some(Credential::new(
                &profile.access_key_id,
                &profile.access_key_secret,
            ))),
            "StsToken" => {
                let mut cred = Credential::new(&profile.access_key_id, &profile.access_key_secret);
                cred.security_token = Some(profile.sts_token).filter(|v| !v.is_empty());
                if profile.sts_expiration > 0 {
                    cred.expires_in = chrono::DateTime::from_timestamp(profile.sts_expiration, 0);
                }
                Ok(Some(cred))
            }
            mode => {
                debug!("profile {name} uses unsupported mode {mode}, skipping");
                Ok(None)
            }
        }
    }
}
