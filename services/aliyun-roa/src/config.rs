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
use roasign_core::Context;

/// Config carries all the configuration for Aliyun ROA signing.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `security_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_SECURITY_TOKEN`]
    pub security_token: Option<String>,
    /// `profile` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_PROFILE`]
    /// - the `current` profile of the aliyun CLI config file
    pub profile: Option<String>,
    /// `config_file` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_CONFIG_FILE`]
    /// - default to `~/.aliyun/config.json`
    pub config_file: Option<String>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_SECURITY_TOKEN) {
            self.security_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_PROFILE) {
            self.profile.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_CONFIG_FILE) {
            self.config_file.get_or_insert(v);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roasign_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (ALIBABA_CLOUD_ACCESS_KEY_ID.to_string(), "env_ak".to_string()),
                (
                    ALIBABA_CLOUD_ACCESS_KEY_SECRET.to_string(),
                    "env_sk".to_string(),
                ),
                (ALIBABA_CLOUD_PROFILE.to_string(), "dev".to_string()),
            ]),
        });

        let config = Config::default().from_env(&ctx);
        assert_eq!(config.access_key_id.as_deref(), Some("env_ak"));
        assert_eq!(config.access_key_secret.as_deref(), Some("env_sk"));
        assert_eq!(config.security_token, None);
        assert_eq!(config.profile.as_deref(), Some("dev"));
        assert_eq!(config.config_file, None);
    }

    #[test]
    fn test_config_fields_take_priority() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([(
                ALIBABA_CLOUD_ACCESS_KEY_ID.to_string(),
                "env_ak".to_string(),
            )]),
        });

        let config = Config {
            access_key_id: Some("explicit_ak".to_string()),
            ..Default::default()
        }
        .from_env(&ctx);
        assert_eq!(config.access_key_id.as_deref(), Some("explicit_ak"));
    }
}
