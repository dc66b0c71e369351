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
use roasign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads Aliyun credentials from environment variables.
///
/// - `ALIBABA_CLOUD_ACCESS_KEY_ID`
/// - `ALIBABA_CLOUD_ACCESS_KEY_SECRET`
/// - `ALIBABA_CLOUD_SECURITY_TOKEN` (optional)
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let access_key_id = envs.get(ALIBABA_CLOUD_ACCESS_KEY_ID);
        let access_key_secret = envs.get(ALIBABA_CLOUD_ACCESS_KEY_SECRET);

        match (access_key_id, access_key_secret) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak.clone(),
                access_key_secret: sk.clone(),
                security_token: envs.get(ALIBABA_CLOUD_SECURITY_TOKEN).cloned(),
                expires_in: None,
            })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roasign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx_with_envs(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(&[
            (ALIBABA_CLOUD_ACCESS_KEY_ID, "test_access_key"),
            (ALIBABA_CLOUD_ACCESS_KEY_SECRET, "test_secret_key"),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "test_access_key");
        assert_eq!(cred.access_key_secret, "test_secret_key");
        assert!(cred.security_token.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_with_security_token() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(&[
            (ALIBABA_CLOUD_ACCESS_KEY_ID, "test_access_key"),
            (ALIBABA_CLOUD_ACCESS_KEY_SECRET, "test_secret_key"),
            (ALIBABA_CLOUD_SECURITY_TOKEN, "test_security_token"),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.security_token.as_deref(), Some("test_security_token"));

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial_credentials() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(&[(ALIBABA_CLOUD_ACCESS_KEY_ID, "test_access_key")]);

        let cred = EnvCredentialProvider::new().provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }
}
