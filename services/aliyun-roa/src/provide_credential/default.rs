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

use crate::provide_credential::{
    ConfigCredentialProvider, EnvCredentialProvider, ProfileCredentialProvider,
};
use crate::{Config, Credential};
use async_trait::async_trait;
use roasign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};
use std::sync::Arc;

/// DefaultCredentialProvider is a loader that will try to load credential via default chains.
///
/// Resolution order:
///
/// 1. Environment variables
/// 2. Aliyun CLI config file (`~/.aliyun/config.json`)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(ProfileCredentialProvider::new());

        Self { chain }
    }

    /// Create a new `DefaultCredentialProvider` driven by given config.
    ///
    /// Static keys in config are tried first, `profile` and `config_file`
    /// are passed to the profile provider.
    pub fn with_config(config: Arc<Config>) -> Self {
        let mut profile = ProfileCredentialProvider::new();
        if let Some(v) = &config.profile {
            profile = profile.with_profile(v);
        }
        if let Some(v) = &config.config_file {
            profile = profile.with_config_file(v);
        }

        let chain = ProvideCredentialChain::new()
            .push(ConfigCredentialProvider::new(config))
            .push(EnvCredentialProvider::new())
            .push(profile);

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// This allows adding a high-priority credential source that will be tried
    /// before all other providers in the default chain.
    ///
    /// ```no_run
    /// use roasign_aliyun_roa::{DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// let provider = DefaultCredentialProvider::new()
    ///     .push_front(StaticCredentialProvider::new("access_key", "secret_key"));
    /// ```
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        self.chain = self.chain.push_front(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
