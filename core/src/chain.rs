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

use crate::{Context, ProvideCredential, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::fmt::{self, Debug};

/// A chain of credential providers that will be tried in order.
///
/// The first provider returning `Ok(Some(_))` wins. Providers returning
/// `Ok(None)` or an error are skipped.
pub struct ProvideCredentialChain<C: Send + Sync + Unpin + 'static> {
    providers: Vec<Box<dyn ProvideCredential<Credential = C>>>,
}

impl<C: Send + Sync + Unpin + 'static> ProvideCredentialChain<C> {
    /// Create a new empty credential provider chain.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a credential provider to the end of the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Add a credential provider to the front of the chain.
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.insert(0, Box::new(provider));
        self
    }

    /// Number of providers in this chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if this chain has no provider.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<C: Send + Sync + Unpin + 'static> Default for ProvideCredentialChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + Sync + Unpin + 'static> Debug for ProvideCredentialChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers", &self.providers)
            .finish()
    }
}

#[async_trait]
impl<C: Send + Sync + Unpin + 'static> ProvideCredential for ProvideCredentialChain<C> {
    type Credential = C;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            debug!("trying credential provider: {provider:?}");

            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    debug!("loaded credential from provider: {provider:?}");
                    return Ok(Some(cred));
                }
                Ok(None) => {
                    debug!("no credential found in provider: {provider:?}");
                }
                Err(e) => {
                    warn!("error loading credential from provider {provider:?}: {e:?}");
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Debug)]
    struct SuccessProvider(&'static str);

    #[async_trait]
    impl ProvideCredential for SuccessProvider {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[derive(Debug)]
    struct FailProvider;

    #[async_trait]
    impl ProvideCredential for FailProvider {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Err(Error::credential_denied("mock provider failed"))
        }
    }

    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait]
    impl ProvideCredential for EmptyProvider {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_chain_returns_first_success() {
        let _ = env_logger::builder().is_test(true).try_init();

        let chain = ProvideCredentialChain::new()
            .push(FailProvider)
            .push(EmptyProvider)
            .push(SuccessProvider("first"))
            .push(SuccessProvider("second"));

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert_eq!(cred.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_chain_returns_none_when_all_fail() {
        let chain = ProvideCredentialChain::new()
            .push(FailProvider)
            .push(EmptyProvider)
            .push(FailProvider);

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_push_front_takes_priority() {
        let chain = ProvideCredentialChain::new()
            .push(SuccessProvider("default"))
            .push_front(SuccessProvider("preferred"));
        assert_eq!(chain.len(), 2);

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert_eq!(cred.as_deref(), Some("preferred"));
    }

    #[tokio::test]
    async fn test_empty_chain_returns_none() {
        let chain: ProvideCredentialChain<String> = ProvideCredentialChain::default();
        assert!(chain.is_empty());

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }
}
