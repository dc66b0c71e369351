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

use http::{Method, StatusCode};
use log::{debug, warn};
use reqwest::Client;
use roasign_aliyun_roa::{RequestSigner, RoaRequest, StaticCredentialProvider};
use roasign_core::{Context, Error, OsEnv, Result, Signer};
use std::env;

struct Live {
    signer: Signer<roasign_aliyun_roa::Credential>,
    endpoint: String,
    organization_id: String,
    repository_id: String,
}

fn init_signer() -> Option<Live> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("ROASIGN_ALIYUN_ROA_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let access_key_id = env::var("ROASIGN_ALIYUN_ROA_ACCESS_KEY")
        .expect("env ROASIGN_ALIYUN_ROA_ACCESS_KEY must set");
    let access_key_secret = env::var("ROASIGN_ALIYUN_ROA_SECRET_KEY")
        .expect("env ROASIGN_ALIYUN_ROA_SECRET_KEY must set");

    let signer = Signer::new(
        Context::new().with_env(OsEnv),
        StaticCredentialProvider::new(&access_key_id, &access_key_secret),
        RequestSigner::new(),
    );

    Some(Live {
        signer,
        endpoint: env::var("ROASIGN_ALIYUN_ROA_ENDPOINT")
            .unwrap_or_else(|_| "devops.cn-hangzhou.aliyuncs.com".to_string()),
        organization_id: env::var("ROASIGN_ALIYUN_ROA_ORGANIZATION_ID")
            .expect("env ROASIGN_ALIYUN_ROA_ORGANIZATION_ID must set"),
        repository_id: env::var("ROASIGN_ALIYUN_ROA_REPOSITORY_ID")
            .expect("env ROASIGN_ALIYUN_ROA_REPOSITORY_ID must set"),
    })
}

async fn send(req: http::Request<String>) -> Result<(StatusCode, String)> {
    debug!("signed request: {req:?}");

    let req = reqwest::Request::try_from(req).map_err(|e| {
        Error::unexpected("failed to convert request").with_source(anyhow::Error::new(e))
    })?;
    let resp = Client::new().execute(req).await.map_err(|e| {
        Error::unexpected("failed to execute request").with_source(anyhow::Error::new(e))
    })?;

    let status = resp.status();
    let text = resp.text().await.map_err(|e| {
        Error::unexpected("failed to get response text").with_source(anyhow::Error::new(e))
    })?;
    debug!("got response: {status} {text}");
    Ok((status, text))
}

#[tokio::test]
async fn test_list_repository_branches() -> Result<()> {
    let Some(live) = init_signer() else {
        warn!("ROASIGN_ALIYUN_ROA_TEST is not set, skipped");
        return Ok(());
    };

    let uri = format!(
        "https://{}/repository/{}/branches?organizationId={}",
        live.endpoint, live.repository_id, live.organization_id
    );
    let (mut parts, body) = http::Request::get(uri)
        .header("x-acs-action", "ListRepositoryBranches")
        .header("x-acs-version", "2021-06-25")
        .body(String::new())?
        .into_parts();
    live.signer.sign(&mut parts, None).await?;

    let (status, _) = send(http::Request::from_parts(parts, body)).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_list_repository_branches_with_wrong_secret() -> Result<()> {
    let Some(live) = init_signer() else {
        warn!("ROASIGN_ALIYUN_ROA_TEST is not set, skipped");
        return Ok(());
    };

    let access_key_id = env::var("ROASIGN_ALIYUN_ROA_ACCESS_KEY")
        .expect("env ROASIGN_ALIYUN_ROA_ACCESS_KEY must set");
    let req = RoaRequest::new(
        Method::GET,
        &live.endpoint,
        &format!("/repository/{}/branches", live.repository_id),
    )
    .with_action("ListRepositoryBranches")
    .with_version("2021-06-25")
    .with_query("organizationId", &live.organization_id);

    let cred = roasign_aliyun_roa::Credential::new(&access_key_id, "not-the-secret");
    let signed = RequestSigner::new().sign(&cred, &req)?;

    let (status, _) = send(signed.into_request(String::new())?).await?;
    assert!(status.is_client_error(), "unexpected status {status}");
    Ok(())
}
