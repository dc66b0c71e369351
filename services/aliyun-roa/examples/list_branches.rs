//! Example of signing the Codeup `ListRepositoryBranches` ROA API.
//!
//! Usage: `cargo run --example list_branches -- <repository_id> <organization_id> [search] [--send]`

use anyhow::{anyhow, Result};
use roasign_aliyun_roa::{Config, DefaultCredentialProvider, RequestSigner, RoaRequest};
use roasign_core::{Context, OsEnv, ProvideCredential};
use roasign_file_read_tokio::TokioFileRead;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let send = match args.iter().position(|v| v == "--send") {
        Some(idx) => {
            args.remove(idx);
            true
        }
        None => false,
    };
    let (repository_id, organization_id) = match (args.first(), args.get(1)) {
        (Some(repo), Some(org)) => (repo.clone(), org.clone()),
        _ => {
            return Err(anyhow!(
                "usage: list_branches <repository_id> <organization_id> [search] [--send]"
            ))
        }
    };
    let search = args.get(2).cloned();

    let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);

    // Credentials come from:
    // 1. ALIBABA_CLOUD_ACCESS_KEY_ID / ALIBABA_CLOUD_ACCESS_KEY_SECRET
    // 2. Aliyun CLI config file (~/.aliyun/config.json)
    let config = Config::default().from_env(&ctx);
    let provider = DefaultCredentialProvider::with_config(Arc::new(config));
    let cred = provider
        .provide_credential(&ctx)
        .await?
        .ok_or_else(|| anyhow!("no aliyun credential found"))?;

    let endpoint = env::var("ALIBABA_CLOUD_DEVOPS_ENDPOINT")
        .unwrap_or_else(|_| "devops.cn-hangzhou.aliyuncs.com".to_string());
    let mut req = RoaRequest::new(
        http::Method::GET,
        &endpoint,
        &format!("/repository/{repository_id}/branches"),
    )
    .with_action("ListRepositoryBranches")
    .with_version("2021-06-25")
    .with_query("organizationId", &organization_id);
    if let Some(search) = &search {
        req = req.with_query("search", search);
    }

    let signed = RequestSigner::new().sign(&cred, &req)?;
    println!("{signed:#?}");

    if send {
        let req: reqwest::Request = signed.into_request(String::new())?.try_into()?;
        let resp = reqwest::Client::new().execute(req).await?;
        println!("Response status: {}", resp.status());
        println!("{}", resp.text().await?);
    }

    Ok(())
}
