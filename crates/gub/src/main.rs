use std::sync::Arc;

use gub_core::{config::Config, relations::RelationApi};
use gub_github::GithubClient;

#[tokio::main]
async fn main() -> Result<(), gub_core::Error> {
    gub_core::logging::init("gub")?;

    let cfg = Arc::new(Config::load()?);

    let github: Arc<dyn RelationApi> =
        Arc::new(GithubClient::new(cfg.github_token.clone(), cfg.fetch_timeout));

    gub_telegram::router::run_polling(cfg, github)
        .await
        .map_err(|e| gub_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
