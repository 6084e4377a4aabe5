//! Encyclopedia commands: `lookup` and `search`.
//!
//! Both talk to the configured API directly; no database is needed.

use fancloud_core::AppConfig;
use fancloud_wiki::WikiClient;

fn build_client(config: &AppConfig) -> anyhow::Result<WikiClient> {
    Ok(WikiClient::new(
        &config.wiki_api_url,
        config.wiki_timeout_secs,
        &config.wiki_user_agent,
    )?)
}

/// Resolve `name`, scrape its article and print the profile as pretty JSON.
///
/// # Errors
///
/// Returns an error if the subject has no page or the encyclopedia is unreachable.
pub(crate) async fn run_lookup(config: &AppConfig, name: &str, raw: bool) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let profile = client.fetch_profile(name).await?;

    let json = if raw {
        serde_json::to_string_pretty(&profile)?
    } else {
        serde_json::to_string_pretty(&profile.render())?
    };
    println!("{json}");
    Ok(())
}

/// Print up to four candidate titles, one per line.
///
/// # Errors
///
/// Returns an error if the search request fails.
pub(crate) async fn run_search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let titles = client.search_titles(query).await?;

    if titles.is_empty() {
        tracing::info!(query, "no matching titles");
        return Ok(());
    }
    for title in titles {
        println!("{title}");
    }
    Ok(())
}
