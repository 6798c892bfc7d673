//! Offline report: ranks one window and prints the ranking and attention graph as JSON.
//!
//! Usage: `rank_report <start YYYY-MM-DD> <end YYYY-MM-DD> [limit]`

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use law_impact_scorer::config::load_scoring_config_default;
use law_impact_scorer::{InMemoryStore, ScoreEngine};
use serde_json::json;

fn parse_date(arg: Option<String>, name: &str) -> Result<NaiveDate> {
    let Some(raw) = arg else {
        bail!("missing <{name}> (usage: rank_report <start> <end> [limit])");
    };
    raw.parse()
        .with_context(|| format!("invalid {name} date {raw:?}, expected YYYY-MM-DD"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let start = parse_date(args.next(), "start")?;
    let end = parse_date(args.next(), "end")?;

    let config = load_scoring_config_default()?;
    let limit = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid limit {raw:?}"))?,
        None => config.ranking.top_n,
    };

    let store = InMemoryStore::load_default()?;
    let engine = ScoreEngine::new(store, config);

    let ranked = engine.rank_top_articles(start, end, limit).await?;
    let graph = engine.build_attention_graph(start, end).await?;

    let report = json!({
        "start": start,
        "end": end,
        "ranked": ranked,
        "network_graph": graph,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
