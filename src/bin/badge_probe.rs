//! Probe: fetch ratings for one catalog item and print the overlay a card would get.
//!
//! Usage: `badge_probe <catalog-id> <media-type>` (e.g. `badge_probe 603 movie`).

use std::sync::Arc;

use rating_badge_injector::dom::Fragment;
use rating_badge_injector::{config, page, Document, Injector, MemoryDocument, SeerrClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("badges=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// One discover card the way the host page renders it.
fn synthetic_card(catalog_id: &str, media_type: &str) -> Fragment {
    Fragment::element("div")
        .class("verticalSection probe")
        .child(
            Fragment::element("div")
                .class("card discover-card")
                .attr(page::ATTR_INDEX, "0")
                .child(Fragment::element("div").class("cardScalable"))
                .child(
                    Fragment::element("button")
                        .class("discover-requestbutton")
                        .attr(page::ATTR_CATALOG_ID, catalog_id)
                        .attr(page::ATTR_MEDIA_TYPE, media_type),
                ),
        )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(catalog_id), Some(media_type)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: badge_probe <catalog-id> <media-type>");
    };

    let cfg = config::load_default()?;
    tracing::info!(
        target: "badges",
        base_url = %cfg.base_url,
        key_len = cfg.api_key.len(),
        "probe config loaded"
    );

    let doc = Arc::new(MemoryDocument::new());
    doc.append(doc.body(), synthetic_card(&catalog_id, &media_type));

    let fetcher = Arc::new(SeerrClient::new(&cfg)?);
    let injector = Injector::new(cfg, doc.clone(), fetcher);
    injector.init();
    for task in injector.scan() {
        task.await?;
    }

    match doc.query_all(&page::OVERLAY).first() {
        Some(&overlay) => println!("{}", doc.outer_html(overlay)),
        None => println!("no ratings for {media_type} {catalog_id}"),
    }
    Ok(())
}
