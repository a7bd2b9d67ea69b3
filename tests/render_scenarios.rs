// tests/render_scenarios.rs
//
// End-to-end card scenarios through the injector with a scripted fetcher.

mod common;

use std::sync::Arc;

use common::{badge_texts, card, mount, scalable, ScriptedFetcher};
use rating_badge_injector::dom::Document;
use rating_badge_injector::{page, Injector, InjectorConfig, MemoryDocument, RatingBundle};

async fn scan_once(doc: &Arc<MemoryDocument>, fetcher: Arc<ScriptedFetcher>) {
    let injector = Injector::new(InjectorConfig::default(), doc.clone(), fetcher);
    injector.init();
    for t in injector.scan() {
        t.await.expect("enrich task");
    }
}

#[tokio::test]
async fn matrix_card_gets_three_badges_in_order() {
    let doc = Arc::new(MemoryDocument::new());
    let cards = mount(&doc, "trending", vec![card(0, "603", "movie")]);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![(
        "603",
        RatingBundle {
            aggregator: Some(7.9),
            critic_aggregate: Some(8.7),
            audience_aggregate: Some(89.0),
        },
    )]));
    scan_once(&doc, fetcher.clone()).await;

    assert_eq!(
        badge_texts(&doc, cards[0]),
        vec!["AGG 7.9", "CRITIC 8.7", "AUD 89%"]
    );
    assert_eq!(
        fetcher.seen.lock().unwrap().as_slice(),
        &[("603".to_string(), "movie".to_string())]
    );

    let target = scalable(&doc, cards[0]);
    let overlay = doc.children(target)[0];
    assert_eq!(
        doc.attribute(overlay, "class").as_deref(),
        Some(page::OVERLAY_CLASS)
    );
    let tooltips: Vec<_> = doc
        .children(overlay)
        .into_iter()
        .filter_map(|b| doc.attribute(b, "title"))
        .collect();
    assert_eq!(
        tooltips,
        vec![
            "AGG Rating: 7.9/10",
            "CRITIC Rating: 8.7/10",
            "AUD Score: 89%"
        ]
    );
    assert_eq!(doc.style(target, "position").as_deref(), Some("relative"));
    assert_eq!(doc.style(target, "overflow").as_deref(), Some("visible"));
}

#[tokio::test]
async fn aggregator_only_renders_single_badge() {
    let doc = Arc::new(MemoryDocument::new());
    let cards = mount(&doc, "tv", vec![card(3, "1399", "tv")]);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![(
        "1399",
        RatingBundle {
            aggregator: Some(8.4),
            ..Default::default()
        },
    )]));
    scan_once(&doc, fetcher).await;

    assert_eq!(badge_texts(&doc, cards[0]), vec!["AGG 8.4"]);
}

#[tokio::test]
async fn no_data_leaves_container_untouched_except_marker() {
    let doc = Arc::new(MemoryDocument::new());
    let cards = mount(&doc, "trending", vec![card(0, "1", "movie")]);
    let before = doc.outer_html(scalable(&doc, cards[0]));
    scan_once(&doc, Arc::new(ScriptedFetcher::new(vec![]))).await;

    assert_eq!(doc.outer_html(scalable(&doc, cards[0])), before);
    assert_eq!(
        doc.attribute(cards[0], page::ATTR_PROCESSED).as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn overlay_html_is_well_formed() {
    let doc = Arc::new(MemoryDocument::new());
    let cards = mount(&doc, "trending", vec![card(0, "603", "movie")]);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![(
        "603",
        RatingBundle {
            audience_aggregate: Some(89.0),
            ..Default::default()
        },
    )]));
    scan_once(&doc, fetcher).await;

    let overlay = doc.query_all(&page::OVERLAY)[0];
    assert_eq!(doc.parent(overlay), Some(scalable(&doc, cards[0])));
    assert_eq!(
        doc.outer_html(overlay),
        "<div class=\"rating-badges-container\"><div class=\"rating-badge aud\" \
         title=\"AUD Score: 89%\">AUD 89%</div></div>"
    );
}
