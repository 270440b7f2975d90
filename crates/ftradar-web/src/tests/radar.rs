use axum::http::StatusCode;

use ftradar_core::error::ErrorPayload;

use super::harness::{Access, TestHarness, body_text, decode_json, header_value};

#[tokio::test]
async fn radar_lists_recent_items_with_preview() {
    let harness = TestHarness::public();
    let response = harness.get("/radar").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("Change radar · last 14 days"));
    assert!(html.contains("Curated information without warranty"));
    assert!(html.contains("Entries: 2"));
    assert!(html.contains("Solar peak rule"));
    assert!(html.contains("KfW 270 rate update"));
    assert!(!html.contains("Archived tariff note"));
    assert!(html.contains("<article class=\"digest-preview\">"));
    assert!(html.contains("<h2>EEG</h2>"));
    assert!(!html.contains("<b>lowered</b>"));
    assert!(html.contains("href=\"/radar/export.csv?days=14\""));
    assert!(html.contains("Legal notice"));
}

#[tokio::test]
async fn radar_filters_by_region_category_and_text() {
    let harness = TestHarness::public();

    let bavaria = body_text(harness.get("/radar?region=BY").await).await;
    assert!(bavaria.contains("Entries: 1"));
    assert!(bavaria.contains("Solar peak rule"));
    assert!(!bavaria.contains("KfW 270 rate update"));

    let nationwide = body_text(harness.get("/radar?region=DE").await).await;
    assert!(nationwide.contains("KfW 270 rate update"));
    assert!(!nationwide.contains("Solar peak rule"));

    let by_category = body_text(harness.get("/radar?category=KfW&category=EEG&q=inverter").await).await;
    assert!(by_category.contains("Entries: 1"));
    assert!(by_category.contains("Solar peak rule"));

    let wide = body_text(harness.get("/radar?days=60").await).await;
    assert!(wide.contains("Change radar · last 60 days"));
    assert!(wide.contains("Archived tariff note"));
}

#[tokio::test]
async fn empty_result_shows_info_without_table() {
    let harness = TestHarness::public();
    let html = body_text(harness.get("/radar?category=MSBG").await).await;
    assert!(html.contains("No entries for the selected period or filters."));
    assert!(!html.contains("<table>"));
    assert!(!html.contains("digest-preview\">"));
}

#[tokio::test]
async fn invalid_filters_return_error_payload() {
    let harness = TestHarness::public();

    let days = harness.get("/radar?days=400").await;
    assert_eq!(days.status(), StatusCode::BAD_REQUEST);
    let payload: ErrorPayload = decode_json(days).await;
    assert_eq!(payload.code, "VALIDATION_FAILED");
    assert_eq!(payload.operation, "radar.filter");

    let region = harness.get("/radar?region=XX").await;
    assert_eq!(region.status(), StatusCode::BAD_REQUEST);
    let payload: ErrorPayload = decode_json(region).await;
    assert_eq!(payload.code, "INVALID_REGION");
}

#[tokio::test]
async fn csv_export_follows_the_filter() {
    let harness = TestHarness::public();
    let response = harness.get("/radar/export.csv?region=BY").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(response.headers(), "content-type"),
        Some("text/csv; charset=utf-8")
    );
    assert_eq!(
        header_value(response.headers(), "content-disposition"),
        Some("attachment; filename=\"radar_export.csv\"")
    );
    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "recorded_at,effective_date,category,region,title,summary,source_url,source_org,change_type,impact_notes,tags"
    );
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",EEG,BY,Solar peak rule,"));
    assert!(lines[1].ends_with(",New,Check inverter settings,\"pv,grid\""));
}

#[tokio::test]
async fn pricing_cards_render_from_tier_file() {
    let harness = TestHarness::public();
    let html = body_text(harness.get("/pricing").await).await;
    assert!(html.contains("<div class=\"price-title\">Starter</div>"));
    assert!(html.contains("49,00 € / month"));
    assert!(html.contains("490,00 € / month"));
    assert_eq!(html.matches("plus VAT").count(), 1);
    assert!(html.contains("<li>Weekly digest</li>"));
}

#[tokio::test]
async fn pricing_without_tier_file_shows_notice() {
    let harness = TestHarness::public();
    std::fs::remove_file(&harness.state.config.tiers_path).expect("remove tiers");
    let response = harness.get("/pricing").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No pricing tiers configured."));
}

#[tokio::test]
async fn oversized_configured_window_is_clamped_for_bare_requests() {
    let harness = TestHarness::with_env(Access::Public, &[("FT_RADAR_DEFAULT_DAYS", "1000")]);
    let response = harness.get("/radar").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Change radar · last 365 days"));
    assert!(html.contains("Archived tariff note"));
}
