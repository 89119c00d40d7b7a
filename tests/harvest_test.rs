use email_predictor::app::HarvestUseCase;
use email_predictor::harvester::Harvester;
use email_predictor::infra::http_client::ReqwestHttp;
use email_predictor::patterns::PatternKind;
use email_predictor::storage::{InMemoryPatternStore, PatternStore};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn harvester() -> Harvester {
    let http = Arc::new(ReqwestHttp::new("email-predictor-test", Duration::from_secs(5)).unwrap());
    Harvester::new(http)
        .with_pages(vec!["".into(), "contact".into(), "team".into()])
        .with_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn test_fetch_and_extract_text_and_mailto() {
    let server = MockServer::start_async().await;
    let contact = server
        .mock_async(|when, then| {
            when.method(GET).path("/contact");
            then.status(200)
                .header("content-type", "text/html")
                .body(r#"<p>Contact: jane.doe@acme.com</p><a href="mailto:sales@acme.com">Sales</a><p>jane.doe@acme.com</p>"#);
        })
        .await;

    let emails = harvester().fetch_and_extract(&server.url("/contact")).await;
    contact.assert_async().await;

    let emails: Vec<&str> = emails.iter().map(|e| e.as_str()).collect();
    assert_eq!(emails, vec!["jane.doe@acme.com", "sales@acme.com"]);
}

#[tokio::test]
async fn test_fetch_and_extract_fails_soft() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken");
            then.status(503).body("<p>oops@acme.com</p>");
        })
        .await;

    assert!(harvester().fetch_and_extract(&server.url("/broken")).await.is_empty());
    assert!(harvester().fetch_and_extract("http://127.0.0.1:1/nothing").await.is_empty());
}

#[tokio::test]
async fn test_fetch_and_extract_skips_binary_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/brochure.pdf");
            then.status(200)
                .header("content-type", "application/pdf")
                .body("%PDF-1.4 sales@acme.com");
        })
        .await;

    assert!(harvester().fetch_and_extract(&server.url("/brochure.pdf")).await.is_empty());
}

#[tokio::test]
async fn test_scrape_site_records_families() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("<footer>info@acme.com</footer>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/team");
            then.status(200)
                .body(r#"<ul><li>jane.doe@acme.com</li><li><a href="mailto:john_roe@acme.com">John</a></li></ul>"#);
        })
        .await;

    let store = Arc::new(InMemoryPatternStore::new());
    let use_case = HarvestUseCase::new(harvester(), store.clone());
    let report = use_case.scrape_site(&server.base_url()).await.unwrap();

    assert_eq!(report.emails, vec!["info@acme.com", "jane.doe@acme.com", "john_roe@acme.com"]);
    assert_eq!(report.recorded, 3);
    assert_eq!(
        store.lookup("acme.com").await.unwrap(),
        vec![
            (PatternKind::FirstDotLast, 1),
            (PatternKind::FirstLast, 1),
            (PatternKind::FirstUnderscoreLast, 1),
        ]
    );
}
