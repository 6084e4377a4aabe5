use super::*;

fn test_client(api_url: &str) -> WikiClient {
    WikiClient::new(api_url, 5, "fancloud-test/0.1").expect("client construction should not fail")
}

#[test]
fn new_rejects_unparseable_api_url() {
    let err = WikiClient::new("not a url", 5, "ua").unwrap_err();
    assert!(
        matches!(err, WikiError::InvalidApiUrl { .. }),
        "expected InvalidApiUrl, got: {err:?}"
    );
}

#[test]
fn build_url_appends_params_in_order() {
    let client = test_client("https://ja.wikipedia.org/w/api.php");
    let url = client.build_url(&[("action", "query"), ("list", "search"), ("srlimit", "4")]);
    assert_eq!(
        url.as_str(),
        "https://ja.wikipedia.org/w/api.php?action=query&list=search&srlimit=4"
    );
}

#[test]
fn build_url_percent_encodes_titles() {
    let client = test_client("https://ja.wikipedia.org/w/api.php");
    let url = client.build_url(&[("titles", "米津玄師")]);
    assert_eq!(
        url.as_str(),
        "https://ja.wikipedia.org/w/api.php?titles=%E7%B1%B3%E6%B4%A5%E7%8E%84%E5%B8%AB"
    );
}

#[tokio::test]
async fn resolve_page_url_rejects_blank_title_without_request() {
    // Port 9 is discard; any request would fail with Http rather than NotFound.
    let client = test_client("http://127.0.0.1:9/w/api.php");
    let err = client.resolve_page_url("   ").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}
