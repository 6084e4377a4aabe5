//! Integration tests for `WikiClient` against a wiremock stand-in for the
//! encyclopedia API and article pages.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fancloud_wiki::{WikiClient, WikiError, PLACEHOLDER_IMAGE_URL, SEARCH_LIMIT};

fn test_client(server: &MockServer) -> WikiClient {
    WikiClient::new(&format!("{}/w/api.php", server.uri()), 5, "fancloud-test/0.1")
        .expect("client construction should not fail")
}

fn info_body(page_url: &str) -> serde_json::Value {
    json!({
        "batchcomplete": "",
        "query": {
            "pages": {
                "12345": {
                    "pageid": 12345,
                    "ns": 0,
                    "title": "テスト太郎",
                    "contentmodel": "wikitext",
                    "fullurl": page_url,
                    "canonicalurl": page_url
                }
            }
        }
    })
}

const ARTICLE_HTML: &str = r#"<!DOCTYPE html><html><body>
<div class="mw-parser-output">
  <table class="infobox">
    <tr><td><img src="//upload.wikimedia.org/x/Flag_of_Japan.svg.png"></td></tr>
    <tr><th>職業</th><td>俳優、歌手、モデル</td></tr>
  </table>
  <p>テスト太郎は日本の俳優。</p>
  <span class="official-website"><a href="https://taro.example.jp/">公式</a></span>
  <a href="https://twitter.com/taro">Twitter</a>
</div>
</body></html>"#;

// ---------------------------------------------------------------------------
// search_titles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_titles_truncates_to_four_results() {
    let server = MockServer::start().await;

    let hits: Vec<_> = (1..=6)
        .map(|i| json!({ "ns": 0, "title": format!("候補{i}"), "pageid": i }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .and(query_param("srsearch", "テスト"))
        .and(query_param("srlimit", "4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "query": { "search": hits } })),
        )
        .mount(&server)
        .await;

    let titles = test_client(&server)
        .search_titles("テスト")
        .await
        .expect("search should succeed");

    assert_eq!(titles.len(), SEARCH_LIMIT);
    assert_eq!(titles, vec!["候補1", "候補2", "候補3", "候補4"]);
}

#[tokio::test]
async fn search_titles_returns_empty_list_when_no_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "query": { "search": [] } })),
        )
        .mount(&server)
        .await;

    let titles = test_client(&server).search_titles("zzz").await.expect("ok");
    assert!(titles.is_empty());
}

#[tokio::test]
async fn search_titles_without_query_object_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": { "code": "x" } })))
        .mount(&server)
        .await;

    let err = test_client(&server).search_titles("q").await.unwrap_err();
    assert!(
        matches!(err, WikiError::Malformed { .. }),
        "expected Malformed, got: {err:?}"
    );
}

#[tokio::test]
async fn search_titles_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server).search_titles("q").await.unwrap_err();
    assert!(
        matches!(err, WikiError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// resolve_page_url
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_page_url_returns_fullurl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "info"))
        .and(query_param("inprop", "url"))
        .and(query_param("titles", "テスト太郎"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(info_body("https://ja.wikipedia.org/wiki/Taro")),
        )
        .mount(&server)
        .await;

    let url = test_client(&server)
        .resolve_page_url("テスト太郎")
        .await
        .expect("resolve should succeed");
    assert_eq!(url, "https://ja.wikipedia.org/wiki/Taro");
}

#[tokio::test]
async fn resolve_page_url_missing_page_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {
                "pages": {
                    "-1": {
                        "ns": 0,
                        "title": "存在しない人物",
                        "missing": "",
                        "fullurl": "https://ja.wikipedia.org/wiki/存在しない人物"
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .resolve_page_url("存在しない人物")
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn resolve_page_url_empty_pages_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "query": { "pages": {} } })))
        .mount(&server)
        .await;

    let err = test_client(&server).resolve_page_url("x").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn resolve_page_url_without_fullurl_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "pages": { "7": { "pageid": 7, "title": "x" } } }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server).resolve_page_url("x").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn resolve_page_url_invalid_json_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).resolve_page_url("x").await.unwrap_err();
    assert!(
        matches!(err, WikiError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// fetch_profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_profile_resolves_then_parses_article() {
    let server = MockServer::start().await;
    let page_url = format!("{}/wiki/Taro", server.uri());

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("titles", "テスト太郎"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body(&page_url)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Taro"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(ARTICLE_HTML),
        )
        .mount(&server)
        .await;

    let profile = test_client(&server)
        .fetch_profile("テスト太郎")
        .await
        .expect("profile");

    assert_eq!(profile.canonical_url, page_url);
    assert_eq!(profile.image_url.as_deref(), Some(PLACEHOLDER_IMAGE_URL));
    assert_eq!(profile.profession.as_deref(), Some("俳優, 歌手, モデル"));
    assert_eq!(profile.summary.as_deref(), Some("テスト太郎は日本の俳優。"));
    assert_eq!(
        profile.official_site_url.as_deref(),
        Some("https://taro.example.jp/")
    );
    assert_eq!(
        profile.social_links.x.as_deref(),
        Some("https://twitter.com/taro")
    );
}

#[tokio::test]
async fn fetch_profile_for_unknown_subject_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "pages": { "-1": { "title": "nobody", "missing": "" } } }
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_profile("nobody").await;
    assert!(
        matches!(result, Err(WikiError::NotFound { ref title }) if title == "nobody"),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_profile_page_404_is_not_found() {
    let server = MockServer::start().await;
    let page_url = format!("{}/wiki/Gone", server.uri());

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body(&page_url)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_profile("Gone").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}
