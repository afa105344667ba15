// Reflection Discovery
// Finds query parameters whose current values are echoed verbatim in the page

use crate::http::client::HttpClient;
use crate::http::error::FetchError;
use crate::http::response::FetchOutcome;
use crate::payload::injector::query_values;
use std::collections::BTreeSet;
use url::Url;

/// Names of the parameters with at least one non-empty value contained in `body`.
///
/// Comparison is plain substring matching on the decoded query value; an
/// HTML-escaped or re-encoded echo does not count.
pub fn reflected_params(url: &Url, body: &str) -> BTreeSet<String> {
    query_values(url)
        .into_iter()
        .filter(|(_, values)| values.iter().any(|v| !v.is_empty() && body.contains(v.as_str())))
        .map(|(name, _)| name)
        .collect()
}

/// Fetch `target` and report which of its query parameters are reflected.
///
/// Redirects and non-HTML responses give an empty set.
pub async fn detect_reflected(
    client: &HttpClient,
    target: &str,
) -> Result<BTreeSet<String>, FetchError> {
    let url = Url::parse(target).map_err(|e| FetchError::invalid_url(target, e))?;
    detect_reflected_url(client, &url).await
}

pub async fn detect_reflected_url(
    client: &HttpClient,
    url: &Url,
) -> Result<BTreeSet<String>, FetchError> {
    match client.fetch(url).await? {
        FetchOutcome::Page(body) => {
            let reflected = reflected_params(url, &body);
            tracing::debug!("{} reflects {:?}", url, reflected);
            Ok(reflected)
        }
        FetchOutcome::Skipped(reason) => {
            tracing::debug!("{} skipped: {}", url, reason);
            Ok(BTreeSet::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Context;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_values_found_in_body_are_reflected() {
        let u = url("http://example.test/?q=hello&id=42&lang=en");
        let reflected = reflected_params(&u, "<p>hello</p><span>42</span>");

        assert_eq!(
            reflected.into_iter().collect::<Vec<_>>(),
            vec!["id".to_string(), "q".to_string()]
        );
    }

    #[test]
    fn test_any_repeated_value_matches() {
        let u = url("http://example.test/?tag=nope&tag=rust");
        assert!(reflected_params(&u, "tags: rust").contains("tag"));
    }

    #[test]
    fn test_empty_values_never_match() {
        let u = url("http://example.test/?q=&empty");
        assert!(reflected_params(&u, "<html></html>").is_empty());
    }

    #[test]
    fn test_escaped_echo_does_not_match() {
        let u = url("http://example.test/?q=%3Cb%3E");
        assert!(reflected_params(&u, "<p>&lt;b&gt;</p>").is_empty());
        assert!(reflected_params(&u, "<p>%3Cb%3E</p>").is_empty());
        assert!(reflected_params(&u, "<p><b></p>").contains("q"));
    }

    #[test]
    fn test_no_query_no_reflection() {
        let u = url("http://example.test/page");
        assert!(reflected_params(&u, "page").is_empty());
    }

    #[tokio::test]
    async fn test_detect_against_html_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hello</p>", "text/html"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&Context::default()).unwrap();
        let target = format!("{}/?q=hello&other=absent", server.uri());
        let reflected = detect_reflected(&client, &target).await.unwrap();

        assert_eq!(reflected.len(), 1);
        assert!(reflected.contains("q"));
    }

    #[tokio::test]
    async fn test_detect_redirect_and_json_yield_nothing() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::path("/moved"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", "/")
                    .set_body_raw("hello", "text/html"),
            )
            .mount(&server)
            .await;
        Mock::given(wiremock::matchers::path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{\"q\":\"hello\"}", "application/json"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&Context::default()).unwrap();
        for p in ["/moved", "/api"] {
            let target = format!("{}{}?q=hello", server.uri(), p);
            assert!(detect_reflected(&client, &target).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_unparseable_target_is_an_error() {
        let client = HttpClient::new(&Context::default()).unwrap();
        let err = detect_reflected(&client, "not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_declared_charset_does_not_hide_raw_echo() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(|req: &Request| {
                let q = req
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                ResponseTemplate::new(200)
                    .set_body_raw(format!("<p>{}</p>", q).into_bytes(), "text/html; charset=iso-8859-1")
            })
            .mount(&server)
            .await;

        let client = HttpClient::new(&Context::default()).unwrap();
        let target = format!("{}/?q=%C3%A9t%C3%A9", server.uri());
        let reflected = detect_reflected(&client, &target).await.unwrap();

        assert!(reflected.contains("q"), "reflected = {:?}", reflected);
    }
}
