//! Detail page enrichment: the long-form project description.

use scraper::Html;
use tracing::{instrument, warn};
use url::Url;

use projectbook_session::Session;
use projectbook_shared::{ProjectBookError, Result};

use crate::selectors::Markup;

/// Fetch a project's detail page and return its description.
///
/// A page without a description element yields `""`. Transport failures and
/// non-2xx statuses are returned as [`ProjectBookError::DetailFetch`].
#[instrument(skip_all, fields(url = %detail_url))]
pub async fn fetch_description(
    session: &Session,
    detail_url: &Url,
    markup: &Markup,
) -> Result<String> {
    let page = session
        .get(detail_url)
        .await
        .map_err(|e| ProjectBookError::DetailFetch(e.to_string()))?
        .ensure_success(ProjectBookError::DetailFetch)?;

    let description = parse_description(&page.body, markup);
    if description.is_none() {
        warn!("description not found");
    }
    Ok(description.unwrap_or_default())
}

/// Trimmed text of the description element, or `None` if the page has none.
pub fn parse_description(html: &str, markup: &Markup) -> Option<String> {
    let doc = Html::parse_document(html);
    markup
        .description(&doc)
        .map(|el| el.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use projectbook_shared::{HttpConfig, MarkupConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn markup() -> Markup {
        Markup::new(&MarkupConfig::default()).unwrap()
    }

    #[test]
    fn parses_nested_text() {
        let html = r#"<html><body>
            <div data-project-details-description="">
                <p>Build a <em>small</em> compiler.</p>
            </div>
        </body></html>"#;
        let text = parse_description(html, &markup()).unwrap();
        assert!(text.starts_with("Build a small compiler."));
    }

    #[test]
    fn missing_marker_is_none() {
        let html = "<html><body><div class=\"description\">Not marked</div></body></html>";
        assert_eq!(parse_description(html, &markup()), None);
    }

    #[tokio::test]
    async fn missing_marker_fetches_as_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details/9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;

        let session = Session::new(&HttpConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/details/9", server.uri())).unwrap();

        let description = fetch_description(&session, &url, &markup()).await.unwrap();
        assert_eq!(description, "");
    }

    #[tokio::test]
    async fn http_error_is_detail_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let session = Session::new(&HttpConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/details/404", server.uri())).unwrap();

        let err = fetch_description(&session, &url, &markup()).await.unwrap_err();
        assert!(matches!(err, ProjectBookError::DetailFetch(_)));
    }
}
