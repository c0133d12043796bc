//! Listing page extraction: one [`ListingItem`] per project container.

use scraper::Html;
use tracing::{debug, info, instrument};
use url::Url;

use projectbook_session::Session;
use projectbook_shared::{ListingItem, ProjectBookError, Result};

use crate::selectors::Markup;

/// Fetch the listing page and extract its projects in document order.
///
/// Zero matching containers is an empty result, not an error. A malformed
/// container fails the whole extraction.
#[instrument(skip_all, fields(url = %url))]
pub async fn list_projects(
    session: &Session,
    url: &Url,
    markup: &Markup,
) -> Result<Vec<ListingItem>> {
    let page = session
        .get(url)
        .await
        .map_err(|e| ProjectBookError::ListingFetch(e.to_string()))?
        .ensure_success(ProjectBookError::ListingFetch)?;

    let items = parse_listing(&page.body, &page.url, markup)?;
    info!(projects = items.len(), "listing parsed");
    Ok(items)
}

/// Parse listing HTML. Detail links are resolved against `base_url`.
pub fn parse_listing(html: &str, base_url: &Url, markup: &Markup) -> Result<Vec<ListingItem>> {
    let doc = Html::parse_document(html);
    let mut items = Vec::new();

    for (index, container) in markup.containers(&doc).enumerate() {
        let raw = markup.extract_item(container).map_err(|reason| {
            ProjectBookError::listing_parse(format!("project container #{index}: {reason}"))
        })?;

        let detail_url = base_url.join(&raw.href).map_err(|e| {
            ProjectBookError::listing_parse(format!(
                "project container #{index}: invalid detail link '{}': {e}",
                raw.href
            ))
        })?;

        debug!(id = %raw.id, title = %raw.title, %detail_url, "found project");
        items.push(ListingItem {
            id: raw.id,
            title: raw.title,
            detail_url,
        });
    }

    Ok(items)
}
