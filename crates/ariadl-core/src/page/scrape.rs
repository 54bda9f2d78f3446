//! Collection title and episode links from a watch page.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ScrapeError;

pub const COLLECTION_TITLE_SELECTOR: &str = "#video-playlist-wrapper h4";
pub const PLAYLIST_CONTAINER_SELECTOR: &str = "#video-playlist-wrapper";
pub const EPISODE_LINK_SELECTOR: &str = "a.overlay";

static COLLECTION_TITLE: Lazy<Selector> = Lazy::new(|| parse_static(COLLECTION_TITLE_SELECTOR));
static PLAYLIST_CONTAINER: Lazy<Selector> =
    Lazy::new(|| parse_static(PLAYLIST_CONTAINER_SELECTOR));
static EPISODE_LINK: Lazy<Selector> = Lazy::new(|| parse_static(EPISODE_LINK_SELECTOR));

pub(crate) fn parse_static(selector: &'static str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("bad built-in selector {selector}: {e}"))
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Title of the collection (playlist) the page belongs to.
pub fn collection_title(doc: &Html) -> Result<String, ScrapeError> {
    let heading = doc
        .select(&COLLECTION_TITLE)
        .next()
        .ok_or(ScrapeError::MissingElement {
            selector: COLLECTION_TITLE_SELECTOR,
        })?;
    let title = element_text(heading);
    if title.is_empty() {
        return Err(ScrapeError::EmptyText {
            selector: COLLECTION_TITLE_SELECTOR,
        });
    }
    Ok(title)
}

/// Watch URLs of every episode in the playlist, in document order.
///
/// Relative `href`s are resolved against `base` (the page URL).
pub fn episode_watch_urls(doc: &Html, base: &Url) -> Result<Vec<Url>, ScrapeError> {
    let container = doc
        .select(&PLAYLIST_CONTAINER)
        .next()
        .ok_or(ScrapeError::MissingElement {
            selector: PLAYLIST_CONTAINER_SELECTOR,
        })?;

    let mut urls = Vec::new();
    for anchor in container.select(&EPISODE_LINK) {
        let Some(href) = anchor.value().attr("href") else {
            tracing::debug!("skipping episode link without href");
            continue;
        };
        match base.join(href.trim()) {
            Ok(url) => urls.push(url),
            Err(e) => tracing::warn!("skipping episode link {href:?}: {e}"),
        }
    }

    if urls.is_empty() {
        return Err(ScrapeError::NoEpisodes {
            selector: EPISODE_LINK_SELECTOR,
        });
    }
    Ok(urls)
}
