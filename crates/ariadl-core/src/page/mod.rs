//! Watch-page model and scraping.
//!
//! A [`Page`] is a loaded watch page: the URL it was loaded from plus its raw
//! HTML. Scraping always goes through a detached [`scraper::Html`] document
//! built from that HTML; nothing on the page is executed.

mod download_url;
mod scrape;

pub use download_url::download_page_url;
pub use scrape::{
    collection_title, episode_watch_urls, COLLECTION_TITLE_SELECTOR, EPISODE_LINK_SELECTOR,
    PLAYLIST_CONTAINER_SELECTOR,
};
pub(crate) use scrape::{element_text, parse_static};

use scraper::Html;
use url::Url;

#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    html: String,
}

impl Page {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parse the page into a fresh detached document.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}
