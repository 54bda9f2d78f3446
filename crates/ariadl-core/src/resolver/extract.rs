//! Title and media link extraction from a download page.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use super::DownloadInfo;
use crate::error::ResolveError;
use crate::page::{element_text, parse_static};

pub const DOWNLOAD_TITLE_SELECTOR: &str = "#content-div > div.row.no-gutter.video-show-width.download-panel > div.col-md-12 > div > div > h3";
pub const MEDIA_LINK_SELECTOR: &str = "table.download-table a";

static DOWNLOAD_TITLE: Lazy<Selector> = Lazy::new(|| parse_static(DOWNLOAD_TITLE_SELECTOR));
static MEDIA_LINK: Lazy<Selector> = Lazy::new(|| parse_static(MEDIA_LINK_SELECTOR));

/// Parse `html` (the page fetched from `page_url`) into a detached document
/// and pull out the episode title and the first download-table link.
///
/// The link is resolved against `page_url`. An empty title is accepted.
pub fn extract_download_info(html: &str, page_url: &Url) -> Result<DownloadInfo, ResolveError> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&DOWNLOAD_TITLE)
        .next()
        .map(element_text)
        .ok_or_else(|| ResolveError::MissingTitle {
            url: page_url.to_string(),
        })?;

    let media = doc
        .select(&MEDIA_LINK)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .ok_or_else(|| ResolveError::MissingMediaUrl {
            url: page_url.to_string(),
        })?;

    Ok(DownloadInfo {
        title,
        url: media.to_string(),
    })
}
