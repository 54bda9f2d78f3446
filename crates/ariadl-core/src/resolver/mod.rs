//! Download-page resolution: turn an episode's download page into a direct
//! media URL plus display title.
//!
//! The network side sits behind [`PageSource`], so the pipeline only sees
//! HTML strings. Each page is parsed into its own detached document which is
//! dropped before [`resolve`] returns, on success and on error alike.

mod extract;
mod source;

pub use extract::{extract_download_info, DOWNLOAD_TITLE_SELECTOR, MEDIA_LINK_SELECTOR};
pub use source::{CurlPageSource, PageSource};

use futures_util::future::{join_all, try_join_all};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

use crate::error::{Error, Result};

/// One resolved episode, ready to hand to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadInfo {
    pub title: String,
    pub url: String,
}

/// Fetch one download page and extract its [`DownloadInfo`]. Blocking.
pub fn resolve<P: PageSource + ?Sized>(source: &P, url: &Url) -> Result<DownloadInfo> {
    tracing::debug!("fetching download page {url}");
    let html = source.fetch(url)?;
    let info = extract_download_info(&html, url)?;
    tracing::debug!("resolved {url} -> {:?} {}", info.title, info.url);
    Ok(info)
}

/// Resolve every URL at once (one blocking task per page, no limit).
///
/// Results keep input order. The first failure fails the whole batch; pages
/// still in flight are left to finish on their own.
pub async fn resolve_all<P>(source: Arc<P>, urls: Vec<Url>) -> Result<Vec<DownloadInfo>>
where
    P: PageSource + ?Sized + 'static,
{
    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let source = Arc::clone(&source);
            tokio::task::spawn_blocking(move || resolve(source.as_ref(), &url))
        })
        .collect();

    try_join_all(
        handles
            .into_iter()
            .map(|handle| async move { Ok::<_, Error>(handle.await??) }),
    )
    .await
}

/// Like [`resolve_all`] but keeps every per-page outcome instead of failing fast.
pub async fn resolve_each<P>(source: Arc<P>, urls: Vec<Url>) -> Vec<(Url, Result<DownloadInfo>)>
where
    P: PageSource + ?Sized + 'static,
{
    let tasks = urls.into_iter().map(|url| {
        let source = Arc::clone(&source);
        let page = url.clone();
        let handle = tokio::task::spawn_blocking(move || resolve(source.as_ref(), &page));
        async move {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(e.into()),
            };
            (url, outcome)
        }
    });
    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ResolveError, TransportError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned pages by full URL; unknown URLs return 404.
    struct CannedPages {
        pages: HashMap<String, String>,
        fetches: AtomicUsize,
    }

    impl CannedPages {
        fn new(pages: &[(&str, String)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, html)| (u.to_string(), html.clone()))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl PageSource for CannedPages {
        fn fetch(&self, url: &Url) -> std::result::Result<String, TransportError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| TransportError::Status {
                    url: url.to_string(),
                    code: 404,
                })
        }
    }

    fn download_page(title: &str, href: &str) -> String {
        format!(
            r#"<div id="content-div">
                 <div class="row no-gutter video-show-width download-panel">
                   <div class="col-md-12"><div><div><h3>{title}</h3></div></div></div>
                 </div>
               </div>
               <table class="download-table"><tr><td><a href="{href}">1080p</a></td></tr></table>"#
        )
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn resolve_single_page() {
        let source = CannedPages::new(&[(
            "https://site.test/download?v=1",
            download_page("Episode 1", "https://cdn.test/1.mp4"),
        )]);
        let info = resolve(&source, &url("https://site.test/download?v=1")).unwrap();
        assert_eq!(
            info,
            DownloadInfo {
                title: "Episode 1".to_string(),
                url: "https://cdn.test/1.mp4".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn resolve_all_keeps_input_order() {
        let source = Arc::new(CannedPages::new(&[
            (
                "https://site.test/download?v=1",
                download_page("One", "https://cdn.test/1.mp4"),
            ),
            (
                "https://site.test/download?v=2",
                download_page("Two", "https://cdn.test/2.mp4"),
            ),
            (
                "https://site.test/download?v=3",
                download_page("Three", "https://cdn.test/3.mp4"),
            ),
        ]));
        let urls = vec![
            url("https://site.test/download?v=3"),
            url("https://site.test/download?v=1"),
            url("https://site.test/download?v=2"),
        ];
        let infos = resolve_all(Arc::clone(&source), urls).await.unwrap();
        let titles: Vec<&str> = infos.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Three", "One", "Two"]);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn resolve_all_fails_whole_on_one_bad_page() {
        let source = Arc::new(CannedPages::new(&[
            (
                "https://site.test/download?v=1",
                download_page("One", "https://cdn.test/1.mp4"),
            ),
            (
                "https://site.test/download?v=2",
                "<html><body>gone</body></html>".to_string(),
            ),
        ]));
        let urls = vec![
            url("https://site.test/download?v=1"),
            url("https://site.test/download?v=2"),
        ];
        let err = resolve_all(source, urls).await.unwrap_err();
        match err {
            Error::Resolve(ResolveError::MissingTitle { url }) => {
                assert_eq!(url, "https://site.test/download?v=2")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolve_each_reports_per_page() {
        let source = Arc::new(CannedPages::new(&[(
            "https://site.test/download?v=1",
            download_page("One", "https://cdn.test/1.mp4"),
        )]));
        let urls = vec![
            url("https://site.test/download?v=1"),
            url("https://site.test/download?v=404"),
        ];
        let outcomes = resolve_each(source, urls).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].1.is_ok());
        assert_eq!(outcomes[1].0.as_str(), "https://site.test/download?v=404");
        assert!(matches!(
            outcomes[1].1,
            Err(Error::Transport(TransportError::Status { code: 404, .. }))
        ));
    }
}
