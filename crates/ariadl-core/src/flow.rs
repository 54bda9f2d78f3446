//! The two user-facing flows: queue the current episode, or queue the whole
//! collection the page belongs to.
//!
//! Both are a straight line: settings snapshot → scrape → derive download
//! pages → resolve all in parallel → one dispatch. A failure anywhere aborts
//! the flow before anything is queued, unless the caller opted into
//! [`FailurePolicy::SkipFailed`].

use serde::Serialize;
use std::sync::Arc;
use url::Url;

use crate::error::Result;
use crate::page::{collection_title, download_page_url, episode_watch_urls, Page};
use crate::resolver::{resolve_all, resolve_each, DownloadInfo, PageSource};
use crate::rpc::{CallOutcome, Dispatcher};
use crate::settings::{Settings, SettingsStore};
use crate::store::KeyValueStore;

/// Commands the host exposes to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Settings,
    DownloadEpisode,
    DownloadCollection,
}

impl Action {
    pub const ALL: [Action; 3] = [
        Action::Settings,
        Action::DownloadEpisode,
        Action::DownloadCollection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Settings => "Settings",
            Action::DownloadEpisode => "Download this episode",
            Action::DownloadCollection => "Download collection",
        }
    }
}

/// What to do when some episodes of a batch fail to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failed resolution aborts the flow; nothing is queued.
    #[default]
    AbortAll,
    /// Queue what resolved, report the rest. Fails only if nothing resolved.
    SkipFailed,
}

/// An episode left out under [`FailurePolicy::SkipFailed`].
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub page: String,
    pub error: String,
}

/// Result of a completed flow.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub collection: String,
    pub items: Vec<DownloadInfo>,
    pub outcomes: Vec<CallOutcome>,
    pub skipped: Vec<Skipped>,
}

pub struct Orchestrator<S, P: ?Sized, D> {
    store: S,
    source: Arc<P>,
    dispatcher: D,
    policy: FailurePolicy,
}

impl<S, P, D> Orchestrator<S, P, D>
where
    S: KeyValueStore,
    P: PageSource + ?Sized + 'static,
    D: Dispatcher,
{
    pub fn new(store: S, source: Arc<P>, dispatcher: D) -> Self {
        Self {
            store,
            source,
            dispatcher,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> SettingsStore<'_, S> {
        SettingsStore::new(&self.store)
    }

    /// Fetch a watch page to run a flow on.
    pub async fn load_page(&self, url: Url) -> Result<Page> {
        let source = Arc::clone(&self.source);
        let target = url.clone();
        let html = tokio::task::spawn_blocking(move || source.fetch(&target)).await??;
        Ok(Page::new(url, html))
    }

    /// Queue every episode listed in the page's playlist.
    pub async fn download_collection(&self, page: &Page) -> Result<DispatchReport> {
        let settings = self.settings().load().await?;
        let (collection, watch_urls) = {
            let doc = page.document();
            let collection = collection_title(&doc)?;
            let watch_urls = episode_watch_urls(&doc, page.url())?;
            (collection, watch_urls)
        };
        tracing::info!(
            "collection {collection:?}: {} episode(s) on {}",
            watch_urls.len(),
            page.url()
        );
        self.resolve_and_dispatch(&settings, collection, &watch_urls)
            .await
    }

    /// Queue only the episode the page itself shows. The collection title is
    /// still required; it names the destination directory.
    pub async fn download_episode(&self, page: &Page) -> Result<DispatchReport> {
        let settings = self.settings().load().await?;
        let collection = collection_title(&page.document())?;
        tracing::info!("collection {collection:?}: single episode {}", page.url());
        self.resolve_and_dispatch(&settings, collection, std::slice::from_ref(page.url()))
            .await
    }

    async fn resolve_and_dispatch(
        &self,
        settings: &Settings,
        collection: String,
        watch_urls: &[Url],
    ) -> Result<DispatchReport> {
        let download_pages: Vec<Url> = watch_urls.iter().map(download_page_url).collect();
        tracing::debug!("download pages: {download_pages:?}");

        let (items, skipped) = match self.policy {
            FailurePolicy::AbortAll => {
                let items = resolve_all(Arc::clone(&self.source), download_pages).await?;
                (items, Vec::new())
            }
            FailurePolicy::SkipFailed => self.resolve_skipping(download_pages).await?,
        };
        tracing::info!("resolved {} episode(s)", items.len());

        let outcomes = self
            .dispatcher
            .dispatch(settings, &collection, &items)
            .await?;

        Ok(DispatchReport {
            collection,
            items,
            outcomes,
            skipped,
        })
    }

    async fn resolve_skipping(
        &self,
        download_pages: Vec<Url>,
    ) -> Result<(Vec<DownloadInfo>, Vec<Skipped>)> {
        let mut items = Vec::new();
        let mut skipped = Vec::new();
        let mut first_error = None;

        for (page, outcome) in resolve_each(Arc::clone(&self.source), download_pages).await {
            match outcome {
                Ok(info) => items.push(info),
                Err(e) => {
                    tracing::warn!("skipping {page}: {e}");
                    skipped.push(Skipped {
                        page: page.to_string(),
                        error: e.to_string(),
                    });
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if items.is_empty() => Err(e),
            _ => Ok((items, skipped)),
        }
    }
}
