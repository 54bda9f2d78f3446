//! ariadl core: scrape an episode page, resolve direct media URLs through the
//! site's download pages, and queue them on an aria2 daemon.

pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod naming;
pub mod page;
pub mod resolver;
pub mod rpc;
pub mod settings;
pub mod store;
