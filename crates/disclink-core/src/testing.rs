//! Scripted [`DiscussionHost`] for unit tests.

use crate::host::{DiscussionHost, DiscussionPage, SearchItem, ThreadItem};
use crate::types::DiscussionSummary;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub const REPO_URL: &str = "https://github.com/acme/docs";

#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    RateLimited,
    NotFound,
    Fail,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self, what: &str) -> Result<T> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::RateLimited => Err(Error::RateLimited(format!("{what} answered 403"))),
            Self::NotFound => Err(Error::NotFound(what.to_string())),
            Self::Fail => Err(Error::UnexpectedStatus {
                status: 500,
                url: what.to_string(),
            }),
        }
    }
}

/// Host whose answers are fixed up front. Every call is recorded.
///
/// Listing page `n > 0` is requested with cursor `c{n}`. Unscripted thread
/// numbers answer 404 and unscripted searches return no items.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub pages: Vec<Reply<DiscussionPage>>,
    pub threads: HashMap<u64, Reply<ThreadItem>>,
    pub searches: HashMap<String, Reply<Vec<SearchItem>>>,
    pub log: Mutex<Vec<String>>,
}

impl ScriptedHost {
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.log.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl DiscussionHost for ScriptedHost {
    async fn list_discussions(&self, first: u32, after: Option<&str>) -> Result<DiscussionPage> {
        self.record(format!("list:{first}:{}", after.unwrap_or("-")));
        let index = after
            .and_then(|c| c.strip_prefix('c'))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        self.pages
            .get(index)
            .map_or(Reply::Fail, Clone::clone)
            .to_result("graphql")
    }

    async fn fetch_thread(&self, number: u64) -> Result<ThreadItem> {
        self.record(format!("thread:{number}"));
        self.threads
            .get(&number)
            .map_or(Reply::NotFound, Clone::clone)
            .to_result(&format!("issues/{number}"))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchItem>> {
        self.record(format!("search:{query}"));
        self.searches
            .get(query)
            .map_or(Reply::Ok(Vec::new()), Clone::clone)
            .to_result("search")
    }
}

pub fn discussion(title: &str, number: u64) -> DiscussionSummary {
    DiscussionSummary {
        title: title.to_string(),
        url: format!("{REPO_URL}/discussions/{number}"),
        number: Some(number),
        updated_at: None,
        category: None,
    }
}

pub fn page_of(discussions: Vec<DiscussionSummary>, next: Option<&str>) -> DiscussionPage {
    DiscussionPage {
        discussions,
        next_cursor: next.map(str::to_string),
    }
}

pub fn thread(number: u64, title: &str, is_discussion: bool) -> ThreadItem {
    let kind = if is_discussion { "discussions" } else { "issues" };
    ThreadItem {
        number,
        title: title.to_string(),
        html_url: format!("{REPO_URL}/{kind}/{number}"),
    }
}

pub fn search_hit(title: &str, number: u64, is_discussion: bool) -> SearchItem {
    let kind = if is_discussion { "discussions" } else { "issues" };
    SearchItem {
        title: title.to_string(),
        html_url: format!("{REPO_URL}/{kind}/{number}"),
        created_at: None,
        number: Some(number),
    }
}
