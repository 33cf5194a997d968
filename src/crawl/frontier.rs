// src/crawl/frontier.rs
// =============================================================================
// This module holds the crawl's bookkeeping: which URLs we have seen and
// which ones are still waiting to be fetched.
//
// Layout:
// - `arena`: every URL ever discovered, in discovery order. A URL's position
//   in the arena is its UrlId.
// - `index`: URL string -> UrlId. This *is* the visited set: a URL is
//   visited as soon as it is discovered, before it is fetched.
// - `queue`: UrlIds waiting to be fetched, oldest first (breadth-first).
//
// The arena only grows and a URL can only be queued on its first discovery,
// so nothing is ever fetched twice and the loop cannot cycle.
//
// Rust concepts:
// - Newtype (UrlId): a usize that can't be confused with any other count
// - VecDeque: push_back/pop_front gives FIFO order
// =============================================================================

use std::collections::{HashMap, VecDeque};

use url::Url;

/// Position of a URL in the frontier's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UrlId(usize);

#[derive(Debug)]
pub struct Frontier {
    arena: Vec<Url>,
    index: HashMap<String, UrlId>,
    queue: VecDeque<UrlId>,
}

impl Frontier {
    /// Starts a frontier with the seed already visited and queued.
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self {
            arena: Vec::new(),
            index: HashMap::new(),
            queue: VecDeque::new(),
        };
        frontier.discover(seed);
        frontier
    }

    /// Marks `url` visited and queues it, unless it was seen before.
    ///
    /// Returns true if the URL was new. Callers are expected to pass URLs
    /// that are already normalized and in scope.
    pub fn discover(&mut self, url: Url) -> bool {
        if self.index.contains_key(url.as_str()) {
            return false;
        }

        let id = UrlId(self.arena.len());
        self.index.insert(url.as_str().to_string(), id);
        self.arena.push(url);
        self.queue.push_back(id);
        true
    }

    /// Takes the oldest queued URL.
    pub fn pop(&mut self) -> Option<UrlId> {
        self.queue.pop_front()
    }

    pub fn url(&self, id: UrlId) -> &Url {
        &self.arena[id.0]
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.index.contains_key(url.as_str())
    }

    /// URLs discovered so far, fetched or not.
    pub fn visited_len(&self) -> usize {
        self.arena.len()
    }

    /// URLs still waiting to be fetched.
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }
}
