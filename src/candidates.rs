//! Build the list of numbers eligible for a draw from a range and a filter.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::ops::RangeInclusive;

use crate::number_parser;

/// How the filter text is applied to the range.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every number in the range is eligible.
    #[default]
    None,
    /// Only listed numbers are eligible. An empty list leaves nothing.
    #[value(name = "include")]
    IncludeOnly,
    /// Listed numbers are removed from the range.
    Exclude,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilterMode::None => "none",
            FilterMode::IncludeOnly => "include",
            FilterMode::Exclude => "exclude",
        };
        f.write_str(label)
    }
}

fn contains(spans: &[RangeInclusive<u64>], n: u64) -> bool {
    spans.iter().any(|s| s.contains(&n))
}

/// Return the ascending candidate list for `start..=end` after applying `mode` with `filter_raw`.
///
/// Never fails. A reversed range simply yields an empty list; callers are
/// expected to reject it before getting here.
pub fn build_candidates(start: u64, end: u64, mode: FilterMode, filter_raw: &str) -> Vec<u64> {
    let base = start..=end;
    match mode {
        FilterMode::None => base.collect(),
        FilterMode::IncludeOnly => {
            let spans = number_parser::parse_spans(filter_raw);
            if spans.is_empty() {
                return Vec::new();
            }
            base.filter(|n| contains(&spans, *n)).collect()
        }
        FilterMode::Exclude => {
            let spans = number_parser::parse_spans(filter_raw);
            base.filter(|n| !contains(&spans, *n)).collect()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    start: u64,
    end: u64,
    mode: FilterMode,
    filter_raw: String,
}

/// Least-recently-used memo over [`build_candidates`], keyed on every input.
#[derive(Debug)]
pub struct CandidateCache {
    capacity: usize,
    entries: HashMap<CacheKey, Vec<u64>>,
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl CandidateCache {
    /// `capacity == 0` disables caching; every call rebuilds.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_build(
        &mut self,
        start: u64,
        end: u64,
        mode: FilterMode,
        filter_raw: &str,
    ) -> Vec<u64> {
        if self.capacity == 0 {
            self.misses += 1;
            return build_candidates(start, end, mode, filter_raw);
        }

        let key = CacheKey {
            start,
            end,
            mode,
            filter_raw: filter_raw.to_string(),
        };
        if let Some(hit) = self.entries.get(&key) {
            let out = hit.clone();
            self.hits += 1;
            self.touch(&key);
            tracing::debug!(start, end, %mode, "candidate cache hit");
            return out;
        }

        self.misses += 1;
        let built = build_candidates(start, end, mode, filter_raw);
        tracing::debug!(start, end, %mode, count = built.len(), "candidates rebuilt");
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, built.clone());
        built
    }

    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
