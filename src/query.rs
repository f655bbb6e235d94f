use std::collections::HashMap;
use tracing::{debug, trace};

// our own stuff that we need
use crate::criteria::{IntoCriteria, Matcher};
use crate::error::Result;
use crate::token::{KeyHasher, Token, TokenRef};

// ------------- Filter -------------
#[derive(Debug)]
pub struct Filter<'a> {
    label: Option<String>,
    matcher: Matcher,
    limit: Option<usize>,
    limit_terminates: bool,
    result: Vec<TokenRef<'a>>,
}

impl<'a> Filter<'a> {
    pub fn new(spec: impl IntoCriteria) -> Result<Self> {
        Ok(Self::from_matcher(spec.into_criteria()?.compile()?))
    }
    pub fn from_matcher(matcher: Matcher) -> Self {
        Self {
            label: None,
            matcher,
            limit: None,
            limit_terminates: false,
            result: Vec::new(),
        }
    }
    /// Matches every token.
    pub fn any() -> Self {
        Self::from_matcher(Matcher::any())
    }
    // a limit of zero means no limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }
    pub fn terminating(mut self) -> Self {
        self.limit_terminates = true;
        self
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
    pub fn limit_terminates(&self) -> bool {
        self.limit_terminates
    }
    pub fn matches(&self, token: &Token) -> bool {
        self.matcher.matches(token)
    }
    pub fn result(&self) -> &[TokenRef<'a>] {
        &self.result
    }
    pub fn into_result(self) -> Vec<TokenRef<'a>> {
        self.result
    }
    fn saturated(&self) -> bool {
        self.limit.is_some_and(|limit| self.result.len() >= limit)
    }
    fn reached_limit(&self) -> bool {
        self.limit == Some(self.result.len())
    }
}

// ------------- Outcome -------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Number of tokens consumed from the source.
    pub scanned: usize,
    /// Whether a terminating filter ended the scan before the source ran out.
    pub terminated: bool,
}

// ------------- Query -------------
/// An ordered set of filters evaluated together over a single pass.
#[derive(Debug, Default)]
pub struct Query<'a> {
    filters: Vec<Filter<'a>>,
}

impl<'a> Query<'a> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }
    pub fn with(mut self, filter: Filter<'a>) -> Self {
        self.filters.push(filter);
        self
    }
    pub fn push(&mut self, filter: Filter<'a>) {
        self.filters.push(filter);
    }
    pub fn len(&self) -> usize {
        self.filters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
    pub fn filters(&self) -> &[Filter<'a>] {
        &self.filters
    }
    pub fn filter(&self, position: usize) -> Option<&Filter<'a>> {
        self.filters.get(position)
    }
    pub fn labelled(&self, label: &str) -> Option<&Filter<'a>> {
        self.filters.iter().find(|f| f.label() == Some(label))
    }
    /// Results of the labelled filters, keyed by label.
    pub fn results(&self) -> HashMap<&str, &[TokenRef<'a>], KeyHasher> {
        self.filters
            .iter()
            .filter_map(|f| f.label().map(|label| (label, f.result())))
            .collect()
    }
    /// Consumes the query, keeping the result of one filter.
    pub fn take(mut self, position: usize) -> Vec<TokenRef<'a>> {
        if position < self.filters.len() {
            self.filters.swap_remove(position).into_result()
        } else {
            Vec::new()
        }
    }
    /// Runs every filter over one pass of the tokens. A terminating filter
    /// that reaches its limit ends the pass for all filters at once, before
    /// the filters after it have seen the current token.
    pub fn execute<I>(&mut self, tokens: I) -> Outcome
    where
        I: IntoIterator<Item = TokenRef<'a>>,
    {
        for filter in self.filters.iter_mut() {
            filter.result.clear();
        }
        let mut outcome = Outcome::default();
        'scan: for token in tokens {
            outcome.scanned += 1;
            for (position, filter) in self.filters.iter_mut().enumerate() {
                if filter.saturated() {
                    continue;
                }
                if filter.matcher.matches(&token) {
                    filter.result.push(token);
                }
                if filter.limit_terminates && filter.reached_limit() {
                    trace!(filter = position, at = ?token, "terminating filter reached its limit");
                    outcome.terminated = true;
                    break 'scan;
                }
            }
        }
        debug!(
            filters = self.filters.len(),
            scanned = outcome.scanned,
            terminated = outcome.terminated,
            "query executed"
        );
        outcome
    }
}
