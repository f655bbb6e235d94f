//! Convenience queries over anything that can produce a pass of tokens.
//!
//! Each builder assembles one or two filters, runs them through
//! [`Query::execute`] and picks its answer from the accumulated results:
//!
//! | builder      | filters                                             | answer          |
//! |--------------|-----------------------------------------------------|-----------------|
//! | `get`        | target (limit 1, terminating)                       | first match     |
//! | `last`       | target                                              | last match      |
//! | `all`        | target                                              | every match     |
//! | `until`      | boundary (limit 1, terminating), catch-all          | tokens before   |
//! | `get_until`  | boundary (limit 1, terminating), target (limit 1)   | first before    |
//! | `last_until` | boundary (limit 1, terminating), target             | last before     |
//! | `all_until`  | boundary (limit 1, terminating), target             | all before      |
//!
//! Filters are compiled before the first token is read, so an invalid
//! specification never results in a partial scan.

use crate::criteria::IntoCriteria;
use crate::error::Result;
use crate::query::{Filter, Outcome, Query};
use crate::token::{TokenRef, TokenSequence, Traversal};

// ------------- Scan -------------
/// One pass over some tokens. A scan is consumed by the query run on it.
pub struct Scan<'a> {
    tokens: Box<dyn Iterator<Item = TokenRef<'a>> + 'a>,
}

impl<'a> Scan<'a> {
    /// Scans an explicit token source instead of a queryable's own traversal.
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = TokenRef<'a>>,
        I::IntoIter: 'a,
    {
        Self {
            tokens: Box::new(tokens.into_iter()),
        }
    }
    pub fn query(self, query: &mut Query<'a>) -> Outcome {
        query.execute(self.tokens)
    }
    pub fn get(self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        let mut query = Query::new().with(Filter::new(spec)?.with_limit(1).terminating());
        self.query(&mut query);
        Ok(query.take(0).first().copied())
    }
    pub fn last(self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        let mut query = Query::new().with(Filter::new(spec)?);
        self.query(&mut query);
        Ok(query.take(0).pop())
    }
    pub fn all(self, spec: impl IntoCriteria) -> Result<Vec<TokenRef<'a>>> {
        let mut query = Query::new().with(Filter::new(spec)?);
        self.query(&mut query);
        Ok(query.take(0))
    }
    pub fn contains(self, spec: impl IntoCriteria) -> Result<bool> {
        Ok(self.get(spec)?.is_some())
    }
    /// Every token up to, but excluding, the first boundary match.
    pub fn until(self, boundary: impl IntoCriteria) -> Result<Vec<TokenRef<'a>>> {
        let mut query = bounded(boundary, Filter::any())?;
        self.query(&mut query);
        Ok(query.take(1))
    }
    pub fn get_until(
        self,
        spec: impl IntoCriteria,
        boundary: impl IntoCriteria,
    ) -> Result<Option<TokenRef<'a>>> {
        let mut query = bounded(boundary, Filter::new(spec)?.with_limit(1))?;
        self.query(&mut query);
        Ok(query.take(1).first().copied())
    }
    pub fn last_until(
        self,
        spec: impl IntoCriteria,
        boundary: impl IntoCriteria,
    ) -> Result<Option<TokenRef<'a>>> {
        let mut query = bounded(boundary, Filter::new(spec)?)?;
        self.query(&mut query);
        Ok(query.take(1).pop())
    }
    pub fn all_until(
        self,
        spec: impl IntoCriteria,
        boundary: impl IntoCriteria,
    ) -> Result<Vec<TokenRef<'a>>> {
        let mut query = bounded(boundary, Filter::new(spec)?)?;
        self.query(&mut query);
        Ok(query.take(1))
    }
}

fn bounded<'a>(boundary: impl IntoCriteria, target: Filter<'a>) -> Result<Query<'a>> {
    let boundary = Filter::new(boundary)?.with_limit(1).terminating();
    Ok(Query::new().with(boundary).with(target))
}

// ------------- Queryable -------------
/// A token source. Implementors only provide [`Queryable::scan`]; every
/// builder then runs over a default forward traversal. Use `scan` directly
/// to reverse the direction or limit the range.
pub trait Queryable<'a>: Sized {
    fn scan(self, traversal: Traversal) -> Result<Scan<'a>>;

    fn query(self, query: &mut Query<'a>) -> Result<Outcome> {
        Ok(self.scan(Traversal::default())?.query(query))
    }
    fn get(self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        self.scan(Traversal::default())?.get(spec)
    }
    fn last(self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        self.scan(Traversal::default())?.last(spec)
    }
    fn all(self, spec: impl IntoCriteria) -> Result<Vec<TokenRef<'a>>> {
        self.scan(Traversal::default())?.all(spec)
    }
    fn contains(self, spec: impl IntoCriteria) -> Result<bool> {
        self.scan(Traversal::default())?.contains(spec)
    }
    fn until(self, boundary: impl IntoCriteria) -> Result<Vec<TokenRef<'a>>> {
        self.scan(Traversal::default())?.until(boundary)
    }
    fn get_until(
        self,
        spec: impl IntoCriteria,
        boundary: impl IntoCriteria,
    ) -> Result<Option<TokenRef<'a>>> {
        self.scan(Traversal::default())?.get_until(spec, boundary)
    }
    fn last_until(
        self,
        spec: impl IntoCriteria,
        boundary: impl IntoCriteria,
    ) -> Result<Option<TokenRef<'a>>> {
        self.scan(Traversal::default())?.last_until(spec, boundary)
    }
    fn all_until(
        self,
        spec: impl IntoCriteria,
        boundary: impl IntoCriteria,
    ) -> Result<Vec<TokenRef<'a>>> {
        self.scan(Traversal::default())?.all_until(spec, boundary)
    }
}

impl<'a> Queryable<'a> for &'a TokenSequence {
    fn scan(self, traversal: Traversal) -> Result<Scan<'a>> {
        Ok(Scan::new(self.tokens(traversal)?))
    }
}

impl<'a> Queryable<'a> for TokenRef<'a> {
    fn scan(self, traversal: Traversal) -> Result<Scan<'a>> {
        Ok(Scan::new(self.tokens(traversal)?))
    }
}
