//! Lookup of object definitions across sources.
//!
//! A source declares which kinds of objects it defines through its root
//! token, e.g. `[OBJECT:ITEM]`, and then lists them as `[ITEM_PANTS:ITEM_PANTS_PANTS]`
//! followed by their properties. Object types are first normalized into the
//! header tags that may declare them, so `ITEM_PANTS` is searched for in
//! `OBJECT:ITEM` sources only.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::{debug, warn};

// our own stuff that we need
use crate::criteria::{Criteria, Matcher, split_pretty};
use crate::error::{QueryError, Result};
use crate::query::{Filter, Query};
use crate::queryable::Queryable;
use crate::token::{KeyHasher, TokenRef, TokenSequence};

lazy_static! {
    static ref STANDARD: ObjectResolver = ObjectResolver::default();
}

// ------------- TypeRule -------------
/// Maps object types onto header tags. A `{type}` placeholder in a header
/// is replaced with the object type being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "match", rename_all = "lowercase")]
pub enum TypeRule {
    Exact {
        types: Vec<String>,
        headers: Vec<String>,
    },
    Prefix {
        prefix: String,
        headers: Vec<String>,
    },
}

impl TypeRule {
    pub fn exact(types: &[&str], headers: &[&str]) -> Self {
        TypeRule::Exact {
            types: types.iter().map(|s| s.to_string()).collect(),
            headers: headers.iter().map(|s| s.to_string()).collect(),
        }
    }
    pub fn prefix(prefix: &str, headers: &[&str]) -> Self {
        TypeRule::Prefix {
            prefix: prefix.to_string(),
            headers: headers.iter().map(|s| s.to_string()).collect(),
        }
    }
    fn tags(&self, object_type: &str) -> Option<Vec<String>> {
        let headers = match self {
            TypeRule::Exact { types, headers } if types.iter().any(|t| t == object_type) => headers,
            TypeRule::Prefix { prefix, headers } if object_type.starts_with(prefix.as_str()) => {
                headers
            }
            _ => return None,
        };
        Some(
            headers
                .iter()
                .map(|h| h.replace("{type}", object_type))
                .collect(),
        )
    }
}

// ------------- ObjectQuery -------------
/// An object type together with a filter on the object identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectQuery {
    object_type: String,
    exact_id: Option<String>,
    id_pattern: Option<String>,
    id_in: Option<Vec<String>>,
}

impl ObjectQuery {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            exact_id: None,
            id_pattern: None,
            id_in: None,
        }
    }
    /// Parses `TYPE` or `TYPE:ID`, optionally enclosed in brackets.
    pub fn parse(pretty: &str) -> Result<Self> {
        let (object_type, mut ids) = split_pretty(pretty)?;
        if ids.len() > 1 {
            return Err(QueryError::parse(
                "expected at most one ':' between object type and identifier",
                pretty,
            ));
        }
        let query = Self::new(object_type);
        Ok(match ids.pop() {
            Some(id) => query.id(id),
            None => query,
        })
    }
    /// Combines the shorthand with explicitly given parts. Each of the type
    /// and the identifier may only be given once.
    pub fn from_parts(
        pretty: Option<&str>,
        object_type: Option<&str>,
        id: Option<&str>,
    ) -> Result<Self> {
        let parsed = pretty.map(Self::parse).transpose()?;
        let (pretty_type, pretty_id) = match &parsed {
            Some(q) => (Some(q.object_type.as_str()), q.exact_id.as_deref()),
            None => (None, None),
        };
        if pretty_type.is_some() && object_type.is_some() {
            return Err(QueryError::Ambiguous(
                "object type given both in shorthand and explicitly".to_string(),
            ));
        }
        if pretty_id.is_some() && id.is_some() {
            return Err(QueryError::Ambiguous(
                "object identifier given both in shorthand and explicitly".to_string(),
            ));
        }
        let Some(object_type) = pretty_type.or(object_type) else {
            return Err(QueryError::parse("missing object type", pretty.unwrap_or_default()));
        };
        let query = Self::new(object_type);
        Ok(match pretty_id.or(id) {
            Some(id) => query.id(id),
            None => query,
        })
    }
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.exact_id = Some(id.into());
        self
    }
    pub fn id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = Some(pattern.into());
        self
    }
    pub fn id_in<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_in = Some(ids.into_iter().map(Into::into).collect());
        self
    }
    pub fn object_type(&self) -> &str {
        &self.object_type
    }
    /// Criteria matching the definition token of the object.
    pub fn criteria(&self) -> Criteria {
        let mut criteria = Criteria::new().name(&self.object_type).args_count(1);
        if let Some(id) = &self.exact_id {
            criteria = criteria.arg(0, id);
        }
        if let Some(pattern) = &self.id_pattern {
            criteria = criteria.arg_pattern(0, pattern);
        }
        if let Some(ids) = &self.id_in {
            criteria = criteria.arg_in(0, ids.iter().cloned());
        }
        criteria
    }
}

pub trait IntoObjectQuery {
    fn into_object_query(self) -> Result<ObjectQuery>;
}
impl IntoObjectQuery for ObjectQuery {
    fn into_object_query(self) -> Result<ObjectQuery> {
        Ok(self)
    }
}
impl IntoObjectQuery for &ObjectQuery {
    fn into_object_query(self) -> Result<ObjectQuery> {
        Ok(self.clone())
    }
}
impl IntoObjectQuery for &str {
    fn into_object_query(self) -> Result<ObjectQuery> {
        ObjectQuery::parse(self)
    }
}
impl IntoObjectQuery for String {
    fn into_object_query(self) -> Result<ObjectQuery> {
        ObjectQuery::parse(&self)
    }
}

// ------------- ObjectResolver -------------
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ObjectResolver {
    sentinel: String,
    rules: Vec<TypeRule>,
}

impl Default for ObjectResolver {
    fn default() -> Self {
        Self {
            sentinel: String::from("OBJECT"),
            rules: vec![
                TypeRule::exact(&["WORD", "SYMBOL", "TRANSLATION"], &["LANGUAGE"]),
                TypeRule::prefix("ITEM_", &["ITEM"]),
                TypeRule::exact(&["COLOR", "SHAPE"], &["DESCRIPTOR", "DESCRIPTOR_{type}"]),
                TypeRule::exact(&["COLOR_PATTERN"], &["DESCRIPTOR_PATTERN"]),
                TypeRule::prefix("MATGLOSS_", &["MATGLOSS"]),
                TypeRule::exact(&["TILE_PAGE", "CREATURE_GRAPHICS"], &["GRAPHICS"]),
            ],
        }
    }
}

impl ObjectResolver {
    pub fn new(sentinel: impl Into<String>, rules: Vec<TypeRule>) -> Self {
        Self {
            sentinel: sentinel.into(),
            rules,
        }
    }
    pub fn standard() -> &'static ObjectResolver {
        &STANDARD
    }
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }
    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }
    /// Header tags that may declare objects of the given type. The first
    /// matching rule wins, a type without a rule is its own tag.
    pub fn normalize(&self, object_type: &str) -> Vec<String> {
        self.rules
            .iter()
            .find_map(|rule| rule.tags(object_type))
            .unwrap_or_else(|| vec![object_type.to_string()])
    }
    fn is_header(&self, source: &TokenSequence, tags: &[String]) -> bool {
        source.root().is_some_and(|root| {
            root.name() == self.sentinel
                && root.nargs() == 1
                && root.arg(0).is_some_and(|tag| tags.iter().any(|t| t == tag))
        })
    }
    /// Root tokens of the sources that may declare objects of the given type.
    pub fn headers<'a, I>(&self, sources: I, object_type: &str) -> Vec<TokenRef<'a>>
    where
        I: IntoIterator<Item = &'a TokenSequence>,
    {
        let tags = self.normalize(object_type);
        sources
            .into_iter()
            .filter(|source| self.is_header(source, &tags))
            .filter_map(TokenSequence::root)
            .collect()
    }
    fn prepare(&self, query: impl IntoObjectQuery) -> Result<(ObjectQuery, Vec<String>, Matcher)> {
        let query = query.into_object_query()?;
        let matcher = query.criteria().compile()?;
        let tags = self.normalize(query.object_type());
        debug!(object_type = query.object_type(), tags = ?tags, "resolving object");
        Ok((query, tags, matcher))
    }
    /// The first definition of an object, in source order.
    pub fn get_obj<'a, I>(&self, sources: I, query: impl IntoObjectQuery) -> Result<Option<TokenRef<'a>>>
    where
        I: IntoIterator<Item = &'a TokenSequence>,
    {
        let (_, tags, matcher) = self.prepare(query)?;
        for source in sources {
            if !self.is_header(source, &tags) {
                continue;
            }
            let Some(root) = source.root() else { continue };
            let mut query = Query::new().with(Filter::from_matcher(matcher.clone()).with_limit(1).terminating());
            root.query(&mut query)?;
            if let Some(found) = query.take(0).first() {
                return Ok(Some(*found));
            }
        }
        Ok(None)
    }
    /// Every definition of matching objects, in source order.
    pub fn all_obj<'a, I>(&self, sources: I, query: impl IntoObjectQuery) -> Result<Vec<TokenRef<'a>>>
    where
        I: IntoIterator<Item = &'a TokenSequence>,
    {
        let (query, tags, matcher) = self.prepare(query)?;
        let mut found = Vec::new();
        let mut candidates = 0;
        for source in sources {
            if !self.is_header(source, &tags) {
                continue;
            }
            let Some(root) = source.root() else { continue };
            candidates += 1;
            let mut scan = Query::new().with(Filter::from_matcher(matcher.clone()));
            root.query(&mut scan)?;
            found.extend(scan.take(0));
        }
        if candidates == 0 {
            warn!(object_type = query.object_type(), tags = ?tags, "no source declares this object type");
        }
        Ok(found)
    }
    /// Matching objects keyed by identifier. A later definition replaces an
    /// earlier one with the same identifier.
    pub fn obj_map<'a, I>(
        &self,
        sources: I,
        query: impl IntoObjectQuery,
    ) -> Result<HashMap<String, TokenRef<'a>, KeyHasher>>
    where
        I: IntoIterator<Item = &'a TokenSequence>,
    {
        Ok(self
            .all_obj(sources, query)?
            .into_iter()
            .filter_map(|token| token.arg(0).map(|id| (id.to_string(), token)))
            .collect())
    }
}
