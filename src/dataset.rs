use std::collections::HashMap;
use tracing::debug;

// our own stuff that we need
use crate::edit::Edit;
use crate::error::{QueryError, Result};
use crate::object::{IntoObjectQuery, ObjectResolver};
use crate::queryable::{Queryable, Scan};
use crate::scope::{Props, ScopeRules};
use crate::settings::Settings;
use crate::token::{KeyHasher, TokenRef, TokenSequence, Traversal};

// ------------- Dataset -------------
/// Named token sources kept in the order they were added. As a token
/// source a dataset chains all of its sources.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    sources: Vec<TokenSequence>,
    index: HashMap<String, usize, KeyHasher>,
    resolver: ObjectResolver,
    scope: ScopeRules,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            resolver: settings.objects.clone(),
            scope: settings.scope.clone(),
            ..Self::default()
        }
    }
    /// Adds a source. A source with the same name is replaced in place.
    pub fn add_source(&mut self, source: TokenSequence) {
        match self.index.get(source.name()) {
            Some(&position) => self.sources[position] = source,
            None => {
                self.index.insert(source.name().to_string(), self.sources.len());
                self.sources.push(source);
            }
        }
    }
    pub fn source(&self, name: &str) -> Option<&TokenSequence> {
        self.index.get(name).map(|&position| &self.sources[position])
    }
    pub fn source_mut(&mut self, name: &str) -> Option<&mut TokenSequence> {
        self.index
            .get(name)
            .map(|&position| &mut self.sources[position])
    }
    pub fn sources(&self) -> &[TokenSequence] {
        &self.sources
    }
    pub fn len(&self) -> usize {
        self.sources.len()
    }
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
    pub fn resolver(&self) -> &ObjectResolver {
        &self.resolver
    }
    pub fn scope(&self) -> &ScopeRules {
        &self.scope
    }
    /// Property queries for a token, scoped by this dataset's rules.
    pub fn props<'a>(&self, owner: TokenRef<'a>) -> Props<'a, '_> {
        self.scope.props(owner)
    }
    pub fn headers(&self, object_type: &str) -> Vec<TokenRef<'_>> {
        self.resolver.headers(&self.sources, object_type)
    }
    pub fn get_obj(&self, query: impl IntoObjectQuery) -> Result<Option<TokenRef<'_>>> {
        self.resolver.get_obj(&self.sources, query)
    }
    pub fn all_obj(&self, query: impl IntoObjectQuery) -> Result<Vec<TokenRef<'_>>> {
        self.resolver.all_obj(&self.sources, query)
    }
    pub fn obj_map(
        &self,
        query: impl IntoObjectQuery,
    ) -> Result<HashMap<String, TokenRef<'_>, KeyHasher>> {
        self.resolver.obj_map(&self.sources, query)
    }
    /// Applies edits across sources. Every edit is validated before any
    /// source changes.
    pub fn apply(&mut self, edits: &[Edit]) -> Result<usize> {
        let mut grouped: Vec<Vec<&Edit>> = vec![Vec::new(); self.sources.len()];
        for edit in edits {
            let source = edit.location().source();
            let Some(&position) = self.index.get(source) else {
                return Err(QueryError::Edit(format!("unknown source {}", source)));
            };
            grouped[position].push(edit);
        }
        let mut staged = Vec::new();
        for (position, edits) in grouped.into_iter().enumerate() {
            if !edits.is_empty() {
                staged.push((position, self.sources[position].stage(edits)?));
            }
        }
        let touched = staged.len();
        let applied: usize = staged
            .into_iter()
            .map(|(position, staged)| self.sources[position].commit(staged))
            .sum();
        debug!(sources = touched, edits = applied, "dataset edited");
        Ok(applied)
    }
}

impl Extend<TokenSequence> for Dataset {
    fn extend<I: IntoIterator<Item = TokenSequence>>(&mut self, iter: I) {
        for source in iter {
            self.add_source(source);
        }
    }
}

impl FromIterator<TokenSequence> for Dataset {
    fn from_iter<I: IntoIterator<Item = TokenSequence>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        dataset.extend(iter);
        dataset
    }
}

impl<'a> Queryable<'a> for &'a Dataset {
    fn scan(self, traversal: Traversal) -> Result<Scan<'a>> {
        traversal.check()?;
        // the range applies to the chain as a whole
        let pass = Traversal {
            range: None,
            ..traversal
        };
        let mut passes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            passes.push(source.tokens(pass)?);
        }
        if traversal.reverse {
            passes.reverse();
        }
        let chained = passes.into_iter().flatten();
        Ok(match traversal.range {
            Some(range) => Scan::new(chained.take(range)),
            None => Scan::new(chained),
        })
    }
}
