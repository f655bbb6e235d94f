//! Deferred modification of tokens.
//!
//! Query results borrow their sequence, so tokens cannot be changed while
//! the results are in hand. Instead an [`Edit`] records what should happen
//! at a [`TokenLocation`], and a batch of edits is applied once the results
//! are dropped. A batch is validated completely before anything changes.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::debug;

// our own stuff that we need
use crate::error::{QueryError, Result};
use crate::token::{Token, TokenLocation, TokenRef, TokenSequence};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Mutation {
    SetArgument { position: usize, value: String },
    AppendArgument(String),
    RemoveArgument(usize),
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    location: TokenLocation,
    mutation: Mutation,
}

impl Edit {
    pub fn new(location: TokenLocation, mutation: Mutation) -> Self {
        Self { location, mutation }
    }
    pub fn location(&self) -> &TokenLocation {
        &self.location
    }
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }
}

impl TokenRef<'_> {
    pub fn edit(&self, mutation: Mutation) -> Edit {
        Edit::new(self.location(), mutation)
    }
}

// Changes validated against a sequence but not yet written to it.
#[derive(Debug, Default)]
pub(crate) struct Staged {
    changed: BTreeMap<usize, Token>,
    removed: BTreeSet<usize>,
    edits: usize,
}

fn out_of_range(edit: &Edit, position: usize, token: &Token) -> QueryError {
    QueryError::Edit(format!(
        "argument {} is out of range for {} at {}",
        position, token, edit.location
    ))
}

impl TokenSequence {
    pub(crate) fn stage<'e, I>(&self, edits: I) -> Result<Staged>
    where
        I: IntoIterator<Item = &'e Edit>,
    {
        let mut staged = Staged::default();
        for edit in edits {
            if edit.location.source() != self.name() {
                return Err(QueryError::Edit(format!(
                    "{} does not belong to source {}",
                    edit.location,
                    self.name()
                )));
            }
            let index = edit.location.index();
            let Some(original) = self.tokens.get(index) else {
                return Err(QueryError::Edit(format!("no token at {}", edit.location)));
            };
            let token = staged
                .changed
                .entry(index)
                .or_insert_with(|| original.clone());
            match &edit.mutation {
                Mutation::SetArgument { position, value } => {
                    if *position >= token.nargs() {
                        return Err(out_of_range(edit, *position, token));
                    }
                    token.args_mut()[*position] = value.clone();
                }
                Mutation::AppendArgument(value) => token.args_mut().push(value.clone()),
                Mutation::RemoveArgument(position) => {
                    if *position >= token.nargs() {
                        return Err(out_of_range(edit, *position, token));
                    }
                    token.args_mut().remove(*position);
                }
                Mutation::Remove => {
                    staged.removed.insert(index);
                }
            }
            staged.edits += 1;
        }
        Ok(staged)
    }

    pub(crate) fn commit(&mut self, staged: Staged) -> usize {
        for (index, token) in staged.changed {
            self.tokens[index] = token;
        }
        // descending, so pending indexes stay valid
        for index in staged.removed.iter().rev() {
            self.tokens.remove(*index);
        }
        debug!(
            source = self.name(),
            edits = staged.edits,
            removed = staged.removed.len(),
            "edits applied"
        );
        staged.edits
    }

    /// Applies a batch of edits and returns how many were applied. Either
    /// every edit is applied or, on error, none is.
    pub fn apply<'e, I>(&mut self, edits: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'e Edit>,
    {
        let staged = self.stage(edits)?;
        Ok(self.commit(staged))
    }
}
