//! Rawquery – a small query engine over flat token streams.
//!
//! Game data of the "raw" kind is written as bracketed tokens, each a name
//! followed by colon separated arguments:
//! `[CREATURE:DOG][NAME:dog:dogs:dog][TILE:'d'][CREATURE:CAT]...`.
//! A record has no end marker. It owns the tokens after it until the next
//! record of the same kind begins, and this crate exists to answer questions
//! about such streams without first parsing them into a tree:
//! * A [`token::Token`] is a name with an ordered list of string arguments.
//! * A [`token::TokenSequence`] is one named source of tokens. Its first token
//!   is the root, which for object definition files declares what they contain.
//! * A [`token::TokenRef`] is a handle on one position of a sequence. It can
//!   itself be queried for the tokens around it.
//! * A [`query::Query`] runs several [`query::Filter`]s over a single pass,
//!   where a terminating filter may end the pass for all of them.
//!
//! ## Modules
//! * [`token`] – Tokens, sequences, handles and traversals.
//! * [`criteria`] – What a token must look like: exact names, anchored
//!   patterns, sets, argument tests and caller supplied closures.
//! * [`query`] – The single pass, multi filter executor.
//! * [`queryable`] – The [`queryable::Queryable`] trait and its builders
//!   (`get`, `all`, `until`, `all_until` and friends).
//! * [`scope`] – Inference of where a record's properties end.
//! * [`object`] – Lookup of object definitions through the headers of sources.
//! * [`dataset`] – A container of named sources that is queryable as a whole.
//! * [`edit`] – Deferred modification of tokens found by queries.
//! * [`settings`] – Dialect rules and named queries loaded with `config`.
//!
//! ## Criteria
//! Wherever a builder takes a specification it accepts either a
//! [`criteria::Criteria`] or the `NAME:ARG1:ARG2` shorthand. The shorthand
//! `NAME` only constrains the name, while `NAME:A:B` also requires the exact
//! argument list `[A, B]`. Name and argument patterns are regular
//! expressions matched from the start of the text.
//!
//! ## Quick Start
//! ```
//! use rawquery::prelude::*;
//! let mut creatures = TokenSequence::new("creature_standard");
//! for token in ["OBJECT:CREATURE", "CREATURE:DOG", "NAME:dog:dogs:dog", "TILE:'d'", "CREATURE:CAT", "TILE:'c'"] {
//!     creatures.push(token.parse().unwrap());
//! }
//! let dog = creatures.get("CREATURE:DOG").unwrap().unwrap();
//! assert_eq!(dog.get_prop("TILE").unwrap().unwrap().arg(0), Some("'d'"));
//! let mut data = Dataset::new();
//! data.add_source(creatures);
//! let cat = data.get_obj("CREATURE:CAT").unwrap().unwrap();
//! assert_eq!(cat.index(), 4);
//! ```
//!
//! ## Mutation
//! Results borrow the sequence they came from, so tokens cannot change while
//! results are alive. Record what should change as [`edit::Edit`]s and apply
//! them afterwards with [`token::TokenSequence::apply`] or
//! [`dataset::Dataset::apply`].
//!
//! ## Status
//! Queries are synchronous and single threaded. Sequences and datasets are
//! plain values, so sharing them across threads is left to the caller.

pub mod criteria;
pub mod dataset;
pub mod edit;
pub mod error;
pub mod object;
pub mod query;
pub mod queryable;
pub mod scope;
pub mod settings;
pub mod token;

pub mod prelude {
    pub use crate::criteria::{Criteria, IntoCriteria};
    pub use crate::dataset::Dataset;
    pub use crate::edit::{Edit, Mutation};
    pub use crate::error::{QueryError, Result};
    pub use crate::object::{ObjectQuery, ObjectResolver};
    pub use crate::query::{Filter, Outcome, Query};
    pub use crate::queryable::{Queryable, Scan};
    pub use crate::scope::{PropDictOptions, PropValue, ScopeRules};
    pub use crate::settings::Settings;
    pub use crate::token::{Token, TokenLocation, TokenRef, TokenSequence, Traversal};
}
