use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

// used to print out readable forms of a token
use std::fmt;
use std::ops::Deref;
use std::ptr;
use std::str::FromStr;

// used when tokens are handed to us as JSON or config values
use serde::Deserialize;

// our own stuff that we need
use crate::criteria::split_pretty;
use crate::error::{QueryError, Result};

// used for the source index and the property dictionaries
pub type KeyHasher = BuildHasherDefault<SeaHasher>;

// ------------- Token -------------
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TokenRepr")]
pub struct Token {
    name: String,
    args: Vec<String>,
}

impl Token {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn args(&self) -> &[String] {
        &self.args
    }
    pub fn arg(&self, position: usize) -> Option<&str> {
        self.args.get(position).map(String::as_str)
    }
    pub fn nargs(&self) -> usize {
        self.args.len()
    }
    pub fn args_mut(&mut self) -> &mut Vec<String> {
        &mut self.args
    }
    /// The token without its enclosing brackets, e.g. `TILE:156`.
    pub fn signature(&self) -> String {
        let mut s = self.name.clone();
        for arg in &self.args {
            s.push(':');
            s.push_str(arg);
        }
        s
    }
}
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.signature())
    }
}
impl FromStr for Token {
    type Err = QueryError;
    fn from_str(s: &str) -> Result<Self> {
        let (name, args) = split_pretty(s)?;
        Ok(Self { name, args })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenRepr {
    Pretty(String),
    Full {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
}
impl TryFrom<TokenRepr> for Token {
    type Error = QueryError;
    fn try_from(repr: TokenRepr) -> Result<Self> {
        match repr {
            TokenRepr::Pretty(pretty) => pretty.parse(),
            TokenRepr::Full { name, args } => Ok(Self { name, args }),
        }
    }
}

// ------------- TokenSequence -------------
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenSequence {
    name: String,
    #[serde(default)]
    pub(crate) tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: Vec::new(),
        }
    }
    pub fn from_tokens<I>(name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        Self {
            name: name.into(),
            tokens: tokens.into_iter().collect(),
        }
    }
    /// The source identifier of this sequence.
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    pub fn at(&self, index: usize) -> Option<TokenRef<'_>> {
        (index < self.tokens.len()).then_some(TokenRef {
            sequence: self,
            index,
        })
    }
    pub fn at_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.tokens.get_mut(index)
    }
    /// The designated root record, which is the first token.
    pub fn root(&self) -> Option<TokenRef<'_>> {
        self.at(0)
    }
    pub fn iter(&self) -> TokenIter<'_> {
        TokenIter::span(self, 0, self.tokens.len(), Traversal::default())
    }
    pub fn tokens(&self, traversal: Traversal) -> Result<TokenIter<'_>> {
        traversal.check()?;
        Ok(TokenIter::span(self, 0, self.tokens.len(), traversal))
    }
}
impl Extend<Token> for TokenSequence {
    fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}
impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

// ------------- TokenRef -------------
// A handle on one slot of a sequence. Two handles are the same token only
// when they point at the same slot of the same sequence, regardless of what
// the tokens contain.
#[derive(Clone, Copy)]
pub struct TokenRef<'a> {
    sequence: &'a TokenSequence,
    index: usize,
}

impl<'a> TokenRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn sequence(&self) -> &'a TokenSequence {
        self.sequence
    }
    pub fn token(&self) -> &'a Token {
        &self.sequence.tokens[self.index]
    }
    pub fn ptr_eq(&self, other: &TokenRef<'_>) -> bool {
        ptr::eq(self.sequence, other.sequence) && self.index == other.index
    }
    pub fn location(&self) -> TokenLocation {
        TokenLocation {
            source: self.sequence.name.clone(),
            index: self.index,
        }
    }
    /// Tokens following this one, or preceding it when reversed. The token
    /// itself is never part of its own traversal.
    pub fn tokens(&self, traversal: Traversal) -> Result<TokenIter<'a>> {
        traversal.check()?;
        Ok(if traversal.reverse {
            TokenIter::span(self.sequence, 0, self.index, traversal)
        } else {
            TokenIter::span(self.sequence, self.index + 1, self.sequence.len(), traversal)
        })
    }
}
impl<'a> Deref for TokenRef<'a> {
    type Target = Token;
    fn deref(&self) -> &Token {
        self.token()
    }
}
impl fmt::Display for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.token(), f)
    }
}
impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{} {}", self.sequence.name, self.index, self.token())
    }
}

// ------------- TokenLocation -------------
// Owned form of a TokenRef, valid after the borrow of the sequence ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenLocation {
    source: String,
    index: usize,
}
impl TokenLocation {
    pub fn new(source: impl Into<String>, index: usize) -> Self {
        Self {
            source: source.into(),
            index,
        }
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn index(&self) -> usize {
        self.index
    }
}
impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.source, self.index)
    }
}

// ------------- Traversal -------------
/// Parameters a token source accepts for one pass over its tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Traversal {
    pub reverse: bool,
    /// Maximum number of tokens the pass will yield.
    pub range: Option<usize>,
    /// Never supported, requesting it fails the traversal.
    pub include_self: bool,
}
impl Traversal {
    pub fn forward() -> Self {
        Self::default()
    }
    pub fn reversed() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }
    pub fn with_range(mut self, range: usize) -> Self {
        self.range = Some(range);
        self
    }
    pub(crate) fn check(&self) -> Result<()> {
        if self.include_self {
            return Err(QueryError::InvalidTraversal(
                "a token source cannot include itself".to_string(),
            ));
        }
        Ok(())
    }
}

// ------------- TokenIter -------------
#[derive(Debug, Clone)]
pub struct TokenIter<'a> {
    sequence: &'a TokenSequence,
    front: usize,
    back: usize,
    reverse: bool,
    remaining: Option<usize>,
}
impl<'a> TokenIter<'a> {
    fn span(sequence: &'a TokenSequence, front: usize, back: usize, traversal: Traversal) -> Self {
        Self {
            sequence,
            front,
            back: back.max(front),
            reverse: traversal.reverse,
            remaining: traversal.range,
        }
    }
}
impl<'a> Iterator for TokenIter<'a> {
    type Item = TokenRef<'a>;
    fn next(&mut self) -> Option<TokenRef<'a>> {
        if self.front >= self.back || self.remaining == Some(0) {
            return None;
        }
        let index = if self.reverse {
            self.back -= 1;
            self.back
        } else {
            self.front += 1;
            self.front - 1
        };
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(TokenRef {
            sequence: self.sequence,
            index,
        })
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.back - self.front;
        let left = self.remaining.map_or(left, |r| r.min(left));
        (left, Some(left))
    }
}
