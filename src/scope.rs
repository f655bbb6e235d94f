use std::collections::HashMap;
use std::collections::hash_map::Entry;

use lazy_static::lazy_static;
use serde::Deserialize;

// our own stuff that we need
use crate::criteria::{Criteria, IntoCriteria};
use crate::error::Result;
use crate::queryable::Queryable;
use crate::token::{KeyHasher, Token, TokenRef, Traversal};

lazy_static! {
    static ref STANDARD: ScopeRules = ScopeRules::default();
}

// ------------- ScopeRules -------------
/// Decides where the properties of a record end. Records are flat-listed
/// without an end marker, so a record's properties run until the next token
/// that starts another record of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScopeRules {
    item_prefix: String,
    categories: Vec<String>,
}

impl Default for ScopeRules {
    fn default() -> Self {
        Self {
            item_prefix: String::from("ITEM_"),
            categories: vec![String::from("WORD"), String::from("SYMBOL")],
        }
    }
}

impl ScopeRules {
    pub fn new(item_prefix: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            item_prefix: item_prefix.into(),
            categories,
        }
    }
    pub fn standard() -> &'static ScopeRules {
        &STANDARD
    }
    pub fn item_prefix(&self) -> &str {
        &self.item_prefix
    }
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
    /// The boundary implied by an owner token's own name.
    pub fn boundary(&self, owner: &Token) -> Criteria {
        let name = owner.name();
        if !self.item_prefix.is_empty() && name.starts_with(&self.item_prefix) {
            Criteria::new().name_pattern(format!("{}.+", regex::escape(&self.item_prefix)))
        } else if self.categories.iter().any(|c| c == name) {
            Criteria::new().name_in(self.categories.iter().cloned())
        } else {
            Criteria::new().name(name)
        }
    }
    pub fn props<'a>(&self, owner: TokenRef<'a>) -> Props<'a, '_> {
        Props {
            owner,
            rules: self,
            traversal: Traversal::default(),
        }
    }
}

// ------------- Props -------------
/// Queries scoped to the properties of one owner token.
#[derive(Debug, Clone, Copy)]
pub struct Props<'a, 'r> {
    owner: TokenRef<'a>,
    rules: &'r ScopeRules,
    traversal: Traversal,
}

impl<'a> Props<'a, '_> {
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }
    pub fn owner(&self) -> TokenRef<'a> {
        self.owner
    }
    pub fn boundary(&self) -> Criteria {
        self.rules.boundary(&self.owner)
    }
    pub fn get(&self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        self.owner.scan(self.traversal)?.get_until(spec, self.boundary())
    }
    pub fn last(&self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        self.owner.scan(self.traversal)?.last_until(spec, self.boundary())
    }
    pub fn all(&self, spec: impl IntoCriteria) -> Result<Vec<TokenRef<'a>>> {
        self.owner.scan(self.traversal)?.all_until(spec, self.boundary())
    }
    /// Every property of the owner.
    pub fn tokens(&self) -> Result<Vec<TokenRef<'a>>> {
        self.owner.scan(self.traversal)?.until(self.boundary())
    }
    pub fn dict(&self, options: PropDictOptions) -> Result<PropDict<'a>> {
        let mut dict = PropDict::default();
        for prop in self.tokens()? {
            let name = options.name_keys.then(|| prop.name().to_string());
            let full = options.full_keys.then(|| prop.signature());
            for key in [name, full].into_iter().flatten() {
                match dict.entry(key) {
                    Entry::Vacant(e) => {
                        e.insert(if options.always_list {
                            PropValue::Many(vec![prop])
                        } else {
                            PropValue::One(prop)
                        });
                    }
                    Entry::Occupied(mut e) => {
                        if !e.get().contains(&prop) {
                            e.get_mut().push(prop);
                        }
                    }
                }
            }
        }
        Ok(dict)
    }
}

// ------------- PropDict -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropDictOptions {
    /// Hold lone tokens in a list as well.
    pub always_list: bool,
    /// Key properties by their name, e.g. `TILE`.
    pub name_keys: bool,
    /// Key properties by their signature, e.g. `TILE:156`.
    pub full_keys: bool,
}
impl Default for PropDictOptions {
    fn default() -> Self {
        Self {
            always_list: true,
            name_keys: true,
            full_keys: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PropValue<'a> {
    One(TokenRef<'a>),
    Many(Vec<TokenRef<'a>>),
}

impl<'a> PropValue<'a> {
    pub fn tokens(&self) -> &[TokenRef<'a>] {
        match self {
            PropValue::One(token) => std::slice::from_ref(token),
            PropValue::Many(tokens) => tokens,
        }
    }
    pub fn first(&self) -> Option<TokenRef<'a>> {
        self.tokens().first().copied()
    }
    pub fn len(&self) -> usize {
        self.tokens().len()
    }
    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }
    // identity, not equality: look-alike properties stay distinct
    pub fn contains(&self, token: &TokenRef<'_>) -> bool {
        self.tokens().iter().any(|t| t.ptr_eq(token))
    }
    fn push(&mut self, token: TokenRef<'a>) {
        match self {
            PropValue::One(first) => *self = PropValue::Many(vec![*first, token]),
            PropValue::Many(tokens) => tokens.push(token),
        }
    }
}

pub type PropDict<'a> = HashMap<String, PropValue<'a>, KeyHasher>;

// ------------- TokenRef -------------
// Property queries using the standard scope rules.
impl<'a> TokenRef<'a> {
    pub fn props(self) -> Props<'a, 'static> {
        ScopeRules::standard().props(self)
    }
    pub fn get_prop(self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        self.props().get(spec)
    }
    pub fn last_prop(self, spec: impl IntoCriteria) -> Result<Option<TokenRef<'a>>> {
        self.props().last(spec)
    }
    pub fn all_props(self, spec: impl IntoCriteria) -> Result<Vec<TokenRef<'a>>> {
        self.props().all(spec)
    }
    pub fn prop_dict(self, options: PropDictOptions) -> Result<PropDict<'a>> {
        self.props().dict(options)
    }
}
