// the "standard" regular expression package, used for name and argument patterns
use regex::Regex;

// criteria can be declared in settings files
use serde::Deserialize;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// our own stuff that we need
use crate::error::{QueryError, Result};
use crate::token::Token;

/// Splits the `NAME:ARG1:ARG2` shorthand (optionally enclosed in brackets)
/// into a name and its arguments.
pub fn split_pretty(pretty: &str) -> Result<(String, Vec<String>)> {
    let trimmed = pretty.trim();
    let inner = match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => return Err(QueryError::parse("unbalanced brackets", pretty)),
    };
    let mut parts = inner.split(':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(QueryError::parse("missing token name", pretty));
    }
    Ok((name.to_string(), parts.map(String::from).collect()))
}

// ------------- Custom -------------
// A caller supplied matcher, combined with the other criteria using AND.
#[derive(Clone)]
pub struct Custom(Arc<dyn Fn(&Token) -> bool + Send + Sync>);

impl Custom {
    pub fn new(f: impl Fn(&Token) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}
impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Custom(..)")
    }
}

// ------------- ArgTest -------------
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgTest {
    pub position: usize,
    pub exact: Option<String>,
    pub pattern: Option<String>,
    pub one_of: Option<Vec<String>>,
}

// ------------- Criteria -------------
/// What a token must look like to match. Every criterion that is set must
/// hold. Patterns match from the start of the name or argument.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub(crate) name: Option<String>,
    pub(crate) name_pattern: Option<String>,
    pub(crate) name_in: Option<Vec<String>>,
    // the complete argument list
    pub(crate) args: Option<Vec<String>>,
    pub(crate) arg_tests: Vec<ArgTest>,
    pub(crate) args_count: Option<usize>,
    #[serde(skip)]
    pub(crate) custom: Option<Custom>,
}

impl Criteria {
    /// Criteria without any constraint match every token.
    pub fn new() -> Self {
        Self::default()
    }
    /// Parses the shorthand. `NAME` constrains only the name, while
    /// `NAME:A:B` also requires the argument list to be exactly `[A, B]`.
    pub fn parse(pretty: &str) -> Result<Self> {
        let (name, args) = split_pretty(pretty)?;
        Ok(Self {
            name: Some(name),
            args: (!args.is_empty()).then_some(args),
            ..Self::default()
        })
    }
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }
    pub fn name_in<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_in = Some(names.into_iter().map(Into::into).collect());
        self
    }
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }
    pub fn arg(mut self, position: usize, exact: impl Into<String>) -> Self {
        self.arg_test(position).exact = Some(exact.into());
        self
    }
    pub fn arg_pattern(mut self, position: usize, pattern: impl Into<String>) -> Self {
        self.arg_test(position).pattern = Some(pattern.into());
        self
    }
    pub fn arg_in<I, S>(mut self, position: usize, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arg_test(position).one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }
    pub fn args_count(mut self, count: usize) -> Self {
        self.args_count = Some(count);
        self
    }
    pub fn matching(mut self, f: impl Fn(&Token) -> bool + Send + Sync + 'static) -> Self {
        self.custom = Some(Custom::new(f));
        self
    }
    fn arg_test(&mut self, position: usize) -> &mut ArgTest {
        let found = self.arg_tests.iter().position(|t| t.position == position);
        let at = match found {
            Some(at) => at,
            None => {
                self.arg_tests.push(ArgTest {
                    position,
                    ..ArgTest::default()
                });
                self.arg_tests.len() - 1
            }
        };
        &mut self.arg_tests[at]
    }
    /// Validates the criteria and compiles its patterns.
    pub fn compile(&self) -> Result<Matcher> {
        if self.name_pattern.is_some() && self.name_in.is_some() {
            return Err(QueryError::Ambiguous(
                "both a pattern and a set of names were given for the name".to_string(),
            ));
        }
        let mut name = Vec::new();
        if let Some(exact) = &self.name {
            name.push(TextTest::Exact(exact.clone()));
        }
        if let Some(pattern) = &self.name_pattern {
            name.push(TextTest::Pattern(anchored(pattern)?));
        }
        if let Some(names) = &self.name_in {
            name.push(TextTest::OneOf(names.clone()));
        }
        let mut arg_tests = Vec::new();
        for test in &self.arg_tests {
            let position = test.position;
            let patterned = self
                .arg_tests
                .iter()
                .any(|t| t.position == position && t.pattern.is_some());
            let listed = self
                .arg_tests
                .iter()
                .any(|t| t.position == position && t.one_of.is_some());
            if patterned && listed {
                return Err(QueryError::Ambiguous(format!(
                    "both a pattern and a set of values were given for argument {}",
                    position
                )));
            }
            if let Some(exact) = &test.exact {
                arg_tests.push((position, TextTest::Exact(exact.clone())));
            }
            if let Some(pattern) = &test.pattern {
                arg_tests.push((position, TextTest::Pattern(anchored(pattern)?)));
            }
            if let Some(values) = &test.one_of {
                arg_tests.push((position, TextTest::OneOf(values.clone())));
            }
        }
        Ok(Matcher {
            name,
            args: self.args.clone(),
            arg_tests,
            args_count: self.args_count,
            custom: self.custom.clone(),
        })
    }
}
impl FromStr for Criteria {
    type Err = QueryError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})", pattern))?)
}

// ------------- IntoCriteria -------------
/// Anything a query builder accepts as a matching specification.
pub trait IntoCriteria {
    fn into_criteria(self) -> Result<Criteria>;
}
impl IntoCriteria for Criteria {
    fn into_criteria(self) -> Result<Criteria> {
        Ok(self)
    }
}
impl IntoCriteria for &Criteria {
    fn into_criteria(self) -> Result<Criteria> {
        Ok(self.clone())
    }
}
impl IntoCriteria for &str {
    fn into_criteria(self) -> Result<Criteria> {
        Criteria::parse(self)
    }
}
impl IntoCriteria for String {
    fn into_criteria(self) -> Result<Criteria> {
        Criteria::parse(&self)
    }
}
impl IntoCriteria for &String {
    fn into_criteria(self) -> Result<Criteria> {
        Criteria::parse(self)
    }
}

// ------------- Matcher -------------
#[derive(Debug, Clone)]
enum TextTest {
    Exact(String),
    Pattern(Regex),
    OneOf(Vec<String>),
}
impl TextTest {
    fn matches(&self, text: &str) -> bool {
        match self {
            TextTest::Exact(exact) => exact == text,
            TextTest::Pattern(regex) => regex.is_match(text),
            TextTest::OneOf(values) => values.iter().any(|v| v == text),
        }
    }
}

/// Compiled criteria, ready to be tested against tokens.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    name: Vec<TextTest>,
    args: Option<Vec<String>>,
    arg_tests: Vec<(usize, TextTest)>,
    args_count: Option<usize>,
    custom: Option<Custom>,
}

impl Matcher {
    pub fn any() -> Self {
        Self::default()
    }
    pub fn matches(&self, token: &Token) -> bool {
        if !self.name.iter().all(|t| t.matches(token.name())) {
            return false;
        }
        if self.args_count.is_some_and(|count| count != token.nargs()) {
            return false;
        }
        if self.args.as_ref().is_some_and(|args| args.as_slice() != token.args()) {
            return false;
        }
        let args_hold = self
            .arg_tests
            .iter()
            .all(|(position, test)| token.arg(*position).is_some_and(|arg| test.matches(arg)));
        args_hold && self.custom.as_ref().is_none_or(|custom| (custom.0)(token))
    }
}
