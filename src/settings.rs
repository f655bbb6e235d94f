use std::collections::HashMap;
use std::path::Path;

// used to layer settings files with environment overrides
use config::{Config, Environment, File, FileFormat, Source};
use serde::Deserialize;
use tracing::info;

// our own stuff that we need
use crate::criteria::Criteria;
use crate::error::{QueryError, Result};
use crate::object::ObjectResolver;
use crate::query::{Filter, Query};
use crate::scope::ScopeRules;
use crate::token::KeyHasher;

const ENV_PREFIX: &str = "RAWQUERY";
const LIST_KEYS: &[&str] = &["scope.categories"];

// ------------- FilterSpec -------------
/// A filter as written in a settings file, e.g.
///
/// ```toml
/// [[queries.tiles]]
/// label = "tile"
/// name_pattern = "TILE"
/// limit = 1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub label: Option<String>,
    /// `NAME:ARG` shorthand, an alternative to `name` and `args`.
    pub pretty: Option<String>,
    #[serde(flatten)]
    pub criteria: Criteria,
    pub limit: usize,
    pub limit_terminates: bool,
}

impl FilterSpec {
    pub fn build<'a>(&self) -> Result<Filter<'a>> {
        let mut criteria = self.criteria.clone();
        if let Some(pretty) = &self.pretty {
            if criteria.name.is_some() || criteria.args.is_some() {
                return Err(QueryError::Ambiguous(format!(
                    "shorthand '{}' given together with a name or argument list",
                    pretty
                )));
            }
            let parsed = Criteria::parse(pretty)?;
            criteria.name = parsed.name;
            criteria.args = parsed.args;
        }
        let mut filter = Filter::new(criteria)?.with_limit(self.limit);
        if self.limit_terminates {
            filter = filter.terminating();
        }
        if let Some(label) = &self.label {
            filter = filter.with_label(label);
        }
        Ok(filter)
    }
}

// ------------- Settings -------------
/// Everything that adapts the engine to a particular token dialect. The
/// defaults describe the dialect the engine was written for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scope: ScopeRules,
    pub objects: ObjectResolver,
    /// Named filter sets, runnable through [`Settings::query`].
    pub queries: HashMap<String, Vec<FilterSpec>, KeyHasher>,
}

impl Settings {
    /// Reads settings from TOML text, with `RAWQUERY__` environment
    /// variables taking precedence.
    pub fn from_toml(text: &str) -> Result<Self> {
        Self::layered(File::from_str(text, FileFormat::Toml), "inline")
    }
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::layered(File::from(path), &path.display().to_string())
    }
    fn layered<S>(source: S, origin: &str) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(source)
            .add_source(environment())
            .build()?;
        let settings: Settings = config.try_deserialize()?;
        info!(
            origin,
            queries = settings.queries.len(),
            rules = settings.objects.rules().len(),
            "settings loaded"
        );
        Ok(settings)
    }
    /// Builds a fresh query from a named filter set.
    pub fn query<'a>(&self, name: &str) -> Result<Option<Query<'a>>> {
        let Some(specs) = self.queries.get(name) else {
            return Ok(None);
        };
        let mut query = Query::new();
        for spec in specs {
            query.push(spec.build()?);
        }
        Ok(Some(query))
    }
}

// list values are comma separated, e.g. RAWQUERY__SCOPE__CATEGORIES=WORD,SYMBOL
fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}
