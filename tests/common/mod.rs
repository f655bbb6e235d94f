#![allow(dead_code)]

use rawquery::prelude::*;
use tracing_subscriber::EnvFilter;

/// Logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn sequence(name: &str, tokens: &[&str]) -> TokenSequence {
    TokenSequence::from_tokens(
        name,
        tokens.iter().map(|t| t.parse::<Token>().expect("valid token")),
    )
}

/// `[A][B:1][B:2][A][C]`
pub fn scenario() -> TokenSequence {
    sequence("scenario", &["A", "B:1", "B:2", "A", "C"])
}

pub fn raws() -> Dataset {
    let sources: Vec<TokenSequence> =
        serde_json::from_str(include_str!("../fixtures/raws.json")).expect("fixture parses");
    sources.into_iter().collect()
}

pub fn indexes(tokens: &[TokenRef<'_>]) -> Vec<usize> {
    tokens.iter().map(|t| t.index()).collect()
}
