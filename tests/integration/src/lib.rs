//! End-to-end tests for the dynoexpr expression compiler.
//!
//! These exercise the public entry points (`dynoexpr_core::dynoexpr` and
//! `Dynoexpr`) over full request shapes, checking the compiled expression
//! strings against the placeholder maps they reference.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Collect every `#n...`/`:v...` placeholder token appearing in an
/// expression string.
#[must_use]
pub fn placeholder_tokens(expression: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in expression.split(|c: char| "() ,.".contains(c)) {
        if word.starts_with('#') || word.starts_with(':') {
            if !tokens.contains(&word.to_owned()) {
                tokens.push(word.to_owned());
            }
        }
    }
    tokens
}

#[cfg(test)]
mod test_properties;
#[cfg(test)]
mod test_requests;
#[cfg(test)]
mod test_single;
