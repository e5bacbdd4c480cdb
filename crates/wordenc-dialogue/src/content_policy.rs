use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use anyhow::{bail, Context, Result};
use wordenc_cipher::filter_kana;

use crate::input_normalizer::remove_whitespace;

/// Substring deny-list applied to the filtered kana message. Terms must be
/// written in the same supported kana, or they could never match.
#[derive(Debug, Clone)]
pub struct ContentPolicy {
    terms: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl ContentPolicy {
    pub fn new(terms: &[String]) -> Result<Self> {
        let terms = terms
            .iter()
            .map(|term| remove_whitespace(term))
            .filter(|term| !term.is_empty())
            .collect::<Vec<_>>();
        if let Some(term) = terms.iter().find(|term| !is_matchable_term(term)) {
            bail!("denied term '{term}' contains characters outside the supported kana");
        }
        if terms.is_empty() {
            return Ok(Self {
                terms,
                matcher: None,
            });
        }
        let matcher = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&terms)
            .context("failed to build content policy matcher")?;
        Ok(Self {
            terms,
            matcher: Some(matcher),
        })
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn first_violation(&self, text: &str) -> Option<&str> {
        let matcher = self.matcher.as_ref()?;
        let found = matcher.find(text)?;
        self.terms
            .get(found.pattern().as_usize())
            .map(String::as_str)
    }

    pub fn is_denied(&self, text: &str) -> bool {
        self.first_violation(text).is_some()
    }
}

/// True when filtering leaves the term intact, so it can appear in a message.
pub(crate) fn is_matchable_term(term: &str) -> bool {
    filter_kana(term).dropped_characters == 0
}
