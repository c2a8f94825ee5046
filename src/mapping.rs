//! Token → character mappings.
//!
//! [`CodeCharMap`] is the inferred mapping built during a run. It only grows:
//! an assignment that contradicts an existing entry is reported as a
//! [`Conflict::Inconsistent`] and the newest evidence wins. [`FixedMap`] is
//! the user's override table; disagreement with it is reported as
//! [`Conflict::FixedMap`], and it always wins when text is rendered.

use crate::tokens::CodeToken;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// A contradiction detected while extending the inferred mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The token was already mapped to a different character
    Inconsistent {
        /// Token being assigned
        token: CodeToken,
        /// Character it was mapped to before
        previous: char,
        /// Character it is mapped to now
        incoming: char,
        /// Ground truth that produced the assignment
        evidence: String,
    },
    /// The inferred character disagrees with the user's fixed mapping
    FixedMap {
        /// Token being assigned
        token: CodeToken,
        /// Character(s) from the fixed map
        fixed: String,
        /// Inferred character
        inferred: char,
        /// Ground truth that produced the assignment
        evidence: String,
    },
}

impl Conflict {
    /// Token the conflict is about.
    pub fn token(&self) -> &CodeToken {
        match self {
            Conflict::Inconsistent { token, .. } | Conflict::FixedMap { token, .. } => token,
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::Inconsistent {
                token,
                previous,
                incoming,
                evidence,
            } => write!(
                f,
                "inconsistent mapping for {}: was '{}', now '{}' (from \"{}\")",
                token, previous, incoming, evidence
            ),
            Conflict::FixedMap {
                token,
                fixed,
                inferred,
                evidence,
            } => write!(
                f,
                "fixed map sets {} to '{}' but inferred '{}' (from \"{}\")",
                token, fixed, inferred, evidence
            ),
        }
    }
}

/// User-supplied token → character overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedMap {
    map: BTreeMap<CodeToken, String>,
}

impl FixedMap {
    /// Create an empty fixed map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from label → text pairs. Labels may be given bare (`17`) or in
    /// their rendered form (`[17]`).
    pub fn from_labels(pairs: &IndexMap<String, String>) -> Self {
        let map = pairs
            .iter()
            .map(|(label, text)| {
                // A bare " " is the literal space token in keep-punctuation mode
                let label = match label.trim() {
                    "" => label.as_str(),
                    trimmed => trimmed,
                };
                let bare = label
                    .strip_prefix('[')
                    .and_then(|l| l.strip_suffix(']'))
                    .unwrap_or(label);
                (CodeToken::new(bare), text.clone())
            })
            .collect();
        Self { map }
    }

    /// Set the override for one token.
    pub fn insert(&mut self, token: CodeToken, text: impl Into<String>) {
        self.map.insert(token, text.into());
    }

    /// Override for `token`, if any.
    pub fn get(&self, token: &CodeToken) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    /// Whether `token` has an override.
    pub fn contains(&self, token: &CodeToken) -> bool {
        self.map.contains_key(token)
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Overrides in natural token order.
    pub fn iter(&self) -> impl Iterator<Item = (&CodeToken, &str)> {
        self.map.iter().map(|(t, s)| (t, s.as_str()))
    }
}

/// The inferred token → character mapping of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeCharMap {
    map: BTreeMap<CodeToken, char>,
}

impl CodeCharMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert without conflict checks.
    pub fn seed(&mut self, token: CodeToken, ch: char) {
        self.map.insert(token, ch);
    }

    /// Map `token` to `ch`, recording any conflict into `conflicts`.
    ///
    /// The assignment always happens (last writer wins). Returns `true` when
    /// the mapping changed.
    pub fn assign(
        &mut self,
        token: &CodeToken,
        ch: char,
        fixed: &FixedMap,
        evidence: &str,
        conflicts: &mut Vec<Conflict>,
    ) -> bool {
        if let Some(&previous) = self.map.get(token) {
            if previous != ch {
                let conflict = Conflict::Inconsistent {
                    token: token.clone(),
                    previous,
                    incoming: ch,
                    evidence: evidence.to_string(),
                };
                log::warn!("{}", conflict);
                conflicts.push(conflict);
            }
        }

        if let Some(fixed_text) = fixed.get(token) {
            if fixed_text.chars().ne(std::iter::once(ch)) {
                let conflict = Conflict::FixedMap {
                    token: token.clone(),
                    fixed: fixed_text.to_string(),
                    inferred: ch,
                    evidence: evidence.to_string(),
                };
                log::warn!("{}", conflict);
                conflicts.push(conflict);
            }
        }

        log::debug!("new {} -> {}", token, ch);
        self.map.insert(token.clone(), ch) != Some(ch)
    }

    /// Character of `token`, if inferred.
    pub fn get(&self, token: &CodeToken) -> Option<char> {
        self.map.get(token).copied()
    }

    /// Whether `token` is mapped.
    pub fn contains(&self, token: &CodeToken) -> bool {
        self.map.contains_key(token)
    }

    /// Number of mapped tokens.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Mapped tokens in natural token order.
    pub fn iter(&self) -> impl Iterator<Item = (&CodeToken, char)> {
        self.map.iter().map(|(t, c)| (t, *c))
    }
}

impl fmt::Display for CodeCharMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(t, c)| format!("{}->{}", t, c)).collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}
