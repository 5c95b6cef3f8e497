//! Symbol registry: rule name to non-terminal definition.
//!
//! One registry belongs to one grammar-construction session. It owns every
//! non-terminal built through it (named and anonymous), resolves [`Forward`]
//! placeholders as their rules are defined, and enforces that a name is
//! defined once.
//!
//! # Thread Safety
//! Registration takes a single `Mutex`; inserts are O(1) and happen while a
//! grammar is being built, so contention is negligible.

use crate::{Forward, GrammarError, NonTerminal, SymbolKey};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A registry slot.
#[derive(Debug)]
enum Symbol {
    /// Referenced through [`Registry::declare`], not defined yet.
    Declared(Arc<Forward>),
    Defined(Arc<NonTerminal>),
}

#[derive(Debug, Default)]
pub struct Registry {
    symbols: Mutex<FxHashMap<SymbolKey, Symbol>>,
    next_anonymous: AtomicU32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key no other node of this registry uses.
    pub fn next_anonymous(&self) -> SymbolKey {
        // Relaxed: uniqueness only needs atomicity, not ordering.
        SymbolKey::Anonymous(self.next_anonymous.fetch_add(1, Ordering::Relaxed))
    }

    /// Take ownership of `rule` under its key and hand it back shared.
    ///
    /// A pending declaration of the same name is resolved to `rule`.
    pub fn register(&self, rule: NonTerminal) -> Result<Arc<NonTerminal>, GrammarError> {
        let rule = Arc::new(rule);
        let mut symbols = self.symbols.lock();
        match symbols.entry(rule.key().clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Symbol::Defined(Arc::clone(&rule)));
            }
            Entry::Occupied(mut slot) => {
                let Symbol::Declared(forward) = slot.get() else {
                    return Err(GrammarError::DuplicateSymbol {
                        name: Arc::clone(rule.name()),
                    });
                };
                forward.resolve(&rule);
                tracing::debug!(rule = %rule.key(), "resolved forward declaration");
                slot.insert(Symbol::Defined(Arc::clone(&rule)));
            }
        }
        tracing::trace!(
            rule = %rule.key(),
            kind = %rule.combinator().kind(),
            "registered rule"
        );
        Ok(rule)
    }

    /// A placeholder for the rule named `name`.
    ///
    /// Declaring a name twice returns the same placeholder. Declaring a name
    /// that is already defined returns a placeholder resolved to it.
    pub fn declare(&self, name: &str) -> Result<Arc<Forward>, GrammarError> {
        if name.is_empty() {
            return Err(GrammarError::invalid(name, "rule name must not be empty"));
        }
        let key = SymbolKey::Named(Arc::from(name));
        let mut symbols = self.symbols.lock();
        let forward = match symbols.entry(key) {
            Entry::Vacant(slot) => {
                let forward = Arc::new(Forward::new(name));
                slot.insert(Symbol::Declared(Arc::clone(&forward)));
                forward
            }
            Entry::Occupied(slot) => match slot.get() {
                Symbol::Declared(forward) => Arc::clone(forward),
                Symbol::Defined(rule) => {
                    let forward = Arc::new(Forward::new(name));
                    forward.resolve(rule);
                    forward
                }
            },
        };
        tracing::debug!(rule = name, "declared rule");
        Ok(forward)
    }

    /// The rule defined under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<NonTerminal>> {
        let key = SymbolKey::Named(Arc::from(name));
        match self.symbols.lock().get(&key)? {
            Symbol::Defined(rule) => Some(Arc::clone(rule)),
            Symbol::Declared(_) => None,
        }
    }

    /// Names declared but not yet defined, sorted.
    pub fn unresolved(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self
            .symbols
            .lock()
            .values()
            .filter_map(|symbol| match symbol {
                Symbol::Declared(forward) => Some(Arc::clone(forward.name())),
                Symbol::Defined(_) => None,
            })
            .collect();
        names.sort();
        names
    }

    /// Names of all defined, non-anonymous rules, sorted.
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self
            .symbols
            .lock()
            .iter()
            .filter_map(|(key, symbol)| match (key, symbol) {
                (SymbolKey::Named(name), Symbol::Defined(_)) => Some(Arc::clone(name)),
                _ => None,
            })
            .collect();
        names.sort();
        names
    }

    /// Number of slots, anonymous and declared ones included.
    pub fn len(&self) -> usize {
        self.symbols.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
