use itertools::Itertools;
use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{
    math::{self, Map, Set},
    Show,
};

mod alphabet;
pub use alphabet::{Alphabet, Symbols, WordSymbol};

mod recognition;
pub use recognition::{Outcome, Recognition, Step};

/// Errors that prevent a word from being run on an automaton at all. They are reported
/// before any simulation takes place.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum UsageError {
    /// No automaton with the given name is known.
    #[error("no automaton named `{0}` has been loaded")]
    UnknownAutomaton(String),
    /// The automaton lacks one of its components, see [`AutomatonDefinition::is_complete`].
    #[error("automaton `{0}` is incomplete")]
    Incomplete(String),
    /// The word contains a symbol that was never declared in the alphabet.
    #[error("symbol '{symbol}' at position {position} does not belong to the alphabet {alphabet}")]
    SymbolOutsideAlphabet {
        /// The offending symbol.
        symbol: String,
        /// Its character offset in the word.
        position: usize,
        /// The declared alphabet, rendered as a set.
        alphabet: String,
    },
}

/// A deterministic finite automaton as it is assembled from the records of a definition file.
///
/// All components start out empty and grow record by record. States, symbols and accepting
/// states are sets, adding an element twice has no effect. The initial state is overwritten by
/// every call to [`AutomatonDefinition::set_initial_state`], and a transition replaces any
/// earlier transition with the same origin and symbol, which makes the automaton deterministic
/// by construction.
///
/// No cross-validation takes place: the initial state, the accepting states and the endpoints of
/// transitions need not be declared as states. Such states are listed by
/// [`Description::undeclared_states`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonDefinition {
    name: String,
    states: Set<String>,
    alphabet: Alphabet,
    initial: Option<String>,
    final_states: Set<String>,
    // origin -> symbol -> target
    transitions: Map<String, Map<String, String>>,
}

/// A read-only summary of an [`AutomatonDefinition`], see [`AutomatonDefinition::describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// Name of the automaton.
    pub name: String,
    /// Declared states in declaration order.
    pub states: Vec<String>,
    /// Declared symbols in declaration order.
    pub alphabet: Vec<String>,
    /// The initial state, if one has been set.
    pub initial_state: Option<String>,
    /// Accepting states in declaration order.
    pub final_states: Vec<String>,
    /// Number of distinct (state, symbol) pairs with a transition.
    pub transition_count: usize,
    /// See [`AutomatonDefinition::is_complete`].
    pub is_complete: bool,
    /// States that are used as initial state, accepting state or endpoint of a transition
    /// without being declared.
    pub undeclared_states: Vec<String>,
}

impl AutomatonDefinition {
    /// Creates an empty automaton with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            states: Set::default(),
            alphabet: Alphabet::default(),
            initial: None,
            final_states: Set::default(),
            transitions: Map::default(),
        }
    }

    /// The name of the automaton.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared states.
    pub fn states(&self) -> &Set<String> {
        &self.states
    }

    /// The declared alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The initial state, if one has been set.
    pub fn initial_state(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// The accepting states.
    pub fn final_states(&self) -> &Set<String> {
        &self.final_states
    }

    /// Returns the target of the transition from `from` on `symbol`, if there is one.
    pub fn transition(&self, from: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .get(from)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .map(String::as_str)
    }

    /// Iterates over all transitions as `(from, symbol, to)` triples, in the order in which
    /// their (state, symbol) pairs were first defined.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.transitions.iter().flat_map(|(from, by_symbol)| {
            by_symbol
                .iter()
                .map(move |(symbol, to)| (from.as_str(), symbol.as_str(), to.as_str()))
        })
    }

    /// The number of (state, symbol) pairs for which a transition exists.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|by_symbol| by_symbol.len()).sum()
    }

    /// Adds the comma separated states in `list`. Entries are trimmed and duplicates are
    /// ignored. Empty entries are kept as the empty label.
    pub fn add_states(&mut self, list: &str) {
        self.states.extend(labels(&self.name, list));
    }

    /// Adds the comma separated symbols in `list` to the alphabet, with the same treatment of
    /// entries as [`AutomatonDefinition::add_states`].
    pub fn add_alphabet(&mut self, list: &str) {
        for symbol in labels(&self.name, list) {
            self.alphabet.insert(&symbol);
        }
        if self.alphabet.has_multi_character_symbols() {
            trace!(
                "alphabet of {} contains multi-character symbols, words are split by longest match",
                self.name
            );
        }
    }

    /// Sets the initial state to the trimmed `state`, replacing any previous one. An empty
    /// `state` is stored as the empty label.
    pub fn set_initial_state(&mut self, state: &str) {
        let state = state.trim();
        if state.is_empty() {
            warn!("{}: initial state is the empty label", self.name);
        }
        self.initial = Some(state.to_string());
    }

    /// Adds the comma separated accepting states in `list`, with the same treatment of entries
    /// as [`AutomatonDefinition::add_states`].
    pub fn add_final_states(&mut self, list: &str) {
        self.final_states.extend(labels(&self.name, list));
    }

    /// Adds transitions given as `;` separated triples `from,symbol,to`. Blank triples are
    /// ignored and triples that do not consist of exactly three fields are skipped, empty
    /// fields are kept as the empty label. A transition replaces any
    /// existing one with the same `from` and `symbol`. Returns the number of triples that were
    /// skipped.
    pub fn add_transitions(&mut self, triples: &str) -> usize {
        let mut skipped = 0;
        for triple in triples.split(';') {
            if triple.trim().is_empty() {
                continue;
            }
            let fields = math::split_trimmed(triple, ',').collect_vec();
            match fields.as_slice() {
                [from, symbol, to] => {
                    if from.is_empty() || symbol.is_empty() || to.is_empty() {
                        warn!(
                            "{}: transition \"{}\" has an empty field",
                            self.name,
                            triple.trim()
                        );
                    }
                    if let Some(previous) = self
                        .transitions
                        .entry(from.to_string())
                        .or_default()
                        .insert(symbol.to_string(), to.to_string())
                    {
                        trace!(
                            "{}: transition {from},{symbol} now leads to {to} instead of {previous}",
                            self.name
                        );
                    }
                }
                _ => {
                    warn!(
                        "{}: skipping transition \"{}\", expected three fields but found {}",
                        self.name,
                        triple.trim(),
                        fields.len()
                    );
                    skipped += 1;
                }
            }
        }
        skipped
    }

    /// Returns `true` if states, alphabet, accepting states and transitions are all non-empty
    /// and an initial state is set. This does not check that every state has a transition on
    /// every symbol.
    pub fn is_complete(&self) -> bool {
        !self.states.is_empty()
            && !self.alphabet.is_empty()
            && self.initial.is_some()
            && !self.final_states.is_empty()
            && !self.transitions.is_empty()
    }

    /// Runs `word` from the initial state and records the visited states.
    ///
    /// The word is split into symbols by [`Alphabet::symbols_of`]. For every symbol the unique
    /// transition from the current state is taken. If there is none, the run stops immediately
    /// and the word is rejected with [`Outcome::MissingTransition`]. Otherwise the word is
    /// accepted iff the state reached after the last symbol is accepting. The empty word is
    /// accepted iff the initial state is accepting.
    ///
    /// No checks are made beforehand, use [`AutomatonDefinition::try_recognize`] for that.
    pub fn recognize(&self, word: &str) -> Recognition {
        let Some(initial) = &self.initial else {
            return Recognition::new(false, vec![], vec![], Outcome::MissingInitialState);
        };

        let mut current = initial.as_str();
        let mut visited = vec![current.to_string()];
        let mut consumed = vec![];

        for symbol in self.alphabet.symbols_of(word) {
            match self.transition(current, symbol.text) {
                Some(target) => {
                    trace!("{}: {current} --{}--> {target}", self.name, symbol.text);
                    current = target;
                    visited.push(target.to_string());
                    consumed.push(symbol.text.to_string());
                }
                None => {
                    trace!(
                        "{}: no transition from {current} on {}",
                        self.name,
                        symbol.text
                    );
                    return Recognition::new(
                        false,
                        visited,
                        consumed,
                        Outcome::MissingTransition {
                            state: current.to_string(),
                            symbol: symbol.text.to_string(),
                        },
                    );
                }
            }
        }

        Recognition::new(
            self.final_states.contains(current),
            visited,
            consumed,
            Outcome::Reached(current.to_string()),
        )
    }

    /// Checks that the automaton is complete and that `word` consists only of declared symbols.
    pub fn check_word(&self, word: &str) -> Result<(), UsageError> {
        if !self.is_complete() {
            return Err(UsageError::Incomplete(self.name.clone()));
        }
        if let Some(symbol) = self.alphabet.first_undeclared(word) {
            return Err(UsageError::SymbolOutsideAlphabet {
                symbol: symbol.text.to_string(),
                position: symbol.position,
                alphabet: self.alphabet.show(),
            });
        }
        Ok(())
    }

    /// Runs `word` after verifying it with [`AutomatonDefinition::check_word`].
    pub fn try_recognize(&self, word: &str) -> Result<Recognition, UsageError> {
        self.check_word(word)?;
        Ok(self.recognize(word))
    }

    /// Returns the states that are referenced somewhere without being declared, in order of
    /// their first reference.
    pub fn undeclared_states(&self) -> Vec<&str> {
        let mut seen: Set<&str> = Set::default();
        let referenced = self
            .initial
            .iter()
            .map(String::as_str)
            .chain(self.final_states.iter().map(String::as_str))
            .chain(
                self.transitions()
                    .flat_map(|(from, _, to)| [from, to].into_iter()),
            );
        for state in referenced {
            if !self.states.contains(state) {
                seen.insert(state);
            }
        }
        seen.into_iter().collect()
    }

    /// Returns a summary of the automaton for display purposes.
    pub fn describe(&self) -> Description {
        Description {
            name: self.name.clone(),
            states: self.states.iter().cloned().collect(),
            alphabet: self.alphabet.iter().map(str::to_string).collect(),
            initial_state: self.initial.clone(),
            final_states: self.final_states.iter().cloned().collect(),
            transition_count: self.transition_count(),
            is_complete: self.is_complete(),
            undeclared_states: self
                .undeclared_states()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns a string representation of the transition table. Rows are the declared states
    /// followed by undeclared origins of transitions, columns are the symbols. The initial
    /// state is marked with `>` and accepting states with `*`, missing transitions show as `-`.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.iter().map(str::to_string)),
        );

        let rows = self
            .states
            .iter()
            .chain(
                self.transitions
                    .keys()
                    .filter(|from| !self.states.contains(from.as_str())),
            )
            .map(String::as_str);
        for state in rows {
            let mut label = String::new();
            if self.initial_state() == Some(state) {
                label.push('>');
            }
            if self.final_states.contains(state) {
                label.push('*');
            }
            label.push_str(state);

            let mut row = vec![label];
            for symbol in self.alphabet.iter() {
                row.push(self.transition(state, symbol).unwrap_or("-").to_string());
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Show for AutomatonDefinition {
    fn show(&self) -> String {
        let marker = if self.is_complete() {
            "complete".green().to_string()
        } else {
            "incomplete".yellow().to_string()
        };
        format!(
            "{} ({marker})\nstates: {}\nalphabet: {}\ninitial state: {}\nfinal states: {}\ntransitions: {}",
            self.name.bold(),
            self.states.show(),
            self.alphabet.show(),
            self.initial.show(),
            self.final_states.show(),
            self.transition_count()
        )
    }
}

fn labels(name: &str, list: &str) -> Vec<String> {
    let labels = math::split_trimmed(list, ',')
        .map(str::to_string)
        .collect_vec();
    if labels.iter().any(String::is_empty) {
        warn!("{name}: \"{}\" contains an empty entry", list.trim());
    }
    labels
}
