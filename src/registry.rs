use std::path::Path;

use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::{debug, info};

use crate::{
    automaton::{AutomatonDefinition, Recognition, UsageError},
    loader::{self, LoadError, SkippedLine},
    math::Map,
    Show,
};

/// The automata known to a session, looked up by name. Iteration yields the automata in the
/// order in which their names first appeared in the definition file.
///
/// The registry is owned by the caller. Loading a new file replaces its contents entirely, see
/// [`Registry::reload_str`] and [`Registry::reload_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    automata: Map<String, AutomatonDefinition>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of automata.
    pub fn len(&self) -> usize {
        self.automata.len()
    }

    /// Returns `true` if no automaton is known.
    pub fn is_empty(&self) -> bool {
        self.automata.is_empty()
    }

    /// Returns the automaton with the given name.
    pub fn get(&self, name: &str) -> Option<&AutomatonDefinition> {
        self.automata.get(name)
    }

    /// Returns `true` if an automaton with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.automata.contains_key(name)
    }

    /// The names of all automata.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.automata.keys().map(String::as_str)
    }

    /// Iterates over all automata.
    pub fn iter(&self) -> impl Iterator<Item = &AutomatonDefinition> + '_ {
        self.automata.values()
    }

    /// Returns the automaton with the given name, creating an empty one if it does not exist yet.
    pub fn entry(&mut self, name: &str) -> &mut AutomatonDefinition {
        if !self.automata.contains_key(name) {
            debug!("creating automaton {name}");
        }
        self.automata
            .entry(name.to_string())
            .or_insert_with(|| AutomatonDefinition::new(name))
    }

    /// Inserts `aut` under its name, returning the automaton it replaces.
    pub fn insert(&mut self, aut: AutomatonDefinition) -> Option<AutomatonDefinition> {
        self.automata.insert(aut.name().to_string(), aut)
    }

    /// Replaces the contents with the automata defined in `text` and returns the skipped lines.
    pub fn reload_str(&mut self, text: &str) -> Vec<SkippedLine> {
        let report = loader::load_str(text);
        *self = report.registry;
        info!("loaded {} automata", self.len());
        report.skipped
    }

    /// Replaces the contents with the automata defined in the file at `path`. If the file
    /// cannot be read, the registry is left unchanged.
    pub fn reload_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<SkippedLine>, LoadError> {
        let report = loader::load_file(path)?;
        *self = report.registry;
        info!("loaded {} automata", self.len());
        Ok(report.skipped)
    }

    /// Runs `word` on the automaton called `name`. Fails without running if there is no such
    /// automaton, if it is incomplete or if `word` contains undeclared symbols.
    pub fn test_word(&self, name: &str, word: &str) -> Result<Recognition, UsageError> {
        self.get(name)
            .ok_or_else(|| UsageError::UnknownAutomaton(name.to_string()))?
            .try_recognize(word)
    }

    /// Returns a table with one row per automaton that summarizes its components.
    pub fn summary_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            [
                "Automaton",
                "States",
                "Alphabet",
                "Initial",
                "Final",
                "Transitions",
                "Complete",
            ]
            .map(String::from),
        );
        for aut in self.iter() {
            let description = aut.describe();
            let complete = if description.is_complete {
                "yes".green().to_string()
            } else {
                "no".yellow().to_string()
            };
            builder.push_record([
                description.name.bold().to_string(),
                description.states.show(),
                description.alphabet.show(),
                description.initial_state.show(),
                description.final_states.show(),
                description.transition_count.to_string(),
                complete,
            ]);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a AutomatonDefinition;
    type IntoIter = indexmap::map::Values<'a, String, AutomatonDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.automata.values()
    }
}

impl FromIterator<AutomatonDefinition> for Registry {
    fn from_iter<T: IntoIterator<Item = AutomatonDefinition>>(iter: T) -> Self {
        let mut registry = Registry::new();
        for aut in iter {
            registry.insert(aut);
        }
        registry
    }
}

impl Show for Registry {
    fn show(&self) -> String {
        format!("{{{}}}", self.names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{loader::EXAMPLE_DEFINITIONS, tests::af04};

    #[test_log::test]
    fn entry_creates_once() {
        let mut registry = Registry::new();
        registry.entry("A").add_states("q0");
        registry.entry("A").add_states("q1");
        registry.entry("B");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("A").unwrap().states().len(), 2);
        assert_eq!(registry.show(), "{A, B}");
    }

    #[test_log::test]
    fn gated_word_test() {
        let registry: Registry = [af04(), AutomatonDefinition::new("empty")]
            .into_iter()
            .collect();

        assert_eq!(
            registry.test_word("nope", "a"),
            Err(UsageError::UnknownAutomaton("nope".to_string()))
        );
        assert_eq!(
            registry.test_word("empty", ""),
            Err(UsageError::Incomplete("empty".to_string()))
        );
        assert!(matches!(
            registry.test_word("AF04", "c"),
            Err(UsageError::SymbolOutsideAlphabet { position: 0, .. })
        ));

        let run = registry.test_word("AF04", "ab").unwrap();
        assert!(!run.accepted());
        assert_eq!(run.trace(), ["q0", "q1", "q2"]);
        assert!(!registry.test_word("AF04", "").unwrap().accepted());
    }

    #[test_log::test]
    fn empty_final_state_passes_the_gate() {
        let registry =
            crate::loader::load_definitions("1:A:q0\n2:A:a\n3:A:q0\n4:A:\n5:A:q0,a,q0");
        let aut = registry.get("A").unwrap();
        assert_eq!(aut.final_states().iter().collect_vec(), vec![""]);

        let run = registry.test_word("A", "aa").unwrap();
        assert!(!run.accepted());
        assert_eq!(run.trace(), ["q0", "q0", "q0"]);
    }

    #[test_log::test]
    fn reload_replaces_everything() {
        let mut registry = Registry::new();
        let skipped = registry.reload_str(EXAMPLE_DEFINITIONS);
        assert!(skipped.is_empty());
        assert_eq!(registry.len(), 2);

        let skipped = registry.reload_str("1:C:x\nbroken\n");
        assert_eq!(skipped.len(), 1);
        assert_eq!(registry.names().collect_vec(), vec!["C"]);
    }

    #[test_log::test]
    fn failed_reload_keeps_previous_automata() {
        let mut registry = Registry::new();
        registry.reload_str(EXAMPLE_DEFINITIONS);

        let dir = tempfile::tempdir().unwrap();
        assert!(registry.reload_file(dir.path().join("missing")).is_err());
        assert_eq!(registry.len(), 2);

        let path = dir.path().join("defs.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "1:Z:z0").unwrap();
        registry.reload_file(&path).unwrap();
        assert_eq!(registry.names().collect_vec(), vec!["Z"]);
    }

    #[test_log::test]
    fn summary_lists_every_automaton() {
        let registry = crate::loader::load_definitions(EXAMPLE_DEFINITIONS);
        let table = registry.summary_table();
        assert!(table.contains("AF04"));
        assert!(table.contains("AF05"));
        assert!(table.contains("{p0, p1, p2, p3}"));
        assert_eq!((&registry).into_iter().count(), 2);
    }
}
