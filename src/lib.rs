//! Library for defining deterministic finite automata (DFAs) in a compact, line-oriented text
//! format and for tracing their runs on input words.
//!
//! A definition file consists of records of the form `<kind>:<automaton>:<payload>`, one per
//! line. Each record contributes one component to the automaton it names: its states (kind `1`),
//! its alphabet (kind `2`), the initial state (kind `3`), the accepting states (kind `4`) or a
//! list of transitions (kind `5`). Records for different automata may be freely interleaved,
//! the [`loader`] collects them by name into a [`Registry`] of [`AutomatonDefinition`]s.
//!
//! ```
//! use dfasim::prelude::*;
//!
//! let registry = load_definitions(
//!     "1:AF04:q0,q1,q2
//!      2:AF04:a,b
//!      3:AF04:q0
//!      4:AF04:q1
//!      5:AF04:q0,a,q1;q0,b,q2;q1,a,q1;q1,b,q2;q2,a,q1;q2,b,q0",
//! );
//! let run = registry.test_word("AF04", "aa").unwrap();
//! assert!(run.accepted());
//! assert_eq!(run.trace(), ["q0", "q1", "q1"]);
//! ```
//!
//! Loading never fails because of individual malformed lines, these are skipped and reported
//! through a [`loader::LoadReport`]. Only an unreadable source yields a [`loader::LoadError`].
//! Running a word is gated by [`Registry::test_word`] (or [`AutomatonDefinition::try_recognize`]),
//! which refuses to simulate incomplete automata or words containing undeclared symbols. The raw
//! [`AutomatonDefinition::recognize`] performs no such checks and reports a missing transition
//! as part of its [`Recognition`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfasim::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{
            Alphabet, AutomatonDefinition, Description, Outcome, Recognition, Step, UsageError,
        },
        dot::Dottable,
        loader::{
            load_definitions, load_file, load_reader, load_str, LoadError, LoadReport, Loader,
            Record, RecordKind, SkipReason, SkippedLine,
        },
        math,
        registry::Registry,
        Show,
    };
}

/// Contains the collection types used throughout the crate along with small helpers
/// that do not fit anywhere else.
pub mod math;

/// Defines a single automaton, the way it is assembled from records and how it runs on words.
pub mod automaton;
pub use automaton::{AutomatonDefinition, Recognition};

/// Parses definition files into a [`Registry`].
pub mod loader;

/// Holds all automata of the current session.
pub mod registry;
pub use registry::Registry;

/// Export of automata into the graphviz DOT format.
pub mod dot;

/// Generation of random automata and words. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, symbols and collections thereof.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(Show::show).join(", "))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for math::Set<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(Show::show).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The first automaton of the bundled example file, see [`crate::loader::EXAMPLE_DEFINITIONS`].
    pub fn af04() -> AutomatonDefinition {
        let mut aut = AutomatonDefinition::new("AF04");
        aut.add_states("q0,q1,q2");
        aut.add_alphabet("a,b");
        aut.set_initial_state("q0");
        aut.add_final_states("q1");
        aut.add_transitions("q0,a,q1;q0,b,q2;q1,a,q1;q1,b,q2;q2,a,q1;q2,b,q0");
        aut
    }

    #[test]
    fn show_collections() {
        assert_eq!(vec!["q0", "q1"].show(), "{q0, q1}");
        assert_eq!(Vec::<String>::new().show(), "{}");
        assert_eq!(None::<String>.show(), "-");
        assert_eq!(af04().final_states().show(), "{q1}");
    }
}
