use std::fmt::Display;

/// Describes how a run of an [`AutomatonDefinition`](super::AutomatonDefinition) ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The whole word has been consumed and the run ended in the given state.
    Reached(String),
    /// The run got stuck: there is no transition from `state` on `symbol`. The run stops right
    /// there, the rest of the word is not read.
    MissingTransition {
        /// The state in which the run got stuck.
        state: String,
        /// The symbol for which no transition exists.
        symbol: String,
    },
    /// The automaton has no initial state, so there was nothing to start from.
    MissingInitialState,
}

/// The result of running a word on an automaton. It records whether the word is accepted,
/// the sequence of visited states (starting with the initial state) and how the run ended.
///
/// A word can be rejected in two distinct ways: either the run consumes the entire word and
/// ends in a state that is not accepting, or it gets stuck on a missing transition. Both have
/// `accepted() == false`, they are told apart by [`Recognition::outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    accepted: bool,
    trace: Vec<String>,
    symbols: Vec<String>,
    outcome: Outcome,
}

/// A single step of a run, i.e. a consumed symbol together with the state it led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    /// The symbol that was read.
    pub symbol: &'a str,
    /// The state that was reached by reading `symbol`.
    pub target: &'a str,
}

impl Recognition {
    pub(crate) fn new(
        accepted: bool,
        trace: Vec<String>,
        symbols: Vec<String>,
        outcome: Outcome,
    ) -> Self {
        debug_assert!(trace.is_empty() || trace.len() == symbols.len() + 1);
        Self {
            accepted,
            trace,
            symbols,
            outcome,
        }
    }

    /// Returns `true` if the word is accepted.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// The states visited by the run, in order and starting with the initial state. When the
    /// run got stuck, the last entry is the state without a suitable transition.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// The symbols that were successfully consumed, one for each transition taken.
    pub fn consumed(&self) -> &[String] {
        &self.symbols
    }

    /// How the run ended.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The state in which the run ended after consuming the whole word, `None` if the run got
    /// stuck or could not start.
    pub fn final_state(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Reached(state) => Some(state.as_str()),
            _ => None,
        }
    }

    /// Returns the state and symbol of the missing transition that stopped the run, if any.
    pub fn missing_transition(&self) -> Option<(&str, &str)> {
        match &self.outcome {
            Outcome::MissingTransition { state, symbol } => {
                Some((state.as_str(), symbol.as_str()))
            }
            _ => None,
        }
    }

    /// A short description of why the run failed, `None` if the run consumed the whole word.
    pub fn error(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Reached(_) => None,
            Outcome::MissingTransition { state, symbol } => Some(format!(
                "no transition from {state} with symbol '{symbol}'"
            )),
            Outcome::MissingInitialState => Some("no initial state has been set".to_string()),
        }
    }

    /// Iterates over the steps of the run, that is each consumed symbol with the state it led to.
    pub fn steps(&self) -> impl Iterator<Item = Step<'_>> + '_ {
        self.symbols
            .iter()
            .zip(self.trace.iter().skip(1))
            .map(|(symbol, target)| Step {
                symbol: symbol.as_str(),
                target: target.as_str(),
            })
    }

    /// Returns `true` if the run was on the empty word and did not get stuck.
    pub fn is_empty_word(&self) -> bool {
        self.symbols.is_empty() && matches!(self.outcome, Outcome::Reached(_))
    }
}

impl Display for Recognition {
    /// Writes the trace, one line for the start and one for every step.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(start) = self.trace.first() else {
            return write!(f, "no run");
        };
        if self.is_empty_word() {
            write!(f, "start (empty word): {start}")?;
        } else {
            write!(f, "start: {start}")?;
        }
        for step in self.steps() {
            write!(f, "\n'{}' -> {}", step.symbol, step.target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::af04;

    #[test]
    fn trace_rendering() {
        let aut = af04();
        assert_eq!(
            aut.recognize("ab").to_string(),
            "start: q0\n'a' -> q1\n'b' -> q2"
        );
        assert_eq!(aut.recognize("").to_string(), "start (empty word): q0");
        // a stuck run only lists the steps that were taken
        assert_eq!(aut.recognize("ac").to_string(), "start: q0\n'a' -> q1");
    }

    #[test]
    fn error_description() {
        let aut = af04();
        let stuck = aut.recognize("bc");
        assert_eq!(stuck.missing_transition(), Some(("q2", "c")));
        assert_eq!(
            stuck.error().as_deref(),
            Some("no transition from q2 with symbol 'c'")
        );
        assert_eq!(aut.recognize("aa").error(), None);
    }
}
