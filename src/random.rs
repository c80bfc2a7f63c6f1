use itertools::Itertools;
use tracing::debug;

use crate::{automaton::AutomatonDefinition, loader::RecordKind};

/// Names the symbols of a randomly generated alphabet, these are `a`, `b`, ... and `z`
/// followed by `A` to `Z`.
const SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a random complete automaton called `name` with states `q0` to `q{states - 1}`
/// over `symbols` single-character symbols. Every state has a transition on every symbol to a
/// uniformly drawn target, `q0` is initial and each state is accepting with probability one
/// half. At least one state is always accepting, so the result is complete in the sense of
/// [`AutomatonDefinition::is_complete`].
///
/// `states` and `symbols` are clamped to at least one, `symbols` to at most 52.
pub fn generate_random_definition(name: &str, states: usize, symbols: usize) -> String {
    let states = states.max(1);
    let symbols = symbols.clamp(1, SYMBOLS.len());
    let labels = (0..states).map(|i| format!("q{i}")).collect_vec();
    let alphabet = SYMBOLS.chars().take(symbols).collect_vec();

    let mut accepting = labels
        .iter()
        .filter(|_| fastrand::bool())
        .cloned()
        .collect_vec();
    if accepting.is_empty() {
        accepting.push(labels[fastrand::usize(..states)].clone());
    }

    let transitions = labels
        .iter()
        .cartesian_product(alphabet.iter())
        .map(|(from, symbol)| format!("{from},{symbol},{}", labels[fastrand::usize(..states)]))
        .join(";");

    debug!("generated random automaton {name} with {states} states over {symbols} symbols");
    [
        (RecordKind::States, labels.join(",")),
        (RecordKind::Alphabet, alphabet.iter().join(",")),
        (RecordKind::InitialState, labels[0].clone()),
        (RecordKind::FinalStates, accepting.join(",")),
        (RecordKind::Transitions, transitions),
    ]
    .into_iter()
    .map(|(kind, payload)| format!("{kind}:{name}:{payload}"))
    .join("\n")
}

/// Draws a random word of the given length over the declared symbols of `aut`. Returns `None`
/// if the alphabet is empty and `length` is positive.
pub fn random_word(aut: &AutomatonDefinition, length: usize) -> Option<String> {
    let symbols = aut.alphabet().iter().collect_vec();
    if symbols.is_empty() {
        return (length == 0).then(String::new);
    }
    Some(
        (0..length)
            .map(|_| symbols[fastrand::usize(..symbols.len())])
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_str;

    #[test_log::test]
    fn random_definitions_are_complete() {
        for (states, symbols) in [(1, 1), (5, 2), (20, 4), (0, 100)] {
            let text = generate_random_definition("R", states, symbols);
            let report = load_str(&text);
            assert!(report.is_clean());

            let aut = report.registry.get("R").unwrap();
            assert!(aut.is_complete());
            assert_eq!(
                aut.transition_count(),
                aut.states().len() * aut.alphabet().len()
            );
            assert!(aut.undeclared_states().is_empty());

            // total transition function, so no run ever gets stuck
            for length in 0..10 {
                let word = random_word(aut, length).unwrap();
                let run = aut.try_recognize(&word).unwrap();
                assert_eq!(run.trace().len(), length + 1);
                assert!(run.final_state().is_some());
            }
        }
    }

    #[test]
    fn random_word_over_empty_alphabet() {
        let aut = AutomatonDefinition::new("E");
        assert_eq!(random_word(&aut, 0), Some(String::new()));
        assert_eq!(random_word(&aut, 3), None);
    }
}
