use itertools::Itertools;

use crate::automaton::AutomatonDefinition;

/// Quotes `name` so that it can be used as an identifier in DOT, regardless of the characters
/// it contains.
fn quote_dot_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Objects that can be exported into the graphviz DOT format.
pub trait Dottable {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String;
}

impl Dottable for AutomatonDefinition {
    /// Accepting states are drawn with a double circle, the initial state is marked by an
    /// incoming edge from an invisible node. Parallel transitions between the same pair of
    /// states are merged into one edge whose label lists all symbols.
    fn dot_representation(&self) -> String {
        let header = [
            format!("digraph {} {{", quote_dot_ident(self.name())),
            "rankdir=LR".to_string(),
            "init [label=\"\", shape=none, width=0, height=0]".to_string(),
        ];

        let states = self
            .states()
            .iter()
            .map(String::as_str)
            .chain(self.undeclared_states())
            .unique()
            .map(|q| {
                let shape = if self.final_states().contains(q) {
                    "doublecircle"
                } else {
                    "circle"
                };
                format!("{} [shape={shape}]", quote_dot_ident(q))
            })
            .collect_vec();

        let initial = self
            .initial_state()
            .map(|q| format!("init -> {}", quote_dot_ident(q)));

        let edges = self
            .transitions()
            .map(|(from, symbol, to)| ((from, to), symbol))
            .into_group_map_by(|(pair, _)| *pair);
        let transitions = self
            .transitions()
            .map(|(from, _, to)| (from, to))
            .unique()
            .map(|(from, to)| {
                let label = edges[&(from, to)].iter().map(|(_, sym)| *sym).join(", ");
                format!(
                    "{} -> {} [label=\"{}\"]",
                    quote_dot_ident(from),
                    quote_dot_ident(to),
                    label.replace('"', "\\\"")
                )
            });

        header
            .into_iter()
            .chain(states)
            .chain(initial)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::af04;

    #[test_log::test]
    fn dot_for_af04() {
        let dot = af04().dot_representation();
        assert!(dot.starts_with("digraph \"AF04\" {"));
        assert!(dot.contains("\"q1\" [shape=doublecircle]"));
        assert!(dot.contains("\"q0\" [shape=circle]"));
        assert!(dot.contains("init -> \"q0\""));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"a\"]"));
        assert!(dot.ends_with('}'));
    }

    #[test_log::test]
    fn parallel_transitions_are_merged() {
        let mut aut = AutomatonDefinition::new("P");
        aut.add_states("p");
        aut.add_transitions("p,a,p;p,b,p;p,c,\"q\"");
        let dot = aut.dot_representation();
        assert!(dot.contains("\"p\" -> \"p\" [label=\"a, b\"]"));
        // undeclared states still get a node, and quotes are escaped
        assert!(dot.contains("\"\\\"q\\\"\" [shape=circle]"));
        assert!(!dot.contains("init ->"));
    }
}
