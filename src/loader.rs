use std::{
    fmt::Display,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{automaton::AutomatonDefinition, registry::Registry};

/// A definition file containing two automata, `AF04` over `{a, b}` and `AF05` over `{0, 1}`.
/// `AF04` accepts the words ending in `a`, `AF05` the words containing `000`.
pub const EXAMPLE_DEFINITIONS: &str = "1:AF04:q0,q1,q2
2:AF04:a,b
3:AF04:q0
4:AF04:q1
5:AF04:q0,a,q1;q0,b,q2;q1,a,q1;q1,b,q2;q2,a,q1;q2,b,q0
1:AF05:p0,p1,p2,p3
2:AF05:0,1
3:AF05:p0
4:AF05:p3
5:AF05:p0,0,p1;p0,1,p0;p1,0,p2;p1,1,p0;p2,0,p3;p2,1,p0;p3,0,p3;p3,1,p3
";

/// The kinds of records that can appear in a definition file, each one is identified by a
/// numeric tag at the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Tag `1`, a comma separated list of states.
    States,
    /// Tag `2`, a comma separated list of alphabet symbols.
    Alphabet,
    /// Tag `3`, the initial state.
    InitialState,
    /// Tag `4`, a comma separated list of accepting states.
    FinalStates,
    /// Tag `5`, a `;` separated list of transitions `from,symbol,to`.
    Transitions,
}

impl RecordKind {
    /// All record kinds in the order of their tags.
    pub const ALL: [RecordKind; 5] = [
        RecordKind::States,
        RecordKind::Alphabet,
        RecordKind::InitialState,
        RecordKind::FinalStates,
        RecordKind::Transitions,
    ];

    /// The tag that identifies this kind of record.
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::States => "1",
            RecordKind::Alphabet => "2",
            RecordKind::InitialState => "3",
            RecordKind::FinalStates => "4",
            RecordKind::Transitions => "5",
        }
    }
}

impl FromStr for RecordKind {
    type Err = SkipReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| SkipReason::UnknownRecordKind(s.to_string()))
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// The reason why a line of a definition file was skipped. Skipped lines never abort loading.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SkipReason {
    /// The line does not have the form `kind:name:payload`.
    #[error("expected at least 3 fields separated by `:` but found {found}")]
    MissingFields {
        /// Number of fields that were found.
        found: usize,
    },
    /// The record kind is not one of the known tags.
    #[error("unknown record kind `{0}`")]
    UnknownRecordKind(String),
}

/// A line that was skipped during loading.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SkippedLine {
    /// The 1-based line number in the source.
    pub line: usize,
    /// The content of the line.
    pub content: String,
    /// Why the line was skipped.
    pub reason: SkipReason,
}

impl Display for SkippedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} ignored: {}", self.line, self.reason)
    }
}

/// Errors that make loading fail as a whole. If one of these occurs, no automata are produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file at `path` could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Io {
        /// The file that was to be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Reading from a stream failed, this also covers input that is not valid UTF-8.
    #[error("could not read definitions: {0}")]
    Read(#[from] std::io::Error),
}

/// A single well-formed record of a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// What the record defines.
    pub kind: RecordKind,
    /// Name of the automaton the record belongs to.
    pub automaton: &'a str,
    /// Everything after the second `:`, trimmed. It may itself contain `:`.
    pub payload: &'a str,
}

impl<'a> Record<'a> {
    /// Parses a line of the form `kind:name:payload`. Kind and name are trimmed, the payload is
    /// the trimmed remainder of the line after the second `:`.
    pub fn parse(line: &'a str) -> Result<Self, SkipReason> {
        let (kind, automaton, payload) = split_fields(line)?;
        Ok(Record {
            kind: kind.parse()?,
            automaton,
            payload,
        })
    }

    /// Applies the record to the given automaton. Returns the number of transition triples
    /// that had to be skipped, which is always zero for records other than transitions.
    pub fn apply(&self, aut: &mut AutomatonDefinition) -> usize {
        match self.kind {
            RecordKind::States => aut.add_states(self.payload),
            RecordKind::Alphabet => aut.add_alphabet(self.payload),
            RecordKind::InitialState => aut.set_initial_state(self.payload),
            RecordKind::FinalStates => aut.add_final_states(self.payload),
            RecordKind::Transitions => return aut.add_transitions(self.payload),
        }
        0
    }
}

fn split_fields(line: &str) -> Result<(&str, &str, &str), SkipReason> {
    let mut fields = line.splitn(3, ':');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(kind), Some(automaton), Some(payload)) => {
            Ok((kind.trim(), automaton.trim(), payload.trim()))
        }
        _ => Err(SkipReason::MissingFields {
            found: line.split(':').count(),
        }),
    }
}

/// The result of loading a definition file: the assembled automata together with everything
/// that had to be skipped on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// The automata that could be assembled.
    pub registry: Registry,
    /// Lines that were skipped entirely.
    pub skipped: Vec<SkippedLine>,
    /// Number of transition triples that were skipped inside otherwise well-formed lines.
    pub skipped_transitions: usize,
}

impl LoadReport {
    /// Returns `true` if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.skipped_transitions == 0
    }
}

/// Assembles automata from the lines of a definition file. Lines are processed strictly in
/// order, and since automata are looked up by name, records for different automata may be
/// interleaved arbitrarily.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    report: LoadReport,
    lines_seen: usize,
}

impl Loader {
    /// Creates a loader without any automata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes every line of `text`.
    pub fn feed(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.feed_line(line);
        }
        self
    }

    /// Processes a single line. Blank lines are ignored, malformed ones are recorded as skipped.
    pub fn feed_line(&mut self, line: &str) -> &mut Self {
        self.lines_seen += 1;
        let number = self.lines_seen;
        if line.trim().is_empty() {
            return self;
        }

        let (kind, name, payload) = match split_fields(line) {
            Ok(fields) => fields,
            Err(reason) => {
                self.skip(number, line, reason);
                return self;
            }
        };

        // the automaton exists as soon as it is named, even if the record turns out to be unusable
        let aut = self.report.registry.entry(name);

        match kind.parse::<RecordKind>() {
            Ok(kind) => {
                trace!("line {number}: applying record of kind {kind} to {name}");
                let record = Record {
                    kind,
                    automaton: name,
                    payload,
                };
                self.report.skipped_transitions += record.apply(aut);
            }
            Err(reason) => self.skip(number, line, reason),
        }
        self
    }

    fn skip(&mut self, number: usize, line: &str, reason: SkipReason) {
        let skipped = SkippedLine {
            line: number,
            content: line.to_string(),
            reason,
        };
        warn!("{skipped}");
        self.report.skipped.push(skipped);
    }

    /// Finishes loading and returns the assembled automata.
    pub fn finish(self) -> LoadReport {
        debug!(
            "loaded {} automata from {} lines, skipped {} lines",
            self.report.registry.len(),
            self.lines_seen,
            self.report.skipped.len()
        );
        self.report
    }
}

/// Loads all automata defined in `text`, skipping malformed lines.
pub fn load_definitions(text: &str) -> Registry {
    load_str(text).registry
}

/// Loads all automata defined in `text` and reports what was skipped.
pub fn load_str(text: &str) -> LoadReport {
    let mut loader = Loader::new();
    loader.feed(text);
    loader.finish()
}

/// Reads `read` to its end and loads the automata defined in it. The source is read completely
/// before any line is processed, so a read error never results in a partially loaded registry.
pub fn load_reader<R: Read>(mut read: R) -> Result<LoadReport, LoadError> {
    let mut text = String::new();
    read.read_to_string(&mut text)?;
    Ok(load_str(&text))
}

/// Loads the automata defined in the file at `path`.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<LoadReport, LoadError> {
    let path = path.as_ref();
    debug!("reading definitions from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(load_str(&text))
}
