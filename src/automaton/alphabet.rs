use itertools::Itertools;

use crate::{math::Set, Show};

/// The alphabet of an [`AutomatonDefinition`](super::AutomatonDefinition), a set of declared
/// symbols. Symbols are usually single characters, but the definition format allows longer
/// tokens such as `ab`. Input words are therefore not read character by character but are split
/// into symbols by [`Alphabet::symbols_of`], which always picks the longest declared symbol that
/// matches at the current position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Set<String>,
    longest: usize,
}

/// A symbol occurring in an input word together with its position, which is counted in
/// characters from the start of the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSymbol<'w> {
    /// Character offset of the symbol in the word.
    pub position: usize,
    /// The text of the symbol.
    pub text: &'w str,
}

impl Alphabet {
    /// Adds `symbol` to the alphabet, returns `true` if it was not present before. The empty
    /// symbol may be declared, but it never matches a part of a word.
    pub fn insert(&mut self, symbol: &str) -> bool {
        self.longest = self.longest.max(symbol.chars().count());
        self.symbols.insert(symbol.to_string())
    }

    /// Returns `true` if `symbol` has been declared.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    /// The number of declared symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbol has been declared.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over the declared symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(String::as_str)
    }

    /// Returns `true` if at least one declared symbol spans more than one character.
    pub fn has_multi_character_symbols(&self) -> bool {
        self.longest > 1
    }

    /// Splits `word` into symbols. At every position the longest declared symbol that is a
    /// prefix of the remaining input is taken, if there is none, the next single character
    /// forms the symbol. For alphabets consisting only of single characters, this yields
    /// precisely the characters of `word`.
    pub fn symbols_of<'a, 'w>(&'a self, word: &'w str) -> Symbols<'a, 'w> {
        Symbols {
            alphabet: self,
            rest: word,
            position: 0,
        }
    }

    /// Returns the first symbol of `word` that has not been declared, if any.
    pub fn first_undeclared<'w>(&self, word: &'w str) -> Option<WordSymbol<'w>> {
        self.symbols_of(word).find(|sym| !self.contains(sym.text))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut alphabet = Alphabet::default();
        for symbol in iter {
            alphabet.insert(symbol.as_ref());
        }
        alphabet
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().join(", "))
    }
}

/// Iterator over the symbols of a word, see [`Alphabet::symbols_of`].
#[derive(Debug, Clone)]
pub struct Symbols<'a, 'w> {
    alphabet: &'a Alphabet,
    rest: &'w str,
    position: usize,
}

impl<'a, 'w> Iterator for Symbols<'a, 'w> {
    type Item = WordSymbol<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // byte offsets of the ends of the first `longest` characters
        let mut ends = self
            .rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take(self.alphabet.longest.max(1));
        let first = ends.next()?;
        let (chars, end) = ends.zip(2..).fold((1, first), |best, (end, chars)| {
            if self.alphabet.contains(&self.rest[..end]) {
                (chars, end)
            } else {
                best
            }
        });

        let symbol = WordSymbol {
            position: self.position,
            text: &self.rest[..end],
        };
        self.rest = &self.rest[end..];
        self.position += chars;
        Some(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'w>(alphabet: &Alphabet, word: &'w str) -> Vec<&'w str> {
        alphabet.symbols_of(word).map(|s| s.text).collect()
    }

    #[test]
    fn single_character_alphabet_reads_characters() {
        let alphabet: Alphabet = ["a", "b"].into_iter().collect();
        assert!(!alphabet.has_multi_character_symbols());
        assert_eq!(texts(&alphabet, "abba"), vec!["a", "b", "b", "a"]);
        // undeclared characters still form symbols of their own
        assert_eq!(texts(&alphabet, "acb"), vec!["a", "c", "b"]);
        assert_eq!(texts(&alphabet, ""), Vec::<&str>::new());
    }

    #[test]
    fn multi_character_symbols_use_longest_match() {
        let alphabet: Alphabet = ["a", "ab", "c"].into_iter().collect();
        assert!(alphabet.has_multi_character_symbols());
        assert_eq!(texts(&alphabet, "abc"), vec!["ab", "c"]);
        assert_eq!(texts(&alphabet, "aab"), vec!["a", "ab"]);

        let positions = alphabet
            .symbols_of("abca")
            .map(|s| s.position)
            .collect_vec();
        assert_eq!(positions, vec![0, 2, 3]);
    }

    #[test]
    fn multi_character_symbol_without_its_prefix() {
        // `b` alone is not declared, so `bx` falls back to single characters
        let alphabet: Alphabet = ["ab", "bc"].into_iter().collect();
        assert_eq!(texts(&alphabet, "abbc"), vec!["ab", "bc"]);
        assert_eq!(texts(&alphabet, "bx"), vec!["b", "x"]);
        assert_eq!(
            alphabet.first_undeclared("abbx"),
            Some(WordSymbol {
                position: 2,
                text: "b"
            })
        );
    }

    #[test]
    fn non_ascii_symbols() {
        let alphabet: Alphabet = ["ä", "öü"].into_iter().collect();
        assert_eq!(texts(&alphabet, "äöüä"), vec!["ä", "öü", "ä"]);
        assert_eq!(alphabet.first_undeclared("äöüä"), None);
    }

    #[test]
    fn empty_symbol_is_declared_but_never_read() {
        let mut alphabet = Alphabet::default();
        assert!(alphabet.insert(""));
        assert!(!alphabet.is_empty());
        assert!(alphabet.insert("a"));
        assert!(!alphabet.insert("a"));
        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.show(), "{, a}");
        assert!(!alphabet.has_multi_character_symbols());
        assert_eq!(texts(&alphabet, "aba"), vec!["a", "b", "a"]);
        assert_eq!(
            alphabet.first_undeclared("ab"),
            Some(WordSymbol {
                position: 1,
                text: "b"
            })
        );
    }
}
