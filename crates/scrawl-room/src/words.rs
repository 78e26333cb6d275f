//! The guessable-word supply and word masking.

use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rand::seq::{IndexedRandom, index};

/// The masked form of a word: every non-space character replaced with an
/// underscore, spaces preserved. Shown to guessers while the round runs.
///
/// The masked form has the same length as the original, so clients can
/// lay out one blank per letter.
pub fn mask_word(word: &str) -> String {
    word.chars()
        .map(|c| if c == ' ' { ' ' } else { '_' })
        .collect()
}

/// A supply of guessable words.
///
/// The coordinator draws candidate lists from this at each round start
/// and falls back to a single random word when the drawer never picked
/// one. Implementations must be cheap to sample — rooms draw on every
/// round.
pub trait WordSource: Send + Sync + 'static {
    /// All words this source can produce.
    fn all(&self) -> &[String];

    /// One uniformly random word, or `None` if the source is empty.
    fn random_word(&self) -> Option<String> {
        self.all().choose(&mut rand::rng()).cloned()
    }

    /// `amount` distinct random words (fewer if the source is smaller).
    fn random_words(&self, amount: usize) -> Vec<String> {
        let all = self.all();
        let amount = amount.min(all.len());
        index::sample(&mut rand::rng(), all.len(), amount)
            .into_iter()
            .map(|i| all[i].clone())
            .collect()
    }
}

/// A [`WordSource`] backed by an in-memory list, loaded from a file or
/// from the bundled default list.
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Builds a list from the given words, dropping empties.
    pub fn from_words(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Loads a list from a text file, one word per line.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let lines = BufReader::new(file).lines().collect::<io::Result<Vec<_>>>()?;
        Ok(Self::from_words(lines))
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the list has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    /// The bundled word list shipped with the server.
    fn default() -> Self {
        Self::from_words(
            include_str!("../resources/words.txt")
                .lines()
                .map(str::to_string),
        )
    }
}

impl WordSource for WordList {
    fn all(&self) -> &[String] {
        &self.words
    }
}
