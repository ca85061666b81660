use rand::{rngs::SmallRng, Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flashcard {
    pub term: &'static str,
    pub definition: &'static str,
}

pub const SYMBOLS: [Flashcard; 8] = [
    Flashcard { term: "Allegro", definition: "Fast, quickly and bright" },
    Flashcard { term: "Adagio", definition: "Slow and stately" },
    Flashcard { term: "Crescendo", definition: "Gradually get louder" },
    Flashcard { term: "Decrescendo", definition: "Gradually get softer" },
    Flashcard { term: "Pizzicato", definition: "Plucking strings with finger" },
    Flashcard { term: "Fermata", definition: "Hold note longer than usual" },
    Flashcard { term: "Staccato", definition: "Short and detached" },
    Flashcard { term: "Tempo Rubato", definition: "Flexible tempo" },
];

/// Term flashcards drawn at random, definition hidden until revealed.
pub struct SymbolsDeck<R = SmallRng> {
    rng: R,
    current: usize,
    revealed: bool,
}

impl SymbolsDeck<SmallRng> {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }
}

impl Default for SymbolsDeck<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SymbolsDeck<R> {
    /// Deal the first card straight away.
    pub fn with_rng(rng: R) -> Self {
        let mut deck = Self {
            rng,
            current: 0,
            revealed: false,
        };
        deck.next();
        deck
    }

    pub fn card(&self) -> Flashcard {
        SYMBOLS[self.current]
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The definition, once revealed.
    pub fn definition(&self) -> Option<&'static str> {
        self.revealed.then(|| self.card().definition)
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn next(&mut self) -> Flashcard {
        self.current = self.rng.random_range(0..SYMBOLS.len());
        self.revealed = false;
        self.card()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_hidden_until_revealed() {
        let mut deck = SymbolsDeck::with_rng(SmallRng::seed_from_u64(9));
        assert!(!deck.is_revealed());
        assert_eq!(deck.definition(), None);

        deck.reveal();
        assert_eq!(deck.definition(), Some(deck.card().definition));
    }

    #[test]
    fn test_next_hides_again() {
        let mut deck = SymbolsDeck::with_rng(SmallRng::seed_from_u64(9));
        deck.reveal();
        let card = deck.next();
        assert!(!deck.is_revealed());
        assert_eq!(deck.card(), card);
        assert!(SYMBOLS.contains(&card));
    }
}
