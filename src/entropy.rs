use crate::generator::GenerationRequest;
use crate::vocabulary::VocabularyCollection;

pub const MIN_SAFE_ENTROPY: f64 = 60.0;
pub const PARANOID_ENTROPY: f64 = 100.0;

/// Heuristic bit estimate, split by where the bits come from.
///
/// This is a display figure for the user, not a min-entropy bound: it
/// ignores duplicate words across lists and collisions between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntropyBreakdown {
    pub words: f64,
    pub specials: f64,
    pub numbers: f64,
    /// Choice of word slot and side (prefix or suffix) for each token.
    pub placement: f64,
}

impl EntropyBreakdown {
    pub fn total(&self) -> f64 {
        self.words + self.specials + self.numbers + self.placement
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Weak,
    Strong,
    Paranoid,
}

impl Strength {
    pub fn of(bits: f64) -> Self {
        if bits >= PARANOID_ENTROPY {
            Self::Paranoid
        } else if bits >= MIN_SAFE_ENTROPY {
            Self::Strong
        } else {
            Self::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Strong => "Strong",
            Self::Paranoid => "Paranoid",
        }
    }

    pub fn is_safe(self) -> bool {
        self != Self::Weak
    }
}

fn bits_per_draw(pool_size: usize) -> f64 {
    if pool_size == 0 {
        0.0
    } else {
        (pool_size as f64).log2()
    }
}

pub fn breakdown(request: &GenerationRequest, vocab: &VocabularyCollection) -> EntropyBreakdown {
    let word_count = request.word_count as f64;
    let special_count = request.special_count as f64;
    let number_count = request.number_count as f64;

    let slots = 2.0 * request.word_count.max(1) as f64;

    EntropyBreakdown {
        words: word_count * vocab.average_word_list_len().max(2.0).log2(),
        specials: special_count * bits_per_draw(vocab.specials().len()),
        numbers: number_count * bits_per_draw(vocab.numbers().len()),
        placement: (special_count + number_count) * slots.log2(),
    }
}

/// Depends only on the request and the vocabulary sizes, never on a
/// particular generated password.
pub fn estimate_entropy(request: &GenerationRequest, vocab: &VocabularyCollection) -> f64 {
    breakdown(request, vocab).total()
}
