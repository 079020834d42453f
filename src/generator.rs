use crate::entropy::estimate_entropy;
use crate::rng::{RandomSource, shuffle};
use crate::vocabulary::{VocabularyCollection, VocabularySet};
use std::fmt;
use zeroize::Zeroizing;

/// Counts driving one passphrase. Negative inputs from a host are clamped
/// to zero by [`GenerationRequest::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationRequest {
    pub word_count: usize,
    pub special_count: usize,
    pub number_count: usize,
}

impl GenerationRequest {
    pub const fn new(word_count: usize, special_count: usize, number_count: usize) -> Self {
        Self {
            word_count,
            special_count,
            number_count,
        }
    }

    pub fn clamped(word_count: i64, special_count: i64, number_count: i64) -> Self {
        let clamp = |n: i64| usize::try_from(n.max(0)).unwrap_or(usize::MAX);
        Self::new(clamp(word_count), clamp(special_count), clamp(number_count))
    }

    pub fn token_count(&self) -> usize {
        self.special_count.saturating_add(self.number_count)
    }
}

/// One word with the tokens attached in front of and behind it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecoratedWord {
    pub prefix: String,
    pub word: String,
    pub suffix: String,
}

impl DecoratedWord {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            word: word.into(),
            suffix: String::new(),
        }
    }
}

impl fmt::Display for DecoratedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.word, self.suffix)
    }
}

pub fn assemble(decorated: &[DecoratedWord]) -> String {
    let len = decorated
        .iter()
        .map(|d| d.prefix.len() + d.word.len() + d.suffix.len())
        .sum();

    let mut out = String::with_capacity(len);
    for d in decorated {
        out.push_str(&d.prefix);
        out.push_str(&d.word);
        out.push_str(&d.suffix);
    }
    out
}

/// Attaches each token, in order, to a uniformly chosen word: prefix or
/// suffix with equal odds. Tokens landing on the same side of the same word
/// keep their arrival order. With no words there is nowhere to attach, so
/// tokens are dropped; [`PassphraseGenerator::generate`] routes that case
/// around this function.
pub fn decorate<R, W, T>(words: &[W], tokens: &[T], rng: &mut R) -> Vec<DecoratedWord>
where
    R: RandomSource + ?Sized,
    W: AsRef<str>,
    T: AsRef<str>,
{
    let mut decorated: Vec<DecoratedWord> =
        words.iter().map(|w| DecoratedWord::new(w.as_ref())).collect();

    if decorated.is_empty() {
        return decorated;
    }

    for token in tokens {
        let index = rng.below(decorated.len());
        let target = &mut decorated[index];
        if rng.coin() {
            target.prefix.push_str(token.as_ref());
        } else {
            target.suffix.push_str(token.as_ref());
        }
    }

    decorated
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub password: Zeroizing<String>,
    pub entropy_bits: f64,
}

fn draw<'v, R: RandomSource + ?Sized>(set: &'v VocabularySet, rng: &mut R) -> &'v str {
    set.get(rng.below(set.len())).unwrap_or_default()
}

/// Builds passphrases from a borrowed vocabulary. Holds no mutable state, so
/// one generator can serve any number of callers, each with its own RNG.
#[derive(Debug, Clone, Copy)]
pub struct PassphraseGenerator<'v> {
    vocab: &'v VocabularyCollection,
}

impl<'v> PassphraseGenerator<'v> {
    pub fn new(vocab: &'v VocabularyCollection) -> Self {
        Self { vocab }
    }

    /// Selects `n` words.
    ///
    /// With a single word list, or a single word, every draw comes from the
    /// first list in draw order. Otherwise two distinct lists each contribute
    /// one word, the rest come from lists picked uniformly at random, and the
    /// whole selection is shuffled. Only the first two draws are forced apart;
    /// later fills are unconstrained.
    pub fn pick_words<R: RandomSource + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<&'v str> {
        let lists = self.vocab.word_lists();

        if n == 0 {
            return Vec::new();
        }

        if lists.len() == 1 || n == 1 {
            let list = &lists[0];
            return (0..n).map(|_| draw(list, rng)).collect();
        }

        let mut order: Vec<usize> = (0..lists.len()).collect();
        shuffle(rng, &mut order);
        let (first, second) = (order[0], order[1]);

        let mut selected = Vec::with_capacity(n);
        selected.push(draw(&lists[first], rng));
        selected.push(draw(&lists[second], rng));

        while selected.len() < n {
            let list = &lists[rng.below(lists.len())];
            selected.push(draw(list, rng));
        }

        shuffle(rng, &mut selected);
        selected
    }

    /// `special_count` specials then `number_count` digits, all drawn with
    /// replacement, then shuffled together.
    pub fn token_pool<R: RandomSource + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Vec<&'v str> {
        let mut tokens = Vec::with_capacity(request.token_count());

        for _ in 0..request.special_count {
            tokens.push(draw(self.vocab.specials(), rng));
        }
        for _ in 0..request.number_count {
            tokens.push(draw(self.vocab.numbers(), rng));
        }

        shuffle(rng, &mut tokens);
        tokens
    }

    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> GenerationResult {
        let words = self.pick_words(request.word_count, rng);
        let tokens = self.token_pool(request, rng);

        let password = if words.is_empty() {
            // Nothing to decorate: the tokens alone make up the password.
            Zeroizing::new(tokens.concat())
        } else {
            Zeroizing::new(assemble(&decorate(&words, &tokens, rng)))
        };

        GenerationResult {
            password,
            entropy_bits: estimate_entropy(request, self.vocab),
        }
    }

    /// `count` independent passphrases for the same request.
    pub fn generate_batch<R: RandomSource + ?Sized>(
        &self,
        request: &GenerationRequest,
        count: usize,
        rng: &mut R,
    ) -> Vec<Zeroizing<String>> {
        (0..count)
            .map(|_| self.generate(request, rng).password)
            .collect()
    }
}
