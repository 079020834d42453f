use blake2::{Blake2b512, Digest};
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const SEED_LEN: usize = 32;

const BUFFER_LEN: usize = 512;
const PHRASE_CONTEXT: &[u8] = b"ravenfoot/seed/v1";

/// Source of uniform random draws for word and token selection.
///
/// Implementors only provide raw 32-bit words; bounded draws are derived
/// here with rejection sampling so every index in `0..bound` is equally
/// likely.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    /// Uniform index in `0..bound`. Returns 0 when `bound <= 1`.
    fn below(&mut self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }

        let bound = bound as u64;
        // 2^64 mod bound: draws below this would favour the low residues.
        let rejection_threshold = bound.wrapping_neg() % bound;

        loop {
            let random_u64 = self.next_u64();
            if random_u64 >= rejection_threshold {
                return (random_u64 % bound) as usize;
            }
        }
    }

    fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }
}

/// Fisher-Yates shuffle; every permutation is equally likely.
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// ChaCha20 keystream used as a random stream.
pub struct KeystreamRng {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl KeystreamRng {
    pub fn from_seed(seed: [u8; SEED_LEN]) -> Self {
        let key = Zeroizing::new(seed);
        let mut cipher = ChaCha20::new((&*key).into(), &[0u8; 12].into());

        let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    pub fn from_os_entropy() -> Self {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        rand::rng().fill_bytes(&mut *seed);
        Self::from_seed(*seed)
    }

    /// Deterministic stream keyed by a user phrase, so a batch can be
    /// reproduced later. The phrase is trimmed and NFC-normalised first.
    pub fn from_phrase(phrase: &str) -> Self {
        let normalized: Zeroizing<String> = Zeroizing::new(phrase.trim().nfc().collect());

        let mut hasher = Blake2b512::new();
        hasher.update(PHRASE_CONTEXT);
        hasher.update(normalized.as_bytes());
        let digest = Zeroizing::new(hasher.finalize().to_vec());

        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        seed.copy_from_slice(&digest[..SEED_LEN]);
        Self::from_seed(*seed)
    }

    fn refill(&mut self) {
        self.buffer.fill(0);
        self.cipher.apply_keystream(&mut self.buffer);
        self.pos = 0;
    }
}

impl RandomSource for KeystreamRng {
    fn next_u32(&mut self) -> u32 {
        if self.pos + 4 > self.buffer.len() {
            self.refill();
        }

        let b = &self.buffer[self.pos..self.pos + 4];
        let value = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        self.pos += 4;
        value
    }
}
