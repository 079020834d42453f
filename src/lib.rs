pub mod entropy;
pub mod generator;
pub mod library;
pub mod rng;
pub mod vocabulary;

pub use entropy::{EntropyBreakdown, Strength, breakdown, estimate_entropy};
pub use generator::{
    DecoratedWord, GenerationRequest, GenerationResult, PassphraseGenerator, assemble, decorate,
};
pub use library::{BundledSource, DirectorySource};
pub use rng::{KeystreamRng, RandomSource, shuffle};
pub use vocabulary::{
    LoadWarning, MemorySource, SourceManifest, SourceReader, VocabularyCollection, VocabularySet,
};
