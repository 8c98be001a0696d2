use super::Corpus;
use crate::error::{EngineError, Result};
use crate::passage::{Passage, Tier};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Picks passages for a tier from a fixed corpus using the supplied rng
#[derive(Debug, Clone)]
pub struct PassageProvider<R: Rng = StdRng> {
    corpus: Corpus,
    rng: R,
}

impl PassageProvider<StdRng> {
    pub fn from_entropy(corpus: Corpus) -> Self {
        Self::new(corpus, StdRng::from_entropy())
    }

    /// Reproducible selection order for a given seed
    pub fn seeded(corpus: Corpus, seed: u64) -> Self {
        Self::new(corpus, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PassageProvider<R> {
    pub fn new(corpus: Corpus, rng: R) -> Self {
        Self { corpus, rng }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Uniformly random entry for `tier`
    pub fn select_passage(&mut self, tier: Tier) -> Result<Passage> {
        let text = self
            .corpus
            .entries(tier)
            .choose(&mut self.rng)
            .ok_or(EngineError::EmptyCorpus(tier))?;

        log::debug!("selected {tier} passage: {text:?}");
        Passage::parse(text)
    }

    /// Same as [`select_passage`](Self::select_passage) for a tier given by name
    pub fn select_passage_named(&mut self, tier: &str) -> Result<Passage> {
        let tier: Tier = tier.parse()?;
        self.select_passage(tier)
    }
}
