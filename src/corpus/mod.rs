pub mod selector;

pub use selector::PassageProvider;

use crate::error::{EngineError, Result};
use crate::passage::Tier;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::BTreeMap;

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus/data");

const DEFAULT_CORPUS: &str = "passages.json";

/// Fixed set of passages keyed by difficulty tier
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Corpus {
    pub name: String,
    #[serde(default)]
    pub passages: BTreeMap<Tier, Vec<String>>,
}

impl Corpus {
    /// The corpus compiled into the binary
    pub fn builtin() -> Result<Self> {
        read_corpus_from_file(DEFAULT_CORPUS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_entries<I, S>(name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (Tier, S)>,
        S: Into<String>,
    {
        let mut passages: BTreeMap<Tier, Vec<String>> = BTreeMap::new();
        for (tier, text) in entries {
            passages.entry(tier).or_default().push(text.into());
        }
        Self {
            name: name.to_string(),
            passages,
        }
    }

    /// Entries registered for `tier`; empty when the tier has none
    pub fn entries(&self, tier: Tier) -> &[String] {
        self.passages.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tiers(&self) -> impl Iterator<Item = Tier> + '_ {
        self.passages
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(t, _)| *t)
    }
}

fn read_corpus_from_file(file_name: &str) -> Result<Corpus> {
    let file = CORPUS_DIR
        .get_file(file_name)
        .ok_or_else(|| EngineError::MissingCorpus(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| EngineError::MissingCorpus(file_name.to_string()))?;

    Corpus::from_json(contents)
}
