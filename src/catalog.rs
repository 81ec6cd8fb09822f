use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::error::Error;
use std::path::Path;

static ASSET_DIR: Dir = include_dir!("assets");

/// One selectable word, flagged for whether it counts toward the empathy
/// score.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WordChoice {
    pub text: String,
    pub is_empathic: bool,
}

/// One scenario presentation cycle: situation prompt, two imagery assets and
/// the ordered word choices shown to the participant.
#[derive(Deserialize, Clone, Debug)]
pub struct Round {
    pub situation: String,
    pub primary_image: String,
    pub secondary_image: String,
    pub choices: Vec<WordChoice>,
}

/// Static configuration of all rounds. Immutable once loaded.
#[derive(Deserialize, Clone, Debug)]
pub struct RoundCatalog {
    pub rounds: Vec<Round>,
}

impl RoundCatalog {
    /// The catalog embedded in the binary.
    pub fn builtin() -> Self {
        let file = ASSET_DIR
            .get_file("rounds.json")
            .expect("Round catalog not found");

        let contents = file
            .contents_utf8()
            .expect("Unable to interpret round catalog as a string");

        serde_json::from_str(contents).expect("Unable to deserialize round catalog json")
    }

    /// Loads a catalog from a json file, for kiosks with custom scenarios.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: RoundCatalog = serde_json::from_str(&contents)?;
        Ok(catalog)
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
