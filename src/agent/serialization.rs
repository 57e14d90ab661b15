//! Serialization support for trained agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::agent::td_agent::{TdAgent, TdAgentState};

/// Provenance recorded alongside a saved agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes_trained: Option<usize>,
    pub level: Option<String>,
    pub seed: Option<u64>,
    pub saved_at: Option<String>,
}

/// Versioned on-disk envelope for a trained agent (MessagePack).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    state: TdAgentState,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &TdAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    pub fn to_agent(&self) -> Result<TdAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        Ok(TdAgent::from_state(self.state.clone()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agent::{StateKey, TdConfig},
        gridworld::GridWorld,
    };

    fn trained_agent() -> TdAgent {
        let world = GridWorld::from_level(".P E").unwrap();
        let mut agent = TdAgent::new(TdConfig::default().with_seed(7)).unwrap();

        let old_state = StateKey::capture(world.player_pos(), world.grid());
        let mut probe = world.clone();
        probe.step(crate::gridworld::Action::Left).unwrap();
        let new_state = StateKey::capture(probe.player_pos(), probe.grid());
        agent.update(&old_state, -1, &new_state);
        agent
    }

    #[test]
    fn test_roundtrip() -> Result<()> {
        let agent = trained_agent();
        assert!(agent.values().len() > 0);

        let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.to_agent()?;

        assert_eq!(restored.values().len(), agent.values().len());
        assert_eq!(restored.epsilon(), agent.epsilon());
        Ok(())
    }

    #[test]
    fn test_file_roundtrip() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("agent.mp");

        let agent = trained_agent();
        let metadata = TrainingMetadata {
            episodes_trained: Some(1),
            level: Some("corridor".to_string()),
            seed: Some(7),
            saved_at: None,
        };
        SavedAgent::from_agent(&agent, metadata).save_to_file(&path)?;

        let loaded = SavedAgent::load_from_file(&path)?;
        assert_eq!(loaded.metadata.episodes_trained, Some(1));
        assert_eq!(loaded.to_agent()?.values().len(), agent.values().len());
        Ok(())
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let agent = trained_agent();
        let mut saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        saved.version = 99;
        assert!(saved.to_agent().is_err());
    }
}
