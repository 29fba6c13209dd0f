use crate::data::{Sample, TableError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Parse every sample id in a table header. The first malformed id aborts
/// the run; no fallback value is synthesized.
pub fn parse_samples(ids: &[String]) -> Result<Vec<Sample>, TableError> {
    ids.iter().map(|id| Sample::parse(id)).collect()
}

/// Select the ids of usable normal samples.
///
/// A sample is usable iff its participant has at least one healthy-coded
/// sample, the participant never appears in a metastatic-coded sample, and
/// the sample's own type code is healthy. A participant with any metastatic
/// sample loses all of its samples, healthy-coded ones included.
pub fn classify_normal_samples(samples: &[Sample]) -> HashSet<String> {
    let healthy_participants: HashSet<&str> = samples
        .iter()
        .filter(|s| s.is_healthy())
        .map(|s| s.participant.as_str())
        .collect();

    let metastatic_participants: HashSet<&str> = samples
        .iter()
        .filter(|s| s.is_metastatic())
        .map(|s| s.participant.as_str())
        .collect();

    debug!(
        "{} healthy participants, {} metastatic participants",
        healthy_participants.len(),
        metastatic_participants.len()
    );

    let usable_participants: HashSet<&str> = healthy_participants
        .difference(&metastatic_participants)
        .copied()
        .collect();

    samples
        .iter()
        .filter(|s| s.is_healthy() && usable_participants.contains(s.participant.as_str()))
        .map(|s| s.id.clone())
        .collect()
}

/// Summary of one classification pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummary {
    /// Total samples in the table header
    pub total_samples: usize,
    /// Participants with at least one healthy-coded sample
    pub healthy_participants: usize,
    /// Participants with at least one metastatic-coded sample
    pub metastatic_participants: usize,
    /// Healthy participants that survived the metastatic exclusion
    pub usable_participants: usize,
    /// Sample columns kept in the normal subset
    pub normal_samples: usize,
}

impl ClassificationSummary {
    /// Build a summary from the parsed samples and the kept sample ids
    pub fn from_samples(samples: &[Sample], kept: &HashSet<String>) -> Self {
        let healthy: HashSet<&str> = samples
            .iter()
            .filter(|s| s.is_healthy())
            .map(|s| s.participant.as_str())
            .collect();
        let metastatic: HashSet<&str> = samples
            .iter()
            .filter(|s| s.is_metastatic())
            .map(|s| s.participant.as_str())
            .collect();
        let usable = healthy.difference(&metastatic).count();

        Self {
            total_samples: samples.len(),
            healthy_participants: healthy.len(),
            metastatic_participants: metastatic.len(),
            usable_participants: usable,
            normal_samples: kept.len(),
        }
    }

    /// Log the summary at info level
    pub fn log(&self) {
        info!("Samples in header: {}", self.total_samples);
        info!("Healthy participants: {}", self.healthy_participants);
        info!("Metastatic participants: {}", self.metastatic_participants);
        info!("Usable participants: {}", self.usable_participants);
        info!("Normal samples kept: {}", self.normal_samples);
    }
}
