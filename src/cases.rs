use log::info;
use serde::Serialize;

use crate::chirp::{ChirpCalculator, RadarRequirements};
use crate::consts::ACQUISITION_SAMPLE_CASES;
use crate::error::Result;
use crate::results::ChirpResults;

/// Results for one acquisition sample count.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Case {
    pub samples: u32,
    #[serde(flatten)]
    pub results: ChirpResults,
}

/// Runs the calculator at each of the conventional sample counts.
pub fn calculate_cases(requirements: &RadarRequirements) -> Result<Vec<Case>> {
    calculate_cases_with(requirements, &ACQUISITION_SAMPLE_CASES)
}

pub fn calculate_cases_with(
    requirements: &RadarRequirements,
    sample_counts: &[u32],
) -> Result<Vec<Case>> {
    info!(
        "calculating {} cases for {:?}",
        sample_counts.len(),
        requirements
    );
    sample_counts
        .iter()
        .map(|&samples| {
            let calculator = ChirpCalculator::new(samples, requirements)?;
            Ok(Case {
                samples: calculator.acquisition_samples(),
                results: calculator.calculate_results(),
            })
        })
        .collect()
}
