use wasm_bindgen::prelude::*;

pub mod cases;
pub mod chirp;
pub mod consts;
pub mod error;
pub mod report;
pub mod results;

use chirp::{ChirpCalculator, RadarRequirements};

/*
    form ----> RadarRequirements --+--> ChirpCalculator(512)  --+
                                   +--> ChirpCalculator(1024) --+--> cases ----> JSON / report
                                   +--> ChirpCalculator(2048) --+
*/

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(())
}

fn requirements(
    range_res: f64,
    range_max: f64,
    velocity_max: f64,
    velocity_res: f64,
    angular_res: f64,
    frequency: f64,
) -> RadarRequirements {
    RadarRequirements {
        range_res,
        range_max,
        velocity_max,
        velocity_res,
        angular_res,
        frequency,
    }
}

/// One acquisition sample count. Velocities are km/h, angles degrees and `frequency` GHz.
#[wasm_bindgen]
pub struct RadarSystem {
    calculator: ChirpCalculator,
}

#[wasm_bindgen]
impl RadarSystem {
    #[wasm_bindgen(constructor)]
    pub fn new(
        acquisition_samples: u32,
        range_res: f64,
        range_max: f64,
        velocity_max: f64,
        velocity_res: f64,
        angular_res: f64,
        frequency: f64,
    ) -> Result<RadarSystem, JsError> {
        let requirements = requirements(
            range_res,
            range_max,
            velocity_max,
            velocity_res,
            angular_res,
            frequency,
        );
        Ok(RadarSystem {
            calculator: ChirpCalculator::new(acquisition_samples, &requirements)?,
        })
    }

    /// Result bundle as JSON, keyed the way the results view reads it.
    pub fn calculate_results(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.calculator.calculate_results())?)
    }

    pub fn report(&self) -> String {
        self.calculator.calculate_results().to_string()
    }

    /// IF table flattened row by row: `[chirp_bw, if_bandwidth, chirp_bw, ...]`, MHz.
    pub fn if_bandwidth_table(&self) -> Vec<f64> {
        self.calculator
            .if_bandwidth_table()
            .iter()
            .flat_map(|row| [row.chirp_bw as f64, row.if_bandwidth])
            .collect()
    }
}

/// JSON array with one entry per conventional acquisition sample count.
#[wasm_bindgen]
pub fn calculate_cases(
    range_res: f64,
    range_max: f64,
    velocity_max: f64,
    velocity_res: f64,
    angular_res: f64,
    frequency: f64,
) -> Result<String, JsError> {
    let requirements = requirements(
        range_res,
        range_max,
        velocity_max,
        velocity_res,
        angular_res,
        frequency,
    );
    let cases = cases::calculate_cases(&requirements)?;
    Ok(serde_json::to_string(&cases)?)
}

/// Same as [`calculate_cases`], with the requirements given as a JSON object
/// (`range_res`, `range_max`, `velocity_max`, `velocity_res`, `angular_res`, `frequency`).
#[wasm_bindgen]
pub fn calculate_cases_json(requirements_json: &str) -> Result<String, JsError> {
    let requirements: RadarRequirements = serde_json::from_str(requirements_json)?;
    let cases = cases::calculate_cases(&requirements)?;
    Ok(serde_json::to_string(&cases)?)
}

#[wasm_bindgen]
pub fn cases_report(
    range_res: f64,
    range_max: f64,
    velocity_max: f64,
    velocity_res: f64,
    angular_res: f64,
    frequency: f64,
) -> Result<String, JsError> {
    let requirements = requirements(
        range_res,
        range_max,
        velocity_max,
        velocity_res,
        angular_res,
        frequency,
    );
    Ok(report::render_cases(&cases::calculate_cases(&requirements)?))
}
