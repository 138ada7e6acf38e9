use std::f64::consts::PI;

use itertools::zip_eq;
use log::debug;
use ndarray::Array1;
use serde::Deserialize;

use crate::consts::*;
use crate::error::{ChirpError, Result};
use crate::results::{
    AntennaCount, ChirpFrequency, ChirpResults, ChirpTiming, FrameParams, IfBandwidthRow,
    RadarParams,
};

const DEG_TO_RAD: f64 = PI / 180.0;
/// Angle off boresight at which the angular resolution is evaluated.
const BORESIGHT: f64 = 0.0;

/// What the radar has to resolve, in the units an engineer types them in.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RadarRequirements {
    /// m
    pub range_res: f64,
    /// m
    pub range_max: f64,
    /// km/h
    pub velocity_max: f64,
    /// km/h
    pub velocity_res: f64,
    /// degrees
    pub angular_res: f64,
    /// Chirp start frequency, GHz
    pub frequency: f64,
}

struct SweepBandwidth {
    bandwidth: f64,
    range_res: f64,
    range_max: f64,
}

struct ChirpBudget {
    chirp_time: f64,
    idle_time: f64,
    velocity_max: f64,
}

struct AngularCoverage {
    angular_res: f64,
    antennas: AntennaCount,
}

/// Derives chirp, frame and array parameters for one acquisition sample count.
///
/// All inputs are validated by [`ChirpCalculator::new`], after which
/// [`ChirpCalculator::calculate_results`] cannot fail and yields only finite values.
#[derive(Debug, Clone)]
pub struct ChirpCalculator {
    acquisition_samples: u32,
    range_res: f64,
    range_max: f64,
    velocity_max: f64,
    velocity_res_mps: f64,
    angular_res: f64,
    /// Hz
    frequency: f64,

    sampling_time: f64,
    acquisition_time: f64,
    wavelength: f64,
    /// half-wavelength element spacing
    antenna_spacing: f64,
}

fn check_input(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ChirpError::InvalidInput { name, value })
    }
}

fn check_derived(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ChirpError::DegenerateInput(name))
    }
}

impl ChirpCalculator {
    pub fn new(acquisition_samples: u32, requirements: &RadarRequirements) -> Result<Self> {
        if acquisition_samples == 0 {
            return Err(ChirpError::InvalidInput {
                name: "acquisition_samples",
                value: 0.0,
            });
        }
        let range_res = check_input("range_res", requirements.range_res)?;
        let range_max = check_input("range_max", requirements.range_max)?;
        let velocity_max = check_input("velocity_max", requirements.velocity_max)?;
        let velocity_res = check_input("velocity_res", requirements.velocity_res)?;
        let angular_res = check_input("angular_res", requirements.angular_res)?;
        let frequency = check_derived(
            "frequency",
            check_input("frequency", requirements.frequency)? * 1e9,
        )?;

        let sampling_time = 1.0 / SAMPLING_FREQ;
        let wavelength = check_derived("wavelength", SPEED_OF_LIGHT / frequency)?;

        let calculator = Self {
            acquisition_samples,
            range_res,
            range_max,
            velocity_max,
            velocity_res_mps: check_derived("velocity_res", velocity_res * KMH_TO_MPS)?,
            angular_res,
            frequency,
            sampling_time,
            acquisition_time: acquisition_samples as f64 * sampling_time,
            wavelength,
            antenna_spacing: wavelength / 2.0,
        };

        let (required_bw_rmax, required_bw_rres) = calculator.required_bandwidth();
        check_derived("required_bw_rmax", required_bw_rmax)?;
        check_derived("required_bw_rres", required_bw_rres)?;
        let budget = calculator.chirp_budget();
        check_derived("chirp_time", budget.chirp_time)?;
        let chirps_per_frame = calculator.chirps_per_frame_exact(budget.chirp_time);
        if !chirps_per_frame.is_finite() || chirps_per_frame.floor() > u32::MAX as f64 {
            return Err(ChirpError::DegenerateInput("chirps_per_frame"));
        }
        if let Some(name) = calculator.calculate_results().non_finite_field() {
            return Err(ChirpError::DegenerateInput(name));
        }

        Ok(calculator)
    }

    pub fn acquisition_samples(&self) -> u32 {
        self.acquisition_samples
    }

    pub fn sampling_time(&self) -> f64 {
        self.sampling_time
    }

    pub fn acquisition_time(&self) -> f64 {
        self.acquisition_time
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Peak IF frequency times the sampling window, shared by both range formulas.
    fn range_numerator(&self) -> f64 {
        SAMPLING_FREQ / 2.0 * SPEED_OF_LIGHT * self.acquisition_time
    }

    /// Bandwidths demanded by the maximum range and by the range resolution, Hz.
    pub fn required_bandwidth(&self) -> (f64, f64) {
        let required_bw_rmax = self.range_numerator() / (2.0 * self.range_max);
        let required_bw_rres = SPEED_OF_LIGHT / (2.0 * self.range_res);
        (required_bw_rmax, required_bw_rres)
    }

    fn sweep_bandwidth(&self) -> SweepBandwidth {
        let (required_bw_rmax, required_bw_rres) = self.required_bandwidth();
        // the wider resolution-driven bandwidth wins; keep this comparison direction
        if required_bw_rres > required_bw_rmax {
            debug!(
                "range resolution binds: {} Hz > {} Hz",
                required_bw_rres, required_bw_rmax
            );
            SweepBandwidth {
                bandwidth: required_bw_rres,
                range_res: self.range_res,
                range_max: self.range_numerator() / (2.0 * required_bw_rres),
            }
        } else {
            debug!(
                "maximum range binds: {} Hz >= {} Hz",
                required_bw_rmax, required_bw_rres
            );
            SweepBandwidth {
                bandwidth: required_bw_rmax,
                range_res: SPEED_OF_LIGHT / (2.0 * required_bw_rmax),
                range_max: self.range_max,
            }
        }
    }

    /// Start and end of the ramp, Hz. The ramp keeps rising through jumpback and settle.
    fn sweep_frequencies(&self, sweep_bandwidth: f64) -> (f64, f64) {
        let slope = sweep_bandwidth / self.acquisition_time;
        let start = self.frequency;
        let end = start + sweep_bandwidth + slope * (JUMPBACK_TIME + SETTLE_TIME);
        (start, end)
    }

    /// Shortest chirp the hardware allows: acquisition plus the fixed overheads.
    pub fn chirp_time_min(&self) -> f64 {
        self.acquisition_time + DWELL_TIME + SETTLE_TIME + RESET_TIME + JUMPBACK_TIME
    }

    fn unambiguous_velocity(&self, chirp_time: f64) -> f64 {
        (self.wavelength * 3.6) / (4.0 * chirp_time)
    }

    /// Highest unambiguous velocity (km/h), reached with the shortest chirp.
    pub fn velocity_at_min_chirp(&self) -> f64 {
        self.unambiguous_velocity(self.chirp_time_min())
    }

    fn chirp_budget(&self) -> ChirpBudget {
        let chirp_time_min = self.chirp_time_min();
        let velocity_limit = self.unambiguous_velocity(chirp_time_min);
        if self.velocity_max >= velocity_limit {
            debug!(
                "velocity limited by chirp time: {} km/h requested, {} km/h reachable",
                self.velocity_max, velocity_limit
            );
            ChirpBudget {
                chirp_time: chirp_time_min,
                idle_time: 0.0,
                velocity_max: velocity_limit,
            }
        } else {
            let chirp_time = (self.wavelength * 3.6) / (4.0 * self.velocity_max);
            ChirpBudget {
                chirp_time,
                idle_time: chirp_time - chirp_time_min,
                velocity_max: self.velocity_max,
            }
        }
    }

    fn chirps_per_frame_exact(&self, chirp_time: f64) -> f64 {
        self.wavelength / (2.0 * self.velocity_res_mps * chirp_time)
    }

    /// Chirp count and frame duration (ms). Rounds down so the frame is never too short
    /// for the requested velocity resolution.
    fn frame(&self, chirp_time: f64) -> FrameParams {
        let chirps = self.chirps_per_frame_exact(chirp_time).floor() as u32;
        FrameParams {
            time: chirps as f64 * chirp_time * 1000.0,
            chirps,
        }
    }

    /// Finest angular resolution (degrees) with the full antenna array.
    pub fn best_angular_res(&self) -> f64 {
        let elements = (MAX_TX_ANTENNAS * MAX_RX_ANTENNAS) as f64;
        self.wavelength / (self.antenna_spacing * elements * BORESIGHT.cos() * DEG_TO_RAD)
    }

    fn angular_coverage(&self) -> AngularCoverage {
        let best = self.best_angular_res();
        if self.angular_res < best {
            debug!(
                "angular resolution {} deg below array limit {} deg",
                self.angular_res, best
            );
            AngularCoverage {
                angular_res: best,
                antennas: AntennaCount {
                    tx: MAX_TX_ANTENNAS,
                    rx: MAX_RX_ANTENNAS,
                },
            }
        } else {
            let product = (self.wavelength
                / (self.antenna_spacing * self.angular_res * DEG_TO_RAD * BORESIGHT.cos()))
            .floor();
            let side = product.sqrt().ceil() as u32;
            AngularCoverage {
                angular_res: self.angular_res,
                antennas: AntennaCount { tx: side, rx: side },
            }
        }
    }

    /// IF bandwidth needed to see out to the requested range for a fixed set of
    /// chirp bandwidths. Does not depend on the sweep bandwidth picked for this case.
    pub fn if_bandwidth_table(&self) -> Vec<IfBandwidthRow> {
        let chirp_bw: Array1<u32> = (0..IF_TABLE_ROWS as u32)
            .map(|i| IF_TABLE_START_MHZ + i * IF_TABLE_STEP_MHZ)
            .collect();
        let if_bw = chirp_bw.mapv(|bw| {
            (2.0 * self.range_max * bw as f64 * 1e6) / (SPEED_OF_LIGHT * self.acquisition_time)
                / 1e6
        });
        zip_eq(&chirp_bw, &if_bw)
            .map(|(&chirp_bw, &if_bandwidth)| IfBandwidthRow {
                chirp_bw,
                if_bandwidth,
            })
            .collect()
    }

    pub fn calculate_results(&self) -> ChirpResults {
        let sweep = self.sweep_bandwidth();
        let (start, end) = self.sweep_frequencies(sweep.bandwidth);
        let budget = self.chirp_budget();
        let frame = self.frame(budget.chirp_time);
        let angular = self.angular_coverage();

        let time_of_flight = (2.0 * self.range_max) / SPEED_OF_LIGHT;
        let memory_required = frame.chirps as f64
            * (budget.chirp_time / self.sampling_time)
            * angular.antennas.rx as f64;
        let velocity_res = self.velocity_res_mps * MPS_TO_KMH;

        ChirpResults {
            requested_params: RadarParams {
                range_max: self.range_max,
                range_res: self.range_res,
                velocity_max: self.velocity_max,
                velocity_res,
                angular_res: self.angular_res,
            },
            obtained_params: RadarParams {
                range_max: sweep.range_max,
                range_res: sweep.range_res,
                velocity_max: budget.velocity_max,
                velocity_res,
                angular_res: angular.angular_res,
            },
            chirp_frequency: ChirpFrequency {
                start: start / 1e9,
                end: end / 1e9,
                center: (end - start) / 2e9 + start / 1e9,
                bandwidth: sweep.bandwidth / 1e6,
            },
            timing: ChirpTiming {
                dc_power_delay: DC_POWER_ON_DELAY * 1e6,
                dwell: DWELL_TIME * 1e6,
                settle: SETTLE_TIME * 1e6,
                acquisition: self.acquisition_time * 1e6,
                reset: RESET_TIME * 1e6,
                jumpback: JUMPBACK_TIME * 1e6,
                idle: budget.idle_time * 1e6,
                chirp: budget.chirp_time * 1e6,
            },
            frame,
            antennas: angular.antennas,
            time_of_flight: time_of_flight * 1e6,
            memory_required: memory_required / 1000.0,
            if_bandwidth_table: self.if_bandwidth_table(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} != {}",
            actual,
            expected
        );
    }

    pub(crate) fn automotive() -> RadarRequirements {
        RadarRequirements {
            range_res: 1.0,
            range_max: 100.0,
            velocity_max: 60.0,
            velocity_res: 5.0,
            angular_res: 2.0,
            frequency: 77.0,
        }
    }

    fn results(samples: u32, requirements: RadarRequirements) -> ChirpResults {
        ChirpCalculator::new(samples, &requirements)
            .unwrap()
            .calculate_results()
    }

    #[test]
    fn test_derived_state() {
        let calc = ChirpCalculator::new(1024, &automotive()).unwrap();
        assert_close(calc.sampling_time(), 2.5e-8);
        assert_close(calc.acquisition_time(), 2.56e-5);
        assert_close(calc.wavelength(), 3e8 / 77e9);
        assert!((calc.wavelength() - 3.8961e-3).abs() < 1e-7);
        let (rmax, rres) = calc.required_bandwidth();
        assert_close(rmax, 7.68e8);
        assert_close(rres, 1.5e8);
    }

    #[test]
    fn test_scenario_77ghz() {
        let r = results(1024, automotive());

        // range-driven bandwidth is larger, so range_max is met and range_res improves
        assert_eq!(r.obtained_params.range_max, 100.0);
        assert_close(r.obtained_params.range_res, 0.1953125);
        assert_close(r.chirp_frequency.bandwidth, 768.0);
        assert_close(r.chirp_frequency.start, 77.0);
        assert_close(r.chirp_frequency.end, 77.807);
        assert_close(r.chirp_frequency.center, 77.4035);

        assert_close(r.timing.acquisition, 25.6);
        assert_close(r.timing.chirp, 3e8 / 77e9 * 3.6 / 240.0 * 1e6);
        assert_close(r.timing.idle, r.timing.chirp - 29.9);
        assert_eq!(r.obtained_params.velocity_max, 60.0);

        assert!(r.frame.chirps > 0);
        assert!(r.frame.time > 0.0);
        assert_eq!(r.antennas, AntennaCount { tx: 8, rx: 8 });
        assert_close(r.time_of_flight, 2.0 / 3.0);

        assert_eq!(r.if_bandwidth_table.len(), 20);
        assert_eq!(r.if_bandwidth_table[0].chirp_bw, 200);
        assert_eq!(r.if_bandwidth_table[19].chirp_bw, 2100);
        assert_close(r.if_bandwidth_table[0].if_bandwidth, 4e10 / 7680.0 / 1e6);
    }

    #[test]
    fn test_end_frequency_includes_jumpback_and_settle() {
        let r = results(1024, automotive());
        let slope = 768e6 / 2.56e-5;
        let extension = slope * (JUMPBACK_TIME + SETTLE_TIME);
        assert_close(r.chirp_frequency.end * 1e9, 77e9 + 768e6 + extension);
        assert_close(r.chirp_frequency.full_bandwidth(), 768.0 + extension / 1e6);
    }

    #[test]
    fn test_resolution_binds() {
        let requirements = RadarRequirements {
            range_res: 0.1,
            ..automotive()
        };
        let r = results(1024, requirements);
        assert_eq!(r.obtained_params.range_res, r.requested_params.range_res);
        assert_close(r.chirp_frequency.bandwidth, 1500.0);
        assert_close(r.obtained_params.range_max, 51.2);
    }

    #[test]
    fn test_velocity_limited_by_chirp_time() {
        let requirements = RadarRequirements {
            velocity_max: 200.0,
            ..automotive()
        };
        let calc = ChirpCalculator::new(1024, &requirements).unwrap();
        let r = calc.calculate_results();
        assert_eq!(r.timing.idle, 0.0);
        assert_close(r.timing.chirp, 29.9);
        assert_eq!(r.obtained_params.velocity_max, calc.velocity_at_min_chirp());
        assert!(r.obtained_params.velocity_max < r.requested_params.velocity_max);
    }

    #[test]
    fn test_velocity_boundary_has_no_idle() {
        let limit = ChirpCalculator::new(2048, &automotive())
            .unwrap()
            .velocity_at_min_chirp();
        let requirements = RadarRequirements {
            velocity_max: limit,
            ..automotive()
        };
        let r = results(2048, requirements);
        assert_eq!(r.timing.idle, 0.0);
        assert_eq!(r.obtained_params.velocity_max, limit);
    }

    #[test]
    fn test_chirps_per_frame() {
        // not velocity limited: chirps = floor(2 * velocity_max / velocity_res)
        let requirements = RadarRequirements {
            velocity_res: 7.0,
            ..automotive()
        };
        let r = results(1024, requirements);
        assert_eq!(r.frame.chirps, 17);
        assert_close(r.frame.time, 17.0 * r.timing.chirp / 1000.0);

        let per_chirp = r.timing.chirp * 1e-6 / 2.5e-8;
        assert_close(r.memory_required, 17.0 * per_chirp * 8.0 / 1000.0);
    }

    #[test]
    fn test_antennas_below_ceiling() {
        let requirements = RadarRequirements {
            angular_res: 5.0,
            ..automotive()
        };
        let r = results(1024, requirements);
        assert_eq!(r.antennas, AntennaCount { tx: 5, rx: 5 });
        assert_eq!(r.obtained_params.angular_res, 5.0);

        let requirements = RadarRequirements {
            angular_res: 10.0,
            ..automotive()
        };
        assert_eq!(results(1024, requirements).antennas, AntennaCount { tx: 4, rx: 4 });
    }

    #[test]
    fn test_antennas_at_ceiling() {
        let best = ChirpCalculator::new(1024, &automotive())
            .unwrap()
            .best_angular_res();
        assert_close(best, 2.0 / (64.0 * DEG_TO_RAD));

        let at_best = RadarRequirements {
            angular_res: best,
            ..automotive()
        };
        assert_eq!(results(1024, at_best).antennas, AntennaCount { tx: 8, rx: 8 });

        let finer = RadarRequirements {
            angular_res: 1.0,
            ..automotive()
        };
        let r = results(1024, finer);
        assert_eq!(r.antennas, AntennaCount { tx: 8, rx: 8 });
        assert_eq!(r.obtained_params.angular_res, best);
    }

    #[test]
    fn test_if_bandwidth_table() {
        let calc = ChirpCalculator::new(512, &automotive()).unwrap();
        let table = calc.if_bandwidth_table();
        assert_eq!(table.len(), IF_TABLE_ROWS);
        for (i, row) in table.iter().enumerate() {
            assert_eq!(row.chirp_bw, (i as u32 + 2) * 100);
            let expected = 2.0 * 100.0 * row.chirp_bw as f64 * 1e6 / (3e8 * 1.28e-5) / 1e6;
            assert_close(row.if_bandwidth, expected);
        }
    }

    #[test]
    fn test_velocity_res_round_trip() {
        for velocity_res in [0.1, 1.0, 5.0, 13.7] {
            let requirements = RadarRequirements {
                velocity_res,
                ..automotive()
            };
            let r = results(1024, requirements);
            assert_close(r.requested_params.velocity_res, velocity_res);
            assert_eq!(r.obtained_params.velocity_res, r.requested_params.velocity_res);
        }
    }

    #[test]
    fn test_deterministic() {
        let calc = ChirpCalculator::new(2048, &automotive()).unwrap();
        let a = calc.calculate_results();
        let b = calc.calculate_results();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            ChirpCalculator::new(0, &automotive()).unwrap_err(),
            ChirpError::InvalidInput {
                name: "acquisition_samples",
                value: 0.0
            }
        );
        let zero_velocity_res = RadarRequirements {
            velocity_res: 0.0,
            ..automotive()
        };
        assert_eq!(
            ChirpCalculator::new(1024, &zero_velocity_res).unwrap_err(),
            ChirpError::InvalidInput {
                name: "velocity_res",
                value: 0.0
            }
        );
        let negative_range = RadarRequirements {
            range_max: -5.0,
            ..automotive()
        };
        assert!(matches!(
            ChirpCalculator::new(1024, &negative_range),
            Err(ChirpError::InvalidInput {
                name: "range_max",
                ..
            })
        ));
        let nan_frequency = RadarRequirements {
            frequency: f64::NAN,
            ..automotive()
        };
        assert!(matches!(
            ChirpCalculator::new(1024, &nan_frequency),
            Err(ChirpError::InvalidInput {
                name: "frequency",
                ..
            })
        ));
        let infinite_angle = RadarRequirements {
            angular_res: f64::INFINITY,
            ..automotive()
        };
        assert!(ChirpCalculator::new(1024, &infinite_angle).is_err());
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let overflowing = RadarRequirements {
            frequency: f64::MAX,
            ..automotive()
        };
        assert_eq!(
            ChirpCalculator::new(1024, &overflowing).unwrap_err(),
            ChirpError::DegenerateInput("frequency")
        );
        let tiny_resolution = RadarRequirements {
            range_res: 1e-310,
            ..automotive()
        };
        assert_eq!(
            ChirpCalculator::new(1024, &tiny_resolution).unwrap_err(),
            ChirpError::DegenerateInput("required_bw_rres")
        );
    }

    #[test]
    fn test_rejects_overflowing_end_frequency() {
        let fine_resolution = RadarRequirements {
            range_res: 1e-300,
            ..automotive()
        };
        assert_eq!(
            ChirpCalculator::new(1024, &fine_resolution).unwrap_err(),
            ChirpError::DegenerateInput("chirp_frequency.end")
        );
    }

    #[test]
    fn test_rejects_overflowing_if_table() {
        let far_range = RadarRequirements {
            range_max: 1e300,
            ..automotive()
        };
        assert_eq!(
            ChirpCalculator::new(1024, &far_range).unwrap_err(),
            ChirpError::DegenerateInput("if_bandwidth_table")
        );
    }

    #[test]
    fn test_rejects_chirp_count_beyond_u32() {
        let fine_velocity = RadarRequirements {
            velocity_res: 1e-9,
            ..automotive()
        };
        assert_eq!(
            ChirpCalculator::new(1024, &fine_velocity).unwrap_err(),
            ChirpError::DegenerateInput("chirps_per_frame")
        );

        // 2 * 60 / 0.001 = 120000 chirps still fits
        let fine_but_countable = RadarRequirements {
            velocity_res: 0.001,
            ..automotive()
        };
        let r = ChirpCalculator::new(1024, &fine_but_countable)
            .unwrap()
            .calculate_results();
        assert!(r.frame.chirps >= 119_999 && r.frame.chirps <= 120_000);
        assert_eq!(r.non_finite_field(), None);
    }

    #[test]
    fn test_deserialize_requirements() {
        let requirements: RadarRequirements = serde_json::from_str(
            r#"{"range_res":1,"range_max":100,"velocity_max":60,
                "velocity_res":5,"angular_res":2,"frequency":77}"#,
        )
        .unwrap();
        assert_eq!(requirements, automotive());
    }
}
