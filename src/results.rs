use serde::Serialize;

/// Range, velocity and angle figures, either as requested or as the chirp achieves them.
///
/// Ranges in m, velocities in km/h, angles in degrees.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RadarParams {
    pub range_max: f64,
    pub range_res: f64,
    pub velocity_max: f64,
    pub velocity_res: f64,
    pub angular_res: f64,
}

/// Frequencies in GHz, bandwidth in MHz.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ChirpFrequency {
    pub start: f64,
    pub end: f64,
    pub center: f64,
    /// ADC bandwidth, the part of the sweep inside the acquisition window
    pub bandwidth: f64,
}

impl ChirpFrequency {
    /// Whole ramp from start to end, MHz.
    pub fn full_bandwidth(&self) -> f64 {
        (self.end - self.start) * 1e3
    }
}

/// Phases of one chirp, all in µs.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ChirpTiming {
    pub dc_power_delay: f64,
    pub dwell: f64,
    pub settle: f64,
    pub acquisition: f64,
    pub reset: f64,
    pub jumpback: f64,
    pub idle: f64,
    pub chirp: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// ms
    pub time: f64,
    pub chirps: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntennaCount {
    pub tx: u32,
    pub rx: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct IfBandwidthRow {
    /// MHz
    pub chirp_bw: u32,
    /// MHz
    pub if_bandwidth: f64,
}

/// Everything derived from one set of requirements at one acquisition sample count.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChirpResults {
    pub requested_params: RadarParams,
    pub obtained_params: RadarParams,
    pub chirp_frequency: ChirpFrequency,
    pub timing: ChirpTiming,
    pub frame: FrameParams,
    pub antennas: AntennaCount,
    /// µs
    pub time_of_flight: f64,
    /// kilobits per frame
    pub memory_required: f64,
    pub if_bandwidth_table: Vec<IfBandwidthRow>,
}

impl ChirpResults {
    /// Name of the first value that is NaN or infinite, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let req = &self.requested_params;
        let obt = &self.obtained_params;
        let freq = &self.chirp_frequency;
        let t = &self.timing;
        let scalars = [
            ("requested_params.range_max", req.range_max),
            ("requested_params.range_res", req.range_res),
            ("requested_params.velocity_max", req.velocity_max),
            ("requested_params.velocity_res", req.velocity_res),
            ("requested_params.angular_res", req.angular_res),
            ("obtained_params.range_max", obt.range_max),
            ("obtained_params.range_res", obt.range_res),
            ("obtained_params.velocity_max", obt.velocity_max),
            ("obtained_params.velocity_res", obt.velocity_res),
            ("obtained_params.angular_res", obt.angular_res),
            ("chirp_frequency.start", freq.start),
            ("chirp_frequency.end", freq.end),
            ("chirp_frequency.center", freq.center),
            ("chirp_frequency.bandwidth", freq.bandwidth),
            ("timing.acquisition", t.acquisition),
            ("timing.idle", t.idle),
            ("timing.chirp", t.chirp),
            ("frame.time", self.frame.time),
            ("time_of_flight", self.time_of_flight),
            ("memory_required", self.memory_required),
        ];
        scalars
            .iter()
            .find(|(_, value)| !value.is_finite())
            .map(|&(name, _)| name)
            .or_else(|| {
                self.if_bandwidth_table
                    .iter()
                    .any(|row| !row.if_bandwidth.is_finite())
                    .then_some("if_bandwidth_table")
            })
    }
}
