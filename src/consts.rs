//! Physical and hardware constants of the radar front end.
//!
//! Times are in seconds and frequencies in hertz unless the name says otherwise.

/// ADC sampling rate. Half of it bounds the usable IF bandwidth.
pub const SAMPLING_FREQ: f64 = 40e6;

/// Speed of light in m/s.
pub const SPEED_OF_LIGHT: f64 = 3e8;

/// Hardware ceiling on transmit antennas.
pub const MAX_TX_ANTENNAS: u32 = 8;
/// Hardware ceiling on receive antennas.
pub const MAX_RX_ANTENNAS: u32 = 8;

pub const DWELL_TIME: f64 = 2e-6;
pub const SETTLE_TIME: f64 = 1e-6;
pub const RESET_TIME: f64 = 1e-6;
pub const JUMPBACK_TIME: f64 = 0.3e-6;

/// Startup delay of the synthesizer. Reported only, it does not enter the chirp budget.
pub const DC_POWER_ON_DELAY: f64 = 2e-6;

/// Acquisition sample counts evaluated side by side for one set of requirements.
pub const ACQUISITION_SAMPLE_CASES: [u32; 3] = [512, 1024, 2048];

/// Rows of the IF bandwidth reference table.
pub const IF_TABLE_ROWS: usize = 20;
/// First chirp bandwidth of the IF table, MHz.
pub const IF_TABLE_START_MHZ: u32 = 200;
/// Chirp bandwidth step between IF table rows, MHz.
pub const IF_TABLE_STEP_MHZ: u32 = 100;

pub(crate) const KMH_TO_MPS: f64 = 5.0 / 18.0;
pub(crate) const MPS_TO_KMH: f64 = 18.0 / 5.0;
