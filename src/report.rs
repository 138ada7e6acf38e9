use std::fmt;

use crate::cases::Case;
use crate::results::ChirpResults;

impl fmt::Display for ChirpResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let req = &self.requested_params;
        let obt = &self.obtained_params;
        writeln!(f, "Requested Parameters :\t\t\tObtained Parameters :")?;
        writeln!(f, "All parameters are based on taking IF_Max = 40 MHz")?;
        writeln!(
            f,
            "Range max = {} m\t\t\tRange max = {} m",
            req.range_max, obt.range_max
        )?;
        writeln!(
            f,
            "Range res = {} m\t\t\tRange res = {:.3} m",
            req.range_res, obt.range_res
        )?;
        writeln!(
            f,
            "Velocity max = {} km/hr\t\tVelocity max = {:.2} km/hr",
            req.velocity_max, obt.velocity_max
        )?;
        writeln!(
            f,
            "Velocity res = {:.2} km/hr\t\tVelocity res = {:.2} km/hr",
            req.velocity_res, obt.velocity_res
        )?;
        writeln!(
            f,
            "Angular res = {:.2} deg\t\t\tAngular res = {:.2} deg",
            req.angular_res, obt.angular_res
        )?;

        let freq = &self.chirp_frequency;
        writeln!(f, "\nCHIRP Frequency Parameters")?;
        writeln!(f, "\tStarting frequency = {} GHz", freq.start)?;
        writeln!(f, "\tCenter frequency = {} GHz", freq.center)?;
        writeln!(f, "\tEnding frequency = {} GHz", freq.end)?;
        writeln!(f, "\tCHIRP ADC bandwidth = {} MHz", freq.bandwidth)?;
        writeln!(f, "\tCHIRP Full bandwidth = {} MHz", freq.full_bandwidth())?;

        let t = &self.timing;
        writeln!(f, "\nCHIRP Timing Parameters :")?;
        for (name, us) in [
            ("DC power on delay time", t.dc_power_delay),
            ("Dwell time", t.dwell),
            ("Settle time", t.settle),
            ("Acquisition time", t.acquisition),
            ("Reset time", t.reset),
            ("Jumpback time", t.jumpback),
            ("Idle time", t.idle),
            ("CHIRP time", t.chirp),
        ] {
            writeln!(f, "\t{} = {:.2} us", name, us)?;
        }

        writeln!(f, "\nFrame Parameters :")?;
        writeln!(f, "\tFrame time = {:.2} ms", self.frame.time)?;
        writeln!(f, "\tNumber of chirps per frame = {}", self.frame.chirps)?;

        writeln!(f, "\nMinimum Number of Antennas :")?;
        writeln!(f, "\tTX : {}\n\tRX : {}", self.antennas.tx, self.antennas.rx)?;

        writeln!(
            f,
            "\nTime of flight to target = {:.2} us",
            self.time_of_flight
        )?;

        writeln!(
            f,
            "\nIF bandwidth corresponding to the requested range max of {}m :",
            req.range_max
        )?;
        for row in &self.if_bandwidth_table {
            writeln!(
                f,
                "\tChirp Bandwidth {} MHz : Required IF bandwidth = {} MHz",
                row.chirp_bw, row.if_bandwidth
            )?;
        }
        write!(
            f,
            "\nMemory required = {} kilobits per frame",
            self.memory_required
        )
    }
}

/// Plain-text sheet for several cases, one after another.
pub fn render_cases(cases: &[Case]) -> String {
    cases
        .iter()
        .enumerate()
        .map(|(idx, case)| {
            format!(
                "\nCase {}: Acquisition Samples = {}\n\n{}\n\n",
                idx + 1,
                case.samples,
                case.results
            )
        })
        .collect()
}
