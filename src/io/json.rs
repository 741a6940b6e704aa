use std::io::{self, Write};

use serde::Serialize;

use crate::sim::event::{EventKind, SimEvent};
use crate::sim::Telemetry;

/// Summary statistics computed from a run's telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    #[serde(rename = "max_height_m")]
    pub max_height: f64,
    #[serde(rename = "max_height_time_s")]
    pub max_height_time: f64,
    #[serde(rename = "max_speed_ms")]
    pub max_speed: f64,
    pub max_tilt_deg: f64,
    #[serde(rename = "final_height_m")]
    pub final_height: f64,
    #[serde(rename = "flight_time_s")]
    pub flight_time: f64,
    pub liftoffs: usize,
    pub touchdowns: usize,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    craft: &'a str,
    performance: &'a FlightSummary,
}

impl FlightSummary {
    /// Compute summary from telemetry and detected events.
    /// Heights are ground-sensor distances; misses are skipped.
    pub fn from_telemetry(telemetry: &[Telemetry], events: &[SimEvent]) -> Self {
        let (max_height, max_height_time) = telemetry
            .iter()
            .filter(|f| f.output.ground.hit)
            .map(|f| (f.output.ground.distance, f.state.time))
            .fold((0.0_f64, 0.0_f64), |acc, x| if x.0 > acc.0 { x } else { acc });

        let max_speed = telemetry
            .iter()
            .map(|f| f.state.vel.norm())
            .fold(0.0_f64, f64::max);

        let max_tilt_deg = telemetry
            .iter()
            .map(|f| f.state.tilt().to_degrees())
            .fold(0.0_f64, f64::max);

        let (final_height, flight_time) = telemetry
            .last()
            .map_or((0.0, 0.0), |f| (f.output.ground.distance, f.state.time));

        let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

        FlightSummary {
            max_height,
            max_height_time,
            max_speed,
            max_tilt_deg,
            final_height,
            flight_time,
            liftoffs: count(EventKind::Liftoff),
            touchdowns: count(EventKind::Touchdown),
        }
    }
}

/// Write flight summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    craft_name: &str,
    summary: &FlightSummary,
) -> io::Result<()> {
    let doc = SummaryDocument { craft: craft_name, performance: summary };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: &str, craft_name: &str, summary: &FlightSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, craft_name, summary)
}
