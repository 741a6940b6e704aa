use std::io::{self, Write};

use crate::sim::Telemetry;

/// Write step telemetry in CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z, tilt_deg,
///          ground_hit, ground_distance, predicted_hit, predicted_distance,
///          height_response, att_x, att_y, att_z, total_throttle
pub fn write_telemetry<W: Write>(writer: &mut W, telemetry: &[Telemetry]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,tilt_deg,\
         ground_hit,ground_distance,predicted_hit,predicted_distance,\
         height_response,att_x,att_y,att_z,total_throttle"
    )?;

    for f in telemetry {
        let s = &f.state;
        let o = &f.output;
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.3},\
             {},{:.4},{},{:.4},\
             {:.3},{:.6},{:.6},{:.6},{:.3}",
            s.time,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
            s.tilt().to_degrees(),
            o.ground.hit as u8, o.ground.distance,
            o.prediction.hit as u8, o.prediction.distance,
            o.height_response,
            o.attitude_response.x, o.attitude_response.y, o.attitude_response.z,
            o.total_throttle(),
        )?;
    }

    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_telemetry_file(path: &str, telemetry: &[Telemetry]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_telemetry(&mut file, telemetry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::BodyState;
    use crate::gnc::ControlOutput;
    use nalgebra::Vector3;

    #[test]
    fn csv_output_has_header_and_rows() {
        let telemetry = vec![
            Telemetry {
                state: BodyState::at_rest(Vector3::new(0.0, 1.5, 0.0)),
                output: ControlOutput::default(),
            },
            Telemetry {
                state: BodyState { time: 0.02, ..BodyState::at_rest(Vector3::new(0.0, 1.49, 0.0)) },
                output: ControlOutput { height_response: 20.0, ..ControlOutput::default() },
            },
        ];

        let mut buf = Vec::new();
        write_telemetry(&mut buf, &telemetry).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert_eq!(lines[0].split(',').count(), lines[2].split(',').count());
    }
}
