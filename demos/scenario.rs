//! Runs a scenario file and prints a text trace of the field.
//!
//! ```text
//! cargo run --example scenario -- demos/scenarios/string.yaml
//! ```

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;

use fdm_wave::{Dimension, ScenarioConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/scenarios/string.yaml".to_string());
    let reader = BufReader::new(File::open(&path)?);
    let config: ScenarioConfig = serde_yaml::from_reader(reader)?;

    let sim = config.build()?;
    let history = sim.run();

    // ten frames spread over the run
    let speed = (history.len() as f64 / 10.).max(1.);
    for k in 0..history.frame_count(speed) {
        let frame = match history.frame(k, speed) {
            Some(frame) => frame,
            None => break,
        };
        let peak = history.max_abs_at(frame.index);
        match history.grid().dimension() {
            Dimension::One => {
                let line: String = history
                    .line(frame.index)
                    .iter()
                    .step_by(4)
                    .map(|&u| shade(u))
                    .collect();
                println!("t = {:7.3}  |{}|  max {:.3}", frame.time, line, peak);
            }
            Dimension::Two => {
                let n = history.grid().points_per_axis();
                let mid = history.plane(frame.index).row(n / 2).to_owned();
                let line: String = mid.iter().step_by(2).map(|&u| shade(u)).collect();
                println!("t = {:7.3}  |{}|  max {:.3}", frame.time, line, peak);
            }
        }
    }
    Ok(())
}

fn shade(u: f64) -> char {
    match u {
        u if u > 0.5 => '#',
        u if u > 0.1 => '+',
        u if u < -0.5 => '=',
        u if u < -0.1 => '-',
        _ => ' ',
    }
}
