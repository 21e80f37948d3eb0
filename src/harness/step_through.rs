use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::fov::{HexFovSweep, ViewCone};
use crate::harness::regression::generate;
use crate::harness::render_level;
use crate::utils::Geometry;

/// Replay the sweep on the level generated for `seed`, drawing the map after
/// every completed cell
pub fn run_step_through<R: BufRead, W: Write>(
    config: &Config,
    seed: u64,
    geometry: Geometry,
    view_cone: Option<ViewCone>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let (level, observer) = generate(config, seed, geometry);
    writeln!(output, "Seed {} on {}, observer at {}", seed, geometry, observer)?;
    write!(output, "{}", level)?;

    let mut sweep = HexFovSweep::new(observer, &level.samples()).with_view_cone(view_cone);
    let mut pause = config.step_pause;
    let mut step = 0;
    while let Some(next) = sweep.next_offset() {
        step += 1;
        writeln!(output, "Step {}: {} ({} ray pairs)", step, next, sweep.active_pairs().count())?;
        write!(output, "{}", render_level(&level, observer, &sweep.snapshot(), Some(next)))?;
        output.flush()?;
        if pause {
            let mut line = String::new();
            // Input closed, run to the end
            if input.read_line(&mut line)? == 0 {
                pause = false;
            }
        }
        sweep
            .step()
            .with_context(|| format!("Seed {} failed at {}", seed, next))?;
    }

    let result = sweep
        .finish()
        .with_context(|| format!("Seed {} failed", seed))?;
    writeln!(output, "Final")?;
    write!(output, "{}", render_level(&level, observer, &result, None))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_one_frame_per_step() {
        let mut config = Config::default();
        config.step_pause = false;
        let geometry = Geometry {
            width: 5,
            height: 5,
        };
        let mut input: &[u8] = b"";
        let mut output = Vec::new();
        run_step_through(&config, 2, geometry, None, &mut input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Seed 2 on 5x5"));
        assert_eq!(24, text.matches("Step ").count());
        assert!(text.contains("Final"));
    }

    #[test]
    fn closed_input_stops_pausing() {
        let config = Config::default();
        let geometry = Geometry {
            width: 4,
            height: 4,
        };
        let mut input: &[u8] = b"\n";
        let mut output = Vec::new();
        run_step_through(&config, 0, geometry, None, &mut input, &mut output).unwrap();
        assert_eq!(15, String::from_utf8(output).unwrap().matches("Step ").count());
    }
}
