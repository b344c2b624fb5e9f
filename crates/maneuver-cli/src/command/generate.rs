use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use maneuver_events::track::{TrackLog, TrackSample};
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::util::Output;

const CLIMB_RATES: [f64; 5] = [-40.0, -15.0, 0.0, 15.0, 40.0];
const ACCELERATIONS: [f64; 3] = [-0.5, 0.0, 0.5];
const TURN_RATES: [f64; 3] = [-3.0, 0.0, 3.0];
const MIN_LEG: u32 = 20;
const MAX_LEG: u32 = 80;
const KTS_TO_FT_PER_T: f64 = 1.687_81;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Number of data sources
    #[arg(long, default_value_t = 4)]
    sources: usize,
    /// Samples per source
    #[arg(long, default_value_t = 600)]
    samples: usize,
    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Standard deviation of the measurement noise
    #[arg(long, default_value_t = 2.0)]
    noise: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let log = generate_track_log(arg.sources, arg.samples, arg.seed, arg.noise)?;
    Output::save_json(&log, arg.output.clone())?;
    tracing::info!(
        sources = log.sources.len(),
        samples = log.total_samples(),
        seed = arg.seed,
        "synthetic track log written"
    );
    Ok(())
}

/// A leg flown with constant rates
#[derive(Debug, Clone, Copy)]
struct Maneuver {
    remaining: u32,
    climb_rate: f64,
    acceleration: f64,
    turn_rate: f64,
}

impl Maneuver {
    fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            remaining: rng.random_range(MIN_LEG..=MAX_LEG),
            climb_rate: CLIMB_RATES[rng.random_range(0..CLIMB_RATES.len())],
            acceleration: ACCELERATIONS[rng.random_range(0..ACCELERATIONS.len())],
            turn_rate: TURN_RATES[rng.random_range(0..TURN_RATES.len())],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AircraftState {
    pos_x: f64,
    pos_y: f64,
    alt: f64,
    speed: f64,
    heading: f64,
}

impl AircraftState {
    fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            pos_x: 0.0,
            pos_y: 0.0,
            alt: rng.random_range(5_000.0..30_000.0),
            speed: rng.random_range(180.0..320.0),
            heading: rng.random_range(0.0..360.0),
        }
    }

    fn advance(&mut self, maneuver: &Maneuver) {
        self.alt = (self.alt + maneuver.climb_rate).max(0.0);
        self.speed = (self.speed + maneuver.acceleration).clamp(120.0, 450.0);
        self.heading = (self.heading + maneuver.turn_rate).rem_euclid(360.0);
        let distance = self.speed * KTS_TO_FT_PER_T;
        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.pos_x += distance * sin;
        self.pos_y += distance * cos;
    }
}

/// Generates `num_sources` sources of `samples` samples each.
///
/// Every source flies a sequence of random constant-rate legs; each
/// measurement gets independent Gaussian noise. The output depends only
/// on the arguments.
fn generate_track_log(
    num_sources: usize,
    samples: usize,
    seed: u64,
    noise: f64,
) -> anyhow::Result<TrackLog> {
    anyhow::ensure!(
        noise.is_finite() && noise >= 0.0,
        "Noise level must be a non-negative number, got {noise}"
    );
    let noise =
        Normal::new(0.0, noise).with_context(|| format!("Invalid noise level: {noise}"))?;
    let samples = i64::try_from(samples).context("Too many samples")?;
    let mut rng = Pcg32::seed_from_u64(seed);

    let sources = (0..num_sources)
        .map(|i| {
            let source = format!("SIM{i:03}");
            (source, generate_source(&mut rng, samples, noise))
        })
        .collect::<BTreeMap<_, _>>();
    Ok(TrackLog {
        recorded_at: None,
        sources,
    })
}

fn generate_source<R>(rng: &mut R, samples: i64, noise: Normal<f64>) -> Vec<TrackSample>
where
    R: Rng + ?Sized,
{
    let mut state = AircraftState::random(rng);
    let mut maneuver = Maneuver::random(rng);
    let mut track = Vec::new();
    for t in 0..samples {
        if maneuver.remaining == 0 {
            maneuver = Maneuver::random(rng);
        }
        maneuver.remaining -= 1;
        state.advance(&maneuver);
        track.push(TrackSample {
            t,
            pos_x: Some(state.pos_x + rng.sample(noise)),
            pos_y: Some(state.pos_y + rng.sample(noise)),
            alt: Some(state.alt + rng.sample(noise)),
            speed: Some(state.speed + rng.sample(noise)),
            heading: Some((state.heading + rng.sample(noise)).rem_euclid(360.0)),
        });
    }
    track
}

#[cfg(test)]
mod tests {
    use maneuver_events::{
        config::PipelineConfig, field::TrackedField, pipeline::EventPipeline,
    };

    use super::*;

    #[test]
    fn test_same_seed_same_log() {
        let a = generate_track_log(3, 200, 42, 1.5).unwrap();
        let b = generate_track_log(3, 200, 42, 1.5).unwrap();
        let c = generate_track_log(3, 200, 43, 1.5).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shape() {
        let log = generate_track_log(2, 150, 7, 0.0).unwrap();
        assert_eq!(
            log.sources.keys().collect::<Vec<_>>(),
            vec!["SIM000", "SIM001"]
        );
        for track in log.sources.values() {
            assert_eq!(track.len(), 150);
            assert!(track.windows(2).all(|w| w[0].t + 1 == w[1].t));
            for field in TrackedField::ALL {
                assert!(track.iter().all(|s| s.value(field).is_some()));
            }
            assert!(track.iter().all(|s| (0.0..360.0).contains(&s.heading.unwrap())));
        }
    }

    #[test]
    fn test_rejects_negative_noise() {
        assert!(generate_track_log(1, 10, 0, -1.0).is_err());
        assert!(generate_track_log(1, 10, 0, f64::NAN).is_err());
        assert!(generate_track_log(1, 10, 0, f64::INFINITY).is_err());
        assert!(generate_track_log(1, 10, 0, 0.0).is_ok());
    }

    #[test]
    fn test_generated_log_classifies() {
        let log = generate_track_log(2, 300, 1, 2.0).unwrap();
        let pipeline = EventPipeline::new(PipelineConfig::default()).unwrap();
        for signal in log.signals(TrackedField::Altitude).into_values() {
            let analysis = pipeline.run(&signal.unwrap()).unwrap();
            assert_eq!(analysis.feature.len(), 299);
            assert!(!analysis.classification.classes().is_empty());
            assert!(analysis.classification.classes().len() <= 6);
        }
    }
}
