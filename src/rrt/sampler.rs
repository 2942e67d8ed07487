use rand::prelude::*;
use rand_distr::Uniform;

use crate::geometry::{Bounds, Point};

/// Uniform sampler over the workspace. There is no goal bias.
pub struct Sampler {
    rng: StdRng,
    x_distr: Uniform<f64>,
    y_distr: Uniform<f64>,
}

impl Sampler {
    pub fn new(bounds: &Bounds, seed: Option<u64>) -> anyhow::Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let x_distr = Uniform::new_inclusive(0.0, bounds.width)
            .map_err(|e| anyhow::anyhow!("Cannot sample x in [0, {}]: {e}", bounds.width))?;
        let y_distr = Uniform::new_inclusive(0.0, bounds.height)
            .map_err(|e| anyhow::anyhow!("Cannot sample y in [0, {}]: {e}", bounds.height))?;
        Ok(Self {
            rng,
            x_distr,
            y_distr,
        })
    }

    pub fn sample(&mut self) -> Point {
        Point::new(self.rng.sample(&self.x_distr), self.rng.sample(&self.y_distr))
    }

    /// Generator shared with the obstacle spawner so a seed covers the whole run.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
