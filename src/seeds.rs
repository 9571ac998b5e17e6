//! Seed management for world generation
//!
//! Every phase that needs fresh noise or randomness draws from its own seed,
//! derived deterministically from one 32-bit base seed so the whole world is
//! reproducible from a single integer.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all world generation phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Base seed (the value saved with the world parameters)
    pub base: u32,
    /// Elevation octave noise
    pub elevation: u32,
    /// Random-walk seam placement
    pub seams: u64,
    /// Wind direction perturbation noise
    pub wind_direction: u32,
    /// Wind strength noise
    pub wind_strength: u32,
    /// Temperature distortion noise
    pub temperature: u32,
    /// River source shuffle
    pub rivers: u64,
    /// Rainfall noise
    pub rainfall: u32,
}

impl WorldSeeds {
    /// Derive all phase seeds from the base seed.
    pub fn from_base(base: u32) -> Self {
        Self {
            base,
            elevation: derive_seed(base, "elevation") as u32,
            seams: derive_seed(base, "seams"),
            wind_direction: derive_seed(base, "wind_direction") as u32,
            wind_strength: derive_seed(base, "wind_strength") as u32,
            temperature: derive_seed(base, "temperature") as u32,
            rivers: derive_seed(base, "rivers"),
            rainfall: derive_seed(base, "rainfall") as u32,
        }
    }
}

/// Derive a sub-seed from the base seed and a phase name.
fn derive_seed(base: u32, phase: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    phase.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ base: {}, elevation: {}, seams: {}, wind_direction: {}, \
             wind_strength: {}, temperature: {}, rivers: {}, rainfall: {} }}",
            self.base,
            self.elevation,
            self.seams,
            self.wind_direction,
            self.wind_strength,
            self.temperature,
            self.rivers,
            self.rainfall,
        )
    }
}
