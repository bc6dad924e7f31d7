/// Depth range partitioning between the foreground and the skybox.
///
/// Depth is zero-to-one and reversed: greater values are nearer and win the
/// depth test. The foreground owns `[split, 1]`, the skybox owns
/// `[0, split - 1ulp]`. Every value the skybox can write is strictly less than
/// every value the foreground can write, so a skybox fragment never beats
/// foreground geometry and the two ranges never tie.

use crate::error::{Error, Result};

/// Closed depth interval handed to the rasterizer viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub min: f32,
    pub max: f32,
}

impl DepthRange {
    pub const FULL: DepthRange = DepthRange { min: 0.0, max: 1.0 };

    /// Window-space depth written for a normalized device depth in `[0, 1]`.
    pub fn map(&self, ndc_depth: f32) -> f32 {
        let d = ndc_depth.clamp(0.0, 1.0);
        (self.min + d * (self.max - self.min)).clamp(self.min, self.max)
    }

    pub fn contains(&self, depth: f32) -> bool {
        depth >= self.min && depth <= self.max
    }
}

/// The two disjoint depth sub-ranges used by the draw sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPartition {
    foreground: DepthRange,
    skybox: DepthRange,
}

impl DepthPartition {
    /// Split the depth domain at `split`, which must lie strictly inside `(0, 1)`.
    pub fn new(split: f32) -> Result<Self> {
        if !(split > 0.0 && split < 1.0) {
            return Err(Error::InvalidResource(format!(
                "depth split must be inside (0, 1), got {}",
                split
            )));
        }

        // Largest f32 below `split`; split is positive and finite here.
        let below = f32::from_bits(split.to_bits() - 1);

        Ok(Self {
            foreground: DepthRange { min: split, max: 1.0 },
            skybox: DepthRange { min: 0.0, max: below },
        })
    }

    /// Upper (nearer) sub-range for the main scene.
    pub fn foreground(&self) -> DepthRange {
        self.foreground
    }

    /// Lower (farther) sub-range for the skybox scene.
    pub fn skybox(&self) -> DepthRange {
        self.skybox
    }
}

#[cfg(test)]
#[path = "depth_partition_tests.rs"]
mod tests;
