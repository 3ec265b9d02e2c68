// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Initial pulse shape generation.
//!
//! The optimizer needs a starting amplitude array; the shape selector
//! mirrors the demonstration's initial-pulse-type option. All shapes are
//! produced in [−0.5, 0.5] and then transformed by `scaling` and `offset`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Initial pulse shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PulseType {
    /// Uniform random amplitudes
    #[default]
    Rnd,
    /// All-zero pulse
    Zero,
    /// Linear ramp
    Lin,
    /// Sine wave, phase-shifted per control
    Sine,
    /// Square wave
    Square,
    /// Sawtooth
    Saw,
}

impl fmt::Display for PulseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PulseType::Rnd => "RND",
            PulseType::Zero => "ZERO",
            PulseType::Lin => "LIN",
            PulseType::Sine => "SINE",
            PulseType::Square => "SQUARE",
            PulseType::Saw => "SAW",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PulseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RND" => Ok(PulseType::Rnd),
            "ZERO" => Ok(PulseType::Zero),
            "LIN" => Ok(PulseType::Lin),
            "SINE" => Ok(PulseType::Sine),
            "SQUARE" => Ok(PulseType::Square),
            "SAW" => Ok(PulseType::Saw),
            other => Err(format!(
                "unknown pulse type '{}' (expected RND, ZERO, LIN, SINE, SQUARE or SAW)",
                other
            )),
        }
    }
}

/// Generator for initial amplitude arrays.
#[derive(Debug, Clone)]
pub struct PulseGenerator {
    pub pulse_type: PulseType,
    pub scaling: f64,
    pub offset: f64,
    pub seed: Option<u64>,
}

impl Default for PulseGenerator {
    fn default() -> Self {
        Self {
            pulse_type: PulseType::Rnd,
            scaling: 1.0,
            offset: 0.0,
            seed: None,
        }
    }
}

impl PulseGenerator {
    pub fn new(pulse_type: PulseType) -> Self {
        Self {
            pulse_type,
            ..Self::default()
        }
    }

    /// Generate a `num_tslots × num_ctrls` amplitude array.
    pub fn generate(&self, num_tslots: usize, num_ctrls: usize) -> Array2<f64> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let n = num_tslots as f64;

        let shape = |k: usize, j: usize, rng: &mut StdRng| -> f64 {
            match self.pulse_type {
                PulseType::Zero => 0.0,
                PulseType::Rnd => rng.random::<f64>() - 0.5,
                PulseType::Lin => {
                    if num_tslots == 1 {
                        0.0
                    } else {
                        k as f64 / (n - 1.0) - 0.5
                    }
                }
                PulseType::Sine => {
                    let phase = j as f64 * PI / (2.0 * num_ctrls.max(1) as f64);
                    0.5 * (2.0 * PI * (k as f64 + 0.5) / n + phase).sin()
                }
                PulseType::Square => {
                    if (k as f64) < n / 2.0 {
                        0.5
                    } else {
                        -0.5
                    }
                }
                PulseType::Saw => {
                    // Two periods over the pulse.
                    let frac = (2.0 * k as f64 / n).fract();
                    frac - 0.5
                }
            }
        };

        Array2::from_shape_fn((num_tslots, num_ctrls), |(k, j)| {
            shape(k, j, &mut rng) * self.scaling + self.offset
        })
    }
}
