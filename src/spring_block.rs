//! A projectile that sticks to a block resting on a spring.
//!
//! The hit is perfectly inelastic, so momentum carries over and the pair
//! leaves the equilibrium point at the shared velocity. From there the block
//! is a simple harmonic oscillator with `ω = √(k / (m1 + m2))`.

use std::f64::consts::TAU;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{Result, TransformError};
use crate::export;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub projectile_mass: f64,
    pub projectile_velocity: f64,
    pub block_mass: f64,
    pub block_velocity: f64,
    /// Spring constant in N/m
    pub spring_constant: f64,
    pub cycles: usize,
    pub samples_per_cycle: usize,
}

impl Default for Collision {
    fn default() -> Self {
        Collision {
            projectile_mass: 2.0,
            projectile_velocity: 10.0,
            block_mass: 1.0,
            block_velocity: 0.0,
            spring_constant: 50.0,
            cycles: 5,
            samples_per_cycle: 20,
        }
    }
}

impl Collision {
    fn validate(&self) -> Result<()> {
        if !(self.projectile_mass > 0.0) || !(self.block_mass > 0.0) {
            return Err(TransformError::invalid("mass", "both bodies need a positive mass"));
        }
        if !(self.spring_constant > 0.0) {
            return Err(TransformError::invalid("spring constant", "must be positive"));
        }
        if !self.projectile_velocity.is_finite() || !self.block_velocity.is_finite() {
            return Err(TransformError::invalid("velocity", "must be finite"));
        }
        if self.cycles == 0 || self.samples_per_cycle == 0 {
            return Err(TransformError::invalid("samples", "need at least one cycle and one sample"));
        }
        Ok(())
    }

    /// Resolves the collision and samples `cycles * samples_per_cycle` points of
    /// the oscillation, starting at the instant of impact.
    pub fn simulate(&self) -> Result<Oscillation> {
        self.validate()?;
        let mass = self.projectile_mass + self.block_mass;
        let velocity =
            (self.projectile_mass * self.projectile_velocity + self.block_mass * self.block_velocity) / mass;
        let kinetic_energy = mass * velocity * velocity / 2.0;
        let w = (self.spring_constant / mass).sqrt();
        let period = TAU / w;

        let info = SystemInfo {
            velocity_at_collision: velocity,
            kinetic_energy,
            amplitude: (2.0 * kinetic_energy / self.spring_constant).sqrt(),
            w,
            mass,
            k: self.spring_constant,
            period,
            frequency: 1.0 / period,
            total_time: self.cycles as f64 * period,
        };

        let delta_t = period / self.samples_per_cycle as f64;
        let mut series = OscillationSeries::default();
        for i in 0..self.cycles * self.samples_per_cycle {
            let t = delta_t * i as f64;
            let (sin, cos) = (w * t).sin_cos();
            // x(0) = 0 and v(0) = velocity: the pair starts at equilibrium
            let x = velocity / w * sin;
            let v = velocity * cos;
            let kinetic = mass * v * v / 2.0;
            let potential = self.spring_constant * x * x / 2.0;
            series.time.push(t);
            series.position.push(x);
            series.velocity.push(v);
            series.acceleration.push(-w * w * x);
            series.kinetic_energy.push(kinetic);
            series.potential_energy.push(potential);
            series.total_energy.push(kinetic + potential);
        }

        info!(
            w,
            period,
            amplitude = info.amplitude,
            samples = series.time.len(),
            "simulated mass-spring oscillation"
        );
        Ok(Oscillation {
            system_info: info,
            oscillation_info: series,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemInfo {
    pub velocity_at_collision: f64,
    pub kinetic_energy: f64,
    pub amplitude: f64,
    /// Angular frequency in rad/s
    pub w: f64,
    /// Combined mass after the hit
    pub mass: f64,
    pub k: f64,
    pub period: f64,
    pub frequency: f64,
    pub total_time: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OscillationSeries {
    pub time: Vec<f64>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub kinetic_energy: Vec<f64>,
    pub potential_energy: Vec<f64>,
    pub total_energy: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Oscillation {
    pub system_info: SystemInfo,
    pub oscillation_info: OscillationSeries,
}

impl Oscillation {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        export::write_json(self, path.as_ref())
    }
}
