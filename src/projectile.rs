//! A projectile launched over flat ground, sampled from launch to impact.
//!
//! Motion is closed form under constant acceleration:
//! `s(t) = s0 + v0 t + a t² / 2` and `v(t) = v0 + a t`. The ground is `y = 0`
//! and potential energy is measured from it.

use std::f64::consts::FRAC_PI_4;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{Result, TransformError};
use crate::export;
use crate::library::Vector2;

/// Standard gravity in m/s²
pub const GRAVITY: f64 = 9.81;

/// Initial conditions of a throw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    /// Launch point in metres
    pub origin: Vector2,
    /// Launch speed in m/s
    pub speed: f64,
    /// Elevation above the horizontal, in radians
    pub angle: f64,
    /// Constant acceleration; the vertical part must point down
    pub acceleration: Vector2,
    pub mass: f64,
    /// Time steps between launch and impact
    pub samples: usize,
}

impl Default for Launch {
    fn default() -> Self {
        Launch {
            origin: [0.0, 0.0],
            speed: 50.0,
            angle: FRAC_PI_4,
            acceleration: [0.0, -GRAVITY],
            mass: 1.0,
            samples: 100,
        }
    }
}

impl Launch {
    pub fn new(speed: f64, angle: f64) -> Launch {
        Launch {
            speed,
            angle,
            ..Launch::default()
        }
    }

    pub fn initial_velocity(&self) -> Vector2 {
        let (sin, cos) = self.angle.sin_cos();
        [self.speed * cos, self.speed * sin]
    }

    fn gravity(&self) -> f64 {
        -self.acceleration[1]
    }

    pub fn position_at(&self, t: f64) -> Vector2 {
        let v0 = self.initial_velocity();
        let [x0, y0] = self.origin;
        let [ax, ay] = self.acceleration;
        [x0 + v0[0] * t + ax * t * t / 2.0, y0 + v0[1] * t + ay * t * t / 2.0]
    }

    pub fn velocity_at(&self, t: f64) -> Vector2 {
        let [vx, vy] = self.initial_velocity();
        [vx + self.acceleration[0] * t, vy + self.acceleration[1] * t]
    }

    /// Kinetic plus potential energy at time `t`.
    pub fn energy_at(&self, t: f64) -> f64 {
        let [vx, vy] = self.velocity_at(t);
        let height = self.position_at(t)[1];
        self.mass * (vx * vx + vy * vy) / 2.0 + self.mass * self.gravity() * height
    }

    /// Time until the projectile is back on the ground.
    pub fn flight_time(&self) -> f64 {
        let g = self.gravity();
        let vy = self.initial_velocity()[1];
        (vy + (vy * vy + 2.0 * g * self.origin[1]).sqrt()) / g
    }

    /// Time of the highest point; `0` when the throw starts level or downward.
    pub fn apogee_time(&self) -> f64 {
        (self.initial_velocity()[1] / self.gravity()).max(0.0)
    }

    fn validate(&self) -> Result<()> {
        if !(self.gravity() > 0.0) {
            return Err(TransformError::invalid("acceleration", "vertical component must point down"));
        }
        if !(self.mass > 0.0) {
            return Err(TransformError::invalid("mass", "must be positive"));
        }
        if !(self.speed >= 0.0) {
            return Err(TransformError::invalid("speed", "must not be negative"));
        }
        if !self.angle.is_finite() {
            return Err(TransformError::invalid("angle", "must be finite"));
        }
        if !(self.origin[1] >= 0.0) {
            return Err(TransformError::invalid("origin", "launch point is below the ground"));
        }
        if self.samples == 0 {
            return Err(TransformError::invalid("samples", "need at least one time step"));
        }
        if !(self.flight_time() > 0.0) {
            return Err(TransformError::invalid("angle", "projectile never leaves the ground"));
        }
        Ok(())
    }

    /// Samples the flight at `samples + 1` evenly spaced times, launch and impact included.
    pub fn simulate(&self) -> Result<Trajectory> {
        self.validate()?;
        let total_time = self.flight_time();
        let delta_t = total_time / self.samples as f64;

        let mut series = FlightSeries::default();
        for i in 0..=self.samples {
            let t = if i == self.samples { total_time } else { delta_t * i as f64 };
            let [x, y] = self.position_at(t);
            let [vx, vy] = self.velocity_at(t);
            series.time.push(t);
            series.position_x.push(x);
            series.position_y.push(y);
            series.velocity_x.push(vx);
            series.velocity_y.push(vy);
        }

        let apogee_time = self.apogee_time();
        let [vx, vy] = self.velocity_at(total_time);
        let metadata = FlightSummary {
            total_time,
            delta_t,
            apogee_time,
            h_max: self.position_at(apogee_time)[1],
            mass: self.mass,
            energy_initial: self.energy_at(0.0),
            energy_final: self.energy_at(total_time),
            impact_angle: vy.atan2(vx).to_degrees(),
        };
        info!(
            total_time,
            h_max = metadata.h_max,
            samples = series.time.len(),
            "simulated projectile flight"
        );
        Ok(Trajectory {
            metadata,
            time_series: series,
        })
    }
}

/// Scalar results of one flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightSummary {
    pub total_time: f64,
    pub delta_t: f64,
    pub apogee_time: f64,
    pub h_max: f64,
    pub mass: f64,
    pub energy_initial: f64,
    pub energy_final: f64,
    /// Angle of the velocity at impact against the horizontal, in degrees
    pub impact_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlightSeries {
    pub time: Vec<f64>,
    pub position_x: Vec<f64>,
    pub position_y: Vec<f64>,
    pub velocity_x: Vec<f64>,
    pub velocity_y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub metadata: FlightSummary,
    pub time_series: FlightSeries,
}

impl Trajectory {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        export::write_json(self, path.as_ref())
    }
}
