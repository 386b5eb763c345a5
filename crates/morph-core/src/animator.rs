//! Per-frame particle integration.
//!
//! Positions either ease toward a target (converge/diverge) or, in the finale,
//! follow a velocity field through a launch and an explosion phase.

use crate::constants::*;
use crate::gesture::Gesture;
use crate::stage::Stage;
use crate::MorphError;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Struct-of-arrays particle storage. All three arrays always share one length.
#[derive(Clone, Debug)]
pub struct ParticleField {
    current: Vec<Vec3>,
    target: Vec<Vec3>,
    velocity: Vec<Vec3>,
}

impl ParticleField {
    /// Start with every particle resting on its target.
    pub fn from_target(target: Vec<Vec3>) -> Result<Self, MorphError> {
        if target.is_empty() {
            return Err(MorphError::EmptyField);
        }
        Ok(Self {
            current: target.clone(),
            velocity: vec![Vec3::ZERO; target.len()],
            target,
        })
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn current(&self) -> &[Vec3] {
        &self.current
    }

    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    pub fn velocity(&self) -> &[Vec3] {
        &self.velocity
    }

    /// Overwrite (not merge) the target positions.
    pub fn set_target(&mut self, target: &[Vec3]) -> Result<(), MorphError> {
        if target.len() != self.target.len() {
            return Err(MorphError::LengthMismatch {
                expected: self.target.len(),
                actual: target.len(),
            });
        }
        self.target.copy_from_slice(target);
        Ok(())
    }

    /// Copy current positions into a renderer buffer of `3 * len` floats.
    pub fn write_positions(&self, out: &mut [f32]) -> bool {
        let flat: &[f32] = bytemuck::cast_slice(self.current.as_slice());
        if out.len() != flat.len() {
            return false;
        }
        out.copy_from_slice(flat);
        true
    }

    fn clear_velocity(&mut self) {
        self.velocity.fill(Vec3::ZERO);
    }
}

#[derive(Clone, Debug)]
pub struct FinaleParams {
    pub launch_duration: f32,
    pub burst_window_end: f32,
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    pub launch_drift: f32,
    pub gravity: f32,
    pub burst_spread_rate: f32,
    pub burst_damp_rate: f32,
    pub horizontal_speed_scale: f32,
    pub floor_y: f32,
    pub floor_friction: f32,
}

impl Default for FinaleParams {
    fn default() -> Self {
        Self {
            launch_duration: LAUNCH_DURATION_SEC,
            burst_window_end: BURST_WINDOW_END_SEC,
            launch_speed_min: LAUNCH_SPEED_MIN,
            launch_speed_max: LAUNCH_SPEED_MAX,
            launch_drift: LAUNCH_DRIFT,
            gravity: GRAVITY,
            burst_spread_rate: BURST_SPREAD_RATE,
            burst_damp_rate: BURST_DAMP_RATE,
            horizontal_speed_scale: HORIZONTAL_SPEED_SCALE,
            floor_y: FLOOR_Y,
            floor_friction: FLOOR_FRICTION,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnimatorParams {
    pub converge_speed: f32,
    pub diverge_speed: f32,
    pub intro_jitter: f32,
    pub diverge_expansion: f32,
    pub planet_spin_per_sec: f32,
    pub drift_spin_per_sec: f32,
    pub max_dt: f32,
    pub finale: FinaleParams,
}

impl AnimatorParams {
    /// Rejects values that would make sampling or dt clamping meaningless.
    pub fn validate(&self) -> Result<(), MorphError> {
        let f = &self.finale;
        let non_negative = [
            ("max_dt", self.max_dt),
            ("intro_jitter", self.intro_jitter),
            ("launch_drift", f.launch_drift),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(MorphError::InvalidParameter(name));
            }
        }
        if !(f.launch_speed_min.is_finite()
            && f.launch_speed_max.is_finite()
            && f.launch_speed_min <= f.launch_speed_max)
        {
            return Err(MorphError::InvalidParameter("launch_speed_min..launch_speed_max"));
        }
        if !f.floor_y.is_finite() {
            return Err(MorphError::InvalidParameter("floor_y"));
        }
        Ok(())
    }
}

impl Default for AnimatorParams {
    fn default() -> Self {
        Self {
            converge_speed: CONVERGE_SPEED,
            diverge_speed: DIVERGE_SPEED,
            intro_jitter: INTRO_JITTER,
            diverge_expansion: DIVERGE_EXPANSION,
            planet_spin_per_sec: PLANET_SPIN_PER_SEC,
            drift_spin_per_sec: DRIFT_SPIN_PER_SEC,
            max_dt: MAX_FRAME_DT,
            finale: FinaleParams::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Converging,
    Diverging,
    Finale,
}

impl Motion {
    pub fn select(stage: Stage, gesture: Gesture) -> Motion {
        match (stage, gesture) {
            (_, Gesture::Closed) => Motion::Converging,
            (Stage::Fireworks, Gesture::Open) => Motion::Finale,
            _ => Motion::Diverging,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub stage: Stage,
    pub gesture: Gesture,
    pub dt: f32,
}

/// What happened during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub motion: Motion,
    /// The finale was entered this frame.
    pub launched: bool,
    /// The finale crossed into its explosion phase this frame.
    pub burst: bool,
}

#[derive(Clone, Copy, Debug)]
struct FinaleClock {
    entered_at: f32,
    burst_reported: bool,
}

pub struct Animator {
    pub params: AnimatorParams,
    field: ParticleField,
    rng: StdRng,
    clock: f32,
    rotation: f32,
    finale: Option<FinaleClock>,
}

impl Animator {
    pub fn new(initial_target: Vec<Vec3>, params: AnimatorParams, seed: u64) -> Result<Self, MorphError> {
        params.validate()?;
        Ok(Self {
            params,
            field: ParticleField::from_target(initial_target)?,
            rng: StdRng::seed_from_u64(seed),
            clock: 0.0,
            rotation: 0.0,
            finale: None,
        })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Whole-field rotation about +Y in radians, applied by the renderer as the model transform.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Seconds of animation time accumulated so far.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn in_finale(&self) -> bool {
        self.finale.is_some()
    }

    pub fn retarget(&mut self, target: &[Vec3]) -> Result<(), MorphError> {
        self.field.set_target(target)
    }

    /// Advance one frame and write positions into `out`.
    ///
    /// Returns `None` without touching any state when no correctly sized
    /// render buffer is attached.
    pub fn step(&mut self, input: FrameInput, out: Option<&mut [f32]>) -> Option<StepReport> {
        let out = out?;
        if out.len() != self.field.len() * 3 {
            log::warn!(
                "render buffer holds {} floats, field needs {}; skipping frame",
                out.len(),
                self.field.len() * 3
            );
            return None;
        }
        // `params` is public and may be edited after validation
        let dt = if input.dt.is_finite() {
            input.dt.max(0.0).min(self.params.max_dt.max(0.0))
        } else {
            0.0
        };
        self.clock += dt;

        let motion = Motion::select(input.stage, input.gesture);
        let mut report = StepReport {
            motion,
            launched: false,
            burst: false,
        };
        match motion {
            Motion::Finale => {
                if self.finale.is_none() {
                    self.launch();
                    report.launched = true;
                }
                report.burst = self.integrate_finale(dt);
            }
            Motion::Converging | Motion::Diverging => {
                if self.finale.take().is_some() {
                    self.field.clear_velocity();
                }
                if motion == Motion::Converging {
                    self.converge(dt, input.stage);
                } else {
                    self.diverge(dt, input.stage);
                }
            }
        }
        self.field.write_positions(out);
        Some(report)
    }

    fn converge(&mut self, dt: f32, stage: Stage) {
        let k = (dt * self.params.converge_speed).min(1.0);
        for (cur, tgt) in self.field.current.iter_mut().zip(&self.field.target) {
            *cur += (*tgt - *cur) * k;
        }
        if stage == Stage::Earth {
            self.spin(self.params.planet_spin_per_sec * dt);
        }
    }

    fn diverge(&mut self, dt: f32, stage: Stage) {
        let k = (dt * self.params.diverge_speed).min(1.0);
        let jitter = self.params.intro_jitter;
        let expansion = self.params.diverge_expansion;
        let rng = &mut self.rng;
        for (cur, tgt) in self.field.current.iter_mut().zip(&self.field.target) {
            let ephemeral = if stage == Stage::Intro {
                *tgt + Vec3::new(
                    sample_between(rng, -jitter, jitter),
                    sample_between(rng, -jitter, jitter),
                    sample_between(rng, -jitter, jitter),
                )
            } else {
                *tgt * expansion
            };
            *cur += (ephemeral - *cur) * k;
        }
        self.spin(self.params.drift_spin_per_sec * dt);
    }

    fn spin(&mut self, radians: f32) {
        self.rotation = (self.rotation + radians).rem_euclid(TAU);
    }

    fn launch(&mut self) {
        let p = &self.params.finale;
        let rng = &mut self.rng;
        for vel in self.field.velocity.iter_mut() {
            *vel = Vec3::new(
                sample_between(rng, -p.launch_drift, p.launch_drift),
                sample_between(rng, p.launch_speed_min, p.launch_speed_max),
                sample_between(rng, -p.launch_drift, p.launch_drift),
            );
        }
        // diverging toward the expanded pad can leave particles under the floor
        for pos in self.field.current.iter_mut() {
            pos.y = pos.y.max(p.floor_y);
        }
        self.finale = Some(FinaleClock {
            entered_at: self.clock,
            burst_reported: false,
        });
        log::debug!("finale launch at t={:.3}", self.clock);
    }

    /// Returns true on the frame the explosion phase begins.
    fn integrate_finale(&mut self, dt: f32) -> bool {
        let Some(finale) = self.finale.as_mut() else {
            return false;
        };
        let p = &self.params.finale;
        let elapsed = self.clock - finale.entered_at;
        let positions = self.field.current.iter_mut();
        let velocities = self.field.velocity.iter_mut();

        if elapsed < p.launch_duration {
            for (pos, vel) in positions.zip(velocities) {
                *pos += *vel * dt;
                pos.y = pos.y.max(p.floor_y);
            }
            return false;
        }

        let burst = !finale.burst_reported;
        finale.burst_reported = true;
        let in_burst_window = elapsed < p.burst_window_end;
        let spread = (p.burst_spread_rate * dt).exp();
        let damp = (-p.burst_damp_rate * dt).exp();
        for (pos, vel) in positions.zip(velocities) {
            if in_burst_window {
                vel.x *= spread;
                vel.z *= spread;
                if vel.y > 0.0 {
                    vel.y *= damp;
                }
            }
            vel.y -= p.gravity * dt;
            pos.x += vel.x * dt * p.horizontal_speed_scale;
            pos.z += vel.z * dt * p.horizontal_speed_scale;
            pos.y += vel.y * dt;
            if pos.y < p.floor_y {
                pos.y = p.floor_y;
                vel.y = 0.0;
                vel.x *= p.floor_friction;
                vel.z *= p.floor_friction;
            }
        }
        burst
    }
}

/// Uniform sample between `a` and `b` in either order. Degenerate or
/// non-finite bounds collapse to a finite endpoint (or zero) instead of panicking.
fn sample_between<R: Rng>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = (a.min(b), a.max(b));
    match (lo.is_finite(), hi.is_finite()) {
        (true, true) if lo < hi => rng.gen_range(lo..=hi),
        (true, _) => lo,
        (false, true) => hi,
        (false, false) => 0.0,
    }
}
