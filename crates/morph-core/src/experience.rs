//! The scripted experience: stage controller + animator + per-stage targets.
//!
//! Frontends own one `Experience`, push gestures and colours into it from
//! their input handlers, and call [`Experience::frame`] once per display
//! refresh with the renderer's position buffer.

use crate::animator::{Animator, AnimatorParams, FrameInput, StepReport};
use crate::audio::SoundCue;
use crate::color::Rgb;
use crate::constants::{DEFAULT_SEED, MESSAGE_TEXT, PARTICLE_COUNT, POINT_SIZE};
use crate::gesture::Gesture;
use crate::glyph::GlyphRaster;
use crate::shapes::{self, ShapeParams};
use crate::stage::{Stage, StageController};
use crate::MorphError;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub struct ExperienceConfig {
    pub particle_count: usize,
    pub seed: u64,
    /// Text drawn by the message stage.
    pub message: String,
    pub point_size: f32,
    pub shapes: ShapeParams,
    pub animator: AnimatorParams,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            seed: DEFAULT_SEED,
            message: MESSAGE_TEXT.to_string(),
            point_size: POINT_SIZE,
            shapes: ShapeParams::default(),
            animator: AnimatorParams::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    pub cues: SmallVec<[SoundCue; 4]>,
    /// Stage entered at the start of this frame, if any.
    pub stage_changed: Option<Stage>,
    /// `None` when the animator skipped the frame (no render buffer).
    pub report: Option<StepReport>,
}

pub struct Experience {
    controller: StageController,
    animator: Animator,
    targets: Vec<Vec<Vec3>>,
    latest_gesture: Gesture,
    applied_gesture: Gesture,
    color: Rgb,
    point_size: f32,
}

impl Experience {
    /// Generates every stage's target up front; the field starts resting on the intro cloud.
    pub fn new(config: ExperienceConfig, raster: &dyn GlyphRaster) -> Result<Self, MorphError> {
        let n = config.particle_count;
        if n == 0 {
            return Err(MorphError::EmptyField);
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let targets = Stage::ALL
            .iter()
            .map(|s| shapes::generate(s.shape(), n, &config.shapes, &config.message, raster, &mut rng))
            .collect::<Vec<_>>();
        let animator_seed = config.seed ^ 0x9E37_79B9_7F4A_7C15;
        let animator = Animator::new(targets[0].clone(), config.animator, animator_seed)?;
        log::info!("experience ready: {} particles, {} stages", n, targets.len());
        Ok(Self {
            controller: StageController::new(),
            animator,
            targets,
            latest_gesture: Gesture::None,
            applied_gesture: Gesture::None,
            color: Stage::Intro.default_color(),
            point_size: config.point_size,
        })
    }

    pub fn stage(&self) -> Stage {
        self.controller.stage()
    }

    pub fn is_started(&self) -> bool {
        self.controller.is_started()
    }

    /// Gesture the animator is currently acting on.
    pub fn gesture(&self) -> Gesture {
        self.applied_gesture
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn particle_count(&self) -> usize {
        self.animator.field().len()
    }

    pub fn rotation(&self) -> f32 {
        self.animator.rotation()
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn target_for(&self, stage: Stage) -> &[Vec3] {
        &self.targets[stage.index()]
    }

    /// Last write wins; consumed at the start of the next frame.
    pub fn set_gesture(&mut self, gesture: Gesture) {
        self.latest_gesture = gesture;
    }

    /// Direct user colour input. Independent of stage until the next stage change.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Manual start button. Returns the stage entered, if this started the experience.
    pub fn start(&mut self) -> Option<Stage> {
        let stage = self.controller.start()?;
        self.enter_stage(stage);
        Some(stage)
    }

    pub fn frame(&mut self, dt: f32, positions: Option<&mut [f32]>) -> FrameOutput {
        let mut out = FrameOutput::default();
        if self.latest_gesture != self.applied_gesture {
            let gesture = self.latest_gesture;
            self.applied_gesture = gesture;
            match gesture {
                Gesture::Closed => out.cues.push(SoundCue::Converge),
                Gesture::Open => out.cues.push(SoundCue::Disperse),
                Gesture::None => {}
            }
            if let Some(stage) = self.controller.observe(gesture) {
                self.enter_stage(stage);
                out.stage_changed = Some(stage);
            }
        }

        let input = FrameInput {
            stage: self.controller.stage(),
            gesture: self.applied_gesture,
            dt,
        };
        out.report = self.animator.step(input, positions);
        if let Some(report) = out.report {
            if report.launched {
                out.cues.push(SoundCue::Launch);
            }
            if report.burst {
                out.cues.push(SoundCue::Burst);
            }
        }
        out
    }

    fn enter_stage(&mut self, stage: Stage) {
        self.color = stage.default_color();
        if let Err(e) = self.animator.retarget(&self.targets[stage.index()]) {
            log::error!("retarget for {:?} failed: {}", stage, e);
        }
    }
}
