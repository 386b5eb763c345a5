use std::time::Instant;
use winit::event::{Event, KeyEvent, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use morph_core::{BlockFont, Camera, Experience, ExperienceConfig, PointUniforms, Stage};

mod audio;
mod keys;
mod render;

use audio::CueMixer;
use keys::KeyCommand;
use render::GpuState;

struct App<'w> {
    gpu: GpuState<'w>,
    experience: Experience,
    audio: Option<CueMixer>,
    camera: Camera,
    positions: Vec<f32>,
    last_frame: Instant,
    elapsed: f32,
    palette_step: usize,
}

impl<'w> App<'w> {
    fn new(gpu: GpuState<'w>, experience: Experience) -> Self {
        let mut camera = Camera::default();
        let (w, h) = gpu.size();
        camera.set_viewport(w, h);
        let positions = vec![0.0; experience.particle_count() * 3];
        gpu.window.set_title(&keys::window_title(experience.stage()));
        Self {
            gpu,
            experience,
            audio: CueMixer::start(),
            camera,
            positions,
            last_frame: Instant::now(),
            elapsed: 0.0,
            palette_step: 0,
        }
    }

    fn on_key(&mut self, command: KeyCommand, elwt: &EventLoopWindowTarget<()>) {
        match command {
            KeyCommand::Gesture(g) => self.experience.set_gesture(g),
            KeyCommand::Start => {
                if let Some(stage) = self.experience.start() {
                    self.stage_entered(stage);
                }
            }
            KeyCommand::NextColor => {
                self.palette_step += 1;
                let color = keys::palette_color(self.palette_step);
                log::info!("[color] {}", color);
                self.experience.set_color(color);
            }
            KeyCommand::Quit => elwt.exit(),
        }
    }

    fn stage_entered(&mut self, stage: Stage) {
        log::info!("[stage] {:?}", stage);
        self.palette_step = stage.index();
        self.gpu.window.set_title(&keys::window_title(stage));
    }

    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed += dt;

        let out = self.experience.frame(dt, Some(self.positions.as_mut_slice()));
        if let Some(stage) = out.stage_changed {
            self.stage_entered(stage);
        }
        if let Some(mixer) = &self.audio {
            for cue in &out.cues {
                mixer.play(*cue);
            }
        }

        let uniforms = PointUniforms::new(
            &self.camera,
            self.experience.rotation(),
            self.experience.color().to_vec4(1.0),
            self.experience.point_size(),
            self.elapsed,
        );
        self.gpu.render(&self.positions, &uniforms)
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.camera.set_viewport(size.width, size.height);
        self.gpu.resize(size);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let experience = Experience::new(ExperienceConfig::default(), &BlockFont::default())?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Particle Morph")
        .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0))
        .build(&event_loop)?;

    let gpu = pollster::block_on(GpuState::new(&window, experience.particle_count()))?;
    let mut app = App::new(gpu, experience);
    log::info!("Enter begins, hold Space to close the hand, N hides it, P cycles colours");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => app.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state,
                            repeat,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(command) = keys::key_command(code, state, repeat) {
                app.on_key(command, elwt);
            }
        }
        Event::AboutToWait => match app.frame() {
            Ok(_) => app.gpu.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = app.gpu.window.inner_size();
                app.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory");
                elwt.exit();
            }
            Err(e) => log::warn!("[gpu] {:?}", e),
        },
        _ => {}
    })?;
    Ok(())
}
