// First-person snowball shooter
// Mouse to look, left button to fire, F3 for stats, Escape to quit

mod config;
mod engine;
mod error;

use std::sync::Arc;

use clap::Parser;
use glam::DVec2;
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use config::{Cli, GameConfig};
use engine::debug_overlay::{DebugOverlay, DebugStats, FrameTimer, FrameTimes};
use engine::input::{InputState, Platform};
use engine::player::Player;
use engine::renderer::GpuRenderer;
use engine::scene::{Scene, TickReport};
use engine::spawner::EnemySpawner;
use error::GameError;

/// Totals since startup, shown in the overlay.
#[derive(Debug, Default)]
struct SessionCounters {
    enemies_destroyed: u64,
    shots_fired: u64,
}

impl SessionCounters {
    fn record(&mut self, report: &TickReport) {
        self.enemies_destroyed += report.enemies_destroyed as u64;
        if report.fired {
            self.shots_fired += 1;
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

// Hide the OS cursor and keep it inside the window; look input comes from raw
// mouse motion so a failed grab only costs cursor confinement.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

fn load_config(cli: &Cli) -> Result<GameConfig, GameError> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = GameConfig::load(path)?;
            log::info!("loaded config from {}", path.display());
            config
        }
        None => GameConfig::default(),
    };
    config.apply_cli(cli);
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), GameError> {
    let config = load_config(&cli)?;

    let event_loop = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::PhysicalSize::new(
            config.window.width,
            config.window.height,
        ));

    #[allow(deprecated)]
    let window = Arc::new(event_loop.create_window(window_attributes)?);
    grab_cursor(&window);

    let mut renderer = pollster::block_on(GpuRenderer::new(
        window.clone(),
        config.assets_dir.clone(),
    ))?;
    let mut overlay = DebugOverlay::new(&window, renderer.device(), renderer.surface_format());

    let size = renderer.size();
    let anchor = DVec2::new(f64::from(size.width) / 2.0, f64::from(size.height) / 2.0);
    let mut input = InputState::new(anchor);

    let seed = config.simulation.seed.unwrap_or_else(rand::random);
    log::info!(
        "assets from {}, spawner seed {seed}, {:?} collisions",
        config.assets_dir.display(),
        config.simulation.collision_policy
    );

    let now = input.now();
    let mut scene = Scene::new(
        Player::new(config.player_settings(anchor), now),
        EnemySpawner::new(config.spawner_settings(), seed, now),
        config.simulation.collision_policy,
        config.simulation.far_plane,
        now,
    );

    let mut counters = SessionCounters::default();
    let mut frame_timer = FrameTimer::default();
    let mut frame_times = FrameTimes::default();
    let mut last_draw_calls = 0;
    let mut failure: Option<GameError> = None;

    #[allow(deprecated)]
    event_loop.run(|event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                overlay.handle_window_event(&window, event);
                input.process_event(event);
                if input.quit_requested() {
                    control_flow.exit();
                    return;
                }

                match event {
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::F3),
                                repeat: false,
                                ..
                            },
                        ..
                    } => overlay.toggle(),
                    WindowEvent::Resized(physical_size) => {
                        renderer.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        let report = match scene.tick(&mut input, &mut renderer) {
                            Ok(report) => report,
                            Err(e) => {
                                failure = Some(e.into());
                                control_flow.exit();
                                return;
                            }
                        };
                        counters.record(&report);

                        let aspect = renderer.aspect();
                        let camera = scene.render(&mut renderer, aspect);

                        let live = scene.stats();
                        let size = renderer.size();
                        let stats = DebugStats {
                            fps: frame_times.fps,
                            frame_time_avg_ms: frame_times.avg_ms,
                            frame_time_min_ms: frame_times.min_ms,
                            frame_time_max_ms: frame_times.max_ms,
                            entity_count: live.enemies + live.projectiles,
                            enemies: live.enemies,
                            projectiles: live.projectiles,
                            enemies_destroyed: counters.enemies_destroyed,
                            shots_fired: counters.shots_fired,
                            draw_calls: last_draw_calls,
                            resolution: (size.width, size.height),
                            camera_angles: (
                                scene.player.camera.horizontal_angle,
                                scene.player.camera.vertical_angle,
                            ),
                        };
                        let screen_descriptor = egui_wgpu::ScreenDescriptor {
                            size_in_pixels: [size.width, size.height],
                            pixels_per_point: window.scale_factor() as f32,
                        };

                        let presented = renderer.present(&camera, |device, queue, encoder, view| {
                            if overlay.visible {
                                overlay.render(
                                    device,
                                    queue,
                                    encoder,
                                    &window,
                                    view,
                                    &screen_descriptor,
                                    &stats,
                                );
                            }
                        });
                        match presented {
                            Ok(info) => last_draw_calls = info.draw_calls,
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                renderer.resize(renderer.size())
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                failure = Some(GameError::OutOfMemory);
                                control_flow.exit();
                            }
                            Err(e) => log::warn!("{e:?}"),
                        }

                        if let Some(times) = frame_timer.record(report.dt) {
                            frame_times = times;
                            log::info!(
                                "FPS: {} | Enemies: {} | Projectiles: {} | Destroyed: {} | Draw calls: {}",
                                times.fps,
                                live.enemies,
                                live.projectiles,
                                counters.enemies_destroyed,
                                last_draw_calls
                            );
                        }
                    }
                    _ => {}
                }
            }
            WinitEvent::DeviceEvent { ref event, .. } => {
                input.process_device_event(event);
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    let released = scene.shutdown(&mut renderer);
    log::info!(
        "released {released} entities ({} textures still resident); destroyed {} enemies with {} shots",
        renderer.texture_count(),
        counters.enemies_destroyed,
        counters.shots_fired
    );

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
