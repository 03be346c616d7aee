// F3 stats panel drawn with egui on top of the game frame.

use egui::epaint::Shadow;

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub entity_count: usize,
    pub enemies: usize,
    pub projectiles: usize,
    /// Enemies hit since startup.
    pub enemies_destroyed: u64,
    pub shots_fired: u64,
    pub draw_calls: u32,
    pub resolution: (u32, u32),
    /// (horizontal, vertical) look angles in radians.
    pub camera_angles: (f32, f32),
}

/// Rolling one-second frame timing window.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window_elapsed: f32,
    frames: u32,
    sum_ms: f32,
    min_ms: f32,
    max_ms: f32,
}

/// Timing summary of the last completed window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTimes {
    pub fps: u32,
    pub avg_ms: f32,
    pub min_ms: f32,
    pub max_ms: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self {
            window_elapsed: 0.0,
            frames: 0,
            sum_ms: 0.0,
            min_ms: f32::MAX,
            max_ms: 0.0,
        }
    }
}

impl FrameTimer {
    /// Record one frame of `dt` seconds. Returns a summary each time a full
    /// second has accumulated, then starts a new window.
    pub fn record(&mut self, dt: f32) -> Option<FrameTimes> {
        let ms = dt * 1000.0;
        self.window_elapsed += dt;
        self.frames += 1;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);

        if self.window_elapsed < 1.0 {
            return None;
        }
        let times = FrameTimes {
            fps: self.frames,
            avg_ms: self.sum_ms / self.frames as f32,
            min_ms: self.min_ms,
            max_ms: self.max_ms,
        };
        *self = Self::default();
        Some(times)
    }
}

// Scale changes update egui's viewport info without queueing input, so they
// are always passed on to keep a later-shown panel correctly sized.
fn forwards_event(visible: bool, event: &winit::event::WindowEvent) -> bool {
    visible || matches!(event, winit::event::WindowEvent::ScaleFactorChanged { .. })
}

pub struct DebugOverlay {
    pub visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // drawn after the depth-tested pass
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("debug overlay {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Feed a window event to egui. Input is only queued while the panel is
    /// shown: the queue is drained by `render`, which a hidden panel skips.
    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) {
        if forwards_event(self.visible, event) {
            // Unused: the game loop redraws every frame.
            let _response = self.egui_state.on_window_event(window, event);
        }
    }

    /// Record the egui pass onto `view`. Loads (does not clear) the target.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: &DebugStats,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("debug_overlay"))
                .fixed_pos(egui::pos2(10.0, 10.0))
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                        .inner_margin(egui::Margin::same(8.0))
                        .rounding(4.0)
                        .show(ui, |ui: &mut egui::Ui| {
                            ui.label(format!("FPS: {}", stats.fps));
                            ui.label(format!(
                                "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                stats.frame_time_avg_ms,
                                stats.frame_time_min_ms,
                                stats.frame_time_max_ms
                            ));
                            ui.label(format!(
                                "Entities: {}  (enemies {} | projectiles {})",
                                stats.entity_count, stats.enemies, stats.projectiles
                            ));
                            ui.label(format!(
                                "Destroyed: {}  Shots: {}",
                                stats.enemies_destroyed, stats.shots_fired
                            ));
                            ui.label(format!("Draw calls: {}", stats.draw_calls));
                            ui.label(format!(
                                "Resolution: {} x {}",
                                stats.resolution.0, stats.resolution.1
                            ));
                            ui.label(format!(
                                "Look: h {:.2}  v {:.2}",
                                stats.camera_angles.0, stats.camera_angles.1
                            ));
                        });
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
