// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use crate::dialogs::{AddMaterialDialog, AddNodeDialog};
use crate::panel_types::PanelType;
use crate::panels::terminal::TracingEvent;
use crate::panels::{DataPanel, TerminalPanel, ViewportPanel, WorkTreePanel};
use crate::state::EditorState;
use egui_dock::{DockArea, DockState, NodeIndex, Style, TabViewer};
use egui_wgpu::wgpu;
use std::path::Path;
use std::sync::{mpsc, Arc};
use strucframe_editor_viewport::settings::SETTINGS_FILE_NAME;
use strucframe_editor_viewport::{ModeKind, ViewportSettings};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Tab viewer implementation for `egui_dock`
pub struct EditorTabViewer<'a> {
    state: &'a mut EditorState,
    work_tree: &'a mut WorkTreePanel,
    viewport: &'a mut ViewportPanel,
    data: &'a mut DataPanel,
    terminal: &'a mut TerminalPanel,
}

impl<'a> TabViewer for EditorTabViewer<'a> {
    type Tab = PanelType;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        format!("{} {}", tab.icon(), tab.name()).into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            PanelType::WorkTree => self.work_tree.ui(ui, self.state),
            PanelType::Viewport => self.viewport.ui(ui, self.state),
            PanelType::Data => self.data.ui(ui, self.state),
            PanelType::Terminal => self.terminal.ui(ui, self.state),
        }
    }

    fn closeable(&mut self, tab: &mut Self::Tab) -> bool {
        *tab != PanelType::Viewport
    }
}

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| EditorError::RendererInit("No suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("StrucFrame Editor Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| EditorError::RendererInit("Surface has no texture formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Editor Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Editor Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    editor: EditorInner,
}

impl EditorRunning {
    fn new(event_loop: &ActiveEventLoop, tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Result<Self> {
        tracing::info!("Creating editor window...");

        let window_attrs = Window::default_attributes()
            .with_title("StrucFrame Editor")
            .with_inner_size(winit::dpi::LogicalSize::new(1600, 900))
            .with_min_inner_size(winit::dpi::LogicalSize::new(800, 600));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::light());

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        let editor = EditorInner::new(load_settings(Path::new(SETTINGS_FILE_NAME)), tracing_rx);

        tracing::info!("Editor initialized, window size {:?}", window.inner_size());

        Ok(Self {
            window,
            graphics,
            egui_ctx,
            egui_state,
            editor,
        })
    }
}

/// Read settings, falling back to defaults when the file is unusable
fn load_settings(path: &Path) -> ViewportSettings {
    ViewportSettings::load(path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring {}: {e}", path.display());
        ViewportSettings::default()
    })
}

/// Editor panels, dialogs and dock layout
struct EditorInner {
    state: EditorState,
    dock_state: DockState<PanelType>,
    work_tree: WorkTreePanel,
    viewport: ViewportPanel,
    data: DataPanel,
    terminal: TerminalPanel,
    add_node_dialog: AddNodeDialog,
    add_material_dialog: AddMaterialDialog,
}

impl EditorInner {
    fn new(settings: ViewportSettings, tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Self {
        Self {
            state: EditorState::new(settings),
            dock_state: Self::create_default_layout(),
            work_tree: WorkTreePanel::new(),
            viewport: ViewportPanel::new(),
            data: DataPanel::new(),
            terminal: TerminalPanel::with_tracing_receiver(tracing_rx),
            add_node_dialog: AddNodeDialog::default(),
            add_material_dialog: AddMaterialDialog::default(),
        }
    }

    fn create_default_layout() -> DockState<PanelType> {
        let mut dock_state = DockState::new(vec![PanelType::Viewport]);
        let surface = dock_state.main_surface_mut();

        let [_center, _left] = surface.split_left(NodeIndex::root(), 0.2, vec![PanelType::WorkTree]);
        let [center, _right] = surface.split_right(NodeIndex::root(), 0.75, vec![PanelType::Data]);
        let [_top, _bottom] = surface.split_below(center, 0.75, vec![PanelType::Terminal]);

        dock_state
    }

    fn update(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.view_menu(ui);
                self.define_menu(ui);
            });
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| self.toolbar(ui));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.state.status_text());
                if let Some(summary) = self.state.selection_summary() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(summary);
                    });
                }
            });
        });

        let mut tab_viewer = EditorTabViewer {
            state: &mut self.state,
            work_tree: &mut self.work_tree,
            viewport: &mut self.viewport,
            data: &mut self.data,
            terminal: &mut self.terminal,
        };

        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(ctx, &mut tab_viewer);

        self.add_node_dialog.show(ctx, &mut self.state);
        self.add_material_dialog.show(ctx, &mut self.state);

        self.handle_shortcuts(ctx);

        // Tabs that are closed or hidden still feed the other views
        self.state.process_viewport_events();
        self.state.process_table_selection();
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        if ui.button("\u{2795} Add Node").on_hover_text("Add a node by coordinates").clicked() {
            self.add_node_dialog.open();
        }

        let mode = self.state.controller.mode().kind();
        let add_frame = mode == ModeKind::AddFrame;
        if ui
            .selectable_label(add_frame, "\u{1f517} Add Frame")
            .on_hover_text("Click a start node, then an end node")
            .clicked()
        {
            self.state.controller.set_add_frame_mode(!add_frame);
        }

        let box_select = mode == ModeKind::BoxSelect;
        if ui
            .selectable_label(box_select, "\u{2b1a} Box Select")
            .on_hover_text("Drag a rectangle to select")
            .clicked()
        {
            self.state.controller.set_box_selection_mode(!box_select);
        }

        ui.separator();

        let count = self.state.selection_count();
        if ui
            .add_enabled(count > 0, egui::Button::new(format!("\u{1f5d1} Delete ({count})")))
            .clicked()
        {
            self.state.delete_selected();
        }
    }

    fn view_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            let controller = &mut self.state.controller;
            let mut visibility = controller.visibility();
            if ui.checkbox(&mut visibility.axes, "Axes").changed() {
                controller.toggle_axes(visibility.axes);
            }
            if ui.checkbox(&mut visibility.node_labels, "Node IDs").changed() {
                controller.toggle_node_labels(visibility.node_labels);
            }
            if ui.checkbox(&mut visibility.frame_labels, "Frame IDs").changed() {
                controller.toggle_frame_labels(visibility.frame_labels);
            }

            ui.separator();
            ui.menu_button("Panels", |ui| {
                for panel in PanelType::ALL {
                    if ui.button(panel.name()).clicked() {
                        self.open_panel(panel);
                        ui.close_menu();
                    }
                }
            });

            ui.separator();
            if ui.button("Reset Layout").clicked() {
                self.dock_state = Self::create_default_layout();
                ui.close_menu();
            }
        });
    }

    fn define_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Define", |ui| {
            if ui.button("Material...").clicked() {
                self.add_material_dialog.open();
                ui.close_menu();
            }
            if ui.button("Node...").clicked() {
                self.add_node_dialog.open();
                ui.close_menu();
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete_pressed, escape_pressed) = ctx.input(|input| {
            (
                input.key_pressed(egui::Key::Delete),
                input.key_pressed(egui::Key::Escape),
            )
        });

        if delete_pressed {
            self.state.delete_selected();
        }
        if escape_pressed {
            self.state.set_mode(ModeKind::Normal);
        }
    }

    fn open_panel(&mut self, panel: PanelType) {
        if let Some((surface, node, tab)) = self.dock_state.find_tab(&panel) {
            self.dock_state.set_active_tab((surface, node, tab));
            self.dock_state.set_focused_node_and_surface((surface, node));
        } else {
            self.dock_state.push_to_focused_leaf(panel);
        }
    }
}

/// Main editor application
pub struct EditorApp {
    running: Option<EditorRunning>,
    /// Tracing receiver passed to the terminal panel on first resume.
    tracing_rx: Option<mpsc::Receiver<TracingEvent>>,
    startup_error: Option<EditorError>,
}

impl EditorApp {
    /// Run the editor application with an optional tracing receiver.
    pub fn run_with_tracing_receiver(rx: Option<mpsc::Receiver<TracingEvent>>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = EditorApp {
            running: None,
            tracing_rx: rx,
            startup_error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.startup_error.is_some() {
            return;
        }

        match EditorRunning::new(event_loop, self.tracing_rx.take()) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("Editor start-up failed: {e}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.editor.update(ctx);
                });

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_has_every_panel() {
        let dock_state = EditorInner::create_default_layout();
        for panel in PanelType::ALL {
            assert!(dock_state.find_tab(&panel).is_some(), "{} missing", panel.name());
        }
    }

    #[test]
    fn test_unreadable_settings_fall_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("strucframe_bad_settings_{}.ron", std::process::id()));
        std::fs::write(&path, "(snap_radius: \"far\")").unwrap();
        let settings = load_settings(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings, ViewportSettings::default());
    }
}
