use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::editor::SceneEditor;
use crate::gfx::{camera::PerspectiveCamera, rendering::LightSettings, RenderEngine};

pub struct MaquetteApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    editor: SceneEditor,
    camera: PerspectiveCamera,
    cursor: (f32, f32),
}

impl MaquetteApp {
    /// Create a new application with an empty, default-lit scene
    pub async fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                editor: SceneEditor::new(),
                camera: PerspectiveCamera::new(1.0),
                cursor: (0.0, 0.0),
            },
        }
    }

    /// Access the scene editor before the event loop starts
    pub fn editor_mut(&mut self) -> &mut SceneEditor {
        &mut self.app_state.editor
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let _ = env_logger::try_init();

        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default().with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height): (u32, u32) = window_handle.inner_size().into();
            self.camera = PerspectiveCamera::new(width as f32 / height.max(1) as f32);

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let Some(window) = self.window.as_ref() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let size = window.inner_size();
                let viewport = (size.width as f32, size.height as f32);
                if let Some(hit) = self.editor.pick(self.cursor, viewport, &self.camera) {
                    let name = self
                        .editor
                        .selected()
                        .map(|n| n.name.as_str())
                        .unwrap_or("unnamed");
                    log::info!("picked {:?} at distance {:.3}", name, hit.distance);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.camera.update_view_proj();

                let lights = LightSettings::from_graph(self.editor.graph());
                render_engine.update_globals(self.camera.uniform, lights);
                render_engine.prepare_graph(self.editor.graph_mut());
                render_engine.render_frame(self.editor.graph());
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
