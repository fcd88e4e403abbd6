use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use energy_orb::gpu::GpuState;
use energy_orb::{AnchorRect, DiscBatch, Engine, EngineConfig, ViewerError};

/// Stand-in for the media panel the orb docks beside.
const DOCK_RECT: AnchorRect = AnchorRect {
    left: 420.0,
    top: 40.0,
    width: 320.0,
    height: 180.0,
};

pub struct App {
    config: EngineConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    engine: Option<Engine<DiscBatch>>,
    error: Option<ViewerError>,
}

impl App {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            window: None,
            gpu_state: None,
            engine: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<ViewerError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title("Energy Orb")
            .with_inner_size(winit::dpi::LogicalSize::new(800, 600));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;

        let size = window.inner_size();
        let engine = Engine::create(DiscBatch::new(size.width, size.height), self.config.clone())?;

        log::info!("Space: toggle highlight, A: toggle docking, Esc: quit");

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.engine = Some(engine);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(engine) = &mut self.engine {
            engine.destroy();
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let Some(engine) = &mut self.engine else {
            return;
        };

        match event.logical_key.as_ref() {
            Key::Named(NamedKey::Escape) => self.shutdown(event_loop),
            Key::Named(NamedKey::Space) => {
                let highlighted = !engine.is_highlighted();
                engine.set_highlighted(highlighted);
                log::info!("highlight {}", if highlighted { "on" } else { "off" });
            }
            Key::Character(c) if c.eq_ignore_ascii_case("a") => {
                let anchor = match engine.anchor() {
                    Some(_) => None,
                    None => Some(DOCK_RECT),
                };
                engine.set_anchor(anchor);
                log::info!("anchor {:?}", anchor);
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("viewer startup failed: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(engine) = &mut self.engine {
                    engine.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, event),
            WindowEvent::RedrawRequested => {
                let (Some(gpu_state), Some(engine)) = (&mut self.gpu_state, &self.engine) else {
                    return;
                };
                match gpu_state.render(engine.surface()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu_state.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                        self.shutdown(event_loop);
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = &mut self.engine else {
            return;
        };

        if engine.advance(Instant::now()) > 0 {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        match engine.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
