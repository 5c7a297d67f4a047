//! Application main loop
//!
//! Wires configuration, catalog and controller to the egui screen. The
//! controller's flip timer is driven from `about_to_wait`: the loop sleeps
//! until the pending deadline and polls the controller when it wakes.

use anyhow::{Context as _, Result};
use app_core::{
    AppConfig, AppError, AssetKind, AssetLoader, AssetResolver, BindingGuard, Catalog, Command,
    GalleryCommand, GalleryController, I18n, ImageRef, KeyDisposition, KeyRouter, KeyboardBinding,
};
use app_ui::{components::GalleryAction, renderer::EguiFrame, GalleryScreen, InputHandler, Renderer, TextureCache, Theme};
use egui_wgpu::ScreenDescriptor;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Fullscreen, Window, WindowId},
};

/// Thumbnails loaded on each side of the current item when not preloading
const THUMBNAIL_RADIUS: usize = 8;

/// Events sent into the loop from other threads
#[derive(Debug, Clone, Copy)]
enum UserEvent {
    /// The asset loader finished at least one image
    AssetReady,
}

/// Main application state for the event loop
struct App {
    config: AppConfig,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,

    // Gallery
    gallery: GalleryController,
    screen: GalleryScreen,
    textures: TextureCache,
    loader: AssetLoader,

    // Input
    input: InputHandler,
    key_router: KeyRouter,
    keyboard: KeyboardBinding,
    /// Present while the window has focus
    key_scope: Option<BindingGuard>,

    i18n: I18n,
    theme: Theme,
    fullscreen: bool,
    /// When egui asked to be repainted next
    egui_repaint_at: Option<Instant>,
}

impl App {
    fn new(config: AppConfig, proxy: EventLoopProxy<UserEvent>) -> Result<Self> {
        let catalog = match &config.gallery.catalog {
            Some(path) => Catalog::load(path).with_context(|| format!("loading catalog {:?}", path))?,
            None => Catalog::builtin().context("loading built-in exhibition")?.clone(),
        };
        tracing::info!("Exhibition {:?} with {} items", catalog.title(), catalog.len());

        let gallery = GalleryController::new(catalog).with_flip_delay(config.gallery.flip_delay());

        let i18n = I18n::builtin(&config.general.language)?;
        if let Some(dir) = AppConfig::config_path().parent().map(|p| p.join("locales")) {
            if dir.is_dir() {
                if let Err(e) = i18n.load_from_dir(&dir) {
                    tracing::warn!("Ignoring locale overrides in {:?}: {}", dir, e);
                }
            }
        }

        let proxy = Mutex::new(proxy);
        let loader = AssetLoader::new(
            AssetResolver::new(&config.gallery.asset_root),
            config.gallery.thumbnail_size,
            move || {
                // Fails only once the loop has exited
                let _ = proxy.lock().send_event(UserEvent::AssetReady);
            },
        )?;

        let keyboard = KeyboardBinding::from_config(&config.keybindings);
        tracing::debug!("{} key chords bound", keyboard.len());

        Ok(Self {
            theme: Theme::by_name(&config.general.theme),
            config,

            window: None,
            renderer: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            egui_renderer: None,

            gallery,
            screen: GalleryScreen::new(),
            textures: TextureCache::new(),
            loader,

            input: InputHandler::new(),
            key_router: KeyRouter::new(),
            keyboard,
            key_scope: None,

            i18n,
            fullscreen: false,
            egui_repaint_at: None,
        })
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let general = &self.config.general;
        let window_attrs = Window::default_attributes()
            .with_title(self.gallery.catalog().title())
            .with_inner_size(winit::dpi::LogicalSize::new(general.window_width, general.window_height))
            .with_maximized(general.start_maximized);

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // Initialize renderer
        let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
        renderer.set_clear_color(self.theme.background);

        // Initialize egui
        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &renderer.device,
            renderer.config.format,
            None,
            1,
            false,
        );

        self.theme.apply(&self.egui_ctx);

        if window.has_focus() {
            self.set_keyboard_active(true);
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        if self.config.gallery.preload_thumbnails {
            let queued = self
                .loader
                .request_thumbnails(self.gallery.items().iter().map(|item| &item.image));
            tracing::debug!("Queued {} thumbnails", queued);
        }
        self.request_assets();

        Ok(())
    }

    /// Attach or detach the gallery's keyboard binding
    fn set_keyboard_active(&mut self, active: bool) {
        if active {
            // Replace rather than stack
            self.key_scope = None;
            self.key_scope = Some(self.key_router.bind(self.keyboard.clone()));
        } else {
            self.key_scope = None;
        }
    }

    /// Queue loads for what is on screen and the neighbours, and drop the rest.
    /// Without preloading, thumbnails are fetched for the items near the current one.
    fn request_assets(&mut self) {
        let items = self.gallery.items();
        let around = self.gallery.indices_around(1);

        let mut wanted: Vec<&ImageRef> = vec![&items[around[0]].image];
        wanted.extend(self.gallery.current_item().alternate());
        wanted.extend(around[1..].iter().map(|&i| &items[i].image));

        for image in &wanted {
            if self.textures.needs(image, AssetKind::Full) {
                self.loader.request(image, AssetKind::Full);
            }
        }

        if !self.config.gallery.preload_thumbnails {
            let nearby: Vec<&ImageRef> = self
                .gallery
                .indices_around(THUMBNAIL_RADIUS)
                .into_iter()
                .map(|i| &items[i].image)
                .filter(|image| self.textures.needs(image, AssetKind::Thumbnail))
                .collect();
            let queued = self.loader.request_thumbnails(nearby);
            if queued > 0 {
                tracing::debug!("Queued {} nearby thumbnails", queued);
            }
        }

        self.textures.evict_full_except(&wanted);
    }

    fn receive_assets(&mut self) {
        while let Some(asset) = self.loader.try_recv() {
            if let Err(e) = &asset.result {
                tracing::debug!("{}", e.user_message());
            }
            self.textures.insert(&self.egui_ctx, asset);
        }
    }

    fn execute(&mut self, command: GalleryCommand) {
        let index = self.gallery.current_index();
        self.gallery.execute(&command, Instant::now());

        if index != self.gallery.current_index() {
            self.request_assets();
        }
    }

    fn execute_command(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        match command {
            Command::Gallery(cmd) => self.execute(cmd),
            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::Exit => {
                tracing::info!("Exit requested");
                event_loop.exit();
            }
        }
    }

    fn toggle_fullscreen(&mut self) {
        if let Some(window) = &self.window {
            self.fullscreen = !self.fullscreen;
            window.set_fullscreen(self.fullscreen.then_some(Fullscreen::Borderless(None)));
        }
    }

    fn handle_action(&mut self, action: GalleryAction) {
        if let GalleryAction::OpenLink(url) = &action {
            tracing::info!("Opening {}", url);
            if let Err(e) = open::that(url) {
                tracing::error!("Failed to open {}: {}", url, e);
            }
            return;
        }

        if let Some(cmd) = action.command() {
            self.execute(cmd);
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };

        let raw_input = egui_state.take_egui_input(&window);
        let now = Instant::now();
        let flip_progress = self.gallery.transition_progress(now);

        let mut action = None;
        let full_output = {
            let view = self.gallery.view();
            let screen = &mut self.screen;
            let textures = &self.textures;
            let i18n = &self.i18n;
            let theme = &self.theme;

            self.egui_ctx.run(raw_input, |ctx| {
                action = screen.show(ctx, &view, textures, flip_progress, i18n, theme);
            })
        };

        if let Some(egui_state) = &mut self.egui_state {
            egui_state.handle_platform_output(&window, full_output.platform_output);
        }

        self.egui_repaint_at = full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|viewport| viewport.repaint_delay)
            .filter(|delay| *delay < Duration::from_secs(3600))
            .map(|delay| now + delay);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        if let (Some(renderer), Some(egui_renderer)) = (&mut self.renderer, &mut self.egui_renderer) {
            let frame = EguiFrame {
                primitives: &primitives,
                textures_delta: &full_output.textures_delta,
                screen: ScreenDescriptor {
                    size_in_pixels: [renderer.size.0, renderer.size.1],
                    pixels_per_point: full_output.pixels_per_point,
                },
            };

            match renderer.render_egui(egui_renderer, frame) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    tracing::warn!("{}", AppError::GpuLost.user_message());
                    renderer.handle_surface_lost();
                    window.request_redraw();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => tracing::warn!("Surface error: {:?}", e),
            }
        }

        if let Some(action) = action {
            self.handle_action(action);
            window.request_redraw();
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to initialize window: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::AssetReady => {
                self.receive_assets();
                self.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Bound keys go to the gallery and are not forwarded to egui
        if let WindowEvent::KeyboardInput { event: key_event, .. } = &event {
            if let Some(chord) = self.input.chord(key_event) {
                let index = self.gallery.current_index();
                match self.key_router.dispatch(&chord, &mut self.gallery, Instant::now()) {
                    KeyDisposition::Handled => {
                        if index != self.gallery.current_index() {
                            self.request_assets();
                        }
                        self.request_redraw();
                        return;
                    }
                    KeyDisposition::Unhandled(command) => {
                        self.execute_command(command, event_loop);
                        self.request_redraw();
                        return;
                    }
                    KeyDisposition::Ignored => {}
                }
            }
        }

        // Let egui handle the event next
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                self.set_keyboard_active(focused);
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((size.width, size.height));
                }
                self.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.update_modifiers(modifiers.state());
            }

            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(cmd) = self.input.handle_mouse_button(button, state) {
                    self.execute(cmd);
                    self.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                self.render(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if self.gallery.poll(now) {
            self.request_redraw();
        }

        // Animate the flip while it is pending
        if self.gallery.is_transitioning() {
            self.request_redraw();
        }

        if self.egui_repaint_at.is_some_and(|at| at <= now) {
            self.egui_repaint_at = None;
            self.request_redraw();
        }

        let wake_at = [self.gallery.next_deadline(), self.egui_repaint_at]
            .into_iter()
            .flatten()
            .min();

        event_loop.set_control_flow(match wake_at {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        });
    }
}

/// Run the application
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, event_loop.create_proxy())?;
    event_loop.run_app(&mut app)?;

    tracing::info!("Virtual Gallery exited");
    Ok(())
}
