// Window host - winit event loop, pixels surface, keyboard input
//
// Runs the console one frame per redraw, blits the framebuffer through a
// pixels surface at integer scale, feeds the audio queue, and handles the
// hotkeys: F5 quick-save, F7 quick-load, F8 reset, F9 screenshot.

use crate::display::framebuffer::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::emulator::{save_screenshot, EmulatorConfig, InputConfig, Nes, SaveState};
use crate::input::Controller;
use pixels::{Pixels, SurfaceTexture};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// NTSC frame duration
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);

/// Quick-save slot file
const QUICK_SAVE_FILE: &str = "famicore-slot0.state";

/// Screenshot output directory
const SCREENSHOT_DIR: &str = "screenshots";

/// Translate a config key name into a winit key code
fn key_from_name(name: &str) -> Option<KeyCode> {
    let code = match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyF" => KeyCode::KeyF,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyS" => KeyCode::KeyS,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyZ" => KeyCode::KeyZ,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    };
    Some(code)
}

/// Player-1 keyboard mapping resolved from the config
struct KeyboardMapping {
    button_a: KeyCode,
    button_b: KeyCode,
    select: KeyCode,
    start: KeyCode,
    up: KeyCode,
    down: KeyCode,
    left: KeyCode,
    right: KeyCode,
}

impl KeyboardMapping {
    fn from_config(config: &InputConfig) -> Self {
        let defaults = InputConfig::default();
        let resolve = |name: &str, fallback: &str| {
            key_from_name(name).unwrap_or_else(|| {
                key_from_name(fallback).expect("default key names are valid")
            })
        };

        KeyboardMapping {
            button_a: resolve(&config.button_a, &defaults.button_a),
            button_b: resolve(&config.button_b, &defaults.button_b),
            select: resolve(&config.select, &defaults.select),
            start: resolve(&config.start, &defaults.start),
            up: resolve(&config.up, &defaults.up),
            down: resolve(&config.down, &defaults.down),
            left: resolve(&config.left, &defaults.left),
            right: resolve(&config.right, &defaults.right),
        }
    }

    fn controller_state(&self, pressed: &HashSet<KeyCode>) -> Controller {
        Controller {
            button_a: pressed.contains(&self.button_a),
            button_b: pressed.contains(&self.button_b),
            select: pressed.contains(&self.select),
            start: pressed.contains(&self.start),
            up: pressed.contains(&self.up),
            down: pressed.contains(&self.down),
            left: pressed.contains(&self.left),
            right: pressed.contains(&self.right),
        }
    }
}

/// Emulator window host
struct EmulatorWindow {
    nes: Nes,
    config: EmulatorConfig,
    mapping: KeyboardMapping,

    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,

    pressed_keys: HashSet<KeyCode>,
    last_frame_time: Instant,

    #[cfg(feature = "audio")]
    audio: Option<crate::audio::AudioOutput>,
}

impl EmulatorWindow {
    fn new(nes: Nes, config: EmulatorConfig) -> Self {
        let mapping = KeyboardMapping::from_config(&config.input);

        #[cfg(feature = "audio")]
        let audio = if config.audio.enabled {
            match crate::audio::AudioOutput::new() {
                Ok(output) => {
                    // Two frames of lead silence keep the stream ahead of
                    // the emulation on startup
                    let lead = vec![0i16; 2 * crate::apu::SAMPLE_RATE as usize / 60];
                    output.queue_samples(&lead, 0.0);
                    Some(output)
                }
                Err(err) => {
                    eprintln!("audio unavailable: {}", err);
                    None
                }
            }
        } else {
            None
        };

        EmulatorWindow {
            nes,
            config,
            mapping,
            window: None,
            pixels: None,
            pressed_keys: HashSet::new(),
            last_frame_time: Instant::now(),
            #[cfg(feature = "audio")]
            audio,
        }
    }

    fn handle_hotkey(&mut self, key: KeyCode) {
        match key {
            KeyCode::F5 => {
                let state = SaveState::capture(&self.nes);
                match state.save_to_file(QUICK_SAVE_FILE) {
                    Ok(()) => println!("state saved to {}", QUICK_SAVE_FILE),
                    Err(err) => eprintln!("save failed: {}", err),
                }
            }
            KeyCode::F7 => {
                let loaded = SaveState::load_from_file(QUICK_SAVE_FILE)
                    .and_then(|state| state.restore(&mut self.nes));
                match loaded {
                    Ok(()) => println!("state loaded from {}", QUICK_SAVE_FILE),
                    Err(err) => eprintln!("load failed: {}", err),
                }
            }
            KeyCode::F8 => {
                self.nes.reset();
                println!("console reset");
            }
            KeyCode::F9 => match save_screenshot(self.nes.frame(), PathBuf::from(SCREENSHOT_DIR))
            {
                Ok(path) => println!("screenshot saved to {}", path.display()),
                Err(err) => eprintln!("screenshot failed: {}", err),
            },
            _ => {}
        }
    }

    /// Run one emulated frame and present it
    fn run_frame(&mut self) -> Result<(), pixels::Error> {
        let pad = self.mapping.controller_state(&self.pressed_keys);
        self.nes.input_controller(0, pad.to_byte());

        self.nes.step_frame();

        let samples = self.nes.send_samples();
        #[cfg(feature = "audio")]
        if let Some(audio) = &self.audio {
            audio.queue_samples(&samples, self.config.audio.volume);
        }
        #[cfg(not(feature = "audio"))]
        drop(samples);

        if let Some(pixels) = &mut self.pixels {
            self.nes.frame().to_rgba(pixels.frame_mut());
            pixels.render()?;
        }
        Ok(())
    }

    fn frame_due(&mut self) -> bool {
        if self.last_frame_time.elapsed() >= FRAME_DURATION {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl ApplicationHandler for EmulatorWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let scale = self.config.video.scale.clamp(1, 8);
        let title = match self.nes.rom_name() {
            Some(name) => format!("famicore - {}", name),
            None => "famicore".to_string(),
        };

        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(
                SCREEN_WIDTH as u32 * scale,
                SCREEN_HEIGHT as u32 * scale,
            ))
            .with_resizable(false);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                eprintln!("window creation failed: {}", err);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        match Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface) {
            Ok(pixels) => {
                self.window = Some(window);
                self.pixels = Some(pixels);
            }
            Err(err) => {
                eprintln!("surface creation failed: {}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.pressed_keys.insert(key);
                    if !repeat {
                        self.handle_hotkey(key);
                    }
                }
                ElementState::Released => {
                    self.pressed_keys.remove(&key);
                }
            },
            WindowEvent::RedrawRequested => {
                if self.frame_due() {
                    if let Err(err) = self.run_frame() {
                        eprintln!("render error: {}", err);
                        event_loop.exit();
                        return;
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open a window and run the console until the user closes it
pub fn run_game(nes: Nes, config: EmulatorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;

    if config.video.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    let mut host = EmulatorWindow::new(nes, config);
    event_loop.run_app(&mut host)?;

    Ok(())
}
