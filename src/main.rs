use std::process;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sdl2::{event::Event, keyboard::Keycode};

use glimp::cli::Cli;
use glimp::commands::CommandTable;
use glimp::config::Settings;
use glimp::display::{self, DisplayError, DisplaySystem, GraphicsApi, SdlBackend, GAMMA_RAMP_SIZE};
use glimp::input::WindowTracker;
use glimp::logging;

const FRAME_TIME: Duration = Duration::from_millis(16);

fn identity_table() -> [u8; GAMMA_RAMP_SIZE] {
    let mut table = [0u8; GAMMA_RAMP_SIZE];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = i as u8;
    }
    table
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level());

    if cli.list_modes {
        print!("{}", display::modes::mode_list());
        return Ok(());
    }

    let mut settings = match &cli.config {
        Some(path) if path.exists() => Settings::load_file(path)?,
        Some(path) => {
            log::info!("{} not found, using defaults", path.display());
            Settings::new()
        }
        None => Settings::new(),
    };
    cli.merge_into_settings(&mut settings)?;

    let api = cli.graphics_api();
    let mut commands = CommandTable::new();
    let mut display = DisplaySystem::new(SdlBackend::new(), api)?;

    match display.init(&mut settings, &mut commands, Box::new(WindowTracker::new())) {
        Ok(info) => {
            log::info!("Window {} ready ({:?})", info.handle.0, info.api);
            if let Some(native) = info.native {
                log::debug!("Native window: {:?}", native);
            }
        }
        Err(DisplayError::Fatal(message)) => {
            log::error!("{}", message);
            drop(display);
            process::exit(1);
        }
        Err(e) => return Err(e).context("Display initialization failed"),
    }

    let config = *display.configuration();
    log::info!(
        "{}x{} {}, {} color bits, {} depth, {} stencil",
        config.width,
        config.height,
        if config.is_fullscreen { "fullscreen" } else { "windowed" },
        config.color_bits,
        config.depth_bits,
        config.stencil_bits
    );

    if api == GraphicsApi::OpenGl {
        gl::load_with(|name| display.gl_proc_address(name));
    }

    let mut event_pump = display
        .backend()
        .event_pump()
        .map_err(anyhow::Error::msg)?;
    let mut frame: u64 = 0;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    let name = match key {
                        Keycode::F1 => "modelist",
                        Keycode::M => "minimize",
                        Keycode::G => {
                            let table = identity_table();
                            if let Err(e) = display.set_gamma(&settings, &table, &table, &table) {
                                log::warn!("{}", e);
                            }
                            continue;
                        }
                        _ => continue,
                    };
                    if let Some(command) = commands.lookup(name) {
                        print!("{}", display.execute(command, &settings));
                    }
                }
                _ => {}
            }
        }

        if api == GraphicsApi::OpenGl {
            // SAFETY: the context created by init is current on this thread
            unsafe {
                gl::ClearColor(0.0, 0.0, 0.0, 1.0);
                gl::Clear(gl::COLOR_BUFFER_BIT);
            }
        }
        display.present(&mut settings)?;

        frame += 1;
        if cli.frames.is_some_and(|limit| frame >= limit) {
            break;
        }
        thread::sleep(FRAME_TIME);
    }

    drop(event_pump);
    display.shutdown(&mut commands);

    if cli.save {
        if let Some(path) = &cli.config {
            settings.save_file(path)?;
            log::info!("Settings saved to {}", path.display());
        }
    }

    Ok(())
}
