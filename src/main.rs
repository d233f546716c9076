//! vkbd - on-screen keyboard for dual-display handhelds
//!
//! Runs one keyboard session against the in-memory display and prints the
//! resulting text on stdout.

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::path::Path;

use vkbd::config::Config;
use vkbd::display::{ExternalMode, MemoryDisplay, Screen};
use vkbd::font::SystemFontService;
use vkbd::input::{NoSecondaryPads, PrimaryController, TtyPad};
use vkbd::keyboard::{run_keyboard, KeyboardContext, KeyboardSettings, SystemClock};

/// Print help message
fn print_help() {
    println!(
        r#"vkbd {} - on-screen keyboard for dual-display handhelds

USAGE:
    vkbd [OPTIONS] [TEXT]

ARGS:
    TEXT                    Initial text (default: empty)

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -m, --max <N>           Text capacity including the terminator slot
    --evdev                 Read keys and touch from libinput instead of stdin
    --screenshot            Save both screens as PNG when the session ends
    --1080                  Emulate a 1920x1080 external display (default 1280x720)
    --init-config           Generate config file
    -f, --force             Overwrite config file without confirmation

KEYS (stdin):
    arrows / hjkl           Move the selection
    Enter / space           Press the selected key
    Backspace / Escape      Delete left, or cancel at the start of the text

CONFIG FILE:
    ~/.config/vkbd/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Expand ~ to the user's home directory
fn expand_path(path: &str) -> String {
    if !path.starts_with('~') {
        return path.to_string();
    }
    match dirs::home_dir().map(|p| p.to_string_lossy().to_string()) {
        Some(home) if path == "~" => home,
        Some(home) => format!("{}{}", home, &path[1..]),
        None => path.to_string(),
    }
}

/// Command line options for a keyboard run
#[derive(Debug, Default, PartialEq)]
struct Options {
    text: Option<String>,
    max_length: Option<usize>,
    evdev: bool,
    screenshot: bool,
    full_hd: bool,
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--max" | "-m" => {
                let value = iter.next().ok_or_else(|| anyhow!("--max needs a value"))?;
                options.max_length = Some(parse_max(value)?);
            }
            "--evdev" => options.evdev = true,
            "--screenshot" => options.screenshot = true,
            "--1080" => options.full_hd = true,
            "--force" | "-f" => {}
            _ if arg.starts_with("--max=") => {
                options.max_length = Some(parse_max(&arg["--max=".len()..])?);
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(anyhow!("Unknown option: {}", arg));
            }
            _ => {
                if options.text.is_some() {
                    return Err(anyhow!("Unexpected argument: {}", arg));
                }
                options.text = Some(arg.clone());
            }
        }
    }
    Ok(options)
}

fn parse_max(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("Invalid --max value: {}", value))
}

fn open_primary(evdev: bool) -> Result<Box<dyn PrimaryController>> {
    if evdev {
        #[cfg(target_os = "linux")]
        {
            let pad = vkbd::input::EvdevPad::new().context("Failed to open input devices")?;
            return Ok(Box::new(pad));
        }
        #[cfg(not(target_os = "linux"))]
        return Err(anyhow!("--evdev is only available on Linux"));
    }
    let pad = TtyPad::new().context("Failed to put the terminal in raw mode")?;
    Ok(Box::new(pad))
}

fn save_screenshots(display: &MemoryDisplay, dir: &str) {
    let dir = expand_path(dir);
    for screen in [Screen::Handheld, Screen::External] {
        match display.save_png(screen, Path::new(&dir)) {
            Ok(path) => info!("Screenshot saved: {}", path.display()),
            Err(e) => warn!("Screenshot failed: {:#}", e),
        }
    }
}

fn init_config(force: bool) -> Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("vkbd").join("config.toml");
        if config_path.exists() && !force {
            println!("Config file already exists: {}", config_path.display());
            print!("Overwrite? [y/N]: ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            let input = input.trim().to_lowercase();

            if input != "y" && input != "yes" {
                println!("Aborted.");
                return Ok(());
            }
        }
    }

    match Config::write_template() {
        Ok(path) => {
            println!("Config file generated:");
            println!("  Path:   {}", path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            Err(e)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("vkbd {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // --init-config
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        return init_config(force);
    }

    let options = parse_options(&args)?;
    let config = Config::load();

    let mode = if options.full_hd {
        ExternalMode::FullHd1080
    } else {
        ExternalMode::Hd720
    };
    let mut display = MemoryDisplay::new(mode);
    let fonts = SystemFontService::new(&config.font.path);
    let mut primary = open_primary(options.evdev)?;
    let mut secondary = NoSecondaryPads;
    let mut clock = SystemClock;

    let initial = options.text.unwrap_or_default();
    let max_length = options.max_length.unwrap_or(config.keyboard.max_length);

    info!("vkbd starting (max length {})", max_length);

    let result = {
        let mut ctx = KeyboardContext {
            display: &mut display,
            fonts: &fonts,
            primary: primary.as_mut(),
            secondary: &mut secondary,
            clock: &mut clock,
            settings: KeyboardSettings::from(&config),
        };
        run_keyboard(&initial, max_length, &mut ctx)
    };

    // Restore the terminal before printing
    drop(primary);

    if options.screenshot {
        save_screenshots(&display, &config.display.screenshot_dir);
    }

    println!("{}", result);
    Ok(())
}
