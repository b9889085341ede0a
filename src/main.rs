use image_cloud::render::{Canvas, FramePacer, TerminalRenderer};
use image_cloud::{CloudConfig, ImageSource, JsonFileImages, LogRenderer, MosaicResult, TilingScheduler};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn show_help() {
    println!("Usage: image_cloud [config.json]");
    println!();
    println!("Environment:");
    println!("  IMAGE_CLOUD_RENDERER        log (default) or terminal");
    println!("  IMAGE_CLOUD_ROWS / _COLS    grid size");
    println!("  IMAGE_CLOUD_WIDTH / _HEIGHT display box in pixels");
    println!("  IMAGE_CLOUD_SPACING         gap between cells in pixels");
    println!("  IMAGE_CLOUD_IMAGE_DELAY_MS  pause between image changes");
    println!("  IMAGE_CLOUD_FADE_MS         fade duration");
    println!("  IMAGE_CLOUD_SEED            fixed layout seed");
    println!("  IMAGE_CLOUD_PLACEMENT       largest (default) or first");
    println!("  IMAGE_CLOUD_IMAGES          image list JSON file");
    println!();
    println!("Press q, Esc or Ctrl+C to stop.");
}

fn load_config(path: Option<&str>) -> MosaicResult<CloudConfig> {
    let mut config = match path {
        Some(path) => CloudConfig::load_from_file(path)?,
        None => CloudConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn run_logged(config: &CloudConfig, running: Arc<AtomicBool>) -> MosaicResult<()> {
    let images = JsonFileImages::new(&config.images.list_path).fetch_image_list()?;
    let renderer = LogRenderer::new(config.fade_duration());

    let handler_flag = running.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        info!("🛑 Received Ctrl+C, stopping image cloud...");
        handler_flag.store(false, Ordering::SeqCst);
    }) {
        error!("❌ Failed to install Ctrl+C handler: {}", err);
    }

    let mut scheduler = TilingScheduler::new(config, images, renderer)?.with_run_flag(running);
    let actions = scheduler.run();
    let stats = scheduler.stats();
    info!(
        "👋 Stopped after {} actions: {} cycles, {} images shown",
        actions, stats.cycles_completed, stats.images_shown
    );
    Ok(())
}

fn run_terminal(config: &CloudConfig, running: Arc<AtomicBool>) -> MosaicResult<()> {
    let images = JsonFileImages::new(&config.images.list_path).fetch_image_list()?;

    let canvas = Arc::new(Mutex::new(Canvas::new(config.display.width, config.display.height)));
    let renderer = TerminalRenderer::new(
        canvas.clone(),
        config.fade_duration(),
        config.timing.fade_easing,
    );
    // Raw mode swallows the SIGINT; the pacer watches for Ctrl+C itself
    let pacer = FramePacer::new(canvas, running.clone())?;

    let mut scheduler =
        TilingScheduler::with_clock(config, images, renderer, pacer)?.with_run_flag(running);
    scheduler.run();
    scheduler.clock_mut().restore()?;

    let stats = scheduler.stats();
    println!(
        "👋 Image cloud stopped: {} cycles, {} images shown",
        stats.cycles_completed, stats.images_shown
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if matches!(args.get(1).map(|s| s.as_str()), Some("help" | "-h" | "--help")) {
        show_help();
        return Ok(());
    }

    let terminal_mode = std::env::var("IMAGE_CLOUD_RENDERER")
        .map(|renderer| renderer.eq_ignore_ascii_case("terminal"))
        .unwrap_or(false);

    // Log lines would tear through the alternate screen
    if terminal_mode && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "error");
    }
    env_logger::init();

    let config = match load_config(args.get(1).map(|s| s.as_str())) {
        Ok(config) => config,
        Err(err) => {
            error!("❌ {}", err);
            return Err(err.into());
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let result = if terminal_mode {
        run_terminal(&config, running)
    } else {
        run_logged(&config, running)
    };

    if let Err(err) = &result {
        error!("❌ {}", err);
    }
    result.map_err(Into::into)
}
