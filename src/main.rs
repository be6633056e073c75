//! apron-vision
//!
//! `apron-vision` runs the bot loop against the configured adb device.
//! `apron-vision analyze <screenshot.png>` runs the filter column pipeline on
//! a saved screenshot and writes annotated crops to the temp directory.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use apron_vision::config::{get_config, init_config};
use apron_vision::vision::{
    convert_to_buffer, crop_image, detect_circles, draw_circles_on_image,
    extract_filter_column_icons, save_image, save_image_list,
};
use apron_vision::{bot, log, paths};

fn main() -> Result<()> {
    // Log panics to the same file as everything else
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    paths::ensure_directories()?;
    init_config();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {
            if ctrlc::set_handler(bot::request_abort).is_err() {
                log("Failed to set CTRL+C handler, stopping the bot might not work");
            }
            log("Starting bot services");
            bot::start_bot(get_config().clone()).map_err(|e| {
                log(&format!("Exiting.. {:#}", e));
                e
            })
        }
        Some("analyze") => {
            let path = args
                .get(2)
                .ok_or_else(|| anyhow!("Usage: apron-vision analyze <screenshot.png>"))?;
            analyze_screenshot(Path::new(path))
        }
        Some(other) => Err(anyhow!(
            "Unknown command '{}'. Usage: apron-vision [analyze <screenshot.png>]",
            other
        )),
    }
}

/// Runs the filter column pipeline on a screenshot file.
fn analyze_screenshot(path: &Path) -> Result<()> {
    let config = &get_config().vision;
    let raw = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let frame = convert_to_buffer(&raw);
    log(&format!(
        "Loaded {} ({}x{})",
        path.display(),
        frame.width(),
        frame.height()
    ));

    let temp_dir = paths::get_temp_dir();

    // Annotated column first, so a failed extraction still leaves something to look at
    let column = crop_image(&frame, &config.filter_column.column_region)?;
    match detect_circles(&column, &config.circles) {
        Ok(circles) => {
            let annotated = draw_circles_on_image(&column, &circles, true);
            save_image(&annotated, &temp_dir.join("filter_column_circles.png"))?;
        }
        Err(e) => log(&format!("No circles drawn: {}", e)),
    }

    let icons = extract_filter_column_icons(&frame, config)?;
    save_image_list(&icons.images, &temp_dir.join("filter_icon.png"))?;
    for (i, centre) in icons.centres.iter().enumerate() {
        println!("icon {}: click at {}", i, centre);
    }
    Ok(())
}
