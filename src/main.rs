#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod host;
mod i18n;
mod model;
mod ui;

use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::host::{FileHost, MemoryHost, ProfileHost};
use crate::model::ProfileData;

const ICON_SIZE: u32 = 32;
const ICON_RADIUS: u32 = 6;
const ICON_BARS: [u32; 4] = [8, 16, 11, 19];

/// Accent square with four white schedule bars
fn app_icon() -> egui::IconData {
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let column = x
                .checked_sub(6)
                .filter(|offset| *offset < 20 && *offset % 5 < 4)
                .map(|offset| (offset / 5) as usize);
            let in_bar = column.is_some_and(|bar| y < 26 && y >= 26 - ICON_BARS[bar]);
            let pixel = if outside_rounded_corner(x, y) {
                [0, 0, 0, 0]
            } else if in_bar {
                [255, 255, 255, 255]
            } else {
                [19, 152, 244, 255]
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    egui::IconData {
        rgba,
        width: ICON_SIZE,
        height: ICON_SIZE,
    }
}

fn outside_rounded_corner(x: u32, y: u32) -> bool {
    let corner_center = |v: u32| {
        if v < ICON_RADIUS {
            Some(ICON_RADIUS)
        } else if v >= ICON_SIZE - ICON_RADIUS {
            Some(ICON_SIZE - ICON_RADIUS - 1)
        } else {
            None
        }
    };
    match (corner_center(x), corner_center(y)) {
        (Some(cx), Some(cy)) => {
            let (dx, dy) = (x.abs_diff(cx), y.abs_diff(cy));
            dx * dx + dy * dy > ICON_RADIUS * ICON_RADIUS
        }
        _ => false,
    }
}

fn open_host(config: &Config, demo: bool) -> anyhow::Result<Box<dyn ProfileHost>> {
    if demo {
        let defaults = ProfileData::new_default(&config.domains, config.default_interval_minutes);
        tracing::info!("starting with demo profiles, nothing will be saved");
        return Ok(Box::new(MemoryHost::demo(&defaults)?));
    }
    let path = config.data_path()?;
    tracing::info!(path = %path.display(), "opening profile store");
    Ok(Box::new(FileHost::open(path)?))
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "unable to load config, using defaults");
        Config::default()
    });

    let demo = std::env::args().any(|arg| arg == "--demo");
    let host = match open_host(&config, demo) {
        Ok(host) => host,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "unable to open profile store");
            return Err(eframe::Error::AppCreation(err.into()));
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 800.0])
        .with_min_inner_size([800.0, 560.0])
        .with_title("Profile editor")
        .with_icon(std::sync::Arc::new(app_icon()));

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Profile editor",
        options,
        Box::new(move |cc| Ok(Box::new(ui::ProfileEditorApp::new(cc, config, host)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_has_transparent_corners_and_opaque_center() {
        let icon = app_icon();
        assert_eq!(icon.rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        let alpha = |x: u32, y: u32| icon.rgba[((y * ICON_SIZE + x) * 4 + 3) as usize];
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(ICON_SIZE - 1, ICON_SIZE - 1), 0);
        assert_eq!(alpha(ICON_SIZE / 2, ICON_SIZE / 2), 255);
    }
}
