use bevy::prelude::*;

mod cli;
mod core;
mod rendering;
mod sequence;
mod ui;

use crate::core::config::{self, ShowcaseConfig};
use crate::core::error::Result;
use crate::core::logging::log_plugin;
use crate::core::pages::PagePlugin;
use rendering::ModelViewerPlugin;
use sequence::FrameSequencePlugin;

fn main() -> AppExit {
    match build_app() {
        Ok(Some(mut app)) => app.run(),
        Ok(None) => AppExit::Success,
        Err(err) => {
            eprintln!("helmet-showcase: {}", err);
            AppExit::error()
        }
    }
}

/// Parses the command line and config, then assembles the app. `None` means
/// there is nothing to run (help was printed).
fn build_app() -> Result<Option<App>> {
    let args = cli::parse_env()?;
    if args.help {
        print!("{}", cli::HELP);
        return Ok(None);
    }

    let mut config = config::load(args.config.as_deref())?;
    if let Some(page) = args.page {
        config.start_page = page;
    }

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: config.window.title.clone(),
                    resolution: (config.window.width, config.window.height).into(),
                    ..default()
                }),
                ..default()
            })
            .set(log_plugin(&config.log)),
    )
    .add_plugins((
        PagePlugin {
            start: config.start_page,
        },
        FrameSequencePlugin,
        ModelViewerPlugin,
    ))
    .insert_resource(config)
    .add_systems(Startup, log_startup);

    Ok(Some(app))
}

fn log_startup(config: Res<ShowcaseConfig>) {
    info!(
        "Showcase started on {:?} ({} frames, model {})",
        config.start_page, config.frames.count, config.viewer.model_path
    );
}
