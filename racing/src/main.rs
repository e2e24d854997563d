use std::path::Path;

use bevy::prelude::*;
use race_core::SceneConfig;
use racing::RacingScenePlugin;

fn main() {
    let scene_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RACING_SCENE").ok());

    let config = match &scene_path {
        Some(path) => SceneConfig::load(Path::new(path))
            .unwrap_or_else(|e| panic!("Failed to load scene file {path}: {e}")),
        None => SceneConfig::load_builtin()
            .unwrap_or_else(|e| panic!("Failed to load built-in scene: {e}")),
    };

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Racing".into(),
                    ..default()
                }),
                ..default()
            }),
            RacingScenePlugin {
                config,
                source: scene_path.unwrap_or_else(|| "built-in".to_string()),
            },
        ))
        .run();
}
