use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::constants::hotkeys;

/// Which of the two showcase pages is on screen.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    #[serde(rename = "frames")]
    Scrollytelling,
    #[serde(rename = "viewer")]
    ModelViewer,
}

impl Page {
    pub fn toggled(self) -> Self {
        match self {
            Page::Scrollytelling => Page::ModelViewer,
            Page::ModelViewer => Page::Scrollytelling,
        }
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frames" | "scroll" | "sequence" => Ok(Page::Scrollytelling),
            "viewer" | "model" | "3d" => Ok(Page::ModelViewer),
            other => Err(format!("unknown page '{}', expected 'frames' or 'viewer'", other)),
        }
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ShowcaseSet {
    Input,
    Logic,
    Rendering,
}

pub struct PagePlugin {
    pub start: Page,
}

impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.insert_state(self.start)
            .enable_state_scoped_entities::<Page>()
            .configure_sets(
                Update,
                (ShowcaseSet::Input, ShowcaseSet::Logic, ShowcaseSet::Rendering).chain(),
            )
            .add_systems(Update, handle_page_hotkeys.in_set(ShowcaseSet::Input));
    }
}

pub fn handle_page_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    current: Res<State<Page>>,
    mut next_page: ResMut<NextState<Page>>,
) {
    let requested = if keyboard.just_pressed(hotkeys::SHOW_FRAMES) {
        Some(Page::Scrollytelling)
    } else if keyboard.just_pressed(hotkeys::SHOW_VIEWER) {
        Some(Page::ModelViewer)
    } else if keyboard.just_pressed(hotkeys::TOGGLE_PAGE) {
        Some(current.get().toggled())
    } else {
        None
    };

    if let Some(page) = requested {
        if page != *current.get() {
            info!("Switching page: {:?} -> {:?}", current.get(), page);
            next_page.set(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_parse() {
        assert_eq!("frames".parse::<Page>(), Ok(Page::Scrollytelling));
        assert_eq!("Viewer".parse::<Page>(), Ok(Page::ModelViewer));
        assert!("gallery".parse::<Page>().is_err());
    }

    #[test]
    fn toggling_alternates_pages() {
        assert_eq!(Page::Scrollytelling.toggled(), Page::ModelViewer);
        assert_eq!(Page::ModelViewer.toggled().toggled(), Page::ModelViewer);
    }
}
