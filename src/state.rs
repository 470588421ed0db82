//! Palette state: input, loaded data, computed sections, selection.

use std::collections::HashMap;

use crate::aliases::Alias;
use crate::builds::{Build, Pipeline};
use crate::nav::KeyboardNav;
use crate::prefs::RecentCommand;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Builds,
    Favorites,
    Recents,
    Commands,
    Pipelines,
}

impl SectionKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::Builds => "builds",
            Self::Favorites => "favorites",
            Self::Recents => "recents",
            Self::Commands => "commands",
            Self::Pipelines => "pipelines",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Builds => "Recent Builds",
            Self::Favorites => "Favorites",
            Self::Recents => "Recent",
            Self::Commands => "Commands",
            Self::Pipelines => "Pipelines",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub params: Option<String>,
    pub alias: Option<String>,
    pub uses: Option<u32>,
    pub favorite: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteItem {
    Command(CommandItem),
    Pipeline { pipeline: Pipeline, favorite: bool },
    Build { pipeline: String, build: Build },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionView {
    pub kind: SectionKind,
    pub items: Vec<PaletteItem>,
}

/// One flag per background load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Loading {
    pub favorites: bool,
    pub recents: bool,
    pub pipelines: bool,
    pub builds: bool,
}

impl Loading {
    pub fn any(self) -> bool {
        self.favorites || self.recents || self.pipelines || self.builds
    }
}

#[derive(Clone, Debug, Default)]
pub struct PaletteState {
    pub visible: bool,
    pub input: String,
    pub cursor: usize,
    /// Last settled (debounced) input the sections were computed from.
    pub query: String,
    pub sections: Vec<SectionView>,
    pub nav: KeyboardNav,
    pub scroll: usize,
    pub status: Option<String>,
    pub loading: Loading,

    pub aliases: Vec<Alias>,
    pub favorite_commands: Vec<String>,
    pub recents: Vec<RecentCommand>,
    pub pipelines: Vec<Pipeline>,
    pub pipeline_favorites: HashMap<String, bool>,
    pub builds: Option<(String, Vec<Build>)>,
}

impl PaletteState {
    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn selected_item(&self) -> Option<&PaletteItem> {
        let index = self.nav.state().selection(self.total_items())?;
        self.sections.iter().flat_map(|s| s.items.iter()).nth(index)
    }

    /// Rendered row of a global index: empty sections are hidden and every
    /// visible section adds a header row.
    pub fn row_of(&self, global: usize) -> usize {
        let mut row = 0;
        let mut remaining = global;
        for section in self.sections.iter().filter(|s| !s.items.is_empty()) {
            row += 1;
            if remaining < section.items.len() {
                return row + remaining;
            }
            row += section.items.len();
            remaining -= section.items.len();
        }
        row
    }

    /// Header row of the section that `global` opens, if it is a section's first item.
    pub fn section_header_row(&self, global: usize) -> Option<usize> {
        let mut start = 0;
        for section in self.sections.iter().filter(|s| !s.items.is_empty()) {
            if global == start {
                return self.row_of(global).checked_sub(1);
            }
            start += section.items.len();
            if global < start {
                return None;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(id: &str) -> PaletteItem {
        PaletteItem::Command(CommandItem {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            params: None,
            alias: None,
            uses: None,
            favorite: false,
        })
    }

    #[test]
    fn rows_skip_empty_sections_and_count_headers() {
        let state = PaletteState {
            sections: vec![
                SectionView {
                    kind: SectionKind::Favorites,
                    items: vec![command("a"), command("b")],
                },
                SectionView { kind: SectionKind::Recents, items: vec![] },
                SectionView { kind: SectionKind::Commands, items: vec![command("c")] },
            ],
            ..Default::default()
        };
        assert_eq!(state.row_of(0), 1);
        assert_eq!(state.row_of(1), 2);
        assert_eq!(state.row_of(2), 4);
        assert_eq!(state.section_header_row(0), Some(0));
        assert_eq!(state.section_header_row(1), None);
        assert_eq!(state.section_header_row(2), Some(3));
        assert_eq!(state.section_header_row(3), None);
    }

    #[test]
    fn selected_item_follows_nav() {
        let mut state = PaletteState {
            sections: vec![
                SectionView { kind: SectionKind::Favorites, items: vec![command("a")] },
                SectionView { kind: SectionKind::Commands, items: vec![command("b")] },
            ],
            ..Default::default()
        };
        state.nav.set_selected(1);
        assert_eq!(state.selected_item(), Some(&command("b")));
        state.nav.set_selected(5);
        assert_eq!(state.selected_item(), None);
    }
}
