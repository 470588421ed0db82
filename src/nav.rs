//! Keyboard navigation across independently sized sections sharing one selection index.
//!
//! Sections are concatenated in order into a single global index space. The
//! pure [`reduce`] function maps a key press to the next [`NavState`] and an
//! effect; [`KeyboardNav`] layers handler dispatch on top of it.
//!
//! | Key                | Behavior                                             |
//! |--------------------|------------------------------------------------------|
//! | Down / Tab         | next item, wrapping to the first                     |
//! | Up / Shift+Tab     | previous item, wrapping to the last                  |
//! | Home / End         | first / last item                                    |
//! | Enter              | activate the selected item                           |
//! | Alt+1..9           | select item N-1 and activate it                      |
//! | Esc                | escape handler                                       |
//! | Backspace          | backspace handler, told whether the input was empty  |

use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Tab,
    Enter,
    Home,
    End,
    Escape,
    Backspace,
    /// `1`..=`9`; other digits arrive as `Char`.
    Digit(u8),
    Char(char),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

/// Modifier that turns a digit key into jump-and-activate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DigitModifier {
    #[default]
    Alt,
    Ctrl,
}

impl DigitModifier {
    fn held(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Alt => modifiers.alt,
            Self::Ctrl => modifiers.ctrl,
        }
    }
}

/// Section ids and item counts, in render order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionLayout<'a> {
    sections: Vec<(&'a str, usize)>,
}

/// Position of a global index inside one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Located {
    pub section: usize,
    pub local: usize,
}

impl<'a> SectionLayout<'a> {
    pub fn new(sections: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        Self {
            sections: sections.into_iter().collect(),
        }
    }

    pub fn of<T>(sections: &'a [Section<'_, T>]) -> Self {
        Self::new(sections.iter().map(|s| (s.id, s.items.len())))
    }

    pub fn total(&self) -> usize {
        self.sections.iter().map(|(_, len)| len).sum()
    }

    /// Number of items before the section named `id`.
    pub fn start_index(&self, id: &str) -> Option<usize> {
        let mut start = 0;
        for (section_id, len) in &self.sections {
            if *section_id == id {
                return Some(start);
            }
            start += len;
        }
        None
    }

    pub fn locate(&self, global: usize) -> Option<Located> {
        let mut remaining = global;
        for (section, (_, len)) in self.sections.iter().enumerate() {
            if remaining < *len {
                return Some(Located {
                    section,
                    local: remaining,
                });
            }
            remaining -= len;
        }
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    pub selected: usize,
}

impl NavState {
    /// The selection, if it addresses an item.
    pub fn selection(self, total: usize) -> Option<usize> {
        (self.selected < total).then_some(self.selected)
    }

    /// A selection past the end falls back to the first item.
    pub fn clamped(self, total: usize) -> Self {
        if total > 0 && self.selected >= total {
            Self { selected: 0 }
        } else {
            self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEffect {
    Unhandled,
    Moved,
    /// Activate the item at this global index.
    Activate(usize),
    Escape,
    Backspace,
}

/// Next state and effect for one key press over `total` items.
pub fn reduce(
    state: NavState,
    press: KeyPress,
    total: usize,
    digit_modifier: DigitModifier,
) -> (NavState, NavEffect) {
    let state = state.clamped(total);
    let current = state.selected;
    let moved = |selected| (NavState { selected }, NavEffect::Moved);

    match press.key {
        Key::Escape => (state, NavEffect::Escape),
        Key::Backspace => (state, NavEffect::Backspace),
        _ if total == 0 => (state, NavEffect::Unhandled),
        Key::Down => moved(if current == total - 1 { 0 } else { current + 1 }),
        Key::Up => moved(if current == 0 { total - 1 } else { current - 1 }),
        Key::Tab if press.modifiers.shift => moved((current + total - 1) % total),
        Key::Tab => moved((current + 1) % total),
        Key::Home => moved(0),
        Key::End => moved(total - 1),
        Key::Enter => (state, NavEffect::Activate(current)),
        Key::Digit(d @ 1..=9) if digit_modifier.held(press.modifiers) => {
            let index = usize::from(d - 1);
            if index < total {
                (NavState { selected: index }, NavEffect::Activate(index))
            } else {
                (state, NavEffect::Unhandled)
            }
        }
        Key::Digit(_) | Key::Char(_) => (state, NavEffect::Unhandled),
    }
}

type ItemHandler<'a, T> = Box<dyn FnMut(&T) + 'a>;

/// A named, ordered group of selectable items, supplied fresh per render.
pub struct Section<'a, T> {
    pub id: &'a str,
    pub items: &'a [T],
    on_select: Option<ItemHandler<'a, T>>,
}

impl<'a, T> Section<'a, T> {
    pub fn new(id: &'a str, items: &'a [T]) -> Self {
        Self {
            id,
            items,
            on_select: None,
        }
    }

    /// Activation for this section's items, taking precedence over the global handler.
    pub fn on_select(mut self, handler: impl FnMut(&T) + 'a) -> Self {
        self.on_select = Some(Box::new(handler));
        self
    }

    pub fn has_handler(&self) -> bool {
        self.on_select.is_some()
    }
}

impl<T> fmt::Debug for Section<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("len", &self.items.len())
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

/// Optional callbacks for [`KeyboardNav::handle_key`]. A missing handler makes its key unhandled.
pub struct NavHandlers<'a, T> {
    on_select: Option<Box<dyn FnMut(&T, &str) + 'a>>,
    on_escape: Option<Box<dyn FnMut() + 'a>>,
    on_backspace: Option<Box<dyn FnMut(bool) + 'a>>,
    input_is_empty: Option<Box<dyn Fn() -> bool + 'a>>,
    custom: HashMap<Key, Box<dyn FnMut(KeyPress) -> bool + 'a>>,
}

impl<T> Default for NavHandlers<'_, T> {
    fn default() -> Self {
        Self {
            on_select: None,
            on_escape: None,
            on_backspace: None,
            input_is_empty: None,
            custom: HashMap::new(),
        }
    }
}

impl<'a, T> NavHandlers<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback activation, called with the item and its section id.
    pub fn on_select(mut self, handler: impl FnMut(&T, &str) + 'a) -> Self {
        self.on_select = Some(Box::new(handler));
        self
    }

    pub fn on_escape(mut self, handler: impl FnMut() + 'a) -> Self {
        self.on_escape = Some(Box::new(handler));
        self
    }

    /// Called with whether the text input was empty when Backspace was pressed.
    pub fn on_backspace(mut self, handler: impl FnMut(bool) + 'a) -> Self {
        self.on_backspace = Some(Box::new(handler));
        self
    }

    /// Reads the live text input. Without a probe the input counts as non-empty.
    pub fn input_probe(mut self, is_empty: impl Fn() -> bool + 'a) -> Self {
        self.input_is_empty = Some(Box::new(is_empty));
        self
    }

    /// Checked before any built-in key; returning `true` consumes the press.
    pub fn custom(mut self, key: Key, handler: impl FnMut(KeyPress) -> bool + 'a) -> Self {
        self.custom.insert(key, Box::new(handler));
        self
    }
}

/// Selection state for one palette session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardNav {
    state: NavState,
    initial: usize,
    digit_modifier: DigitModifier,
}

impl Default for KeyboardNav {
    fn default() -> Self {
        Self::new(0, DigitModifier::default())
    }
}

impl KeyboardNav {
    pub fn new(initial: usize, digit_modifier: DigitModifier) -> Self {
        Self {
            state: NavState { selected: initial },
            initial,
            digit_modifier,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn selected(&self) -> usize {
        self.state.selected
    }

    pub fn set_selected(&mut self, index: usize) {
        self.state.selected = index;
    }

    pub fn reset(&mut self) {
        self.state.selected = self.initial;
    }

    /// Pull a stale selection back inside `total` items.
    pub fn clamp(&mut self, total: usize) {
        self.state = self.state.clamped(total);
    }

    /// Apply one key press. Returns whether the press was consumed.
    pub fn handle_key<T>(
        &mut self,
        press: KeyPress,
        sections: &mut [Section<'_, T>],
        handlers: &mut NavHandlers<'_, T>,
    ) -> bool {
        if let Some(custom) = handlers.custom.get_mut(&press.key) {
            if custom(press) {
                return true;
            }
        }

        let layout = SectionLayout::of(sections);
        let (next, effect) = reduce(self.state, press, layout.total(), self.digit_modifier);
        let target = match effect {
            NavEffect::Activate(index) => layout.locate(index),
            _ => None,
        };
        self.state = next;

        match effect {
            NavEffect::Unhandled => false,
            NavEffect::Moved => true,
            NavEffect::Activate(_) => match target {
                Some(at) => activate(&mut sections[at.section], at.local, handlers),
                None => false,
            },
            NavEffect::Escape => match handlers.on_escape.as_mut() {
                Some(escape) => {
                    escape();
                    true
                }
                None => false,
            },
            NavEffect::Backspace => match handlers.on_backspace.as_mut() {
                Some(backspace) => {
                    let was_empty = handlers.input_is_empty.as_ref().is_some_and(|probe| probe());
                    backspace(was_empty);
                    true
                }
                None => false,
            },
        }
    }
}

fn activate<T>(
    section: &mut Section<'_, T>,
    local: usize,
    handlers: &mut NavHandlers<'_, T>,
) -> bool {
    let items = section.items;
    let Some(item) = items.get(local) else {
        return false;
    };
    if let Some(select) = section.on_select.as_mut() {
        select(item);
        return true;
    }
    match handlers.on_select.as_mut() {
        Some(select) => {
            select(item, section.id);
            true
        }
        None => false,
    }
}

/// Scroll offset after the least movement that shows `row` in a `viewport`-row window.
pub fn scroll_into_view(offset: usize, viewport: usize, row: usize) -> usize {
    if viewport == 0 {
        offset
    } else if row < offset {
        row
    } else if row >= offset + viewport {
        row + 1 - viewport
    } else {
        offset
    }
}
