//! Nested menu state machine.
//!
//! Every navigation command is routed to the innermost open submenu, so a
//! menu tree always has exactly one menu receiving input.

use serde::{de, Deserialize, Deserializer, Serialize};
use tactics_core::Action;

/// Labelled entry of a [`Menu`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    label: String,
    action: Action,
    child: Option<Menu>,
}

impl MenuOption {
    /// Creates an option that applies `action` when selected.
    #[must_use]
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
            child: None,
        }
    }

    /// Designates the submenu opened when drilling into this option.
    #[must_use]
    pub fn with_child(mut self, child: Menu) -> Self {
        self.child = Some(child);
        self
    }

    /// Text shown for the option.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Action applied when the option is selected.
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Submenu opened when drilling into the option, if any.
    #[must_use]
    pub fn child(&self) -> Option<&Menu> {
        self.child.as_ref()
    }
}

/// Ordered options with a current selection and an optional open submenu.
///
/// `selection` always indexes `options` when the menu is not empty, and is
/// zero otherwise. Deserialized menus are held to the same rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Menu {
    options: Vec<MenuOption>,
    selection: usize,
    submenu: Option<Box<Menu>>,
}

impl Menu {
    /// Creates a closed menu selecting its first option.
    #[must_use]
    pub fn new(options: Vec<MenuOption>) -> Self {
        Self {
            options,
            selection: 0,
            submenu: None,
        }
    }

    /// Returns the menu with its own selection moved, clamped to the options.
    #[must_use]
    pub fn with_selection(self, selection: usize) -> Self {
        let selection = selection.min(self.options.len().saturating_sub(1));
        Self { selection, ..self }
    }

    /// Options at this level.
    #[must_use]
    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    /// Index of the selected option at this level.
    #[must_use]
    pub const fn selection(&self) -> usize {
        self.selection
    }

    /// Submenu opened from this level, if any.
    #[must_use]
    pub fn submenu(&self) -> Option<&Menu> {
        self.submenu.as_deref()
    }

    /// Selected option at this level, `None` for an empty menu.
    #[must_use]
    pub fn selected(&self) -> Option<&MenuOption> {
        self.options.get(self.selection)
    }

    /// Innermost open menu, the one receiving navigation.
    #[must_use]
    pub fn active(&self) -> &Menu {
        let mut menu = self;
        while let Some(child) = menu.submenu.as_deref() {
            menu = child;
        }
        menu
    }

    /// Number of submenus open beneath this menu.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut menu = self;
        while let Some(child) = menu.submenu.as_deref() {
            depth += 1;
            menu = child;
        }
        depth
    }

    /// Action bound to the selected option of the innermost open menu.
    #[must_use]
    pub fn selected_action(&self) -> Option<&Action> {
        self.active().selected().map(MenuOption::action)
    }

    /// Advances the innermost selection, wrapping past the last option.
    #[must_use]
    pub fn next_option(self) -> Self {
        self.map_active(|menu| {
            let len = menu.options.len();
            if len == 0 {
                return menu;
            }
            let selection = (menu.selection + 1) % len;
            Self { selection, ..menu }
        })
    }

    /// Retreats the innermost selection, wrapping before the first option.
    #[must_use]
    pub fn previous_option(self) -> Self {
        self.map_active(|menu| {
            let len = menu.options.len();
            if len == 0 {
                return menu;
            }
            let selection = menu.selection.checked_sub(1).unwrap_or(len - 1);
            Self { selection, ..menu }
        })
    }

    /// Opens the child of the innermost selected option, if it designates one.
    #[must_use]
    pub fn enter_submenu(self) -> Self {
        self.map_active(|menu| {
            let child = menu.selected().and_then(MenuOption::child).cloned();
            match child {
                Some(child) => Self {
                    submenu: Some(Box::new(child)),
                    ..menu
                },
                None => menu,
            }
        })
    }

    /// Closes the innermost open submenu, returning control to its parent.
    #[must_use]
    pub fn leave_submenu(self) -> Self {
        match self.submenu {
            Some(child) if child.submenu.is_some() => Self {
                submenu: Some(Box::new((*child).leave_submenu())),
                ..self
            },
            Some(_) => Self {
                submenu: None,
                ..self
            },
            None => self,
        }
    }

    fn map_active(self, f: impl FnOnce(Menu) -> Menu) -> Menu {
        match self.submenu {
            Some(child) => Self {
                submenu: Some(Box::new((*child).map_active(f))),
                ..self
            },
            None => f(self),
        }
    }
}

impl<'de> Deserialize<'de> for Menu {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            options: Vec<MenuOption>,
            selection: usize,
            submenu: Option<Box<Menu>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let len = raw.options.len();
        if raw.selection >= len.max(1) {
            return Err(de::Error::custom(format_args!(
                "selection {} out of range for {len} options",
                raw.selection
            )));
        }
        Ok(Self {
            options: raw.options,
            selection: raw.selection,
            submenu: raw.submenu,
        })
    }
}
