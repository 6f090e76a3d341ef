//! Modal keymap for quick due-date and priority assignment.

use crossterm::event::KeyCode;

use crate::model::task::Priority;

use super::session::SessionWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuickMenu {
    #[default]
    Closed,
    DateRoot,
    DateEndOf,
    Priority,
}

/// Relative due dates the date menu offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueShortcut {
    Today,
    Tomorrow,
    EndOfWeek,
    EndOfMonth,
    EndOfYear,
}

impl DueShortcut {
    /// Date keyword understood by the store
    pub fn keyword(self) -> &'static str {
        match self {
            DueShortcut::Today => "today",
            DueShortcut::Tomorrow => "tomorrow",
            DueShortcut::EndOfWeek => "eow",
            DueShortcut::EndOfMonth => "eom",
            DueShortcut::EndOfYear => "eoy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Due(DueShortcut),
    Priority(Priority),
}

impl QuickAction {
    /// `attr:value` arguments for a modify call
    pub fn modifications(self) -> Vec<String> {
        match self {
            QuickAction::Due(shortcut) => vec![format!("due:{}", shortcut.keyword())],
            QuickAction::Priority(p) => vec![format!("priority:{}", p.code())],
        }
    }

    pub fn describe(self) -> String {
        match self {
            QuickAction::Due(shortcut) => format!("due {}", shortcut.keyword()),
            QuickAction::Priority(Priority::None) => "priority cleared".to_string(),
            QuickAction::Priority(p) => format!("priority {}", p.code()),
        }
    }
}

/// What a key did to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Menu closed; apply this to the current targets
    Applied(QuickAction),
    /// Moved into a submenu
    Opened,
    /// Left a submenu, parent still open
    BackOneLevel,
    Cancelled,
    /// Key has no meaning here, swallowed anyway
    Ignored,
}

impl QuickMenu {
    pub fn is_open(self) -> bool {
        self != QuickMenu::Closed
    }

    /// Open the date menu if there is something to apply it to
    pub fn open_date(&mut self, targets: &[String]) -> Result<(), SessionWarning> {
        self.open(QuickMenu::DateRoot, targets)
    }

    pub fn open_priority(&mut self, targets: &[String]) -> Result<(), SessionWarning> {
        self.open(QuickMenu::Priority, targets)
    }

    fn open(&mut self, state: QuickMenu, targets: &[String]) -> Result<(), SessionWarning> {
        if targets.is_empty() {
            return Err(SessionWarning::NoTarget);
        }
        *self = state;
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> MenuOutcome {
        let (next, outcome) = match (*self, code) {
            (QuickMenu::Closed, _) => (QuickMenu::Closed, MenuOutcome::Ignored),

            (QuickMenu::DateRoot, KeyCode::Char('t')) => applied(QuickAction::Due(DueShortcut::Today)),
            (QuickMenu::DateRoot, KeyCode::Char('o')) => {
                applied(QuickAction::Due(DueShortcut::Tomorrow))
            }
            (QuickMenu::DateRoot, KeyCode::Char('e')) => (QuickMenu::DateEndOf, MenuOutcome::Opened),
            (QuickMenu::DateRoot, KeyCode::Esc) => (QuickMenu::Closed, MenuOutcome::Cancelled),

            (QuickMenu::DateEndOf, KeyCode::Char('w')) => {
                applied(QuickAction::Due(DueShortcut::EndOfWeek))
            }
            (QuickMenu::DateEndOf, KeyCode::Char('m')) => {
                applied(QuickAction::Due(DueShortcut::EndOfMonth))
            }
            (QuickMenu::DateEndOf, KeyCode::Char('y')) => {
                applied(QuickAction::Due(DueShortcut::EndOfYear))
            }
            (QuickMenu::DateEndOf, KeyCode::Esc) => (QuickMenu::DateRoot, MenuOutcome::BackOneLevel),

            (QuickMenu::Priority, KeyCode::Char('h')) => applied(QuickAction::Priority(Priority::High)),
            (QuickMenu::Priority, KeyCode::Char('m')) => applied(QuickAction::Priority(Priority::Mid)),
            (QuickMenu::Priority, KeyCode::Char('l')) => applied(QuickAction::Priority(Priority::Low)),
            (QuickMenu::Priority, KeyCode::Char('n' | 'c' | 'x')) => {
                applied(QuickAction::Priority(Priority::None))
            }
            (QuickMenu::Priority, KeyCode::Esc) => (QuickMenu::Closed, MenuOutcome::Cancelled),

            (state, _) => (state, MenuOutcome::Ignored),
        };
        *self = next;
        outcome
    }

    /// Title and `(key, label)` entries for the popup
    pub fn entries(self) -> (&'static str, &'static [(&'static str, &'static str)]) {
        match self {
            QuickMenu::Closed => ("", &[]),
            QuickMenu::DateRoot => (
                "Set due",
                &[("t", "today"), ("o", "tomorrow"), ("e", "end of\u{2026}"), ("Esc", "cancel")],
            ),
            QuickMenu::DateEndOf => (
                "Due end of",
                &[("w", "week"), ("m", "month"), ("y", "year"), ("Esc", "back")],
            ),
            QuickMenu::Priority => (
                "Set priority",
                &[("h", "high"), ("m", "mid"), ("l", "low"), ("n", "clear"), ("Esc", "cancel")],
            ),
        }
    }
}

fn applied(action: QuickAction) -> (QuickMenu, MenuOutcome) {
    (QuickMenu::Closed, MenuOutcome::Applied(action))
}
