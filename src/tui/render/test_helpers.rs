use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::Config;
use crate::model::task::{Priority, Task};
use crate::ops::test_store::FakeStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Three tasks whose urgency puts them in this order
pub fn sample_tasks() -> Vec<Task> {
    let mut tap = Task::new("aaaa-1111", "Fix the leaking tap");
    tap.id = Some(1);
    tap.project = "home".into();
    tap.priority = Priority::High;
    tap.due = Some("20250301T230000Z".into());
    tap.tags = vec!["plumbing".into()];
    tap.urgency = 14.2;

    let mut passport = Task::new("bbbb-2222", "Renew passport");
    passport.id = Some(2);
    passport.project = "admin".into();
    passport.priority = Priority::Mid;
    passport.urgency = 8.0;

    let mut garden = Task::new("cccc-3333", "Plant tomatoes");
    garden.id = Some(3);
    garden.project = "home.garden".into();
    garden.urgency = 1.5;

    vec![tap, passport, garden]
}

/// An App over a [`FakeStore`] holding `tasks`, already refreshed
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let store = FakeStore::with_tasks(tasks);
    let mut app = App::new(Box::new(store), &Config::default());
    app.refresh();
    app
}
