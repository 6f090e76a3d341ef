use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::task::Priority;
use crate::tui::app::App;
use crate::tui::session::{Binding, Field};
use crate::tui::table::format_due;

/// Width of the field label column
const LABEL_W: usize = 13;

/// Render the editor's working copy, plus annotations of the bound task
pub fn render_detail_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let editor = &app.editor;
    let modifying = editor.is_modifying();

    let title = match editor.binding() {
        Binding::None => " No task ".to_string(),
        Binding::New => " New task ".to_string(),
        Binding::Existing(uuid) => {
            let id = app
                .collection
                .find(uuid)
                .map_or_else(|| uuid.clone(), |t| t.display_id());
            if modifying {
                format!(" Editing {} ", id)
            } else {
                format!(" Task {} ", id)
            }
        }
    };
    let border_color = if modifying {
        theme.selection_border
    } else {
        theme.dim
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    if editor.is_dirty() {
        block = block.title_bottom(Span::styled(
            " modified ",
            Style::default().fg(theme.warning).bg(bg),
        ));
    }

    let label_style = Style::default().fg(theme.dim).bg(bg);
    let value_style = Style::default().fg(theme.text).bg(bg);
    let focus_label = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let cursor_style = Style::default().fg(theme.highlight).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    if *editor.binding() == Binding::None {
        lines.push(Line::from(Span::styled("Nothing selected", label_style)));
    } else {
        let fields = editor.fields();
        for field in Field::ORDER {
            let focused = modifying && editor.focus() == field;
            let label = format!("{:<width$}", field.label(), width = LABEL_W);
            let mut spans = vec![Span::styled(
                label,
                if focused { focus_label } else { label_style },
            )];

            match fields.text(field) {
                Some(text) if focused => {
                    let (before, after) =
                        text.split_at_checked(editor.cursor()).unwrap_or((text, ""));
                    spans.push(Span::styled(before.to_string(), value_style));
                    spans.push(Span::styled("\u{258C}", cursor_style));
                    spans.push(Span::styled(after.to_string(), value_style));
                }
                Some(text) => {
                    let shown = if field == Field::Due && !modifying {
                        format_due(Some(text).filter(|t| !t.is_empty()))
                    } else {
                        text.to_string()
                    };
                    spans.push(Span::styled(shown, value_style));
                }
                None => {
                    let p = fields.priority;
                    let color = theme.priority_color(p);
                    let text = if p == Priority::None {
                        "none".to_string()
                    } else {
                        format!("{} ({})", p.label(), p.code())
                    };
                    spans.push(Span::styled(text, Style::default().fg(color).bg(bg)));
                    if focused {
                        spans.push(Span::styled("  \u{2190}\u{2192} / h m l n", label_style));
                    }
                }
            }
            lines.push(Line::from(spans));
        }

        if let Some(task) = editor.existing_uuid().and_then(|u| app.collection.find(u)) {
            if task.is_active() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "\u{25B6} active",
                    Style::default().fg(theme.active).bg(bg),
                )));
            }
            if !task.annotations.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Annotations",
                    Style::default()
                        .fg(theme.text_bright)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )));
                for annotation in &task.annotations {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{}  ", format_due(Some(&annotation.entry))),
                            label_style,
                        ),
                        Span::styled(annotation.description.clone(), value_style),
                    ]));
                }
            }
        }
    }

    if app.show_key_hints {
        lines.push(Line::from(""));
        let hint = if modifying {
            "tab field  ctrl-s save  esc cancel  ctrl-d add dependency"
        } else {
            "enter edit  n new  a annotate  D dependencies"
        };
        lines.push(Line::from(Span::styled(hint, label_style)));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Annotation;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(60, 20, |frame, area| {
            render_detail_panel(frame, app, area);
        })
    }

    #[test]
    fn viewing_shows_fields_read_only() {
        let app = app_with_tasks(sample_tasks());
        let output = render(&app);
        assert!(output.contains("Task 1"));
        assert!(output.contains("Fix the leaking tap"));
        assert!(output.contains("2025-03-01"));
        assert!(output.contains("High (H)"));
        assert!(!output.contains("\u{258C}"));
    }

    #[test]
    fn editing_shows_cursor_and_modified_marker() {
        let mut app = app_with_tasks(sample_tasks());
        let task = app.highlighted_task().cloned().unwrap();
        app.editor.begin_edit(&task, &app.collection).unwrap();
        app.editor.insert_char('!');

        let output = render(&app);
        assert!(output.contains("Editing 1"));
        assert!(output.contains("Fix the leaking tap!\u{258C}"));
        assert!(output.contains("modified"));
        // Due is edited as the bare date
        assert!(output.contains("20250301"));
    }

    #[test]
    fn annotations_are_listed() {
        let mut tasks = sample_tasks();
        tasks[0].annotations.push(Annotation {
            entry: "20250210T101500Z".into(),
            description: "plumber called".into(),
        });
        let app = app_with_tasks(tasks);
        let output = render(&app);
        assert!(output.contains("Annotations"));
        assert!(output.contains("2025-02-10  plumber called"));
    }

    #[test]
    fn unbound_panel() {
        let app = app_with_tasks(vec![]);
        let output = render(&app);
        assert!(output.contains("No task"));
        assert!(output.contains("Nothing selected"));
    }
}
