// src/ui/render.rs
use super::dialog::{CreateDialog, Field};
use super::{App, Modal};
use crate::filesystem::{Attribute, AttributeStore};
use ratatui::{prelude::*, widgets::*};

const HINTS: &str = "Enter open/expand  c create  d delete  1-4 toggle rahs  g open dir  . hidden  q quit";

pub fn draw<S: AttributeStore>(f: &mut Frame, app: &App<S>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(f.size());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(outer[0]);

    draw_tree(f, app, panes[0]);
    draw_content(f, app, panes[1]);

    let status = Paragraph::new(app.session.status_line()).style(Style::default().fg(Color::Yellow));
    f.render_widget(status, outer[1]);
    let hints = Paragraph::new(HINTS).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, outer[2]);

    match app.modal {
        Modal::None => {}
        Modal::Create(ref dialog) => draw_create(f, dialog),
        Modal::OpenRoot(ref prompt) => {
            let text = format!("{}_", prompt.input);
            draw_popup(f, " Select directory to open ", vec![Line::from(text)], 70, 3);
        }
        Modal::ConfirmDelete(ref path) => {
            let lines = vec![Line::from(format!("Delete {}?", path.display())), Line::from("[y]es / [n]o")];
            draw_popup(f, " Delete ", lines, 60, 4);
        }
        Modal::Error(ref message) => {
            let lines = vec![
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from("[ OK ]"),
            ];
            draw_popup(f, " Error ", lines, 60, 6);
        }
    }
}

fn draw_tree<S: AttributeStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .rows()
        .iter()
        .map(|row| {
            let marker = match (row.is_dir, row.expanded, row.has_children) {
                (true, true, _) => "▾ ",
                (true, false, true) => "▸ ",
                (true, false, false) => "▹ ",
                (false, _, _) => "  ",
            };
            let style = if row.is_dir { Style::default().fg(Color::Cyan) } else { Style::default() };
            ListItem::new(Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::raw(marker),
                Span::styled(row.name.clone(), style),
            ]))
        })
        .collect();

    let title = format!(" {} ", app.session.root().display());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.view.cursor()));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_content<S: AttributeStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let (title, text) = match app.session.opened() {
        Some(opened) => (format!(" {} ", opened.path().display()), opened.content()),
        None => (" No file opened ".to_string(), ""),
    };
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_create(f: &mut Frame, dialog: &CreateDialog) {
    let focus = dialog.focus();
    let mark = |field: Field| if field == focus { "> " } else { "  " };
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let mut lines = vec![
        Line::from(format!("{}Name: {}_", mark(Field::Name), dialog.name)),
        Line::from(format!(
            "{}Type: {} File  {} Directory",
            mark(Field::Kind),
            check(!dialog.is_directory),
            check(dialog.is_directory)
        )),
    ];
    for attr in Attribute::ALL {
        lines.push(Line::from(format!(
            "{}{} {}",
            mark(Field::Flag(attr)),
            check(dialog.attributes.get(attr)),
            attr.label()
        )));
    }
    lines.push(Line::from(""));
    if let Some(ref error) = dialog.error {
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from("Tab next  Space toggle  Enter OK  Esc cancel"));

    let title = format!(" Create in {} ", dialog.parent.display());
    let height = lines.len() as u16 + 2;
    draw_popup(f, &title, lines, 70, height);
}

fn draw_popup(f: &mut Frame, title: &str, lines: Vec<Line>, percent_x: u16, height: u16) {
    let area = centered_rect(percent_x, height, f.size());
    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let width = (u32::from(r.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width.saturating_sub(width)) / 2,
        y: r.y + (r.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
