use std::collections::{BTreeMap, BTreeSet};
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};
use scrollwork_core::boot::BOOT_LINES;
use scrollwork_core::{MotionProfile, SectionKind};
use scrollwork_protocol::{ElementKey, SectionStatus, StyleChannels, StyleCommand, ThemeToken};

use crate::app::{Action, App};

/// Renderer-side view of every style command applied so far.
#[derive(Debug, Default)]
pub struct StyleSheet {
    styles: BTreeMap<ElementKey, StyleChannels>,
    pinned: BTreeSet<ElementKey>,
    texts: BTreeMap<ElementKey, String>,
}

impl StyleSheet {
    pub fn apply(&mut self, batch: &[StyleCommand]) {
        for command in batch {
            match command {
                StyleCommand::SetStyle { target, style } => {
                    self.styles.insert(target.clone(), *style);
                }
                StyleCommand::SetPinned { target, pinned } => {
                    if *pinned {
                        self.pinned.insert(target.clone());
                    } else {
                        self.pinned.remove(target);
                    }
                }
                StyleCommand::SwapText { target, text, .. } => {
                    self.texts.insert(target.clone(), text.clone());
                }
            }
        }
    }

    pub fn style(&self, key: &str) -> Option<&StyleChannels> {
        self.styles.get(key)
    }

    pub fn is_pinned(&self, key: &str) -> bool {
        self.pinned.contains(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.styles.clear();
        self.pinned.clear();
        self.texts.clear();
    }
}

const HELP: &str = "↑↓ PgUp/PgDn scroll | 1-4 nav | m menu | b breakpoint | r reduced motion | q quit";

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Primary => Color::Rgb(0, 240, 255),
        ThemeToken::Secondary => Color::Rgb(255, 0, 153),
        ThemeToken::Accent => Color::Rgb(250, 204, 21),
        ThemeToken::Violet => Color::Rgb(168, 85, 247),
        ThemeToken::Crimson => Color::Rgb(239, 68, 68),
        ThemeToken::Background => Color::Black,
        ThemeToken::Surface => Color::Rgb(20, 20, 28),
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::Gray,
        ThemeToken::LinkNeutral => Color::DarkGray,
    }
}

fn status_token(status: SectionStatus) -> ThemeToken {
    match status {
        SectionStatus::Idle => ThemeToken::TextMuted,
        SectionStatus::Entering => ThemeToken::Secondary,
        SectionStatus::Active => ThemeToken::Primary,
        SectionStatus::Exiting => ThemeToken::Accent,
    }
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn key_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollBy(0.15),
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollBy(-0.15),
        KeyCode::PageDown | KeyCode::Char(' ') => Action::ScrollBy(1.0),
        KeyCode::PageUp => Action::ScrollBy(-1.0),
        KeyCode::Home | KeyCode::Char('g') => Action::Top,
        KeyCode::End | KeyCode::Char('G') => Action::Bottom,
        KeyCode::Char(c @ '1'..='4') => Action::Link(c as usize - '1' as usize),
        KeyCode::Char('m') => Action::ToggleMenu,
        KeyCode::Char('b') => Action::ToggleBreakpoint,
        KeyCode::Char('r') => Action::ToggleReducedMotion,
        _ => return None,
    };
    Some(action)
}

pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = (|| -> Result<()> {
        let mut last = Instant::now();
        while !app.quit {
            let now = Instant::now();
            app.step(now.duration_since(last).as_secs_f64());
            last = now;

            terminal.draw(|frame| draw(frame, &app))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = key_action(key.code) {
                            app.handle(action)?;
                        }
                    }
                }
            }
        }
        Ok(())
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let [header, nav, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(4),
    ])
    .areas(area);

    let scroll = app.session.frame().scroll_y;
    let profile = match app.session.profile() {
        MotionProfile::Full => "full",
        MotionProfile::Reduced => "reduced",
    };
    let title = format!(
        " scrollwork | {profile} {}x{} | y {scroll:.0}/{:.0} | {HELP} ",
        app.viewport.width,
        app.viewport.height,
        app.max_scroll(),
    );
    frame.render_widget(
        Paragraph::new(title).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        header,
    );

    draw_nav(frame, nav, app);

    let [sections, minimap] =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(body);
    draw_sections(frame, sections, app);
    draw_minimap(frame, minimap, app);
    draw_footer(frame, footer, app);

    let boot = app.boot_state();
    if boot.mounted {
        draw_boot(frame, area, boot.lines, boot.text_visible);
    }
}

fn draw_nav(frame: &mut Frame, area: Rect, app: &App) {
    let nav = app.session.nav();
    let mut spans = vec![Span::raw(if nav.is_scrolled() { " ( " } else { "   " })];
    for (i, link) in nav.links().iter().enumerate() {
        let style = if nav.active() == Some(&link.section) {
            Style::default()
                .fg(theme_to_color(ThemeToken::Primary))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme_to_color(ThemeToken::TextMuted))
        };
        spans.push(Span::styled(format!("{} {}", i + 1, link.label), style));
        spans.push(Span::raw("   "));
    }
    spans.push(Span::raw(if nav.is_scrolled() { ")" } else { "" }));
    if nav.menu_open() {
        spans.push(Span::styled(
            "  [menu open]",
            Style::default().fg(theme_to_color(ThemeToken::Secondary)),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_sections(frame: &mut Frame, area: Rect, app: &App) {
    let registry = app.session.registry();
    let rows = SectionKind::ALL.iter().map(|kind| {
        let id = kind.as_str();
        let snapshot = registry.snapshot(id);
        let controller = app
            .session
            .scene()
            .controllers()
            .find(|c| c.section_id() == id);
        let kind_name = controller.map_or("-", |c| c.kind());
        let detail = controller.and_then(|c| c.detail()).unwrap_or_default();
        let pinned = if app.sheet.is_pinned(id) { "pinned" } else { "" };
        let color = theme_to_color(status_token(snapshot.status));
        Row::new(vec![
            Cell::from(id),
            Cell::from(snapshot.status.as_str()).style(Style::default().fg(color)),
            Cell::from(format!(
                "{} {:>3.0}%",
                bar(snapshot.progress, 12),
                snapshot.progress * 100.0
            ))
            .style(Style::default().fg(color)),
            Cell::from(kind_name),
            Cell::from(pinned),
            Cell::from(detail),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Length(18),
            Constraint::Length(17),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["section", "status", "progress", "controller", "", "detail"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" sections "));
    frame.render_widget(table, area);
}

/// The whole document squeezed into the panel height, with the viewport
/// bracketed.
fn draw_minimap(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" page ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let doc = app.layout.document_height().max(1.0);
    let per_row = doc / f64::from(inner.height);
    let tops: Vec<(SectionKind, f64)> = SectionKind::ALL
        .iter()
        .filter_map(|k| app.layout.document_rect(k.as_str()).map(|r| (*k, r.y)))
        .collect();
    let view_top = app.session.frame().scroll_y;
    let view_bottom = view_top + app.viewport.height;

    let mut lines = Vec::with_capacity(usize::from(inner.height));
    let mut labelled = BTreeSet::new();
    for row in 0..inner.height {
        let y = (f64::from(row) + 0.5) * per_row;
        let section = tops.iter().rev().find(|(_, top)| *top <= y).map(|(k, _)| *k);
        let in_view = y >= view_top && y < view_bottom;
        let marker = Span::styled(
            if in_view { "▐" } else { " " },
            Style::default().fg(Color::White),
        );
        let Some(kind) = section else {
            lines.push(Line::from(marker));
            continue;
        };
        let status = app.session.registry().status(kind.as_str());
        let label = if labelled.insert(kind) { kind.as_str() } else { "" };
        let width = usize::from(inner.width.saturating_sub(1));
        let fill = format!("{:<width$}", format!(" {label}"));
        lines.push(Line::from(vec![
            marker,
            Span::styled(
                fill,
                Style::default()
                    .fg(Color::Black)
                    .bg(theme_to_color(status_token(status))),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let opacity = |kind: SectionKind| {
        app.sheet
            .style(kind.content().as_str())
            .map_or(1.0, |s| s.opacity)
    };
    let fades: Vec<Span> = SectionKind::ALL
        .iter()
        .flat_map(|k| {
            [
                Span::raw(format!("{} ", k.as_str())),
                Span::styled(bar(opacity(*k), 6), Style::default().fg(Color::Gray)),
                Span::raw("  "),
            ]
        })
        .collect();

    let experience = SectionKind::Experience.root();
    let label = app
        .sheet
        .text(experience.child("watermark").as_str())
        .or_else(|| app.sheet.text(experience.child("year").as_str()))
        .unwrap_or("-");
    let reduced = if app.reduced_motion() { "on" } else { "off" };
    let status = Line::from(format!(
        " period: {label} | last batch: {} commands | reduced motion: {reduced}",
        app.last_batch
    ));

    let block = Block::default().borders(Borders::TOP).title(" content opacity ");
    frame.render_widget(
        Paragraph::new(vec![Line::from(fades), status]).block(block),
        area,
    );
}

fn draw_boot(frame: &mut Frame, area: Rect, lines: usize, text_visible: bool) {
    let width = 44.min(area.width);
    let height = 7.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);
    let colors = [ThemeToken::Accent, ThemeToken::Secondary, ThemeToken::Primary];
    let text: Vec<Line> = if text_visible {
        BOOT_LINES
            .iter()
            .zip(colors)
            .take(lines)
            .enumerate()
            .map(|(i, (line, token))| {
                Line::from(vec![
                    Span::styled(format!("{:02} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(*line, Style::default().fg(theme_to_color(token))),
                ])
            })
            .collect()
    } else {
        Vec::new()
    };
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(theme_to_color(ThemeToken::Background))),
        ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_commands_win() {
        let key = ElementKey::from("about/content");
        let mut sheet = StyleSheet::default();
        sheet.apply(&[
            StyleCommand::SetStyle {
                target: key.clone(),
                style: StyleChannels::default().with_opacity(0.2),
            },
            StyleCommand::SetPinned {
                target: ElementKey::from("about"),
                pinned: true,
            },
            StyleCommand::SetStyle {
                target: key.clone(),
                style: StyleChannels::default().with_opacity(0.7),
            },
        ]);
        assert_eq!(sheet.style("about/content").map(|s| s.opacity), Some(0.7));
        assert!(sheet.is_pinned("about"));

        sheet.apply(&[StyleCommand::SetPinned {
            target: ElementKey::from("about"),
            pinned: false,
        }]);
        assert!(!sheet.is_pinned("about"));
    }

    #[test]
    fn text_swaps_replace_the_label() {
        let mut sheet = StyleSheet::default();
        for text in ["2017", "2023"] {
            sheet.apply(&[StyleCommand::SwapText {
                target: ElementKey::from("experience/year"),
                text: text.into(),
                font_size_vw: None,
                fade_out_s: 0.15,
                fade_in_s: 0.15,
            }]);
        }
        assert_eq!(sheet.text("experience/year"), Some("2023"));
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action(KeyCode::Char('3')), Some(Action::Link(2)));
        assert_eq!(key_action(KeyCode::Char('b')), Some(Action::ToggleBreakpoint));
        assert_eq!(key_action(KeyCode::Char('x')), None);
    }

    #[test]
    fn bars_are_fixed_width() {
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(2.0, 3).chars().count(), 3);
    }
}
