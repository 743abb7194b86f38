//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Cell, Table},
};
use std::io::{stdout, Stdout};

use crate::db::KeyValueStore;
use crate::tracker::Tracker;
use crate::week::{today, RangeToken};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// App state for TUI
pub struct App<S: KeyValueStore> {
    tracker: Tracker<S>,
    selected_date: NaiveDate,
    range: RangeToken,
    muscle_idx: usize,
    status: Option<String>,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self {
            tracker,
            selected_date: today(),
            range: RangeToken::OneMonth,
            muscle_idx: 0,
            status: None,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn selected_muscle(&self) -> Option<&str> {
        self.tracker.muscles().get(self.muscle_idx).map(String::as_str)
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let week = self.tracker.week_of(self.selected_date);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(12),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new(format!(
            "Week of {} | Muscle: {} | Range: {}",
            week,
            self.selected_muscle().unwrap_or("-"),
            self.range.title()
        ))
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::ALL).title("weekset"));
        frame.render_widget(header, chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        // Sets per muscle group for the week
        let bars = self.tracker.bar_series(&week);
        if bars.is_empty() {
            let empty = Paragraph::new("No sets recorded this week")
                .block(Block::default().borders(Borders::ALL).title("Sets per Muscle Group"));
            frame.render_widget(empty, middle[0]);
        } else {
            let data: Vec<(&str, u64)> = bars.iter().map(|(l, v)| (l, v as u64)).collect();
            let chart = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title("Sets per Muscle Group"))
                .bar_width(9)
                .bar_style(Style::default().fg(Color::Red))
                .value_style(Style::default().fg(Color::White).bold())
                .data(data.as_slice());
            frame.render_widget(chart, middle[0]);
        }

        // Working sets table
        let rows: Vec<Row> = self.tracker.entries_for(&week).into_iter().map(|e| {
            let style = if self.tracker.is_selectable(&e.muscle) {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(e.muscle),
                Cell::from(format!("{} sets", e.sets)),
            ])
            .style(style)
        }).collect();

        let table = Table::new(rows, [Constraint::Min(14), Constraint::Length(10)])
            .header(Row::new(vec!["Muscle", "Sets"]).style(Style::default().bold()))
            .block(Block::default().borders(Borders::ALL).title("Working Sets"));
        frame.render_widget(table, middle[1]);

        self.render_trend(frame, chunks[2]);

        // Footer
        let footer_text = self.status.clone().unwrap_or_else(|| {
            "q: quit | ←/→: week | t: today | m: muscle | r: range | +/-: sets | d: delete".to_string()
        });
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);
    }

    fn render_trend(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Trend");
        let Some(muscle) = self.selected_muscle() else {
            frame.render_widget(Paragraph::new("Gains are waiting!").block(block), area);
            return;
        };

        let series = self.tracker.trend_series(muscle, self.range.token(), today());
        if series.is_empty() {
            frame.render_widget(Paragraph::new("Gains are waiting!").block(block), area);
            return;
        }

        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect();
        let max_x = (points.len().saturating_sub(1)).max(1) as f64;
        let max_y = series.max_value().max(1.0);

        let dataset = Dataset::default()
            .name(muscle)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&points);

        let first = series.labels.first().cloned().unwrap_or_default();
        let last = series.labels.last().cloned().unwrap_or_default();
        let chart = Chart::new(vec![dataset])
            .block(block.title(self.range.title()))
            .x_axis(Axis::default().bounds([0.0, max_x]).labels(vec![first, last]))
            .y_axis(
                Axis::default()
                    .bounds([0.0, max_y])
                    .labels(vec!["0".to_string(), format!("{}", max_y as u64)]),
            );
        frame.render_widget(chart, area);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    self.status = None;
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Left => self.selected_date -= Duration::days(7),
                        KeyCode::Right => self.selected_date += Duration::days(7),
                        KeyCode::Char('t') => self.selected_date = today(),
                        KeyCode::Char('r') => self.range = self.range.next(),
                        KeyCode::Char('m') => {
                            let count = self.tracker.muscles().len();
                            if count > 0 {
                                self.muscle_idx = (self.muscle_idx + 1) % count;
                            }
                        }
                        KeyCode::Char('+') => self.add_one_set(),
                        KeyCode::Char('-') => self.drop_one_set(),
                        KeyCode::Char('d') => self.delete_entry(),
                        _ => {}
                    }
                }
        Ok(())
    }

    fn add_one_set(&mut self) {
        let Some(muscle) = self.selected_muscle().map(str::to_string) else { return };
        if let Err(e) = self.tracker.add_sets(self.selected_date, &muscle, 1) {
            self.status = Some(e.to_string());
        }
    }

    fn drop_one_set(&mut self) {
        let Some(muscle) = self.selected_muscle().map(str::to_string) else { return };
        let week = self.tracker.week_of(self.selected_date);
        let current = self.tracker.log().sets_for(&week, &muscle);
        let result = match current {
            0 => return,
            1 => self.tracker.remove_entry(self.selected_date, &muscle),
            n => self.tracker.set_count(self.selected_date, &muscle, n - 1),
        };
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }

    fn delete_entry(&mut self) {
        let Some(muscle) = self.selected_muscle().map(str::to_string) else { return };
        if let Err(e) = self.tracker.remove_entry(self.selected_date, &muscle) {
            self.status = Some(e.to_string());
        }
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
