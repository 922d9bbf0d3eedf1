//! Screen layout.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Header: title, search bar, "Updated in Real Time"    │
//! ├──────────────────────────────────────────────────────┤
//! │ Heading + radius tabs                                │
//! ├──────────────────┬───────────────────────────────────┤
//! │ Airport list     │ Detail card                       │
//! │                  ├───────────────────────────────────┤
//! │                  │ Live departures                   │
//! ├──────────────────┴───────────────────────────────────┤
//! │ Key help                                             │
//! └──────────────────────────────────────────────────────┘
//! ```

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};

use super::input::{InputMode, InputState, PromptKind};
use crate::radius::Radius;
use crate::shell::{
    Dashboard, DepartureRows, Departures, LOADING_AIRPORTS_MESSAGE, LOADING_FLIGHTS_MESSAGE,
    NO_FLIGHTS_MESSAGE, Screen,
};

const TITLE: &str = "AeroLocate";
const TAGLINE: &str = "Updated in Real Time";
const HELP: &str =
    " ←/→ radius  ↑/↓ airport  / search city  i look up IP  r re-detect  q quit ";

fn accent() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn render_ui(frame: &mut Frame, screen: &Screen, input: &InputState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_header(frame, chunks[0], input);

    match screen {
        Screen::Dashboard(dashboard) => render_dashboard(frame, chunks[1], dashboard),
        other => {
            let style = match other {
                Screen::LoadingLocation { .. } => Style::default().fg(Color::Yellow),
                _ => Style::default().fg(Color::Red),
            };
            let message = Paragraph::new(Span::styled(
                other.message().unwrap_or_default().to_string(),
                style,
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(muted()));
            frame.render_widget(message, chunks[1]);
        }
    }

    frame.render_widget(Paragraph::new(Span::styled(HELP, muted())), chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect, input: &InputState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(24),
        ])
        .split(area);

    let block = || Block::default().borders(Borders::BOTTOM).border_style(muted());

    frame.render_widget(
        Paragraph::new(Span::styled(TITLE, accent())).block(block()),
        columns[0],
    );

    let search = match &input.mode {
        InputMode::Editing { kind, buffer } if buffer.is_empty() => Line::from(vec![
            Span::styled(kind.label(), muted()),
            Span::styled("▏", accent()),
        ]),
        InputMode::Editing { buffer, .. } => Line::from(vec![
            Span::raw(buffer.clone()),
            Span::styled("▏", accent()),
        ]),
        InputMode::Normal => match &input.last_search {
            Some(text) => Line::from(Span::raw(text.clone())),
            None => Line::from(Span::styled(PromptKind::City.label(), muted())),
        },
    };
    frame.render_widget(Paragraph::new(search).block(block()), columns[1]);

    frame.render_widget(
        Paragraph::new(Span::styled(TAGLINE, Style::default().fg(Color::Green)))
            .alignment(Alignment::Right)
            .block(block()),
        columns[2],
    );
}

fn render_dashboard(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let options: Vec<Line> = Radius::all().map(|r| Line::from(r.to_string())).collect();
    let selected = Radius::all()
        .position(|r| r == dashboard.radius)
        .unwrap_or_default();
    let tabs = Tabs::new(options)
        .select(selected)
        .highlight_style(accent().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(muted())
                .title(Span::styled(format!(" {} ", dashboard.heading), accent())),
        );
    frame.render_widget(tabs, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    render_airport_list(frame, columns[0], dashboard);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(columns[1]);

    render_detail(frame, right[0], dashboard);
    if let Some(departures) = &dashboard.departures {
        render_departures(frame, right[1], departures);
    }
}

fn render_airport_list(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(muted())
        .title(" Airports ");

    if dashboard.airports_loading {
        frame.render_widget(
            Paragraph::new(Span::styled(LOADING_AIRPORTS_MESSAGE, Style::default().fg(Color::Yellow)))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = dashboard
        .airports
        .iter()
        .map(|airport| {
            let mut spans = vec![Span::raw(airport.name.clone())];
            if let Some(km) = airport.distance_km {
                spans.push(Span::styled(format!("  {:.0} km", km), muted()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let selected = dashboard.airports.iter().position(|a| a.selected);
    let mut state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .block(block)
        .highlight_style(accent().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(muted());

    let Some(detail) = &dashboard.detail else {
        frame.render_widget(block, area);
        return;
    };

    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<9}", label), muted()),
            Span::raw(value.to_string()),
        ])
    };
    let lines = vec![
        field("IATA:", &detail.iata),
        field("ICAO:", &detail.icao),
        field("City:", &detail.city),
        field("Country:", &detail.country),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block.title(Span::styled(format!(" {} ", detail.name), accent()))),
        area,
    );
}

fn render_departures(frame: &mut Frame, area: Rect, departures: &Departures) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(muted())
        .title(format!(" {} ", departures.title));

    let rows = match &departures.rows {
        DepartureRows::Loading => {
            frame.render_widget(
                Paragraph::new(Span::styled(LOADING_FLIGHTS_MESSAGE, Style::default().fg(Color::Yellow)))
                    .block(block),
                area,
            );
            return;
        }
        DepartureRows::Empty => {
            frame.render_widget(Paragraph::new(NO_FLIGHTS_MESSAGE).block(block), area);
            return;
        }
        DepartureRows::Rows { rows } => rows,
    };

    let header = Row::new(["Flight", "Airline", "To", "Status", "Sched"]).style(accent());
    let body = rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.flight.clone()),
            Cell::from(row.airline.clone()),
            Cell::from(row.destination.clone()),
            Cell::from(row.status.clone()),
            Cell::from(row.scheduled.clone()),
        ])
    });
    let table = Table::new(
        body,
        [
            Constraint::Length(9),
            Constraint::Min(12),
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block);
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{AirportButton, AirportDetail, FlightRow};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(screen: &Screen, input: &InputState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| render_ui(frame, screen, input))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_message_screen() {
        let screen = Screen::LoadingLocation {
            message: "Loading your location...".to_string(),
        };
        let text = draw(&screen, &InputState::default());
        assert!(text.contains("AeroLocate"));
        assert!(text.contains("Updated in Real Time"));
        assert!(text.contains("Search for Cities..."));
        assert!(text.contains("Loading your location..."));
    }

    #[test]
    fn test_dashboard_screen() {
        let screen = Screen::Dashboard(Dashboard {
            heading: "Airports near London, United Kingdom (1)".to_string(),
            radius: Radius::DEFAULT,
            airports_loading: false,
            airports: vec![AirportButton {
                key: "LHR-Heathrow".to_string(),
                name: "Heathrow".to_string(),
                distance_km: Some(23.4),
                selected: true,
            }],
            detail: Some(AirportDetail {
                name: "Heathrow".to_string(),
                iata: "LHR".to_string(),
                icao: "EGLL".to_string(),
                city: "N/A".to_string(),
                country: "United Kingdom".to_string(),
            }),
            departures: Some(Departures {
                title: "Live Departures from LHR".to_string(),
                rows: DepartureRows::Rows {
                    rows: vec![FlightRow {
                        key: "BA117-x".to_string(),
                        flight: "BA117".to_string(),
                        airline: "British Airways".to_string(),
                        destination: "JFK".to_string(),
                        status: "scheduled".to_string(),
                        scheduled: "10:30 UTC".to_string(),
                    }],
                },
            }),
        });
        let text = draw(&screen, &InputState::default());
        assert!(text.contains("Airports near London, United Kingdom (1)"));
        assert!(text.contains("> Heathrow"));
        assert!(text.contains("EGLL"));
        assert!(text.contains("Live Departures from LHR"));
        assert!(text.contains("BA117"));
        assert!(text.contains("JFK"));
    }

    #[test]
    fn test_search_prompt_shows_buffer() {
        let input = InputState {
            mode: InputMode::Editing {
                kind: PromptKind::City,
                buffer: "Paris".to_string(),
            },
            last_search: None,
        };
        let screen = Screen::ConfigError {
            message: "Error: Missing AviationStack API key.".to_string(),
        };
        let text = draw(&screen, &input);
        assert!(text.contains("Paris"));
        assert!(text.contains("Error: Missing AviationStack API key."));
    }
}
