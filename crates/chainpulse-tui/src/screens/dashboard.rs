//! Dashboard screen — summary cards plus a time-series chart.
//!
//! Layout:
//! ┌─ chainpulse ── [Bitcoin] Ethereum Solana Polygon Avalanche ───────┐
//! │  [1h]  24h  7d  30d                                               │
//! │ ┌─ Active Addr ─┐┌─ Transactions ┐┌─ Avg Block ──┐ ... (6 cards)  │
//! │ │ 124.3K        ││ 412.88K       ││ 12.4s        │                │
//! │ │ ▲ +2.4%       ││ ▼ -1.1%       ││ ▲ +0.3%      │                │
//! │ └───────────────┘└───────────────┘└──────────────┘                │
//! │ ┌─ Active Addresses ── Braille line chart ──────────────────────┐ │
//! │ │                                                               │ │
//! │ └───────────────────────────────────────────────────────────────┘ │
//! ├─ ←/→ network  h 1h  d 24h  w 7d  m 30d  tab chart  r retry ──────┤
//! └───────────────────────────────────────────────────────────────────┘
//!
//! In `Loading` and `Error` states the card/chart region is replaced by a
//! throbber or the error pane — stale data is never drawn.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph,
};
use strum::IntoEnumIterator;
use throbber_widgets_tui::{Throbber, ThrobberState};

use chainpulse_core::{
    DerivedMetric, FetchState, MetricField, Network, SampleSeries, Selection, Timeframe, Trend,
    derive, derive_all,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{num_fmt, sub_tabs};

pub struct DashboardScreen {
    selection: Selection,
    state: FetchState,
    /// Field shown in the main chart; cycled with Tab.
    chart_field: MetricField,
    throbber: ThrobberState,
}

impl DashboardScreen {
    pub fn new(initial: Selection) -> Self {
        Self {
            selection: initial,
            state: FetchState::Loading,
            chart_field: MetricField::ActiveAddresses,
            throbber: ThrobberState::default(),
        }
    }

    fn accent(&self) -> ratatui::style::Color {
        theme::network_accent(self.selection.network)
    }

    fn networks() -> Vec<Network> {
        Network::iter().collect()
    }

    fn cycle_network(&self, step: isize) -> Network {
        let networks = Self::networks();
        let current = networks
            .iter()
            .position(|n| *n == self.selection.network)
            .unwrap_or(0);
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        let next = (current as isize + step).rem_euclid(networks.len() as isize) as usize;
        networks[next]
    }

    fn cycle_chart_field(&mut self) {
        let fields: Vec<MetricField> = MetricField::iter().collect();
        let current = fields
            .iter()
            .position(|f| *f == self.chart_field)
            .unwrap_or(0);
        self.chart_field = fields[(current + 1) % fields.len()];
    }

    // ── Render helpers ───────────────────────────────────────────

    fn render_network_tabs(&self, frame: &mut Frame, area: Rect) {
        let networks = Self::networks();
        let labels: Vec<&str> = networks.iter().map(|n| n.label()).collect();
        let active = networks
            .iter()
            .position(|n| *n == self.selection.network)
            .unwrap_or(0);

        let mut line = sub_tabs::render_sub_tabs(&labels, active, self.accent());
        line.spans.insert(0, Span::styled(" chainpulse  ", theme::title_style()));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_timeframe_tabs(&self, frame: &mut Frame, area: Rect) {
        let timeframes: Vec<Timeframe> = Timeframe::iter().collect();
        let labels: Vec<String> = timeframes.iter().map(ToString::to_string).collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let active = timeframes
            .iter()
            .position(|t| *t == self.selection.timeframe)
            .unwrap_or(0);

        let line = sub_tabs::render_sub_tabs(&label_refs, active, self.accent());
        frame.render_widget(Paragraph::new(line), area);
    }

    /// One bordered card per metric, evenly spread across the row.
    fn render_cards(frame: &mut Frame, area: Rect, series: &SampleSeries) {
        let metrics = derive_all(series);
        let columns = Layout::horizontal(
            std::iter::repeat_n(Constraint::Ratio(1, 6), metrics.len()),
        )
        .split(area);

        for (metric, column) in metrics.iter().zip(columns.iter()) {
            Self::render_card(frame, *column, metric);
        }
    }

    fn render_card(frame: &mut Frame, area: Rect, metric: &DerivedMetric) {
        let block = Block::default()
            .title(format!(" {} ", metric.field.label()))
            .title_style(theme::card_label())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let arrow = match metric.trend {
            Trend::Up => "▲",
            Trend::Down => "▼",
        };
        let lines = vec![
            Line::from(Span::styled(
                format!(" {}", num_fmt::fmt_metric(metric.field, metric.value)),
                theme::card_value(),
            )),
            Line::from(vec![
                Span::styled(
                    format!(" {arrow} {}", num_fmt::fmt_percent(metric.percent_change)),
                    theme::trend_style(metric.trend),
                ),
                Span::styled(" vs prev", theme::card_label()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Braille line chart of the focused field over the whole series.
    fn render_chart(&self, frame: &mut Frame, area: Rect, series: &SampleSeries) {
        let points = series.field_points(self.chart_field);
        let latest = derive(series, self.chart_field);

        let title = format!(
            " {} — {} ",
            self.chart_field.label(),
            num_fmt::fmt_metric(self.chart_field, latest.value),
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if points.len() < 2 {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  Not enough samples to chart")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let x_min = points.first().map_or(0.0, |&(x, _)| x);
        let x_max = points.last().map_or(1.0, |&(x, _)| x);
        let y_min_raw = points.iter().map(|&(_, y)| y).fold(f64::MAX, f64::min);
        let y_max_raw = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
        // Pad vertically so the line never hugs the border.
        let pad = ((y_max_raw - y_min_raw) * 0.1).max(y_max_raw * 0.01);
        let y_min = (y_min_raw - pad).max(0.0);
        let y_max = y_max_raw + pad;

        let dataset = Dataset::default()
            .name(self.chart_field.label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.accent()))
            .data(&points);

        let axis_style = Style::default().fg(theme::BORDER_GRAY);
        let y_labels = vec![
            Span::styled(num_fmt::fmt_axis(y_min), axis_style),
            Span::styled(num_fmt::fmt_axis((y_min + y_max) / 2.0), axis_style),
            Span::styled(num_fmt::fmt_axis(y_max), axis_style),
        ];
        let timeframe = series.timeframe;
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let x_labels = vec![
            Span::styled(num_fmt::fmt_timestamp(x_min as i64, timeframe), axis_style),
            Span::styled(num_fmt::fmt_timestamp(x_max as i64, timeframe), axis_style),
        ];

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(Axis::default().bounds([x_min, x_max]).labels(x_labels).style(axis_style))
            .y_axis(Axis::default().bounds([y_min, y_max]).labels(y_labels).style(axis_style));

        frame.render_widget(chart, area);
    }

    fn render_loading(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let row = center_row(inner);
        let throbber = Throbber::default()
            .label(format!(
                "Fetching {} metrics…",
                self.selection.network.label()
            ))
            .style(Style::default().fg(self.accent()));
        frame.render_stateful_widget(throbber, row, &mut self.throbber);
    }

    fn render_error(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title(" Fetch failed ")
            .title_style(theme::error_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::error_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(message.to_owned(), theme::error_style()))
                .alignment(Alignment::Center),
            Line::from(""),
            Line::from(vec![
                Span::styled("press ", theme::key_hint()),
                Span::styled("r", theme::key_hint_key()),
                Span::styled(" to retry", theme::key_hint()),
            ])
            .alignment(Alignment::Center),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_hints(frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled("  ←/→ ", theme::key_hint_key()),
            Span::styled("network  ", theme::key_hint()),
            Span::styled("h ", theme::key_hint_key()),
            Span::styled("1h  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("24h  ", theme::key_hint()),
            Span::styled("w ", theme::key_hint_key()),
            Span::styled("7d  ", theme::key_hint()),
            Span::styled("m ", theme::key_hint_key()),
            Span::styled("30d  ", theme::key_hint()),
            Span::styled("tab ", theme::key_hint_key()),
            Span::styled("chart  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("retry  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}

/// A one-row area vertically centered within `area`, slightly indented.
fn center_row(area: Rect) -> Rect {
    let y = area.y + area.height / 2;
    Rect {
        x: area.x + 2,
        y,
        width: area.width.saturating_sub(2),
        height: 1,
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Left => Some(Action::SelectNetwork(self.cycle_network(-1))),
            KeyCode::Right => Some(Action::SelectNetwork(self.cycle_network(1))),
            KeyCode::Char(c @ '1'..='5') => {
                let networks = Self::networks();
                #[allow(clippy::as_conversions, clippy::cast_lossless)]
                let index = (c as usize) - ('1' as usize);
                networks.get(index).map(|n| Action::SelectNetwork(*n))
            }
            // Timeframe selection: h=1h, d=24h, w=7d, m=30d
            KeyCode::Char('h') => Some(Action::SelectTimeframe(Timeframe::OneHour)),
            KeyCode::Char('d') => Some(Action::SelectTimeframe(Timeframe::TwentyFourHours)),
            KeyCode::Char('w') => Some(Action::SelectTimeframe(Timeframe::SevenDays)),
            KeyCode::Char('m') => Some(Action::SelectTimeframe(Timeframe::ThirtyDays)),
            KeyCode::Char('r') => Some(Action::Retry),
            KeyCode::Tab => Some(Action::CycleChartField),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StateChanged(state) => {
                self.state = state.clone();
            }
            Action::SelectionChanged(selection) => {
                self.selection = *selection;
            }
            Action::CycleChartField => {
                self.cycle_chart_field();
            }
            Action::Tick => {
                if self.state.is_loading() {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1), // network tabs
            Constraint::Length(1), // timeframe tabs
            Constraint::Min(8),    // body
            Constraint::Length(1), // hints
        ])
        .split(area);

        self.render_network_tabs(frame, layout[0]);
        self.render_timeframe_tabs(frame, layout[1]);

        // No stale or partial data: the body is drawn from the current
        // state only.
        match self.state.clone() {
            FetchState::Loading => self.render_loading(frame, layout[2]),
            FetchState::Error(message) => Self::render_error(frame, layout[2], &message),
            FetchState::Ready(series) => {
                let body = Layout::vertical([
                    Constraint::Length(4), // cards row
                    Constraint::Min(6),    // chart
                ])
                .split(layout[2]);
                Self::render_cards(frame, body[0], &series);
                self.render_chart(frame, body[1], &series);
            }
        }

        Self::render_hints(frame, layout[3]);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chainpulse_core::HealthSample;
    use pretty_assertions::assert_eq;

    use super::*;

    fn screen() -> DashboardScreen {
        DashboardScreen::new(Selection {
            network: Network::Ethereum,
            timeframe: Timeframe::TwentyFourHours,
        })
    }

    fn ready_state() -> FetchState {
        FetchState::Ready(Arc::new(SampleSeries {
            network: Network::Ethereum,
            timeframe: Timeframe::TwentyFourHours,
            samples: vec![HealthSample {
                timestamp_ms: 1_000,
                active_addresses: 120_000.0,
                transaction_count: 400_000.0,
                average_block_time: 12.0,
                network_hash_rate: 120_000_000.0,
                difficulty: 1_500_000.0,
                fees: 5.0,
            }],
        }))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn network_cycling_wraps_both_ways() {
        let screen = screen();
        assert_eq!(screen.cycle_network(1), Network::Solana);
        assert_eq!(screen.cycle_network(-1), Network::Bitcoin);
        assert_eq!(screen.cycle_network(-2), Network::Avalanche);
    }

    #[test]
    fn timeframe_keys_map_to_the_fixed_set() {
        let mut screen = screen();
        let action = screen.handle_key_event(key(KeyCode::Char('w'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::SelectTimeframe(Timeframe::SevenDays))
        ));

        let action = screen.handle_key_event(key(KeyCode::Char('m'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::SelectTimeframe(Timeframe::ThirtyDays))
        ));
    }

    #[test]
    fn number_keys_select_networks_directly() {
        let mut screen = screen();
        let action = screen.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        assert!(matches!(action, Some(Action::SelectNetwork(Network::Solana))));

        // Out-of-range digits do nothing.
        let action = screen.handle_key_event(key(KeyCode::Char('9'))).unwrap();
        assert!(action.is_none());
    }

    #[test]
    fn retry_key_emits_retry() {
        let mut screen = screen();
        let action = screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        assert!(matches!(action, Some(Action::Retry)));
    }

    #[test]
    fn state_and_selection_updates_are_applied() {
        let mut screen = screen();
        screen.update(&Action::StateChanged(ready_state())).unwrap();
        assert!(screen.state.is_ready());

        screen
            .update(&Action::SelectionChanged(Selection {
                network: Network::Polygon,
                timeframe: Timeframe::OneHour,
            }))
            .unwrap();
        assert_eq!(screen.selection.network, Network::Polygon);
    }

    #[test]
    fn tab_cycles_through_all_chart_fields_and_wraps() {
        let mut screen = screen();
        assert_eq!(screen.chart_field, MetricField::ActiveAddresses);
        for _ in 0..6 {
            screen.update(&Action::CycleChartField).unwrap();
        }
        assert_eq!(screen.chart_field, MetricField::ActiveAddresses);
    }
}
