use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, PatientFocus, UrgencyBand, SYMPTOMS};
use crate::ui::styles;

/// Render the patient screen - symptom checklist and urgency estimate
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_symptom_list(frame, app, chunks[0]);
    render_urgency_panel(frame, app, chunks[1]);
}

fn render_symptom_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.patient_focus == PatientFocus::Symptoms;

    let items: Vec<ListItem> = SYMPTOMS
        .iter()
        .enumerate()
        .map(|(i, symptom)| {
            let marker = if app.selected_symptoms.contains(&i) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), styles::highlight_style()),
                Span::styled(*symptom, styles::list_item_style()),
            ]))
        })
        .collect();

    let title = format!(
        " Select Your Symptoms ({} selected) ",
        app.selected_symptoms.len()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.symptom_cursor));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_urgency_panel(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.patient_focus == PatientFocus::UrgencySlider;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Gauge
            Constraint::Min(4),    // Assessment
        ])
        .split(area);

    let band = app.urgency_band();
    let gauge_style = match band {
        UrgencyBand::Normal => styles::success_style(),
        UrgencyBand::Moderate => styles::warning_style(),
        UrgencyBand::Critical => styles::error_style(),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Potential Urgency Level ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .gauge_style(gauge_style)
        .percent(app.urgency_estimate as u16)
        .label(format!("{}/100", app.urgency_estimate));

    frame.render_widget(gauge, chunks[0]);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", band.label()), gauge_style)),
        Line::from(""),
    ];

    let selected = app.selected_symptom_names();
    if selected.is_empty() {
        lines.push(Line::from(Span::styled(
            " No symptoms selected yet.",
            styles::muted_style(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled(" Reported: ", styles::muted_style()),
            Span::styled(selected.join(", "), styles::list_item_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Language: ", styles::muted_style()),
        Span::styled(app.language(), styles::highlight_style()),
        Span::styled("  ([l] to change)", styles::muted_style()),
    ]));

    let assessment = Paragraph::new(lines).block(
        Block::default()
            .title(" Assessment ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(assessment, chunks[1]);
}
