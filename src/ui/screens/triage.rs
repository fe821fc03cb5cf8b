use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

/// Render the health worker screen - case table plus a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_case_table(frame, app, chunks[0]);
    render_case_detail(frame, app, chunks[1]);
}

fn render_case_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_cases();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Age"),
        Cell::from("Status"),
        Cell::from("Urgency"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .map(|&i| {
            let case = &app.cases[i];
            Row::new(vec![
                Cell::from(case.name.clone()),
                Cell::from(format!("{:>3}", case.age)),
                Cell::from(case.status.to_string()),
                Cell::from(case.urgency_display())
                    .style(styles::urgency_style(case.urgency_rank())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(40), // Name
        Constraint::Length(4),      // Age
        Constraint::Fill(2),        // Status
        Constraint::Length(8),      // Urgency
    ];

    let sort_label = if app.sort_by_urgency { "urgency" } else { "none" };
    let title = format!(
        " Triage Cases ({}) - filter: {} - sort: {} ",
        visible.len(),
        app.status_filter,
        sort_label
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(app.case_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_case_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Case Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let lines = match app.selected_case() {
        Some(case) => vec![
            Line::from(Span::styled(
                format!(" {}, {}", case.name, case.age),
                styles::title_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Status:  ", styles::muted_style()),
                Span::styled(case.status.to_string(), styles::list_item_style()),
            ]),
            Line::from(vec![
                Span::styled(" Urgency: ", styles::muted_style()),
                Span::styled(
                    case.urgency_display(),
                    styles::urgency_style(case.urgency_rank()),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(" Notes", styles::highlight_style())),
            Line::from(Span::styled(
                format!(" {}", truncate_string(&case.notes, 200)),
                styles::list_item_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" [t] ", styles::help_key_style()),
                Span::styled("Mark as treated", styles::help_desc_style()),
            ]),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                " No cases match the current filter",
                styles::muted_style(),
            )),
        ],
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
