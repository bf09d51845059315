use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use coursebook_core::models::Course;

use crate::app::{App, Column};
use crate::ui::styles;
use crate::utils::truncate_string;

/// Height of the detail panel under the two columns
const DETAIL_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(DETAIL_HEIGHT)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_column(frame, app, Column::Beginner, columns[0]);
    render_column(frame, app, Column::Advanced, columns[1]);
    render_course_detail(frame, app, rows[1]);
}

fn column_title(column: Column) -> &'static str {
    match column {
        Column::Beginner => "Beginners",
        Column::Advanced => "Advanced",
    }
}

fn render_column(frame: &mut Frame, app: &App, column: Column, area: Rect) {
    let courses = app.column_courses(column);
    let focused = app.column == column;
    let selection = app.selection(column);
    let name_width = (area.width as usize).saturating_sub(16).max(8);

    let items: Vec<ListItem> = courses
        .iter()
        .enumerate()
        .map(|(i, course)| {
            let mut spans = vec![Span::raw(format!(
                "{:<width$} ",
                truncate_string(&course.description, name_width),
                width = name_width
            ))];
            spans.push(Span::styled(
                format!("{:>3}", course.lessons_count.map(|n| n.to_string()).unwrap_or_default()),
                styles::muted_style(),
            ));
            if course.promo {
                spans.push(Span::styled(" PROMO", styles::promo_style()));
            }

            let style = if focused && i == selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ({}) ", column_title(column), courses.len()))
        .title_style(styles::column_title_style(focused))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if items.is_empty() {
        let hint = if app.loading.is_loading() {
            "Loading..."
        } else {
            "No courses"
        };
        let paragraph = Paragraph::new(Span::styled(hint, styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_course_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_course() {
        Some(course) => (format!(" {} ", course.description), detail_lines(&course)),
        None => (
            " No Course Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a course from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn detail_lines(course: &Course) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Category: ", styles::highlight_style()),
        Span::raw(course.category.label().to_string()),
        Span::styled("   Lessons: ", styles::highlight_style()),
        Span::raw(course.display_lessons()),
    ])];

    if let Some(ref url) = course.url {
        lines.push(Line::from(vec![
            Span::styled("Url: ", styles::highlight_style()),
            Span::raw(url.clone()),
        ]));
    }

    match course.long_description.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            lines.push(Line::from(Span::raw(text.to_string())));
        }
        _ => lines.push(Line::from(Span::styled(
            "No description",
            styles::muted_style(),
        ))),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::course;
    use coursebook_core::models::Category;

    #[test]
    fn test_detail_lines_without_long_description() {
        let mut c = course(1, 1, Category::Beginner);
        c.long_description = None;
        let lines = detail_lines(&c);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].to_string(), "No description");
    }

    #[test]
    fn test_detail_lines_include_url() {
        let mut c = course(1, 1, Category::Advanced);
        c.url = Some("angular-for-beginners".to_string());
        let lines = detail_lines(&c);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].to_string().contains("Advanced"));
    }
}
