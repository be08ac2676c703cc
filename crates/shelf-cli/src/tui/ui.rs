//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use shelf_core::{year_range, Book, ImportMode, Statistics};

use super::app::{AddField, App, Focus, MenuItem};
use crate::commands::transfer::EMPTY_EXPORT;
use crate::output::{read_label, truncate, EMPTY_LIBRARY};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(outer_chunks[0]);

    draw_sidebar(frame, app, pane_chunks[0]);
    draw_content(frame, app, pane_chunks[1]);
    draw_status_bar(frame, app, outer_chunks[1]);

    if let Some(msg) = &app.error_message {
        draw_error_popup(frame, msg);
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn highlight_style(active: bool) -> Style {
    if active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

fn bold(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().add_modifier(Modifier::DIM),
    ))
}

/// Draw the counters and the menu (left)
fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let counters = vec![
        Line::from(vec![bold("Total Books:  "), Span::raw(app.summary.total.to_string())]),
        Line::from(vec![bold("Read Books:   "), Span::raw(app.summary.read.to_string())]),
        Line::from(vec![bold("Unread Books: "), Span::raw(app.summary.unread.to_string())]),
    ];
    let counters = Paragraph::new(counters).block(
        Block::default()
            .title(" Library ")
            .borders(Borders::ALL),
    );
    frame.render_widget(counters, chunks[0]);

    let is_active = app.focus == Focus::Menu;
    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .map(|item| ListItem::new(item.label()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Menu ")
                .borders(Borders::ALL)
                .border_style(border_style(is_active)),
        )
        .highlight_style(highlight_style(is_active));

    let mut state = ListState::default();
    state.select(Some(app.menu_index));

    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// Draw the view for the selected menu entry (right)
fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    let item = app.current_menu();
    let block = Block::default()
        .title(format!(" {} ", item.label()))
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Content));

    match item {
        MenuItem::Home => draw_home(frame, block, area),
        MenuItem::AddBook => draw_add_form(frame, app, block, area),
        MenuItem::RemoveBook => draw_remove(frame, app, block, area),
        MenuItem::SearchBooks => draw_search(frame, app, block, area),
        MenuItem::ViewAll => {
            if app.books.is_empty() {
                draw_lines(frame, block, area, vec![dim(EMPTY_LIBRARY)]);
            } else {
                draw_books(frame, app, &app.books, block, area);
            }
        }
        MenuItem::Statistics => draw_statistics(frame, app, block, area),
        MenuItem::Export => draw_export(frame, app, block, area),
        MenuItem::Import => draw_import(frame, app, block, area),
        MenuItem::Exit => draw_lines(
            frame,
            block,
            area,
            vec![Line::from("Press Enter to leave shelf. Thank you for reading!")],
        ),
    }
}

fn draw_lines(frame: &mut Frame, block: Block, area: Rect, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_home(frame: &mut Frame, block: Block, area: Rect) {
    let lines = vec![
        Line::from(bold("Personal Library")),
        Line::from(""),
        Line::from("Manage your book collection:"),
        Line::from("  - Add new books with year, genre and read status"),
        Line::from("  - Track reading progress"),
        Line::from("  - Search your collection"),
        Line::from("  - Import and export your library as JSON"),
        Line::from("  - View statistics"),
        Line::from(""),
        dim("j/k to move, Enter to open a view, Esc to return to the menu"),
    ];
    draw_lines(frame, block, area, lines);
}

/// One book as a two-line list entry
fn book_lines(book: &Book, width: usize) -> Vec<Line<'static>> {
    vec![
        Line::from(bold_owned(truncate(&book.title, width))),
        dim(truncate(
            &format!(
                "{} | {} | {} | {}",
                book.author,
                book.year,
                book.genre,
                read_label(book.read)
            ),
            width,
        )),
    ]
}

fn bold_owned(text: String) -> Span<'static> {
    Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

fn draw_books(frame: &mut Frame, app: &App, books: &[Book], block: Block, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    for book in books {
        lines.extend(book_lines(book, width));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.list_scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Label and value of one form row, highlighted when focused
fn form_row(label: &str, value: String, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<18}", label), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(value, value_style),
    ])
}

fn draw_add_form(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let form = &app.add_form;
    let editing = app.focus == Focus::Content;
    let focused = |field: AddField| editing && form.field == field;
    let range = year_range();

    let lines = vec![
        form_row("Title", form.title.clone(), focused(AddField::Title)),
        form_row("Author", form.author.clone(), focused(AddField::Author)),
        form_row(
            &format!("Year ({}-{})", range.start(), range.end()),
            form.year.clone(),
            focused(AddField::Year),
        ),
        form_row(
            "Genre",
            format!("< {} >", form.genre),
            focused(AddField::Genre),
        ),
        form_row(
            "Read",
            if form.read { "[x]" } else { "[ ]" }.to_string(),
            focused(AddField::Read),
        ),
        Line::from(""),
        form_row("", "[ Add Book ]".to_string(), focused(AddField::Submit)),
        Line::from(""),
        dim("Tab/↑/↓ move  ←/→ genre  Space toggle read  Enter add  Esc menu"),
    ];
    draw_lines(frame, block, area, lines);
}

fn draw_remove(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    if app.titles.is_empty() {
        draw_lines(frame, block, area, vec![dim(EMPTY_LIBRARY)]);
        return;
    }

    let is_active = app.focus == Focus::Content;
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .titles
        .iter()
        .map(|t| ListItem::new(truncate(t, width)))
        .collect();

    let list = List::new(items)
        .block(block.title_bottom(" Enter removes every book with the selected title "))
        .highlight_style(highlight_style(is_active));

    let mut state = ListState::default();
    state.select(Some(app.remove_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_search(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let input = Paragraph::new(app.search_input.as_str()).block(
        Block::default()
            .title(" Search by Title, Author, or Genre ")
            .borders(Borders::ALL),
    );
    frame.render_widget(input, chunks[0]);

    if app.focus == Focus::Content {
        let cursor_x = chunks[0].x + 1 + app.search_input.chars().count() as u16;
        frame.set_cursor_position((cursor_x, chunks[0].y + 1));
    }

    if app.search_input.is_empty() {
        return;
    }

    let results_block = Block::default().title(format!(" Found {} results ", app.search_results.len()));
    if app.search_results.is_empty() {
        draw_lines(
            frame,
            results_block,
            chunks[1],
            vec![dim("No books found matching your search")],
        );
    } else {
        draw_books(frame, app, &app.search_results, results_block, chunks[1]);
    }
}

fn draw_statistics(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let Some(stats) = Statistics::compute(&app.books) else {
        draw_lines(frame, block, area, vec![dim(EMPTY_LIBRARY)]);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(inner);

    let counters = Line::from(vec![
        bold("Total Books: "),
        Span::raw(format!("{}    ", stats.total)),
        bold("Read: "),
        Span::styled(format!("{}    ", stats.read), Style::default().fg(Color::Green)),
        bold("Unread: "),
        Span::styled(stats.unread.to_string(), Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::from(""), counters]), chunks[0]);

    let data: Vec<(&str, u64)> = stats
        .genre_histogram
        .iter()
        .map(|(genre, count)| (genre.as_str(), *count as u64))
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(" Books per Genre ").borders(Borders::TOP))
        .data(data.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(chart, chunks[1]);
}

fn draw_export(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let mut lines = Vec::new();
    if app.books.is_empty() {
        lines.push(dim(EMPTY_EXPORT));
        lines.push(Line::from(""));
    }
    lines.push(form_row(
        "Export to",
        app.export_path.clone(),
        app.focus == Focus::Content,
    ));
    lines.push(Line::from(""));
    lines.push(dim("Enter writes the library as pretty-printed JSON  Esc menu"));
    draw_lines(frame, block, area, lines);
}

fn draw_import(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let editing = app.focus == Focus::Content;
    let lines = vec![
        form_row("JSON file", app.import_path.clone(), editing),
        form_row("Import Mode", format!("< {} >", mode_label(app)), false),
        Line::from(""),
        dim("Replace discards the current library. Merge adds books whose title and author are new."),
        Line::from(""),
        dim("Tab toggles mode  Enter confirms import  Esc menu"),
    ];
    draw_lines(frame, block, area, lines);
}

fn mode_label(app: &App) -> &'static str {
    match app.import_mode {
        ImportMode::Replace => "Replace",
        ImportMode::Merge => "Merge",
    }
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.focus {
            Focus::Menu => "j/k:move  Enter:open  q:quit".to_string(),
            Focus::Content => "Esc:menu  Ctrl+C:quit".to_string(),
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Draw an error popup, dismissed by any key
fn draw_error_popup(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        dim("Press any key to close"),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use shelf_core::{Config, Genre, Store};
    use tempfile::TempDir;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_sidebar_counters_and_views() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap();
        store
            .add_book(Book::new("Dune", "Herbert", 1965, Genre::ScienceFiction, true))
            .unwrap();
        store
            .add_book(Book::new("Emma", "Austen", 1815, Genre::Romance, false))
            .unwrap();

        let mut app = App::new(&store);
        let screen = render(&app);
        assert!(screen.contains("Total Books:  2"));
        assert!(screen.contains("Unread Books: 1"));
        assert!(screen.contains("Personal Library"));

        app.menu_index = 4;
        assert!(render(&app).contains("Dune"));

        app.menu_index = 5;
        assert!(render(&app).contains("Books per Genre"));
    }

    #[test]
    fn test_empty_library_views() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap();
        let mut app = App::new(&store);

        app.menu_index = 4;
        assert!(render(&app).contains("Your library is empty!"));

        app.menu_index = 6;
        assert!(render(&app).contains(EMPTY_EXPORT));
    }

    #[test]
    fn test_error_popup() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap();
        let mut app = App::new(&store);

        app.set_error("Error: not a JSON array");
        assert!(render(&app).contains("not a JSON array"));
    }
}
