//! shelf TUI
//!
//! Terminal user interface for shelf - a personal book catalog.
//!
//! ## Layout
//!
//! - Left: library counters (total, read, unread) and the menu
//! - Right: the view for the selected menu entry
//! - Bottom: status bar
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move through the menu
//! - Enter or l/→: Open the selected view
//! - Esc: Return to the menu
//! - q: Quit (from the menu), Ctrl+C: Quit anywhere

mod app;
mod ui;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use shelf_core::{Config, Store};
use tracing::{debug, info};

use app::{AddField, App, Focus, MenuItem};

/// Run the TUI application
pub fn run(config: Config) -> Result<()> {
    // Open the store before touching the terminal so load errors print normally
    let mut store = crate::commands::open_store(config)?;
    info!("Starting TUI with {} books", store.len());

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(&store);

    let result = run_app(&mut terminal, &mut app, &mut store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, store: &mut Store) -> Result<()> {
    loop {
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };

        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // If error modal is showing, any key dismisses it
        if app.has_error() {
            app.clear_error();
            continue;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.should_quit = true;
        } else {
            match app.focus {
                Focus::Menu => handle_menu_key(app, key.code),
                Focus::Content => handle_content_key(app, store, key.code),
            }
        }

        if app.should_quit {
            info!("Leaving TUI");
            break;
        }
    }

    Ok(())
}

/// Handle key events while the menu has focus
fn handle_menu_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('k') | KeyCode::Up => {
            app.status_message = None;
            app.menu_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.status_message = None;
            app.menu_down();
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.activate_menu(),
        _ => {}
    }
}

/// Handle key events inside the selected view
fn handle_content_key(app: &mut App, store: &mut Store, code: KeyCode) {
    if code == KeyCode::Esc {
        app.back_to_menu();
        return;
    }

    let menu = app.current_menu();
    debug!("{:?} key in {:?}", code, menu);

    let result = match menu {
        MenuItem::AddBook => handle_add_key(app, store, code),
        MenuItem::RemoveBook => {
            match code {
                KeyCode::Char('k') | KeyCode::Up => app.remove_up(),
                KeyCode::Char('j') | KeyCode::Down => app.remove_down(),
                KeyCode::Enter | KeyCode::Char('d') => {
                    if let Err(e) = app.remove_selected(store) {
                        app.set_error(format!("Failed to remove book: {}", e));
                    }
                }
                _ => {}
            }
            Ok(())
        }
        MenuItem::SearchBooks => {
            match code {
                KeyCode::Char(c) => app.search_insert(store, c),
                KeyCode::Backspace => app.search_delete(store),
                KeyCode::Up => app.scroll_up(),
                KeyCode::Down => app.scroll_down(),
                _ => {}
            }
            Ok(())
        }
        MenuItem::ViewAll => {
            match code {
                KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
                KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
                _ => {}
            }
            Ok(())
        }
        MenuItem::Export => {
            match code {
                KeyCode::Char(c) => app.export_path.push(c),
                KeyCode::Backspace => {
                    app.export_path.pop();
                }
                KeyCode::Enter => {
                    if let Err(e) = app.export(store) {
                        app.set_error(format!("Export failed: {}", e));
                    }
                }
                _ => {}
            }
            Ok(())
        }
        MenuItem::Import => {
            match code {
                KeyCode::Char(c) => app.import_path.push(c),
                KeyCode::Backspace => {
                    app.import_path.pop();
                }
                KeyCode::Tab | KeyCode::BackTab => app.toggle_import_mode(),
                KeyCode::Enter => app.import(store),
                _ => {}
            }
            Ok(())
        }
        MenuItem::Home | MenuItem::Statistics | MenuItem::Exit => {
            app.back_to_menu();
            Ok(())
        }
    };

    if let Err(e) = result {
        app.set_error(format!("Action failed: {}", e));
    }
}

/// Handle key events in the add book form
fn handle_add_key(app: &mut App, store: &mut Store, code: KeyCode) -> Result<()> {
    let form = &mut app.add_form;
    match code {
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
        KeyCode::Enter => {
            if form.field == AddField::Submit || form.field.is_text() {
                app.submit_add(store)?;
            } else {
                form.field = form.field.next();
            }
        }
        KeyCode::Left if form.field == AddField::Genre => form.genre = form.genre.prev(),
        KeyCode::Right if form.field == AddField::Genre => form.genre = form.genre.next(),
        KeyCode::Char(' ') if form.field == AddField::Read => form.read = !form.read,
        KeyCode::Char(c) => form.insert_char(c),
        KeyCode::Backspace => form.delete_char(),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{Book, Genre};
    use tempfile::TempDir;

    fn open_store(temp_dir: &TempDir) -> Store {
        Store::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap()
    }

    fn type_text(app: &mut App, store: &mut Store, text: &str) {
        for c in text.chars() {
            handle_content_key(app, store, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_book_by_keyboard() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let mut app = App::new(&store);

        handle_menu_key(&mut app, KeyCode::Down);
        handle_menu_key(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Content);

        type_text(&mut app, &mut store, "Dune");
        handle_content_key(&mut app, &mut store, KeyCode::Tab);
        type_text(&mut app, &mut store, "Frank Herbert");
        handle_content_key(&mut app, &mut store, KeyCode::Tab);
        for _ in 0..4 {
            handle_content_key(&mut app, &mut store, KeyCode::Backspace);
        }
        type_text(&mut app, &mut store, "1965");
        handle_content_key(&mut app, &mut store, KeyCode::Tab);
        // Other -> Fiction -> Non-Fiction -> Science Fiction
        for _ in 0..3 {
            handle_content_key(&mut app, &mut store, KeyCode::Right);
        }
        handle_content_key(&mut app, &mut store, KeyCode::Tab);
        handle_content_key(&mut app, &mut store, KeyCode::Char(' '));
        handle_content_key(&mut app, &mut store, KeyCode::Tab);
        handle_content_key(&mut app, &mut store, KeyCode::Enter);

        assert_eq!(
            store.books(),
            &[Book::new("Dune", "Frank Herbert", 1965, Genre::ScienceFiction, true)]
        );
        assert_eq!(app.summary.read, 1);
    }

    #[test]
    fn test_escape_and_quit() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let mut app = App::new(&store);

        app.menu_index = 3;
        handle_menu_key(&mut app, KeyCode::Enter);
        type_text(&mut app, &mut store, "q");
        assert!(!app.should_quit);
        assert_eq!(app.search_input, "q");

        handle_content_key(&mut app, &mut store, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Menu);
        handle_menu_key(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
