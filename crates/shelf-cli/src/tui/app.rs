//! Application state and logic

use std::path::PathBuf;
use std::time::{Duration, Instant};

use shelf_core::{year_range, Book, Genre, ImportMode, Store, Summary};

use crate::commands::transfer::{is_library_file, write_export, EMPTY_EXPORT};
use crate::output::EMPTY_LIBRARY;

/// Entries of the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Home,
    AddBook,
    RemoveBook,
    SearchBooks,
    ViewAll,
    Statistics,
    Export,
    Import,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 9] = [
        MenuItem::Home,
        MenuItem::AddBook,
        MenuItem::RemoveBook,
        MenuItem::SearchBooks,
        MenuItem::ViewAll,
        MenuItem::Statistics,
        MenuItem::Export,
        MenuItem::Import,
        MenuItem::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Home => "Home",
            MenuItem::AddBook => "Add Book",
            MenuItem::RemoveBook => "Remove Book",
            MenuItem::SearchBooks => "Search Books",
            MenuItem::ViewAll => "View All",
            MenuItem::Statistics => "Statistics",
            MenuItem::Export => "Export",
            MenuItem::Import => "Import",
            MenuItem::Exit => "Exit",
        }
    }

    /// Whether the view takes keyboard focus when opened
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            MenuItem::AddBook
                | MenuItem::RemoveBook
                | MenuItem::SearchBooks
                | MenuItem::ViewAll
                | MenuItem::Export
                | MenuItem::Import
        )
    }
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Content,
}

/// Fields of the add form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Title,
    Author,
    Year,
    Genre,
    Read,
    Submit,
}

impl AddField {
    pub const ALL: [AddField; 6] = [
        AddField::Title,
        AddField::Author,
        AddField::Year,
        AddField::Genre,
        AddField::Read,
        AddField::Submit,
    ];

    /// Move to the next field (wrapping)
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Move to the previous field (wrapping)
    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AddField::Title | AddField::Author | AddField::Year)
    }
}

/// State of the add book form
#[derive(Debug, Clone)]
pub struct AddForm {
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: Genre,
    pub read: bool,
    pub field: AddField,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: year_range().end().to_string(),
            genre: Genre::default(),
            read: false,
            field: AddField::Title,
        }
    }
}

impl AddForm {
    /// The text buffer behind the focused field, if it is a text field
    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            AddField::Title => Some(&mut self.title),
            AddField::Author => Some(&mut self.author),
            AddField::Year => Some(&mut self.year),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field == AddField::Year && !c.is_ascii_digit() {
            return;
        }
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Build a book from the form, or say what is wrong with it
    pub fn to_book(&self) -> Result<Book, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err("Author cannot be empty".to_string());
        }

        let range = year_range();
        let year: i32 = self
            .year
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a year", self.year.trim()))?;
        if !range.contains(&year) {
            return Err(format!(
                "Year must be between {} and {}",
                range.start(),
                range.end()
            ));
        }

        Ok(Book::new(title, author, year, self.genre, self.read))
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Currently selected menu entry
    pub menu_index: usize,
    /// Which pane has focus
    pub focus: Focus,
    /// Sidebar counters
    pub summary: Summary,
    /// All books, in storage order
    pub books: Vec<Book>,
    /// Add book form
    pub add_form: AddForm,
    /// Titles offered by the remove picker
    pub titles: Vec<String>,
    /// Selected title in the remove picker
    pub remove_index: usize,
    /// Search box contents
    pub search_input: String,
    /// Books matching the search box
    pub search_results: Vec<Book>,
    /// Scroll offset for book listings
    pub list_scroll: u16,
    /// Destination for export
    pub export_path: String,
    /// Source for import
    pub import_path: String,
    /// Replace or merge on import
    pub import_mode: ImportMode,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Error shown in a modal until a key is pressed
    pub error_message: Option<String>,
}

impl App {
    /// Create a new app with data from store
    pub fn new(store: &Store) -> Self {
        let mut app = Self {
            should_quit: false,
            menu_index: 0,
            focus: Focus::Menu,
            summary: Summary::default(),
            books: Vec::new(),
            add_form: AddForm::default(),
            titles: Vec::new(),
            remove_index: 0,
            search_input: String::new(),
            search_results: Vec::new(),
            list_scroll: 0,
            export_path: "library.json".to_string(),
            import_path: String::new(),
            import_mode: ImportMode::default(),
            status_message: None,
            status_message_time: None,
            error_message: None,
        };
        app.refresh(store);
        app
    }

    /// Reload everything derived from the store
    pub fn refresh(&mut self, store: &Store) {
        self.summary = store.summary();
        self.books = store.books().to_vec();
        self.titles = store.titles();
        if self.titles.is_empty() {
            self.remove_index = 0;
        } else {
            self.remove_index = self.remove_index.min(self.titles.len() - 1);
        }
        self.run_search(store);
    }

    /// Get the currently selected menu entry
    pub fn current_menu(&self) -> MenuItem {
        MenuItem::ALL[self.menu_index.min(MenuItem::ALL.len() - 1)]
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn menu_up(&mut self) {
        if self.menu_index > 0 {
            self.menu_index -= 1;
            self.list_scroll = 0;
        }
    }

    pub fn menu_down(&mut self) {
        if self.menu_index < MenuItem::ALL.len() - 1 {
            self.menu_index += 1;
            self.list_scroll = 0;
        }
    }

    /// Open the selected menu entry
    pub fn activate_menu(&mut self) {
        match self.current_menu() {
            MenuItem::Exit => self.should_quit = true,
            item if item.is_interactive() => self.focus = Focus::Content,
            _ => {}
        }
    }

    /// Return focus to the menu
    pub fn back_to_menu(&mut self) {
        self.focus = Focus::Menu;
    }

    /// Submit the add form
    pub fn submit_add(&mut self, store: &mut Store) -> anyhow::Result<()> {
        let book = match self.add_form.to_book() {
            Ok(book) => book,
            Err(msg) => {
                self.set_status(msg);
                return Ok(());
            }
        };

        store.add_book(book)?;
        self.add_form = AddForm::default();
        self.set_status("Book added successfully!");
        self.refresh(store);
        Ok(())
    }

    pub fn remove_up(&mut self) {
        self.remove_index = self.remove_index.saturating_sub(1);
    }

    pub fn remove_down(&mut self) {
        if self.remove_index + 1 < self.titles.len() {
            self.remove_index += 1;
        }
    }

    /// Remove every book with the selected title
    pub fn remove_selected(&mut self, store: &mut Store) -> anyhow::Result<()> {
        let Some(title) = self.titles.get(self.remove_index).cloned() else {
            self.set_status(EMPTY_LIBRARY);
            return Ok(());
        };

        store.remove_by_title(&title)?;
        self.set_status("Book removed successfully!");
        self.refresh(store);
        Ok(())
    }

    pub fn search_insert(&mut self, store: &Store, c: char) {
        self.search_input.push(c);
        self.run_search(store);
    }

    pub fn search_delete(&mut self, store: &Store) {
        self.search_input.pop();
        self.run_search(store);
    }

    /// Recompute search results; an empty box matches nothing
    fn run_search(&mut self, store: &Store) {
        self.search_results = if self.search_input.is_empty() {
            Vec::new()
        } else {
            store.search(&self.search_input)
        };
    }

    pub fn scroll_up(&mut self) {
        self.list_scroll = self.list_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.list_scroll = self.list_scroll.saturating_add(1);
    }

    /// Write the library to the export path
    pub fn export(&mut self, store: &Store) -> anyhow::Result<()> {
        let path = self.export_path.trim();
        if store.is_empty() {
            self.set_status(EMPTY_EXPORT);
            return Ok(());
        }
        if path.is_empty() {
            self.set_status("Enter a file to export to");
            return Ok(());
        }

        let path = PathBuf::from(path);
        if is_library_file(store, &path) {
            self.set_status("Choose a file other than the library itself");
            return Ok(());
        }

        if let Some(count) = write_export(store, &path)? {
            self.set_status(format!("Exported {} book(s) to {}", count, path.display()));
        }
        Ok(())
    }

    pub fn toggle_import_mode(&mut self) {
        self.import_mode = self.import_mode.toggle();
    }

    /// Import from the import path
    ///
    /// A bad file is shown as one error and leaves the library unchanged.
    pub fn import(&mut self, store: &mut Store) {
        let path = self.import_path.trim();
        if path.is_empty() {
            self.set_status("Enter a JSON file to import");
            return;
        }

        match store.import_file(self.import_mode, &PathBuf::from(path)) {
            Ok(summary) => {
                self.set_status(format!("Imported {} books!", summary.received));
                self.refresh(store);
            }
            Err(e) => self.set_error(format!("Error: {}", e)),
        }
    }
}
