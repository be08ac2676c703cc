//! Export and import command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use shelf_core::{ImportMode, Store};

use crate::output::Output;

/// Warning shown when there is nothing to export
pub const EMPTY_EXPORT: &str = "Library is empty!";

/// Whether `path` names the library file, however it is spelled
///
/// Both sides are resolved against the filesystem. A target that does not
/// exist yet is resolved through its parent directory.
pub fn is_library_file(store: &Store, path: &Path) -> bool {
    let library = store.persistence().path();
    match (resolve(path), resolve(library)) {
        (Some(target), Some(library)) => target == library,
        _ => path == library,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

/// Write the pretty-printed library to `path`
///
/// Returns the number of books written, or `None` when the library is
/// empty and nothing was written.
pub fn write_export(store: &Store, path: &Path) -> Result<Option<usize>> {
    if store.is_empty() {
        return Ok(None);
    }

    let json = store.export_json()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write export to {:?}", path))?;

    Ok(Some(store.len()))
}

/// Export the library
pub fn export(store: &Store, path: PathBuf, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.warning(EMPTY_EXPORT);
        return Ok(());
    }

    if path.as_os_str() == "-" {
        println!("{}", store.export_json()?);
        return Ok(());
    }

    if is_library_file(store, &path) {
        bail!(
            "Refusing to export over the library file itself: {}",
            path.display()
        );
    }

    if let Some(count) = write_export(store, &path)? {
        output.success(&format!("Exported {} book(s) to {}", count, path.display()));
    }
    Ok(())
}

/// Import books from a JSON file
///
/// Any problem with the file is reported as a single error and leaves the
/// library unchanged.
pub fn import(store: &mut Store, path: PathBuf, mode: ImportMode, output: &Output) -> Result<()> {
    let summary = store
        .import_file(mode, &path)
        .with_context(|| format!("Error importing {}", path.display()))?;

    output.print_import(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use shelf_core::{Book, Config, Genre};
    use tempfile::TempDir;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn open_store(dir: &Path) -> Store {
        Store::open_with_config(Config::with_data_dir(dir)).unwrap()
    }

    #[test]
    fn test_export_empty_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir.path().join("data"));
        let path = temp_dir.path().join("export.json");

        assert_eq!(write_export(&store, &path).unwrap(), None);
        assert!(!path.exists());

        export(&store, path.clone(), &quiet()).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_export_then_import_into_other_library() {
        let temp_dir = TempDir::new().unwrap();
        let mut source = open_store(&temp_dir.path().join("a"));
        source
            .add_book(Book::new("Dune", "Herbert", 1965, Genre::ScienceFiction, true))
            .unwrap();
        source
            .add_book(Book::new("Emma", "Austen", 1815, Genre::Romance, false))
            .unwrap();

        let path = temp_dir.path().join("out").join("export.json");
        export(&source, path.clone(), &quiet()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));

        let mut target = open_store(&temp_dir.path().join("b"));
        import(&mut target, path, ImportMode::Replace, &quiet()).unwrap();
        assert_eq!(target.books(), source.books());
    }

    #[test]
    fn test_export_refuses_library_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(temp_dir.path());
        store
            .add_book(Book::new("Dune", "Herbert", 1965, Genre::ScienceFiction, true))
            .unwrap();

        let library_path = store.persistence().path().to_path_buf();
        assert!(export(&store, library_path, &quiet()).is_err());

        // Other spellings of the same file
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        let dotted = temp_dir.path().join(".").join("library.json");
        let parent_hop = temp_dir.path().join("sub").join("..").join("library.json");
        assert!(is_library_file(&store, &dotted));
        assert!(is_library_file(&store, &parent_hop));
        assert!(export(&store, parent_hop, &quiet()).is_err());
        assert_eq!(open_store(temp_dir.path()).len(), 1);

        assert!(!is_library_file(&store, &temp_dir.path().join("export.json")));
    }

    #[test]
    fn test_import_bad_file_leaves_library() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir.path().join("data"));
        store
            .add_book(Book::new("Dune", "Herbert", 1965, Genre::ScienceFiction, true))
            .unwrap();

        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "[{\"title\": \"x\"").unwrap();

        let err = import(&mut store, path, ImportMode::Replace, &quiet()).unwrap_err();
        assert!(err.to_string().contains("Error importing"));
        assert_eq!(store.titles(), vec!["Dune"]);
    }
}
