//! Menu loading from files and standard input.

use std::fs;
use std::path::Path;

use crate::menu::MenuDocument;
use crate::{MealsyncError, Result};

/// Source name used in errors for standard input.
pub const STDIN_SOURCE: &str = "stdin";

/// Reads and parses a menu file.
///
/// # Errors
///
/// [`MealsyncError::FileNotFound`] if the path does not exist, otherwise the
/// errors of [`parse_menu`] with the path as source.
pub fn load_menu_file(path: impl AsRef<Path>) -> Result<MenuDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MealsyncError::FileNotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    parse_menu(&text, &path.display().to_string())
}

/// Reads a menu from standard input until EOF.
pub fn load_menu_stdin() -> Result<MenuDocument> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_menu(&buffer, STDIN_SOURCE)
}

/// Parses menu JSON, naming `source` in any error.
///
/// ```rust
/// use mealsync_core::parse_menu;
///
/// let menu = parse_menu(r#"{"week": 3, "monday": []}"#, "inline").unwrap();
/// assert_eq!(menu.week_number(), 3);
/// assert!(parse_menu("{", "inline").is_err());
/// ```
pub fn parse_menu(text: &str, source: &str) -> Result<MenuDocument> {
    if text.trim().is_empty() {
        return Err(MealsyncError::EmptyInput { source_name: source.to_string() });
    }

    serde_json::from_str(text)
        .map_err(|e| MealsyncError::MalformedInput { source_name: source.to_string(), message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_not_found() {
        let result = load_menu_file("/nonexistent/path/menu.json");
        assert!(matches!(result, Err(MealsyncError::FileNotFound(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_menu("  \n", STDIN_SOURCE), Err(MealsyncError::EmptyInput { .. })));
    }

    #[test]
    fn test_malformed_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"week\": 1, \"monday\": [").unwrap();

        let err = load_menu_file(file.path()).unwrap_err();
        let path = file.path().display().to_string();
        assert!(matches!(&err, MealsyncError::MalformedInput { source_name, .. } if *source_name == path));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = parse_menu(r#"{"monday": "not a list"}"#, STDIN_SOURCE).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(r#"{"week": 2, "tuesday": [{"name": "Bableves"}]}"#.as_bytes()).unwrap();

        let menu = load_menu_file(file.path()).unwrap();
        assert_eq!(menu.week_number(), 2);
        assert_eq!(menu.tuesday[0].display_name(), "Bableves");
    }
}
