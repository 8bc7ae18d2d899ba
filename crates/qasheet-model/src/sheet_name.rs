use unicode_normalization::UnicodeNormalization;

/// Maximum sheet name length, in UTF-16 code units (Excel's limit).
pub const EXCEL_MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SheetNameError {
    #[error("sheet name cannot be blank")]
    EmptyName,
    #[error("sheet name cannot exceed 31 characters")]
    TooLong,
    #[error("sheet name contains invalid character `{0}`")]
    InvalidCharacter(char),
    #[error("sheet name cannot begin or end with an apostrophe")]
    LeadingOrTrailingApostrophe,
    #[error("sheet name already exists")]
    DuplicateName,
}

/// Validate a worksheet name against the rules shared by Excel and Sheets.
pub fn validate_sheet_name(name: &str) -> Result<(), SheetNameError> {
    if name.trim().is_empty() {
        return Err(SheetNameError::EmptyName);
    }
    if name.encode_utf16().count() > EXCEL_MAX_SHEET_NAME_LEN {
        return Err(SheetNameError::TooLong);
    }
    if let Some(ch) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(SheetNameError::InvalidCharacter(ch));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(SheetNameError::LeadingOrTrailingApostrophe);
    }
    Ok(())
}

/// Case-folded form of a sheet name used for uniqueness checks and lookup.
pub fn sheet_name_casefold(name: &str) -> String {
    name.nfkc().flat_map(char::to_lowercase).collect()
}

/// Compare two sheet names the way the host does: Unicode-aware, case-insensitive.
pub fn sheet_name_eq_case_insensitive(a: &str, b: &str) -> bool {
    a == b || sheet_name_casefold(a) == sheet_name_casefold(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_section_sheet_names() {
        assert_eq!(validate_sheet_name("1. Registration"), Ok(()));
        assert_eq!(validate_sheet_name("8. Граничные случаи"), Ok(()));
    }

    #[test]
    fn rejects_invalid_names() {
        assert_eq!(validate_sheet_name("  "), Err(SheetNameError::EmptyName));
        assert_eq!(
            validate_sheet_name("a/b"),
            Err(SheetNameError::InvalidCharacter('/'))
        );
        assert_eq!(
            validate_sheet_name("'quoted'"),
            Err(SheetNameError::LeadingOrTrailingApostrophe)
        );
        assert_eq!(
            validate_sheet_name(&"x".repeat(32)),
            Err(SheetNameError::TooLong)
        );
    }

    #[test]
    fn comparison_ignores_case_across_scripts() {
        assert!(sheet_name_eq_case_insensitive("Summary", "SUMMARY"));
        assert!(sheet_name_eq_case_insensitive("Сводка", "СВОДКА"));
        assert!(!sheet_name_eq_case_insensitive("Bugs", "Bug"));
    }
}
