use crate::error::{BranchError, Result};

/// Characters git refuses in ref names (in addition to control characters).
const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Reject syntactically invalid branch names.
///
/// Rules are checked in a fixed order so a name breaking several of them
/// always reports the same error:
/// empty, leading/trailing `-`, leading/trailing `/`, `//`, invalid
/// characters, control characters, leading/trailing `.`, `@{`.
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BranchError::EmptyName);
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(BranchError::InvalidEdgeChar {
            name: name.to_string(),
            detail: "cannot start or end with '-'".to_string(),
        });
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(BranchError::InvalidEdgeChar {
            name: name.to_string(),
            detail: "cannot start or end with '/'".to_string(),
        });
    }

    if name.contains("//") {
        return Err(BranchError::DoubleSlash {
            name: name.to_string(),
        });
    }

    let found: Vec<String> = INVALID_CHARS
        .iter()
        .filter(|c| name.contains(**c))
        .map(|c| format!("'{c}'"))
        .collect();
    if !found.is_empty() {
        return Err(BranchError::InvalidChar {
            name: name.to_string(),
            chars: found.join(", "),
        });
    }

    if name.chars().any(|c| (c as u32) < 32 || c as u32 == 127) {
        return Err(BranchError::ControlChar {
            name: name.to_string(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(BranchError::LeadingOrTrailingDot {
            name: name.to_string(),
        });
    }

    if name.contains("@{") {
        return Err(BranchError::ReflogSyntax {
            name: name.to_string(),
        });
    }

    Ok(())
}
