//! Lexical path handling shared by every provider.
//!
//! Paths are slash-separated strings throughout the analysis layer; the
//! visited-set and aggregate maps key on the normalized form produced
//! here, so every provider must hand out paths in the same shape.

/// Normalize a slash-separated path lexically: collapse `.` and `..`
/// segments, drop empty segments, convert backslashes.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                match parts.last() {
                    Some(&"..") | None => {
                        if !absolute {
                            parts.push("..");
                        }
                    }
                    Some(_) => {
                        parts.pop();
                    }
                }
            }
            segment => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Directory portion of a path, empty for a bare file name
pub fn parent_dir(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

/// Join a relative specifier onto a base directory and normalize
pub fn join_relative(base_dir: &str, specifier: &str) -> String {
    if base_dir.is_empty() {
        normalize_path(specifier)
    } else {
        normalize_path(&format!("{base_dir}/{specifier}"))
    }
}

/// Whether a specifier is relative (`./x`, `../x`) as opposed to a bare
/// module or alias specifier
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/src/services/../models/User.ts"),
            "/src/models/User.ts"
        );
        assert_eq!(normalize_path("/src/./a//b.ts"), "/src/a/b.ts");
        assert_eq!(normalize_path("a/../.."), "..");
        assert_eq!(normalize_path("/a/../.."), "/");
        assert_eq!(normalize_path("src\\app.ts"), "src/app.ts");
        assert_eq!(normalize_path("."), ".");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/src/models/User.ts"), "/src/models");
        assert_eq!(parent_dir("User.ts"), "");
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(
            join_relative("/src/services", "../models/User"),
            "/src/models/User"
        );
        assert_eq!(join_relative("/src", "./app"), "/src/app");
    }

    #[test]
    fn test_is_relative_specifier() {
        assert!(is_relative_specifier("./User"));
        assert!(is_relative_specifier("../models/User"));
        assert!(!is_relative_specifier("react"));
        assert!(!is_relative_specifier("@app/models"));
    }
}
