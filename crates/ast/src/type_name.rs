//! Lexical type-name classification shared by the grammar adapters and the
//! relationship analyzer.
//!
//! No type-checker is available, so classification is duck-typed over
//! identifier casing. The predicates live here as one explicit surface so
//! they can later be swapped for real type information without touching
//! the classifiers that consume them.

/// Primitive and built-in scalar type names, across supported languages.
pub const PRIMITIVES: &[&str] = &[
    // TypeScript / JavaScript
    "string", "number", "boolean", "void", "null", "undefined", "never",
    "object", "symbol", "bigint",
    // Python
    "str", "int", "float", "bool", "bytes", "None",
    // Java
    "byte", "short", "long", "double", "char",
];

/// Built-in container and utility types that are capitalized but never
/// class-like for relationship purposes.
pub const BUILTIN_CONTAINERS: &[&str] = &[
    "Array", "Map", "Set", "WeakMap", "WeakSet", "Promise", "Record",
    "Partial", "Required", "Readonly", "Pick", "Omit", "Exclude", "Extract",
    "Date", "RegExp", "Error", "Function", "Object", "String", "Number",
    "Boolean", "Symbol", "JSON", "Math",
    // Python typing / stdlib
    "List", "Dict", "Tuple", "Optional", "Union", "Iterable", "Callable",
    // Java collections
    "ArrayList", "HashMap", "HashSet", "LinkedList", "Collection",
];

/// Whether `name` is a primitive/scalar type
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Whether `name` is a recognized built-in container or utility type
pub fn is_builtin_container(name: &str) -> bool {
    BUILTIN_CONTAINERS.contains(&name)
}

/// Whether `name` reads as a class-like type: leading uppercase letter,
/// not a primitive, not a built-in container.
pub fn is_class_like(name: &str) -> bool {
    if is_primitive(name) || is_builtin_container(name) {
        return false;
    }
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Whether `name` reads as an interface: `I` followed by another
/// uppercase letter (`IUserRepo`), on top of being class-like.
pub fn is_interface_like(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I')
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && is_class_like(name)
}

/// Strip array markers from an annotation: trailing `[]` suffixes and an
/// outer `Array<...>` wrapper. Returns the element annotation and whether
/// anything was stripped.
pub fn strip_array(annotation: &str) -> (String, bool) {
    let mut base = annotation.trim().to_string();
    let mut is_array = false;

    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped.trim_end().to_string();
        is_array = true;
    }

    if let Some(inner) = base
        .strip_prefix("Array<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        base = inner.trim().to_string();
        is_array = true;
    }

    (base, is_array)
}

/// Split a generic annotation into its base name and top-level argument
/// list: `Map<string, User>` becomes `("Map", ["string", "User"])`, and
/// Python-style `Dict[str, User]` becomes `("Dict", ["str", "User"])`.
/// A non-generic annotation comes back with an empty argument list.
pub fn split_generic(annotation: &str) -> (String, Vec<String>) {
    let annotation = annotation.trim();
    let (open_char, close_char) = match annotation.chars().find(|c| *c == '<' || *c == '[') {
        Some('<') => ('<', '>'),
        Some(_) => ('[', ']'),
        None => return (annotation.to_string(), Vec::new()),
    };
    let Some(open) = annotation.find(open_char) else {
        return (annotation.to_string(), Vec::new());
    };
    if !annotation.ends_with(close_char) || open + 1 == annotation.len() - 1 {
        return (annotation.to_string(), Vec::new());
    }

    let base = annotation[..open].trim().to_string();
    let inner = &annotation[open + 1..annotation.len() - 1];

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in inner.chars() {
        match ch {
            c if c == open_char => {
                depth += 1;
                current.push(ch);
            }
            c if c == close_char => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }

    (base, args)
}

/// Whether a raw annotation, after array/generic stripping, names a
/// class-like type. Convenience for the grammar adapters filling
/// `PropertyInfo::is_class_type`.
pub fn annotation_is_class_type(annotation: &str) -> bool {
    let (base, _) = strip_array(annotation);
    let (name, _) = split_generic(&base);
    is_class_like(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_class_like() {
        assert!(is_class_like("User"));
        assert!(is_class_like("UserService"));
        assert!(!is_class_like("string"));
        assert!(!is_class_like("Array"));
        assert!(!is_class_like("camelCase"));
        assert!(!is_class_like(""));
    }

    #[test]
    fn test_is_interface_like() {
        assert!(is_interface_like("IUserRepo"));
        assert!(!is_interface_like("User"));
        assert!(!is_interface_like("Item"));
        assert!(!is_interface_like("I"));
    }

    #[test]
    fn test_strip_array() {
        assert_eq!(strip_array("User[]"), ("User".to_string(), true));
        assert_eq!(strip_array("User[][]"), ("User".to_string(), true));
        assert_eq!(strip_array("Array<User>"), ("User".to_string(), true));
        assert_eq!(strip_array("User"), ("User".to_string(), false));
    }

    #[test]
    fn test_split_generic() {
        assert_eq!(
            split_generic("Map<string, User>"),
            (
                "Map".to_string(),
                vec!["string".to_string(), "User".to_string()]
            )
        );
        assert_eq!(
            split_generic("Promise<Map<string, User>>"),
            ("Promise".to_string(), vec!["Map<string, User>".to_string()])
        );
        assert_eq!(split_generic("User"), ("User".to_string(), Vec::new()));
    }

    #[test]
    fn test_split_generic_python_brackets() {
        assert_eq!(
            split_generic("Dict[str, User]"),
            (
                "Dict".to_string(),
                vec!["str".to_string(), "User".to_string()]
            )
        );
        // Empty brackets are an array marker, not a generic
        assert_eq!(split_generic("User[]"), ("User[]".to_string(), Vec::new()));
    }

    #[test]
    fn test_annotation_is_class_type() {
        assert!(annotation_is_class_type("User"));
        assert!(annotation_is_class_type("User[]"));
        assert!(annotation_is_class_type("Array<User>"));
        assert!(!annotation_is_class_type("string[]"));
        assert!(!annotation_is_class_type("Map<string, User>"));
    }
}
