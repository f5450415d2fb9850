//! Specifier and path utilities.
//!
//! Module ids are forward-slash paths. Both resolvers build ids through
//! [`resolve_relative`] so the same file always gets the same id.

/// Extensions probed, in order, when a specifier names a file without one.
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs"];

/// Convert backslashes to forward slashes.
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize separators and resolve `.` and `..` segments.
///
/// Leading `..` segments of a relative path are kept; `..` never climbs
/// above the root of an absolute path.
pub fn normalize_path(path: &str) -> String {
    let path = normalize_slashes(path);
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(segment),
        }
    }
    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Check if a path is rooted (absolute).
pub fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    match bytes {
        [b'/', ..] => true,
        [drive, b':', b'/' | b'\\', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// `./x`, `../x`, `.` and `..`.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// A package name or URL-like specifier (`react`, `@scope/pkg/sub`, `node:fs`).
pub fn is_bare_specifier(specifier: &str) -> bool {
    !specifier.is_empty() && !is_relative_specifier(specifier) && !is_rooted(specifier)
}

/// Whether the specifier carries a URL scheme such as `node:` or `https:`.
pub fn has_scheme(specifier: &str) -> bool {
    match specifier.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}

/// Everything up to and including the last `/`.
pub fn get_directory_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(last_slash) => &path[..=last_slash],
        None => "",
    }
}

/// The last path segment.
pub fn get_base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(last_slash) => &path[last_slash + 1..],
        None => path,
    }
}

/// The extension of the last segment, including the dot.
pub fn extension_of(path: &str) -> Option<&str> {
    let base = get_base_name(path);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some(&base[dot..]),
    }
}

/// Remove the extension of the last segment, if any.
pub fn remove_extension(path: &str) -> &str {
    match extension_of(path) {
        Some(ext) => &path[..path.len() - ext.len()],
        None => path,
    }
}

/// Combine two path segments. A rooted `relative` wins.
pub fn combine_paths(base: &str, relative: &str) -> String {
    if is_rooted(relative) || base.is_empty() {
        return relative.to_string();
    }
    if base.ends_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Resolve a specifier against the module that imports it. Specifiers of
/// the entry module (no importer) resolve against the root.
pub fn resolve_relative(importer: Option<&str>, specifier: &str) -> String {
    let base = importer.map(get_directory_path).unwrap_or("");
    normalize_path(&combine_paths(base, specifier))
}

/// Candidate ids for a specifier path, in probing order: the path itself,
/// the path with each source extension, then `index` files.
pub fn candidates(path: &str) -> Vec<String> {
    let trimmed = path.trim_end_matches('/');
    let mut out = Vec::with_capacity(1 + SOURCE_EXTENSIONS.len() * 2);
    if !path.ends_with('/') {
        out.push(trimmed.to_string());
        out.extend(SOURCE_EXTENSIONS.iter().map(|ext| format!("{}{}", trimmed, ext)));
    }
    out.extend(SOURCE_EXTENSIONS.iter().map(|ext| combine_paths(trimmed, &format!("index{}", ext))));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a\\b\\c"), "a/b/c");
        assert_eq!(normalize_path("/a/./b/../c.js"), "/a/c.js");
        assert_eq!(normalize_path("../x/../../y"), "../../y");
        assert_eq!(normalize_path("/../a"), "/a");
        assert_eq!(normalize_path("./a.js"), "a.js");
    }

    #[test]
    fn test_specifier_classes() {
        assert!(is_relative_specifier("./a"));
        assert!(is_relative_specifier(".."));
        assert!(!is_relative_specifier(".hidden"));
        assert!(is_bare_specifier("react"));
        assert!(is_bare_specifier("@scope/pkg/sub"));
        assert!(!is_bare_specifier("/abs/a.js"));
        assert!(has_scheme("node:fs"));
        assert!(!has_scheme("C:/a.js"));
        assert!(!has_scheme("react"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(extension_of("src/a.test.ts"), Some(".ts"));
        assert_eq!(extension_of("src/.env"), None);
        assert_eq!(extension_of("dir.d/file"), None);
        assert_eq!(remove_extension("src/a.js"), "src/a");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_relative(Some("/src/app/main.ts"), "../lib/x"), "/src/lib/x");
        assert_eq!(resolve_relative(Some("main.js"), "./b.js"), "b.js");
        assert_eq!(resolve_relative(None, "./entry.js"), "entry.js");
        assert_eq!(combine_paths("/a", "/b/c.ts"), "/b/c.ts");
    }

    #[test]
    fn test_candidates_order() {
        let found = candidates("src/util");
        assert_eq!(found[0], "src/util");
        assert_eq!(found[1], "src/util.ts");
        assert_eq!(found.last().map(String::as_str), Some("src/util/index.mjs"));
        assert_eq!(candidates("src/")[0], "src/index.ts");
    }
}
