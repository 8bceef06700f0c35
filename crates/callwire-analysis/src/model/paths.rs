//! Path normalization and module specifier candidates.

/// Extensions tried, in order, when a specifier names a file without one.
pub const RESOLVE_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".d.ts", ".js", ".jsx", ".mts", ".cts", ".mjs", ".cjs",
];

/// JavaScript extensions that may stand in for a TypeScript sibling.
const JS_EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs"];

/// Normalize separators, drop `file://`, and fold `.`/`..` segments.
///
/// Leading `..` segments of a relative path are kept.
pub fn normalize_path(path: &str) -> String {
    let path = path.strip_prefix("file://").unwrap_or(path);
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Directory part of a normalized path, empty for a bare file name.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join `relative` onto `dir` and normalize.
pub fn join(dir: &str, relative: &str) -> String {
    if dir.is_empty() {
        normalize_path(relative)
    } else {
        normalize_path(&format!("{dir}/{relative}"))
    }
}

/// Whether a module specifier is relative to the importing file.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Candidate file paths for a normalized base path, most specific first.
pub fn candidates(base: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(2 + RESOLVE_EXTENSIONS.len() * 2);
    out.push(base.to_string());
    for js in JS_EXTENSIONS {
        if let Some(stem) = base.strip_suffix(js) {
            let ts = if *js == ".jsx" { ".tsx" } else { ".ts" };
            out.push(format!("{stem}{ts}"));
            if *js == ".mjs" {
                out.push(format!("{stem}.mts"));
            }
            if *js == ".cjs" {
                out.push(format!("{stem}.cts"));
            }
        }
    }
    for ext in RESOLVE_EXTENSIONS {
        out.push(format!("{base}{ext}"));
    }
    for ext in RESOLVE_EXTENSIONS {
        out.push(join(base, &format!("index{ext}")));
    }
    out
}

/// Longest common directory of a set of normalized paths.
pub fn common_dir<'a>(paths: impl IntoIterator<Item = &'a str>) -> String {
    let mut common: Option<Vec<&str>> = None;
    for path in paths {
        let dir: Vec<&str> = match parent_dir(path) {
            "" => Vec::new(),
            "/" => vec![""],
            parent => parent.split('/').collect(),
        };
        common = Some(match common {
            None => dir,
            Some(prev) => prev
                .iter()
                .zip(dir.iter())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| *a)
                .collect(),
        });
    }
    match common.as_deref() {
        None | Some([]) => String::new(),
        Some([""]) => "/".to_string(),
        Some(segments) => segments.join("/"),
    }
}

/// `path` relative to `root`, or `path` itself when it lies outside.
pub fn relative_to<'p>(path: &'p str, root: &str) -> &'p str {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return path.trim_start_matches('/');
    }
    match path.strip_prefix(root) {
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => path.trim_start_matches('/'),
    }
}
