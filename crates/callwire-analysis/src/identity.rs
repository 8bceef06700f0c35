//! Stable identifiers for callables, classes and files.
//!
//! Ids are `"{file_path}::{qualified_name}#{digest}"` where the digest is the
//! xxh3 hash of the signature key truncated to eight hex digits. The same
//! declaration in unchanged source always gets the same id.

use callwire_core::types::collections::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::model::paths;

/// Width of the digest appended to ids, in hex digits.
pub const DIGEST_WIDTH: usize = 8;

/// Fixed-width hex digest of `input`.
pub fn short_hash(input: &str) -> String {
    format!("{:08x}", xxh3_64(input.as_bytes()) as u32)
}

/// Build a composite id.
pub fn make_id(file_path: &str, qualified_name: &str, signature_key: &str) -> String {
    format!("{file_path}::{qualified_name}#{}", short_hash(signature_key))
}

/// Signature key of a callable: qualified name plus ordered parameter type texts.
pub fn signature_key<S: AsRef<str>>(qualified_name: &str, param_types: &[S]) -> String {
    let params: Vec<&str> = param_types.iter().map(AsRef::as_ref).collect();
    format!("{qualified_name}({})", params.join(","))
}

/// `Class.method` for members, the bare name otherwise.
pub fn qualified_name(class_name: Option<&str>, name: &str) -> String {
    match class_name {
        Some(class) => format!("{class}.{name}"),
        None => name.to_string(),
    }
}

/// Project-relative form of a path, used for file keys and the cross-file flag.
pub fn simplify_path(path: &str, project_root: &str) -> String {
    let normalized = paths::normalize_path(path);
    paths::relative_to(&normalized, &paths::normalize_path(project_root)).to_string()
}

/// File key: simplified path plus a short hash of the full normalized path.
pub fn file_key(simplified: &str, normalized_path: &str) -> String {
    format!("{simplified}#{}", &short_hash(normalized_path)[..6])
}

/// The simplified path a file key was built from.
pub fn file_key_path(file_key: &str) -> &str {
    file_key
        .rsplit_once('#')
        .map(|(path, _)| path)
        .unwrap_or(file_key)
}

/// Hands out ids, suffixing `~n` when two declarations would share one.
#[derive(Debug, Default)]
pub struct IdAllocator {
    seen: FxHashMap<String, u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: String) -> String {
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            let id = format!("{base}~{}", *count - 1);
            // A suffixed id can itself collide with a literal base; keep going.
            if self.seen.contains_key(&id) {
                return self.allocate(id);
            }
            self.seen.insert(id.clone(), 1);
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_id_is_deterministic() {
        let a = make_id("/p/a.ts", "main", "main()");
        let b = make_id("/p/a.ts", "main", "main()");
        assert_eq!(a, b);
        assert!(a.starts_with("/p/a.ts::main#"));
        assert_eq!(a.rsplit('#').next().unwrap().len(), DIGEST_WIDTH);
    }

    #[test]
    fn signature_changes_digest() {
        let a = make_id("/p/a.ts", "f", &signature_key("f", &["string"]));
        let b = make_id("/p/a.ts", "f", &signature_key("f", &["number"]));
        assert_ne!(a, b);
    }

    #[test]
    fn qualified_names() {
        assert_eq!(qualified_name(Some("FooService"), "doWork"), "FooService.doWork");
        assert_eq!(qualified_name(None, "helper"), "helper");
    }

    #[test]
    fn simplify_strips_root_and_normalizes() {
        assert_eq!(simplify_path("/repo/src/a.ts", "/repo"), "src/a.ts");
        assert_eq!(simplify_path("C:\\repo\\src\\a.ts", "C:/repo"), "src/a.ts");
        assert_eq!(simplify_path("file:///repo/./src/a.ts", "/repo/"), "src/a.ts");
    }

    #[test]
    fn file_key_round_trips_path() {
        let key = file_key("src/a.ts", "/repo/src/a.ts");
        assert!(key.starts_with("src/a.ts#"));
        assert_eq!(file_key_path(&key), "src/a.ts");
    }

    #[test]
    fn allocator_suffixes_collisions() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("a".into()), "a");
        assert_eq!(ids.allocate("a".into()), "a~1");
        assert_eq!(ids.allocate("a".into()), "a~2");
        assert_eq!(ids.allocate("b".into()), "b");
    }

    #[test]
    fn allocator_avoids_literal_suffix_clash() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("a~1".into()), "a~1");
        assert_eq!(ids.allocate("a".into()), "a");
        let third = ids.allocate("a".into());
        assert_ne!(third, "a~1");
        assert_ne!(third, "a");
    }
}
