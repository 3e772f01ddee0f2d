use std::path::{Component, Path};
use walkdir::{DirEntry, WalkDir};
use wordtowallet_core::{Error, Result, RouteKind, RouteManifest, RouteTemplate, placeholder_name};

/// Files that turn a directory into a page
const PAGE_FILES: &[&str] = &[
    "page.tsx", "page.ts", "page.jsx", "page.js", "page.mdx", "page.md",
];

/// Used when the route tree cannot be read: the locale root and the blog index
pub const FALLBACK_ROUTES: &[&str] = &["", "/blog"];

/// Walk the route tree under `root` depth-first.
///
/// A directory's own page is recorded before its children, children are
/// visited in file-name order. Bracketed directories are always recorded as
/// dynamic templates; page-bearing directories below them are dynamic too.
pub fn discover<P: AsRef<Path>>(root: P) -> Result<RouteManifest> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::InvalidData(format!(
            "Route directory does not exist: {}",
            root.display()
        )));
    }

    let mut manifest = RouteManifest::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::InvalidData(e.to_string()))?;
        let (path, kind) = route_for(relative);

        let is_param_dir = entry
            .file_name()
            .to_str()
            .and_then(placeholder_name)
            .is_some();

        if is_param_dir || has_page_file(entry.path()) {
            manifest.push(RouteTemplate::new(path, kind));
        }
    }

    Ok(manifest)
}

/// Like [`discover`], but never fails: an unreadable tree yields
/// [`fallback_manifest`] so a partial sitemap can still be produced.
pub fn discover_or_fallback<P: AsRef<Path>>(root: P) -> RouteManifest {
    let root = root.as_ref();
    match discover(root) {
        Ok(manifest) => {
            tracing::debug!(root = %root.display(), routes = manifest.len(), "discovered routes");
            manifest
        }
        Err(e) => {
            tracing::warn!(
                root = %root.display(),
                error = %e,
                "route discovery failed, using fallback routes"
            );
            fallback_manifest()
        }
    }
}

pub fn fallback_manifest() -> RouteManifest {
    FALLBACK_ROUTES
        .iter()
        .map(|p| RouteTemplate::static_route(*p))
        .collect()
}

/// Hidden entries, private `_folders`, `@slot` folders and the `api` tree
/// never produce pages
fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || name.starts_with('_')
        || name.starts_with('@')
        || (entry.file_type().is_dir() && name == "api")
}

fn has_page_file(dir: &Path) -> bool {
    PAGE_FILES.iter().any(|name| dir.join(name).is_file())
}

/// Map a directory relative to the route root to its URL path.
///
/// Route groups such as `(marketing)` add no URL segment.
fn route_for(relative: &Path) -> (String, RouteKind) {
    let mut path = String::new();
    let mut kind = RouteKind::Static;

    for component in relative.components() {
        let Component::Normal(name) = component else {
            continue;
        };
        let name = name.to_string_lossy();

        if name.starts_with('(') && name.ends_with(')') {
            continue;
        }
        if placeholder_name(&name).is_some() {
            kind = RouteKind::Dynamic;
        }

        path.push('/');
        path.push_str(&name);
    }

    (path, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(pages: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for page in pages {
            let path = dir.path().join(page);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export default function Page() {}").unwrap();
        }
        dir
    }

    fn paths(manifest: &RouteManifest) -> Vec<(&str, RouteKind)> {
        manifest
            .routes()
            .iter()
            .map(|r| (r.path.as_str(), r.kind))
            .collect()
    }

    #[test]
    fn test_discover_root_and_nested_pages_in_order() {
        let dir = tree(&[
            "page.tsx",
            "about/page.tsx",
            "admin/page.tsx",
            "admin/courses/page.tsx",
            "admin/courses/[id]/page.tsx",
            "admin/courses/[id]/edit/page.tsx",
        ]);

        let manifest = discover(dir.path()).unwrap();
        assert_eq!(
            paths(&manifest),
            vec![
                ("", RouteKind::Static),
                ("/about", RouteKind::Static),
                ("/admin", RouteKind::Static),
                ("/admin/courses", RouteKind::Static),
                ("/admin/courses/[id]", RouteKind::Dynamic),
                ("/admin/courses/[id]/edit", RouteKind::Dynamic),
            ]
        );
    }

    #[test]
    fn test_directories_without_pages_are_skipped() {
        let dir = tree(&["courses/page.tsx", "components/Button.tsx"]);
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();

        let manifest = discover(dir.path()).unwrap();
        assert_eq!(paths(&manifest), vec![("/courses", RouteKind::Static)]);
    }

    #[test]
    fn test_bracket_directory_recorded_without_page() {
        let dir = tree(&["blog/page.tsx", "blog/[slug]/components/Header.tsx"]);

        let manifest = discover(dir.path()).unwrap();
        assert_eq!(
            paths(&manifest),
            vec![
                ("/blog", RouteKind::Static),
                ("/blog/[slug]", RouteKind::Dynamic),
            ]
        );
    }

    #[test]
    fn test_route_groups_are_flattened() {
        let dir = tree(&[
            "(marketing)/page.tsx",
            "(marketing)/pricing/page.tsx",
            "(auth)/login/page.tsx",
        ]);

        let manifest = discover(dir.path()).unwrap();
        assert_eq!(
            paths(&manifest),
            vec![
                ("/login", RouteKind::Static),
                ("", RouteKind::Static),
                ("/pricing", RouteKind::Static),
            ]
        );
    }

    #[test]
    fn test_private_hidden_api_and_slot_folders_ignored() {
        let dir = tree(&[
            "page.tsx",
            "_components/page.tsx",
            ".cache/page.tsx",
            "api/files/page.ts",
            "@modal/page.tsx",
            "contact/page.mdx",
        ]);

        let manifest = discover(dir.path()).unwrap();
        assert_eq!(
            paths(&manifest),
            vec![("", RouteKind::Static), ("/contact", RouteKind::Static)]
        );
    }

    #[test]
    fn test_catch_all_segments_are_dynamic() {
        let dir = tree(&["docs/[...path]/page.tsx", "shop/[[...filters]]/page.tsx"]);

        let manifest = discover(dir.path()).unwrap();
        assert_eq!(manifest.dynamic_routes().len(), 2);
        assert!(manifest.static_routes().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(discover(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_missing_root_falls_back() {
        let dir = TempDir::new().unwrap();
        let manifest = discover_or_fallback(dir.path().join("nope"));
        assert_eq!(
            paths(&manifest),
            vec![("", RouteKind::Static), ("/blog", RouteKind::Static)]
        );
    }

    #[test]
    fn test_route_for_mapping() {
        assert_eq!(route_for(Path::new("")), (String::new(), RouteKind::Static));
        assert_eq!(
            route_for(Path::new("(shop)/books/[id]")),
            ("/books/[id]".to_string(), RouteKind::Dynamic)
        );
    }
}
