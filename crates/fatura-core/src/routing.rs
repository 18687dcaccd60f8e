//! Where a classified document goes and what it is called.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::classification::ClassificationResult;
use crate::routes::RouteTable;

/// Destination folder of a classified document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bucket {
    /// Known supplier with a provider integration.
    Integrated,
    /// Known supplier without an integration.
    Matched,
    /// Unknown supplier or failed classification.
    Review,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Integrated => "INTEGRATED",
            Bucket::Matched => "MATCHED",
            Bucket::Review => "REVIEW",
        }
    }

    /// Bucket for a classification, given the provider routes.
    pub fn for_result(result: &ClassificationResult, routes: &RouteTable) -> Self {
        if !result.is_known() {
            Bucket::Review
        } else if routes.has_integration(&result.supplier) {
            Bucket::Integrated
        } else {
            Bucket::Matched
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three output folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub integrated: PathBuf,
    pub matched: PathBuf,
    pub review: PathBuf,
}

impl OutputLayout {
    /// `INTEGRATED/`, `MATCHED/` and `REVIEW/` under `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            integrated: root.join(Bucket::Integrated.as_str()),
            matched: root.join(Bucket::Matched.as_str()),
            review: root.join(Bucket::Review.as_str()),
        }
    }

    pub fn dir(&self, bucket: Bucket) -> &Path {
        match bucket {
            Bucket::Integrated => &self.integrated,
            Bucket::Matched => &self.matched,
            Bucket::Review => &self.review,
        }
    }

    pub fn create_all(&self) -> std::io::Result<()> {
        for dir in [&self.integrated, &self.matched, &self.review] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// A planned move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    pub bucket: Bucket,
    pub file_name: String,
    pub destination: PathBuf,
}

/// Supplier key with the first letter uppercased and the rest lowercased.
pub fn display_supplier_name(supplier: &str) -> String {
    let mut chars = supplier.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `YYYYMMDD_Supplier.pdf`; an unknown date becomes `<year>XXXX`.
pub fn standard_file_name(supplier: &str, invoice_date: Option<&str>, current_year: i32) -> String {
    let date = match invoice_date {
        Some(date) => date.to_string(),
        None => format!("{current_year}XXXX"),
    };
    format!("{}_{}.pdf", date, display_supplier_name(supplier))
}

/// First free path for `file_name` in `dir`, appending `_1`, `_2`, ... to the stem.
pub fn resolve_collision(dir: &Path, file_name: &str, exists: impl Fn(&Path) -> bool) -> PathBuf {
    let candidate = dir.join(file_name);
    if !exists(&candidate) {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{extension}"));
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Decide the bucket and destination of a classified document.
///
/// REVIEW keeps the original name; the other buckets use the standard name.
pub fn plan_route(
    original_name: &str,
    result: &ClassificationResult,
    routes: &RouteTable,
    layout: &OutputLayout,
    current_year: i32,
    exists: impl Fn(&Path) -> bool,
) -> RoutePlan {
    let bucket = Bucket::for_result(result, routes);
    let file_name = match bucket {
        Bucket::Review => original_name.to_string(),
        _ => standard_file_name(&result.supplier, result.invoice_date.as_deref(), current_year),
    };
    let destination = resolve_collision(layout.dir(bucket), &file_name, exists);
    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(file_name);

    RoutePlan {
        bucket,
        file_name,
        destination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classification::Method;
    use pretty_assertions::assert_eq;
    use serde_json::Map;
    use std::collections::HashSet;

    fn result(supplier: &str, date: Option<&str>) -> ClassificationResult {
        ClassificationResult::new(supplier, 0.9, Method::Keywords, Map::new())
            .with_text(date.map(str::to_string), "")
    }

    fn layout() -> OutputLayout {
        OutputLayout::under(Path::new("/out"))
    }

    #[test]
    fn test_display_supplier_name() {
        assert_eq!(display_supplier_name("novadis"), "Novadis");
        assert_eq!(display_supplier_name("teofilo_gd"), "Teofilo_gd");
        assert_eq!(display_supplier_name("LIDL"), "Lidl");
        assert_eq!(display_supplier_name(""), "");
    }

    #[test]
    fn test_standard_file_name() {
        assert_eq!(standard_file_name("novadis", Some("20250210"), 2025), "20250210_Novadis.pdf");
        assert_eq!(standard_file_name("novadis", None, 2026), "2026XXXX_Novadis.pdf");
    }

    #[test]
    fn test_buckets() {
        let routes = RouteTable::builtin();
        // novadis has a Parseur mailbox
        assert_eq!(Bucket::for_result(&result("novadis", None), &routes), Bucket::Integrated);
        assert_eq!(Bucket::for_result(&result("kiabi", None), &routes), Bucket::Matched);
        assert_eq!(Bucket::for_result(&result("unknown", None), &routes), Bucket::Review);
        assert_eq!(
            Bucket::for_result(&ClassificationResult::error("boom"), &routes),
            Bucket::Review
        );
    }

    #[test]
    fn test_plan_known_supplier() {
        let plan = plan_route(
            "scan001.pdf",
            &result("novadis", Some("20250210")),
            &RouteTable::builtin(),
            &layout(),
            2025,
            |_| false,
        );
        assert_eq!(plan.bucket, Bucket::Integrated);
        assert_eq!(plan.file_name, "20250210_Novadis.pdf");
        assert_eq!(plan.destination, PathBuf::from("/out/INTEGRATED/20250210_Novadis.pdf"));
    }

    #[test]
    fn test_review_keeps_original_name() {
        let plan = plan_route(
            "scan001.pdf",
            &result("unknown", Some("20250210")),
            &RouteTable::builtin(),
            &layout(),
            2025,
            |_| false,
        );
        assert_eq!(plan.bucket, Bucket::Review);
        assert_eq!(plan.destination, PathBuf::from("/out/REVIEW/scan001.pdf"));
    }

    #[test]
    fn test_collisions_get_suffix() {
        let taken: HashSet<PathBuf> = [
            "/out/MATCHED/20250101_Kiabi.pdf",
            "/out/MATCHED/20250101_Kiabi_1.pdf",
        ]
        .into_iter()
        .map(PathBuf::from)
        .collect();

        let plan = plan_route(
            "scan.pdf",
            &result("kiabi", Some("20250101")),
            &RouteTable::builtin(),
            &layout(),
            2025,
            |p| taken.contains(p),
        );
        assert_eq!(plan.bucket, Bucket::Matched);
        assert_eq!(plan.file_name, "20250101_Kiabi_2.pdf");
    }

    #[test]
    fn test_layout_create_all() {
        let root = tempfile::tempdir().unwrap();
        let layout = OutputLayout::under(root.path());
        layout.create_all().unwrap();
        assert!(root.path().join("INTEGRATED").is_dir());
        assert!(root.path().join("MATCHED").is_dir());
        assert!(root.path().join("REVIEW").is_dir());
    }
}
