//! Package and qualified-name extraction for symbols declared in dependencies
//!
//! A symbol whose declaration file sits under a `node_modules/` directory
//! belongs to an external package. References to such symbols carry the
//! package name and the symbol's qualified name so they stay meaningful once
//! serialized away from the producer.
//!
//! ## Supported layouts
//!
//! - Plain: `/repo/node_modules/lodash/index.d.ts` → `lodash`
//! - Scoped: `/repo/node_modules/@types/node/fs.d.ts` → `@types/node`
//! - Windows separators are normalized first: `C:\repo\node_modules\x\a.d.ts` → `x`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Directory marker separating the analyzed sources from dependencies
pub const DEPENDENCY_BOUNDARY: &str = "node_modules/";

/// Where a symbol was declared, relative to the dependency boundary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolLocation {
    /// The declaration file with `/` separators
    path: String,
    /// The dependency the file belongs to, if any
    package: Option<String>,
}

impl SymbolLocation {
    pub fn parse(file_name: &str) -> Self {
        let path = file_name.replace('\\', "/");
        let package = Self::extract_package(&path);
        Self { path, package }
    }

    fn extract_package(path: &str) -> Option<String> {
        let start = path.find(DEPENDENCY_BOUNDARY)? + DEPENDENCY_BOUNDARY.len();
        let rest = &path[start..];

        // Scoped packages (`@scope/name`) span one extra segment
        let segments = if rest.starts_with('@') { 2 } else { 1 };
        let end = rest
            .match_indices('/')
            .nth(segments - 1)
            .map_or(rest.len(), |(idx, _)| idx);

        let package = &rest[..end];
        if package.is_empty() {
            None
        } else {
            Some(package.to_string())
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn is_external(&self) -> bool {
        self.package.is_some()
    }
}

impl fmt::Display for SymbolLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{} ({})", self.path, package),
            None => f.write_str(&self.path),
        }
    }
}

/// Package plus qualified name of an externally declared symbol
///
/// The two always travel together: a reference either has both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalName {
    pub qualified_name: String,
    pub package: String,
}

impl ExternalName {
    pub fn new(qualified_name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            package: package.into(),
        }
    }

    /// Build from a declaration file and the producer's fully-qualified name
    ///
    /// Returns `None` for symbols declared inside the analyzed sources.
    pub fn from_declaration(file_name: &str, fully_qualified_name: &str) -> Option<Self> {
        let location = SymbolLocation::parse(file_name);
        let package = location.package?;
        Some(Self {
            qualified_name: strip_module_prefix(fully_qualified_name).to_string(),
            package,
        })
    }
}

/// Drop a leading quoted module path from a fully-qualified name
///
/// `"/repo/node_modules/x/index".Foo.Bar` → `Foo.Bar`. Names without a quoted
/// prefix, or with an unterminated one, are returned unchanged.
pub fn strip_module_prefix(fully_qualified_name: &str) -> &str {
    if !fully_qualified_name.starts_with('"') {
        return fully_qualified_name;
    }
    match fully_qualified_name[1..].find("\".") {
        Some(idx) => &fully_qualified_name[idx + 3..],
        None => fully_qualified_name,
    }
}
