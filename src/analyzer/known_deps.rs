//! Database of known heavy npm packages and duplicate-purpose package groups
//!
//! Sizes are typical minified+gzipped contributions observed in production
//! bundles; they are hints, not measurements of the audited project.

use std::collections::HashMap;
use std::sync::OnceLock;

/// How a database entry matches a declared package name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Declared name equals the entry name
    Exact,
    /// Declared name lives under the entry's npm scope (`@scope/...`)
    Scope,
}

/// A known heavy dependency with metadata
#[derive(Debug, Clone)]
pub struct HeavyPackage {
    /// Typical bundle contribution range in KB (minified + gzipped)
    pub size_kb: (u32, u32),
    /// How declared names are matched against this entry
    pub matching: NameMatch,
    /// Why it is heavy
    pub reason: &'static str,
    /// Lighter alternative or mitigation
    pub savings_hint: &'static str,
}

/// A group of packages serving the same purpose
#[derive(Debug, Clone, Copy)]
pub struct DuplicateGroup {
    /// Group label used in findings
    pub label: &'static str,
    /// Member package names
    pub members: &'static [&'static str],
    /// Consolidation advice
    pub savings_hint: &'static str,
}

/// Global database of heavy packages, keyed by name or scope prefix
pub static HEAVY_PACKAGES: OnceLock<HashMap<&'static str, HeavyPackage>> = OnceLock::new();

/// Packages that overlap in purpose, checked in this order
pub const DUPLICATE_GROUPS: &[DuplicateGroup] = &[
    DuplicateGroup {
        label: "date libraries",
        members: &["moment", "date-fns", "dayjs", "luxon"],
        savings_hint: "Standardize on one date library (dayjs or date-fns are tree-shakeable)",
    },
    DuplicateGroup {
        label: "utility libraries",
        members: &["lodash", "lodash-es", "underscore", "ramda"],
        savings_hint: "Keep a single utility library, preferably lodash-es with per-function imports",
    },
    DuplicateGroup {
        label: "HTTP clients",
        members: &["axios", "node-fetch", "superagent", "got", "ky", "request"],
        savings_hint: "Use one HTTP client; the native fetch API often suffices in browsers",
    },
    DuplicateGroup {
        label: "ID generators",
        members: &["uuid", "nanoid", "shortid", "cuid"],
        savings_hint: "Use one ID generator (nanoid is ~130 B) or crypto.randomUUID()",
    },
    DuplicateGroup {
        label: "component libraries",
        members: &["@mui/material", "antd", "react-bootstrap", "@chakra-ui/react"],
        savings_hint: "Mixing component libraries ships several design systems; pick one",
    },
];

fn init_heavy_packages() -> HashMap<&'static str, HeavyPackage> {
    let mut db = HashMap::new();

    let mut add = |name: &'static str,
                   size_kb: (u32, u32),
                   matching: NameMatch,
                   reason: &'static str,
                   savings_hint: &'static str| {
        db.insert(
            name,
            HeavyPackage {
                size_kb,
                matching,
                reason,
                savings_hint,
            },
        );
    };

    add(
        "moment",
        (67, 72),
        NameMatch::Exact,
        "Bundles every locale and is not tree-shakeable",
        "Replace with dayjs (~2 KB) or date-fns with per-function imports",
    );
    add(
        "lodash",
        (24, 72),
        NameMatch::Exact,
        "CommonJS build defeats tree shaking",
        "Use lodash-es or per-method imports (lodash/debounce)",
    );
    add(
        "jquery",
        (30, 32),
        NameMatch::Exact,
        "Full DOM library duplicated by framework rendering",
        "Use native DOM APIs or framework refs",
    );
    add(
        "rxjs",
        (15, 50),
        NameMatch::Exact,
        "Large operator surface when imported wholesale",
        "Import operators from 'rxjs/operators' individually",
    );
    add(
        "chart.js",
        (60, 70),
        NameMatch::Exact,
        "Registers every chart type by default",
        "Register only the controllers you use, or lazy-load charts",
    );
    add(
        "three",
        (150, 180),
        NameMatch::Exact,
        "Full 3D engine",
        "Lazy-load the 3D view with a dynamic import()",
    );
    add(
        "antd",
        (300, 600),
        NameMatch::Exact,
        "Component library with large icon and locale payloads",
        "Import components individually and drop unused locales",
    );
    add(
        "firebase",
        (100, 300),
        NameMatch::Exact,
        "Namespaced SDK pulls every product",
        "Use the modular SDK (firebase/app, firebase/auth, ...)",
    );
    add(
        "aws-sdk",
        (500, 2000),
        NameMatch::Exact,
        "Monolithic v2 SDK with every service client",
        "Migrate to modular @aws-sdk/client-* packages",
    );
    add(
        "core-js",
        (40, 150),
        NameMatch::Exact,
        "Polyfills often shipped to browsers that do not need them",
        "Use targeted polyfills via browserslist and useBuiltIns: 'usage'",
    );
    add(
        "d3",
        (80, 90),
        NameMatch::Exact,
        "Umbrella package of every d3 module",
        "Depend on the specific d3-* modules you use",
    );
    add(
        "xlsx",
        (300, 450),
        NameMatch::Exact,
        "Spreadsheet parser with every format",
        "Load it on demand with a dynamic import()",
    );
    add(
        "pdfjs-dist",
        (300, 400),
        NameMatch::Exact,
        "Full PDF renderer",
        "Lazy-load the viewer and serve the worker separately",
    );
    add(
        "monaco-editor",
        (2000, 4000),
        NameMatch::Exact,
        "Full code editor with language services",
        "Lazy-load the editor and restrict bundled languages",
    );
    add(
        "@fortawesome",
        (50, 900),
        NameMatch::Scope,
        "Icon packs bundle every glyph when imported wholesale",
        "Import individual icons instead of whole icon packs",
    );

    db
}

/// Find the database entry matching a declared package name
///
/// # Examples
///
/// ```
/// use perf_audit::analyzer::known_deps::heavy_package_info;
///
/// assert!(heavy_package_info("moment").is_some());
/// assert!(heavy_package_info("@fortawesome/free-solid-svg-icons").is_some());
/// assert!(heavy_package_info("moment-timezone-lite").is_none());
/// ```
pub fn heavy_package_info(declared: &str) -> Option<&'static HeavyPackage> {
    let db = HEAVY_PACKAGES.get_or_init(init_heavy_packages);

    if let Some(pkg) = db.get(declared) {
        if pkg.matching == NameMatch::Exact {
            return Some(pkg);
        }
    }

    let scope = declared.split_once('/').map(|(scope, _)| scope)?;
    db.get(scope).filter(|pkg| pkg.matching == NameMatch::Scope)
}
