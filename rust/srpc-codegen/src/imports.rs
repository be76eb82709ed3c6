//! Per-file import registration.
//!
//! Every generated file owns one [`ImportSet`]. Emitters call
//! [`ImportSet::require`] whenever they reference another package; the set
//! hands back the qualifier to use and remembers the import so it is declared
//! exactly once when the file header is rendered.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::code_writer::CodeWriter;
use crate::naming::{base_name, go_sanitized};

/// Import paths that are never rewritten by an import prefix.
const STDLIB_PATHS: &[&str] = &["context", "errors", "fmt", "math"];

/// A Go package-level identifier and the package that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoIdent {
    pub name: String,
    pub import_path: String,
    pub package_name: String,
}

impl GoIdent {
    pub fn new(
        name: impl Into<String>,
        import_path: impl Into<String>,
        package_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            import_path: import_path.into(),
            package_name: package_name.into(),
        }
    }
}

/// Rewrites import paths when the file header is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRewrite {
    pub prefix: Option<String>,
}

impl ImportRewrite {
    pub fn apply(&self, path: &str) -> String {
        match &self.prefix {
            Some(prefix) if !STDLIB_PATHS.contains(&path) => format!("{prefix}{path}"),
            _ => path.to_string(),
        }
    }
}

/// Imports required by one output file.
#[derive(Debug, Clone)]
pub struct ImportSet {
    local: String,
    packages: BTreeMap<String, String>,
    /// Identifiers declared by the file itself; no qualifier may use them.
    reserved: BTreeSet<String>,
}

impl ImportSet {
    /// `local` is the import path of the package the file belongs to;
    /// identifiers from it are never qualified.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            packages: BTreeMap::new(),
            reserved: BTreeSet::new(),
        }
    }

    /// Keep `name` away from package qualifiers registered from now on.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    fn is_taken(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.packages.values().any(|taken| taken == name)
    }

    /// Every qualifier and reserved identifier in use so far.
    pub fn taken(&self) -> impl Iterator<Item = &str> {
        self.packages
            .values()
            .chain(&self.reserved)
            .map(String::as_str)
    }

    /// Register `import_path` and return its package qualifier.
    ///
    /// Idempotent: a path already registered returns its existing qualifier.
    /// A name already taken by a different path, or reserved, gets a numeric
    /// suffix.
    pub fn require(&mut self, import_path: &str, name_hint: &str) -> String {
        if let Some(name) = self.packages.get(import_path) {
            return name.clone();
        }

        let base = go_sanitized(name_hint);
        let mut name = base.clone();
        let mut suffix = 0;
        while self.is_taken(&name) {
            suffix += 1;
            name = format!("{base}{suffix}");
        }

        tracing::trace!(import_path, %name, "registered import");
        self.packages.insert(import_path.to_string(), name.clone());
        name
    }

    /// Reference `ident` from this file, importing its package if needed.
    pub fn qualify(&mut self, ident: &GoIdent) -> String {
        if ident.import_path == self.local {
            return ident.name.clone();
        }
        let qualifier = self.require(&ident.import_path, &ident.package_name);
        format!("{qualifier}.{}", ident.name)
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.packages.contains_key(import_path)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Write the import block, sorted by rewritten path. Writes nothing when
    /// no import was registered.
    pub fn render<W: fmt::Write>(
        &self,
        w: &mut CodeWriter<W>,
        rewrite: &ImportRewrite,
    ) -> fmt::Result {
        if self.packages.is_empty() {
            return Ok(());
        }

        let mut specs: Vec<(String, &str)> = self
            .packages
            .iter()
            .map(|(path, name)| (rewrite.apply(path), name.as_str()))
            .collect();
        specs.sort();

        w.writeln("import (")?;
        {
            let _indent = w.indent();
            for (path, name) in specs {
                if base_name(&path) == name {
                    crate::gw_writeln!(w, "{path:?}")?;
                } else {
                    crate::gw_writeln!(w, "{name} {path:?}")?;
                }
            }
        }
        w.writeln(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(set: &ImportSet, rewrite: &ImportRewrite) -> String {
        let mut out = String::new();
        set.render(&mut CodeWriter::new(&mut out), rewrite).unwrap();
        out
    }

    #[test]
    fn require_is_idempotent() {
        let mut set = ImportSet::new("example.com/echo");
        assert_eq!(set.require("errors", "errors"), "errors");
        assert_eq!(set.require("errors", "errors"), "errors");
        assert_eq!(set.require("meta/pkg/srpc/pb", "pb"), "pb");
        assert_eq!(set.require("meta/pkg/srpc/pb", "pb"), "pb");
        assert_eq!(set.len(), 2);
        assert_eq!(
            rendered(&set, &ImportRewrite::default()),
            "import (\n\t\"errors\"\n\t\"meta/pkg/srpc/pb\"\n)\n"
        );
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let mut set = ImportSet::new("example.com/echo");
        assert_eq!(set.require("meta/pkg/srpc/pb", "pb"), "pb");
        assert_eq!(set.require("example.com/other/pb", "pb"), "pb1");
        assert_eq!(set.require("example.com/third/pb", "pb"), "pb2");
        assert_eq!(set.require("example.com/other/pb", "pb"), "pb1");
    }

    #[test]
    fn reserved_names_are_never_qualifiers() {
        let mut set = ImportSet::new("example.com/echo");
        set.reserve("response");
        set.reserve("types");
        assert_eq!(set.require("example.com/response", "response"), "response1");
        let empty = GoIdent::new("Empty", "example.com/common/types", "types");
        assert_eq!(set.qualify(&empty), "types1.Empty");
        assert_eq!(
            rendered(&set, &ImportRewrite::default()),
            "import (\n\ttypes1 \"example.com/common/types\"\n\tresponse1 \"example.com/response\"\n)\n"
        );

        let mut taken: Vec<_> = set.taken().collect();
        taken.sort();
        assert_eq!(taken, ["response", "response1", "types", "types1"]);
    }

    #[test]
    fn local_identifiers_are_unqualified() {
        let mut set = ImportSet::new("example.com/echo");
        let local = GoIdent::new("EchoRequest", "example.com/echo", "echo");
        let foreign = GoIdent::new("Empty", "example.com/common/types", "types");
        assert_eq!(set.qualify(&local), "EchoRequest");
        assert_eq!(set.qualify(&foreign), "types.Empty");
        assert!(set.contains("example.com/common/types"));
        assert!(!set.contains("example.com/echo"));
    }

    #[test]
    fn empty_set_renders_nothing() {
        let set = ImportSet::new("example.com/echo");
        assert!(set.is_empty());
        assert_eq!(rendered(&set, &ImportRewrite::default()), "");
    }

    #[test]
    fn prefix_skips_standard_library() {
        let rewrite = ImportRewrite {
            prefix: Some("github.com/acme/".to_string()),
        };
        assert_eq!(rewrite.apply("errors"), "errors");
        assert_eq!(rewrite.apply("context"), "context");
        assert_eq!(rewrite.apply("meta/pkg/srpc"), "github.com/acme/meta/pkg/srpc");
    }

    #[test]
    fn aliases_only_when_name_differs_from_path() {
        let mut set = ImportSet::new("example.com/echo");
        set.require("context", "context");
        set.require("example.com/v2/types", "typespb");
        let rewrite = ImportRewrite {
            prefix: Some("vendor/".to_string()),
        };
        assert_eq!(
            rendered(&set, &rewrite),
            "import (\n\t\"context\"\n\ttypespb \"vendor/example.com/v2/types\"\n)\n"
        );
    }
}
