//! Crate and source file discovery.

use crate::error::{RegistryError, RegistryErrorExt};
use crate::scanner::ModDecl;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

const MANIFEST: &str = "Cargo.toml";
const SRC_DIR: &str = "src";

/// A crate found under the scanned root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateSource {
    /// Library crate name, `-` mapped to `_`.
    pub name: String,
    /// Directory holding the crate's `Cargo.toml`.
    pub dir: PathBuf,
    /// Root source file: `[lib].path`, else `src/lib.rs`, else `src/main.rs`.
    pub root_file: PathBuf,
}

/// One file of a crate's module tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: Vec<String>,
    /// Reachable from the crate root through `pub` modules only.
    pub public: bool,
    /// Crate roots, `mod.rs` files and `#[path]` files own their directory;
    /// `a.rs` keeps its children in `a/`.
    pub mod_rs: bool,
}

impl SourceFile {
    #[must_use]
    pub fn root(source: &CrateSource) -> Self {
        Self { path: source.root_file.clone(), module: Vec::new(), public: true, mod_rs: true }
    }

    /// Locates the file holding the body of `decl`, declared in this file.
    ///
    /// Follows rustc's lookup: `name.rs`, then `name/mod.rs`, under this file's
    /// module directory plus any enclosing inline modules. A `#[path]` outside
    /// inline modules is relative to this file's directory.
    #[must_use]
    pub fn child(&self, decl: &ModDecl) -> Option<Self> {
        let dir = self.path.parent()?;
        let mut base = if self.mod_rs { dir.to_path_buf() } else { dir.join(self.path.file_stem()?) };
        base.extend(&decl.inline);

        let (path, mod_rs) = match &decl.path_attr {
            Some(custom) if decl.inline.is_empty() => (dir.join(custom), true),
            Some(custom) => (base.join(custom), true),
            None => {
                let flat = base.join(format!("{}.rs", decl.name));
                if flat.is_file() { (flat, false) } else { (base.join(&decl.name).join("mod.rs"), true) }
            },
        };

        path.is_file().then(|| Self { path, module: decl.module.clone(), public: decl.public, mod_rs })
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<PackageSection>,
    lib: Option<LibSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LibSection {
    name: Option<String>,
    path: Option<PathBuf>,
}

/// Finds every package manifest under `root`, sorted by path.
///
/// Hidden directories and directories named in `exclude` are not entered.
/// Workspace-only manifests (no `[package]`) and packages without a root
/// source file are skipped.
///
/// # Errors
/// Returns [`RegistryError::Walk`] if a directory cannot be traversed, or
/// [`RegistryError::Io`]/[`RegistryError::Manifest`] for unreadable manifests.
pub fn discover_crates(root: &Path, exclude: &[String]) -> Result<Vec<CrateSource>, RegistryError> {
    let mut crates = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry, exclude));

    for entry in walker {
        let entry = entry.context(format!("Scanning {}", root.display()))?;
        if !entry.file_type().is_file() || entry.file_name() != MANIFEST {
            continue;
        }
        let Some(dir) = entry.path().parent() else { continue };

        if let Some(source) = read_manifest(dir)? {
            debug!(name = %source.name, dir = %dir.display(), "Discovered crate");
            crates.push(source);
        }
    }

    Ok(crates)
}

fn is_skipped_dir(entry: &DirEntry, exclude: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || exclude.iter().any(|e| e.as_str() == name)
}

fn read_manifest(dir: &Path) -> Result<Option<CrateSource>, RegistryError> {
    let path = dir.join(MANIFEST);
    let content =
        fs::read_to_string(&path).context(format!("Reading manifest {}", path.display()))?;
    let manifest = toml::from_str::<Manifest>(&content)
        .context(format!("Parsing manifest {}", path.display()))?;

    let Some(package) = manifest.package else {
        trace!(path = %path.display(), "Skipping workspace manifest");
        return Ok(None);
    };

    let lib = manifest.lib.unwrap_or(LibSection { name: None, path: None });
    let name = lib.name.unwrap_or(package.name).replace('-', "_");

    let candidates = match lib.path {
        Some(custom) => vec![dir.join(custom)],
        None => vec![dir.join(SRC_DIR).join("lib.rs"), dir.join(SRC_DIR).join("main.rs")],
    };
    let Some(root_file) = candidates.into_iter().find(|p| p.is_file()) else {
        debug!(name = %name, "Crate has no root source file, skipping");
        return Ok(None);
    };

    Ok(Some(CrateSource { name, dir: dir.to_path_buf(), root_file }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
        fs::write(path, "").expect("file");
    }

    fn decl(name: &str, module: &[&str], inline: &[&str], path_attr: Option<&str>) -> ModDecl {
        ModDecl {
            name: name.to_owned(),
            module: module.iter().map(|m| (*m).to_owned()).collect(),
            inline: inline.iter().map(|m| (*m).to_owned()).collect(),
            public: true,
            path_attr: path_attr.map(str::to_owned),
        }
    }

    fn file(path: PathBuf, module: &[&str], mod_rs: bool) -> SourceFile {
        SourceFile { path, module: module.iter().map(|m| (*m).to_owned()).collect(), public: true, mod_rs }
    }

    #[test]
    fn child_modules_follow_rustc_lookup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("src");
        for f in ["lib.rs", "sync.rs", "sync/l2.rs", "starknet/mod.rs", "starknet/config.rs", "gen/types.rs", "outer/inner.rs"] {
            touch(&src, f);
        }
        let root = file(src.join("lib.rs"), &[], true);

        let sync = root.child(&decl("sync", &["sync"], &[], None)).expect("sync.rs");
        assert_eq!(sync.path, src.join("sync.rs"));
        assert!(!sync.mod_rs);
        let l2 = sync.child(&decl("l2", &["sync", "l2"], &[], None)).expect("sync/l2.rs");
        assert_eq!(l2.path, src.join("sync/l2.rs"));

        let starknet = root.child(&decl("starknet", &["starknet"], &[], None)).expect("starknet/mod.rs");
        assert!(starknet.mod_rs);
        let config = starknet.child(&decl("config", &["starknet", "config"], &[], None)).expect("config");
        assert_eq!(config.path, src.join("starknet/config.rs"));

        let generated = root.child(&decl("generated", &["generated"], &[], Some("gen/types.rs"))).expect("path");
        assert_eq!(generated.path, src.join("gen/types.rs"));

        let inner = root.child(&decl("inner", &["outer", "inner"], &["outer"], None)).expect("inline parent");
        assert_eq!(inner.path, src.join("outer/inner.rs"));

        assert!(root.child(&decl("missing", &["missing"], &[], None)).is_none());
    }

    #[test]
    fn lib_target_wins_over_main() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(MANIFEST), "[package]\nname = \"state-sync\"\n").expect("manifest");
        touch(dir.path(), "src/lib.rs");
        touch(dir.path(), "src/main.rs");

        let crates = discover_crates(dir.path(), &[]).expect("discovered");
        assert_eq!(crates.len(), 1);
        assert_eq!(crates[0].name, "state_sync");
        assert_eq!(crates[0].root_file, dir.path().join("src/lib.rs"));
    }
}
