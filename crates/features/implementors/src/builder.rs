use crate::discovery::{CrateSource, SourceFile, discover_crates};
use crate::error::{RegistryError, RegistryErrorExt};
use crate::scanner::{Declaration, Finding, ManualImpl, TraitMatcher, scan_source};
use crate::url::{doc_url, type_path};
use dreg_domain::config::{GroupBy, RegistryConfig};
use dreg_domain::constants::DESERIALIZE_LIFETIME;
use dreg_domain::entry::{ImplOrigin, ImplementorEntry, TraitRef};
use dreg_domain::kinds::KindSet;
use dreg_domain::namespace::Namespace;
use dreg_domain::registry::Registry;
use private::Sealed;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Everything that shapes a build besides the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub include_private: bool,
    pub group_by: GroupBy,
    pub kinds: KindSet,
    pub trait_ref: TraitRef,
    pub base_url: String,
    pub exclude: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            include_private: false,
            group_by: GroupBy::Crate,
            kinds: KindSet::ALL,
            trait_ref: TraitRef::default(),
            base_url: String::new(),
            exclude: vec!["target".to_owned()],
        }
    }
}

impl BuildSettings {
    fn matcher(&self) -> TraitMatcher {
        // Only serde's trait carries the `'de` lifetime; custom traits are matched bare.
        let lifetime =
            (self.trait_ref.name() == TraitRef::default().name()).then_some(DESERIALIZE_LIFETIME);
        TraitMatcher::new(self.trait_ref.name(), lifetime)
    }
}

/// Scan results of one crate, files in module order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateScan {
    pub name: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Configures and runs a registry build.
///
/// ```rust,no_run
/// use dreg_implementors::RegistryBuilder;
///
/// # fn main() -> Result<(), dreg_implementors::RegistryError> {
/// let registry = RegistryBuilder::new().root("./workspace").include_private(true).build()?;
/// println!("{} implementors", registry.entry_count());
/// # Ok(())
/// # }
/// ```
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct RegistryBuilder<S: Sealed = NoRoot> {
    state: S,
    settings: BuildSettings,
}

#[allow(private_bounds)]
impl<S: Sealed> RegistryBuilder<S> {
    #[must_use = "Sets whether non-public declarations are indexed"]
    pub const fn include_private(mut self, enable: bool) -> Self {
        self.settings.include_private = enable;
        self
    }

    #[must_use = "Sets how entries are grouped into namespaces"]
    pub const fn group_by(mut self, group_by: GroupBy) -> Self {
        self.settings.group_by = group_by;
        self
    }

    #[must_use = "Restricts the indexed declaration kinds"]
    pub const fn kinds(mut self, kinds: KindSet) -> Self {
        self.settings.kinds = kinds;
        self
    }

    #[must_use = "Sets the indexed trait"]
    pub fn trait_ref(mut self, trait_ref: TraitRef) -> Self {
        self.settings.trait_ref = trait_ref;
        self
    }

    #[must_use = "Sets the absolute prefix of entry URLs"]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    #[must_use = "Sets directory names that are never entered"]
    pub fn exclude<I, E>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.settings.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    fn transition<N: Sealed>(self, state: N) -> RegistryBuilder<N> {
        RegistryBuilder { state, settings: self.settings }
    }
}

impl RegistryBuilder<NoRoot> {
    #[must_use = "Creates a new registry builder with default settings"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preconfigured from a loaded [`RegistryConfig`].
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> RegistryBuilder<WithRoot> {
        Self::new()
            .include_private(config.source.include_private)
            .group_by(config.source.group_by)
            .kinds(config.source.kinds)
            .exclude(config.source.exclude.iter().cloned())
            .trait_ref(config.target.trait_ref())
            .base_url(config.output.base_url.clone())
            .root(config.source.root.clone())
    }

    #[must_use = "Sets the directory scanned for crates"]
    pub fn root(self, path: impl Into<PathBuf>) -> RegistryBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl RegistryBuilder<WithRoot> {
    /// Scans the root and assembles a fresh registry.
    ///
    /// Every call is an independent snapshot of the tree; nothing from a previous
    /// build is merged in.
    ///
    /// 1. **Discovery**: finds package manifests under the root.
    /// 2. **Scanning**: parses each crate's module tree. Files that are not valid
    ///    Rust are skipped with a warning.
    /// 3. **Assembly**: see [`assemble`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Walk`] or [`RegistryError::Io`] if the tree cannot
    /// be read, [`RegistryError::Manifest`] for a broken `Cargo.toml`, and
    /// [`RegistryError::InvalidNamespace`] / [`RegistryError::InvalidEntry`] if a
    /// discovered item cannot be represented.
    pub fn build(&self) -> Result<Registry, RegistryError> {
        let root = &self.state.0;
        if !root.is_dir() {
            return Err(RegistryError::Io {
                source: io::Error::new(io::ErrorKind::NotFound, "source root is not a directory"),
                context: Some(format!("Opening {}", root.display()).into()),
            });
        }

        let crates = discover_crates(root, &self.settings.exclude)?;
        let matcher = self.settings.matcher();

        let scans = crates
            .iter()
            .map(|source| scan_crate(source, &matcher))
            .collect::<Result<Vec<_>, _>>()?;

        let registry = assemble(&self.settings, &scans)?;
        info!(
            root = %root.display(),
            crates = scans.len(),
            namespaces = registry.len(),
            entries = registry.entry_count(),
            "Implementors registry built"
        );
        Ok(registry)
    }
}

/// Parses the module tree of `source`, starting at its root file and
/// following `mod` declarations breadth-first.
///
/// Files no `mod` item reaches are never read, nor are `#[cfg(test)]` modules.
///
/// # Errors
/// Returns [`RegistryError::Io`] if a file cannot be read.
pub fn scan_crate(source: &CrateSource, matcher: &TraitMatcher) -> Result<CrateScan, RegistryError> {
    let mut findings = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([SourceFile::root(source)]);

    while let Some(file) = queue.pop_front() {
        if !seen.insert(file.path.clone()) {
            continue;
        }
        let content = fs::read_to_string(&file.path)
            .context(format!("Reading {}", file.path.display()))?;
        let scanned = match scan_source(&content, &file.module, file.public, matcher) {
            Ok(scanned) => scanned,
            Err(e) => {
                warn!(file = %file.path.display(), error = %e, "Skipping unparsable source file");
                continue;
            },
        };
        debug!(file = %file.path.display(), items = scanned.findings.len(), "Scanned source file");
        findings.extend(scanned.findings);

        for decl in &scanned.modules {
            match file.child(decl) {
                Some(child) => queue.push_back(child),
                None => debug!(module = %decl.module.join("::"), "Module file not found"),
            }
        }
    }

    Ok(CrateScan { name: source.name.clone(), findings })
}

/// Turns scan results into a registry.
///
/// Derived implementations index their declaration; manual impls are matched to
/// a declaration of the same crate and skipped when the type is foreign. Entries
/// keep discovery order, duplicates within a namespace are dropped.
///
/// # Errors
/// Returns [`RegistryError::InvalidNamespace`] or [`RegistryError::InvalidEntry`]
/// if an item cannot be represented.
pub fn assemble(settings: &BuildSettings, scans: &[CrateScan]) -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();

    for scan in scans {
        let declarations: Vec<&Declaration> = scan
            .findings
            .iter()
            .filter_map(|f| match f {
                Finding::Declared(d) => Some(d),
                Finding::Implemented(_) => None,
            })
            .collect();

        for finding in &scan.findings {
            let (decl, origin, bound, generics) = match finding {
                Finding::Declared(decl) => {
                    let Some(bound) = &decl.derived else { continue };
                    (decl, ImplOrigin::Derive, bound.clone(), decl.generics.clone())
                },
                Finding::Implemented(imp) => {
                    let Some(decl) = resolve(imp, &declarations) else {
                        debug!(
                            krate = %scan.name,
                            target = %imp.self_name,
                            "Skipping impl for a type not declared in this crate"
                        );
                        continue;
                    };
                    (decl, ImplOrigin::Manual, imp.bound.clone(), imp.type_args.clone())
                },
            };

            if !settings.kinds.includes(decl.kind) || (!decl.public && !settings.include_private) {
                continue;
            }

            let namespace = namespace_for(settings.group_by, &scan.name, &decl.module)?;
            let entry = ImplementorEntry {
                name: decl.name.clone(),
                path: type_path(&scan.name, &decl.module, &decl.name),
                kind: decl.kind,
                url: doc_url(&settings.base_url, &scan.name, &decl.module, decl.kind, &decl.name),
                trait_ref: settings.trait_ref.clone(),
                bound,
                generics,
                origin,
                synthetic: false,
            };
            if !entry.is_well_formed() {
                return Err(RegistryError::InvalidEntry {
                    message: format!("{} ({})", entry.path, entry.url).into(),
                    context: Some("entry failed validation".into()),
                });
            }

            debug!(namespace = %namespace, path = %entry.path, origin = ?entry.origin, "Indexed implementor");
            if !registry.insert(namespace, entry) {
                debug!(krate = %scan.name, name = %decl.name, "Duplicate implementor dropped");
            }
        }
    }

    Ok(registry)
}

fn namespace_for(group_by: GroupBy, crate_name: &str, module: &[String]) -> Result<Namespace, RegistryError> {
    let text = match group_by {
        GroupBy::Module if !module.is_empty() => format!("{crate_name}::{}", module.join("::")),
        GroupBy::Crate | GroupBy::Module => crate_name.to_owned(),
    };
    Namespace::try_from(text.as_str()).context(format!("Grouping crate {crate_name}"))
}

/// Finds the declaration an impl refers to.
///
/// Unqualified names prefer the impl's own module and fall back to a unique
/// match anywhere in the crate. `crate::`, `self::` and `super::` prefixes are
/// resolved; any other qualifier is tried as a path relative to the impl's module.
fn resolve<'a>(imp: &ManualImpl, declarations: &[&'a Declaration]) -> Option<&'a Declaration> {
    let find_in = |module: &[String]| {
        declarations.iter().copied().find(|d| d.name == imp.self_name && d.module == module)
    };

    let Some((head, rest)) = imp.self_qualifier.split_first() else {
        if let Some(local) = find_in(&imp.module) {
            return Some(local);
        }
        let mut candidates = declarations.iter().copied().filter(|d| d.name == imp.self_name);
        return match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        };
    };

    let module: Vec<String> = match head.as_str() {
        "crate" => rest.to_vec(),
        "self" => imp.module.iter().chain(rest).cloned().collect(),
        "super" => {
            let (_, parent) = imp.module.split_last()?;
            parent.iter().chain(rest).cloned().collect()
        },
        _ => imp.module.iter().chain(&imp.self_qualifier).cloned().collect(),
    };
    find_in(&module)
}
