//! Syntax-level discovery of type declarations and trait implementations.
//!
//! The scanner never resolves names across crates: a derive is recognised by
//! the last segment of its path and a manual impl by the last segment of the
//! implemented trait.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, ExprLit, GenericArgument, GenericParam, Generics, Item, ItemImpl, Lit, Meta,
    Path, PathArguments, Token, Type, Visibility, WherePredicate,
};

use dreg_domain::kinds::TypeKind;
use tracing::debug;

/// The trait a scan looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitMatcher {
    name: String,
    lifetime: Option<String>,
}

impl TraitMatcher {
    /// Matches paths whose last segment is `name`. `lifetime` is the trait's own
    /// lifetime parameter (`'de` for `Deserialize`), never reported as a bound.
    pub fn new(name: impl Into<String>, lifetime: Option<&str>) -> Self {
        Self { name: name.into(), lifetime: lifetime.map(|l| l.trim_start_matches('\'').to_owned()) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, path: &Path) -> bool {
        path.segments.last().is_some_and(|seg| seg.ident == self.name.as_str())
    }

    fn is_own_lifetime(&self, ident: &syn::Ident) -> bool {
        self.lifetime.as_deref().is_some_and(|lt| ident == lt)
    }

    /// The bound serde's derive infers for an unconstrained type parameter.
    fn inferred_bound(&self) -> String {
        self.lifetime
            .as_ref()
            .map_or_else(|| self.name.clone(), |lt| format!("{}<'{lt}>", self.name))
    }
}

/// A struct, enum or union declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: TypeKind,
    /// Module path relative to the crate root.
    pub module: Vec<String>,
    /// `pub` itself and declared in modules that are all `pub` up to the crate root.
    pub public: bool,
    /// Generic parameter names, e.g. `["'a", "T"]`.
    pub generics: Vec<String>,
    /// Present when the declaration derives the trait; holds the derived bound.
    pub derived: Option<Option<String>>,
}

/// A hand-written `impl Trait for Type` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualImpl {
    /// Last segment of the implementing type.
    pub self_name: String,
    /// Leading segments of the implementing type path (`crate::a::Foo` gives `["crate", "a"]`).
    pub self_qualifier: Vec<String>,
    /// Module path of the `impl` block.
    pub module: Vec<String>,
    /// Generic arguments of the implementing type, e.g. `["T"]`.
    pub type_args: Vec<String>,
    pub bound: Option<String>,
}

/// An out-of-line `mod name;` whose body lives in another file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDecl {
    pub name: String,
    /// Full module path of the declared module.
    pub module: Vec<String>,
    /// Inline `mod` blocks of the declaring file that enclose the declaration.
    pub inline: Vec<String>,
    /// Reachable through `pub` modules only.
    pub public: bool,
    /// Value of a `#[path = "..."]` attribute.
    pub path_attr: Option<String>,
}

/// Everything one file contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFile {
    pub findings: Vec<Finding>,
    pub modules: Vec<ModDecl>,
}

/// Items of one file in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Declared(Declaration),
    Implemented(ManualImpl),
}

/// Parses `content` and returns its declarations, matching impls and
/// out-of-line module declarations in source order.
///
/// `module` is the module path of the file and `public` tells whether that
/// module is reachable through `pub` modules; inline `mod` blocks extend both.
/// `#[cfg(test)]` modules, inline or not, are ignored.
///
/// # Errors
/// Returns the [`syn::Error`] if the file is not valid Rust.
pub fn scan_source(
    content: &str,
    module: &[String],
    public: bool,
    matcher: &TraitMatcher,
) -> Result<ScannedFile, syn::Error> {
    let file = syn::parse_file(content)?;
    let mut scanned = ScannedFile::default();
    let scope = Scope { module: module.to_vec(), inline: Vec::new(), public };
    scan_items(&file.items, &scope, matcher, &mut scanned);
    Ok(scanned)
}

/// Position inside the file being scanned.
struct Scope {
    module: Vec<String>,
    inline: Vec<String>,
    public: bool,
}

impl Scope {
    fn enter(&self, name: String, vis: &Visibility, inline: bool) -> Self {
        let mut module = self.module.clone();
        module.push(name.clone());
        let mut enclosing = self.inline.clone();
        if inline {
            enclosing.push(name);
        }
        Self { module, inline: enclosing, public: self.public && is_pub(vis) }
    }
}

fn scan_items(items: &[Item], scope: &Scope, matcher: &TraitMatcher, out: &mut ScannedFile) {
    for item in items {
        match item {
            Item::Struct(s) => {
                out.findings.push(declare(TypeKind::Struct, &s.ident, &s.vis, &s.generics, &s.attrs, scope, matcher));
            },
            Item::Enum(e) => {
                out.findings.push(declare(TypeKind::Enum, &e.ident, &e.vis, &e.generics, &e.attrs, scope, matcher));
            },
            Item::Union(u) => {
                out.findings.push(declare(TypeKind::Union, &u.ident, &u.vis, &u.generics, &u.attrs, scope, matcher));
            },
            Item::Impl(imp) => {
                if let Some(found) = manual_impl(imp, &scope.module, matcher) {
                    out.findings.push(Finding::Implemented(found));
                }
            },
            Item::Mod(m) if is_cfg_test(&m.attrs) => {},
            Item::Mod(m) => match &m.content {
                Some((_, inner)) => {
                    let nested = scope.enter(m.ident.to_string(), &m.vis, true);
                    scan_items(inner, &nested, matcher, out);
                },
                None => {
                    let nested = scope.enter(m.ident.to_string(), &m.vis, false);
                    out.modules.push(ModDecl {
                        name: m.ident.to_string(),
                        module: nested.module,
                        inline: scope.inline.clone(),
                        public: nested.public,
                        path_attr: path_attribute(&m.attrs),
                    });
                },
            },
            _ => {},
        }
    }
}

fn declare(
    kind: TypeKind,
    ident: &syn::Ident,
    vis: &Visibility,
    generics: &Generics,
    attrs: &[Attribute],
    scope: &Scope,
    matcher: &TraitMatcher,
) -> Finding {
    let derived = derives_trait(attrs, matcher).then(|| {
        serde_bound_override(attrs).map_or_else(
            || render_bound(generics, matcher, Some(&matcher.inferred_bound())),
            |explicit| Some(explicit).filter(|b| !b.is_empty()),
        )
    });

    Finding::Declared(Declaration {
        name: ident.to_string(),
        kind,
        module: scope.module.clone(),
        public: scope.public && is_pub(vis),
        generics: param_names(generics),
        derived,
    })
}

fn manual_impl(imp: &ItemImpl, module: &[String], matcher: &TraitMatcher) -> Option<ManualImpl> {
    let (negative, trait_path, _) = imp.trait_.as_ref()?;
    if negative.is_some() || !matcher.matches(trait_path) {
        return None;
    }

    let Type::Path(self_ty) = imp.self_ty.as_ref() else {
        return None;
    };
    if self_ty.qself.is_some() {
        return None;
    }
    let last = self_ty.path.segments.last()?;
    let qualifier = self_ty
        .path
        .segments
        .iter()
        .take(self_ty.path.segments.len() - 1)
        .map(|seg| seg.ident.to_string())
        .collect();

    let type_args = match &last.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter(|arg| !matches!(arg, GenericArgument::Lifetime(lt) if matcher.is_own_lifetime(&lt.ident)))
            .map(|arg| tidy(arg.to_token_stream()))
            .collect(),
        _ => Vec::new(),
    };

    Some(ManualImpl {
        self_name: last.ident.to_string(),
        self_qualifier: qualifier,
        module: module.to_vec(),
        type_args,
        bound: render_bound(&imp.generics, matcher, None),
    })
}

fn derives_trait(attrs: &[Attribute], matcher: &TraitMatcher) -> bool {
    attrs.iter().any(|attr| {
        if attr.path().is_ident("derive") {
            return derive_list_matches(attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated), matcher);
        }
        if attr.path().is_ident("cfg_attr") {
            let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
                return false;
            };
            // The first element is the predicate, the rest are the gated attributes.
            return metas.iter().skip(1).any(|meta| match meta {
                Meta::List(list) if list.path.is_ident("derive") => derive_list_matches(
                    list.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated),
                    matcher,
                ),
                _ => false,
            });
        }
        false
    })
}

fn derive_list_matches(
    parsed: syn::Result<Punctuated<Path, Token![,]>>,
    matcher: &TraitMatcher,
) -> bool {
    parsed.is_ok_and(|paths| paths.iter().any(|p| matcher.matches(p)))
}

/// Reads `#[serde(bound = "...")]` or `#[serde(bound(deserialize = "..."))]`.
fn serde_bound_override(attrs: &[Attribute]) -> Option<String> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("bound") {
                // Skip the value of unrelated keys such as `rename_all = "..."`.
                if meta.input.peek(Token![=]) {
                    let _: Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    meta.parse_nested_meta(|inner| {
                        if inner.input.peek(Token![=]) {
                            let _: Expr = inner.value()?.parse()?;
                        }
                        Ok(())
                    })?;
                }
                return Ok(());
            }
            if meta.input.peek(Token![=]) {
                found = string_value(meta.value()?.parse()?);
            } else {
                meta.parse_nested_meta(|inner| {
                    let value: Expr = inner.value()?.parse()?;
                    if inner.path.is_ident("deserialize") {
                        found = string_value(value);
                    }
                    Ok(())
                })?;
            }
            Ok(())
        });
        if let Err(e) = parsed {
            debug!(error = %e, "Unreadable serde attribute, later keys ignored");
        }
    }
    found.map(|b| b.trim().to_owned())
}

fn string_value(expr: Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Some(s.value()),
        _ => None,
    }
}

const fn is_pub(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

/// Reads `#[path = "..."]`.
fn path_attribute(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("path") => string_value(nv.value.clone()),
        _ => None,
    })
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr.parse_args::<Meta>().is_ok_and(|meta| meta.path().is_ident("test"))
    })
}

fn param_names(generics: &Generics) -> Vec<String> {
    generics
        .params
        .iter()
        .map(|param| match param {
            GenericParam::Lifetime(lt) => format!("'{}", lt.lifetime.ident),
            GenericParam::Type(ty) => ty.ident.to_string(),
            GenericParam::Const(c) => c.ident.to_string(),
        })
        .collect()
}

/// Renders generic parameters with their constraints as they would appear
/// inside `impl<...>`, merging simple where-predicates into their parameter.
///
/// Unconstrained type parameters get `inferred` when given. Returns `None`
/// when nothing remains after dropping the trait's own lifetime.
fn render_bound(generics: &Generics, matcher: &TraitMatcher, inferred: Option<&str>) -> Option<String> {
    let mut params: Vec<(String, Vec<String>)> = Vec::new();
    let mut extra: Vec<String> = Vec::new();

    for param in &generics.params {
        match param {
            GenericParam::Lifetime(lt) if matcher.is_own_lifetime(&lt.lifetime.ident) => {},
            GenericParam::Lifetime(lt) => params.push((
                format!("'{}", lt.lifetime.ident),
                lt.bounds.iter().map(|b| tidy(b.to_token_stream())).collect(),
            )),
            GenericParam::Type(ty) => params.push((
                ty.ident.to_string(),
                split_bounds(&tidy(ty.bounds.to_token_stream())),
            )),
            GenericParam::Const(c) => {
                params.push((format!("const {}: {}", c.ident, tidy(c.ty.to_token_stream())), Vec::new()));
            },
        }
    }

    if let Some(where_clause) = &generics.where_clause {
        for predicate in &where_clause.predicates {
            let target = match predicate {
                WherePredicate::Type(pt) => match &pt.bounded_ty {
                    Type::Path(tp) if tp.qself.is_none() => {
                        tp.path.get_ident().map(|ident| (ident.to_string(), &pt.bounds))
                    },
                    _ => None,
                },
                _ => None,
            };
            match target.and_then(|(name, bounds)| params.iter_mut().find(|(p, _)| *p == name).map(|p| (p, bounds))) {
                Some(((_, existing), bounds)) => {
                    existing.extend(split_bounds(&tidy(bounds.to_token_stream())));
                },
                None => extra.push(tidy(predicate.to_token_stream())),
            }
        }
    }

    let is_type_param = |name: &str| generics.type_params().any(|tp| tp.ident == name);
    let mut rendered: Vec<String> = params
        .into_iter()
        .map(|(name, bounds)| {
            if bounds.is_empty() {
                match inferred {
                    Some(inferred) if is_type_param(&name) => format!("{name}: {inferred}"),
                    _ => name,
                }
            } else {
                format!("{name}: {}", bounds.join(" + "))
            }
        })
        .collect();
    rendered.extend(extra);

    if rendered.is_empty() { None } else { Some(rendered.join(", ")) }
}

/// Splits `A + B<C>` at top-level `+` signs. The `>` of `->` closes nothing.
fn split_bounds(rendered: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut current = String::new();
    for c in rendered.chars() {
        match c {
            '<' | '(' => depth += 1,
            '>' if current.ends_with('-') => {},
            '>' | ')' => depth -= 1,
            '+' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            },
            _ => {},
        }
        current.push(c);
    }
    parts.push(current);
    parts.into_iter().map(|p| p.trim().to_owned()).filter(|p| !p.is_empty()).collect()
}

/// Compacts token-stream text: `Config < Item = u8 >` becomes `Config<Item = u8>`.
pub(crate) fn tidy(tokens: TokenStream) -> String {
    let mut s = tokens.to_string();
    for (from, to) in [
        (" :: ", "::"),
        (":: ", "::"),
        (" ::", "::"),
        (" : ", ": "),
        ("< ", "<"),
        (" <", "<"),
        (" >", ">"),
        (" ,", ","),
        ("& ", "&"),
        ("( ", "("),
        (" )", ")"),
        (" (", "("),
    ] {
        s = s.replace(from, to);
    }
    s
}
