//! Front-end artifacts: rustdoc's self-registering implementors script and a
//! plain JSON dump of the registry.

use crate::error::{RegistryError, RegistryErrorExt};
use dreg_domain::constants::{DESERIALIZE_LIFETIME, PENDING_SLOT, REGISTER_CALLBACK};
use dreg_domain::entry::{ImplementorEntry, TraitRef};
use dreg_domain::registry::Registry;
use serde::Serialize;
use std::fmt::Write;

/// One element of an `implementors[...]` array.
#[derive(Debug, Serialize)]
struct JsImplementor<'a> {
    text: String,
    synthetic: bool,
    types: [&'a str; 1],
}

/// Renders the registry as the script rustdoc pages load from
/// `implementors/<trait path>/trait.<Name>.js`.
///
/// The script hands the map to `window.register_implementors` when the page
/// has already defined it, and otherwise parks it in `window.pending_implementors`
/// for the page to pick up once it loads.
///
/// # Errors
/// Returns [`RegistryError::Json`] if an entry cannot be encoded.
pub fn render_js(registry: &Registry) -> Result<String, RegistryError> {
    let mut out = String::from("(function() {var implementors = {};\n");

    for (namespace, entries) in registry.iter() {
        let items = entries
            .iter()
            .map(|entry| JsImplementor { text: impl_text(entry), synthetic: entry.synthetic, types: [&entry.path] })
            .collect::<Vec<_>>();
        let key = serde_json::to_string(namespace.as_str()).context("Encoding namespace")?;
        let list = serde_json::to_string(&items).context(format!("Encoding implementors of {namespace}"))?;
        writeln!(out, "implementors[{key}] = {list};")?;
    }

    writeln!(
        out,
        "if (window.{REGISTER_CALLBACK}) {{window.{REGISTER_CALLBACK}(implementors);}} \
         else {{window.{PENDING_SLOT} = implementors;}}"
    )?;
    out.push_str("})()");
    Ok(out)
}

/// Pretty-printed JSON of the whole registry.
///
/// # Errors
/// Returns [`RegistryError::Json`] if serialization fails.
pub fn render_json(registry: &Registry) -> Result<String, RegistryError> {
    serde_json::to_string_pretty(registry).context("Encoding registry")
}

/// The HTML line rustdoc shows for one implementation, e.g.
/// `impl&lt;'de&gt; <a class="trait" …>Deserialize</a>&lt;'de&gt; for <a class="struct" …>StructA</a>`.
#[must_use]
pub fn impl_text(entry: &ImplementorEntry) -> String {
    let lifetime = trait_lifetime(&entry.trait_ref);

    let mut params: Vec<&str> = lifetime.into_iter().collect();
    if let Some(bound) = entry.bound.as_deref() {
        params.push(bound);
    }

    let mut text = String::from("impl");
    if !params.is_empty() {
        text.push_str(&escape(&format!("<{}>", params.join(", "))));
    }
    text.push(' ');
    text.push_str(&trait_link(&entry.trait_ref));
    if let Some(lt) = lifetime {
        text.push_str(&escape(&format!("<{lt}>")));
    }
    text.push_str(" for ");
    text.push_str(&format!(
        r#"<a class="{kind}" href="{url}" title="{kind} {path}">{name}</a>"#,
        kind = entry.kind,
        url = escape(&entry.url),
        path = escape(&entry.path),
        name = escape(&entry.name),
    ));
    if !entry.generics.is_empty() {
        text.push_str(&escape(&format!("<{}>", entry.generics.join(", "))));
    }
    text
}

fn trait_lifetime(trait_ref: &TraitRef) -> Option<&'static str> {
    (trait_ref.name() == TraitRef::default().name()).then_some(DESERIALIZE_LIFETIME)
}

fn trait_link(trait_ref: &TraitRef) -> String {
    let name = escape(trait_ref.name());
    match &trait_ref.url {
        Some(url) => format!(
            r#"<a class="trait" href="{}" title="trait {}">{name}</a>"#,
            escape(url),
            escape(&trait_ref.path)
        ),
        None => name,
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreg_domain::entry::ImplOrigin;
    use dreg_domain::kinds::TypeKind;
    use dreg_domain::namespace::Namespace;

    fn entry(name: &str, kind: TypeKind, bound: Option<&str>, generics: &[&str]) -> ImplementorEntry {
        ImplementorEntry {
            name: name.to_owned(),
            path: format!("alpha::{name}"),
            kind,
            url: format!("alpha/{kind}.{name}.html"),
            trait_ref: TraitRef::default(),
            bound: bound.map(str::to_owned),
            generics: generics.iter().map(|g| (*g).to_owned()).collect(),
            origin: ImplOrigin::Derive,
            synthetic: false,
        }
    }

    fn alpha() -> Registry {
        let ns = Namespace::try_from("alpha").expect("valid namespace");
        let mut registry = Registry::new();
        registry.insert(ns.clone(), entry("StructA", TypeKind::Struct, None, &[]));
        registry.insert(ns, entry("EnumB", TypeKind::Enum, None, &[]));
        registry
    }

    #[test]
    fn plain_entry_text() {
        let text = impl_text(&entry("StructA", TypeKind::Struct, None, &[]));
        assert!(text.starts_with("impl&lt;'de&gt; <a class=\"trait\""));
        assert!(text.contains(">Deserialize</a>&lt;'de&gt; for "));
        assert!(text.ends_with(
            r#"<a class="struct" href="alpha/struct.StructA.html" title="struct alpha::StructA">StructA</a>"#
        ));
    }

    #[test]
    fn generic_entry_text_carries_bound_and_params() {
        let text = impl_text(&entry("Wrapper", TypeKind::Struct, Some("T: Config"), &["T"]));
        assert!(text.starts_with("impl&lt;'de, T: Config&gt; "));
        assert!(text.ends_with(">Wrapper</a>&lt;T&gt;"));
    }

    #[test]
    fn script_registers_or_parks() {
        let js = render_js(&alpha()).expect("rendered");
        assert!(js.starts_with("(function() {var implementors = {};\nimplementors[\"alpha\"] = [{\"text\":"));
        assert!(js.contains(r#""synthetic":false,"types":["alpha::StructA"]"#));
        assert!(js.find("alpha::StructA") < js.find("alpha::EnumB"));
        assert!(js.contains("if (window.register_implementors) {window.register_implementors(implementors);}"));
        assert!(js.contains("else {window.pending_implementors = implementors;}"));
        assert!(js.ends_with("})()"));
    }

    #[test]
    fn empty_registry_still_registers() {
        let js = render_js(&Registry::new()).expect("rendered");
        assert!(!js.contains("implementors["));
        assert!(js.contains("window.pending_implementors = implementors;"));
    }

    #[test]
    fn json_dump_reads_back() {
        let json = render_json(&alpha()).expect("rendered");
        let parsed: Registry = serde_json::from_str(&json).expect("parsed");
        assert_eq!(parsed, alpha());
    }
}
