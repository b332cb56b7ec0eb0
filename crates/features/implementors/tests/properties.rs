use dreg_domain::entry::{ImplOrigin, ImplementorEntry, TraitRef};
use dreg_domain::kinds::TypeKind;
use dreg_domain::namespace::Namespace;
use dreg_domain::registry::Registry;
use dreg_implementors::{doc_url, render_js, type_path};
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = TypeKind> {
    prop_oneof![Just(TypeKind::Struct), Just(TypeKind::Enum), Just(TypeKind::Union)]
}

prop_compose! {
    fn entry()(
        krate in "[a-z][a-z0-9_]{0,8}",
        module in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 0..3),
        name in "[A-Z][A-Za-z0-9]{0,10}",
        kind in kind(),
        bound in prop::option::of(Just("T: Config".to_owned())),
    ) -> (String, ImplementorEntry) {
        let entry = ImplementorEntry {
            path: type_path(&krate, &module, &name),
            url: doc_url("", &krate, &module, kind, &name),
            name,
            kind,
            trait_ref: TraitRef::default(),
            bound,
            generics: Vec::new(),
            origin: ImplOrigin::Derive,
            synthetic: false,
        };
        (krate, entry)
    }
}

proptest! {
    #[test]
    fn generated_urls_are_well_formed((_, entry) in entry()) {
        prop_assert!(entry.is_well_formed());
    }

    #[test]
    fn registry_never_holds_duplicate_keys(entries in prop::collection::vec(entry(), 0..40)) {
        let mut registry = Registry::new();
        for (krate, entry) in entries.iter().cloned() {
            let ns = Namespace::try_from(krate.as_str()).expect("generated namespace is valid");
            registry.insert(ns.clone(), entry.clone());
            // Re-inserting is always rejected.
            prop_assert!(!registry.insert(ns, entry));
        }

        for (_, list) in registry.iter() {
            for (i, a) in list.iter().enumerate() {
                prop_assert!(list[i + 1..].iter().all(|b| a.key() != b.key()));
            }
        }
    }

    #[test]
    fn rendering_is_deterministic(entries in prop::collection::vec(entry(), 0..20)) {
        let build = || {
            let mut registry = Registry::new();
            for (krate, entry) in entries.iter().cloned() {
                registry.insert(Namespace::try_from(krate).expect("valid"), entry);
            }
            registry
        };
        prop_assert_eq!(render_js(&build()).expect("js"), render_js(&build()).expect("js"));
    }
}
