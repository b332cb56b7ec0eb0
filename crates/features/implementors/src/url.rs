use dreg_domain::kinds::TypeKind;

/// Fully-qualified path of a type: `crate::module::Name`.
#[must_use]
pub fn type_path(crate_name: &str, module: &[String], name: &str) -> String {
    let mut path = String::from(crate_name);
    for segment in module {
        path.push_str("::");
        path.push_str(segment);
    }
    path.push_str("::");
    path.push_str(name);
    path
}

/// Documentation page of a type in rustdoc's layout:
/// `{base}{crate}/{module/path/}{kind}.{Name}.html`.
///
/// An empty `base` yields a URL relative to the documentation root; any other
/// base gets a trailing `/` if it lacks one.
#[must_use]
pub fn doc_url(base: &str, crate_name: &str, module: &[String], kind: TypeKind, name: &str) -> String {
    let mut url = String::with_capacity(base.len() + crate_name.len() + name.len() + 16);
    if !base.is_empty() {
        url.push_str(base);
        if !base.ends_with('/') {
            url.push('/');
        }
    }
    url.push_str(crate_name);
    url.push('/');
    for segment in module {
        url.push_str(segment);
        url.push('/');
    }
    url.push_str(kind.as_str());
    url.push('.');
    url.push_str(name);
    url.push_str(".html");
    url
}

/// Relative location of a trait's implementors file inside the doc root,
/// e.g. `implementors/serde/de/trait.Deserialize.js`.
#[must_use]
pub fn implementors_file(dir: &str, trait_path: &str) -> String {
    let mut segments: Vec<&str> = trait_path.split("::").filter(|s| !s.is_empty()).collect();
    let name = segments.pop().unwrap_or(trait_path);
    let mut file = String::from(dir);
    for segment in segments {
        file.push('/');
        file.push_str(segment);
    }
    file.push_str("/trait.");
    file.push_str(name);
    file.push_str(".js");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| (*p).to_owned()).collect()
    }

    #[test]
    fn relative_urls_follow_rustdoc_layout() {
        assert_eq!(doc_url("", "alpha", &[], TypeKind::Struct, "StructA"), "alpha/struct.StructA.html");
        assert_eq!(
            doc_url("", "mc_data_availability", &module(&["starknet", "config"]), TypeKind::Struct, "StarknetConfig"),
            "mc_data_availability/starknet/config/struct.StarknetConfig.html"
        );
        assert_eq!(doc_url("", "beta", &module(&["l1"]), TypeKind::Enum, "DaMode"), "beta/l1/enum.DaMode.html");
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let expected = "https://docs.example.org/alpha/union.Raw.html";
        assert_eq!(doc_url("https://docs.example.org", "alpha", &[], TypeKind::Union, "Raw"), expected);
        assert_eq!(doc_url("https://docs.example.org/", "alpha", &[], TypeKind::Union, "Raw"), expected);
    }

    #[test]
    fn type_paths_join_segments() {
        assert_eq!(type_path("alpha", &module(&["a", "b"]), "Foo"), "alpha::a::b::Foo");
        assert_eq!(type_path("alpha", &[], "Foo"), "alpha::Foo");
    }

    #[test]
    fn implementors_file_mirrors_trait_path() {
        assert_eq!(
            implementors_file("implementors", "serde::de::Deserialize"),
            "implementors/serde/de/trait.Deserialize.js"
        );
        assert_eq!(implementors_file("implementors", "Local"), "implementors/trait.Local.js");
    }
}
