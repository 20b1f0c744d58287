//! Naming policy: declared identifiers to wire names.

/// Convert a declared identifier to camelCase.
///
/// Underscore-separated words are joined with their first letter
/// capitalized. The leading run of capitals is lowered the way acronyms
/// usually are (`URLValue` -> `urlValue`, `ID` -> `id`). Leading
/// underscores are kept so system attributes like `_key` and `_from` keep
/// their wire names. Identifiers that are already camelCase come back
/// unchanged.
pub fn to_camel_case(name: &str) -> String {
    let rest = name.trim_start_matches('_');
    let prefix = &name[..name.len() - rest.len()];

    let mut words = rest.split('_').filter(|w| !w.is_empty());
    let Some(first) = words.next() else {
        return name.to_string();
    };

    let mut out = String::with_capacity(name.len());
    out.push_str(prefix);
    out.push_str(&lower_leading_capitals(first));
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn lower_leading_capitals(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    if !chars.first().is_some_and(|c| c.is_uppercase()) {
        return word.to_string();
    }

    let mut out = String::with_capacity(word.len());
    let mut i = 0;
    while i < chars.len() {
        if i == 1 && !chars[i].is_uppercase() {
            break;
        }
        // Keep the capital that starts the next word.
        if i > 0 && chars.get(i + 1).is_some_and(|n| !n.is_uppercase()) {
            break;
        }
        out.extend(chars[i].to_lowercase());
        i += 1;
    }
    out.extend(&chars[i..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn snake_case_fields() {
        assert_eq!(to_camel_case("collection_name"), "collectionName");
        assert_eq!(to_camel_case("is_system"), "isSystem");
        assert_eq!(to_camel_case("wait_for_sync"), "waitForSync");
        assert_eq!(to_camel_case("code"), "code");
    }

    #[test]
    fn pascal_and_mixed_case() {
        assert_eq!(to_camel_case("Foo_Bar"), "fooBar");
        assert_eq!(to_camel_case("TestName"), "testName");
        assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(to_camel_case("aB"), "aB");
    }

    #[test]
    fn acronyms() {
        assert_eq!(to_camel_case("ID"), "id");
        assert_eq!(to_camel_case("URLValue"), "urlValue");
        assert_eq!(to_camel_case("Id"), "id");
    }

    #[test]
    fn arango_system_attributes_keep_their_shape() {
        assert_eq!(to_camel_case("_key"), "_key");
        assert_eq!(to_camel_case("_from_vertex"), "_fromVertex");
        assert_eq!(to_camel_case("__"), "__");
        assert_eq!(to_camel_case(""), "");
    }

    proptest! {
        /// Rewriting is idempotent.
        #[test]
        fn prop_idempotent(s in "[A-Za-z_][A-Za-z0-9_]{0,12}") {
            let once = to_camel_case(&s);
            prop_assert_eq!(to_camel_case(&once), once);
        }

        /// Names that already start lowercase without underscores pass through.
        #[test]
        fn prop_camel_names_unchanged(s in "[a-z][a-zA-Z0-9]{0,12}") {
            prop_assert_eq!(to_camel_case(&s), s);
        }
    }
}
