//! Serialization options and their resolution.

use serde::{Deserialize, Serialize};

/// The policy for one serialize/deserialize call.
///
/// Serializers hold one of these as their process defaults; callers may
/// supply another per call. A per-call record replaces the defaults as a
/// whole - fields are never merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializationOptions {
    /// Let the other four options reach into open-map keys and values.
    pub apply_options_to_map_values: bool,
    /// Omit fields that hold their type's default on encode.
    pub ignore_missing_members: bool,
    /// Omit fields that hold null on encode.
    pub ignore_null_values: bool,
    /// Rewrite field names to camelCase.
    pub use_camel_case: bool,
    /// Encode enumerations by name rather than ordinal.
    pub use_string_enums: bool,
}

impl Default for SerializationOptions {
    fn default() -> Self {
        Self {
            apply_options_to_map_values: false,
            ignore_missing_members: false,
            ignore_null_values: true,
            use_camel_case: false,
            use_string_enums: false,
        }
    }
}

impl SerializationOptions {
    /// Options that leave every name and value untouched.
    ///
    /// Open maps are written with this policy unless
    /// `apply_options_to_map_values` is set.
    pub const fn verbatim() -> Self {
        Self {
            apply_options_to_map_values: false,
            ignore_missing_members: false,
            ignore_null_values: false,
            use_camel_case: false,
            use_string_enums: false,
        }
    }

    pub fn with_apply_options_to_map_values(mut self, enabled: bool) -> Self {
        self.apply_options_to_map_values = enabled;
        self
    }

    pub fn with_ignore_missing_members(mut self, enabled: bool) -> Self {
        self.ignore_missing_members = enabled;
        self
    }

    pub fn with_ignore_null_values(mut self, enabled: bool) -> Self {
        self.ignore_null_values = enabled;
        self
    }

    pub fn with_camel_case(mut self, enabled: bool) -> Self {
        self.use_camel_case = enabled;
        self
    }

    pub fn with_string_enums(mut self, enabled: bool) -> Self {
        self.use_string_enums = enabled;
        self
    }

    /// Policy to use inside an open map written under `self`.
    pub fn for_map_values(&self) -> Self {
        if self.apply_options_to_map_values {
            *self
        } else {
            Self::verbatim()
        }
    }

    /// Load options from a JSON document. Missing fields take their defaults.
    pub fn from_json_slice(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Pick the effective options for a call.
///
/// `per_call` wins wholesale when present; otherwise the defaults apply
/// unchanged.
pub fn resolve(
    defaults: &SerializationOptions,
    per_call: Option<&SerializationOptions>,
) -> SerializationOptions {
    match per_call {
        Some(options) => {
            log::debug!("using per-call serialization options {options:?}");
            *options
        }
        None => *defaults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_override_returns_defaults() {
        let defaults = SerializationOptions::default().with_camel_case(true);
        assert_eq!(resolve(&defaults, None), defaults);
    }

    #[test]
    fn override_replaces_defaults_wholesale() {
        let defaults = SerializationOptions::default()
            .with_camel_case(true)
            .with_string_enums(true)
            .with_ignore_null_values(true);
        let per_call = SerializationOptions::verbatim().with_ignore_missing_members(true);

        let effective = resolve(&defaults, Some(&per_call));
        assert_eq!(effective, per_call);
        // Nothing leaks through from the defaults.
        assert!(!effective.use_camel_case);
        assert!(!effective.use_string_enums);
        assert!(!effective.ignore_null_values);
    }

    #[test]
    fn map_value_policy() {
        let options = SerializationOptions::default().with_camel_case(true);
        assert_eq!(options.for_map_values(), SerializationOptions::verbatim());

        let options = options.with_apply_options_to_map_values(true);
        assert_eq!(options.for_map_values(), options);
    }

    #[test]
    fn loads_from_json_with_defaults() {
        let options =
            SerializationOptions::from_json_slice(br#"{"useCamelCase": true}"#).unwrap();
        assert!(options.use_camel_case);
        assert!(options.ignore_null_values);
        assert!(!options.use_string_enums);

        let options = SerializationOptions::from_json_slice(b"{}").unwrap();
        assert_eq!(options, SerializationOptions::default());
    }

    #[test]
    fn rejects_malformed_config() {
        let err = SerializationOptions::from_json_slice(br#"{"useCamelCase": "yes"}"#).unwrap_err();
        assert!(err.is_decode());
    }
}
