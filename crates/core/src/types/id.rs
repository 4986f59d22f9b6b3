//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Bureau keys are
//! opaque strings assigned by the backend, so the wrappers hold `String`.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use vivaha_core::define_id;
/// define_id!(CustomerId);
/// define_id!(EmployeeId);
///
/// let customer = CustomerId::new("VB-1041");
/// let employee = EmployeeId::new("VB-1041");
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = employee;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Default,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper, returning the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the ID is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

// Define standard entity IDs
define_id!(CustomerId);
define_id!(EmployeeId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_accessors() {
        let id = CustomerId::new("VB-7");
        assert_eq!(id.as_str(), "VB-7");
        assert_eq!(id.to_string(), "VB-7");
        assert!(!id.is_empty());
        assert!(CustomerId::new("").is_empty());
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: EmployeeId = serde_json::from_str("\"emp-12\"").expect("deserialize");
        assert_eq!(id, EmployeeId::new("emp-12"));
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"emp-12\"");
    }
}
