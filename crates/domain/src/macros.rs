//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Window names, roles, HTTP methods and window states all travel as
//! lowercase strings (cache keys, routes, activity log entries). This macro
//! keeps the two conversions in one place and makes parsing
//! case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use appraisal_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ReviewStage {
//!     Draft,
//!     Submitted,
//! }
//!
//! impl_domain_enum_conversions!(ReviewStage {
//!     Draft => "draft",
//!     Submitted => "submitted",
//! });
//! ```

/// Implements `Display` and `FromStr` for a fieldless enum.
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of variants to their lowercase string form
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStage {
        Draft,
        Submitted,
        Approved,
    }

    impl_domain_enum_conversions!(TestStage {
        Draft => "draft",
        Submitted => "submitted",
        Approved => "approved",
    });

    #[test]
    fn display_is_lowercase() {
        assert_eq!(TestStage::Draft.to_string(), "draft");
        assert_eq!(TestStage::Approved.to_string(), "approved");
    }

    #[test]
    fn parsing_ignores_case() {
        assert_eq!(TestStage::from_str("SUBMITTED").unwrap(), TestStage::Submitted);
        assert_eq!(TestStage::from_str("Draft").unwrap(), TestStage::Draft);
    }

    #[test]
    fn unknown_value_reports_enum_name() {
        let err = TestStage::from_str("archived").unwrap_err();
        assert!(err.contains("TestStage"));
        assert!(err.contains("archived"));
    }
}
