use serde::{Deserialize, Serialize};

/// Error for a string that names no variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form of each variant is its `as_str` value.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Severity {
    Mild => "Mild",
    Moderate => "Moderate",
    Severe => "Severe",
});

str_enum!(RiskLevel {
    Low => "Low",
    Medium => "Medium",
    High => "High",
    Critical => "Critical",
});

impl Default for Severity {
    fn default() -> Self {
        Self::Mild
    }
}
