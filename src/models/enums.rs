use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Outcome of comparing a value against its reference range.
    TestStatus {
        Normal => "normal",
        High => "high",
        Low => "low",
        Unknown => "unknown",
    }
);

str_enum!(
    /// How far an abnormal value sits from the boundary it violates.
    Severity {
        None => "none",
        Mild => "mild",
        Moderate => "moderate",
        Severe => "severe",
    }
);

str_enum!(RangeKind {
    Between => "between",
    LessThan => "less_than",
    GreaterThan => "greater_than",
    None => "none",
});

str_enum!(RiskLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(Direction {
    Lower => "lower",
    Higher => "higher",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    NotSpecified => "not_specified",
});

str_enum!(TrendDirection {
    Up => "up",
    Down => "down",
    Unchanged => "unchanged",
});

impl TestStatus {
    /// High and Low are abnormal; Unknown is not.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Self::High | Self::Low)
    }
}

impl Severity {
    /// Adverb used in patient-facing findings.
    pub fn word(&self) -> &'static str {
        match self {
            Self::Mild => "slightly",
            Self::Moderate => "notably",
            Self::Severe => "significantly",
            Self::None => "",
        }
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::NotSpecified
    }
}
