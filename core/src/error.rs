use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NotPositive { field: &'static str, value: f32 },
    NotFinite { field: &'static str },
    InvertedRange { min_field: &'static str, max_field: &'static str },
    ZeroCount { field: &'static str },
    MultiplierOutOfRange { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be > 0, got {value}")
            }
            Self::NotFinite { field } => write!(f, "{field} must be a finite number"),
            Self::InvertedRange {
                min_field,
                max_field,
            } => write!(f, "{min_field} must not exceed {max_field}"),
            Self::ZeroCount { field } => write!(f, "{field} must be at least 1"),
            Self::MultiplierOutOfRange { field, value } => {
                write!(f, "{field} must be in (0, 10], got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq)]
pub enum CoreError {
    Config(ConfigError),
    InvalidMassRange { min: f32, max: f32 },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::InvalidMassRange { min, max } => {
                write!(f, "invalid asteroid mass range: [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::InvalidMassRange { .. } => None,
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
