//! Environment/runtime helpers
//!
//! Resolves the deployment environment from the `ENV` variable. Local, test
//! and dev environments are "debug" environments: human readable logs and
//! relaxed defaults. Anything else is treated as a production deployment.

use std::fmt;

/// Variable consulted by [`AppEnv::from_env`].
pub const ENV_VAR: &str = "ENV";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Test,
    Dev,
    /// Any other name, kept verbatim (`prod`, `staging`, ...).
    Production(String),
}

impl AppEnv {
    /// Parse an environment name; blank input falls back to `dev`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "test" => Self::Test,
            "" | "dev" => Self::Dev,
            other => Self::Production(other.to_string()),
        }
    }

    /// Read `ENV`, defaulting to `dev` when unset.
    pub fn from_env() -> Self {
        std::env::var(ENV_VAR).map(|v| Self::parse(&v)).unwrap_or(Self::Dev)
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Self::Local | Self::Test | Self::Dev)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Test => "test",
            Self::Dev => "dev",
            Self::Production(name) => name,
        }
    }
}

impl Default for AppEnv {
    fn default() -> Self { Self::Dev }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
