// ABOUTME: Namespaced manifest API version parsing.
// ABOUTME: Splits `namespace/version` strings and checks them against the supported set.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '/';

/// API namespace accepted by this crate.
pub const API_NAME: &str = "itzcli";

/// API versions accepted within [`API_NAME`].
pub const SUPPORTED_API_VERSIONS: &[&str] = &["v1alpha1"];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid apiVersion format: {0}")]
pub struct ParseApiVersionError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion {
    pub namespace: String,
    pub version: String,
}

impl ApiVersion {
    pub fn is_supported(&self) -> bool {
        self.namespace == API_NAME && SUPPORTED_API_VERSIONS.contains(&self.version.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ParseApiVersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(SEPARATOR).collect();
        match parts.as_slice() {
            [namespace, version] => Ok(Self {
                namespace: (*namespace).to_string(),
                version: (*version).to_string(),
            }),
            _ => Err(ParseApiVersionError(value.to_string())),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, SEPARATOR, self.version)
    }
}
