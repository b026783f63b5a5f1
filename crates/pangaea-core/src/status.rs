use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Access level a dataset is published with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoginStatus {
    /// Publicly available without login.
    Unrestricted,
    /// Requires an authenticated session.
    LoginRequired,
    /// Access restricted by the data owner.
    AccessConstraints,
    /// Any status token this crate does not know about.
    Other(String),
}

impl LoginStatus {
    /// Returns the canonical token used by the PANGAEA metadata.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unrestricted => "unrestricted",
            Self::LoginRequired => "login required",
            Self::AccessConstraints => "access constraints",
            Self::Other(token) => token,
        }
    }

    /// Only unrestricted datasets may leave the system as exports.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

/// A dataset without a recorded status is treated as restricted.
impl Default for LoginStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "unrestricted" => Self::Unrestricted,
            "login required" => Self::LoginRequired,
            "access constraints" => Self::AccessConstraints,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Serialize for LoginStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LoginStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(token.parse().unwrap_or_else(|never| match never {}))
    }
}
