use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

/// Base URL the ANTLR project publishes its complete tool archives under.
const DOWNLOAD_BASE: &str = "https://www.antlr.org/download";

/// A pinned ANTLR tool version, `MAJOR.MINOR` or `MAJOR.MINOR.PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ToolVersion {
    major: u32,
    minor: u32,
    patch: Option<u32>,
}

impl TryFrom<String> for ToolVersion {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for ToolVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Default for ToolVersion {
    fn default() -> Self {
        Self::new(4, 8, None)
    }
}

impl ToolVersion {
    pub fn new(major: u32, minor: u32, patch: Option<u32>) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// File name of the complete tool archive, e.g. `antlr-4.8-complete.jar`.
    pub fn archive_name(&self) -> String {
        format!("antlr-{}-complete.jar", self)
    }

    /// The upstream download URL for this version's complete archive.
    pub fn download_url(&self) -> String {
        format!("{}/{}", DOWNLOAD_BASE, self.archive_name())
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

impl FromStr for ToolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(format!("invalid version '{}', expected 'X.Y' or 'X.Y.Z'", s));
        }
        let patch = match parts.get(2) {
            Some(p) => Some(p.parse().map_err(|_| "invalid patch")?),
            None => None,
        };
        Ok(Self {
            major: parts[0].parse().map_err(|_| "invalid major")?,
            minor: parts[1].parse().map_err(|_| "invalid minor")?,
            patch,
        })
    }
}
