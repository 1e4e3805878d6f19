use crate::error::{NupakError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A package version: dotted numeric segments with an optional pre-release
/// label (`1.2.3`, `1.2.3.4`, `1.2.0-beta`). Ordering compares segments
/// numerically with missing segments as zero; a release orders after its
/// pre-releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    segments: Vec<u64>,
    pre_release: Option<String>,
}

// Equality must agree with the ordering: `1.0` and `1.0.0` are the same
// version, so it cannot be derived from the segment vectors.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Version {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || NupakError::InvalidVersion {
            version: input.to_string(),
        };

        let (numeric, pre_release) = match input.split_once('-') {
            Some((numeric, pre)) if !pre.is_empty() => (numeric, Some(pre.to_string())),
            Some(_) => return Err(invalid()),
            None => (input, None),
        };

        if numeric.is_empty() {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        for part in numeric.split('.') {
            segments.push(part.parse::<u64>().map_err(|_| invalid())?);
        }

        Ok(Version {
            segments,
            pre_release,
        })
    }

    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            match self.segment(i).cmp(&other.segment(i)) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }

        // Same numeric segments: a release sorts after its pre-releases.
        match (&self.pre_release, &other.pre_release) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeric: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", numeric.join("."))?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = NupakError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = NupakError;

    fn try_from(value: String) -> Result<Self> {
        Version::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// The (name, version) pair identifying one installed package. Immutable once
/// constructed from an archive's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    name: String,
    version: Version,
}

impl PackageIdentity {
    pub fn new<S: Into<String>>(name: S, version: Version) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NupakError::InvalidIdentity { name });
        }
        Ok(PackageIdentity { name, version })
    }

    pub fn parse(name: &str, version: &str) -> Result<Self> {
        Self::new(name, Version::parse(version)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The directory-safe full name, `{name}.{version}` with any embedded
    /// whitespace in the name normalized to `.`.
    pub fn full_name(&self) -> String {
        let full = format!("{}.{}", self.name, self.version);
        full.split_whitespace().collect::<Vec<_>>().join(".")
    }

    /// Parse an install directory name back into an identity. Package names
    /// may themselves contain dots, so the version is the shortest valid
    /// dotted suffix: split at each dot from the left and take the first
    /// remainder that parses as a version with a non-empty name before it.
    pub fn from_dir_name(dir_name: &str) -> Option<Self> {
        let mut search = 0;
        while let Some(pos) = dir_name[search..].find('.') {
            let split = search + pos;
            let (name, rest) = (&dir_name[..split], &dir_name[split + 1..]);
            let plausible_name =
                !name.is_empty() && name.chars().any(|c| !c.is_ascii_digit() && c != '.');
            if plausible_name && rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                if let Ok(version) = Version::parse(rest) {
                    return PackageIdentity::new(name, version).ok();
                }
            }
            search = split + 1;
        }
        None
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
