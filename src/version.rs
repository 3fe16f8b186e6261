//! Version specifier handling
//!
//! Maps the raw specifiers found in `dependencies` maps to something the
//! registry can look up directly. This is deliberately not a semver range
//! resolver: only a few literal shapes are recognised and everything else
//! becomes `latest`.

use std::fmt;

/// Registry tag used when a specifier cannot be mapped to a concrete version
pub const LATEST: &str = "latest";

/// Registry tag passed through unchanged
pub const NEXT: &str = "next";

const ALIAS_PREFIX: &str = "npm:";

const PRERELEASE_TAGS: [&str; 3] = ["alpha", "beta", "rc"];

/// A registry lookup target: a package name and the specifier it was
/// requested with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub name: String,
    pub specifier: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, specifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specifier: specifier.into(),
        }
    }

    /// Resolve an `npm:<name>@<specifier>` alias to the package it points at.
    ///
    /// The alias name is discarded; lookups always use the real package.
    /// Non-aliased refs are returned unchanged.
    pub fn unalias(self) -> Self {
        let Some(target) = self.specifier.strip_prefix(ALIAS_PREFIX) else {
            return self;
        };

        // A scoped target starts with '@', so the separator is the next one
        let split_at = if let Some(scoped) = target.strip_prefix('@') {
            scoped.find('@').map(|i| i + 1)
        } else {
            target.find('@')
        };

        match split_at {
            Some(i) => Self::new(&target[..i], &target[i + 1..]),
            None => Self::new(target, LATEST),
        }
    }

    /// The version to request from the registry for this ref
    pub fn lookup_version(&self) -> String {
        normalize(&self.specifier)
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.specifier)
    }
}

/// Normalize a version specifier to a registry lookup key.
///
/// Rules, first match wins:
/// 1. `MAJOR.MINOR.PATCH` with an optional `-alpha.N`, `-beta.N` or `-rc.N`
///    suffix is returned as is
/// 2. the same shape behind a single `^` or `~` is returned without the prefix
/// 3. `next` is returned as is
/// 4. anything else becomes `latest`
pub fn normalize(specifier: &str) -> String {
    if is_exact_version(specifier) {
        return specifier.to_string();
    }

    if let Some(rest) = specifier
        .strip_prefix('^')
        .or_else(|| specifier.strip_prefix('~'))
        && is_exact_version(rest)
    {
        return rest.to_string();
    }

    if specifier == NEXT {
        return NEXT.to_string();
    }

    LATEST.to_string()
}

/// Check for `MAJOR.MINOR.PATCH(-(alpha|beta|rc).N)?`
fn is_exact_version(s: &str) -> bool {
    let (core, pre) = match s.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (s, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 || !parts.iter().all(|p| is_numeric(p)) {
        return false;
    }

    match pre {
        None => true,
        Some(pre) => match pre.split_once('.') {
            Some((tag, n)) => PRERELEASE_TAGS.contains(&tag) && is_numeric(n),
            None => false,
        },
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
