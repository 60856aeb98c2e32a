//! Qualified names for packages and classes.
//!
//! Two identifiers are used throughout classref:
//!
//! - [`FqName`]: a dotted, fully-qualified name such as `com.example.Outer.Inner`.
//!   This is the identity key of every class reference.
//! - [`ClassId`]: the same name split into its package part (`com.example`) and
//!   its relative class path (`Outer.Inner`). The split is what lets a nested class
//!   find its lexical parents without walking a syntax tree.
//!
//! `ClassId` serializes as `package/Relative.Path`, the conventional spelling for
//! class identifiers in compiler metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// FqName
// ============================================================================

/// A fully-qualified dotted name. The empty name is the root package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FqName(String);

impl FqName {
    /// Create a name from its dotted spelling.
    pub fn new(name: impl Into<String>) -> Self {
        FqName(name.into())
    }

    /// The root (empty) name.
    pub fn root() -> Self {
        FqName(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name segments in order. The root name has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// The last segment, or the empty string for the root name.
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    /// The name with its last segment removed.
    pub fn parent(&self) -> FqName {
        match self.0.rfind('.') {
            Some(idx) => FqName(self.0[..idx].to_string()),
            None => FqName::root(),
        }
    }

    /// Append a single segment (or a dotted suffix).
    pub fn child(&self, name: &str) -> FqName {
        if self.is_root() {
            FqName(name.to_string())
        } else if name.is_empty() {
            self.clone()
        } else {
            FqName(format!("{}.{}", self.0, name))
        }
    }

    /// Append every segment of `other`.
    pub fn join(&self, other: &FqName) -> FqName {
        self.child(other.as_str())
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FqName {
    fn from(name: &str) -> Self {
        FqName::new(name)
    }
}

impl From<String> for FqName {
    fn from(name: String) -> Self {
        FqName(name)
    }
}

// ============================================================================
// ClassId
// ============================================================================

/// Package path plus nested class path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassId {
    package_fq_name: FqName,
    relative_class_name: FqName,
}

impl ClassId {
    pub fn new(package_fq_name: FqName, relative_class_name: FqName) -> Self {
        debug_assert!(
            !relative_class_name.is_root(),
            "ClassId requires a non-empty class name"
        );
        ClassId {
            package_fq_name,
            relative_class_name,
        }
    }

    /// Identifier of a top-level class in `package`.
    pub fn top_level(package: impl Into<FqName>, name: &str) -> Self {
        ClassId::new(package.into(), FqName::new(name))
    }

    /// Parse the `package/Outer.Inner` spelling. A missing slash means the
    /// class lives in the root package.
    pub fn parse(s: &str) -> Option<Self> {
        let (package, relative) = match s.split_once('/') {
            Some((package, relative)) => (package, relative),
            None => ("", s),
        };
        if relative.is_empty() || relative.split('.').any(str::is_empty) {
            return None;
        }
        Some(ClassId::new(FqName::new(package), FqName::new(relative)))
    }

    pub fn package_fq_name(&self) -> &FqName {
        &self.package_fq_name
    }

    pub fn relative_class_name(&self) -> &FqName {
        &self.relative_class_name
    }

    pub fn fq_name(&self) -> FqName {
        self.package_fq_name.join(&self.relative_class_name)
    }

    pub fn short_class_name(&self) -> &str {
        self.relative_class_name.short_name()
    }

    pub fn is_nested(&self) -> bool {
        self.relative_class_name.as_str().contains('.')
    }

    /// Identifier of the class that lexically contains this one.
    pub fn outer_class_id(&self) -> Option<ClassId> {
        if !self.is_nested() {
            return None;
        }
        Some(ClassId {
            package_fq_name: self.package_fq_name.clone(),
            relative_class_name: self.relative_class_name.parent(),
        })
    }

    /// Identifier of a class nested directly inside this one.
    pub fn nested(&self, name: &str) -> ClassId {
        ClassId {
            package_fq_name: self.package_fq_name.clone(),
            relative_class_name: self.relative_class_name.child(name),
        }
    }

    /// This class and every lexically enclosing class, outermost first.
    pub fn outer_chain_with_self(&self) -> Vec<ClassId> {
        let mut chain = vec![self.clone()];
        let mut current = self.outer_class_id();
        while let Some(outer) = current {
            current = outer.outer_class_id();
            chain.push(outer);
        }
        chain.reverse();
        chain
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package_fq_name, self.relative_class_name)
    }
}

impl TryFrom<String> for ClassId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClassId::parse(&value).ok_or_else(|| format!("invalid class id '{}'", value))
    }
}

impl From<ClassId> for String {
    fn from(value: ClassId) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
