//! Canonical visibility model.
//!
//! Both representations are mapped onto the four levels of [`Visibility`]:
//!
//! | Source | Public | Internal | Protected | Private |
//! |--------|--------|----------|-----------|---------|
//! | **Syntax** | `public` or no modifier | `internal` | `protected` | `private` |
//! | **Symbol** | `Public` | `Internal` | `Protected` | `Private` |
//!
//! Anything else (conflicting syntax modifiers, compiler-internal symbol
//! levels such as `Local` or `InvisibleFake`) has no canonical counterpart and
//! is reported back to the caller unmapped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolVisibility;
use crate::syntax::Modifier;

/// Canonical visibility level.
///
/// ```
/// use classref_core::visibility::Visibility;
///
/// let vis = Visibility::Internal;
/// assert_eq!(serde_json::to_string(&vis).unwrap(), "\"internal\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }

    /// Map syntax modifiers. No visibility modifier means `Public`.
    ///
    /// Returns the offending modifiers when more than one visibility modifier
    /// is present.
    pub fn from_modifiers(modifiers: &[Modifier]) -> Result<Visibility, Vec<Modifier>> {
        let declared: Vec<Modifier> = modifiers
            .iter()
            .copied()
            .filter(|m| m.is_visibility())
            .collect();
        match declared.as_slice() {
            [] | [Modifier::Public] => Ok(Visibility::Public),
            [Modifier::Internal] => Ok(Visibility::Internal),
            [Modifier::Protected] => Ok(Visibility::Protected),
            [Modifier::Private] => Ok(Visibility::Private),
            _ => Err(declared),
        }
    }
}

impl TryFrom<SymbolVisibility> for Visibility {
    type Error = SymbolVisibility;

    fn try_from(value: SymbolVisibility) -> Result<Self, Self::Error> {
        match value {
            SymbolVisibility::Public => Ok(Visibility::Public),
            SymbolVisibility::Internal => Ok(Visibility::Internal),
            SymbolVisibility::Protected => Ok(Visibility::Protected),
            SymbolVisibility::Private => Ok(Visibility::Private),
            SymbolVisibility::PrivateToThis
            | SymbolVisibility::Local
            | SymbolVisibility::Inherited
            | SymbolVisibility::InvisibleFake
            | SymbolVisibility::Unknown => Err(value),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
