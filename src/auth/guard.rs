use std::collections::BTreeSet;

use super::AuthError;

/// Set of permission names granted to a caller. Order is irrelevant and
/// duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(BTreeSet<String>);

impl Permissions {
    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Permissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Allow when `permission` is granted, otherwise `AuthError::Forbidden`
pub fn require(permission: &str, granted: &Permissions) -> Result<(), AuthError> {
    if granted.contains(permission) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(permission.to_string()))
    }
}
