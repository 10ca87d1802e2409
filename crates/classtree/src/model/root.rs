//! Root class resolution

use tracing::debug;

use super::GraphIndex;
use crate::core::{ClassDef, ModelError};

/// Find the unique class flagged `isRoot`
///
/// No root is [`ModelError::RootNotFound`]. More than one is
/// [`ModelError::MultipleRoots`], naming the first two in declaration order.
pub fn resolve_root(index: &GraphIndex) -> Result<&ClassDef, ModelError> {
    let mut roots = index.classes().iter().filter(|c| c.is_root);

    let root = roots.next().ok_or(ModelError::RootNotFound)?;
    if let Some(second) = roots.next() {
        return Err(ModelError::MultipleRoots {
            first: root.name.clone(),
            second: second.name.clone(),
        });
    }

    debug!(root = %root.name, "Resolved root class");
    Ok(root)
}
