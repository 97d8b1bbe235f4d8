//! Cascade removal.

use crate::placement::{find_unsupported, SceneView};
use crate::scene::BrickId;

/// Removes unsupported bricks from `view` until a full pass removes nothing.
///
/// Returns the removed ids, earlier passes first.
#[must_use]
pub fn cascade_unsupported(view: &mut SceneView) -> Vec<BrickId> {
    let mut removed = Vec::new();
    loop {
        let unsupported = find_unsupported(view);
        if unsupported.is_empty() {
            return removed;
        }
        view.remove_all(&unsupported);
        removed.extend(unsupported);
    }
}
