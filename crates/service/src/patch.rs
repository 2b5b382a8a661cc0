//! Partial-update overlay shared by every entity service.
//!
//! A patch record carries one `Option` per mergeable field: `Some` overwrites
//! the stored value, `None` leaves it untouched. Identity and timestamp
//! fields are never part of a patch record. Clearing a field to NULL through
//! a patch is intentionally not expressible.

/// A patch record that can be overlaid onto its target entity.
pub trait Patch {
    type Target;

    /// Overlay this patch onto `target`, field by field.
    fn apply_to(self, target: &mut Self::Target);
}

/// Merge `patch` into `target`.
///
/// Purely structural; validation of the patch values is the caller's job
/// before merging. Applying the same patch twice yields the same result.
pub fn merge<P: Patch>(target: &mut P::Target, patch: P) {
    patch.apply_to(target);
}
