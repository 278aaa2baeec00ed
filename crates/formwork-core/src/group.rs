#![forbid(unsafe_code)]

//! Array-group membership classification.
//!
//! Repeatable field groups (field arrays) are tracked by the store as a set
//! of group names. A field named `"rows.2.label"` belongs to the group
//! `"rows"`; the classifier answers that question without consulting the
//! value tree, by trimming the name at its first numeric segment.

use std::collections::HashSet;

use crate::field::FieldName;

/// Whether `name` belongs to one of the repeatable groups in `groups`.
///
/// The candidate group name is the prefix of `name` up to (not including)
/// the first `.N` segment where `N` is numeric and either terminates the
/// name or is followed by another segment. A name with no numeric segment
/// is matched against the set as-is.
#[must_use]
pub fn in_array_group(groups: &HashSet<FieldName>, name: &str) -> bool {
    groups.contains(array_prefix(name).unwrap_or(name))
}

fn array_prefix(name: &str) -> Option<&str> {
    let mut offset = 0usize;
    for segment in name.split('.') {
        let is_index =
            !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
        if offset > 0 && is_index {
            // offset points one past the dot preceding this segment
            return Some(&name[..offset - 1]);
        }
        offset += segment.len() + 1;
    }
    None
}
