use std::collections::HashMap;

use crate::types::Reference;

/// Merges references so that every `entry_uid` appears once.
///
/// The record closest to the root wins, whichever direction it came from. A
/// later record replaces the kept one only if its distance is strictly
/// smaller, so ties keep the first sighting. The output follows the order in
/// which each uid was first seen.
pub fn dedupe_references<I>(references: I) -> Vec<Reference>
where
    I: IntoIterator<Item = Reference>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<Reference> = Vec::new();

    for reference in references {
        match positions.get(&reference.entry_uid) {
            Some(&idx) => {
                if reference.distance() < kept[idx].distance() {
                    kept[idx] = reference;
                }
            }
            None => {
                positions.insert(reference.entry_uid.clone(), kept.len());
                kept.push(reference);
            }
        }
    }

    kept
}
