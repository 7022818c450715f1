//! The keyzone list of a fusion patch.

use log::debug;

use crate::error::{CelError, Result};
use crate::tree::{Node, Tree, Value, ValueKind};

use super::Keyzone;

/// Label given to a freshly duplicated keyzone.
pub const NEW_ZONE_LABEL: &str = "New Zone";

/// Mutable view of a `keymap` tree. Each child node holds one keyzone tree.
pub struct Keymap<'a> {
    zones: &'a mut Tree,
}

impl<'a> Keymap<'a> {
    pub fn new(zones: &'a mut Tree) -> Self {
        Self { zones }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn tree(&self) -> &Tree {
        &*self.zones
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.zones.len() {
            Ok(())
        } else {
            Err(CelError::IndexOutOfRange {
                what: "keyzone",
                index,
                len: self.zones.len(),
            })
        }
    }

    /// The keyzone tree at `index`.
    pub fn zone_tree_mut(&mut self, index: usize) -> Result<&mut Tree> {
        self.check_index(index)?;
        match self.zones.node_at_mut(index) {
            Some(Node {
                value: Value::Tree(zone),
                ..
            }) => Ok(zone),
            Some(Node { key, value }) => Err(CelError::TypeMismatch {
                key: key.clone(),
                expected: ValueKind::Tree,
                found: value.kind(),
            }),
            None => Err(CelError::EmptyKeymap),
        }
    }

    pub fn zone(&mut self, index: usize) -> Result<Keyzone<'_>> {
        Ok(Keyzone::new(self.zone_tree_mut(index)?))
    }

    /// Zone labels in order; zones without a label read as empty.
    pub fn labels(&self) -> Vec<String> {
        self.zones
            .iter()
            .map(|n| {
                n.value
                    .as_tree()
                    .and_then(|z| z.find_child("zone_label"))
                    .and_then(|l| l.value.as_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Duplicate the selected keyzone at the end and return the new selection.
    ///
    /// The copy owns its own subtree; editing it never touches the source.
    pub fn add_zone(&mut self, selected: usize) -> Result<usize> {
        if self.zones.is_empty() {
            return Err(CelError::EmptyKeymap);
        }
        self.check_index(selected)?;
        let source = self.zones.nodes()[selected].clone();
        self.zones.push(source);
        let index = self.zones.len() - 1;
        self.zone(index)?.set_label(NEW_ZONE_LABEL);
        debug!("Duplicated keyzone {selected} as {index}");
        Ok(index)
    }

    /// Remove the selected keyzone and return the selection to use afterwards.
    ///
    /// Refused with [`CelError::LastKeyzone`] when only one zone is left.
    pub fn remove_zone(&mut self, selected: usize) -> Result<usize> {
        if self.zones.len() <= 1 {
            return Err(CelError::LastKeyzone);
        }
        self.check_index(selected)?;
        self.zones.remove_at(selected);
        debug!("Removed keyzone {selected}");
        Ok(selected.min(self.zones.len() - 1))
    }

    /// Keep only the first `len` zones.
    pub fn truncate(&mut self, len: usize) {
        self.zones.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyzone::{KeymapPreset, NoteField};

    fn keymap_tree(count: usize) -> Tree {
        let mut zones = Tree::new();
        for i in 0..count {
            let mut zone = Tree::new();
            *zone.get_string("zone_label") = format!("Keyzone {i}");
            *zone.get_float("volume") = i as f32;
            zones.push(Node::new("zone", zone));
        }
        zones
    }

    #[test]
    fn test_add_zone_duplicates_selected() {
        let mut tree = keymap_tree(2);
        let mut map = Keymap::new(&mut tree);
        let index = map.add_zone(1).unwrap();
        assert_eq!(index, 2);
        assert_eq!(map.labels(), vec!["Keyzone 0", "Keyzone 1", NEW_ZONE_LABEL]);
        assert_eq!(map.zone(2).unwrap().volume(), 1.0);
    }

    #[test]
    fn test_duplicate_does_not_alias() {
        let mut tree = keymap_tree(1);
        let mut map = Keymap::new(&mut tree);
        let index = map.add_zone(0).unwrap();
        map.zone(index).unwrap().set_volume(-12.0);
        map.zone(index).unwrap().set_note(NoteField::Min, 30, false);
        assert_eq!(map.zone(0).unwrap().volume(), 0.0);
        assert_eq!(map.zone(0).unwrap().note(NoteField::Min), 0);
        assert_eq!(map.zone(index).unwrap().preset(), KeymapPreset::Custom);
    }

    #[test]
    fn test_remove_last_zone_refused() {
        let mut tree = keymap_tree(1);
        let before = tree.clone();
        let mut map = Keymap::new(&mut tree);
        assert!(matches!(map.remove_zone(0), Err(CelError::LastKeyzone)));
        assert_eq!(map.len(), 1);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_remove_moves_selection_back() {
        let mut tree = keymap_tree(3);
        let mut map = Keymap::new(&mut tree);
        assert_eq!(map.remove_zone(2).unwrap(), 1);
        assert_eq!(map.remove_zone(0).unwrap(), 0);
        assert_eq!(map.labels(), vec!["Keyzone 1"]);
    }

    #[test]
    fn test_out_of_range() {
        let mut tree = keymap_tree(2);
        let mut map = Keymap::new(&mut tree);
        assert!(matches!(
            map.add_zone(5),
            Err(CelError::IndexOutOfRange { index: 5, len: 2, .. })
        ));
        let mut empty = Tree::new();
        assert!(matches!(
            Keymap::new(&mut empty).add_zone(0),
            Err(CelError::EmptyKeymap)
        ));
    }
}
