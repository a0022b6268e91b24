// src/client/selection.rs

use std::collections::BTreeSet;

/// Linhas marcadas nos checkboxes da tabela.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<K: Ord + Clone> {
    ids: BTreeSet<K>,
}

impl<K: Ord + Clone> Default for SelectionSet<K> {
    fn default() -> Self {
        Self { ids: BTreeSet::new() }
    }
}

impl<K: Ord + Clone> SelectionSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: K) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Checkbox do cabeçalho: se todas as linhas visíveis já estão marcadas,
    /// desmarca essas; senão marca todas as visíveis.
    pub fn toggle_all(&mut self, visible: &[K]) {
        if self.all_selected(visible) {
            for id in visible {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(visible.iter().cloned());
        }
    }

    pub fn all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    /// Tira uma linha da seleção (ex.: depois de removida). Devolve se estava marcada.
    pub fn remove(&mut self, id: &K) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> Vec<K> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_selection() {
        let mut sel = SelectionSet::new();
        sel.toggle(1);
        sel.toggle(2);
        let before = sel.clone();

        sel.toggle(3);
        sel.toggle(3);
        assert_eq!(sel, before);

        sel.toggle(1);
        assert!(!sel.contains(&1));
        assert_eq!(sel.ids(), vec![2]);
    }

    #[test]
    fn toggle_all_twice_clears() {
        let mut sel = SelectionSet::new();
        let visible = [1, 2, 3];

        sel.toggle_all(&visible);
        assert!(sel.all_selected(&visible));

        sel.toggle_all(&visible);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_all_with_partial_selection_selects_everything() {
        let mut sel = SelectionSet::new();
        sel.toggle(2);
        sel.toggle_all(&[1, 2, 3]);
        assert_eq!(sel.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn toggle_all_keeps_rows_from_other_pages() {
        let mut sel = SelectionSet::new();
        sel.toggle(9);
        sel.toggle_all(&[1, 2]);
        sel.toggle_all(&[1, 2]);
        assert_eq!(sel.ids(), vec![9]);
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        let mut sel: SelectionSet<u32> = SelectionSet::new();
        assert!(!sel.all_selected(&[]));
        sel.toggle_all(&[]);
        assert!(sel.is_empty());
    }
}
