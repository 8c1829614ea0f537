//! What the profile tree shows, and the edits it can request

use std::collections::HashSet;

use crate::i18n::Translate;
use crate::model::{ChildIndex, ModelError, NodeKind, Priority, ProfileCollection, ProfileData, ProfileNode};

/// One line of the tree panel
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
    pub depth: usize,
    /// Parent folder title, shown next to search hits
    pub parent_title: Option<String>,
    pub is_open: bool,
    pub enabled: Option<bool>,
    pub priority: Priority,
}

impl TreeRow {
    fn from_node(node: &ProfileNode, depth: usize, parent_title: Option<String>) -> Self {
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            kind: node.kind,
            depth,
            parent_title,
            is_open: node.is_open,
            enabled: node.data.as_ref().map(|data| data.enabled),
            priority: node.data.as_ref().map(|data| data.priority).unwrap_or_default(),
        }
    }
}

/// Rows in display order.
///
/// With a non-empty query every node whose title contains it (ignoring case) is
/// listed flat; otherwise root nodes are listed with the children of open folders
/// nested beneath them.
pub fn visible_rows(profiles: &ProfileCollection, index: &ChildIndex, query: &str) -> Vec<TreeRow> {
    let query = query.to_lowercase();
    if !query.is_empty() {
        return search_rows(profiles, &query);
    }

    let mut rows = Vec::new();
    let mut visited = HashSet::new();
    for root in index.roots() {
        push_subtree(profiles, index, *root, 0, &mut rows, &mut visited);
    }
    rows
}

fn search_rows(profiles: &ProfileCollection, query: &str) -> Vec<TreeRow> {
    let mut hits: Vec<&ProfileNode> = profiles
        .nodes()
        .iter()
        .filter(|node| node.title.to_lowercase().contains(query))
        .collect();
    hits.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

    hits.into_iter()
        .map(|node| {
            let parent_title = if node.kind == NodeKind::Profile && !node.is_root() {
                profiles.get(&node.parent).map(|parent| parent.title.clone())
            } else {
                None
            };
            TreeRow::from_node(node, 0, parent_title)
        })
        .collect()
}

fn push_subtree(
    profiles: &ProfileCollection,
    index: &ChildIndex,
    position: usize,
    depth: usize,
    rows: &mut Vec<TreeRow>,
    visited: &mut HashSet<usize>,
) {
    // Corrupt parent cycles would otherwise recurse forever
    if !visited.insert(position) {
        return;
    }
    let node = &profiles.nodes()[position];
    rows.push(TreeRow::from_node(node, depth, None));
    if node.is_folder() && node.is_open {
        for child in index.children(&node.id) {
            push_subtree(profiles, index, *child, depth + 1, rows, visited);
        }
    }
}

/// Whether dragging `node_id` onto `target_id` (empty = root) should be offered.
///
/// Anything the model would reject is refused, and so is dropping a node where it already is.
pub fn can_drop(profiles: &ProfileCollection, node_id: &str, target_id: &str) -> bool {
    let Some(node) = profiles.get(node_id) else {
        return false;
    };
    node.parent != target_id && profiles.can_move(node_id, target_id).is_ok()
}

pub fn drop_node(
    profiles: &ProfileCollection,
    node_id: &str,
    target_id: &str,
    t: &dyn Translate,
) -> Result<ProfileCollection, ModelError> {
    profiles.move_node(node_id, target_id, &t.t("copy"))
}

/// Transient tree panel state
#[derive(Debug, Clone, Default)]
pub struct TreeViewState {
    /// `Some` while the search field is shown
    pub search: Option<String>,
    /// Node currently being dragged
    pub dragging: Option<String>,
}

impl TreeViewState {
    pub fn toggle_search(&mut self) {
        self.search = match self.search {
            Some(_) => None,
            None => Some(String::new()),
        };
    }

    pub fn query(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Add { kind: NodeKind },
    Edit { id: String },
    Duplicate { source: String, new_id: String },
}

/// Add / edit / duplicate dialog for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDialog {
    pub mode: DialogMode,
    pub title: String,
    /// Parent the node lives (or will live) under
    pub parent: String,
}

impl NodeDialog {
    pub fn add(parent: &str, kind: NodeKind, t: &dyn Translate) -> Self {
        Self {
            mode: DialogMode::Add { kind },
            title: t.t(kind.key()),
            parent: parent.to_string(),
        }
    }

    pub fn edit(node: &ProfileNode) -> Self {
        Self {
            mode: DialogMode::Edit { id: node.id.clone() },
            title: node.title.clone(),
            parent: node.parent.clone(),
        }
    }

    pub fn duplicate(node: &ProfileNode, t: &dyn Translate) -> Self {
        Self {
            mode: DialogMode::Duplicate {
                source: node.id.clone(),
                new_id: ProfileCollection::fresh_id(),
            },
            title: format!("{} {}", node.title, t.t("copy")),
            parent: node.parent.clone(),
        }
    }

    pub fn kind(&self, profiles: &ProfileCollection) -> NodeKind {
        match &self.mode {
            DialogMode::Add { kind } => *kind,
            DialogMode::Edit { id } | DialogMode::Duplicate { source: id, .. } => profiles
                .get(id)
                .map(|node| node.kind)
                .unwrap_or(NodeKind::Profile),
        }
    }

    /// Dialog heading and submit button keys
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self.mode {
            DialogMode::Add { .. } => ("Add", "Create"),
            DialogMode::Edit { .. } => ("Edit", "Update"),
            DialogMode::Duplicate { .. } => ("Duplicate", "Copy"),
        }
    }

    fn own_id(&self) -> Option<&str> {
        match &self.mode {
            DialogMode::Edit { id } => Some(id),
            DialogMode::Add { .. } | DialogMode::Duplicate { .. } => None,
        }
    }

    pub fn title_taken(&self, profiles: &ProfileCollection) -> bool {
        !profiles.is_title_available(&self.parent, &self.title, self.own_id())
    }

    /// Submit is disabled for empty names, names used by a sibling, and unchanged names
    pub fn can_submit(&self, profiles: &ProfileCollection) -> bool {
        if self.title.is_empty() || self.title_taken(profiles) {
            return false;
        }
        match &self.mode {
            DialogMode::Edit { id } => profiles
                .get(id)
                .is_some_and(|node| node.title != self.title),
            DialogMode::Add { .. } | DialogMode::Duplicate { .. } => true,
        }
    }

    pub fn can_delete(&self) -> bool {
        matches!(self.mode, DialogMode::Edit { .. })
    }

    /// Apply the dialog; returns the new collection and the id of the affected node
    pub fn submit(
        &self,
        profiles: &ProfileCollection,
        defaults: &ProfileData,
    ) -> Result<(ProfileCollection, String), ModelError> {
        match &self.mode {
            DialogMode::Add { kind } => {
                profiles.add_child_with(&self.parent, *kind, &self.title, defaults.clone())
            }
            DialogMode::Edit { id } => Ok((profiles.rename(id, &self.title)?, id.clone())),
            DialogMode::Duplicate { source, new_id } => Ok((
                profiles.duplicate(source, new_id, &self.title)?,
                new_id.clone(),
            )),
        }
    }

    /// Open the parent folder so a node that was just added or copied is visible.
    /// Renames leave the tree as it was.
    pub fn reveal(&self, profiles: ProfileCollection) -> ProfileCollection {
        if self.parent.is_empty() || matches!(self.mode, DialogMode::Edit { .. }) {
            return profiles;
        }
        match profiles.toggle_open(&self.parent, true) {
            Ok(opened) => opened,
            Err(_) => profiles,
        }
    }

    /// Delete the edited node with everything beneath it
    pub fn delete(&self, profiles: &ProfileCollection) -> Result<ProfileCollection, ModelError> {
        match &self.mode {
            DialogMode::Edit { id } => profiles.delete_cascade(id),
            DialogMode::Add { .. } | DialogMode::Duplicate { .. } => Ok(profiles.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::StringTable;

    fn english() -> StringTable {
        StringTable::for_language("en").expect("en table")
    }

    fn profile(id: &str, title: &str, parent: &str) -> ProfileNode {
        ProfileNode::profile(id, title, parent, ProfileData::default())
    }

    fn sample() -> ProfileCollection {
        let mut closed = ProfileNode::folder("C", "Closed", "");
        closed.is_open = false;
        ProfileCollection::new(vec![
            ProfileNode::folder("F", "Heating", ""),
            ProfileNode::folder("G", "Upstairs", "F"),
            profile("p1", "Morning", "F"),
            profile("p2", "Bedroom morning", "G"),
            profile("p3", "Garage", ""),
            closed,
            profile("p4", "Hidden", "C"),
        ])
    }

    fn ids(rows: &[TreeRow]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn normal_mode_nests_open_folders_only() {
        let profiles = sample();
        let index = ChildIndex::build(&profiles);
        let rows = visible_rows(&profiles, &index, "");
        assert_eq!(ids(&rows), vec!["C", "p3", "F", "p1", "G", "p2"]);
        let depths: Vec<usize> = rows.iter().map(|row| row.depth).collect();
        assert_eq!(depths, vec![0, 0, 0, 1, 1, 2]);
    }

    #[test]
    fn search_flattens_and_names_parent() {
        let profiles = sample();
        let index = ChildIndex::build(&profiles);
        let rows = visible_rows(&profiles, &index, "MORNING");
        assert_eq!(ids(&rows), vec!["p2", "p1"]);
        assert!(rows.iter().all(|row| row.depth == 0));
        assert_eq!(rows[0].parent_title.as_deref(), Some("Upstairs"));
        assert_eq!(rows[1].parent_title.as_deref(), Some("Heating"));

        // Closed folders do not hide search hits
        let rows = visible_rows(&profiles, &index, "hid");
        assert_eq!(ids(&rows), vec!["p4"]);
    }

    #[test]
    fn search_lists_folders_without_suffix() {
        let profiles = sample();
        let index = ChildIndex::build(&profiles);
        let rows = visible_rows(&profiles, &index, "up");
        assert_eq!(ids(&rows), vec!["G"]);
        assert_eq!(rows[0].parent_title, None);
    }

    #[test]
    fn search_keeps_surrounding_spaces() {
        let profiles = sample();
        let index = ChildIndex::build(&profiles);
        assert_eq!(ids(&visible_rows(&profiles, &index, " morning")), vec!["p2"]);
        assert!(visible_rows(&profiles, &index, "garage ").is_empty());
    }

    #[test]
    fn drop_targets_follow_move_rules() {
        let profiles = sample();
        assert!(can_drop(&profiles, "p1", ""));
        assert!(can_drop(&profiles, "p3", "G"));
        assert!(!can_drop(&profiles, "p1", "F"), "already there");
        assert!(!can_drop(&profiles, "p3", ""), "root to root");
        assert!(!can_drop(&profiles, "F", "G"), "into own descendant");
        assert!(!can_drop(&profiles, "F", "F"), "onto itself");
        assert!(!can_drop(&profiles, "p3", "p1"), "profiles are no drop target");
        assert!(!can_drop(&profiles, "missing", ""));
    }

    #[test]
    fn accepted_drops_commit_through_move() {
        let profiles = sample();
        let t = english();
        let moved = drop_node(&profiles, "p2", "F", &t).expect("G -> F");
        assert_eq!(moved.get("p2").map(|n| n.parent.as_str()), Some("F"));
    }

    #[test]
    fn add_dialog_defaults_and_submit() {
        let profiles = sample();
        let t = english();
        let dialog = NodeDialog::add("F", NodeKind::Folder, &t);
        assert_eq!(dialog.title, "folder");
        assert!(dialog.can_submit(&profiles));
        assert!(!dialog.can_delete());

        let (updated, id) = dialog
            .submit(&profiles, &ProfileData::default())
            .expect("create");
        assert_eq!(updated.get(&id).map(|n| n.kind), Some(NodeKind::Folder));
    }

    #[test]
    fn edit_dialog_disables_taken_and_unchanged_names() {
        let profiles = sample();
        let node = profiles.get("p3").cloned().expect("p3");
        let mut dialog = NodeDialog::edit(&node);
        assert!(!dialog.can_submit(&profiles), "unchanged");

        dialog.title = "Heating".to_string();
        assert!(dialog.title_taken(&profiles));
        assert!(!dialog.can_submit(&profiles));

        dialog.title = String::new();
        assert!(!dialog.can_submit(&profiles));

        dialog.title = "Carport".to_string();
        assert!(dialog.can_submit(&profiles));
        let (updated, id) = dialog.submit(&profiles, &ProfileData::default()).expect("rename");
        assert_eq!(id, "p3");
        assert_eq!(updated.get("p3").map(|n| n.title.as_str()), Some("Carport"));
    }

    #[test]
    fn only_new_nodes_open_their_parent() {
        let t = english();
        let profiles = sample()
            .toggle_open("F", false)
            .expect("F exists");

        let node = profiles.get("p1").cloned().expect("p1");
        let mut rename = NodeDialog::edit(&node);
        rename.title = "Dawn".to_string();
        let (renamed, _) = rename.submit(&profiles, &ProfileData::default()).expect("rename");
        let renamed = rename.reveal(renamed);
        assert_eq!(renamed.get("F").map(|n| n.is_open), Some(false));

        let add = NodeDialog::add("F", NodeKind::Profile, &t);
        let (added, _) = add.submit(&profiles, &ProfileData::default()).expect("add");
        let added = add.reveal(added);
        assert_eq!(added.get("F").map(|n| n.is_open), Some(true));
    }

    #[test]
    fn duplicate_dialog_copies_next_to_source() {
        let profiles = sample();
        let t = english();
        let node = profiles.get("p1").cloned().expect("p1");
        let dialog = NodeDialog::duplicate(&node, &t);
        assert_eq!(dialog.title, "Morning copy");
        assert_eq!(dialog.kind(&profiles), NodeKind::Profile);

        let (updated, id) = dialog.submit(&profiles, &ProfileData::default()).expect("copy");
        assert_eq!(updated.get(&id).map(|n| n.parent.as_str()), Some("F"));
        assert_eq!(updated.len(), profiles.len() + 1);
    }

    #[test]
    fn delete_from_edit_dialog_cascades() {
        let profiles = sample();
        let node = profiles.get("F").cloned().expect("F");
        let dialog = NodeDialog::edit(&node);
        let updated = dialog.delete(&profiles).expect("delete");
        assert_eq!(ids(&visible_rows(&updated, &ChildIndex::build(&updated), "")), vec!["C", "p3"]);
    }

    #[test]
    fn search_toggle_resets_query() {
        let mut state = TreeViewState::default();
        state.toggle_search();
        assert_eq!(state.query(), "");
        state.search = Some("abc".to_string());
        state.toggle_search();
        assert_eq!(state.search, None);
    }
}
