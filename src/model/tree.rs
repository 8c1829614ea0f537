//! Profile tree: a flat list of folders and profiles linked by parent ids.
//!
//! Every operation borrows the current collection and returns a new one, so a
//! rejected edit leaves the caller's collection exactly as it was. The flat list
//! stays the source of truth; `ChildIndex` is derived from it once per commit.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ModelError;
use super::intervals::{clamp_all, default_value, interval_count, resample};
use super::types::{Domain, IntervalType, NodeKind, Priority, ProfileData, ProfileNode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileCollection {
    nodes: Vec<ProfileNode>,
}

impl ProfileCollection {
    pub fn new(nodes: Vec<ProfileNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[ProfileNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProfileNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn position(&self, id: &str) -> Result<usize, ModelError> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| ModelError::UnknownNode(id.to_string()))
    }

    /// An empty parent means root; anything else must name an existing folder
    fn check_parent(&self, parent_id: &str) -> Result<(), ModelError> {
        if parent_id.is_empty() {
            return Ok(());
        }
        match self.get(parent_id) {
            Some(node) if node.is_folder() => Ok(()),
            _ => Err(ModelError::InvalidParent(parent_id.to_string())),
        }
    }

    /// Whether `title` is free among the children of `parent_id`, ignoring `except`
    pub fn is_title_available(&self, parent_id: &str, title: &str, except: Option<&str>) -> bool {
        !self.nodes.iter().any(|node| {
            node.parent == parent_id && node.title == title && Some(node.id.as_str()) != except
        })
    }

    fn check_title(&self, parent_id: &str, title: &str, except: Option<&str>) -> Result<(), ModelError> {
        if title.is_empty() {
            return Err(ModelError::EmptyTitle);
        }
        if !self.is_title_available(parent_id, title, except) {
            return Err(ModelError::DuplicateSibling {
                title: title.to_string(),
            });
        }
        Ok(())
    }

    /// Add a node with default profile data. Returns the new collection and the node's id.
    pub fn add_child(
        &self,
        parent_id: &str,
        kind: NodeKind,
        title: &str,
    ) -> Result<(Self, String), ModelError> {
        self.add_child_with(parent_id, kind, title, ProfileData::default())
    }

    /// Like `add_child`, with caller-supplied data for new profiles (ignored for folders)
    pub fn add_child_with(
        &self,
        parent_id: &str,
        kind: NodeKind,
        title: &str,
        data: ProfileData,
    ) -> Result<(Self, String), ModelError> {
        self.check_parent(parent_id)?;
        self.check_title(parent_id, title, None)?;

        let id = Self::fresh_id();
        let node = match kind {
            NodeKind::Folder => ProfileNode::folder(id.clone(), title, parent_id),
            NodeKind::Profile => ProfileNode::profile(id.clone(), title, parent_id, data),
        };
        let mut updated = self.clone();
        updated.nodes.push(node);
        Ok((updated, id))
    }

    pub fn rename(&self, id: &str, new_title: &str) -> Result<Self, ModelError> {
        let index = self.position(id)?;
        let parent = self.nodes[index].parent.clone();
        self.check_title(&parent, new_title, Some(id))?;

        let mut updated = self.clone();
        updated.nodes[index].title = new_title.to_string();
        Ok(updated)
    }

    /// Copy a node (and its schedule data) next to the source. Children are not copied.
    pub fn duplicate(&self, source_id: &str, new_id: &str, new_title: &str) -> Result<Self, ModelError> {
        let index = self.position(source_id)?;
        if self.get(new_id).is_some() {
            return Err(ModelError::DuplicateId(new_id.to_string()));
        }
        let source = &self.nodes[index];
        self.check_title(&source.parent, new_title, None)?;

        let mut copy = source.clone();
        copy.id = new_id.to_string();
        copy.title = new_title.to_string();

        let mut updated = self.clone();
        updated.nodes.push(copy);
        Ok(updated)
    }

    /// `id` and every node whose parent chain reaches it
    pub fn subtree_ids(&self, id: &str) -> HashSet<String> {
        let mut doomed = HashSet::from([id.to_string()]);
        loop {
            let before = doomed.len();
            for node in &self.nodes {
                if !node.parent.is_empty() && doomed.contains(&node.parent) {
                    doomed.insert(node.id.clone());
                }
            }
            if doomed.len() == before {
                return doomed;
            }
        }
    }

    pub fn delete_cascade(&self, id: &str) -> Result<Self, ModelError> {
        self.position(id)?;
        let doomed = self.subtree_ids(id);
        let nodes = self
            .nodes
            .iter()
            .filter(|node| !doomed.contains(&node.id))
            .cloned()
            .collect();
        Ok(Self { nodes })
    }

    /// Walk parent pointers upward from `start` looking for `target`.
    ///
    /// Bounded by the collection size; a chain that never ends is treated as a hit.
    fn chain_reaches(&self, start: &str, target: &str) -> bool {
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            if current.is_empty() {
                return false;
            }
            if current == target {
                return true;
            }
            match self.get(current) {
                Some(node) => current = &node.parent,
                None => return false,
            }
        }
        true
    }

    /// True when `ancestor` appears on the parent chain above `id`
    #[cfg(test)]
    fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        self.get(id)
            .map(|node| self.chain_reaches(&node.parent, ancestor))
            .unwrap_or(false)
    }

    /// Check a reparent without applying it
    pub fn can_move(&self, node_id: &str, new_parent_id: &str) -> Result<(), ModelError> {
        self.position(node_id)?;
        if new_parent_id == node_id || self.chain_reaches(new_parent_id, node_id) {
            return Err(ModelError::CycleDetected {
                node: node_id.to_string(),
                parent: new_parent_id.to_string(),
            });
        }
        self.check_parent(new_parent_id)
    }

    /// Reparent a node. A title that collides with the new siblings gets
    /// ` (<copy_label>)` appended until it is unique.
    pub fn move_node(&self, node_id: &str, new_parent_id: &str, copy_label: &str) -> Result<Self, ModelError> {
        self.can_move(node_id, new_parent_id)?;
        let index = self.position(node_id)?;
        if self.nodes[index].parent == new_parent_id {
            return Ok(self.clone());
        }

        let mut title = self.nodes[index].title.clone();
        while !self.is_title_available(new_parent_id, &title, Some(node_id)) {
            title = format!("{} ({})", title, copy_label);
        }

        let mut updated = self.clone();
        let node = &mut updated.nodes[index];
        node.parent = new_parent_id.to_string();
        node.title = title;
        Ok(updated)
    }

    pub fn toggle_open(&self, id: &str, is_open: bool) -> Result<Self, ModelError> {
        let index = self.position(id)?;
        let mut updated = self.clone();
        updated.nodes[index].is_open = is_open;
        Ok(updated)
    }

    /// Flip the enabled flag of a profile
    pub fn set_enabled(&self, id: &str) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            data.enabled = !data.enabled;
            Ok(())
        })
    }

    pub fn open_all(&self) -> Self {
        self.with_folders_open(true)
    }

    pub fn close_all(&self) -> Self {
        self.with_folders_open(false)
    }

    fn with_folders_open(&self, is_open: bool) -> Self {
        let mut updated = self.clone();
        for node in updated.nodes.iter_mut().filter(|node| node.is_folder()) {
            node.is_open = is_open;
        }
        updated
    }

    pub fn any_folder_open(&self) -> bool {
        self.nodes.iter().any(|node| node.is_folder() && node.is_open)
    }

    /// Apply an edit to a profile's schedule data on a copy of the collection
    pub fn update_profile(
        &self,
        id: &str,
        edit: impl FnOnce(&mut ProfileData) -> Result<(), ModelError>,
    ) -> Result<Self, ModelError> {
        let index = self.position(id)?;
        let mut updated = self.clone();
        let data = updated.nodes[index]
            .data
            .as_mut()
            .filter(|_| self.nodes[index].kind == NodeKind::Profile)
            .ok_or_else(|| ModelError::NotAProfile(id.to_string()))?;
        edit(data)?;
        Ok(updated)
    }

    /// Replace a profile's intervals. The length must match its slot duration.
    pub fn set_intervals(&self, id: &str, intervals: &[f64], domain: Domain) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            let expected = interval_count(data.interval_duration_minutes)?;
            if intervals.len() != expected {
                return Err(ModelError::IntervalCountMismatch {
                    expected,
                    actual: intervals.len(),
                });
            }
            data.intervals = clamp_all(intervals, domain);
            Ok(())
        })
    }

    /// Switch the interval type, pulling existing values into the new domain
    pub fn set_interval_type(
        &self,
        id: &str,
        interval_type: IntervalType,
        domain: Domain,
    ) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            data.interval_type = interval_type;
            data.intervals = clamp_all(&data.intervals, domain);
            Ok(())
        })
    }

    /// Change the slot length and resample the existing values onto the new grid
    pub fn set_interval_duration(&self, id: &str, minutes: u32, domain: Domain) -> Result<Self, ModelError> {
        let count = interval_count(minutes)?;
        self.update_profile(id, |data| {
            let fill = default_value(data.interval_type, domain);
            data.intervals = resample(&data.intervals, count, fill);
            data.interval_duration_minutes = minutes;
            Ok(())
        })
    }

    pub fn set_priority(&self, id: &str, priority: Priority) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            data.priority = priority;
            Ok(())
        })
    }

    pub fn toggle_day(&self, id: &str, day: u8) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            data.days_of_week = data.days_of_week.toggle(day);
            Ok(())
        })
    }

    pub fn toggle_holiday(&self, id: &str) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            data.holiday = !data.holiday;
            Ok(())
        })
    }

    /// Replace the member device ids. Blank and repeated ids are dropped.
    pub fn set_members(&self, id: &str, members: &[String]) -> Result<Self, ModelError> {
        self.update_profile(id, |data| {
            let mut seen = HashSet::new();
            data.members = members
                .iter()
                .map(|member| member.trim())
                .filter(|member| !member.is_empty() && seen.insert(member.to_string()))
                .map(str::to_string)
                .collect();
            Ok(())
        })
    }

    /// Every invariant violation found in the collection, e.g. after loading from disk
    pub fn validate(&self) -> Vec<ModelError> {
        let mut problems = Vec::new();
        let mut ids = HashSet::new();
        let mut titles: HashSet<(&str, &str)> = HashSet::new();

        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                problems.push(ModelError::DuplicateId(node.id.clone()));
            }
            if !titles.insert((node.parent.as_str(), node.title.as_str())) {
                problems.push(ModelError::DuplicateSibling {
                    title: node.title.clone(),
                });
            }
            if let Err(err) = self.check_parent(&node.parent) {
                problems.push(err);
            } else if self.chain_reaches(&node.parent, &node.id) {
                problems.push(ModelError::CycleDetected {
                    node: node.id.clone(),
                    parent: node.parent.clone(),
                });
            }
            if node.kind == NodeKind::Profile {
                match &node.data {
                    None => problems.push(ModelError::NotAProfile(node.id.clone())),
                    Some(data) => match interval_count(data.interval_duration_minutes) {
                        Err(err) => problems.push(err),
                        Ok(expected) if expected != data.intervals.len() => {
                            problems.push(ModelError::IntervalCountMismatch {
                                expected,
                                actual: data.intervals.len(),
                            });
                        }
                        Ok(_) => {}
                    },
                }
            }
        }
        problems
    }
}

/// Children of every parent id (empty string for root), sorted by title.
///
/// Holds indices into the collection it was built from; rebuild after each commit.
#[derive(Debug, Clone, Default)]
pub struct ChildIndex {
    children: HashMap<String, Vec<usize>>,
}

impl ChildIndex {
    pub fn build(profiles: &ProfileCollection) -> Self {
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, node) in profiles.nodes().iter().enumerate() {
            children.entry(node.parent.clone()).or_default().push(index);
        }
        let nodes = profiles.nodes();
        for list in children.values_mut() {
            list.sort_by(|a, b| {
                nodes[*a]
                    .title
                    .cmp(&nodes[*b].title)
                    .then_with(|| nodes[*a].id.cmp(&nodes[*b].id))
            });
        }
        Self { children }
    }

    pub fn children(&self, parent_id: &str) -> &[usize] {
        self.children
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[usize] {
        self.children("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, title: &str, parent: &str) -> ProfileNode {
        ProfileNode::profile(id, title, parent, ProfileData::default())
    }

    /// root
    /// ├── F (folder)
    /// │   ├── G (folder)
    /// │   │   └── p2
    /// │   └── p1
    /// └── p3
    fn sample() -> ProfileCollection {
        ProfileCollection::new(vec![
            ProfileNode::folder("F", "Heating", ""),
            ProfileNode::folder("G", "Upstairs", "F"),
            profile("p1", "Morning", "F"),
            profile("p2", "Bedroom", "G"),
            profile("p3", "Garage", ""),
        ])
    }

    fn assert_acyclic(profiles: &ProfileCollection) {
        for node in profiles.nodes() {
            assert!(
                !profiles.is_ancestor(&node.id, &node.id),
                "node {} is its own ancestor",
                node.id
            );
        }
    }

    fn assert_unique_siblings(profiles: &ProfileCollection) {
        let mut seen = HashSet::new();
        for node in profiles.nodes() {
            assert!(
                seen.insert((node.parent.clone(), node.title.clone())),
                "duplicate title {} under '{}'",
                node.title,
                node.parent
            );
        }
    }

    #[test]
    fn add_child_creates_profile_with_defaults() {
        let profiles = sample();
        let (updated, id) = profiles
            .add_child("G", NodeKind::Profile, "Evening")
            .expect("G is a folder");
        let node = updated.get(&id).expect("new node");
        assert_eq!(node.parent, "G");
        assert_eq!(node.data.as_ref().map(|d| d.intervals.len()), Some(24));
        assert_eq!(profiles.len(), 5);
        assert_eq!(updated.len(), 6);
    }

    #[test]
    fn add_child_assigns_distinct_ids() {
        let (once, first) = sample().add_child("", NodeKind::Folder, "A").expect("root");
        let (_, second) = once.add_child("", NodeKind::Folder, "B").expect("root");
        assert_ne!(first, second);
        assert!(once.get(&first).map(|n| n.is_open).unwrap_or(false));
    }

    #[test]
    fn add_child_rejects_profile_or_missing_parent() {
        let profiles = sample();
        assert_eq!(
            profiles.add_child("p1", NodeKind::Profile, "x").map(|_| ()),
            Err(ModelError::InvalidParent("p1".to_string()))
        );
        assert_eq!(
            profiles.add_child("nope", NodeKind::Folder, "x").map(|_| ()),
            Err(ModelError::InvalidParent("nope".to_string()))
        );
    }

    #[test]
    fn add_child_rejects_duplicate_or_empty_title() {
        let profiles = sample();
        assert!(matches!(
            profiles.add_child("F", NodeKind::Profile, "Morning"),
            Err(ModelError::DuplicateSibling { .. })
        ));
        assert!(matches!(
            profiles.add_child("F", NodeKind::Profile, ""),
            Err(ModelError::EmptyTitle)
        ));
    }

    #[test]
    fn rename_checks_siblings_with_exact_match() {
        let profiles = ProfileCollection::new(vec![
            ProfileNode::folder("F", "Folder", ""),
            profile("a", "Morning", "F"),
            profile("b", "Evening", "F"),
        ]);
        assert_eq!(
            profiles.rename("b", "Morning"),
            Err(ModelError::DuplicateSibling {
                title: "Morning".to_string()
            })
        );
        let renamed = profiles.rename("b", "Morning ").expect("trailing space differs");
        assert_eq!(renamed.get("b").map(|n| n.title.as_str()), Some("Morning "));
        // Renaming to its own title is fine
        assert!(profiles.rename("a", "Morning").is_ok());
    }

    #[test]
    fn rename_unknown_node_fails() {
        assert_eq!(
            sample().rename("zzz", "x"),
            Err(ModelError::UnknownNode("zzz".to_string()))
        );
    }

    #[test]
    fn duplicate_deep_copies_data() {
        let profiles = sample()
            .set_priority("p1", Priority::High)
            .expect("p1 is a profile");
        let copied = profiles
            .duplicate("p1", "p1-copy", "Morning copy")
            .expect("free title");
        let copy = copied.get("p1-copy").expect("copy");
        assert_eq!(copy.parent, "F");
        assert_eq!(copy.data.as_ref().map(|d| d.priority), Some(Priority::High));

        let edited = copied.toggle_day("p1-copy", 0).expect("toggle");
        assert_eq!(edited.get("p1"), profiles.get("p1"));
    }

    #[test]
    fn duplicate_rejects_taken_title_and_id() {
        let profiles = sample();
        assert!(matches!(
            profiles.duplicate("p1", "new", "Morning"),
            Err(ModelError::DuplicateSibling { .. })
        ));
        assert_eq!(
            profiles.duplicate("p1", "p2", "Other"),
            Err(ModelError::DuplicateId("p2".to_string()))
        );
    }

    #[test]
    fn delete_cascade_removes_exactly_the_subtree() {
        let profiles = sample();
        let updated = profiles.delete_cascade("F").expect("F exists");
        let remaining: Vec<_> = updated.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(remaining, vec!["p3"]);

        let updated = profiles.delete_cascade("G").expect("G exists");
        let remaining: Vec<_> = updated.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(remaining, vec!["F", "p1", "p3"]);
    }

    #[test]
    fn delete_cascade_terminates_on_corrupt_cycle() {
        let profiles = ProfileCollection::new(vec![
            ProfileNode::folder("a", "A", "b"),
            ProfileNode::folder("b", "B", "a"),
        ]);
        let updated = profiles.delete_cascade("a").expect("a exists");
        assert!(updated.is_empty());
    }

    #[test]
    fn move_rejects_self_and_descendants() {
        let profiles = sample();
        assert!(matches!(profiles.can_move("F", "F"), Err(ModelError::CycleDetected { .. })));
        assert!(matches!(profiles.can_move("F", "G"), Err(ModelError::CycleDetected { .. })));
        assert!(matches!(
            profiles.move_node("F", "G", "copy"),
            Err(ModelError::CycleDetected { .. })
        ));
    }

    #[test]
    fn move_accepts_every_non_descendant_folder() {
        let profiles = sample();
        let folders: Vec<&str> = vec!["", "F", "G"];
        for node in profiles.nodes() {
            for target in &folders {
                let is_cycle =
                    *target == node.id || (!target.is_empty() && profiles.is_ancestor(&node.id, target));
                let result = profiles.can_move(&node.id, target);
                assert_eq!(result.is_err(), is_cycle, "move {} -> '{}'", node.id, target);
            }
        }
    }

    #[test]
    fn move_under_profile_is_invalid_parent() {
        assert_eq!(
            sample().can_move("p3", "p1"),
            Err(ModelError::InvalidParent("p1".to_string()))
        );
    }

    #[test]
    fn move_to_root_then_nest_folder_under_former_child() {
        let profiles = ProfileCollection::new(vec![
            ProfileNode::folder("F", "F", ""),
            ProfileNode::folder("P", "P", "F"),
        ]);
        let step1 = profiles.move_node("P", "", "copy").expect("P to root");
        assert_eq!(step1.get("P").map(|n| n.parent.as_str()), Some(""));

        let step2 = step1.move_node("F", "P", "copy").expect("no cycle any more");
        assert_eq!(step2.get("F").map(|n| n.parent.as_str()), Some("P"));

        let again = step2.move_node("F", "P", "copy").expect("repeat is a no-op");
        assert_eq!(again, step2);
    }

    #[test]
    fn root_to_root_move_is_a_no_op() {
        let profiles = sample();
        let updated = profiles.move_node("p3", "", "copy").expect("legal no-op");
        assert_eq!(updated, profiles);
    }

    #[test]
    fn move_suffixes_colliding_title() {
        let profiles = ProfileCollection::new(vec![
            ProfileNode::folder("F", "F", ""),
            profile("a", "Morning", ""),
            profile("b", "Morning (copy)", ""),
            profile("c", "Morning", "F"),
        ]);
        let updated = profiles.move_node("c", "", "copy").expect("move");
        assert_eq!(
            updated.get("c").map(|n| n.title.as_str()),
            Some("Morning (copy) (copy)")
        );
        assert_unique_siblings(&updated);
    }

    #[test]
    fn operation_sequences_keep_invariants() {
        let mut profiles = sample();
        let (next, x) = profiles.add_child("G", NodeKind::Folder, "Deep").expect("add");
        profiles = next;
        profiles = profiles.move_node("p3", &x, "copy").expect("p3 into Deep");
        assert!(profiles.move_node("F", &x, "copy").is_err());
        profiles = profiles.move_node(&x, "", "copy").expect("Deep to root");
        profiles = profiles.move_node("F", &x, "copy").expect("F under Deep");
        profiles = profiles.duplicate("p1", "p1b", "Morning 2").expect("dup");
        profiles = profiles.rename("p1b", "Evening").expect("rename");
        profiles = profiles.move_node("p1b", "", "copy").expect("to root");
        profiles = profiles.delete_cascade("G").expect("delete");

        assert_acyclic(&profiles);
        assert_unique_siblings(&profiles);
        assert!(profiles.validate().is_empty(), "{:?}", profiles.validate());
    }

    #[test]
    fn toggle_open_and_open_close_all() {
        let profiles = sample().close_all();
        assert!(!profiles.any_folder_open());
        let opened = profiles.toggle_open("G", true).expect("G exists");
        assert!(opened.get("G").map(|n| n.is_open).unwrap_or(false));
        assert!(!opened.get("F").map(|n| n.is_open).unwrap_or(true));
        assert!(opened.open_all().nodes().iter().filter(|n| n.is_folder()).all(|n| n.is_open));
    }

    #[test]
    fn set_enabled_flips_profile_and_rejects_folder() {
        let profiles = sample();
        let flipped = profiles.set_enabled("p1").expect("profile");
        assert_eq!(flipped.get("p1").and_then(|n| n.data.as_ref()).map(|d| d.enabled), Some(false));
        assert_eq!(
            profiles.set_enabled("F"),
            Err(ModelError::NotAProfile("F".to_string()))
        );
    }

    #[test]
    fn set_intervals_requires_matching_length() {
        let domain = Domain::new(16.0, 30.0);
        let profiles = sample();
        assert_eq!(
            profiles.set_intervals("p1", &[20.0; 3], domain),
            Err(ModelError::IntervalCountMismatch {
                expected: 24,
                actual: 3
            })
        );
        let updated = profiles.set_intervals("p1", &[40.0; 24], domain).expect("24 slots");
        let data = updated.get("p1").and_then(|n| n.data.as_ref()).expect("data");
        assert!(data.intervals.iter().all(|v| *v == 30.0));
    }

    #[test]
    fn duration_change_resamples_intervals() {
        let domain = Domain::new(16.0, 30.0);
        let profiles = sample();
        let updated = profiles.set_interval_duration("p1", 30, domain).expect("30 divides");
        let data = updated.get("p1").and_then(|n| n.data.as_ref()).expect("data");
        assert_eq!(data.intervals.len(), 48);
        assert_eq!(data.interval_duration_minutes, 30);
        assert_eq!(
            profiles.set_interval_duration("p1", 50, domain),
            Err(ModelError::InvalidDuration(50))
        );
    }

    #[test]
    fn type_change_clamps_into_new_domain() {
        let profiles = sample();
        let updated = profiles
            .set_interval_type("p1", IntervalType::OnOff, Domain::new(0.0, 1.0))
            .expect("profile");
        let data = updated.get("p1").and_then(|n| n.data.as_ref()).expect("data");
        assert_eq!(data.interval_type, IntervalType::OnOff);
        assert!(data.intervals.iter().all(|v| *v == 1.0));
    }

    #[test]
    fn members_are_trimmed_and_deduplicated() {
        let members = vec![
            " dev.1 ".to_string(),
            "dev.2".to_string(),
            "dev.1".to_string(),
            String::new(),
        ];
        let updated = sample().set_members("p1", &members).expect("profile");
        let data = updated.get("p1").and_then(|n| n.data.as_ref()).expect("data");
        assert_eq!(data.members, vec!["dev.1".to_string(), "dev.2".to_string()]);
    }

    #[test]
    fn validate_reports_corrupt_collections() {
        let mut bad = profile("p", "Short", "");
        if let Some(data) = bad.data.as_mut() {
            data.intervals.truncate(3);
        }
        let profiles = ProfileCollection::new(vec![
            ProfileNode::folder("a", "A", "b"),
            ProfileNode::folder("b", "B", "a"),
            profile("c", "C", "missing"),
            bad,
        ]);
        let problems = profiles.validate();
        assert!(problems.iter().any(|p| matches!(p, ModelError::CycleDetected { .. })));
        assert!(problems.contains(&ModelError::InvalidParent("missing".to_string())));
        assert!(problems.contains(&ModelError::IntervalCountMismatch {
            expected: 24,
            actual: 3
        }));
    }

    #[test]
    fn child_index_sorts_case_sensitively() {
        let profiles = ProfileCollection::new(vec![
            profile("1", "beta", ""),
            profile("2", "Alpha", ""),
            profile("3", "alpha", ""),
            ProfileNode::folder("4", "Zed", ""),
        ]);
        let index = ChildIndex::build(&profiles);
        let titles: Vec<&str> = index
            .roots()
            .iter()
            .map(|i| profiles.nodes()[*i].title.as_str())
            .collect();
        assert_eq!(titles, vec!["Alpha", "Zed", "alpha", "beta"]);
        assert!(index.children("4").is_empty());
    }
}
