use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::component::{Attributes, ComponentKind, Instance, Region};

use super::Address;

/// Where a node hangs in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Top level of the page.
    Root,
    /// Child of another live node.
    Parent(Address),
    /// Member of a singleton region.
    Region(Region),
}

/// Errors raised when the identity invariants would be broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The address, or the wrapper address it would own, is already live.
    #[error("address '{address}' is already live")]
    Collision {
        /// Address that collided.
        address: Address,
    },
    /// The requested parent does not exist.
    #[error("parent '{address}' does not exist")]
    MissingParent {
        /// Parent address that was not found.
        address: Address,
    },
}

/// One live component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: ComponentKind,
    placement: Placement,
    children: Vec<Address>,
    slot: Attributes,
    instance: Instance,
    has_wrapper: bool,
}

impl Node {
    /// Unattached node of `kind` wrapping `instance`.
    #[must_use]
    pub fn new(kind: ComponentKind, instance: Instance) -> Self {
        Self {
            kind,
            placement: Placement::Root,
            children: Vec::new(),
            slot: Attributes::new(),
            instance,
            has_wrapper: false,
        }
    }

    /// Attaches parent-owned slot attributes.
    #[must_use]
    pub fn with_slot(mut self, slot: Attributes) -> Self {
        self.slot = slot;
        self
    }

    /// Marks the node as owning a `-root` wrapper address.
    #[must_use]
    pub fn with_wrapper(mut self, has_wrapper: bool) -> Self {
        self.has_wrapper = has_wrapper;
        self
    }

    /// Component type.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Parent address, when the node is nested.
    #[must_use]
    pub fn parent(&self) -> Option<&Address> {
        match &self.placement {
            Placement::Parent(parent) => Some(parent),
            Placement::Root | Placement::Region(_) => None,
        }
    }

    /// Attachment point.
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Child addresses in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Address] {
        &self.children
    }

    /// Attributes owned by the parent for this child.
    #[must_use]
    pub const fn slot(&self) -> &Attributes {
        &self.slot
    }

    /// Mutable parent-owned attributes.
    pub fn slot_mut(&mut self) -> &mut Attributes {
        &mut self.slot
    }

    /// Component state.
    #[must_use]
    pub const fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Mutable component state.
    pub fn instance_mut(&mut self) -> &mut Instance {
        &mut self.instance
    }

    /// Whether the node owns a wrapper alias.
    #[must_use]
    pub const fn has_wrapper(&self) -> bool {
        self.has_wrapper
    }
}

/// Address-to-instance map plus the structure the instances form.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: HashMap<Address, Node>,
    aliases: HashMap<Address, Address>,
    roots: Vec<Address>,
    tabs: Vec<Address>,
    toasts: Vec<Address>,
    local_sequence: u64,
}

impl Tree {
    /// Empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no instance is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `address` names a live instance or one of its wrappers.
    #[must_use]
    pub fn exists(&self, address: &str) -> bool {
        self.canonical(address).is_some()
    }

    /// Content address of the instance `address` refers to.
    #[must_use]
    pub fn canonical(&self, address: &str) -> Option<&Address> {
        self.nodes
            .get_key_value(address)
            .map(|(key, _)| key)
            .or_else(|| self.aliases.get(address))
    }

    /// Node named by `address`, resolving wrapper aliases.
    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<&Node> {
        let canonical = self.canonical(address)?;
        self.nodes.get(canonical)
    }

    /// Mutable node named by `address`, resolving wrapper aliases.
    pub fn lookup_mut(&mut self, address: &str) -> Option<&mut Node> {
        let canonical = self.canonical(address)?.clone();
        self.nodes.get_mut(&canonical)
    }

    /// Registers `node` at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Collision`] when the address or its wrapper is
    /// already live, leaving the existing instance untouched, and
    /// [`IdentityError::MissingParent`] when the parent is not live.
    pub fn insert(
        &mut self,
        address: Address,
        mut node: Node,
        placement: Placement,
    ) -> Result<(), IdentityError> {
        if self.exists(address.as_str()) {
            return Err(IdentityError::Collision { address });
        }
        let wrapper = node.has_wrapper.then(|| address.wrapper());
        if let Some(wrapper) = &wrapper
            && self.exists(wrapper.as_str())
        {
            return Err(IdentityError::Collision {
                address: wrapper.clone(),
            });
        }

        let placement = match placement {
            Placement::Parent(parent) => {
                let Some(canonical) = self.canonical(parent.as_str()).cloned() else {
                    return Err(IdentityError::MissingParent { address: parent });
                };
                if let Some(parent_node) = self.nodes.get_mut(&canonical) {
                    parent_node.children.push(address.clone());
                }
                Placement::Parent(canonical)
            }
            Placement::Root => {
                self.roots.push(address.clone());
                Placement::Root
            }
            Placement::Region(region) => {
                self.region_mut(region).push(address.clone());
                Placement::Region(region)
            }
        };

        node.placement = placement;
        if let Some(wrapper) = wrapper {
            self.aliases.insert(wrapper, address.clone());
        }
        self.nodes.insert(address, node);
        Ok(())
    }

    /// Removes the instance `address` refers to together with every
    /// descendant and their wrapper aliases and timers.
    ///
    /// Returns the removed content addresses, the targeted instance first, or
    /// `None` when nothing was live at `address`.
    pub fn remove(&mut self, address: &str) -> Option<Vec<Address>> {
        let target = self.canonical(address)?.clone();
        if let Some(node) = self.nodes.get(&target) {
            let placement = node.placement.clone();
            self.detach(&target, &placement);
        }

        let mut removed = Vec::new();
        let mut pending = vec![target];
        while let Some(next) = pending.pop() {
            let Some(node) = self.nodes.remove(&next) else {
                continue;
            };
            if node.has_wrapper {
                self.aliases.remove(next.wrapper().as_str());
            }
            pending.extend(node.children.into_iter().rev());
            removed.push(next);
        }
        Some(removed)
    }

    /// Fresh address for an instance the server does not name, such as a
    /// notification.
    pub fn next_local_address(&mut self, kind: ComponentKind) -> Address {
        loop {
            self.local_sequence += 1;
            let candidate = Address::new(format!("{kind}#{}", self.local_sequence));
            if !self.exists(candidate.as_str()) {
                return candidate;
            }
        }
    }

    /// Top-level addresses in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[Address] {
        &self.roots
    }

    /// Members of `region` in insertion order.
    #[must_use]
    pub fn region(&self, region: Region) -> &[Address] {
        match region {
            Region::Tabs => &self.tabs,
            Region::Toasts => &self.toasts,
        }
    }

    /// Earliest pending deadline among component timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.nodes
            .values()
            .filter_map(|node| node.instance.timer.map(|timer| timer.deadline()))
            .min()
    }

    /// Addresses whose timers need attention at `now`, in address order.
    #[must_use]
    pub fn due_timers(&self, now: Instant) -> Vec<Address> {
        let mut due = self
            .nodes
            .iter()
            .filter(|(_, node)| {
                node.instance
                    .timer
                    .is_some_and(|timer| timer.deadline() <= now)
            })
            .map(|(address, _)| address.clone())
            .collect::<Vec<_>>();
        due.sort();
        due
    }

    /// Serializable view of the tree, excluding timers.
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot {
        let collect = |addresses: &[Address]| {
            addresses
                .iter()
                .filter_map(|address| self.snapshot_node(address))
                .collect()
        };
        TreeSnapshot {
            roots: collect(&self.roots),
            tabs: collect(&self.tabs),
            toasts: collect(&self.toasts),
        }
    }

    fn snapshot_node(&self, address: &Address) -> Option<NodeSnapshot> {
        let node = self.nodes.get(address)?;
        Some(NodeSnapshot {
            address: address.clone(),
            kind: node.kind,
            content: node.instance.content.clone(),
            wrapper: node.instance.wrapper.clone(),
            slot: node.slot.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.snapshot_node(child))
                .collect(),
        })
    }

    fn detach(&mut self, address: &Address, placement: &Placement) {
        match placement {
            Placement::Parent(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|child| child != address);
                }
            }
            Placement::Root => self.roots.retain(|root| root != address),
            Placement::Region(region) => self.region_mut(*region).retain(|member| member != address),
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut Vec<Address> {
        match region {
            Region::Tabs => &mut self.tabs,
            Region::Toasts => &mut self.toasts,
        }
    }
}

/// Serializable view of a [`Tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    /// Top-level nodes.
    pub roots: Vec<NodeSnapshot>,
    /// Tab region members.
    pub tabs: Vec<NodeSnapshot>,
    /// Toast region members.
    pub toasts: Vec<NodeSnapshot>,
}

/// Serializable view of one node and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    /// Content address.
    pub address: Address,
    /// Component type.
    pub kind: ComponentKind,
    /// Content attributes.
    pub content: Attributes,
    /// Wrapper attributes, for types that own one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<Attributes>,
    /// Parent-owned slot attributes.
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub slot: Attributes,
    /// Descendants in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::component::ComponentTimer;

    fn node(kind: ComponentKind) -> Node {
        Node::new(kind, Instance::default())
    }

    #[fixture]
    fn nested() -> Tree {
        let mut tree = Tree::new();
        tree.insert(Address::new("c1"), node(ComponentKind::Container), Placement::Root)
            .expect("root");
        tree.insert(
            Address::new("c1-bar"),
            node(ComponentKind::ProgressBar).with_wrapper(true),
            Placement::Parent(Address::new("c1")),
        )
        .expect("progress bar");
        tree.insert(
            Address::new("c1-inner"),
            node(ComponentKind::Container),
            Placement::Parent(Address::new("c1")),
        )
        .expect("inner");
        tree.insert(
            Address::new("c1-inner-b"),
            node(ComponentKind::Button),
            Placement::Parent(Address::new("c1-inner")),
        )
        .expect("button");
        tree
    }

    #[rstest]
    fn wrapper_aliases_resolve_to_owner(nested: Tree) {
        let owner = nested.lookup("c1-bar-root").expect("alias resolves");
        assert_eq!(owner.kind(), ComponentKind::ProgressBar);
        assert_eq!(
            nested.canonical("c1-bar-root").map(Address::as_str),
            Some("c1-bar")
        );
    }

    #[rstest]
    fn collisions_are_rejected_without_touching_the_live_instance(mut nested: Tree) {
        let error = nested
            .insert(Address::new("c1-inner"), node(ComponentKind::Alert), Placement::Root)
            .expect_err("collision");
        assert_eq!(
            error,
            IdentityError::Collision {
                address: Address::new("c1-inner")
            }
        );
        let live = nested.lookup("c1-inner").expect("still live");
        assert_eq!(live.kind(), ComponentKind::Container);
        assert_eq!(live.children().len(), 1);
    }

    #[rstest]
    fn wrapper_collisions_are_rejected(mut nested: Tree) {
        let error = nested
            .insert(Address::new("c1-bar-root"), node(ComponentKind::Alert), Placement::Root)
            .expect_err("wrapper collision");
        assert!(matches!(error, IdentityError::Collision { .. }));
    }

    #[test]
    fn missing_parents_are_rejected() {
        let mut tree = Tree::new();
        let error = tree
            .insert(
                Address::new("p-x"),
                node(ComponentKind::Button),
                Placement::Parent(Address::new("p")),
            )
            .expect_err("missing parent");
        assert!(matches!(error, IdentityError::MissingParent { .. }));
        assert!(tree.is_empty());
    }

    #[rstest]
    fn removal_cascades_to_descendants_and_aliases(mut nested: Tree) {
        let removed = nested.remove("c1").expect("removed");
        assert_eq!(removed.first().map(Address::as_str), Some("c1"));
        assert_eq!(removed.len(), 4);
        assert!(nested.is_empty());
        assert!(!nested.exists("c1-bar-root"));
        assert!(nested.roots().is_empty());
    }

    #[rstest]
    fn removal_through_wrapper_detaches_from_parent(mut nested: Tree) {
        let removed = nested.remove("c1-bar-root").expect("removed");
        assert_eq!(removed, vec![Address::new("c1-bar")]);
        let parent = nested.lookup("c1").expect("parent survives");
        assert_eq!(parent.children(), &[Address::new("c1-inner")]);
    }

    #[rstest]
    fn removing_twice_is_a_no_op(mut nested: Tree) {
        assert!(nested.remove("c1-inner").is_some());
        assert!(nested.remove("c1-inner").is_none());
        assert_eq!(nested.len(), 2);
    }

    #[test]
    fn local_addresses_are_sequential() {
        let mut tree = Tree::new();
        assert_eq!(tree.next_local_address(ComponentKind::Toast).as_str(), "toast#1");
        assert_eq!(tree.next_local_address(ComponentKind::Toast).as_str(), "toast#2");
    }

    #[test]
    fn timers_die_with_their_instance() {
        let start = Instant::now();
        let mut tree = Tree::new();
        let instance = Instance {
            timer: Some(ComponentTimer::new(start, Duration::from_secs(1), None)),
            ..Instance::default()
        };
        tree.insert(
            Address::new("toast#1"),
            Node::new(ComponentKind::Toast, instance),
            Placement::Region(Region::Toasts),
        )
        .expect("toast");
        assert_eq!(tree.next_deadline(), Some(start + Duration::from_secs(1)));

        tree.remove("toast#1");
        assert_eq!(tree.next_deadline(), None);
        assert!(tree.region(Region::Toasts).is_empty());
    }
}
