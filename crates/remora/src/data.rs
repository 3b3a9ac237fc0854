//! Out-of-band side-data attached to a layout graph.
//!
//! Algorithms exchange per-element hints (affected edges, bus ids, placement descriptors) through
//! typed maps stored under well-known keys in [`GraphLabel::data`](crate::GraphLabel). Maps are
//! replaced wholesale, never mutated in place, so a [`DataScope`] can put back whatever occupied
//! a key before it was installed.

use crate::bus::BusId;
use crate::graphlib::{EdgeId, NodeId};
use crate::model::{LabelId, LayoutGraph};
use crate::placement::PlacementDescriptor;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

pub type DataMap<K, V> = FxHashMap<K, V>;

type Slot = Arc<dyn Any + Send + Sync>;

/// Edges an algorithm should treat as affected (e.g. candidates for special handling).
pub const AFFECTED_EDGES: DataKey<EdgeId, bool> = DataKey::new("remora.affected-edges");
/// Nodes the user selected; isolation keeps edges touching them.
pub const SELECTED_NODES: DataKey<NodeId, bool> = DataKey::new("remora.selected-nodes");
/// Edges a router should (re)route.
pub const ROUTE_EDGES: DataKey<EdgeId, bool> = DataKey::new("remora.route-edges");
/// Labels a label placer should (re)place.
pub const AFFECTED_LABELS: DataKey<LabelId, bool> = DataKey::new("remora.affected-labels");
/// Bus membership of edges, produced by bus detection.
pub const BUS_IDS: DataKey<EdgeId, BusId> = DataKey::new("remora.bus-ids");
/// Placement constraints for individual edge labels.
pub const EDGE_LABEL_PLACEMENT: DataKey<LabelId, PlacementDescriptor> =
    DataKey::new("remora.edge-label-placement");

/// Typed name of a side-data map from `K` to `V`.
pub struct DataKey<K, V> {
    name: &'static str,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> DataKey<K, V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<K, V> Clone for DataKey<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for DataKey<K, V> {}

impl<K, V> PartialEq for DataKey<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<K, V> Eq for DataKey<K, V> {}

impl<K, V> fmt::Debug for DataKey<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataKey").field(&self.name).finish()
    }
}

#[derive(Clone, Default)]
pub struct DataRegistry {
    entries: FxHashMap<&'static str, Slot>,
}

impl fmt::Debug for DataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        f.debug_struct("DataRegistry").field("keys", &keys).finish()
    }
}

impl DataRegistry {
    pub fn contains<K, V>(&self, key: DataKey<K, V>) -> bool {
        self.entries.contains_key(key.name)
    }

    /// The map stored under `key`, if one of the matching type is present.
    pub fn get<K, V>(&self, key: DataKey<K, V>) -> Option<&DataMap<K, V>>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.entries.get(key.name)?.downcast_ref::<DataMap<K, V>>()
    }

    pub fn value<K, V>(&self, key: DataKey<K, V>, elem: &K) -> Option<&V>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.get(key)?.get(elem)
    }

    /// Whether `elem` maps to `true` under a boolean key.
    pub fn is_marked<K>(&self, key: DataKey<K, bool>, elem: &K) -> bool
    where
        K: Eq + Hash + Send + Sync + 'static,
    {
        self.value(key, elem).copied().unwrap_or(false)
    }

    /// Stores `map` under `key`, returning whatever was there before.
    pub fn set<K, V>(&mut self, key: DataKey<K, V>, map: DataMap<K, V>) -> Option<Slot>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.entries.insert(key.name, Arc::new(map))
    }

    pub fn remove<K, V>(&mut self, key: DataKey<K, V>) -> Option<Slot> {
        self.entries.remove(key.name)
    }

    fn restore(&mut self, name: &'static str, prior: Option<Slot>) {
        match prior {
            Some(slot) => {
                self.entries.insert(name, slot);
            }
            None => {
                self.entries.remove(name);
            }
        }
    }
}

/// Installs side-data for the duration of a borrow of the graph.
///
/// On drop every key installed through the scope gets its previous occupant back (or is removed
/// when it had none), in reverse installation order. This also runs when the algorithm executed
/// inside the scope returns an error or panics.
pub struct DataScope<'g> {
    graph: &'g mut LayoutGraph,
    saved: Vec<(&'static str, Option<Slot>)>,
}

impl<'g> DataScope<'g> {
    pub fn new(graph: &'g mut LayoutGraph) -> Self {
        Self {
            graph,
            saved: Vec::new(),
        }
    }

    pub fn install<K, V>(&mut self, key: DataKey<K, V>, map: DataMap<K, V>) -> &mut Self
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let prior = self.graph.graph_mut().data.set(key, map);
        self.saved.push((key.name, prior));
        self
    }
}

impl Deref for DataScope<'_> {
    type Target = LayoutGraph;

    fn deref(&self) -> &Self::Target {
        &*self.graph
    }
}

impl DerefMut for DataScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.graph
    }
}

impl Drop for DataScope<'_> {
    fn drop(&mut self) {
        let data = &mut self.graph.graph_mut().data;
        while let Some((name, prior)) = self.saved.pop() {
            data.restore(name, prior);
        }
    }
}
