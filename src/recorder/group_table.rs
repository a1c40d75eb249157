use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ofp::{Bucket, GroupId};
use crate::SwitchId;

/// Hands out random group ids, never the same one twice.
pub struct GroupIdAllocator<R: Rng = StdRng> {
    rng: R,
    in_use: HashSet<GroupId>,
}

impl GroupIdAllocator<StdRng> {
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GroupIdAllocator::new(rng)
    }
}

impl<R: Rng> GroupIdAllocator<R> {
    pub fn new(rng: R) -> Self {
        GroupIdAllocator {
            rng,
            in_use: HashSet::new(),
        }
    }
    pub fn allocate(&mut self) -> GroupId {
        loop {
            let id: GroupId = self.rng.gen();
            if self.in_use.insert(id) {
                return id;
            }
        }
    }
    /// Marks an id as taken without drawing it.
    pub fn reserve(&mut self, id: GroupId) -> bool {
        self.in_use.insert(id)
    }
    pub fn is_used(&self, id: GroupId) -> bool {
        self.in_use.contains(&id)
    }
}

/// (installing switch, path source, path destination)
pub type GroupKey = (SwitchId, SwitchId, SwitchId);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipathGroup {
    pub group_id: GroupId,
    pub buckets: Vec<Bucket>,
}

/// Select groups created so far. Entries live as long as the controller.
pub struct GroupTable<R: Rng = StdRng> {
    groups: HashMap<GroupKey, MultipathGroup>,
    allocator: GroupIdAllocator<R>,
}

impl<R: Rng> GroupTable<R> {
    pub fn new(allocator: GroupIdAllocator<R>) -> Self {
        GroupTable {
            groups: HashMap::new(),
            allocator,
        }
    }
    /// Stores `buckets` under `key`. Returns the group id and whether the
    /// group did not exist before.
    pub fn upsert(&mut self, key: GroupKey, buckets: Vec<Bucket>) -> (GroupId, bool) {
        if let Some(group) = self.groups.get_mut(&key) {
            group.buckets = buckets;
            return (group.group_id, false);
        }
        let group_id = self.allocator.allocate();
        self.groups.insert(key, MultipathGroup { group_id, buckets });
        (group_id, true)
    }
    pub fn get(&self, key: &GroupKey) -> Option<&MultipathGroup> {
        self.groups.get(key)
    }
    pub fn len(&self) -> usize {
        self.groups.len()
    }
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
