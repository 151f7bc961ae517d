//! Symmetric allow/deny table over named collision groups

use ahash::AHashMap;

/// Group name that collides with everything regardless of the table
pub const ALWAYS_COLLIDE: &str = "Collide";

/// Outcome of filtering one candidate contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The bodies share a joint; no contact is generated
    Connected,
    Rejected,
    Accepted,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

/// Pairwise group policy
///
/// Entries are always stored under both orderings, so lookups never need to
/// normalize. An absent pair does not collide.
#[derive(Debug, Clone, Default)]
pub struct CollisionPolicy {
    entries: AHashMap<(String, String), bool>,
}

impl CollisionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for a pair of groups in both orderings
    pub fn assign(&mut self, first: &str, second: &str, collide: bool) {
        self.entries
            .insert((first.to_string(), second.to_string()), collide);
        self.entries
            .insert((second.to_string(), first.to_string()), collide);
        tracing::debug!(first, second, collide, "Collision policy entry");
    }

    /// `AssignCollision` directive: the two groups may collide
    pub fn allow(&mut self, first: &str, second: &str) {
        self.assign(first, second, true);
    }

    /// Drop a pair in both orderings, returning it to the default (no collision)
    pub fn remove(&mut self, first: &str, second: &str) {
        self.entries
            .remove(&(first.to_string(), second.to_string()));
        self.entries
            .remove(&(second.to_string(), first.to_string()));
    }

    pub fn lookup(&self, first: &str, second: &str) -> Option<bool> {
        self.entries
            .get(&(first.to_string(), second.to_string()))
            .copied()
    }

    /// Whether two groups may generate contact force
    pub fn permits(&self, first: &str, second: &str) -> bool {
        if first == ALWAYS_COLLIDE || second == ALWAYS_COLLIDE {
            return true;
        }
        self.lookup(first, second).unwrap_or(false)
    }

    /// Filter a candidate contact
    ///
    /// A `None` group marks static world geometry (ground plane, terrain),
    /// which always collides. `connected` is only consulted when both sides
    /// are bodies.
    pub fn judge(
        &self,
        first: Option<&str>,
        second: Option<&str>,
        connected: impl FnOnce() -> bool,
    ) -> Verdict {
        let (first, second) = match (first, second) {
            (Some(first), Some(second)) => (first, second),
            _ => return Verdict::Accepted,
        };
        if connected() {
            return Verdict::Connected;
        }
        if self.permits(first, second) {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }

    /// Number of distinct unordered pairs
    pub fn len(&self) -> usize {
        let mirrored = self.entries.keys().filter(|(a, b)| a == b).count();
        (self.entries.len() + mirrored) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
