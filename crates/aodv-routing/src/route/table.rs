//! Route table keyed by destination address.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use aodv_core::types::NodeAddress;

use super::entry::RouteEntry;

/// Route table mapping destination addresses to route entries.
#[must_use]
pub struct RouteTable {
    entries: HashMap<NodeAddress, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, destination: NodeAddress) -> Option<&RouteEntry> {
        self.entries.get(&destination)
    }

    pub fn get_mut(&mut self, destination: NodeAddress) -> Option<&mut RouteEntry> {
        self.entries.get_mut(&destination)
    }

    /// The entry for `destination`, if it is currently active.
    #[must_use]
    pub fn active(&self, destination: NodeAddress, now: u64) -> Option<&RouteEntry> {
        self.entries
            .get(&destination)
            .filter(|entry| entry.is_active(now))
    }

    /// The entry for `destination`, created zeroed and inactive if absent.
    pub fn get_or_create(&mut self, destination: NodeAddress) -> &mut RouteEntry {
        self.entries
            .entry(destination)
            .or_insert_with(|| RouteEntry::new(destination))
    }

    /// Ensure a direct route to a neighbor that just sent us a packet.
    ///
    /// A missing entry is created with one hop through the neighbor itself,
    /// an unknown sequence number and a lifetime of `active_route_timeout`
    /// from `now`. Existing entries are left untouched. Returns whether an
    /// entry was created.
    pub fn upsert_from_neighbor(
        &mut self,
        neighbor: NodeAddress,
        now: u64,
        active_route_timeout: u64,
    ) -> bool {
        match self.entries.entry(neighbor) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let mut entry = RouteEntry::new(neighbor);
                entry.hop_count = 1;
                entry.next_hop = neighbor;
                entry.lifetime = now + active_route_timeout;
                slot.insert(entry);
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, destination: NodeAddress) -> bool {
        self.entries.contains_key(&destination)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeAddress, &RouteEntry)> {
        self.entries.iter()
    }

    /// Snapshot of every entry at `now`, ordered by destination.
    pub fn dump(&self, now: u64) -> RouteTableDump {
        let mut rows: Vec<RouteRow> = self
            .entries
            .values()
            .map(|entry| RouteRow {
                destination: entry.destination(),
                sequence: entry.destination_sequence,
                sequence_valid: entry.sequence_valid,
                active: entry.is_active(now),
                hop_count: entry.hop_count,
                next_hop: entry.next_hop,
                lifetime: entry.lifetime,
                remaining: entry.remaining(now),
            })
            .collect();
        rows.sort_by_key(|row| row.destination);
        RouteTableDump { rows }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of a [`RouteTableDump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub destination: NodeAddress,
    pub sequence: u8,
    pub sequence_valid: bool,
    pub active: bool,
    pub hop_count: u8,
    pub next_hop: NodeAddress,
    pub lifetime: u64,
    pub remaining: u64,
}

/// Human-readable route table snapshot for operators. Not a stable format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTableDump {
    pub rows: Vec<RouteRow>,
}

impl fmt::Display for RouteTableDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DEST  SEQ  VALID  ACTIVE  HOPS  NEXT  LIFETIME")?;
        for row in &self.rows {
            writeln!(
                f,
                "{}  {:>3}  {:<5}  {:<6}  {:>4}  {}  {} (+{}ms)",
                row.destination,
                row.sequence,
                row.sequence_valid,
                row.active,
                row.hop_count,
                row.next_hop,
                row.lifetime,
                row.remaining,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEIGHBOR: NodeAddress = NodeAddress::new(0x0B);

    #[test]
    fn test_empty_table() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        assert!(table.get(NEIGHBOR).is_none());
    }

    #[test]
    fn test_get_or_create_inserts_zeroed_entry() {
        let mut table = RouteTable::new();
        let entry = table.get_or_create(NEIGHBOR);
        assert!(!entry.sequence_valid);
        entry.hop_count = 4;
        assert_eq!(table.get_or_create(NEIGHBOR).hop_count, 4);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_upsert_from_neighbor_creates_direct_route() {
        let mut table = RouteTable::new();
        assert!(table.upsert_from_neighbor(NEIGHBOR, 10_000, 3_000));

        let entry = table.get(NEIGHBOR).unwrap();
        assert_eq!(entry.hop_count, 1);
        assert_eq!(entry.next_hop, NEIGHBOR);
        assert!(!entry.sequence_valid);
        assert_eq!(entry.destination_sequence, 0);
        assert_eq!(entry.lifetime, 13_000);
        assert!(table.active(NEIGHBOR, 12_999).is_some());
        assert!(table.active(NEIGHBOR, 13_000).is_none());
    }

    #[test]
    fn test_upsert_from_neighbor_keeps_existing_entry() {
        let mut table = RouteTable::new();
        {
            let entry = table.get_or_create(NEIGHBOR);
            entry.hop_count = 3;
            entry.next_hop = NodeAddress::new(0x0C);
            entry.sequence_valid = true;
            entry.destination_sequence = 9;
        }
        assert!(!table.upsert_from_neighbor(NEIGHBOR, 10_000, 3_000));
        let entry = table.get(NEIGHBOR).unwrap();
        assert_eq!(entry.hop_count, 3);
        assert_eq!(entry.next_hop, NodeAddress::new(0x0C));
        assert_eq!(entry.destination_sequence, 9);
    }

    #[test]
    fn test_dump_is_sorted_and_marks_activity() {
        let mut table = RouteTable::new();
        table.upsert_from_neighbor(NodeAddress::new(0x20), 0, 3_000);
        table.upsert_from_neighbor(NodeAddress::new(0x10), 0, 1_000);

        let dump = table.dump(2_000);
        assert_eq!(dump.rows.len(), 2);
        assert_eq!(dump.rows[0].destination, NodeAddress::new(0x10));
        assert!(!dump.rows[0].active);
        assert!(dump.rows[1].active);
        assert_eq!(dump.rows[1].remaining, 1_000);

        let text = dump.to_string();
        assert!(text.starts_with("DEST"));
        assert!(text.contains("0010"));
        assert!(text.contains("0020"));
        assert_eq!(text.lines().count(), 3);
    }
}
