use rbldns_application::ports::{LookupKey, MatchStore, MatchStoreBuilder};
use rbldns_domain::{parse_ip4_prefix, DomainError, Record, ReloadScope};
use std::sync::Arc;

use super::check_maxrange;

const ROOT: u32 = 0;

#[derive(Clone, Copy, Default)]
struct Node {
    children: [Option<u32>; 2],
    record: Option<u32>,
}

/// Binary trie over address bits, answering with the longest covering prefix.
///
/// Nodes live in one arena; a node at depth `n` stands for an `n`-bit prefix.
pub struct PrefixTrie {
    nodes: Vec<Node>,
    records: Vec<Record>,
}

impl PrefixTrie {
    fn best_match(&self, addr: u32) -> Option<&Record> {
        let mut node = self.nodes.get(ROOT as usize)?;
        let mut best = node.record;

        for depth in 0..32 {
            let bit = ((addr >> (31 - depth)) & 1) as usize;
            match node.children[bit] {
                Some(next) => {
                    node = &self.nodes[next as usize];
                    if node.record.is_some() {
                        best = node.record;
                    }
                }
                None => break,
            }
        }

        best.map(|idx| &self.records[idx as usize])
    }
}

impl MatchStore for PrefixTrie {
    fn lookup(&self, key: &LookupKey<'_>) -> Option<&Record> {
        let LookupKey::Ipv4(addr) = key else {
            return None;
        };
        // only the most specific prefix counts, excluded or not
        self.best_match(*addr).filter(|rec| !rec.excluded)
    }

    fn count(&self) -> usize {
        self.records.len()
    }
}

pub struct PrefixTrieBuilder {
    nodes: Vec<Node>,
    records: Vec<Record>,
}

impl Default for PrefixTrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrieBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            records: Vec::new(),
        }
    }

    fn node_for(&mut self, network: u32, len: u8) -> usize {
        let mut idx = ROOT as usize;
        for depth in 0..u32::from(len) {
            let bit = ((network >> (31 - depth)) & 1) as usize;
            idx = match self.nodes[idx].children[bit] {
                Some(next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[idx].children[bit] = Some(next as u32);
                    next
                }
            };
        }
        idx
    }
}

impl MatchStoreBuilder for PrefixTrieBuilder {
    fn insert(
        &mut self,
        key: &str,
        record: Record,
        maxrange4: Option<u64>,
    ) -> Result<(), DomainError> {
        let (network, len) = parse_ip4_prefix(key)?;
        check_maxrange(key, 1u64 << (32 - u32::from(len)), maxrange4)?;

        let idx = self.node_for(network, len);
        match self.nodes[idx].record {
            Some(existing) => self.records[existing as usize] = record,
            None => {
                self.nodes[idx].record = Some(self.records.len() as u32);
                self.records.push(record);
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn finish(self: Box<Self>, _scope: &ReloadScope) -> Arc<dyn MatchStore> {
        let Self {
            mut nodes,
            mut records,
        } = *self;
        nodes.shrink_to_fit();
        records.shrink_to_fit();
        Arc::new(PrefixTrie { nodes, records })
    }
}
