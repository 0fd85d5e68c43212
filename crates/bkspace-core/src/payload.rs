use std::collections::HashMap;

/// Per-node occurrence counts, keyed by the entity that produced the token.
///
/// Occurrences inserted without an entity (or with an empty one) are only
/// counted in `unattributed` and never take part in ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    counts: HashMap<String, u64>,
    unattributed: u64,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// A payload holding a single occurrence.
    pub fn with_entity(entity: Option<&str>) -> Self {
        let mut payload = Self::new();
        payload.record(entity);
        payload
    }

    pub fn record(&mut self, entity: Option<&str>) {
        match entity {
            Some(e) if !e.is_empty() => {
                if let Some(count) = self.counts.get_mut(e) {
                    *count += 1;
                } else {
                    self.counts.insert(e.to_owned(), 1);
                }
            }
            _ => self.unattributed += 1,
        }
    }

    pub fn count(&self, entity: &str) -> u64 {
        self.counts.get(entity).copied().unwrap_or(0)
    }

    pub fn unattributed(&self) -> u64 {
        self.unattributed
    }

    /// Total occurrences, attributed or not.
    pub fn total(&self) -> u64 {
        self.counts.values().sum::<u64>() + self.unattributed
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(e, &c)| (e.as_str(), c))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.unattributed == 0
    }

    /// Approximate heap footprint of the entity map.
    pub fn heap_bytes(&self) -> usize {
        let entry = std::mem::size_of::<(String, u64)>() + 1;
        self.counts.capacity() * entry + self.counts.keys().map(String::capacity).sum::<usize>()
    }
}

/// Sums entity counts across payloads and sorts by total, descending.
///
/// Equal totals are ordered by entity name so results are deterministic.
pub fn rank_entities<'a, I>(payloads: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a Payload>,
{
    let mut totals: HashMap<&'a str, u64> = HashMap::new();
    for payload in payloads {
        for (entity, count) in payload.entities() {
            *totals.entry(entity).or_insert(0) += count;
        }
    }

    let mut ranked: Vec<(String, u64)> = totals
        .into_iter()
        .map(|(entity, total)| (entity.to_owned(), total))
        .collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
