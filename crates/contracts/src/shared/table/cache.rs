use std::collections::{HashMap, HashSet, VecDeque};

const DEFAULT_CAPACITY: usize = 50;

/// Responses keyed by query identity, plus the set of keys currently being
/// fetched so identical requests are not issued twice.
#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    entries: HashMap<String, V>,
    order: VecDeque<String>,
    in_flight: HashSet<String>,
    capacity: usize,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<V> QueryCache<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            in_flight: HashSet::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn store(&mut self, key: &str, value: V) {
        if self.entries.insert(key.to_string(), value).is_none() {
            self.order.push_back(key.to_string());
        }
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Mark a fetch as started; `false` if the same key is already in flight
    pub fn begin(&mut self, key: &str) -> bool {
        self.in_flight.insert(key.to_string())
    }

    pub fn finish(&mut self, key: &str) {
        self.in_flight.remove(key);
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains(key)
    }

    pub fn invalidate(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }

    /// Drops every cached response; in-flight markers survive
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
