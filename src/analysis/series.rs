use serde::Serialize;

// ---------------------------------------------------------------------------
// DerivedSeries – ordered key → value pairs handed to the chart renderer
// ---------------------------------------------------------------------------

/// Chart-ready output of an aggregation. The order of the pairs is the
/// order the renderer draws them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedSeries<K, V> {
    points: Vec<(K, V)>,
}

impl<K, V> Default for DerivedSeries<K, V> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<K: PartialEq, V> DerivedSeries<K, V> {
    /// Value for `key`, if the series has it.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.points.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<K, V> DerivedSeries<K, V> {
    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.points.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.points.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.points.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_inner(self) -> Vec<(K, V)> {
        self.points
    }
}

impl<K, V> FromIterator<(K, V)> for DerivedSeries<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a DerivedSeries<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ---------------------------------------------------------------------------
// AttritionSplit – a (No, Yes) pair of counts
// ---------------------------------------------------------------------------

/// Stayed / left counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttritionSplit {
    pub no: usize,
    pub yes: usize,
}

impl AttritionSplit {
    pub fn total(&self) -> usize {
        self.no + self.yes
    }

    /// Share of `yes` as a percentage; 0 for an empty group.
    pub fn yes_percent(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.yes as f64 / total as f64 * 100.0,
        }
    }
}
