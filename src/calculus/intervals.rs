use crate::symbolic::symbolic_engine::format_number;
use std::collections::BTreeMap;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Interval of the extended real line; the ends may be `±inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// the whole real line
    pub fn real_line() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// closed containment
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }

    pub fn is_empty(&self) -> bool {
        !(self.start <= self.end)
    }
}

impl From<(f64, f64)> for Interval {
    fn from(bounds: (f64, f64)) -> Self {
        Interval::new(bounds.0, bounds.1)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            format_number(self.start).0,
            format_number(self.end).0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Monotonicity {
    Increasing,
    Decreasing,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Concavity {
    #[strum(to_string = "Concave Up")]
    ConcaveUp,
    #[strum(to_string = "Concave Down")]
    ConcaveDown,
    Linear,
}

impl From<Monotonicity> for Concavity {
    /// concavity of a function from the monotonicity of its first derivative
    fn from(m: Monotonicity) -> Self {
        match m {
            Monotonicity::Increasing => Concavity::ConcaveUp,
            Monotonicity::Decreasing => Concavity::ConcaveDown,
            Monotonicity::Constant => Concavity::Linear,
        }
    }
}

/// Ordered intervals per label; every label of `L` is present, possibly with no intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMap<L: Ord> {
    entries: BTreeMap<L, Vec<Interval>>,
}

impl<L> ClassificationMap<L>
where
    L: Ord + Copy + IntoEnumIterator,
{
    pub fn new() -> Self {
        Self {
            entries: L::iter().map(|label| (label, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, label: L, interval: Interval) {
        self.entries.entry(label).or_default().push(interval);
    }

    /// intervals classified as `label`, in order of insertion
    pub fn get(&self, label: L) -> &[Interval] {
        self.entries.get(&label).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, &Vec<Interval>)> {
        self.entries.iter()
    }

    /// true when no label has any interval
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|v| v.is_empty())
    }

    /// Same intervals under new labels; intervals of labels mapped together are concatenated.
    pub fn relabel<M>(&self, f: impl Fn(L) -> M) -> ClassificationMap<M>
    where
        M: Ord + Copy + IntoEnumIterator,
    {
        let mut out = ClassificationMap::new();
        for (label, intervals) in &self.entries {
            for interval in intervals {
                out.push(f(*label), *interval);
            }
        }
        out
    }
}

impl<L> Default for ClassificationMap<L>
where
    L: Ord + Copy + IntoEnumIterator,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_display() {
        assert_eq!(Interval::new(-1.0, 2.5).to_string(), "[-1, 2.5]");
        assert_eq!(Interval::real_line().to_string(), "[-oo, oo]");
        assert!(Interval::new(0.0, 1.0).contains(1.0));
        assert!(Interval::new(2.0, 1.0).is_empty());
    }

    #[test]
    fn test_labels_display() {
        assert_eq!(Monotonicity::Increasing.to_string(), "Increasing");
        assert_eq!(Concavity::ConcaveUp.to_string(), "Concave Up");
        assert_eq!(Concavity::from(Monotonicity::Constant), Concavity::Linear);
    }

    #[test]
    fn test_map_has_every_label_and_relabels() {
        let mut map = ClassificationMap::<Monotonicity>::new();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 3);
        map.push(Monotonicity::Decreasing, Interval::new(-10.0, 0.0));
        map.push(Monotonicity::Increasing, Interval::new(0.0, 10.0));
        let concavity = map.relabel(Concavity::from);
        assert_eq!(concavity.get(Concavity::ConcaveDown), &[Interval::new(-10.0, 0.0)]);
        assert_eq!(concavity.get(Concavity::ConcaveUp), &[Interval::new(0.0, 10.0)]);
        assert!(concavity.get(Concavity::Linear).is_empty());
    }
}
