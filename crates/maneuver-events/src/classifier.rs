//! Unsupervised 1-D classification of events
//!
//! Events are clustered by their scalar feature value with a k-means style
//! iteration on the feature axis, followed by a merge pass that removes
//! degenerate classes.
//!
//! # Algorithm
//!
//! 1. **Initialization**: `K` centroids evenly spaced over the observed
//!    feature range `[lo, hi]` (the midpoint when `K = 1`). The placement
//!    depends on the range only, never on the order of the events.
//! 2. **Iteration**: assign every event to the nearest centroid (ties go to
//!    the lower centroid), move each non-empty centroid to the mean of its
//!    members, stop as soon as no assignment changes or after
//!    `max_iterations` rounds.
//! 3. **Merging**: empty clusters are dropped and clusters sharing a
//!    centroid are fused. Then, while some cluster has fewer than
//!    `min_class_size` members, the smallest one is merged into its nearest
//!    neighbour on the feature axis.
//! 4. **Summary**: classes are numbered in ascending order of their average
//!    and annotated with `min`, `max`, `avg` and sample variance of their
//!    members' feature values.
//!
//! The resulting class count never exceeds `K`, and may be lower.

use std::cmp::Ordering;

use maneuver_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, aggregate::Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum number of classes `K`
    pub num_classes: usize,
    /// Classes with fewer members are merged into a neighbour
    pub min_class_size: usize,
    /// Maximum number of assignment/update rounds
    pub max_iterations: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            num_classes: 6,
            min_class_size: 1,
            max_iterations: 3000,
        }
    }
}

/// Summary statistics of the events assigned to one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventClass {
    pub id: usize,
    /// Number of member events
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Sample variance of the members' feature values
    pub variance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub event: Event,
    pub class_id: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    events: Vec<ClassifiedEvent>,
    classes: Vec<EventClass>,
    iterations: usize,
}

impl ClassificationResult {
    /// Events in their original temporal order, paired with a class id.
    #[must_use]
    pub fn events(&self) -> &[ClassifiedEvent] {
        &self.events
    }

    /// Classes ordered by id (and by average feature value).
    #[must_use]
    pub fn classes(&self) -> &[EventClass] {
        &self.classes
    }

    #[must_use]
    pub fn class(&self, id: usize) -> Option<&EventClass> {
        self.classes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Event, &EventClass)> + '_ {
        self.events
            .iter()
            .map(|e| (&e.event, &self.classes[e.class_id]))
    }

    /// Events assigned to class `id`, in temporal order.
    pub fn members(&self, id: usize) -> impl Iterator<Item = &Event> + '_ {
        self.events
            .iter()
            .filter(move |e| e.class_id == id)
            .map(|e| &e.event)
    }

    /// Number of assignment/update rounds executed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    config: ClassifierConfig,
}

#[derive(Debug, Clone)]
struct Cluster {
    centroid: f64,
    members: Vec<usize>,
}

impl Classifier {
    /// Fails with [`Error::Configuration`] when `num_classes` is zero.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        if config.num_classes < 1 {
            return Err(Error::configuration("cluster count must be at least 1"));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Groups `events` by their mean feature value.
    ///
    /// Never fails: no events give an empty result, and at most
    /// `num_classes` classes are produced.
    #[must_use]
    pub fn classify(&self, events: &[Event]) -> ClassificationResult {
        if events.is_empty() {
            return ClassificationResult::default();
        }
        let values = events.iter().map(|e| e.feature.mean).collect::<Vec<_>>();

        let mut centroids = initial_centroids(&values, self.config.num_classes);
        let mut assignment = assign(&values, &centroids);
        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            iterations += 1;
            update_centroids(&values, &assignment, &mut centroids);
            let next = assign(&values, &centroids);
            if next == assignment {
                break;
            }
            assignment = next;
        }

        let mut clusters = centroids
            .iter()
            .map(|&centroid| Cluster {
                centroid,
                members: Vec::new(),
            })
            .collect::<Vec<_>>();
        for (i, &c) in assignment.iter().enumerate() {
            clusters[c].members.push(i);
        }
        let clusters = merge_degenerate(clusters, &values, self.config.min_class_size);

        let mut class_of = vec![0; events.len()];
        let classes = clusters
            .iter()
            .enumerate()
            .map(|(id, cluster)| {
                for &i in &cluster.members {
                    class_of[i] = id;
                }
                summarize(id, cluster, &values)
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            events = events.len(),
            classes = classes.len(),
            iterations,
            "events classified"
        );

        ClassificationResult {
            events: events
                .iter()
                .zip(class_of)
                .map(|(&event, class_id)| ClassifiedEvent { event, class_id })
                .collect(),
            classes,
            iterations,
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn initial_centroids(values: &[f64], k: usize) -> Vec<f64> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if k == 1 {
        return vec![lo / 2.0 + hi / 2.0];
    }
    // `hi - lo` can overflow for extreme ranges
    (0..k)
        .map(|j| {
            let t = j as f64 / (k - 1) as f64;
            if j == k - 1 { hi } else { lo * (1.0 - t) + hi * t }
        })
        .collect()
}

fn assign(values: &[f64], centroids: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|&v| nearest(v, centroids.iter().copied()))
        .collect()
}

/// Index of the centroid closest to `value`; the first one wins ties.
fn nearest<I>(value: f64, centroids: I) -> usize
where
    I: IntoIterator<Item = f64>,
{
    centroids
        .into_iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_dist), (i, c)| {
            let dist = (value - c).abs();
            if dist < best_dist { (i, dist) } else { (best, best_dist) }
        })
        .0
}

#[expect(clippy::cast_precision_loss)]
fn update_centroids(values: &[f64], assignment: &[usize], centroids: &mut [f64]) {
    let mut sums = vec![(0.0, 0_usize); centroids.len()];
    for (&v, &c) in values.iter().zip(assignment) {
        sums[c].0 += v;
        sums[c].1 += 1;
    }
    for (centroid, (sum, count)) in centroids.iter_mut().zip(sums) {
        if count > 0 {
            *centroid = sum / count as f64;
        }
    }
}

fn merge_degenerate(clusters: Vec<Cluster>, values: &[f64], min_size: usize) -> Vec<Cluster> {
    let mut clusters = clusters
        .into_iter()
        .filter(|c| !c.members.is_empty())
        .collect::<Vec<_>>();
    clusters.sort_by(|a, b| a.centroid.total_cmp(&b.centroid));

    // fuse clusters that converged onto the same centroid
    let mut fused: Vec<Cluster> = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        match fused.last_mut() {
            Some(last) if last.centroid == cluster.centroid => {
                last.members.extend(cluster.members);
            }
            _ => fused.push(cluster),
        }
    }
    let mut clusters = fused;

    while clusters.len() > 1 {
        let Some(smallest) = clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| c.members.len() < min_size)
            .min_by_key(|(_, c)| c.members.len())
            .map(|(i, _)| i)
        else {
            break;
        };
        let target = nearest_neighbour(&clusters, smallest);
        let absorbed = clusters.remove(smallest);
        let target = if target > smallest { target - 1 } else { target };
        let cluster = &mut clusters[target];
        cluster.members.extend(absorbed.members);
        cluster.members.sort_unstable();
        cluster.centroid = mean_of(&cluster.members, values);
        // a recomputed centroid stays between its neighbours, so order holds
    }
    clusters
}

/// Neighbour of `index` with the closest centroid; the lower one wins ties.
fn nearest_neighbour(clusters: &[Cluster], index: usize) -> usize {
    let centroid = clusters[index].centroid;
    let left = index.checked_sub(1);
    let right = (index + 1 < clusters.len()).then_some(index + 1);
    match (left, right) {
        (Some(l), Some(r)) => {
            let dl = centroid - clusters[l].centroid;
            let dr = clusters[r].centroid - centroid;
            match dl.total_cmp(&dr) {
                Ordering::Greater => r,
                Ordering::Less | Ordering::Equal => l,
            }
        }
        (Some(l), None) => l,
        (None, Some(r)) => r,
        (None, None) => index,
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean_of(members: &[usize], values: &[f64]) -> f64 {
    members.iter().map(|&i| values[i]).sum::<f64>() / members.len() as f64
}

fn summarize(id: usize, cluster: &Cluster, values: &[f64]) -> EventClass {
    let member_values = cluster.members.iter().map(|&i| values[i]).collect::<Vec<_>>();
    let stats = DescriptiveStats::from_slice(&member_values).unwrap_or(DescriptiveStats {
        count: 0,
        min: cluster.centroid,
        max: cluster.centroid,
        mean: cluster.centroid,
        variance: 0.0,
        std_dev: 0.0,
    });
    EventClass {
        id,
        count: stats.count,
        min: stats.min,
        max: stats.max,
        avg: stats.mean,
        variance: stats.variance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate::Feature, interval::IndexInterval};

    fn events(means: &[f64]) -> Vec<Event> {
        means
            .iter()
            .enumerate()
            .map(|(i, &mean)| Event {
                interval: IndexInterval::new(i, i + 1),
                feature: Feature {
                    mean,
                    variance: 0.0,
                },
            })
            .collect()
    }

    fn classifier(num_classes: usize, min_class_size: usize) -> Classifier {
        Classifier::new(ClassifierConfig {
            num_classes,
            min_class_size,
            ..ClassifierConfig::default()
        })
        .unwrap()
    }

    fn class_ids(result: &ClassificationResult) -> Vec<usize> {
        result.events().iter().map(|e| e.class_id).collect()
    }

    #[test]
    fn test_empty_events() {
        let result = classifier(3, 1).classify(&[]);
        assert!(result.is_empty());
        assert!(result.classes().is_empty());
    }

    #[test]
    fn test_rejects_zero_classes() {
        let config = ClassifierConfig {
            num_classes: 0,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            Classifier::new(config),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_two_well_separated_groups() {
        let result = classifier(2, 1).classify(&events(&[0.1, 9.8, 0.0, 10.2, -0.1]));
        assert_eq!(class_ids(&result), vec![0, 1, 0, 1, 0]);
        assert_eq!(result.classes().len(), 2);
        let high = result.class(1).unwrap();
        assert_eq!(high.count, 2);
        assert!((high.avg - 10.0).abs() < 1e-12);
        assert_eq!(high.min, 9.8);
        assert_eq!(high.max, 10.2);
    }

    #[test]
    fn test_extreme_range_keeps_interior_centroids() {
        let result = classifier(3, 1).classify(&events(&[-1e308, 0.0, 1e308]));
        assert_eq!(class_ids(&result), vec![0, 1, 2]);
        assert_eq!(result.class(1).unwrap().avg, 0.0);
        assert!(result.classes().iter().all(|c| c.avg.is_finite()));
    }

    #[test]
    fn test_single_class_takes_everything() {
        let result = classifier(1, 1).classify(&events(&[-50.0, 0.0, 3.0, 1000.0]));
        assert_eq!(result.classes().len(), 1);
        assert_eq!(class_ids(&result), vec![0; 4]);
        assert_eq!(result.class(0).unwrap().count, 4);
    }

    #[test]
    fn test_identical_values_collapse_to_one_class() {
        let result = classifier(6, 1).classify(&events(&[2.5; 5]));
        assert_eq!(result.classes().len(), 1);
        let class = result.class(0).unwrap();
        assert_eq!(class.avg, 2.5);
        assert_eq!(class.variance, 0.0);
    }

    #[test]
    fn test_fewer_distinct_values_than_classes() {
        let result = classifier(6, 1).classify(&events(&[1.0, 5.0, 1.0, 5.0]));
        assert_eq!(result.classes().len(), 2);
        assert_eq!(class_ids(&result), vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_small_classes_are_merged_into_nearest_neighbour() {
        // the lone 4.0 would form its own class without the size threshold
        let values = [0.0, 0.1, 0.2, 4.0, 10.0, 10.1, 10.2];
        assert_eq!(classifier(3, 1).classify(&events(&values)).classes().len(), 3);

        let result = classifier(3, 2).classify(&events(&values));
        assert_eq!(result.classes().len(), 2);
        assert_eq!(class_ids(&result), vec![0, 0, 0, 0, 1, 1, 1]);
        assert_eq!(result.class(0).unwrap().max, 4.0);
    }

    #[test]
    fn test_min_class_size_never_removes_last_class() {
        let result = classifier(3, 100).classify(&events(&[1.0, 2.0, 30.0]));
        assert_eq!(result.classes().len(), 1);
        assert_eq!(result.class(0).unwrap().count, 3);
    }

    #[test]
    fn test_class_ids_follow_average_order() {
        let result = classifier(3, 1).classify(&events(&[50.0, -50.0, 0.0]));
        assert_eq!(class_ids(&result), vec![2, 0, 1]);
        let avgs = result.classes().iter().map(|c| c.avg).collect::<Vec<_>>();
        assert!(avgs.is_sorted());
    }

    #[test]
    fn test_independent_of_input_order() {
        let values = [3.0, 17.0, 4.0, 16.0, 9.0, 30.0];
        let mut reversed = values;
        reversed.reverse();
        let forward = classifier(3, 1).classify(&events(&values));
        let backward = classifier(3, 1).classify(&events(&reversed));
        let mut forward_ids = class_ids(&forward);
        forward_ids.reverse();
        assert_eq!(forward_ids, class_ids(&backward));
    }

    #[test]
    fn test_zero_iterations_uses_initial_centroids() {
        let config = ClassifierConfig {
            num_classes: 2,
            min_class_size: 1,
            max_iterations: 0,
        };
        let result = Classifier::new(config).unwrap().classify(&events(&[0.0, 4.0, 6.0, 10.0]));
        assert_eq!(result.iterations(), 0);
        assert_eq!(class_ids(&result), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_iter_and_members() {
        let result = classifier(2, 1).classify(&events(&[0.0, 10.0, 0.0]));
        let pairs = result.iter().map(|(e, c)| (e.interval.start, c.id)).collect::<Vec<_>>();
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 0)]);
        assert_eq!(result.members(0).count(), 2);
        assert!(result.iterations() >= 1);
    }
}
