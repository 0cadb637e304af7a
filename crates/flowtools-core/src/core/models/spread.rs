/// Standard errors of the quantities of a spread record.
///
/// Only present for series combined from several runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpreadErrors {
    pub left: f64,
    pub right: f64,
    pub com: f64,
    pub dist: f64,
}

/// The spreading of a droplet in a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadRecord {
    /// Time of the frame.
    pub time: f64,
    /// Left edge of the contact line, relative to the centre of mass at impact.
    pub left: f64,
    /// Right edge of the contact line, relative to the centre of mass at impact.
    pub right: f64,
    /// Centre of mass of the droplet along x.
    pub com: f64,
    /// Height of the centre of mass above the floor.
    pub dist: f64,
    pub error: Option<SpreadErrors>,
}

impl SpreadRecord {
    pub fn new(time: f64, left: f64, right: f64, com: f64, dist: f64) -> Self {
        Self {
            time,
            left,
            right,
            com,
            dist,
            error: None,
        }
    }

    pub fn diameter(&self) -> f64 {
        self.right - self.left
    }

    pub fn radius(&self) -> f64 {
        self.diameter() / 2.0
    }

    /// Standard error of the radius, from the errors of both edges.
    pub fn radius_error(&self) -> Option<f64> {
        self.error
            .map(|error| (error.left.powi(2) + error.right.powi(2)).sqrt() / 2.0)
    }
}

/// Information about how a spread series was collected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpreadMetadata {
    /// Base file name of the data maps.
    pub base: Option<String>,
    /// Time between frames.
    pub delta_t: Option<f64>,
    /// Row of the substrate floor.
    pub floor: Option<usize>,
    /// Minimum mass of droplet cells.
    pub min_mass: Option<f64>,
}

/// The spreading of a droplet over time, one record per frame after impact.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpreadSeries {
    pub metadata: SpreadMetadata,
    records: Vec<SpreadRecord>,
}

impl SpreadSeries {
    pub fn new(metadata: SpreadMetadata) -> Self {
        Self {
            metadata,
            records: Vec::new(),
        }
    }

    pub fn from_records(metadata: SpreadMetadata, records: Vec<SpreadRecord>) -> Self {
        Self { metadata, records }
    }

    pub fn push(&mut self, record: SpreadRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SpreadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether every record carries standard errors.
    pub fn has_errors(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|r| r.error.is_some())
    }

    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.time).collect()
    }

    /// The spread radius as `(time, radius)` pairs.
    pub fn radii(&self) -> Vec<(f64, f64)> {
        self.records.iter().map(|r| (r.time, r.radius())).collect()
    }

    /// Returns a copy with times shifted by `-shift`.
    pub fn shifted(&self, shift: f64) -> Self {
        let records = self
            .records
            .iter()
            .map(|r| SpreadRecord {
                time: r.time - shift,
                ..*r
            })
            .collect();
        Self::from_records(self.metadata.clone(), records)
    }

    /// Returns a copy with times scaled by `time` and all lengths by `length`.
    pub fn scaled(&self, time: f64, length: f64) -> Self {
        let records = self
            .records
            .iter()
            .map(|r| SpreadRecord {
                time: r.time * time,
                left: r.left * length,
                right: r.right * length,
                com: r.com * length,
                dist: r.dist * length,
                error: r.error.map(|e| SpreadErrors {
                    left: e.left * length,
                    right: e.right * length,
                    com: e.com * length,
                    dist: e.dist * length,
                }),
            })
            .collect();
        let mut metadata = self.metadata.clone();
        metadata.delta_t = metadata.delta_t.map(|dt| dt * time);
        Self::from_records(metadata, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> SpreadSeries {
        SpreadSeries::from_records(
            SpreadMetadata {
                delta_t: Some(2.0),
                ..Default::default()
            },
            vec![
                SpreadRecord::new(2.0, -1.0, 1.0, 0.0, 3.0),
                SpreadRecord::new(4.0, -2.0, 3.0, 0.5, 2.5),
            ],
        )
    }

    #[test]
    fn radius_and_diameter_follow_edges() {
        let record = SpreadRecord::new(0.0, -2.0, 3.0, 0.0, 0.0);
        assert_eq!(record.diameter(), 5.0);
        assert_eq!(record.radius(), 2.5);
        assert_eq!(record.radius_error(), None);
    }

    #[test]
    fn radius_error_combines_edge_errors() {
        let mut record = SpreadRecord::new(0.0, -2.0, 3.0, 0.0, 0.0);
        record.error = Some(SpreadErrors {
            left: 3.0,
            right: 4.0,
            ..Default::default()
        });
        assert_eq!(record.radius_error(), Some(2.5));
    }

    #[test]
    fn radii_pairs_time_with_radius() {
        assert_eq!(series().radii(), vec![(2.0, 1.0), (4.0, 2.5)]);
    }

    #[test]
    fn shifted_moves_only_times() {
        let shifted = series().shifted(2.0);
        assert_eq!(shifted.times(), vec![0.0, 2.0]);
        assert_eq!(shifted.records()[1].right, 3.0);
    }

    #[test]
    fn scaled_applies_factors_to_times_and_lengths() {
        let scaled = series().scaled(0.5, 10.0);
        assert_eq!(scaled.times(), vec![1.0, 2.0]);
        assert_eq!(scaled.records()[1].left, -20.0);
        assert_eq!(scaled.records()[1].dist, 25.0);
        assert_eq!(scaled.metadata.delta_t, Some(1.0));
    }

    #[test]
    fn errors_must_cover_every_record() {
        let mut series = series();
        assert!(!series.has_errors());
        series.push(SpreadRecord {
            error: Some(SpreadErrors::default()),
            ..SpreadRecord::new(6.0, 0.0, 0.0, 0.0, 0.0)
        });
        assert!(!series.has_errors());
        assert!(!SpreadSeries::default().has_errors());
    }
}
