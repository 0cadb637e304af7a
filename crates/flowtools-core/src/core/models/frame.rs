use super::map::DataMap;

/// A data map tagged with the simulation time it was collected at.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    time: f64,
    map: DataMap,
}

impl Frame {
    pub fn new(time: f64, map: DataMap) -> Self {
        Self { time, map }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn map(&self) -> &DataMap {
        &self.map
    }

    pub fn into_map(self) -> DataMap {
        self.map
    }
}
