use serde::{Deserialize, Serialize};

/// Unique identifier for a stroke center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CenterId(pub u32);

/// Treatment capability of a center.
///
/// Primary centers can administer thrombolysis only and must transfer
/// endovascular candidates. Comprehensive centers do both on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CenterType {
    Primary,
    Comprehensive,
}

/// Median and 75th percentile of an in-hospital treatment interval, in
/// minutes. The simulation fits a log-normal to these when drawing
/// per-sample performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreatmentQuantiles {
    pub median: f64,
    pub q75: f64,
}

impl TreatmentQuantiles {
    #[must_use]
    pub fn new(median: f64, q75: f64) -> Self {
        Self { median, q75 }
    }
}

/// A candidate destination hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeCenter {
    pub center_id: CenterId,
    pub name: String,
    pub center_type: CenterType,
    /// Travel time from the patient's location, in minutes. NaN until set,
    /// and NaN marks the center unreachable for the current location.
    pub time: f64,
    pub door_to_needle: TreatmentQuantiles,
    /// Absent for primary centers, which cannot perform thrombectomy.
    pub door_to_puncture: Option<TreatmentQuantiles>,
    /// Interfacility transfer time in minutes, for primary centers that
    /// ship endovascular candidates onward.
    pub transfer_time: Option<f64>,
    /// Comprehensive center a transfer goes to.
    pub destination_id: Option<CenterId>,
}

impl StrokeCenter {
    /// A primary (thrombolysis-only) center.
    #[must_use]
    pub fn primary(center_id: CenterId, name: impl Into<String>, door_to_needle: TreatmentQuantiles) -> Self {
        Self {
            center_id,
            name: name.into(),
            center_type: CenterType::Primary,
            time: f64::NAN,
            door_to_needle,
            door_to_puncture: None,
            transfer_time: None,
            destination_id: None,
        }
    }

    /// A comprehensive (thrombolysis and thrombectomy) center.
    #[must_use]
    pub fn comprehensive(
        center_id: CenterId,
        name: impl Into<String>,
        door_to_needle: TreatmentQuantiles,
        door_to_puncture: TreatmentQuantiles,
    ) -> Self {
        Self {
            center_id,
            name: name.into(),
            center_type: CenterType::Comprehensive,
            time: f64::NAN,
            door_to_needle,
            door_to_puncture: Some(door_to_puncture),
            transfer_time: None,
            destination_id: None,
        }
    }

    /// Attach the onward transfer route for a primary center.
    #[must_use]
    pub fn with_transfer(mut self, destination_id: CenterId, transfer_time: f64) -> Self {
        self.destination_id = Some(destination_id);
        self.transfer_time = Some(transfer_time);
        self
    }

    /// Set the travel time from the patient's location.
    #[must_use]
    pub fn with_time(mut self, minutes: f64) -> Self {
        self.time = minutes;
        self
    }

    /// Whether this center can be reached from the current patient location.
    #[must_use]
    #[inline]
    pub fn is_reachable(&self) -> bool {
        !self.time.is_nan()
    }
}
