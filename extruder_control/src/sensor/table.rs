//! Piecewise-linear calibration table.

use extruder_common::thermal::config::CalibrationTable;

use crate::error::ControlError;

/// Calibration table checked for interpolation: at least two nodes,
/// raw values strictly increasing. Celsius values may run either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThermistorTable {
    points: CalibrationTable,
}

impl ThermistorTable {
    /// Check and wrap a table.
    pub fn new(points: CalibrationTable) -> Result<Self, ControlError> {
        if points.len() < 2 {
            return Err(ControlError::InvalidCalibrationTable(format!(
                "{} point(s), need at least 2",
                points.len()
            )));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(ControlError::InvalidCalibrationTable(format!(
                "raw {} does not follow raw {}",
                w[1].0, w[0].0
            )));
        }
        Ok(Self { points })
    }

    /// Table nodes.
    pub fn points(&self) -> &[(u16, i16)] {
        &self.points
    }

    /// Interpolate `raw` into °C.
    ///
    /// Uses the segment ending at the first node whose raw value exceeds
    /// the sample; below the first node the first segment is extrapolated.
    /// Returns `None` when the sample lies beyond the last node. Results of
    /// steep segments saturate to the `i16` node range.
    pub fn interpolate(&self, raw: u16) -> Option<i32> {
        let upper = match self.points[1..].iter().position(|&(r, _)| r > raw) {
            Some(i) => i + 1,
            None => {
                let &(last_raw, last_c) = self.points.last()?;
                return (raw == last_raw).then_some(i32::from(last_c));
            }
        };
        let (r0, c0) = self.points[upper - 1];
        let (r1, c1) = self.points[upper];
        let (r0, c0, r1, c1) = (i64::from(r0), i64::from(c0), i64::from(r1), i64::from(c1));
        let celsius = c0 + (i64::from(raw) - r0) * (c1 - c0) / (r1 - r0);
        Some(celsius.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i32)
    }
}
