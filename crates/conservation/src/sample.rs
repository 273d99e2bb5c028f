//! Sample orientation per instrument setting

use std::collections::BTreeMap;

use nalgebra::Rotation3;

/// Label of an instrument setting, as recorded with every event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingId(pub u32);

impl std::fmt::Display for SettingId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sample rotation for each setting
///
/// Each rotation takes sample-table coordinates into the lab frame. Momentum
/// transfers are brought back with the inverse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleRotations {
    rotations: BTreeMap<SettingId, Rotation3<f64>>,
}

impl SampleRotations {
    /// No settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rotation of a setting
    pub fn insert(&mut self, setting: SettingId, rotation: Rotation3<f64>) -> Option<Rotation3<f64>> {
        self.rotations.insert(setting, rotation)
    }

    /// Rotation of a setting
    pub fn get(&self, setting: SettingId) -> Option<&Rotation3<f64>> {
        self.rotations.get(&setting)
    }

    /// All settings in ascending order
    pub fn settings(&self) -> Vec<SettingId> {
        self.rotations.keys().copied().collect()
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    /// True if there are no settings
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

impl FromIterator<(SettingId, Rotation3<f64>)> for SampleRotations {
    fn from_iter<I: IntoIterator<Item = (SettingId, Rotation3<f64>)>>(iter: I) -> Self {
        Self {
            rotations: iter.into_iter().collect(),
        }
    }
}
