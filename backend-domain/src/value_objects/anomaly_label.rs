// Anomaly label and comment value objects

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyLabel {
    Normal,
    Anomaly,
}

impl AnomalyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLabel::Normal => "Normal",
            AnomalyLabel::Anomaly => "Anomaly",
        }
    }

    pub fn is_anomaly(&self) -> bool {
        matches!(self, AnomalyLabel::Anomaly)
    }
}

impl fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyComment {
    None,
    SuddenSpike,
    UnusualPattern,
}

impl AnomalyComment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyComment::None => "",
            AnomalyComment::SuddenSpike => "Sudden Spike/Drop in Balance Detected",
            AnomalyComment::UnusualPattern => "Unusual Transaction Pattern",
        }
    }
}

impl fmt::Display for AnomalyComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
