// src/extract/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Area {
    pub total_sq_km: Option<f64>,
    pub land_sq_km: Option<f64>,
    pub water_sq_km: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Elevation {
    pub highest_point: Option<String>,
    pub lowest_point: Option<String>,
    pub mean_elevation: Option<String>,
}

/// A bare figure keeps only `total`; a breakdown object keeps all three.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Population {
    Breakdown {
        total: Option<f64>,
        male: Option<f64>,
        female: Option<f64>,
    },
    Bare {
        total: Option<f64>,
    },
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Capital {
    Detailed {
        name: Option<String>,
        coordinates: Option<String>,
        time_difference: Option<String>,
    },
    Bare {
        name: Option<String>,
    },
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Gdp {
    Annotated {
        value: Option<f64>,
        note: Option<String>,
    },
    Bare {
        value: Option<f64>,
    },
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Currency {
    Detailed {
        name: Option<String>,
        code: Option<String>,
        symbol: Option<String>,
    },
    Bare {
        name: Option<String>,
    },
}
