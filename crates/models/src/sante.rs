use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Soin {
    pub id: RecordId,
    pub lapin_id: RecordId,
    pub date_soin: NaiveDate,
    pub type_soin: String,
    pub description: Option<String>,
    pub traitement: Option<String>,
    pub veterinaire: Option<String>,
    pub cout: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewSoin {
    pub lapin_id: RecordId,
    pub date_soin: NaiveDate,
    pub type_soin: String,
    pub description: Option<String>,
    pub traitement: Option<String>,
    pub veterinaire: Option<String>,
    pub cout: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Vaccin {
    pub id: RecordId,
    pub lapin_id: RecordId,
    pub nom_vaccin: String,
    pub date_vaccination: NaiveDate,
    pub date_rappel: Option<NaiveDate>,
    pub lot: Option<String>,
}

impl Vaccin {
    /// True when a booster is scheduled on or before `today`.
    pub fn rappel_du(&self, today: NaiveDate) -> bool {
        self.date_rappel.is_some_and(|d| d <= today)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccin {
    pub lapin_id: RecordId,
    pub nom_vaccin: String,
    pub date_vaccination: NaiveDate,
    pub date_rappel: Option<NaiveDate>,
    pub lot: Option<String>,
}
