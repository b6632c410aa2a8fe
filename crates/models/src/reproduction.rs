use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::RecordId;

/// Average gestation length of a doe, used to pre-fill the expected kindling date.
pub const GESTATION_DAYS: u64 = 31;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResultatAccouplement {
    #[default]
    EnAttente,
    Positif,
    Negatif,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Accouplement {
    pub id: RecordId,
    pub male_id: RecordId,
    pub femelle_id: RecordId,
    pub date_accouplement: NaiveDate,
    pub date_mise_bas_prevue: Option<NaiveDate>,
    pub resultat: ResultatAccouplement,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewAccouplement {
    pub male_id: RecordId,
    pub femelle_id: RecordId,
    pub date_accouplement: NaiveDate,
    pub date_mise_bas_prevue: Option<NaiveDate>,
    pub resultat: Option<ResultatAccouplement>,
    pub notes: Option<String>,
}

impl NewAccouplement {
    pub fn new(male_id: RecordId, femelle_id: RecordId, date_accouplement: NaiveDate) -> Self {
        Self {
            male_id,
            femelle_id,
            date_accouplement,
            date_mise_bas_prevue: expected_kindling(date_accouplement),
            resultat: None,
            notes: None,
        }
    }
}

pub fn expected_kindling(date_accouplement: NaiveDate) -> Option<NaiveDate> {
    date_accouplement.checked_add_days(Days::new(GESTATION_DAYS))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct MiseBas {
    pub id: RecordId,
    pub accouplement_id: Option<RecordId>,
    pub femelle_id: RecordId,
    pub date_mise_bas: NaiveDate,
    pub nes_vivants: i32,
    #[serde(default)]
    pub nes_morts: i32,
    pub sevres: Option<i32>,
    pub notes: Option<String>,
}

impl MiseBas {
    pub fn total_nes(&self) -> i32 {
        self.nes_vivants + self.nes_morts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewMiseBas {
    pub accouplement_id: Option<RecordId>,
    pub femelle_id: RecordId,
    pub date_mise_bas: NaiveDate,
    pub nes_vivants: i32,
    pub nes_morts: i32,
    pub sevres: Option<i32>,
    pub notes: Option<String>,
}
