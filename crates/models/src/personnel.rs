use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Employe {
    pub id: RecordId,
    pub nom: String,
    pub prenom: String,
    pub poste: String,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub date_embauche: Option<NaiveDate>,
    pub salaire: Option<f64>,
    #[serde(default = "default_actif")]
    pub actif: bool,
}

fn default_actif() -> bool {
    true
}

impl Employe {
    pub fn nom_complet(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewEmploye {
    pub nom: String,
    pub prenom: String,
    pub poste: String,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub date_embauche: Option<NaiveDate>,
    pub salaire: Option<f64>,
    pub actif: Option<bool>,
}

/// One scheduled shift of an employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Planning {
    pub id: RecordId,
    pub employe_id: RecordId,
    pub date: NaiveDate,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
    pub tache: String,
    pub notes: Option<String>,
}

impl Planning {
    pub fn duree_minutes(&self) -> i64 {
        (self.heure_fin - self.heure_debut).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewPlanning {
    pub employe_id: RecordId,
    pub date: NaiveDate,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
    pub tache: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heure_debut: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heure_fin: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tache: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatutAbsence {
    #[default]
    EnAttente,
    Approuvee,
    Refusee,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub id: RecordId,
    pub employe_id: RecordId,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub motif: String,
    pub statut: StatutAbsence,
    pub notes: Option<String>,
}

impl Absence {
    /// Number of calendar days covered, both ends included.
    pub fn nombre_jours(&self) -> i64 {
        (self.date_fin - self.date_debut).num_days() + 1
    }

    pub fn couvre(&self, date: NaiveDate) -> bool {
        self.date_debut <= date && date <= self.date_fin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewAbsence {
    pub employe_id: RecordId,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub motif: String,
    pub statut: Option<StatutAbsence>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAbsence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<StatutAbsence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateAbsence {
    pub fn statut(statut: StatutAbsence) -> Self {
        Self {
            statut: Some(statut),
            ..Default::default()
        }
    }
}
