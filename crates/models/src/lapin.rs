use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::RecordId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sexe {
    #[strum(to_string = "male", serialize = "m")]
    Male,
    #[strum(to_string = "femelle", serialize = "f")]
    Femelle,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatutLapin {
    #[default]
    Actif,
    Reproducteur,
    Gestante,
    Engraissement,
    Vendu,
    Decede,
}

impl StatutLapin {
    /// Animals still on the farm (not sold, not dead).
    pub fn is_present(self) -> bool {
        !matches!(self, Self::Vendu | Self::Decede)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Lapin {
    pub id: RecordId,
    pub identifiant: String,
    pub nom: Option<String>,
    pub race: String,
    pub sexe: Sexe,
    pub date_naissance: Option<NaiveDate>,
    pub poids: Option<f64>,
    pub statut: StatutLapin,
    pub enclos_id: Option<RecordId>,
    pub pere_id: Option<RecordId>,
    pub mere_id: Option<RecordId>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Lapin {
    pub fn can_breed(&self) -> bool {
        matches!(self.statut, StatutLapin::Actif | StatutLapin::Reproducteur)
    }

    /// Males offered in the mating form.
    pub fn breeding_males(lapins: &[Lapin]) -> Vec<&Lapin> {
        lapins.iter().filter(|l| l.sexe == Sexe::Male && l.can_breed()).collect()
    }

    /// Females offered in the mating form. Pregnant does are excluded by status.
    pub fn breeding_females(lapins: &[Lapin]) -> Vec<&Lapin> {
        lapins.iter().filter(|l| l.sexe == Sexe::Femelle && l.can_breed()).collect()
    }

    pub fn display_name(&self) -> String {
        match &self.nom {
            Some(nom) if !nom.trim().is_empty() => format!("{} ({})", nom, self.identifiant),
            _ => self.identifiant.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewLapin {
    pub identifiant: String,
    pub nom: Option<String>,
    pub race: String,
    pub sexe: Sexe,
    pub date_naissance: Option<NaiveDate>,
    pub poids: Option<f64>,
    pub statut: Option<StatutLapin>,
    pub enclos_id: Option<RecordId>,
    pub pere_id: Option<RecordId>,
    pub mere_id: Option<RecordId>,
    pub notes: Option<String>,
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLapin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poids: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<StatutLapin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclos_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Ancestry and offspring of one animal, as returned by
/// `GET /api/lapins/{id}/genealogy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Genealogy {
    pub lapin: Lapin,
    pub pere: Option<Lapin>,
    pub mere: Option<Lapin>,
    #[serde(default)]
    pub descendants: Vec<Lapin>,
}
