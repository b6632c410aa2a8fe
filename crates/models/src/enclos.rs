use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::RecordId;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeEnclos {
    #[default]
    Cage,
    Parc,
    Maternite,
    Engraissement,
    Quarantaine,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Enclos {
    pub id: RecordId,
    pub nom: String,
    pub type_enclos: TypeEnclos,
    pub capacite: i32,
    #[serde(default)]
    pub occupation: i32,
    pub batiment: Option<String>,
    pub notes: Option<String>,
}

impl Enclos {
    pub fn is_full(&self) -> bool {
        self.occupation >= self.capacite
    }

    pub fn places_libres(&self) -> i32 {
        (self.capacite - self.occupation).max(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewEnclos {
    pub nom: String,
    pub type_enclos: TypeEnclos,
    pub capacite: i32,
    pub batiment: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnclos {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_enclos: Option<TypeEnclos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacite: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batiment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_helpers() {
        let mut enclos = Enclos {
            id: 1,
            nom: "M1".to_string(),
            type_enclos: TypeEnclos::Maternite,
            capacite: 4,
            occupation: 3,
            batiment: None,
            notes: None,
        };
        assert!(!enclos.is_full());
        assert_eq!(enclos.places_libres(), 1);

        enclos.occupation = 5;
        assert!(enclos.is_full());
        assert_eq!(enclos.places_libres(), 0);
    }
}
