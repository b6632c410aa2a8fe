use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::RecordId;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategorieStock {
    Aliment,
    Medicament,
    Materiel,
    Litiere,
    #[default]
    Autre,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: RecordId,
    pub nom: String,
    pub categorie: CategorieStock,
    pub quantite: f64,
    pub unite: String,
    #[serde(default)]
    pub seuil_alerte: f64,
    pub prix_unitaire: Option<f64>,
    pub fournisseur: Option<String>,
}

impl Stock {
    /// Stock at or below its alert threshold.
    pub fn is_low(&self) -> bool {
        self.quantite <= self.seuil_alerte
    }

    pub fn valeur(&self) -> Option<f64> {
        self.prix_unitaire.map(|p| p * self.quantite)
    }

    pub fn low_items(stocks: &[Stock]) -> Vec<&Stock> {
        stocks.iter().filter(|s| s.is_low()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewStock {
    pub nom: String,
    pub categorie: CategorieStock,
    pub quantite: f64,
    pub unite: String,
    pub seuil_alerte: f64,
    pub prix_unitaire: Option<f64>,
    pub fournisseur: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantite: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seuil_alerte: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix_unitaire: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fournisseur: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(id: RecordId, quantite: f64, seuil_alerte: f64) -> Stock {
        Stock {
            id,
            nom: format!("granulés {id}"),
            categorie: CategorieStock::Aliment,
            quantite,
            unite: "kg".to_string(),
            seuil_alerte,
            prix_unitaire: Some(0.5),
            fournisseur: None,
        }
    }

    #[test]
    fn low_items_include_threshold() {
        let stocks = vec![stock(1, 10.0, 20.0), stock(2, 20.0, 20.0), stock(3, 50.0, 20.0)];
        let low: Vec<_> = Stock::low_items(&stocks).iter().map(|s| s.id).collect();
        assert_eq!(low, vec![1, 2]);
        assert_eq!(stocks[2].valeur(), Some(25.0));
    }
}
