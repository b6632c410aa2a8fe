use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Vente {
    pub id: RecordId,
    pub date_vente: NaiveDate,
    pub client: String,
    pub lapin_id: Option<RecordId>,
    pub quantite: i32,
    pub prix_unitaire: f64,
    pub montant_total: f64,
    pub mode_paiement: Option<String>,
    pub compte_id: Option<RecordId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewVente {
    pub date_vente: NaiveDate,
    pub client: String,
    pub lapin_id: Option<RecordId>,
    pub quantite: i32,
    pub prix_unitaire: f64,
    pub montant_total: f64,
    pub mode_paiement: Option<String>,
    pub compte_id: Option<RecordId>,
    pub notes: Option<String>,
}

impl NewVente {
    /// Builds a sale whose total is derived from quantity and unit price.
    pub fn new(date_vente: NaiveDate, client: String, quantite: i32, prix_unitaire: f64) -> Self {
        Self {
            date_vente,
            client,
            lapin_id: None,
            quantite,
            prix_unitaire,
            montant_total: f64::from(quantite) * prix_unitaire,
            mode_paiement: None,
            compte_id: None,
            notes: None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategorieDepense {
    Alimentation,
    Veterinaire,
    Equipement,
    Salaires,
    Energie,
    #[default]
    Autre,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Depense {
    pub id: RecordId,
    pub date_depense: NaiveDate,
    pub categorie: CategorieDepense,
    pub description: String,
    pub montant: f64,
    pub fournisseur: Option<String>,
    pub compte_id: Option<RecordId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewDepense {
    pub date_depense: NaiveDate,
    pub categorie: CategorieDepense,
    pub description: String,
    pub montant: f64,
    pub fournisseur: Option<String>,
    pub compte_id: Option<RecordId>,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeCompte {
    #[default]
    Banque,
    Caisse,
    Epargne,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct CompteTresorerie {
    pub id: RecordId,
    pub nom: String,
    pub type_compte: TypeCompte,
    pub solde: f64,
    pub banque: Option<String>,
}

impl CompteTresorerie {
    pub fn solde_total(comptes: &[CompteTresorerie]) -> f64 {
        comptes.iter().map(|c| c.solde).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewCompteTresorerie {
    pub nom: String,
    pub type_compte: TypeCompte,
    pub solde: f64,
    pub banque: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vente_computes_total() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let vente = NewVente::new(date, "Boucherie Martin".to_string(), 4, 12.5);
        assert_eq!(vente.montant_total, 50.0);
    }

    #[test]
    fn solde_total_sums_accounts() {
        let comptes = vec![
            CompteTresorerie {
                id: 1,
                nom: "Crédit Agricole".to_string(),
                type_compte: TypeCompte::Banque,
                solde: 1200.0,
                banque: None,
            },
            CompteTresorerie {
                id: 2,
                nom: "Caisse".to_string(),
                type_compte: TypeCompte::Caisse,
                solde: -50.0,
                banque: None,
            },
        ];
        assert_eq!(CompteTresorerie::solde_total(&comptes), 1150.0);
    }
}
