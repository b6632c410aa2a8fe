//! Data-transfer types mirrored from the LAPGEST-PRO shared schema.
//!
//! Records are owned by the server; these types only describe the JSON shapes
//! exchanged with the API (camelCase on the wire).

pub mod enclos;
pub mod finances;
pub mod lapin;
pub mod personnel;
pub mod reproduction;
pub mod sante;
pub mod stock;
pub mod user;

pub use enclos::{Enclos, NewEnclos, TypeEnclos, UpdateEnclos};
pub use finances::{
    CategorieDepense, CompteTresorerie, Depense, NewCompteTresorerie, NewDepense, NewVente,
    TypeCompte, Vente,
};
pub use lapin::{Genealogy, Lapin, NewLapin, Sexe, StatutLapin, UpdateLapin};
pub use personnel::{
    Absence, Employe, NewAbsence, NewEmploye, NewPlanning, Planning, StatutAbsence,
    UpdateAbsence, UpdatePlanning,
};
pub use reproduction::{Accouplement, MiseBas, NewAccouplement, NewMiseBas, ResultatAccouplement};
pub use sante::{NewSoin, NewVaccin, Soin, Vaccin};
pub use stock::{CategorieStock, NewStock, Stock, UpdateStock};
pub use user::User;

/// Primary key type used by every server-side table.
pub type RecordId = i32;
