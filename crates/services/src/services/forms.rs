//! Form models for the write paths. A form owns its field values until it is
//! submitted; validation failures stay local and never reach the API.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use models::{Lapin, NewAbsence, NewAccouplement, NewPlanning, RecordId, Sexe, StatutAbsence};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use super::{api_client::RequestError, hooks::Mutation};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(ValidationError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// A form whose values can be validated into an API payload.
pub trait Form {
    type Payload: Serialize;

    fn into_payload(self) -> Result<Self::Payload, ValidationErrors>;
}

fn required<T>(errors: &mut ValidationErrors, field: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(field, "champ obligatoire");
    }
    value
}

fn required_text(errors: &mut ValidationErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, "champ obligatoire");
    }
    value.to_string()
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct AbsenceForm {
    pub employe_id: Option<RecordId>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub motif: String,
    pub notes: String,
}

impl Form for AbsenceForm {
    type Payload = NewAbsence;

    fn into_payload(self) -> Result<NewAbsence, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let employe_id = required(&mut errors, "employeId", self.employe_id);
        let date_debut = required(&mut errors, "dateDebut", self.date_debut);
        let date_fin = required(&mut errors, "dateFin", self.date_fin);
        let motif = required_text(&mut errors, "motif", &self.motif);

        let (Some(employe_id), Some(date_debut), Some(date_fin)) = (employe_id, date_debut, date_fin)
        else {
            return Err(errors);
        };
        if date_fin < date_debut {
            errors.push("dateFin", "la date de fin précède la date de début");
        }
        errors.into_result()?;

        Ok(NewAbsence {
            employe_id,
            date_debut,
            date_fin,
            motif,
            statut: Some(StatutAbsence::EnAttente),
            notes: optional_text(&self.notes),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanningForm {
    pub employe_id: Option<RecordId>,
    pub date: Option<NaiveDate>,
    pub heure_debut: Option<NaiveTime>,
    pub heure_fin: Option<NaiveTime>,
    pub tache: String,
    pub notes: String,
}

impl Form for PlanningForm {
    type Payload = NewPlanning;

    fn into_payload(self) -> Result<NewPlanning, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let employe_id = required(&mut errors, "employeId", self.employe_id);
        let date = required(&mut errors, "date", self.date);
        let heure_debut = required(&mut errors, "heureDebut", self.heure_debut);
        let heure_fin = required(&mut errors, "heureFin", self.heure_fin);
        let tache = required_text(&mut errors, "tache", &self.tache);

        let (Some(employe_id), Some(date), Some(heure_debut), Some(heure_fin)) =
            (employe_id, date, heure_debut, heure_fin)
        else {
            return Err(errors);
        };
        if heure_fin <= heure_debut {
            errors.push("heureFin", "l'heure de fin doit suivre l'heure de début");
        }
        errors.into_result()?;

        Ok(NewPlanning {
            employe_id,
            date,
            heure_debut,
            heure_fin,
            tache,
            notes: optional_text(&self.notes),
        })
    }
}

/// Mating form. Candidates come from the herd the page already loaded, so the
/// sex and status of the selected animals can be checked without a request.
#[derive(Debug, Clone, Default)]
pub struct AccouplementForm<'a> {
    pub herd: &'a [Lapin],
    pub male_id: Option<RecordId>,
    pub femelle_id: Option<RecordId>,
    pub date_accouplement: Option<NaiveDate>,
    pub notes: String,
}

impl AccouplementForm<'_> {
    fn check_candidate(
        &self,
        errors: &mut ValidationErrors,
        field: &'static str,
        id: RecordId,
        sexe: Sexe,
    ) {
        match self.herd.iter().find(|l| l.id == id) {
            None => errors.push(field, "lapin inconnu"),
            Some(lapin) if lapin.sexe != sexe => errors.push(field, format!("doit être {sexe}")),
            Some(lapin) if !lapin.can_breed() => {
                errors.push(field, format!("statut {} incompatible", lapin.statut))
            }
            Some(_) => {}
        }
    }
}

impl Form for AccouplementForm<'_> {
    type Payload = NewAccouplement;

    fn into_payload(self) -> Result<NewAccouplement, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let male_id = required(&mut errors, "maleId", self.male_id);
        let femelle_id = required(&mut errors, "femelleId", self.femelle_id);
        let date = required(&mut errors, "dateAccouplement", self.date_accouplement);

        if let Some(id) = male_id {
            self.check_candidate(&mut errors, "maleId", id, Sexe::Male);
        }
        if let Some(id) = femelle_id {
            self.check_candidate(&mut errors, "femelleId", id, Sexe::Femelle);
        }
        let (Some(male_id), Some(femelle_id), Some(date)) = (male_id, femelle_id, date) else {
            return Err(errors);
        };
        errors.into_result()?;

        let mut payload = NewAccouplement::new(male_id, femelle_id, date);
        payload.notes = optional_text(&self.notes);
        Ok(payload)
    }
}

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Binds a form type to the mutation that receives its payload and to the
/// parent's success/cancel callbacks.
pub struct FormController<F: Form, R> {
    mutation: Mutation<F::Payload, R>,
    on_success: Callback<R>,
    on_cancel: Box<dyn Fn() + Send + Sync>,
}

impl<F, R> FormController<F, R>
where
    F: Form,
    R: DeserializeOwned,
{
    pub fn new(mutation: Mutation<F::Payload, R>) -> Self {
        Self {
            mutation,
            on_success: Box::new(|_| {}),
            on_cancel: Box::new(|| {}),
        }
    }

    pub fn on_success(mut self, callback: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.on_success = Box::new(callback);
        self
    }

    pub fn on_cancel(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Box::new(callback);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.mutation.is_pending()
    }

    /// Validates locally, then sends the payload. The success callback runs
    /// only when the API accepted the write.
    pub async fn submit(&self, form: F) -> Result<R, FormError> {
        let payload = form.into_payload()?;
        let created = self.mutation.mutate(&payload).await?;
        (self.on_success)(&created);
        Ok(created)
    }

    pub fn cancel(&self) {
        (self.on_cancel)();
    }
}
