mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use chrono::NaiveDate;
use common::MockApi;
use models::{Absence, StatutAbsence};
use services::services::{
    forms::{AbsenceForm, FormController, FormError},
    hooks::AbsencesHooks,
};

fn absence_form(motif: &str) -> AbsenceForm {
    AbsenceForm {
        employe_id: Some(4),
        date_debut: NaiveDate::from_ymd_opt(2025, 7, 14),
        date_fin: NaiveDate::from_ymd_opt(2025, 7, 18),
        motif: motif.to_string(),
        notes: String::new(),
    }
}

fn controller(
    absences: &AbsencesHooks,
    successes: &Arc<AtomicUsize>,
) -> FormController<AbsenceForm, Absence> {
    let successes = successes.clone();
    FormController::new(absences.create.clone()).on_success(move |_| {
        successes.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test]
async fn submit_creates_and_notifies_parent() {
    let api = MockApi::start().await;
    let absences = AbsencesHooks::new(&api.context());
    let successes = Arc::new(AtomicUsize::new(0));
    let form = controller(&absences, &successes);

    absences.list().await;
    let created = form.submit(absence_form("congés d'été")).await.unwrap();

    assert_eq!(created.statut, StatutAbsence::EnAttente);
    assert_eq!(created.nombre_jours(), 5);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert!(!form.is_pending());
    assert_eq!(absences.list().await.data.map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_api() {
    let api = MockApi::start().await;
    let absences = AbsencesHooks::new(&api.context());
    let successes = Arc::new(AtomicUsize::new(0));
    let form = controller(&absences, &successes);

    let err = form.submit(absence_form("   ")).await.unwrap_err();

    let errors = match err {
        FormError::Validation(errors) => errors,
        other => panic!("expected a validation error, got {other:?}"),
    };
    assert!(errors.for_field("motif").is_some());
    assert_eq!(api.state.hits("POST /api/employes/absences"), 0);
    assert_eq!(successes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_submit_keeps_form_open() {
    let api = MockApi::start().await;
    let absences = AbsencesHooks::new(&api.context());
    let successes = Arc::new(AtomicUsize::new(0));
    let cancels = Arc::new(AtomicUsize::new(0));
    let form = {
        let cancels = cancels.clone();
        controller(&absences, &successes).on_cancel(move || {
            cancels.fetch_add(1, Ordering::SeqCst);
        })
    };

    api.state.fail_writes(true);
    let err = form.submit(absence_form("formation")).await.unwrap_err();

    assert!(matches!(err, FormError::Request(ref e) if e.status() == Some(409)));
    assert_eq!(err.to_string(), "409: Absence déjà déclarée");
    assert_eq!(successes.load(Ordering::SeqCst), 0);

    form.cancel();
    assert_eq!(cancels.load(Ordering::SeqCst), 1);
}
