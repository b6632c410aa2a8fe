//! Subcommand handlers. Each one reads through the same hooks the UI uses and
//! prints JSON on stdout.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use models::{Lapin, RecordId, Sexe};
use serde::Serialize;
use serde_json::json;
use services::{
    ApiContext, AuthProvider, AuthState, Navigator, Resolution,
    services::hooks::{
        AbsencesHooks, GenealogyHook, PlanningHooks, QueryResult, resource::LapinsHooks,
    },
};
use tracing::info;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turns a query result into its data, failing on a request error.
fn require<T>(result: QueryResult<T>, what: &str) -> Result<T> {
    result
        .into_result()
        .with_context(|| format!("failed to load {what}"))?
        .with_context(|| format!("no {what} returned"))
}

async fn authenticated(auth: &AuthProvider) -> Result<()> {
    match auth.check_session().await {
        AuthState::Authenticated(_) => Ok(()),
        state => bail!("not signed in ({})", state.label()),
    }
}

pub async fn session(auth: &AuthProvider) -> Result<()> {
    let state = auth.check_session().await;
    print_json(&json!({
        "state": state.label(),
        "user": state.user(),
    }))
}

pub async fn route(auth: &AuthProvider, path: &str) -> Result<()> {
    let mut navigator = Navigator::new();
    let mut states = auth.subscribe();

    let mut resolution = navigator.navigate(&states.borrow_and_update(), path);
    if resolution == Resolution::Placeholder {
        auth.check_session().await;
        let state = states.borrow_and_update().clone();
        let target = navigator
            .on_auth_change(&state)
            .unwrap_or_else(|| path.to_string());
        resolution = navigator.navigate(&state, &target);
    }
    info!(path = path, resolution = %resolution, "route resolved");

    match &resolution {
        Resolution::Placeholder => print_json(&json!({ "kind": "placeholder" })),
        Resolution::Page(page) => print_json(&json!({ "kind": "page", "page": page.to_string() })),
        Resolution::Redirect { to } => print_json(&json!({ "kind": "redirect", "to": to })),
    }
}

pub async fn lapins(
    ctx: &ApiContext,
    auth: &AuthProvider,
    sexe: Option<Sexe>,
    breeding: bool,
) -> Result<()> {
    authenticated(auth).await?;
    let herd = require(LapinsHooks::new(ctx).list().await, "lapins")?;

    let selected: Vec<&Lapin> = match (breeding, sexe) {
        (true, Some(Sexe::Male)) => Lapin::breeding_males(&herd),
        (true, Some(Sexe::Femelle)) => Lapin::breeding_females(&herd),
        (true, None) => herd.iter().filter(|l| l.can_breed()).collect(),
        (false, Some(sexe)) => herd.iter().filter(|l| l.sexe == sexe).collect(),
        (false, None) => herd.iter().collect(),
    };
    print_json(&selected)
}

pub async fn genealogy(ctx: &ApiContext, auth: &AuthProvider, id: RecordId) -> Result<()> {
    authenticated(auth).await?;
    let tree = require(GenealogyHook::new(ctx).fetch(id).await, "genealogy")?;
    print_json(&tree)
}

pub async fn planning(
    ctx: &ApiContext,
    auth: &AuthProvider,
    employe: Option<RecordId>,
    date: Option<NaiveDate>,
) -> Result<()> {
    authenticated(auth).await?;
    let shifts = require(PlanningHooks::new(ctx).list().await, "planning")?;
    let selected: Vec<_> = shifts
        .iter()
        .filter(|p| employe.is_none_or(|id| p.employe_id == id))
        .filter(|p| date.is_none_or(|d| p.date == d))
        .collect();
    print_json(&selected)
}

pub async fn absences(ctx: &ApiContext, auth: &AuthProvider, pending: bool) -> Result<()> {
    authenticated(auth).await?;
    let hooks = AbsencesHooks::new(ctx);
    let absences = if pending {
        require(hooks.pending().await, "absences")?
    } else {
        require(hooks.list().await, "absences")?
    };
    print_json(&absences)
}

pub async fn decide_absence(
    ctx: &ApiContext,
    auth: &AuthProvider,
    id: RecordId,
    approve: bool,
) -> Result<()> {
    authenticated(auth).await?;
    let hooks = AbsencesHooks::new(ctx);
    let absence = if approve {
        hooks.approve(id).await
    } else {
        hooks.refuse(id).await
    }
    .with_context(|| format!("failed to update absence {id}"))?;
    info!(absence_id = id, statut = %absence.statut, "absence updated");
    print_json(&absence)
}
