//! CRUD hooks shared by every API collection.

use std::marker::PhantomData;

use models::{
    Accouplement, CompteTresorerie, Depense, Employe, Lapin, MiseBas, NewAccouplement,
    NewCompteTresorerie, NewDepense, NewEmploye, NewEnclos, NewLapin, NewMiseBas, NewSoin,
    NewStock, NewVaccin, NewVente, RecordId, Soin, Stock, UpdateEnclos, UpdateLapin, UpdateStock,
    Vaccin, Vente,
};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::{ApiContext, Mutation, MutationDescriptor, QueryResult};
use crate::{
    query_key,
    services::{api_client::RequestError, query_cache::QueryKey},
};

/// An API collection served under `PATH` with the usual list/get/create/
/// update/delete endpoints.
pub trait ApiResource {
    type Record: DeserializeOwned;
    type Create: Serialize;
    type Update: Serialize;

    const PATH: &'static str;

    /// Keys outside the collection that a write to it makes outdated.
    fn related_keys() -> Vec<QueryKey> {
        Vec::new()
    }

    fn list_key() -> QueryKey {
        query_key![Self::PATH]
    }

    fn item_key(id: RecordId) -> QueryKey {
        Self::list_key().with(id)
    }

    fn item_path(id: RecordId) -> String {
        format!("{}/{}", Self::PATH, id)
    }

    /// The collection key prefixes every item key, so it is enough to
    /// invalidate it.
    fn write_invalidations() -> Vec<QueryKey> {
        let mut keys = vec![Self::list_key()];
        keys.extend(Self::related_keys());
        keys
    }
}

pub struct ResourceHooks<R: ApiResource> {
    ctx: ApiContext,
    pub create: Mutation<R::Create, R::Record>,
    pub update: Mutation<R::Update, R::Record>,
    pub delete: Mutation<(), Value>,
    _resource: PhantomData<R>,
}

impl<R: ApiResource> ResourceHooks<R> {
    pub fn new(ctx: &ApiContext) -> Self {
        let invalidates = R::write_invalidations();
        Self {
            create: ctx.mutation(
                MutationDescriptor::new(Method::POST, R::PATH).invalidates(invalidates.clone()),
            ),
            update: ctx.mutation(
                MutationDescriptor::new(Method::PUT, R::PATH).invalidates(invalidates.clone()),
            ),
            delete: ctx
                .mutation(MutationDescriptor::new(Method::DELETE, R::PATH).invalidates(invalidates)),
            ctx: ctx.clone(),
            _resource: PhantomData,
        }
    }

    pub async fn list(&self) -> QueryResult<Vec<R::Record>> {
        self.ctx.query(&R::list_key(), R::PATH).await
    }

    pub async fn get(&self, id: RecordId) -> QueryResult<R::Record> {
        self.ctx.query(&R::item_key(id), &R::item_path(id)).await
    }

    pub fn cached_list(&self) -> QueryResult<Vec<R::Record>> {
        self.ctx.peek(&R::list_key())
    }

    pub async fn update_by_id(
        &self,
        id: RecordId,
        payload: &R::Update,
    ) -> Result<R::Record, RequestError> {
        self.update.mutate_at(id, Some(payload)).await
    }

    pub async fn delete_by_id(&self, id: RecordId) -> Result<Value, RequestError> {
        self.delete.mutate_at(id, None).await
    }
}

pub struct Lapins;

impl ApiResource for Lapins {
    type Record = Lapin;
    type Create = NewLapin;
    type Update = UpdateLapin;

    const PATH: &'static str = "/api/lapins";

    fn related_keys() -> Vec<QueryKey> {
        // Genealogy lookups and enclosure occupancy both derive from lapins.
        vec![query_key!["lapin"], Enclos::list_key()]
    }
}

pub struct Enclos;

impl ApiResource for Enclos {
    type Record = models::Enclos;
    type Create = NewEnclos;
    type Update = UpdateEnclos;

    const PATH: &'static str = "/api/enclos";
}

pub struct Accouplements;

impl ApiResource for Accouplements {
    type Record = Accouplement;
    type Create = NewAccouplement;
    type Update = NewAccouplement;

    const PATH: &'static str = "/api/reproduction/accouplements";

    fn related_keys() -> Vec<QueryKey> {
        vec![Lapins::list_key()]
    }
}

pub struct MisesBas;

impl ApiResource for MisesBas {
    type Record = MiseBas;
    type Create = NewMiseBas;
    type Update = NewMiseBas;

    const PATH: &'static str = "/api/reproduction/mises-bas";

    fn related_keys() -> Vec<QueryKey> {
        vec![Accouplements::list_key(), Lapins::list_key(), query_key!["lapin"]]
    }
}

pub struct Ventes;

impl ApiResource for Ventes {
    type Record = Vente;
    type Create = NewVente;
    type Update = NewVente;

    const PATH: &'static str = "/api/finances/ventes";

    fn related_keys() -> Vec<QueryKey> {
        vec![Lapins::list_key(), ComptesTresorerie::list_key()]
    }
}

pub struct Soins;

impl ApiResource for Soins {
    type Record = Soin;
    type Create = NewSoin;
    type Update = NewSoin;

    const PATH: &'static str = "/api/sante/soins";
}

pub struct Vaccins;

impl ApiResource for Vaccins {
    type Record = Vaccin;
    type Create = NewVaccin;
    type Update = NewVaccin;

    const PATH: &'static str = "/api/sante/vaccins";
}

pub struct Stocks;

impl ApiResource for Stocks {
    type Record = Stock;
    type Create = NewStock;
    type Update = UpdateStock;

    const PATH: &'static str = "/api/stocks";
}

pub struct Employes;

impl ApiResource for Employes {
    type Record = Employe;
    type Create = NewEmploye;
    type Update = NewEmploye;

    const PATH: &'static str = "/api/personnel";
}

pub struct Depenses;

impl ApiResource for Depenses {
    type Record = Depense;
    type Create = NewDepense;
    type Update = NewDepense;

    const PATH: &'static str = "/api/depenses";

    fn related_keys() -> Vec<QueryKey> {
        vec![ComptesTresorerie::list_key()]
    }
}

pub struct ComptesTresorerie;

impl ApiResource for ComptesTresorerie {
    type Record = CompteTresorerie;
    type Create = NewCompteTresorerie;
    type Update = NewCompteTresorerie;

    const PATH: &'static str = "/api/tresorerie/comptes";
}

pub type LapinsHooks = ResourceHooks<Lapins>;
pub type EnclosHooks = ResourceHooks<Enclos>;
pub type AccouplementsHooks = ResourceHooks<Accouplements>;
pub type MisesBasHooks = ResourceHooks<MisesBas>;
pub type VentesHooks = ResourceHooks<Ventes>;
pub type SoinsHooks = ResourceHooks<Soins>;
pub type VaccinsHooks = ResourceHooks<Vaccins>;
pub type StocksHooks = ResourceHooks<Stocks>;
pub type EmployesHooks = ResourceHooks<Employes>;
pub type DepensesHooks = ResourceHooks<Depenses>;
pub type ComptesTresorerieHooks = ResourceHooks<ComptesTresorerie>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_keys_extend_collection_key() {
        assert_eq!(Lapins::item_key(4), query_key!["/api/lapins", 4]);
        assert!(Lapins::item_key(4).starts_with(&Lapins::list_key()));
        assert_eq!(Stocks::item_path(9), "/api/stocks/9");
    }

    #[test]
    fn lapin_writes_invalidate_genealogy_and_enclos() {
        let keys = Lapins::write_invalidations();
        assert_eq!(keys[0], query_key!["/api/lapins"]);
        assert!(keys.contains(&query_key!["lapin"]));
        assert!(keys.contains(&query_key!["/api/enclos"]));
    }

    #[test]
    fn financial_writes_invalidate_treasury() {
        let treasury = ComptesTresorerie::list_key();
        assert!(Ventes::write_invalidations().contains(&treasury));
        assert!(Depenses::write_invalidations().contains(&treasury));
        assert!(!Stocks::write_invalidations().contains(&treasury));
    }
}
