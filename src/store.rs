//! In-process relational store.
//!
//! `Database` owns every entity table plus the two join-row sets. Callers go
//! through [`crate::state::AppState`], which wraps the whole database in one
//! `RwLock`; holding the write guard across a business operation is what
//! makes `subscribe` a single atomic read-check-write.
//!
//! Cascade rules mirror the ownership tree: Address -> Gym -> GymCoach and
//! Subscription -> ClientSub, Coach -> Certificate and GymCoach,
//! Client -> ClientSub.

use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Address, Certificate, Client, Coach, Gym, Subscription};
use crate::validate::{FieldError, check_money};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("subscription does not exist")]
    UnknownSubscription,
    #[error("client does not exist")]
    UnknownClient,
    #[error("client already holds this subscription")]
    AlreadyHeld,
    #[error("insufficient funds")]
    InsufficientFunds,
}

#[derive(Debug, Default)]
pub struct Database {
    addresses: IndexMap<Uuid, Address>,
    gyms: IndexMap<Uuid, Gym>,
    coaches: IndexMap<Uuid, Coach>,
    certificates: IndexMap<Uuid, Certificate>,
    clients: IndexMap<Uuid, Client>,
    subscriptions: IndexMap<Uuid, Subscription>,
    /// (gym, coach) pairs; set membership enforces pair uniqueness.
    gym_coach: IndexSet<(Uuid, Uuid)>,
    /// (subscription, client) pairs; a client cannot hold the same
    /// subscription twice.
    client_sub: IndexSet<(Uuid, Uuid)>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- addresses ----

    pub fn insert_address(&mut self, address: Address) {
        self.addresses.insert(address.id, address);
    }

    pub fn address(&self, id: Uuid) -> Option<&Address> {
        self.addresses.get(&id)
    }

    pub fn address_mut(&mut self, id: Uuid) -> Option<&mut Address> {
        self.addresses.get_mut(&id)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.addresses.values()
    }

    pub fn has_address(&self, id: Uuid) -> bool {
        self.addresses.contains_key(&id)
    }

    /// Deleting an address cascades into every gym that references it.
    pub fn delete_address(&mut self, id: Uuid) -> bool {
        if self.addresses.shift_remove(&id).is_none() {
            return false;
        }
        let orphaned: Vec<Uuid> = self
            .gyms
            .values()
            .filter(|gym| gym.address == Some(id))
            .map(|gym| gym.id)
            .collect();
        for gym_id in orphaned {
            self.delete_gym(gym_id);
        }
        true
    }

    // ---- gyms ----

    pub fn insert_gym(&mut self, gym: Gym) {
        self.gyms.insert(gym.id, gym);
    }

    pub fn gym(&self, id: Uuid) -> Option<&Gym> {
        self.gyms.get(&id)
    }

    pub fn gym_mut(&mut self, id: Uuid) -> Option<&mut Gym> {
        self.gyms.get_mut(&id)
    }

    pub fn gyms(&self) -> impl Iterator<Item = &Gym> {
        self.gyms.values()
    }

    pub fn has_gym(&self, id: Uuid) -> bool {
        self.gyms.contains_key(&id)
    }

    pub fn delete_gym(&mut self, id: Uuid) -> bool {
        if self.gyms.shift_remove(&id).is_none() {
            return false;
        }
        self.gym_coach.retain(|(gym, _)| *gym != id);
        let owned: Vec<Uuid> = self
            .subscriptions
            .values()
            .filter(|sub| sub.gym == id)
            .map(|sub| sub.id)
            .collect();
        for sub_id in owned {
            self.delete_subscription(sub_id);
        }
        true
    }

    // ---- coaches ----

    pub fn insert_coach(&mut self, coach: Coach) {
        self.coaches.insert(coach.id, coach);
    }

    pub fn coach(&self, id: Uuid) -> Option<&Coach> {
        self.coaches.get(&id)
    }

    pub fn coach_mut(&mut self, id: Uuid) -> Option<&mut Coach> {
        self.coaches.get_mut(&id)
    }

    pub fn coaches(&self) -> impl Iterator<Item = &Coach> {
        self.coaches.values()
    }

    pub fn has_coach(&self, id: Uuid) -> bool {
        self.coaches.contains_key(&id)
    }

    pub fn delete_coach(&mut self, id: Uuid) -> bool {
        if self.coaches.shift_remove(&id).is_none() {
            return false;
        }
        self.gym_coach.retain(|(_, coach)| *coach != id);
        self.certificates.retain(|_, cert| cert.coach != id);
        true
    }

    // ---- certificates ----

    pub fn insert_certificate(&mut self, certificate: Certificate) {
        self.certificates.insert(certificate.id, certificate);
    }

    pub fn certificate(&self, id: Uuid) -> Option<&Certificate> {
        self.certificates.get(&id)
    }

    pub fn certificate_mut(&mut self, id: Uuid) -> Option<&mut Certificate> {
        self.certificates.get_mut(&id)
    }

    pub fn certificates(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.values()
    }

    pub fn delete_certificate(&mut self, id: Uuid) -> bool {
        self.certificates.shift_remove(&id).is_some()
    }

    pub fn certificates_of_coach(&self, coach: Uuid) -> Vec<&Certificate> {
        self.certificates
            .values()
            .filter(|cert| cert.coach == coach)
            .collect()
    }

    // ---- clients ----

    /// Inserts a client, enforcing one client row per identity principal.
    /// When a row for the same principal already exists, that row wins and
    /// its id is returned instead.
    pub fn insert_client(&mut self, client: Client) -> Uuid {
        if let Some(existing) = self.client_by_user(client.user) {
            return existing.id;
        }
        let id = client.id;
        self.clients.insert(id, client);
        id
    }

    pub fn client(&self, id: Uuid) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn has_client(&self, id: Uuid) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn client_by_user(&self, user: Uuid) -> Option<&Client> {
        self.clients.values().find(|client| client.user == user)
    }

    pub fn delete_client(&mut self, id: Uuid) -> bool {
        if self.clients.shift_remove(&id).is_none() {
            return false;
        }
        self.client_sub.retain(|(_, client)| *client != id);
        true
    }

    // ---- subscriptions ----

    pub fn insert_subscription(&mut self, subscription: Subscription) {
        self.subscriptions.insert(subscription.id, subscription);
    }

    pub fn subscription(&self, id: Uuid) -> Option<&Subscription> {
        self.subscriptions.get(&id)
    }

    pub fn subscription_mut(&mut self, id: Uuid) -> Option<&mut Subscription> {
        self.subscriptions.get_mut(&id)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    pub fn delete_subscription(&mut self, id: Uuid) -> bool {
        if self.subscriptions.shift_remove(&id).is_none() {
            return false;
        }
        self.client_sub.retain(|(sub, _)| *sub != id);
        true
    }

    pub fn subscriptions_of_gym(&self, gym: Uuid) -> Vec<&Subscription> {
        self.subscriptions
            .values()
            .filter(|sub| sub.gym == gym)
            .collect()
    }

    // ---- gym/coach links ----

    /// Inserts the (gym, coach) pair; returns false when it already existed.
    pub fn link_gym_coach(&mut self, gym: Uuid, coach: Uuid) -> bool {
        self.gym_coach.insert((gym, coach))
    }

    /// Replaces the coach set of a gym.
    pub fn set_gym_coaches(&mut self, gym: Uuid, coaches: &[Uuid]) {
        self.gym_coach.retain(|(g, _)| *g != gym);
        for coach in coaches {
            self.gym_coach.insert((gym, *coach));
        }
    }

    /// Replaces the gym set of a coach.
    pub fn set_coach_gyms(&mut self, coach: Uuid, gyms: &[Uuid]) {
        self.gym_coach.retain(|(_, c)| *c != coach);
        for gym in gyms {
            self.gym_coach.insert((*gym, coach));
        }
    }

    pub fn coaches_of_gym(&self, gym: Uuid) -> Vec<&Coach> {
        self.gym_coach
            .iter()
            .filter(|(g, _)| *g == gym)
            .filter_map(|(_, c)| self.coaches.get(c))
            .collect()
    }

    pub fn coach_ids_of_gym(&self, gym: Uuid) -> Vec<Uuid> {
        self.gym_coach
            .iter()
            .filter(|(g, _)| *g == gym)
            .map(|(_, c)| *c)
            .collect()
    }

    pub fn gyms_of_coach(&self, coach: Uuid) -> Vec<&Gym> {
        self.gym_coach
            .iter()
            .filter(|(_, c)| *c == coach)
            .filter_map(|(g, _)| self.gyms.get(g))
            .collect()
    }

    pub fn gym_ids_of_coach(&self, coach: Uuid) -> Vec<Uuid> {
        self.gym_coach
            .iter()
            .filter(|(_, c)| *c == coach)
            .map(|(g, _)| *g)
            .collect()
    }

    // ---- client/subscription links ----

    pub fn holds_subscription(&self, client: Uuid, subscription: Uuid) -> bool {
        self.client_sub.contains(&(subscription, client))
    }

    /// Replaces the client set of a subscription.
    pub fn set_subscription_clients(&mut self, subscription: Uuid, clients: &[Uuid]) {
        self.client_sub.retain(|(s, _)| *s != subscription);
        for client in clients {
            self.client_sub.insert((subscription, *client));
        }
    }

    pub fn client_ids_of_subscription(&self, subscription: Uuid) -> Vec<Uuid> {
        self.client_sub
            .iter()
            .filter(|(s, _)| *s == subscription)
            .map(|(_, c)| *c)
            .collect()
    }

    pub fn subscriptions_of_client(&self, client: Uuid) -> Vec<&Subscription> {
        self.client_sub
            .iter()
            .filter(|(_, c)| *c == client)
            .filter_map(|(s, _)| self.subscriptions.get(s))
            .collect()
    }

    pub fn subscription_ids_of_client(&self, client: Uuid) -> Vec<Uuid> {
        self.client_sub
            .iter()
            .filter(|(_, c)| *c == client)
            .map(|(s, _)| *s)
            .collect()
    }

    // ---- business operations ----

    /// Adds a deposit to a client's balance. The amount must be strictly
    /// positive and the resulting balance must stay inside the money range.
    pub fn add_funds(&mut self, client: Uuid, amount: Decimal) -> Result<Decimal, FieldError> {
        let client = self
            .clients
            .get_mut(&client)
            .ok_or_else(|| FieldError::new("client", "client does not exist"))?;
        if amount <= Decimal::ZERO {
            return Err(FieldError::new(
                "money",
                "you can only add positive amount of money!",
            ));
        }
        let updated = client.net_worth + amount;
        check_money("money", updated)?;
        client.net_worth = updated;
        Ok(client.net_worth)
    }

    /// Debits the subscription price from the client and grants membership.
    ///
    /// Runs as one step under the caller's write guard, so the balance check
    /// cannot be interleaved with another debit. Duplicate membership is
    /// rejected before any money moves.
    pub fn subscribe(&mut self, client_id: Uuid, sub_id: Uuid) -> Result<(), SubscribeError> {
        let price = self
            .subscriptions
            .get(&sub_id)
            .ok_or(SubscribeError::UnknownSubscription)?
            .price_decimal();
        if self.client_sub.contains(&(sub_id, client_id)) {
            return Err(SubscribeError::AlreadyHeld);
        }
        let client = self
            .clients
            .get_mut(&client_id)
            .ok_or(SubscribeError::UnknownClient)?;
        if client.net_worth < price {
            return Err(SubscribeError::InsufficientFunds);
        }
        client.net_worth -= price;
        self.client_sub.insert((sub_id, client_id));
        Ok(())
    }
}
