//! Transport mappings for the five entity resources.
//!
//! Each resource declares the field allowlist it exposes: foreign keys are
//! identifiers, many-to-many fields are identifier lists validated against
//! existing rows. Timestamps are server-controlled: set at creation, not
//! refreshed on update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::resource::RestResource;
use crate::domain::{Address, Certificate, Coach, Gym, Subscription};
use crate::error::AppError;
use crate::store::Database;
use crate::validate::FieldError;

fn unresolved(field: &'static str, id: Uuid) -> AppError {
    AppError::Validation(FieldError::new(
        field,
        format!("object with id {id} does not exist"),
    ))
}

// ---- gym ----

#[derive(Debug, Deserialize)]
pub struct GymPayload {
    pub gym_name: String,
    #[serde(default)]
    pub address: Option<Uuid>,
    #[serde(default)]
    pub coaches: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GymRepr {
    pub id: Uuid,
    pub gym_name: String,
    pub address: Option<Uuid>,
    pub coaches: Vec<Uuid>,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
}

impl GymRepr {
    fn project(db: &Database, gym: &Gym) -> Self {
        Self {
            id: gym.id,
            gym_name: gym.gym_name.clone(),
            address: gym.address,
            coaches: db.coach_ids_of_gym(gym.id),
            created_datetime: gym.created_datetime,
            modified_datetime: gym.modified_datetime,
        }
    }
}

fn resolve_gym_refs(db: &Database, payload: &GymPayload) -> Result<(), AppError> {
    if let Some(address) = payload.address {
        if !db.has_address(address) {
            return Err(unresolved("address", address));
        }
    }
    for coach in &payload.coaches {
        if !db.has_coach(*coach) {
            return Err(unresolved("coaches", *coach));
        }
    }
    Ok(())
}

pub struct GymResource;

impl RestResource for GymResource {
    const NAME: &'static str = "gym";
    type Payload = GymPayload;
    type Repr = GymRepr;

    fn list(db: &Database) -> Vec<GymRepr> {
        db.gyms().map(|gym| GymRepr::project(db, gym)).collect()
    }

    fn retrieve(db: &Database, id: Uuid) -> Result<GymRepr, AppError> {
        let gym = db.gym(id).ok_or(AppError::NotFound("gym"))?;
        Ok(GymRepr::project(db, gym))
    }

    fn create(db: &mut Database, payload: GymPayload) -> Result<GymRepr, AppError> {
        resolve_gym_refs(db, &payload)?;
        let gym = Gym::new(payload.gym_name, payload.address);
        gym.validate()?;
        let id = gym.id;
        db.insert_gym(gym);
        db.set_gym_coaches(id, &payload.coaches);
        Self::retrieve(db, id)
    }

    fn update(db: &mut Database, id: Uuid, payload: GymPayload) -> Result<GymRepr, AppError> {
        resolve_gym_refs(db, &payload)?;
        {
            let gym = db.gym_mut(id).ok_or(AppError::NotFound("gym"))?;
            let mut updated = gym.clone();
            updated.gym_name = payload.gym_name;
            updated.address = payload.address;
            updated.validate()?;
            *gym = updated;
        }
        db.set_gym_coaches(id, &payload.coaches);
        Self::retrieve(db, id)
    }

    fn delete(db: &mut Database, id: Uuid) -> Result<(), AppError> {
        if db.delete_gym(id) {
            Ok(())
        } else {
            Err(AppError::NotFound("gym"))
        }
    }
}

// ---- coach ----

#[derive(Debug, Deserialize)]
pub struct CoachPayload {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    #[serde(default)]
    pub gyms: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CoachRepr {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub gyms: Vec<Uuid>,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
}

impl CoachRepr {
    fn project(db: &Database, coach: &Coach) -> Self {
        Self {
            id: coach.id,
            first_name: coach.first_name.clone(),
            last_name: coach.last_name.clone(),
            specialization: coach.specialization.clone(),
            gyms: db.gym_ids_of_coach(coach.id),
            created_datetime: coach.created_datetime,
            modified_datetime: coach.modified_datetime,
        }
    }
}

pub struct CoachResource;

impl RestResource for CoachResource {
    const NAME: &'static str = "coach";
    type Payload = CoachPayload;
    type Repr = CoachRepr;

    fn list(db: &Database) -> Vec<CoachRepr> {
        db.coaches()
            .map(|coach| CoachRepr::project(db, coach))
            .collect()
    }

    fn retrieve(db: &Database, id: Uuid) -> Result<CoachRepr, AppError> {
        let coach = db.coach(id).ok_or(AppError::NotFound("coach"))?;
        Ok(CoachRepr::project(db, coach))
    }

    fn create(db: &mut Database, payload: CoachPayload) -> Result<CoachRepr, AppError> {
        for gym in &payload.gyms {
            if !db.has_gym(*gym) {
                return Err(unresolved("gyms", *gym));
            }
        }
        let coach = Coach::new(payload.first_name, payload.last_name, payload.specialization);
        coach.validate()?;
        let id = coach.id;
        db.insert_coach(coach);
        db.set_coach_gyms(id, &payload.gyms);
        Self::retrieve(db, id)
    }

    fn update(db: &mut Database, id: Uuid, payload: CoachPayload) -> Result<CoachRepr, AppError> {
        for gym in &payload.gyms {
            if !db.has_gym(*gym) {
                return Err(unresolved("gyms", *gym));
            }
        }
        {
            let coach = db.coach_mut(id).ok_or(AppError::NotFound("coach"))?;
            let mut updated = coach.clone();
            updated.first_name = payload.first_name;
            updated.last_name = payload.last_name;
            updated.specialization = payload.specialization;
            updated.validate()?;
            *coach = updated;
        }
        db.set_coach_gyms(id, &payload.gyms);
        Self::retrieve(db, id)
    }

    fn delete(db: &mut Database, id: Uuid) -> Result<(), AppError> {
        if db.delete_coach(id) {
            Ok(())
        } else {
            Err(AppError::NotFound("coach"))
        }
    }
}

// ---- address ----

#[derive(Debug, Deserialize)]
pub struct AddressPayload {
    pub city_name: String,
    pub street_name: String,
    pub house_number: i64,
    #[serde(default)]
    pub apartment_number: Option<i64>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddressRepr {
    pub id: Uuid,
    pub city_name: String,
    pub street_name: String,
    pub house_number: i64,
    pub apartment_number: Option<i64>,
    pub body: Option<String>,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
}

impl From<&Address> for AddressRepr {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            city_name: address.city_name.clone(),
            street_name: address.street_name.clone(),
            house_number: address.house_number,
            apartment_number: address.apartment_number,
            body: address.body.clone(),
            created_datetime: address.created_datetime,
            modified_datetime: address.modified_datetime,
        }
    }
}

pub struct AddressResource;

impl RestResource for AddressResource {
    const NAME: &'static str = "address";
    type Payload = AddressPayload;
    type Repr = AddressRepr;

    fn list(db: &Database) -> Vec<AddressRepr> {
        db.addresses().map(AddressRepr::from).collect()
    }

    fn retrieve(db: &Database, id: Uuid) -> Result<AddressRepr, AppError> {
        db.address(id)
            .map(AddressRepr::from)
            .ok_or(AppError::NotFound("address"))
    }

    fn create(db: &mut Database, payload: AddressPayload) -> Result<AddressRepr, AppError> {
        let address = Address::new(
            payload.city_name,
            payload.street_name,
            payload.house_number,
            payload.apartment_number,
            payload.body,
        );
        address.validate()?;
        let repr = AddressRepr::from(&address);
        db.insert_address(address);
        Ok(repr)
    }

    fn update(
        db: &mut Database,
        id: Uuid,
        payload: AddressPayload,
    ) -> Result<AddressRepr, AppError> {
        let address = db.address_mut(id).ok_or(AppError::NotFound("address"))?;
        let mut updated = address.clone();
        updated.city_name = payload.city_name;
        updated.street_name = payload.street_name;
        updated.house_number = payload.house_number;
        updated.apartment_number = payload.apartment_number;
        updated.body = payload.body;
        updated.validate()?;
        *address = updated;
        Ok(AddressRepr::from(&*address))
    }

    fn delete(db: &mut Database, id: Uuid) -> Result<(), AppError> {
        if db.delete_address(id) {
            Ok(())
        } else {
            Err(AppError::NotFound("address"))
        }
    }
}

// ---- certificate ----

#[derive(Debug, Deserialize)]
pub struct CertificatePayload {
    pub coach: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CertificateRepr {
    pub id: Uuid,
    pub coach: Uuid,
    pub name: String,
    pub description: String,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
}

impl From<&Certificate> for CertificateRepr {
    fn from(certificate: &Certificate) -> Self {
        Self {
            id: certificate.id,
            coach: certificate.coach,
            name: certificate.name.clone(),
            description: certificate.description.clone(),
            created_datetime: certificate.created_datetime,
            modified_datetime: certificate.modified_datetime,
        }
    }
}

pub struct CertificateResource;

impl RestResource for CertificateResource {
    const NAME: &'static str = "certificate";
    type Payload = CertificatePayload;
    type Repr = CertificateRepr;

    fn list(db: &Database) -> Vec<CertificateRepr> {
        db.certificates().map(CertificateRepr::from).collect()
    }

    fn retrieve(db: &Database, id: Uuid) -> Result<CertificateRepr, AppError> {
        db.certificate(id)
            .map(CertificateRepr::from)
            .ok_or(AppError::NotFound("certificate"))
    }

    fn create(db: &mut Database, payload: CertificatePayload) -> Result<CertificateRepr, AppError> {
        if !db.has_coach(payload.coach) {
            return Err(unresolved("coach", payload.coach));
        }
        let certificate = Certificate::new(payload.coach, payload.name, payload.description);
        certificate.validate()?;
        let repr = CertificateRepr::from(&certificate);
        db.insert_certificate(certificate);
        Ok(repr)
    }

    fn update(
        db: &mut Database,
        id: Uuid,
        payload: CertificatePayload,
    ) -> Result<CertificateRepr, AppError> {
        if !db.has_coach(payload.coach) {
            return Err(unresolved("coach", payload.coach));
        }
        let certificate = db
            .certificate_mut(id)
            .ok_or(AppError::NotFound("certificate"))?;
        let mut updated = certificate.clone();
        updated.coach = payload.coach;
        updated.name = payload.name;
        updated.description = payload.description;
        updated.validate()?;
        *certificate = updated;
        Ok(CertificateRepr::from(&*certificate))
    }

    fn delete(db: &mut Database, id: Uuid) -> Result<(), AppError> {
        if db.delete_certificate(id) {
            Ok(())
        } else {
            Err(AppError::NotFound("certificate"))
        }
    }
}

// ---- subscription ----

#[derive(Debug, Deserialize)]
pub struct SubscriptionPayload {
    pub price: i64,
    pub expire_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub gym: Uuid,
    #[serde(default)]
    pub clients: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionRepr {
    pub id: Uuid,
    pub price: i64,
    pub expire_date: NaiveDate,
    pub description: Option<String>,
    pub gym: Uuid,
    pub clients: Vec<Uuid>,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
}

impl SubscriptionRepr {
    fn project(db: &Database, subscription: &Subscription) -> Self {
        Self {
            id: subscription.id,
            price: subscription.price,
            expire_date: subscription.expire_date,
            description: subscription.description.clone(),
            gym: subscription.gym,
            clients: db.client_ids_of_subscription(subscription.id),
            created_datetime: subscription.created_datetime,
            modified_datetime: subscription.modified_datetime,
        }
    }
}

fn resolve_subscription_refs(db: &Database, payload: &SubscriptionPayload) -> Result<(), AppError> {
    if !db.has_gym(payload.gym) {
        return Err(unresolved("gym", payload.gym));
    }
    for client in &payload.clients {
        if !db.has_client(*client) {
            return Err(unresolved("clients", *client));
        }
    }
    Ok(())
}

pub struct SubscriptionResource;

impl RestResource for SubscriptionResource {
    const NAME: &'static str = "subscription";
    type Payload = SubscriptionPayload;
    type Repr = SubscriptionRepr;

    fn list(db: &Database) -> Vec<SubscriptionRepr> {
        db.subscriptions()
            .map(|sub| SubscriptionRepr::project(db, sub))
            .collect()
    }

    fn retrieve(db: &Database, id: Uuid) -> Result<SubscriptionRepr, AppError> {
        let sub = db.subscription(id).ok_or(AppError::NotFound("subscription"))?;
        Ok(SubscriptionRepr::project(db, sub))
    }

    fn create(db: &mut Database, payload: SubscriptionPayload) -> Result<SubscriptionRepr, AppError> {
        resolve_subscription_refs(db, &payload)?;
        let subscription = Subscription::new(
            payload.gym,
            payload.price,
            payload.expire_date,
            payload.description.clone(),
        );
        subscription.validate()?;
        let id = subscription.id;
        db.insert_subscription(subscription);
        db.set_subscription_clients(id, &payload.clients);
        Self::retrieve(db, id)
    }

    fn update(
        db: &mut Database,
        id: Uuid,
        payload: SubscriptionPayload,
    ) -> Result<SubscriptionRepr, AppError> {
        resolve_subscription_refs(db, &payload)?;
        {
            let subscription = db
                .subscription_mut(id)
                .ok_or(AppError::NotFound("subscription"))?;
            let mut updated = subscription.clone();
            updated.price = payload.price;
            updated.expire_date = payload.expire_date;
            updated.description = payload.description.clone();
            updated.gym = payload.gym;
            updated.validate()?;
            *subscription = updated;
        }
        db.set_subscription_clients(id, &payload.clients);
        Self::retrieve(db, id)
    }

    fn delete(db: &mut Database, id: Uuid) -> Result<(), AppError> {
        if db.delete_subscription(id) {
            Ok(())
        } else {
            Err(AppError::NotFound("subscription"))
        }
    }
}
