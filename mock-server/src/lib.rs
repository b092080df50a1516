use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@petfriends.test";
pub const DEMO_PASSWORD: &str = "demo-password";
pub const NEIGHBOUR_EMAIL: &str = "neighbour@petfriends.test";
pub const NEIGHBOUR_PASSWORD: &str = "neighbour-password";

/// Filter value that narrows `GET /api/pets` to the caller's own pets.
pub const MY_PETS_FILTER: &str = "my_pets";

const FORBIDDEN_PAGE: &str = "<!doctype html>\n<title>403 Forbidden</title>\n<h1>Forbidden</h1>\n<p>This user wasn't found in database</p>\n";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

#[derive(Deserialize)]
pub struct UpdatePet {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

struct Account {
    email: String,
    password: String,
    key: String,
    user_id: String,
}

/// Accounts plus pets, newest pet first.
pub struct Store {
    accounts: Vec<Account>,
    pets: Vec<Pet>,
}

type ApiError = (StatusCode, String);

pub type Db = Arc<RwLock<Store>>;

impl Store {
    /// Demo account with no pets and a neighbour account owning one pet.
    pub fn seeded() -> Self {
        let demo = Account::new(DEMO_EMAIL, DEMO_PASSWORD);
        let neighbour = Account::new(NEIGHBOUR_EMAIL, NEIGHBOUR_PASSWORD);
        let sharik = Pet {
            id: new_id(),
            name: "Sharik".to_string(),
            animal_type: "dog".to_string(),
            age: "5".to_string(),
            pet_photo: String::new(),
            user_id: neighbour.user_id.clone(),
        };
        Self {
            accounts: vec![demo, neighbour],
            pets: vec![sharik],
        }
    }

    /// Resolve the `auth_key` header to a user id.
    fn authorize(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let key = header_value(headers, "auth_key").ok_or_else(forbidden)?;
        self.accounts
            .iter()
            .find(|account| account.key == key)
            .map(|account| account.user_id.clone())
            .ok_or_else(forbidden)
    }

    fn owned_pet_index(&self, id: &str, user_id: &str) -> Result<usize, ApiError> {
        let index = self
            .pets
            .iter()
            .position(|pet| pet.id == id)
            .ok_or((StatusCode::NOT_FOUND, format!("Pet {id} not found")))?;
        if self.pets[index].user_id != user_id {
            return Err((StatusCode::FORBIDDEN, format!("Pet {id} belongs to another user")));
        }
        Ok(index)
    }
}

impl Account {
    fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            key: new_id(),
            user_id: new_id(),
        }
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<ApiKey>, ApiError> {
    let email = header_value(&headers, "email");
    let password = header_value(&headers, "password");
    let store = db.read().await;
    store
        .accounts
        .iter()
        .find(|account| Some(account.email.as_str()) == email && Some(account.password.as_str()) == password)
        .map(|account| Json(ApiKey { key: account.key.clone() }))
        .ok_or_else(forbidden)
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetList>, ApiError> {
    let store = db.read().await;
    let user_id = store.authorize(&headers)?;
    let pets = store
        .pets
        .iter()
        .filter(|pet| query.filter != MY_PETS_FILTER || pet.user_id == user_id)
        .cloned()
        .collect();
    Ok(Json(PetList { pets }))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Pet>, ApiError> {
    let user_id = db.read().await.authorize(&headers)?;

    let mut fields = HashMap::new();
    let mut photo = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(bad_request)?;
            photo = Some(format!("data:{content_type};base64,{}", STANDARD.encode(&bytes)));
        } else {
            let value = field.text().await.map_err(bad_request)?;
            fields.insert(name, value);
        }
    }

    let pet = Pet {
        id: new_id(),
        name: required(fields.remove("name"), "name")?,
        animal_type: required(fields.remove("animal_type"), "animal_type")?,
        age: required(fields.remove("age"), "age")?,
        pet_photo: required(photo, "pet_photo")?,
        user_id,
    };
    log::info!("created pet {} ({})", pet.id, pet.name);
    db.write().await.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(input): Form<UpdatePet>,
) -> Result<Json<Pet>, ApiError> {
    let mut store = db.write().await;
    let user_id = store.authorize(&headers)?;
    let index = store.owned_pet_index(&id, &user_id)?;
    let name = required(input.name, "name")?;
    let animal_type = required(input.animal_type, "animal_type")?;
    let age = required(input.age, "age")?;

    let pet = &mut store.pets[index];
    pet.name = name;
    pet.animal_type = animal_type;
    pet.age = age;
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    let user_id = store.authorize(&headers)?;
    let index = store.owned_pet_index(&id, &user_id)?;
    store.pets.remove(index);
    log::info!("deleted pet {id}");
    Ok(StatusCode::OK)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| (StatusCode::BAD_REQUEST, format!("missing field `{field}`")))
}

fn forbidden() -> ApiError {
    (StatusCode::FORBIDDEN, FORBIDDEN_PAGE.to_string())
}

fn bad_request(err: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pet_serializes_with_snake_case_fields() {
        let pet = Pet {
            id: "1".to_string(),
            name: "Rex".to_string(),
            animal_type: "dog".to_string(),
            age: "2".to_string(),
            pet_photo: String::new(),
            user_id: "u".to_string(),
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["animal_type"], "dog");
        assert_eq!(json["pet_photo"], "");
        assert_eq!(json["age"], "2");
    }

    #[test]
    fn list_query_defaults_filter_to_empty() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.filter, "");
    }

    #[test]
    fn seeded_store_has_neighbour_pet_only() {
        let store = Store::seeded();
        assert_eq!(store.accounts.len(), 2);
        assert_eq!(store.pets.len(), 1);
        assert_eq!(store.pets[0].user_id, store.accounts[1].user_id);
    }

    #[test]
    fn authorize_rejects_unknown_key() {
        let store = Store::seeded();
        let mut headers = HeaderMap::new();
        headers.insert("auth_key", "nope".parse().unwrap());
        let (status, body) = store.authorize(&headers).unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("403 Forbidden"));
    }

    #[test]
    fn owned_pet_index_distinguishes_missing_and_foreign() {
        let store = Store::seeded();
        let demo_user = store.accounts[0].user_id.clone();
        let sharik = store.pets[0].id.clone();

        let (status, _) = store.owned_pet_index("missing", &demo_user).unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = store.owned_pet_index(&sharik, &demo_user).unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(store.owned_pet_index(&sharik, &store.accounts[1].user_id).unwrap(), 0);
    }
}
