//! Stateless request builder and response normalizer for the Pet Friends API.
//!
//! # Design
//! `PetFriendsClient` holds only the base URL and carries no mutable state
//! between calls. Each operation has a `build_*` method producing an
//! `HttpRequest`; every response goes through the same `parse_response`
//! normalization. The caller executes the HTTP round-trip in between.

use url::Url;

use crate::body::{ApiResponse, ResponseBody};
use crate::error::ClientError;
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse, MultipartBody, RequestBody};
use crate::types::{Credentials, NewPet, PetPhoto, PetUpdate};

const AUTH_KEY_HEADER: &str = "auth_key";
const CONTENT_TYPE_HEADER: &str = "content-type";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Builds Pet Friends requests without touching the network.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: Url,
}

impl PetFriendsClient {
    /// Accepts the base with or without a trailing slash; API paths are
    /// resolved relative to it.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_authenticate(&self, email: &str, password: &str) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.base_url.join("api/key")?.into(),
            headers: vec![
                ("email".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ],
            body: None,
        })
    }

    /// `filter` is always sent, even when empty.
    pub fn build_list_pets(&self, credentials: &Credentials, filter: &str) -> Result<HttpRequest, ClientError> {
        let mut url = self.base_url.join("api/pets")?;
        url.query_pairs_mut().append_pair("filter", filter);
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![auth_header(credentials)],
            body: None,
        })
    }

    /// Multipart upload of the text fields plus the photo, labelled JPEG
    /// whatever its actual format.
    ///
    /// No content-type header is set here: the executor streams the photo
    /// from disk and supplies the boundary it generates.
    pub fn build_add_pet(
        &self,
        credentials: &Credentials,
        pet: &NewPet,
        photo: &PetPhoto,
    ) -> Result<HttpRequest, ClientError> {
        let form = MultipartBody {
            fields: vec![
                ("name".to_string(), pet.name.clone()),
                ("animal_type".to_string(), pet.animal_type.clone()),
                ("age".to_string(), pet.age.clone()),
            ],
            file: FilePart {
                name: "pet_photo".to_string(),
                path: photo.path.clone(),
                file_name: photo.file_name.clone(),
                content_type: PHOTO_CONTENT_TYPE.to_string(),
            },
        };
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.base_url.join("api/pets")?.into(),
            headers: vec![auth_header(credentials)],
            body: Some(RequestBody::Multipart(form)),
        })
    }

    pub fn build_delete_pet(&self, credentials: &Credentials, pet_id: &str) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.pet_url(pet_id)?.into(),
            headers: vec![auth_header(credentials)],
            body: None,
        })
    }

    /// Form-encoded `name`, `age`, `animal_type`, in that order.
    pub fn build_update_pet(
        &self,
        credentials: &Credentials,
        pet_id: &str,
        update: &PetUpdate,
    ) -> Result<HttpRequest, ClientError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("name", &update.name)
            .append_pair("age", &update.age)
            .append_pair("animal_type", &update.animal_type)
            .finish();
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.pet_url(pet_id)?.into(),
            headers: vec![
                auth_header(credentials),
                (CONTENT_TYPE_HEADER.to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(RequestBody::Bytes(body.into_bytes())),
        })
    }

    /// Normalize any response: JSON when the body parses, raw text otherwise.
    /// The status code is passed through uninterpreted.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::normalize(response.body),
        }
    }

    fn pet_url(&self, pet_id: &str) -> Result<Url, ClientError> {
        let path = format!("api/pets/{}", urlencoding::encode(pet_id));
        Ok(self.base_url.join(&path)?)
    }
}

fn auth_header(credentials: &Credentials) -> (String, String) {
    (AUTH_KEY_HEADER.to_string(), credentials.key.clone())
}
