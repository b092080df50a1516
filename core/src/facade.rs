//! Blocking facade over `PetFriendsClient`.
//!
//! # Design
//! `PetFriends` pairs the pure request builder with one `ureq::Agent` and
//! runs each operation as build, execute, normalize. The agent is configured
//! to hand back 4xx/5xx responses as data so status interpretation stays with
//! the caller. Nothing is retried.

use std::fmt;
use std::path::Path;

use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::unversioned::multipart::{Form, Part};
use ureq::{Body, RequestBuilder};

use crate::body::ApiResponse;
use crate::client::PetFriendsClient;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartBody, RequestBody};
use crate::types::{Credentials, NewPet, PetPhoto, PetUpdate};

/// Public Pet Friends deployment.
pub const DEFAULT_BASE_URL: &str = "https://petfriends1.herokuapp.com/";

/// Environment variable read by `PetFriends::from_env`.
pub const BASE_URL_ENV: &str = "PETFRIENDS_BASE_URL";

/// Synchronous Pet Friends API client.
///
/// Holds no mutable state; share it across threads freely.
#[derive(Clone)]
pub struct PetFriends {
    client: PetFriendsClient,
    agent: ureq::Agent,
}

impl fmt::Debug for PetFriends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PetFriends")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl PetFriends {
    /// Client for [`DEFAULT_BASE_URL`].
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Ok(Self {
            client: PetFriendsClient::new(base_url)?,
            agent,
        })
    }

    /// Uses `PETFRIENDS_BASE_URL` when set and non-empty, the default otherwise.
    pub fn from_env() -> Result<Self, ClientError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::new(),
        }
    }

    pub fn client(&self) -> &PetFriendsClient {
        &self.client
    }

    /// `GET api/key`. A successful body is a JSON object with a `key` field;
    /// see [`Credentials::from_response`].
    pub fn authenticate(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        let request = self.client.build_authenticate(email, password)?;
        self.send(request)
    }

    /// `GET api/pets`. An empty filter lists every pet, `"my_pets"` only the
    /// caller's.
    pub fn list_pets(&self, credentials: &Credentials, filter: &str) -> Result<ApiResponse, ClientError> {
        let request = self.client.build_list_pets(credentials, filter)?;
        self.send(request)
    }

    /// `POST api/pets` with the photo at `photo_path` uploaded as JPEG.
    ///
    /// The path is sent unchanged as the multipart file name. The file is
    /// opened before the request starts and streamed into the body, then
    /// closed once the request completes. An unreadable path returns
    /// [`ClientError::Io`] without any request.
    pub fn add_pet(
        &self,
        credentials: &Credentials,
        name: &str,
        animal_type: &str,
        age: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let photo = PetPhoto::from_path(photo_path);
        let pet = NewPet {
            name: name.to_string(),
            animal_type: animal_type.to_string(),
            age: age.to_string(),
        };
        let request = self.client.build_add_pet(credentials, &pet, &photo)?;
        self.send(request)
    }

    /// `DELETE api/pets/{pet_id}`.
    pub fn delete_pet(&self, credentials: &Credentials, pet_id: &str) -> Result<ApiResponse, ClientError> {
        let request = self.client.build_delete_pet(credentials, pet_id)?;
        self.send(request)
    }

    /// `PUT api/pets/{pet_id}` replacing name, animal type and age.
    pub fn update_pet(
        &self,
        credentials: &Credentials,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ClientError> {
        let update = PetUpdate {
            name: name.to_string(),
            animal_type: animal_type.to_string(),
            age: age.to_string(),
        };
        let request = self.client.build_update_pet(credentials, pet_id, &update)?;
        self.send(request)
    }

    /// Execute a prebuilt request and normalize its response.
    pub fn send(&self, request: HttpRequest) -> Result<ApiResponse, ClientError> {
        let response = self.execute(request)?;
        let parsed = self.client.parse_response(response);
        log::debug!("status {} (json body: {})", parsed.status, parsed.body.is_json());
        Ok(parsed)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        log::debug!("{} {}", request.method, request.url);
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_ref();

        let mut response = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call()?,
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call()?,
            HttpMethod::Post => send_body(with_headers(self.agent.post(url), headers), body)?,
            HttpMethod::Put => send_body(with_headers(self.agent.put(url), headers), body)?,
        };

        // Text bodies declaring another charset arrive here already as UTF-8.
        let status = response.status().as_u16();
        let bytes = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;
        let body = String::from_utf8(bytes).unwrap_or_else(|err| {
            log::debug!("response body is not valid UTF-8: {err}");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        });

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(builder: RequestBuilder<WithBody>, body: Option<&RequestBody>) -> Result<Response<Body>, ClientError> {
    let response = match body {
        None => builder.send_empty()?,
        Some(RequestBody::Bytes(bytes)) => builder.send(&bytes[..])?,
        Some(RequestBody::Multipart(form)) => builder.send(multipart_form(form)?)?,
    };
    Ok(response)
}

/// Opens the file part; ureq generates the boundary and content type.
fn multipart_form(form: &MultipartBody) -> Result<Form<'_>, ClientError> {
    let file = Part::file(&form.file.path)?
        .file_name(&form.file.file_name)
        .mime_str(&form.file.content_type)?;
    let mut multipart = Form::new();
    for (name, value) in &form.fields {
        multipart = multipart.text(name, value);
    }
    Ok(multipart.part(&form.file.name, file))
}
