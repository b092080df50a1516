//! Values forwarded to the Pet Friends API.
//!
//! Pet records themselves are never modeled: the server owns their shape and
//! the client returns whatever JSON it sends. These types only carry inputs.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::body::ApiResponse;

/// Auth token returned by `GET api/key`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Extract the `key` field from an authenticate response.
    ///
    /// Returns `None` unless the body is a JSON object with a non-empty string
    /// `key`. The status code is not consulted.
    pub fn from_response(response: &ApiResponse) -> Option<Self> {
        response
            .body
            .get("key")
            .and_then(|key| key.as_str())
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("key", &"<redacted>").finish()
    }
}

/// Text fields of a pet to create.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

/// Replacement values for an existing pet. All three fields are sent.
#[derive(Debug, Clone)]
pub struct PetUpdate {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

/// Photo file uploaded with a new pet.
///
/// The file is opened only when the request is sent. `file_name` is the
/// multipart `filename` parameter and defaults to the path as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPhoto {
    pub path: PathBuf,
    pub file_name: String,
}

impl PetPhoto {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            path: path.to_path_buf(),
            file_name: path.to_string_lossy().into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ResponseBody;
    use serde_json::json;

    fn response(body: ResponseBody) -> ApiResponse {
        ApiResponse { status: 200, body }
    }

    #[test]
    fn credentials_from_key_object() {
        let creds = Credentials::from_response(&response(ResponseBody::Json(json!({"key": "k-1"}))));
        assert_eq!(creds, Some(Credentials::new("k-1")));
    }

    #[test]
    fn credentials_require_non_empty_string_key() {
        for body in [
            ResponseBody::Json(json!({"key": ""})),
            ResponseBody::Json(json!({"key": 7})),
            ResponseBody::Json(json!(["key"])),
            ResponseBody::Text("This user wasn't found in database".to_string()),
        ] {
            assert!(Credentials::from_response(&response(body)).is_none());
        }
    }

    #[test]
    fn credentials_debug_hides_key() {
        let printed = format!("{:?}", Credentials::new("secret-token"));
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    fn photo_file_name_is_the_path_as_given() {
        let photo = PetPhoto::from_path("images/cat.jpg");
        assert_eq!(photo.path, PathBuf::from("images/cat.jpg"));
        assert_eq!(photo.file_name, "images/cat.jpg");

        let absolute = PetPhoto::from_path("/tmp/pets/dog.jpeg");
        assert_eq!(absolute.file_name, "/tmp/pets/dog.jpeg");
    }
}
