//! Verify request builders and response normalization against the JSON
//! vectors in `test-vectors/`.
//!
//! Each request vector names an operation, its inputs, and the expected
//! method, path, headers and body. Normalization vectors pair a raw body with
//! either the parsed JSON or the text it must fall back to.

use petfriends_core::{
    Credentials, HttpMethod, HttpRequest, HttpResponse, PetFriendsClient, PetUpdate, ResponseBody,
};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_else(|| panic!("missing string field {key}"))
}

fn build(client: &PetFriendsClient, operation: &str, input: &Value) -> HttpRequest {
    let creds = || Credentials::new(str_field(input, "key"));
    match operation {
        "authenticate" => client
            .build_authenticate(str_field(input, "email"), str_field(input, "password"))
            .unwrap(),
        "list_pets" => client.build_list_pets(&creds(), str_field(input, "filter")).unwrap(),
        "delete_pet" => client.build_delete_pet(&creds(), str_field(input, "pet_id")).unwrap(),
        "update_pet" => {
            let update = PetUpdate {
                name: str_field(input, "name").to_string(),
                animal_type: str_field(input, "animal_type").to_string(),
                age: str_field(input, "age").to_string(),
            };
            client
                .build_update_pet(&creds(), str_field(input, "pet_id"), &update)
                .unwrap()
        }
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = str_field(&vectors, "base_url");
    let client = PetFriendsClient::new(base_url).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = str_field(case, "name");
        let expected = &case["expected_request"];
        let req = build(&client, str_field(case, "operation"), &case["input"]);

        assert_eq!(req.method, parse_method(str_field(expected, "method")), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", str_field(expected, "path")), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let body = req
            .body
            .as_ref()
            .map(|b| String::from_utf8(b.as_bytes().unwrap().to_vec()).unwrap());
        assert_eq!(body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn normalize_test_vectors() {
    let raw = include_str!("../../test-vectors/normalize.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let client = PetFriendsClient::new("http://localhost:3000").unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = str_field(case, "name");
        let status = case["status"].as_u64().unwrap() as u16;
        let response = HttpResponse {
            status,
            body: str_field(case, "body").to_string(),
        };

        let parsed = client.parse_response(response);
        assert_eq!(parsed.status, status, "{name}: status");

        let expected = &case["expected"];
        let expected_body = match (expected.get("json"), expected.get("text")) {
            (Some(json), None) => ResponseBody::Json(json.clone()),
            (None, Some(text)) => ResponseBody::Text(text.as_str().unwrap().to_string()),
            _ => panic!("{name}: expected exactly one of json/text"),
        };
        assert_eq!(parsed.body, expected_body, "{name}: body");
    }
}
