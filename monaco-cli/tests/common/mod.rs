//! In-memory stand-in for one configuration API family, served by wiremock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use monaco_cli::{ClientConfig, RestClient};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub id: String,
    pub name: String,
    pub body: String,
}

/// Objects of one family, keyed by server-assigned id
#[derive(Clone, Default)]
pub struct FakeFamily {
    objects: Arc<Mutex<Vec<StoredObject>>>,
    next_id: Arc<AtomicUsize>,
}

impl FakeFamily {
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn insert(&self, name: &str, body: &str) -> String {
        let id = format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.objects.lock().unwrap().push(StoredObject {
            id: id.clone(),
            name: name.to_string(),
            body: body.to_string(),
        });
        id
    }

    /// Mount list/create/read/replace/delete handlers for `collection`
    pub async fn mount(&self, server: &MockServer, collection: &str) {
        let item_pattern = format!("^{}/[^/]+$", collection);

        let state = self.clone();
        Mock::given(method("GET"))
            .and(path(collection))
            .respond_with(move |_: &Request| {
                let values: Vec<_> = state
                    .objects()
                    .into_iter()
                    .map(|o| json!({"id": o.id, "name": o.name}))
                    .collect();
                ResponseTemplate::new(200).set_body_json(json!({ "values": values }))
            })
            .mount(server)
            .await;

        let state = self.clone();
        Mock::given(method("POST"))
            .and(path(collection))
            .respond_with(move |req: &Request| {
                let body = String::from_utf8_lossy(&req.body).into_owned();
                let name = name_of(&body);
                let id = state.insert(&name, &body);
                ResponseTemplate::new(201).set_body_json(json!({"id": id, "name": name}))
            })
            .mount(server)
            .await;

        let state = self.clone();
        Mock::given(method("GET"))
            .and(path_regex(item_pattern.clone()))
            .respond_with(move |req: &Request| {
                let id = last_segment(req);
                match state.objects().into_iter().find(|o| o.id == id) {
                    Some(o) => ResponseTemplate::new(200).set_body_string(o.body),
                    None => ResponseTemplate::new(404),
                }
            })
            .mount(server)
            .await;

        let state = self.clone();
        Mock::given(method("PUT"))
            .and(path_regex(item_pattern.clone()))
            .respond_with(move |req: &Request| {
                let id = last_segment(req);
                let body = String::from_utf8_lossy(&req.body).into_owned();
                let mut objects = state.objects.lock().unwrap();
                match objects.iter_mut().find(|o| o.id == id) {
                    Some(o) => {
                        o.name = name_of(&body);
                        o.body = body;
                        ResponseTemplate::new(204)
                    }
                    None => ResponseTemplate::new(404),
                }
            })
            .mount(server)
            .await;

        let state = self.clone();
        Mock::given(method("DELETE"))
            .and(path_regex(item_pattern))
            .respond_with(move |req: &Request| {
                let id = last_segment(req);
                let mut objects = state.objects.lock().unwrap();
                let before = objects.len();
                objects.retain(|o| o.id != id);
                if objects.len() < before {
                    ResponseTemplate::new(204)
                } else {
                    ResponseTemplate::new(404)
                }
            })
            .mount(server)
            .await;
    }
}

fn name_of(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(str::to_string))
        .unwrap_or_default()
}

fn last_segment(req: &Request) -> String {
    req.url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

pub fn client_for(server: &MockServer) -> RestClient {
    let config = ClientConfig::builder()
        .environment_url(server.uri())
        .token("integration-token")
        .build()
        .unwrap();
    RestClient::new(&config).unwrap()
}
