//! Client context tests driven through the real router
//!
//! A [`PropertyTransport`] implementation backed by an in-process test server
//! exercises the cache, the derived favorites view, and failure reporting
//! exactly as the reqwest transport would against a deployed API.

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use estately::client::transport::decode_error;
use estately::client::{ErrorKind, PropertyContext, PropertyTransport};
use estately::core::auth::{Role, Subject, TokenRegistry};
use estately::model::property::{Location, NewProperty, Property, PropertyPatch, PropertyQuery};
use estately::model::{PropertyStatus, PropertyType};
use estately::server::{AppState, build_router};
use estately::store::{InMemoryPropertyStore, InMemoryScheduleStore};
use estately::upload::{ImageFile, LocalFileStore};

/// Transport over an in-process server
struct ServerTransport {
    server: Arc<TestServer>,
    token: Option<&'static str>,
}

impl ServerTransport {
    fn form(new: &NewProperty, images: Vec<ImageFile>) -> MultipartForm {
        let mut form = MultipartForm::new()
            .add_text("title", new.title.clone())
            .add_text("description", new.description.clone())
            .add_text("price", new.price.to_string())
            .add_text("type", new.property_type.as_str())
            .add_text("bedrooms", new.bedrooms.to_string())
            .add_text("bathrooms", new.bathrooms.to_string())
            .add_text("area", new.area.to_string())
            .add_text("address", new.location.address.clone())
            .add_text("city", new.location.city.clone())
            .add_text("state", new.location.state.clone())
            .add_text("zipCode", new.location.zip_code.clone())
            .add_text("featured", new.featured.to_string());
        for amenity in &new.amenities {
            form = form.add_text("amenities", amenity.clone());
        }
        for image in images {
            form = form.add_part(
                "images",
                Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_type(image.content_type),
            );
        }
        form
    }

    fn check<T: serde::de::DeserializeOwned>(
        response: axum_test::TestResponse,
    ) -> Result<T, ErrorKind> {
        let status = response.status_code();
        let body: Value = response.json();
        if status.is_success() {
            serde_json::from_value(body).map_err(|e| ErrorKind::Transport(e.to_string()))
        } else {
            Err(decode_error(status, &body))
        }
    }
}

#[async_trait]
impl PropertyTransport for ServerTransport {
    async fn fetch_all(&self) -> Result<Vec<Property>, ErrorKind> {
        let body: Value = self.server.get("/properties").await.json();
        serde_json::from_value(body["properties"].clone())
            .map_err(|e| ErrorKind::Transport(e.to_string()))
    }

    async fn create(
        &self,
        new: &NewProperty,
        images: Vec<ImageFile>,
    ) -> Result<Property, ErrorKind> {
        let mut request = self.server.post("/properties");
        if let Some(token) = self.token {
            request = request.authorization_bearer(token);
        }
        Self::check(request.multipart(Self::form(new, images)).await)
    }

    async fn update(&self, id: &Uuid, patch: &PropertyPatch) -> Result<Property, ErrorKind> {
        let mut request = self.server.put(&format!("/properties/{}", id));
        if let Some(token) = self.token {
            request = request.authorization_bearer(token);
        }
        Self::check(request.json(patch).await)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), ErrorKind> {
        let mut request = self.server.delete(&format!("/properties/{}", id));
        if let Some(token) = self.token {
            request = request.authorization_bearer(token);
        }
        let response = request.await;
        let status = response.status_code();
        if status.is_success() {
            return Ok(());
        }
        let body: Value = response.json();
        Err(decode_error(status, &body))
    }
}

struct Fixture {
    server: Arc<TestServer>,
    _upload_dir: TempDir,
}

fn make_fixture() -> Fixture {
    let upload_dir = TempDir::new().unwrap();

    let auth = TokenRegistry::new();
    for (token, role) in [("agent-token", Role::Agent), ("buyer-token", Role::Buyer)] {
        auth.issue(
            token,
            Subject {
                id: Uuid::new_v4(),
                name: format!("{} user", role),
                role,
            },
        );
    }

    let state = AppState {
        properties: Arc::new(InMemoryPropertyStore::new()),
        schedules: Arc::new(InMemoryScheduleStore::new()),
        files: Arc::new(LocalFileStore::new(upload_dir.path())),
        auth: Arc::new(auth),
    };

    Fixture {
        server: Arc::new(TestServer::new(build_router(state))),
        _upload_dir: upload_dir,
    }
}

impl Fixture {
    fn transport_as(&self, token: &'static str) -> ServerTransport {
        ServerTransport {
            server: Arc::clone(&self.server),
            token: Some(token),
        }
    }

    async fn server_count(&self) -> u64 {
        let body: Value = self.server.get("/properties").await.json();
        body["count"].as_u64().unwrap()
    }
}

fn listing(title: &str, featured: bool) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        description: "Bright two-bedroom loft downtown".to_string(),
        price: 325_000.0,
        property_type: PropertyType::Apartment,
        bedrooms: 2,
        bathrooms: 1,
        area: 980,
        location: Location {
            address: "12 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
        },
        amenities: vec!["Balcony".to_string()],
        featured,
        status: PropertyStatus::Available,
    }
}

fn jpeg(name: &str) -> ImageFile {
    ImageFile {
        file_name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xff, 0xd8, 0xff],
    }
}

#[tokio::test]
async fn test_mount_loads_cache() {
    let fixture = make_fixture();
    let seed = fixture.transport_as("agent-token");
    seed.create(&listing("Seeded", false), vec![]).await.unwrap();

    let (context, outcome) = PropertyContext::mount(fixture.transport_as("agent-token")).await;
    assert_eq!(outcome.into_result().unwrap(), 1);
    assert_eq!(context.properties().len(), 1);
    assert_eq!(context.properties()[0].title, "Seeded");
}

#[tokio::test]
async fn test_add_property_reports_record_and_updates_cache() {
    let fixture = make_fixture();
    let (context, _) = PropertyContext::mount(fixture.transport_as("agent-token")).await;

    let outcome = context
        .add_property(listing("Sunny Loft", false), vec![jpeg("front.jpg")])
        .await;
    let created = outcome.into_result().unwrap();
    assert_eq!(created.title, "Sunny Loft");
    assert_eq!(created.images.len(), 1);

    assert_eq!(context.properties().len(), 1);
    assert_eq!(fixture.server_count().await, 1);
}

#[tokio::test]
async fn test_forbidden_add_leaves_cache_and_server_untouched() {
    let fixture = make_fixture();
    let (context, _) = PropertyContext::mount(fixture.transport_as("buyer-token")).await;

    let outcome = context.add_property(listing("Buyer Attempt", false), vec![]).await;
    assert!(matches!(outcome.error(), Some(ErrorKind::Forbidden)));

    assert!(context.properties().is_empty());
    assert_eq!(fixture.server_count().await, 0);
}

#[tokio::test]
async fn test_invalid_update_reports_violations() {
    let fixture = make_fixture();
    let (context, _) = PropertyContext::mount(fixture.transport_as("agent-token")).await;
    let created = context
        .add_property(listing("Sunny Loft", false), vec![])
        .await
        .into_result()
        .unwrap();

    let patch = PropertyPatch {
        price: Some(-5.0),
        ..Default::default()
    };
    let outcome = context.update_property(&created.id, patch).await;
    let Some(ErrorKind::Validation(violations)) = outcome.error() else {
        panic!("expected validation failure");
    };
    assert_eq!(violations[0].field, "price");

    // cache still shows the original price
    assert_eq!(context.properties()[0].price, 325_000.0);
}

#[tokio::test]
async fn test_favorites_tracks_featured_available_listings() {
    let fixture = make_fixture();
    let (context, _) = PropertyContext::mount(fixture.transport_as("agent-token")).await;

    let featured = context
        .add_property(listing("Featured Flat", true), vec![])
        .await
        .into_result()
        .unwrap();
    context
        .add_property(listing("Plain Flat", false), vec![])
        .await
        .into_result()
        .unwrap();

    let favorites = context.favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].title, "Featured Flat");

    // marking the listing pending drops it from favorites without a
    // separate favorites call
    let patch = PropertyPatch {
        status: Some(PropertyStatus::Pending),
        ..Default::default()
    };
    context
        .update_property(&featured.id, patch)
        .await
        .into_result()
        .unwrap();
    assert!(context.favorites().is_empty());

    // un-featuring has the same effect once it is available again
    let patch = PropertyPatch {
        status: Some(PropertyStatus::Available),
        featured: Some(false),
        ..Default::default()
    };
    context
        .update_property(&featured.id, patch)
        .await
        .into_result()
        .unwrap();
    assert!(context.favorites().is_empty());
}

#[tokio::test]
async fn test_remove_property_updates_cache_and_second_remove_fails() {
    let fixture = make_fixture();
    let (context, _) = PropertyContext::mount(fixture.transport_as("agent-token")).await;
    let created = context
        .add_property(listing("Short Lived", false), vec![])
        .await
        .into_result()
        .unwrap();

    let outcome = context.remove_property(&created.id).await;
    assert!(outcome.is_success());
    assert!(context.properties().is_empty());
    assert_eq!(fixture.server_count().await, 0);

    let outcome = context.remove_property(&created.id).await;
    assert!(matches!(outcome.error(), Some(ErrorKind::NotFound)));
}

#[tokio::test]
async fn test_search_filters_cached_listings() {
    let fixture = make_fixture();
    let (context, _) = PropertyContext::mount(fixture.transport_as("agent-token")).await;
    context
        .add_property(listing("Springfield Flat", false), vec![])
        .await
        .into_result()
        .unwrap();

    let query = PropertyQuery {
        location: Some("springfield".to_string()),
        ..Default::default()
    };
    assert_eq!(context.search(&query).len(), 1);

    let query = PropertyQuery {
        price_range: Some("400000-500000".to_string()),
        ..Default::default()
    };
    assert!(context.search(&query).is_empty());
}
