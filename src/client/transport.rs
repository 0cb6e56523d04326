//! HTTP transport for the property context
//!
//! The context is generic over [`PropertyTransport`] so tests can drive it
//! against an in-process server; [`HttpTransport`] is the reqwest-backed
//! implementation used against a deployed API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use super::ErrorKind;
use crate::core::error::FieldViolation;
use crate::model::property::{NewProperty, Property, PropertyPatch};
use crate::upload::ImageFile;

/// Wire operations the context needs
#[async_trait]
pub trait PropertyTransport: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Property>, ErrorKind>;

    async fn create(
        &self,
        new: &NewProperty,
        images: Vec<ImageFile>,
    ) -> Result<Property, ErrorKind>;

    async fn update(&self, id: &Uuid, patch: &PropertyPatch) -> Result<Property, ErrorKind>;

    async fn delete(&self, id: &Uuid) -> Result<(), ErrorKind>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    bearer_token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            bearer_token: None,
        }
    }

    /// Attach the credential sent with mutating requests
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ErrorKind> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ErrorKind::Transport(e.to_string()));
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(decode_error(status, &body))
    }
}

/// Map an HTTP error response back to an [`ErrorKind`]
pub fn decode_error(status: StatusCode, body: &Value) -> ErrorKind {
    let message = body["message"].as_str().unwrap_or("").to_string();
    match status {
        StatusCode::BAD_REQUEST => {
            let violations = body["details"]["fields"]
                .as_array()
                .map(|fields| {
                    fields
                        .iter()
                        .map(|f| {
                            FieldViolation::new(
                                f["field"].as_str().unwrap_or(""),
                                f["message"].as_str().unwrap_or(""),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            ErrorKind::Validation(violations)
        }
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorKind::Payload(message),
        _ => ErrorKind::Server(message),
    }
}

/// Build the multipart creation form: scalar fields plus image parts
fn creation_form(new: &NewProperty, images: Vec<ImageFile>) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new()
        .text("title", new.title.clone())
        .text("description", new.description.clone())
        .text("price", new.price.to_string())
        .text("type", new.property_type.as_str().to_string())
        .text("bedrooms", new.bedrooms.to_string())
        .text("bathrooms", new.bathrooms.to_string())
        .text("area", new.area.to_string())
        .text("address", new.location.address.clone())
        .text("city", new.location.city.clone())
        .text("state", new.location.state.clone())
        .text("zipCode", new.location.zip_code.clone())
        .text("featured", new.featured.to_string());

    for amenity in &new.amenities {
        form = form.text("amenities", amenity.clone());
    }

    for image in images {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .unwrap_or_else(|_| reqwest::multipart::Part::bytes(Vec::new()));
        form = form.part("images", part);
    }

    form
}

#[async_trait]
impl PropertyTransport for HttpTransport {
    async fn fetch_all(&self) -> Result<Vec<Property>, ErrorKind> {
        let response = self
            .client
            .get(self.url("/properties"))
            .send()
            .await
            .map_err(|e| ErrorKind::Transport(e.to_string()))?;

        let body: Value = Self::decode(response).await?;
        serde_json::from_value(body["properties"].clone())
            .map_err(|e| ErrorKind::Transport(e.to_string()))
    }

    async fn create(
        &self,
        new: &NewProperty,
        images: Vec<ImageFile>,
    ) -> Result<Property, ErrorKind> {
        let request = self
            .authorized(self.client.post(self.url("/properties")))
            .multipart(creation_form(new, images));

        let response = request
            .send()
            .await
            .map_err(|e| ErrorKind::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn update(&self, id: &Uuid, patch: &PropertyPatch) -> Result<Property, ErrorKind> {
        let request = self
            .authorized(self.client.put(self.url(&format!("/properties/{}", id))))
            .json(patch);

        let response = request
            .send()
            .await
            .map_err(|e| ErrorKind::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &Uuid) -> Result<(), ErrorKind> {
        let request = self.authorized(
            self.client
                .delete(self.url(&format!("/properties/{}", id))),
        );

        let response = request
            .send()
            .await
            .map_err(|e| ErrorKind::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(decode_error(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_error_validation_carries_fields() {
        let body = json!({
            "code": "VALIDATION_ERROR",
            "message": "validation errors: price: must be non-negative",
            "details": { "fields": [{ "field": "price", "message": "must be non-negative" }] }
        });
        let kind = decode_error(StatusCode::BAD_REQUEST, &body);
        let ErrorKind::Validation(violations) = kind else {
            panic!("expected validation kind");
        };
        assert_eq!(violations[0].field, "price");
    }

    #[test]
    fn test_decode_error_status_mapping() {
        let body = json!({ "message": "boom" });
        assert_eq!(
            decode_error(StatusCode::NOT_FOUND, &body),
            ErrorKind::NotFound
        );
        assert_eq!(
            decode_error(StatusCode::UNAUTHORIZED, &body),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            decode_error(StatusCode::FORBIDDEN, &body),
            ErrorKind::Forbidden
        );
        assert_eq!(
            decode_error(StatusCode::PAYLOAD_TOO_LARGE, &body),
            ErrorKind::Payload("boom".to_string())
        );
        assert_eq!(
            decode_error(StatusCode::INTERNAL_SERVER_ERROR, &body),
            ErrorKind::Server("boom".to_string())
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let transport = HttpTransport::new("http://localhost:8080/");
        assert_eq!(
            transport.url("/properties"),
            "http://localhost:8080/properties"
        );
    }
}
