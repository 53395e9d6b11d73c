//! User registration and location.

use crate::model::User;
use crate::store::UserStore;
use agrimap_core::validation::Validator;
use agrimap_core::{Error, Result};
use agrimap_maps::Geocoder;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

const MAX_EMAIL_LENGTH: usize = 255;

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { users, geocoder }
    }

    /// Register a user by email. Emails are unique.
    #[instrument(skip(self))]
    pub async fn create_user(&self, email: &str) -> Result<User> {
        let email = email.trim();
        Validator::new()
            .required("email", email)
            .email("email", email)
            .max_length("email", email, MAX_EMAIL_LENGTH)
            .validate()
            .to_result()?;

        if self.users.find_user_by_email(email).await?.is_some() {
            return Err(Error::unprocessable_entity(
                "A user for the email already exists",
            ));
        }

        let user = self.users.insert_user(email).await?;
        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Geocode `address` and store it as the user's location.
    #[instrument(skip(self))]
    pub async fn update_location(&self, user_id: Uuid, address: &str) -> Result<User> {
        Validator::new()
            .required("address", address)
            .validate()
            .to_result()?;

        self.find_user(user_id).await?;

        let coordinates = self
            .geocoder
            .geocode(address)
            .await
            .map_err(|e| e.into_integration_error(self.geocoder.provider_name()))?
            .ok_or_else(|| Error::unprocessable_entity("Invalid address"))?;

        let user = self
            .users
            .update_location(user_id, address, coordinates)
            .await?
            .ok_or_else(|| Error::not_found("User", user_id))?;

        info!(%coordinates, "Located user");
        Ok(user)
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or_else(|| Error::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::StubGeocoder;
    use agrimap_core::ErrorCode;
    use agrimap_geo::Coordinate;

    fn service(geocoder: StubGeocoder) -> UsersService {
        UsersService::new(Arc::new(MemoryStore::new()), Arc::new(geocoder))
    }

    #[tokio::test]
    async fn test_create_user() {
        let users = service(StubGeocoder::default());

        let created = users.create_user(" grower@agrimap.dk ").await.unwrap();
        assert_eq!(created.email, "grower@agrimap.dk");
        assert!(created.coordinates.is_none());
        assert_eq!(users.find_user(created.id).await.unwrap(), created);

        let err = users.create_user("grower@agrimap.dk").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnprocessableEntity);
        assert_eq!(err.message, "A user for the email already exists");
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_email() {
        let users = service(StubGeocoder::default());
        for email in ["", "grower", "grower@agrimap"] {
            let err = users.create_user(email).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "{email:?}");
        }
    }

    #[tokio::test]
    async fn test_update_location() {
        let copenhagen = Coordinate::new(55.6761, 12.5683);
        let users = service(StubGeocoder::default().with("Rådhuspladsen 1, København", copenhagen));
        let user = users.create_user("grower@agrimap.dk").await.unwrap();

        let located = users
            .update_location(user.id, "Rådhuspladsen 1, København")
            .await
            .unwrap();
        assert_eq!(located.coordinates, Some(copenhagen));
        assert_eq!(located.address.as_deref(), Some("Rådhuspladsen 1, København"));

        let err = users.update_location(user.id, "Atlantis").await.unwrap_err();
        assert_eq!(err.message, "Invalid address");

        let err = users.update_location(Uuid::new_v4(), "Rådhuspladsen 1, København").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_geocoder_failure() {
        let users = service(StubGeocoder {
            fail: true,
            ..StubGeocoder::default()
        });
        let user = users.create_user("grower@agrimap.dk").await.unwrap();

        let err = users.update_location(user.id, "Skovvej 12").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProviderIntegration);
        assert_eq!(err.message, "Google Maps Integration Error");
    }
}
