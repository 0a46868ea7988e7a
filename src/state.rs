use crate::{
    config::AppConfig,
    error::AppError,
    services::TripGateway,
    stores::{TripCollectionStore, TripDetailStore},
};

/// Shared by every request. Stores are per view mount, so only the
/// stateless gateway lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gateway: TripGateway,
}

impl AppState {
    pub fn new(config: AppConfig, gateway: TripGateway) -> Self {
        Self { config, gateway }
    }

    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let gateway = TripGateway::new(config.api_base_url.clone())?;
        Ok(Self::new(config, gateway))
    }

    pub fn mount_trip_list(&self) -> TripCollectionStore {
        TripCollectionStore::new(self.gateway.clone())
    }

    pub fn mount_trip_detail(&self) -> TripDetailStore {
        TripDetailStore::new(self.gateway.clone())
    }
}
