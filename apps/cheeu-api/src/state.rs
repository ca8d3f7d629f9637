use std::sync::Arc;

use cheeu_service::CheeuService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CheeuService>,
}
impl AppState {
	pub fn new(config: cheeu_config::Config) -> Self {
		Self::from_service(CheeuService::new(config))
	}

	pub fn from_service(service: CheeuService) -> Self {
		Self { service: Arc::new(service) }
	}
}
