use std::sync::Arc;

use sqlx::PgPool;

use crate::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub postgres: PgPool,
    pub uploads: UploadStore,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(postgres: PgPool, uploads: UploadStore, jwt_secret: &str) -> Self {
        Self {
            postgres,
            uploads,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
