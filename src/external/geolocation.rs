use async_trait::async_trait;

use super::GeolocationProvider;
use crate::entities::Coordinates;
use crate::error::{geolocation_error, Error};

/// Position taken from configuration; `None` behaves like a denied permission.
#[derive(Clone, Debug, Default)]
pub struct FixedGeolocation {
    position: Option<Coordinates>,
}

impl FixedGeolocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    #[tracing::instrument(skip(self))]
    async fn current_position(&self) -> Result<Coordinates, Error> {
        self.position.ok_or_else(geolocation_error)
    }
}

#[test]
fn unset_position_is_geolocation_error() {
    use crate::error::GEOLOCATION_ERROR;
    use tokio_test::block_on;

    let err = block_on(FixedGeolocation::default().current_position()).unwrap_err();
    assert!(err.is(GEOLOCATION_ERROR));

    let position = Coordinates::new(41.38, 2.17);
    let found = block_on(FixedGeolocation::new(Some(position)).current_position()).unwrap();
    assert_eq!(found, position);
}
