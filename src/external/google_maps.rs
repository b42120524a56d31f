use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{DirectionsProvider, MapProvider, PlacesProvider};
use crate::{
    config::Config,
    entities::{Coordinates, DirectionsRequest, DirectionsResult},
    error::{directions_error, invalid_input_error, provider_load_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

pub type PlaceSuggestions = Vec<PlaceSuggestion>;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    result: Option<T>,
    results: Option<T>,
    predictions: Option<T>,
}

const AUTOCOMPLETE_RADIUS: f64 = 50_000.0;

#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Self {
        let api_base = if config.google_maps_api_base.contains("://") {
            config.google_maps_api_base.clone()
        } else {
            format!("https://{}", config.google_maps_api_base)
        };

        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').into(),
            api_key: config.google_maps_api_key.clone(),
        }
    }

    fn key(&self) -> Result<&str, Error> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(provider_load_error)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.api_base, path);
        let key = self.key()?;

        let res = self
            .client
            .get(url)
            .query(&[("key", key)])
            .query(query)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl MapProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn load(&self) -> Result<(), Error> {
        self.key()?;

        // a reverse geocode of 0,0 is enough for the provider to reject a bad key
        let query = [("latlng", String::from(Coordinates::new(0.0, 0.0)))];
        let data: Response<serde_json::Value> = self
            .get("/maps/api/geocode/json", &query)
            .await
            .map_err(|err| {
                tracing::error!("maps key check failed: {}", err);
                provider_load_error()
            })?;

        match data.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(()),
            status => {
                tracing::error!("maps key rejected: {}", status);
                Err(provider_load_error())
            }
        }
    }
}

#[async_trait]
impl DirectionsProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn route(&self, request: DirectionsRequest) -> Result<DirectionsResult, Error> {
        let mut query = vec![
            ("origin", request.origin),
            ("destination", request.destination),
            ("mode", request.travel_mode.as_query().to_string()),
        ];

        if !request.waypoints.is_empty() {
            let waypoints: Vec<String> = request.waypoints.iter().map(|w| w.to_string()).collect();
            query.push(("waypoints", waypoints.join("|")));
        }

        let data: serde_json::Value = self
            .get("/maps/api/directions/json", &query)
            .await
            .map_err(directions_error)?;

        match data["status"].as_str() {
            Some("OK") => Ok(DirectionsResult(data)),
            status => Err(directions_error(status.unwrap_or("missing status"))),
        }
    }
}

#[async_trait]
impl PlacesProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_place_suggestions(
        &self,
        input: String,
        location: Option<Coordinates>,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error> {
        let mut query = vec![("input", input), ("sessiontoken", session_token)];

        if let Some(location) = location {
            query.push(("location", location.into()));
            query.push(("radius", AUTOCOMPLETE_RADIUS.to_string()));
        }

        let data: Response<PlaceSuggestions> = self
            .get("/maps/api/place/autocomplete/json", &query)
            .await?;

        if !(data.status == "OK" || data.status == "ZERO_RESULTS") {
            return Err(upstream_error());
        }

        Ok(data.predictions.unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn find_place(&self, id: String, session_token: String) -> Result<Place, Error> {
        let query = [("sessiontoken", session_token), ("place_id", id)];

        let data: Response<Place> = self.get("/maps/api/place/details/json", &query).await?;

        if data.status != "OK" {
            return Err(upstream_error());
        }

        data.result.ok_or_else(upstream_error)
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: String) -> Result<Coordinates, Error> {
        let query = [("address", address)];

        let data: Response<Vec<Place>> = self.get("/maps/api/geocode/json", &query).await?;

        match data.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(invalid_input_error()),
            _ => return Err(upstream_error()),
        }

        data.results
            .and_then(|results| results.into_iter().next())
            .map(|place| place.geometry.location)
            .ok_or_else(upstream_error)
    }
}

#[cfg(test)]
fn test_client(base: String, key: Option<&str>) -> GoogleMaps {
    let config = Config {
        google_maps_api_base: base,
        google_maps_api_key: key.map(Into::into),
        ..Config::default()
    };

    GoogleMaps::new(&config)
}

#[test]
fn load_requires_api_key() {
    use crate::error::PROVIDER_LOAD_ERROR;
    use tokio_test::block_on;

    let maps = test_client("maps.googleapis.com".into(), None);
    assert!(block_on(maps.load()).unwrap_err().is(PROVIDER_LOAD_ERROR));

    let maps = test_client("maps.googleapis.com".into(), Some(""));
    assert!(block_on(maps.load()).unwrap_err().is(PROVIDER_LOAD_ERROR));
}

#[tokio::test]
async fn load_checks_key_with_provider() {
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/geocode/json"))
        .and(query_param("latlng", "0,0"))
        .and(query_param("key", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    assert!(maps.load().await.is_ok());
}

#[tokio::test]
async fn load_rejected_key_is_provider_load_error() {
    use crate::error::PROVIDER_LOAD_ERROR;
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/geocode/json"))
        .and(query_param("key", "revoked"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    Mock::given(path("/maps/api/geocode/json"))
        .and(query_param("key", "forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("revoked"));
    assert!(maps.load().await.unwrap_err().is(PROVIDER_LOAD_ERROR));

    let maps = test_client(server.uri(), Some("forbidden"));
    assert!(maps.load().await.unwrap_err().is(PROVIDER_LOAD_ERROR));
}

#[tokio::test]
async fn directions_request_is_bicycling_with_waypoints() {
    use crate::entities::Stop;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .and(query_param("mode", "bicycling"))
        .and(query_param("origin", "41.38,2.17"))
        .and(query_param("destination", "Sagrada Família"))
        .and(query_param("waypoints", "Arc de Triomf|41.39,2.18"))
        .and(query_param("key", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "OK", "routes": [{}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    let request = DirectionsRequest::bicycling(
        "41.38,2.17".into(),
        "Sagrada Família".into(),
        vec![
            Stop::from("Arc de Triomf"),
            Coordinates::new(41.39, 2.18).into(),
        ],
    );

    let result = maps.route(request).await.unwrap();
    assert_eq!(result.0["routes"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn directions_non_ok_status_is_directions_error() {
    use crate::error::DIRECTIONS_ERROR;
    use wiremock::matchers::path;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/directions/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "NOT_FOUND"})),
        )
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    let request = DirectionsRequest::bicycling("A".into(), "B".into(), vec![]);

    let err = maps.route(request).await.unwrap_err();
    assert!(err.is(DIRECTIONS_ERROR));
}

#[tokio::test]
async fn geocode_returns_first_result() {
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/geocode/json"))
        .and(query_param("address", "Sants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{
                "place_id": "abc",
                "formatted_address": "Sants, Barcelona",
                "geometry": {"location": {"lat": 41.37, "lng": 2.13}}
            }]
        })))
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    let coordinates = maps.geocode("Sants".into()).await.unwrap();
    assert_eq!(coordinates, Coordinates::new(41.37, 2.13));
}

#[tokio::test]
async fn suggestions_are_biased_to_user_location() {
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/place/autocomplete/json"))
        .and(query_param("input", "Sagr"))
        .and(query_param("sessiontoken", "token-1"))
        .and(query_param("location", "41.38,2.17"))
        .and(query_param("radius", "50000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "predictions": [{"place_id": "sf", "description": "Sagrada Família, Barcelona"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    let suggestions = maps
        .find_place_suggestions(
            "Sagr".into(),
            Some(Coordinates::new(41.38, 2.17)),
            "token-1".into(),
        )
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].place_id, "sf");
}

#[tokio::test]
async fn suggestions_without_location_are_unbiased() {
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/place/autocomplete/json"))
        .and(query_param("input", "Zzz"))
        .and(query_param("sessiontoken", "token-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ZERO_RESULTS"})),
        )
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    let suggestions = maps
        .find_place_suggestions("Zzz".into(), None, "token-2".into())
        .await
        .unwrap();
    assert!(suggestions.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let params: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(name, _)| name.into_owned())
        .collect();
    assert!(!params.iter().any(|name| name == "location" || name == "radius"));
}

#[tokio::test]
async fn place_details_use_session_token() {
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/place/details/json"))
        .and(query_param("place_id", "sf"))
        .and(query_param("sessiontoken", "token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "sf",
                "formatted_address": "C/ de Mallorca, 401, Barcelona",
                "geometry": {"location": {"lat": 41.4036, "lng": 2.1744}}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    let place = maps.find_place("sf".into(), "token-1".into()).await.unwrap();

    assert_eq!(place.place_id, "sf");
    assert_eq!(place.geometry.location, Coordinates::new(41.4036, 2.1744));
}

#[tokio::test]
async fn place_details_not_found_is_error() {
    use wiremock::matchers::path;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(path("/maps/api/place/details/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "NOT_FOUND"})),
        )
        .mount(&server)
        .await;

    let maps = test_client(server.uri(), Some("secret"));
    assert!(maps.find_place("gone".into(), "t".into()).await.is_err());
}
