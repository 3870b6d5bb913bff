use crate::config::NrelConfig;
use crate::fetch::error::FetchError;
use crate::fetch::provider::{FetchRequest, ResourceProvider};
use crate::types::resource_kind::ResourceKind;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

const NSRDB_PATH: &str = "/api/nsrdb/v2/solar/psm3-download.csv";
const WTK_PATH: &str = "/api/wind-toolkit/v2/wind/wtk-srw-download";
const NSRDB_ATTRIBUTES: &str =
    "ghi,dhi,dni,wind_speed,air_temperature,dew_point,surface_pressure,relative_humidity,wind_direction,surface_albedo";

/// Error document returned by the NREL API alongside 4xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Blocking client for the NREL developer API (NSRDB and WIND Toolkit).
pub struct NrelClient {
    config: NrelConfig,
    client: Client,
}

impl NrelClient {
    pub fn new(config: NrelConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { config, client })
    }

    /// Client configured from `NREL_API_*` environment variables.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(NrelConfig::from_env())
    }

    pub fn config(&self) -> &NrelConfig {
        &self.config
    }

    fn endpoint(&self, kind: ResourceKind) -> String {
        let path = match kind {
            ResourceKind::Solar => NSRDB_PATH,
            ResourceKind::Wind => WTK_PATH,
        };
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn query(&self, request: &FetchRequest, api_key: &str) -> Vec<(&'static str, String)> {
        let LatLonPair { lat, lon } = LatLonPair::from(request);
        let email = self.config.email.clone().unwrap_or_default();
        let mut query = match request.kind {
            ResourceKind::Solar => vec![
                ("wkt", format!("POINT({lon} {lat})")),
                ("names", request.year.to_string()),
                ("interval", request.interval.to_string()),
                ("leap_day", "false".to_string()),
                ("utc", "false".to_string()),
                ("attributes", NSRDB_ATTRIBUTES.to_string()),
            ],
            ResourceKind::Wind => vec![
                ("year", request.year.to_string()),
                ("lat", lat),
                ("lon", lon),
                (
                    "hubheight",
                    request.height.map(|h| h.to_string()).unwrap_or_default(),
                ),
            ],
        };
        query.push(("email", email));
        query.push(("api_key", api_key.to_string()));
        query
    }
}

struct LatLonPair {
    lat: String,
    lon: String,
}

impl From<&FetchRequest> for LatLonPair {
    fn from(request: &FetchRequest) -> Self {
        Self {
            lat: request.location.0.to_string(),
            lon: request.location.1.to_string(),
        }
    }
}

impl ResourceProvider for NrelClient {
    fn name(&self) -> &str {
        "nrel"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        if !request.kind.coverage().contains(&request.year) {
            return Err(request.not_available(format!(
                "year outside dataset coverage {:?}",
                request.kind.coverage()
            )));
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey)?;

        let url = self.endpoint(request.kind);
        info!(
            "Downloading {} data for {} ({}) from {}",
            request.kind, request.location, request.year, url
        );
        let response = self
            .client
            .get(&url)
            .query(&self.query(request, api_key))
            .send()
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.error_for_status_ref().err();
            let body = response.text().unwrap_or_default();
            warn!("HTTP {} for {}: {}", status, url, body);
            if is_not_available_status(status) {
                return Err(request.not_available(error_reason(&body, status)));
            }
            return Err(match error {
                Some(source) => FetchError::HttpStatus {
                    url,
                    status,
                    source,
                },
                None => FetchError::UnexpectedPayload {
                    url,
                    reason: format!("status {status}"),
                },
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        check_payload(&bytes).map_err(|reason| FetchError::UnexpectedPayload {
            url: url.clone(),
            reason,
        })?;
        debug!("Received {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Statuses the API uses when it has no data for the query.
fn is_not_available_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
    )
}

fn error_reason(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("provider answered {status}"),
    }
}

/// A successful download must be a non-empty text table, not a JSON document.
fn check_payload(bytes: &[u8]) -> Result<(), String> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    match first {
        None => Err("empty body".to_string()),
        Some(b'{') | Some(b'[') => Err(format!(
            "JSON document instead of a resource file: {}",
            String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
        )),
        Some(_) => Ok(()),
    }
}
