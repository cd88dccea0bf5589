use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::{HighwayClass, Region};

use super::response::{OverpassResponse, RawElements};

const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

const USER_AGENT: &str = concat!("stradario/", env!("CARGO_PKG_VERSION"));

/// Offset applied by Overpass when a boundary relation is referenced as an
/// area filter.
pub const AREA_OFFSET: i64 = 3_600_000_000;

/// Service-side timeout for the administrative-boundary lookup, in seconds.
const BOUNDARY_TIMEOUT_S: u32 = 25;

/// Service-side timeout for the highway query, in seconds.
const HIGHWAY_TIMEOUT_S: u32 = 60;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("no administrative boundary found for region '{0}'")]
    RegionNotFound(String),
    #[error("overpass request failed: {0}")]
    FetchFailed(String),
}

/// Client for the two Overpass query shapes used by the pipeline: the
/// administrative-boundary lookup and the bounded highway fetch.
///
/// No client-side timeout is set; the `[timeout:..]` header inside each query
/// is the only ceiling, so a slow response blocks until the service gives up.
pub struct OverpassCollect {
    client: Client,
    endpoint: String,
}

impl OverpassCollect {
    pub fn new() -> Result<Self, CollectError> {
        Self::with_endpoint(OVERPASS_URL)
    }

    /// Point the client at an alternative Overpass instance.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, CollectError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None)
            .build()
            .map_err(|e| CollectError::FetchFailed(e.to_string()))?;
        Ok(OverpassCollect {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Resolve a region name to an Overpass area id.
    ///
    /// Zero matched relations is `RegionNotFound`; a transport or decoding
    /// failure is `FetchFailed`. Both are recoverable: the caller skips the
    /// region for this run.
    pub fn resolve_region(&self, region: &Region) -> Result<i64, CollectError> {
        let query = boundary_query(&region.name);
        let response = self.run_query(&query)?;
        area_id_from_response(region, &response)
    }

    /// Fetch every way of one highway class inside an area, together with
    /// every node they reference, in a single round trip.
    pub fn fetch_highways(
        &self,
        area_id: i64,
        class: HighwayClass,
    ) -> Result<RawElements, CollectError> {
        let query = highway_query(area_id, class);
        let response = self.run_query(&query)?;
        Ok(RawElements::from_response(response))
    }

    fn run_query(&self, query: &str) -> Result<OverpassResponse, CollectError> {
        log::debug!("overpass query:\n{}", query);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()
            .map_err(|e| CollectError::FetchFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CollectError::FetchFailed(format!(
                "overpass returned {}",
                response.status()
            )));
        }
        response
            .json::<OverpassResponse>()
            .map_err(|e| CollectError::FetchFailed(format!("invalid overpass body: {}", e)))
    }
}

/// Decoding half of [`OverpassCollect::resolve_region`]: take the first
/// matched relation and derive its area id. A mismatch against the static
/// table is only worth a warning; the resolved relation wins.
pub fn area_id_from_response(
    region: &Region,
    response: &OverpassResponse,
) -> Result<i64, CollectError> {
    let relations = response.relation_ids();
    let relation_id = *relations
        .first()
        .ok_or_else(|| CollectError::RegionNotFound(region.name.clone()))?;
    if relation_id != region.relation_id {
        log::warn!(
            "region '{}' resolved to relation {}, static table says {}",
            region.name,
            relation_id,
            region.relation_id
        );
    }
    Ok(AREA_OFFSET + relation_id)
}

/// Overpass QL for the administrative-boundary lookup of one region.
pub fn boundary_query(region_name: &str) -> String {
    format!(
        "[out:json][timeout:{timeout}];\n\
         area[\"ISO3166-1\"=\"IT\"][admin_level=2]->.italy;\n\
         relation(area.italy)[\"admin_level\"=\"4\"][\"name\"=\"{name}\"][\"boundary\"=\"administrative\"];\n\
         out ids;",
        timeout = BOUNDARY_TIMEOUT_S,
        name = region_name,
    )
}

/// Overpass QL fetching the ways of one highway class inside an area plus
/// every node they reference (`>;` recursion), so no second round trip is
/// needed to resolve coordinates.
pub fn highway_query(area_id: i64, class: HighwayClass) -> String {
    format!(
        "[out:json][timeout:{timeout}];\n\
         way[\"highway\"=\"{class}\"](area:{area_id});\n\
         out body;\n\
         >;\n\
         out body qt;",
        timeout = HIGHWAY_TIMEOUT_S,
        class = class,
        area_id = area_id,
    )
}
