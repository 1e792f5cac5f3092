//! HTTP clients for the remote placement and score-persistence services.
//!
//! Wire format follows the original game backend:
//! `GET {base}/get_mole_position/{size}` -> `{"position": <cell>}` and
//! `POST {base}/save_score` with `{player_name, score, difficulty}` ->
//! `{"status": ..., "id": ...}`.
//!
//! Any non-numeric position is reported as malformed; the engine turns that
//! into a skipped spawn. Persistence failures are non-fatal by contract.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::difficulty::Difficulty;
use crate::error::{PersistenceError, PlacementError};
use crate::surfaces::traits::PlacementService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw placement response; `position` is validated before use.
#[derive(Debug, Deserialize)]
struct PlacementResponse {
    position: serde_json::Value,
}

/// Acknowledgement from the score backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedScore {
    pub status: String,
    #[serde(default)]
    pub id: Option<i64>,
}

fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    Ok(rt.block_on(fut))
}

/// Placement client for the remote target-position service.
pub struct HttpPlacement {
    base_url: Url,
    client: Client,
}

impl HttpPlacement {
    pub fn new(base_url: &str) -> Result<Self, PlacementError> {
        let base_url = Url::parse(base_url).map_err(|e| PlacementError::Request(e.to_string()))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PlacementError::Request(e.to_string()))?;
        Ok(Self { base_url, client })
    }
}

impl PlacementService for HttpPlacement {
    fn pick_cell(&self, grid_size: u32) -> Result<u32, PlacementError> {
        let url = self
            .base_url
            .join(&format!("get_mole_position/{grid_size}"))
            .map_err(|e| PlacementError::Request(e.to_string()))?;

        let resp = block_on(async {
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<PlacementResponse>()
                .await
        })
        .map_err(PlacementError::Request)?
        .map_err(|e| PlacementError::Request(e.to_string()))?;

        let cell = resp
            .position
            .as_u64()
            .ok_or_else(|| PlacementError::MalformedResponse(resp.position.to_string()))?;
        let cells = u64::from(grid_size.saturating_mul(grid_size));
        if cell == 0 || cell > cells {
            return Err(PlacementError::OutOfRange {
                cell,
                cells: grid_size.saturating_mul(grid_size),
            });
        }
        Ok(cell as u32)
    }
}

/// Client for the remote score backend.
pub struct HttpScorePersistence {
    base_url: Url,
    client: Client,
}

impl HttpScorePersistence {
    pub fn new(base_url: &str) -> Result<Self, PersistenceError> {
        let base_url =
            Url::parse(base_url).map_err(|e| PersistenceError::Request(e.to_string()))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PersistenceError::Request(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Post a final score. Callers treat failure as log-only.
    pub fn save(
        &self,
        player_name: &str,
        score: u32,
        difficulty: Difficulty,
    ) -> Result<SavedScore, PersistenceError> {
        let url = self
            .base_url
            .join("save_score")
            .map_err(|e| PersistenceError::Request(e.to_string()))?;
        let body = json!({
            "player_name": player_name,
            "score": score,
            "difficulty": difficulty.to_string(),
        });

        let resp = block_on(async {
            self.client
                .post(url)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json::<SavedScore>()
                .await
        })
        .map_err(PersistenceError::Request)?
        .map_err(|e| PersistenceError::Request(e.to_string()))?;

        if resp.status == "saved" {
            Ok(resp)
        } else {
            Err(PersistenceError::Rejected(resp.status))
        }
    }
}
