//! Client for the remote game rules service.

use crate::error::{RulesError, RulesErrorKind};
use crate::games::tictactoe::{
    Board, BoardRequest, HealthReport, MoveSuggestion, Position, StateReport,
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Win/tie detection and computer move selection, provided by a collaborator.
///
/// The controller only ever talks to this trait, so tests can swap in a
/// scripted implementation.
#[async_trait::async_trait]
pub trait GameRulesService: Send + Sync {
    /// Reports whether `board` is ongoing, won or tied.
    async fn check_game_state(&self, board: &Board) -> Result<StateReport, RulesError>;

    /// Picks an empty cell for the computer to claim on `board`.
    async fn compute_move(&self, board: &Board) -> Result<Position, RulesError>;
}

/// HTTP implementation of [`GameRulesService`].
#[derive(Debug, Clone)]
pub struct HttpRulesClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRulesClient {
    /// Creates a client for the service at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, RulesError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        info!("Created rules service client");
        Ok(Self { base_url, client })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes `GET /health`.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<HealthReport, RulesError> {
        let report: HealthReport = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(status = %report.status, "Health check answered");
        Ok(report)
    }

    /// POSTs the board to `path` and decodes the JSON answer.
    async fn post_board<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        board: &Board,
    ) -> Result<T, RulesError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Sending board to rules service");

        let response = self
            .client
            .post(&url)
            .json(&BoardRequest { board: *board })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RulesError::new(RulesErrorKind::Status(status.as_u16())));
        }

        let body = response.text().await?;
        debug!(status = %status, body = %body, "Got rules service response");
        serde_json::from_str(&body)
            .map_err(|e| RulesError::new(RulesErrorKind::Decode(e.to_string())))
    }
}

#[async_trait::async_trait]
impl GameRulesService for HttpRulesClient {
    #[instrument(skip(self, board))]
    async fn check_game_state(&self, board: &Board) -> Result<StateReport, RulesError> {
        let report: StateReport = self.post_board("check_game_state", board).await?;
        debug!(?report, "Game state checked");
        Ok(report)
    }

    #[instrument(skip(self, board))]
    async fn compute_move(&self, board: &Board) -> Result<Position, RulesError> {
        let suggestion: MoveSuggestion = self.post_board("compute_move", board).await?;
        let position = suggestion.position().ok_or_else(|| {
            RulesError::new(RulesErrorKind::OffBoard {
                row: suggestion.row,
                col: suggestion.col,
            })
        })?;
        debug!(%position, "Computer move suggested");
        Ok(position)
    }
}
