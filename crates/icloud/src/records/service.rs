//! Records verb layer.

use reqwest::Method;
use tracing::{debug, instrument};

use crate::client::Client;
use crate::error::{Error, InvalidInputError};
use crate::types::Database;

use super::types::{MAX_OPERATIONS_PER_REQUEST, RecordsRequest, RecordsResponse};

const MODIFY_PATH: &str = "records/modify";

/// Record related operations of the CloudKit Web Services API.
///
/// Obtained from [`Client::records`]; borrows the client for dispatch.
#[derive(Debug, Clone, Copy)]
pub struct RecordsService<'a> {
    client: &'a Client,
}

impl<'a> RecordsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Apply `request` to records in `database`.
    ///
    /// Operations are applied by the server in list order. Requests with
    /// more than [`MAX_OPERATIONS_PER_REQUEST`] operations are rejected
    /// before anything is sent.
    #[instrument(skip(self, request), fields(operations = request.operations.len()))]
    pub async fn modify(
        &self,
        database: Database,
        request: &RecordsRequest,
    ) -> Result<RecordsResponse, Error> {
        let count = request.operations.len();
        if count > MAX_OPERATIONS_PER_REQUEST {
            return Err(InvalidInputError::TooManyOperations {
                count,
                max: MAX_OPERATIONS_PER_REQUEST,
            }
            .into());
        }

        let path = modify_path(database);
        debug!(%path, "modifying records");
        self.client.call(Method::POST, &path, Some(request)).await
    }
}

fn modify_path(database: Database) -> String {
    format!("/{database}/{MODIFY_PATH}")
}
