// Task submission endpoint
//
// `POST /devices/{id}/tasks`. The synchronous response is the only
// acknowledgement the ACS gives; nothing here waits for the CPE.

use reqwest::StatusCode;
use tracing::debug;

use crate::client::AcsClient;
use crate::error::Error;
use crate::models::{Task, TaskReceipt};

impl AcsClient {
    /// Submit a task for one device.
    ///
    /// With `connection_request` set, the ACS is asked to contact the CPE
    /// immediately (`?connection_request`); otherwise the task waits for
    /// the next periodic Inform. A 202 response is still an acknowledgement
    /// and is reported through [`TaskReceipt::queued`].
    pub async fn submit_task(
        &self,
        device_id: &str,
        task: &Task,
        connection_request: bool,
    ) -> Result<TaskReceipt, Error> {
        let mut url = self.url(&["devices", device_id, "tasks"])?;
        if connection_request {
            url.set_query(Some("connection_request"));
        }
        debug!(device_id, task = task.name(), connection_request, "submitting task");

        let (status, mut receipt): (StatusCode, TaskReceipt) = self.post_json(url, task).await?;
        receipt.queued = status == StatusCode::ACCEPTED;
        Ok(receipt)
    }
}
