// ── Remote task issuer ──
//
// Wraps single-pair `setParameterValues` submissions. The ACS's
// synchronous acknowledgement is the only success signal; whether the
// CPE actually applied the value is not observable here.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use acslink_api::{AcsClient, Task, TaskReceipt};

use crate::config::SettleStrategy;
use crate::error::CoreError;
use crate::model::DeviceHandle;
use crate::resolver::DeviceResolver;

pub const PERIODIC_INFORM_INTERVAL_PATH: &str =
    "InternetGatewayDevice.ManagementServer.PeriodicInformInterval";

/// Submits configuration-change tasks for resolved devices.
pub struct TaskIssuer<'a> {
    client: &'a AcsClient,
    connection_request: bool,
    settle: SettleStrategy,
}

impl<'a> TaskIssuer<'a> {
    pub fn new(client: &'a AcsClient, connection_request: bool, settle: SettleStrategy) -> Self {
        Self {
            client,
            connection_request,
            settle,
        }
    }

    /// Set one parameter. Values are not logged; passphrases go through here.
    pub async fn submit(
        &self,
        handle: &DeviceHandle,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<TaskReceipt, CoreError> {
        let task = Task::set_parameter(path, value);
        let receipt = self
            .client
            .submit_task(&handle.id, &task, self.connection_request)
            .await?;
        info!(
            device_id = %handle.id,
            path,
            task_id = receipt.id.as_deref().unwrap_or("-"),
            queued = receipt.queued,
            "task acknowledged"
        );
        Ok(receipt)
    }

    /// Change the periodic inform interval, then wait for it to settle.
    ///
    /// Submission failures propagate. The wait itself is best-effort and
    /// never fails.
    pub async fn set_polling_interval(
        &self,
        handle: &DeviceHandle,
        seconds: u32,
    ) -> Result<TaskReceipt, CoreError> {
        let submitted_at = Utc::now();
        let receipt = self
            .submit(handle, PERIODIC_INFORM_INTERVAL_PATH, seconds)
            .await?;
        self.settle(&handle.id, submitted_at).await;
        Ok(receipt)
    }

    /// Give the CPE time to pick up a submitted task.
    pub async fn settle(&self, device_id: &str, submitted_at: DateTime<Utc>) {
        match self.settle {
            SettleStrategy::FixedDelay(delay) => {
                debug!(device_id, ?delay, "settling");
                sleep(delay).await;
            }
            SettleStrategy::AwaitInform {
                timeout,
                poll_every,
            } => self.await_inform(device_id, submitted_at, timeout, poll_every).await,
        }
    }

    async fn await_inform(
        &self,
        device_id: &str,
        submitted_at: DateTime<Utc>,
        timeout: std::time::Duration,
        poll_every: std::time::Duration,
    ) {
        let deadline = Instant::now() + timeout;
        let resolver = DeviceResolver::new(self.client);

        loop {
            if Instant::now() >= deadline {
                warn!(device_id, ?timeout, "device did not inform before settle timeout");
                return;
            }
            sleep(poll_every).await;

            match resolver.fetch(device_id).await {
                Ok(Some(handle)) if handle.last_inform.is_some_and(|t| t > submitted_at) => {
                    debug!(device_id, last_inform = ?handle.last_inform, "device informed");
                    return;
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    warn!(device_id, "device vanished while settling");
                    return;
                }
                Err(e) => warn!(device_id, error = %e, "settle poll failed"),
            }
        }
    }
}
