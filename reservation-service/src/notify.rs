use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error};

/// Flat payload handed to the mail dispatcher when a booking lands.
#[derive(Debug, Clone, Serialize)]
pub struct BookingNotice {
    pub recipient: String,
    pub name: String,
    pub date: NaiveDate,
    pub trip_number: i32,
    pub people_count: i32,
    pub rod_rental: bool,
    pub rod_rental_count: i32,
    pub phone: String,
    pub note: Option<String>,
}

/// Outbound side channels: the mail dispatcher and the public pages' cache
/// invalidation hook. Both are optional; an unconfigured endpoint turns the
/// call into a logged no-op, and no failure on either ever reaches a caller
/// as an error worth aborting for.
#[derive(Clone, Default)]
pub struct Notifier {
    client: reqwest::Client,
    notify_url: Option<String>,
    notify_api_key: Option<String>,
    notify_to: Option<String>,
    revalidate_url: Option<String>,
}

impl Notifier {
    pub fn new(
        notify_url: Option<String>,
        notify_api_key: Option<String>,
        notify_to: Option<String>,
        revalidate_url: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            notify_url,
            notify_api_key,
            notify_to,
            revalidate_url,
        }
    }

    pub fn recipient(&self) -> Option<&str> {
        self.notify_to.as_deref()
    }

    /// Fire-and-forget: the booking is already committed, so a failed
    /// notification is logged and nothing else.
    pub fn spawn_booking_notice(&self, notice: BookingNotice) {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_booking_notice(&notice).await {
                error!("booking notification failed for {}: {:#}", notice.phone, e);
            }
        });
    }

    pub async fn send_booking_notice(&self, notice: &BookingNotice) -> anyhow::Result<()> {
        let url = match &self.notify_url {
            Some(url) => url,
            None => {
                debug!("notification endpoint not configured, skipping");
                return Ok(());
            }
        };
        let mut request = self.client.post(url).json(notice);
        if let Some(key) = &self.notify_api_key {
            request = request.bearer_auth(key);
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }

    /// Tells the public pages to refetch. An empty path list falls back to
    /// the home and reservation views.
    pub async fn invalidate_cache(&self, paths: &[String]) -> anyhow::Result<()> {
        let url = match &self.revalidate_url {
            Some(url) => url,
            None => {
                debug!("revalidate endpoint not configured, skipping");
                return Ok(());
            }
        };
        let targets: Vec<&str> = if paths.is_empty() {
            vec!["/", "/reservation"]
        } else {
            paths.iter().map(String::as_str).collect()
        };
        self.client
            .post(url)
            .json(&serde_json::json!({ "paths": targets }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
