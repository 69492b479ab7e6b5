use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error};

use crate::config::NotifyConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WinnerPayload {
    raffle_id: i64,
    seat_id: i64,
    is_manual: bool,
}

/// Уведомляет внешний вебхук о выигравшем месте. Fire-and-forget:
/// результат розыгрыша уже записан, ошибка доставки только логируется
/// и никогда не откатывает победителя.
#[derive(Clone)]
pub struct WinnerNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl WinnerNotifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();
        Self {
            client,
            webhook_url: config.webhook_url.clone(),
        }
    }

    /// Запускает отправку в фоне и сразу возвращается.
    pub fn notify_winner(&self, raffle_id: i64, seat_id: i64, is_manual: bool) {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send(raffle_id, seat_id, is_manual).await {
                error!(
                    "winner webhook failed for raffle {} seat {}: {:?}",
                    raffle_id, seat_id, e
                );
            }
        });
    }

    pub async fn send(&self, raffle_id: i64, seat_id: i64, is_manual: bool) -> Result<(), reqwest::Error> {
        let Some(url) = self.webhook_url.as_deref() else {
            debug!("winner webhook not configured, skipping");
            return Ok(());
        };

        self.client
            .post(url)
            .json(&WinnerPayload {
                raffle_id,
                seat_id,
                is_manual,
            })
            .send()
            .await?
            .error_for_status()?;

        debug!("winner webhook delivered for raffle {} seat {}", raffle_id, seat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: Option<String>) -> NotifyConfig {
        NotifyConfig {
            webhook_url: url,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn delivers_winner_payload_to_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/winner"))
            .and(body_json(serde_json::json!({
                "raffleId": 7,
                "seatId": 42,
                "isManual": false
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WinnerNotifier::from_config(&config(Some(format!("{}/hooks/winner", server.uri()))));
        notifier.send(7, 42, false).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_surfaces_as_err() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WinnerNotifier::from_config(&config(Some(server.uri())));
        assert!(notifier.send(1, 1, true).await.is_err());
    }

    #[tokio::test]
    async fn missing_webhook_url_is_a_quiet_noop() {
        let notifier = WinnerNotifier::from_config(&config(None));
        notifier.send(1, 1, false).await.unwrap();
    }
}
