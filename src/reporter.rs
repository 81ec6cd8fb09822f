use crate::presentation::ResultSink;
use crate::scoring::SkillVector;
use log::{info, warn};
use serde::Serialize;
use std::sync::Mutex;

/// Fixed identifier of this game on the identity server.
pub const GAME_ID: u32 = 5;

/// Wire payload for the identity server.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GameResult {
    #[serde(rename = "nfcId")]
    pub nfc_id: String,
    #[serde(rename = "gameId")]
    pub game_id: u32,
    pub skill1: i32,
    pub skill2: i32,
    pub skill3: i32,
}

impl GameResult {
    pub fn new(nfc_id: &str, skills: SkillVector) -> Self {
        Self {
            nfc_id: nfc_id.to_string(),
            game_id: GAME_ID,
            skill1: skills.empathy,
            skill2: skills.active_listening,
            skill3: skills.self_awareness,
        }
    }
}

/// Hands completed-session results off to the identity server.
///
/// A submitted skill vector is queued until a card id arrives; the POST then
/// runs on a worker thread. Delivery failures are logged and never reach the
/// session engine.
#[derive(Debug)]
pub struct ResultReporter {
    host: String,
    port: u16,
    pending: Mutex<Option<SkillVector>>,
    last_card: Mutex<Option<String>>,
}

impl ResultReporter {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            pending: Mutex::new(None),
            last_card: Mutex::new(None),
        }
    }

    pub fn endpoint_url(&self, nfc_id: &str) -> String {
        format!("http://{}:{}/users/{}", self.host, self.port, nfc_id)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }

    pub fn last_card(&self) -> Option<String> {
        self.last_card.lock().unwrap().clone()
    }

    /// A card was presented to the reader. Sends the queued result if one
    /// exists; otherwise the read is logged and dropped.
    pub fn on_card_read(&self, nfc_id: &str) {
        info!("card read: {}", nfc_id);
        *self.last_card.lock().unwrap() = Some(nfc_id.to_string());

        let taken = self.pending.lock().unwrap().take();
        match taken {
            Some(skills) => self.send(GameResult::new(nfc_id, skills)),
            None => info!("card read but no game result is pending"),
        }
    }

    /// Card removal keeps the last read id.
    pub fn on_card_removed(&self) {
        info!("card removed");
    }

    fn send(&self, result: GameResult) {
        let url = self.endpoint_url(&result.nfc_id);
        let body = match serde_json::to_string(&result) {
            Ok(body) => body,
            Err(e) => {
                warn!("could not serialize game result: {}", e);
                return;
            }
        };

        info!("posting result for card {} to {}", result.nfc_id, url);

        std::thread::spawn(move || {
            let client = reqwest::blocking::Client::new();
            let response = client
                .post(&url)
                .header("Content-Type", "application/json")
                .body(body)
                .send();

            match response {
                Ok(resp) if resp.status().is_success() => {
                    info!("result delivered ({})", resp.status());
                }
                Ok(resp) => {
                    warn!("result rejected by server: {}", resp.status());
                }
                Err(e) => {
                    warn!("result delivery failed: {}", e);
                }
            }
        });
    }
}

impl ResultSink for ResultReporter {
    /// Queues one result per completed session, replacing any stale one.
    fn submit(&self, skills: SkillVector) {
        info!(
            "game result queued - empathy:{} active_listening:{} self_awareness:{}",
            skills.empathy, skills.active_listening, skills.self_awareness
        );
        *self.pending.lock().unwrap() = Some(skills);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_skill_vector;

    #[test]
    fn test_payload_shape() {
        let result = GameResult::new("ABC123", compute_skill_vector(9));
        let json = serde_json::to_string(&result).unwrap();

        assert_eq!(
            json,
            r#"{"nfcId":"ABC123","gameId":5,"skill1":9,"skill2":7,"skill3":5}"#
        );
    }

    #[test]
    fn test_endpoint_url() {
        let reporter = ResultReporter::new("10.1.2.3", 3000);
        assert_eq!(
            reporter.endpoint_url("CARD42"),
            "http://10.1.2.3:3000/users/CARD42"
        );
    }

    #[test]
    fn test_submit_queues_until_card() {
        let reporter = ResultReporter::new("127.0.0.1", 3000);
        assert!(!reporter.has_pending());

        reporter.submit(compute_skill_vector(7));
        assert!(reporter.has_pending());
    }

    #[test]
    fn test_card_read_without_pending_keeps_id() {
        let reporter = ResultReporter::new("127.0.0.1", 3000);

        reporter.on_card_read("CARD1");
        reporter.on_card_removed();

        assert!(!reporter.has_pending());
        assert_eq!(reporter.last_card(), Some("CARD1".to_string()));
    }

    #[test]
    fn test_resubmit_replaces_stale_result() {
        let reporter = ResultReporter::new("127.0.0.1", 3000);

        reporter.submit(compute_skill_vector(0));
        reporter.submit(compute_skill_vector(12));

        assert!(reporter.has_pending());
    }
}
