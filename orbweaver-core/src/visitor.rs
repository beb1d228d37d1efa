use chrono::{DateTime, Utc};
use orbweaver_detect::ClientProfile;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Score a visitor starts with on their first tracked request
pub const INITIAL_ENGAGEMENT: f64 = 10.0;
/// Added per revisit
pub const REVISIT_BONUS: f64 = 2.0;
/// Engagement never exceeds this
pub const ENGAGEMENT_CAP: f64 = 100.0;

/// One tracked browser session.
///
/// Created on the first request of a new session, mutated on every
/// revisit. `page_visits` counts tracked requests (so it is always at
/// least 1) and `engagement_score` stays within [10, 100] and never
/// decreases. The layout hints are randomized once at creation and the
/// front-end uses them to spread nodes around the center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub page_visits: u64,
    pub engagement_score: f64,
    pub radial_position: f64,
    pub distance: u32,
    pub client_info: ClientProfile,
}

impl VisitorRecord {
    pub fn new<R: Rng>(
        id: String,
        client_info: ClientProfile,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        // session ids are opaque, so truncate on char boundaries
        let short: String = id.chars().take(8).collect();
        Self {
            name: format!("Visitor_{}", short),
            node_type: "visitor".to_string(),
            first_seen: now,
            last_seen: now,
            page_visits: 1,
            engagement_score: INITIAL_ENGAGEMENT,
            radial_position: rng.gen_range(0.0..std::f64::consts::TAU),
            distance: rng.gen_range(100..=300),
            client_info,
            id,
        }
    }

    /// Record another tracked request in this session
    pub fn revisit(&mut self, now: DateTime<Utc>) {
        self.page_visits += 1;
        self.last_seen = now;
        self.engagement_score = (self.engagement_score + REVISIT_BONUS).min(ENGAGEMENT_CAP);
    }
}

/// The fixed central node every visitor connects to. The star endpoint
/// serves the plain `website` center; the mesh endpoint decorates its
/// `queen_spider` center with a size and color for the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CenterNode {
    pub fn website() -> Self {
        Self {
            id: "website".to_string(),
            name: "Central Site".to_string(),
            node_type: "center".to_string(),
            size: None,
            color: None,
        }
    }

    pub fn queen_spider() -> Self {
        Self {
            id: "queen_spider".to_string(),
            name: "Queen Spider".to_string(),
            node_type: "center".to_string(),
            size: Some(40),
            color: Some("#8B4513".to_string()),
        }
    }
}
