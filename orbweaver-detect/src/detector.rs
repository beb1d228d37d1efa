use crate::profile::{
    Architecture, BrowserInfo, ClientProfile, DeviceInfo, DeviceType, NetworkInfo, NetworkType,
    OsInfo, ProfileSummary, ThreatLevel,
};
use crate::rules;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Rule-based client-fingerprint classifier.
///
/// Compiles the rule tables once; every detector is a pure function of
/// its inputs and safe to call repeatedly. Nothing is cached between
/// calls and no detector ever fails: a rule that does not compile is
/// skipped at construction time.
pub struct ClientDetector {
    browser_rules: Vec<(Regex, &'static str)>,
    edge_fallback: Option<Regex>,
    os_families: Vec<Vec<(Regex, &'static str)>>,
    version_rx: Option<Regex>,
}

impl ClientDetector {
    pub fn new() -> Self {
        let browser_rules = rules::BROWSER_RULES
            .iter()
            .filter_map(|rule| compile(rule.pattern).map(|rx| (rx, rule.name)))
            .collect();

        let os_families = rules::OS_FAMILIES
            .iter()
            .map(|family| {
                family
                    .rules
                    .iter()
                    .filter_map(|rule| {
                        // OS markers match case-insensitively
                        compile(&format!("(?i){}", rule.pattern)).map(|rx| (rx, rule.name))
                    })
                    .collect()
            })
            .collect();

        Self {
            browser_rules,
            edge_fallback: compile(rules::EDGE_FALLBACK_PATTERN),
            os_families,
            version_rx: compile(rules::VERSION_PATTERN),
        }
    }

    /// Detect browser name, version and rendering engine.
    ///
    /// The engine is inferred from substring presence independently of
    /// the browser rule that wins, so Chrome UAs report WebKit (they
    /// carry both "AppleWebKit" and "like Gecko", and webkit is checked
    /// first).
    pub fn detect_browser(&self, user_agent: &str) -> BrowserInfo {
        let mut info = BrowserInfo::unknown();
        let ua_lower = user_agent.to_lowercase();

        if ua_lower.contains("webkit") {
            info.engine = "WebKit".to_string();
        } else if ua_lower.contains("gecko") {
            info.engine = "Gecko".to_string();
        } else if ua_lower.contains("blink") {
            info.engine = "Blink".to_string();
        }

        for (rx, name) in &self.browser_rules {
            if let Some(caps) = rx.captures(user_agent) {
                info.name = name.to_string();
                info.version = caps[1].to_string();
                break;
            }
        }

        // Edge ships a Chrome token, so real Edge UAs are claimed by the
        // Chrome rule above; this fallback only fires for UAs no rule
        // matched at all.
        if info.name == "Unknown Browser" && ua_lower.contains("edg/") {
            info.name = "Microsoft Edge".to_string();
            if let Some(ref rx) = self.edge_fallback
                && let Some(caps) = rx.captures(user_agent)
            {
                info.version = caps[1].to_string();
            }
        }

        info
    }

    /// Detect operating system name, version and architecture.
    ///
    /// Version comes from a generic numeric search over the whole
    /// string, not from the matched rule, so a `Mozilla/5.0` prefix
    /// yields version "5.0" regardless of the OS. Underscores are
    /// normalized to dots.
    pub fn detect_os(&self, user_agent: &str) -> OsInfo {
        let mut info = OsInfo::unknown();

        'families: for family in &self.os_families {
            for (rx, name) in family {
                if rx.is_match(user_agent) {
                    info.name = name.to_string();
                    if let Some(ref version_rx) = self.version_rx
                        && let Some(caps) = version_rx.captures(user_agent)
                    {
                        info.version = caps[1].replace('_', ".");
                    }
                    break 'families;
                }
            }
        }

        let ua_lower = user_agent.to_lowercase();
        if user_agent.contains("x86_64") || ua_lower.contains("win64") {
            info.architecture = Architecture::SixtyFourBit;
        } else if user_agent.contains("i686") || user_agent.contains("i386") {
            info.architecture = Architecture::ThirtyTwoBit;
        } else if ua_lower.contains("arm") {
            info.architecture = Architecture::Arm;
        }

        info
    }

    /// Detect device type, brand and model. Mobile keywords are checked
    /// before tablet keywords; desktop is the default.
    pub fn detect_device(&self, user_agent: &str) -> DeviceInfo {
        let mut info = DeviceInfo::unknown();
        let ua_lower = user_agent.to_lowercase();

        if rules::MOBILE_KEYWORDS.iter().any(|kw| ua_lower.contains(kw)) {
            info.device_type = DeviceType::Mobile;
            info.is_mobile = true;
        } else if rules::TABLET_KEYWORDS.iter().any(|kw| ua_lower.contains(kw)) {
            info.device_type = DeviceType::Tablet;
            info.is_tablet = true;
        }

        for (keyword, brand, model) in rules::BRAND_RULES {
            if ua_lower.contains(keyword) {
                info.brand = brand.to_string();
                info.model = model.to_string();
                break;
            }
        }

        info
    }

    /// Classify the network path from the client IP and request headers.
    ///
    /// Header keys are expected lower-cased (the dispatcher normalizes
    /// them). The final threat level is recomputed from the score table
    /// {0: Low, 1: Low, 2: Medium, 3: High, _: Low}; the table is the
    /// binding contract even where it contradicts the TOR special case
    /// (TOR alone scores 2 and comes out Medium, and a full
    /// proxy+vpn+TOR combination scores 4 and falls through to Low).
    pub fn detect_network(&self, ip: &str, headers: &HashMap<String, String>) -> NetworkInfo {
        let mut info = NetworkInfo::direct(ip);

        if rules::PROXY_HEADERS.iter().any(|h| headers.contains_key(*h)) {
            info.is_proxy = true;
            info.network_type = NetworkType::Proxy;
            info.threat_level = ThreatLevel::Medium;
        }

        if rules::PRIVATE_PREFIXES.iter().any(|p| ip.starts_with(p)) {
            info.is_vpn = true;
            info.network_type = NetworkType::VpnLocal;
            info.country = "Local Network".to_string();
        }

        // Substring scan over the serialized header collection. "tor"
        // matches anywhere, so a Motorola UA forwarded in the headers
        // trips this too.
        let serialized = serialize_headers(headers);
        if serialized.contains(".onion") || serialized.contains("tor") {
            info.network_type = NetworkType::Tor;
            info.threat_level = ThreatLevel::High;
        }

        let mut score = 0;
        if info.is_proxy {
            score += 1;
        }
        if info.is_vpn {
            score += 1;
        }
        if info.network_type == NetworkType::Tor {
            score += 2;
        }
        info.threat_level = match score {
            0 | 1 => ThreatLevel::Low,
            2 => ThreatLevel::Medium,
            3 => ThreatLevel::High,
            _ => ThreatLevel::Low,
        };

        info
    }

    /// Full fingerprint of one request's metadata
    pub fn analyze(
        &self,
        user_agent: &str,
        ip: &str,
        headers: &HashMap<String, String>,
    ) -> ClientProfile {
        let browser = self.detect_browser(user_agent);
        let operating_system = self.detect_os(user_agent);
        let device = self.detect_device(user_agent);
        let network = self.detect_network(ip, headers);

        let summary = ProfileSummary {
            browser_full: format!("{} {}", browser.name, browser.version),
            os_full: format!("{} {}", operating_system.name, operating_system.version),
            device_full: format!(
                "{} {} ({})",
                device.brand,
                device.model,
                device.device_type.as_str()
            ),
            network_type: network.network_type,
            threat_level: network.threat_level,
        };

        debug!(
            browser = %summary.browser_full,
            os = %summary.os_full,
            device = %summary.device_full,
            ip = %network.ip_address,
            threat = network.threat_level.as_str(),
            "classified client"
        );

        ClientProfile {
            browser,
            operating_system,
            device,
            network,
            user_agent: user_agent.to_string(),
            summary,
        }
    }
}

impl Default for ClientDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(rx) => Some(rx),
        Err(e) => {
            warn!("skipping unparsable rule pattern '{}': {}", pattern, e);
            None
        }
    }
}

fn serialize_headers(headers: &HashMap<String, String>) -> String {
    let mut parts: Vec<String> = headers
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect();
    parts.sort();
    parts.join("\n").to_lowercase()
}
