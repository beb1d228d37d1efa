use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "64-bit")]
    SixtyFourBit,
    #[serde(rename = "32-bit")]
    ThirtyTwoBit,
    #[serde(rename = "ARM")]
    Arm,
    Unknown,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::SixtyFourBit => "64-bit",
            Architecture::ThirtyTwoBit => "32-bit",
            Architecture::Arm => "ARM",
            Architecture::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
            DeviceType::Desktop => "Desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    Direct,
    Proxy,
    #[serde(rename = "VPN/Local")]
    VpnLocal,
    #[serde(rename = "TOR")]
    Tor,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Direct => "Direct",
            NetworkType::Proxy => "Proxy",
            NetworkType::VpnLocal => "VPN/Local",
            NetworkType::Tor => "TOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Low",
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserInfo {
    pub name: String,
    pub version: String,
    pub engine: String,
}

impl BrowserInfo {
    pub fn unknown() -> Self {
        Self {
            name: "Unknown Browser".to_string(),
            version: "Unknown".to_string(),
            engine: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub architecture: Architecture,
}

impl OsInfo {
    pub fn unknown() -> Self {
        Self {
            name: "Unknown OS".to_string(),
            version: "Unknown".to_string(),
            architecture: Architecture::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub brand: String,
    pub model: String,
    pub is_mobile: bool,
    pub is_tablet: bool,
}

impl DeviceInfo {
    pub fn unknown() -> Self {
        Self {
            device_type: DeviceType::Desktop,
            brand: "Unknown".to_string(),
            model: "Unknown".to_string(),
            is_mobile: false,
            is_tablet: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    pub is_proxy: bool,
    pub is_vpn: bool,
    pub country: String,
    pub threat_level: ThreatLevel,
}

impl NetworkInfo {
    pub fn direct(ip: &str) -> Self {
        Self {
            ip_address: ip.to_string(),
            network_type: NetworkType::Direct,
            is_proxy: false,
            is_vpn: false,
            country: "Unknown".to_string(),
            threat_level: ThreatLevel::Low,
        }
    }
}

/// Concatenated display strings for log lines and node tooltips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub browser_full: String,
    pub os_full: String,
    pub device_full: String,
    pub network_type: NetworkType,
    pub threat_level: ThreatLevel,
}

/// Full fingerprint of one client, produced once per new session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub browser: BrowserInfo,
    pub operating_system: OsInfo,
    pub device: DeviceInfo,
    pub network: NetworkInfo,
    pub user_agent: String,
    pub summary: ProfileSummary,
}

impl ClientProfile {
    /// All-Unknown fallback profile. The detectors never fail on their
    /// own, but callers that cannot run them still get a usable record.
    pub fn unknown(user_agent: &str) -> Self {
        let browser = BrowserInfo::unknown();
        let operating_system = OsInfo::unknown();
        let device = DeviceInfo::unknown();
        let network = NetworkInfo::direct("unknown");
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
        Self {
            browser,
            operating_system,
            device,
            network,
            user_agent: user_agent.to_string(),
            summary,
        }
    }
}
