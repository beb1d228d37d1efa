// Ordered classification rule tables. Every table is scanned
// top-to-bottom with first-match-wins semantics, so the priority order
// is part of the contract (a Chrome UA never reaches the Safari rule,
// and a real Edge UA is claimed by the Chrome rule first).

/// Browser rule: version-capturing pattern plus canonical display name
pub struct BrowserRule {
    pub pattern: &'static str,
    pub name: &'static str,
}

pub const BROWSER_RULES: &[BrowserRule] = &[
    BrowserRule {
        pattern: r"Chrome/([\d\.]+)",
        name: "Google Chrome",
    },
    BrowserRule {
        pattern: r"Firefox/([\d\.]+)",
        name: "Mozilla Firefox",
    },
    BrowserRule {
        pattern: r"Safari/([\d\.]+)",
        name: "Apple Safari",
    },
    BrowserRule {
        pattern: r"Edg/([\d\.]+)",
        name: "Microsoft Edge",
    },
    BrowserRule {
        pattern: r"OPR/([\d\.]+)",
        name: "Opera",
    },
    BrowserRule {
        pattern: r"SamsungBrowser/([\d\.]+)",
        name: "Samsung Browser",
    },
];

/// Fallback for Edge UAs that dodge every rule above; matched
/// case-sensitively after a case-insensitive "edg/" presence check.
pub const EDGE_FALLBACK_PATTERN: &str = r"Edg/([\d\.]+)";

/// OS rule: case-insensitive marker pattern plus display name
pub struct OsRule {
    pub pattern: &'static str,
    pub name: &'static str,
}

/// OS family: ordered rules; the family loop stops at the first family
/// containing a match.
pub struct OsFamily {
    pub family: &'static str,
    pub rules: &'static [OsRule],
}

pub const OS_FAMILIES: &[OsFamily] = &[
    OsFamily {
        family: "windows",
        rules: &[
            OsRule { pattern: r"Windows NT 10.0", name: "Windows 10/11" },
            OsRule { pattern: r"Windows NT 6.3", name: "Windows 8.1" },
            OsRule { pattern: r"Windows NT 6.2", name: "Windows 8" },
            OsRule { pattern: r"Windows NT 6.1", name: "Windows 7" },
            OsRule { pattern: r"Windows NT 6.0", name: "Windows Vista" },
            OsRule { pattern: r"Windows NT 5.1", name: "Windows XP" },
        ],
    },
    OsFamily {
        family: "mac",
        rules: &[
            OsRule { pattern: r"Mac OS X 10_15", name: "macOS Catalina" },
            OsRule { pattern: r"Mac OS X 10_14", name: "macOS Mojave" },
            OsRule { pattern: r"Mac OS X 10_13", name: "macOS High Sierra" },
            OsRule { pattern: r"Mac OS X", name: "macOS" },
        ],
    },
    OsFamily {
        family: "linux",
        rules: &[
            OsRule { pattern: r"Linux x86_64", name: "Linux 64-bit" },
            OsRule { pattern: r"Linux i686", name: "Linux 32-bit" },
            OsRule { pattern: r"Ubuntu", name: "Ubuntu" },
            OsRule { pattern: r"Fedora", name: "Fedora" },
        ],
    },
    OsFamily {
        family: "android",
        rules: &[
            OsRule { pattern: r"Android 1[0-3]", name: "Android 10-13" },
            OsRule { pattern: r"Android 9", name: "Android Pie" },
            OsRule { pattern: r"Android 8", name: "Android Oreo" },
        ],
    },
    OsFamily {
        family: "ios",
        rules: &[
            OsRule { pattern: r"iPhone OS 1[4-6]", name: "iOS 14-16" },
            OsRule { pattern: r"iPhone OS 13", name: "iOS 13" },
            OsRule { pattern: r"iPhone OS 12", name: "iOS 12" },
        ],
    },
];

/// Generic version extraction over the whole user-agent string: first
/// run of digits/dots/underscores, independent of which OS matched.
pub const VERSION_PATTERN: &str = r"(\d+[\.\_\d]+)";

// Device keyword sets, checked against the lower-cased UA.
// Mobile is checked before tablet; anything else stays desktop.
pub const MOBILE_KEYWORDS: &[&str] = &["mobile", "android", "iphone", "blackberry"];
pub const TABLET_KEYWORDS: &[&str] = &["tablet", "ipad"];

/// Brand cascade: (lower-cased keyword, brand, model), first match wins
pub const BRAND_RULES: &[(&str, &str, &str)] = &[
    ("iphone", "Apple", "iPhone"),
    ("ipad", "Apple", "iPad"),
    ("macintosh", "Apple", "Mac"),
    ("samsung", "Samsung", "Unknown"),
    ("huawei", "Huawei", "Unknown"),
    ("xiaomi", "Xiaomi", "Unknown"),
    ("motorola", "Motorola", "Unknown"),
];

/// Header names whose presence marks the request as proxied.
/// Matched case-sensitively against lower-cased header keys.
pub const PROXY_HEADERS: &[&str] = &["x-forwarded-for", "x-real-ip", "x-proxy-id", "via"];

/// Textual prefixes of private/link-local ranges treated as VPN/Local
pub const PRIVATE_PREFIXES: &[&str] = &["192.168.", "10.", "172.16.", "169.254."];
