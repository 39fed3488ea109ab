use super::model::{DeviceType, UaLabels};

/// Coarse device type from the raw user agent and its classified labels.
///
/// All comparisons are case-insensitive: fallback labels arrive title-cased
/// (`Android`, `BlackBerry OS`) and user agents are mixed-case.
pub fn detect_device_type(user_agent: Option<&str>, labels: &UaLabels) -> DeviceType {
    let Some(user_agent) = user_agent else {
        return DeviceType::Desktop;
    };

    let ua = user_agent.to_lowercase();
    let family = labels.user_agent.to_lowercase();
    let os = labels.os.to_lowercase();
    let device = labels.device.to_lowercase();

    // apple
    if ua.contains("ipad") {
        return DeviceType::Mobile;
    }
    if ua.contains("iphone") || ua.contains("ipod") {
        return DeviceType::Mobile;
    }

    match device.as_str() {
        "generic tablet" => return DeviceType::Tablet,
        "generic smartphone" | "generic feature phone" => return DeviceType::Mobile,
        _ => {}
    }

    match os.as_str() {
        "blackberry tablet os" => return DeviceType::Tablet,
        "blackberry os" => return DeviceType::Mobile,
        _ => {}
    }

    // IE does not tell tablets from phones
    if ua.contains("windows") && ua.contains("touch") {
        return DeviceType::Mobile;
    }

    if ua.contains("mobile") || family.contains("mobile") {
        return DeviceType::Mobile;
    }

    // android without "mobile" in the UA is a tablet
    if os == "android" {
        return DeviceType::Tablet;
    }

    DeviceType::Desktop
}
