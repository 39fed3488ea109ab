use super::model::{ClassifyError, UaDetection, UaLabels};
use super::rules::UserAgentRule;
use super::subnet::InternalSubnets;

/// First custom rule matching `user_agent`, in declaration order.
pub fn detect_custom(user_agent: Option<&str>, rules: &[UserAgentRule]) -> Option<UaLabels> {
    let user_agent = user_agent?;
    rules.iter().find_map(|rule| rule.apply(user_agent))
}

/// Rule and subnet stage of user-agent detection.
///
/// A subnet lookup error is returned alongside `NeedsFallback`: the line is
/// still classified, the caller only reports it.
pub fn detect(
    user_agent: Option<&str>,
    remote_addr: Option<&str>,
    rules: &[UserAgentRule],
    subnets: &InternalSubnets,
) -> (UaDetection, Option<ClassifyError>) {
    if let Some(labels) = detect_custom(user_agent, rules) {
        return (UaDetection::Found(labels), None);
    }

    let Some(addr) = remote_addr else {
        return (UaDetection::NeedsFallback, None);
    };

    match subnets.contains(addr) {
        Ok(true) => (UaDetection::Internal, None),
        Ok(false) => (UaDetection::NeedsFallback, None),
        Err(e) => (UaDetection::NeedsFallback, Some(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn android_rule() -> UserAgentRule {
        UserAgentRule::pattern(
            Regex::new(r"^myapp_android/([0-9.]+)").unwrap(),
            UaLabels::new("myapp_android_$1", "android", "mobile"),
        )
    }

    fn internal() -> InternalSubnets {
        InternalSubnets::parse(&[
            "30.0.0.0/8".to_string(),
            "31.0.0.0/8".to_string(),
            "32.0.0.0/8".to_string(),
        ])
    }

    #[test]
    fn test_detect_custom() {
        let rules = vec![android_rule()];

        assert_eq!(
            detect_custom(Some("myapp_android/9.1"), &rules),
            Some(UaLabels::new("myapp_android_9.1", "android", "mobile"))
        );
        assert_eq!(detect_custom(None, &rules), None);
        assert_eq!(detect_custom(Some("myapp_ios/9.0"), &rules), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            android_rule(),
            UserAgentRule::exact("myapp_android/9.1", UaLabels::new("second", "second", "second")),
        ];

        let labels = detect_custom(Some("myapp_android/9.1"), &rules).unwrap();
        assert_eq!(labels.user_agent, "myapp_android_9.1");
    }

    #[test]
    fn test_detect_internal() {
        let subnets = internal();

        assert_eq!(detect(Some("curl"), Some("30.2.2.1"), &[], &subnets), (UaDetection::Internal, None));
        assert_eq!(detect(Some("curl"), None, &[], &subnets), (UaDetection::NeedsFallback, None));
        assert_eq!(detect(Some("curl"), Some("33.1.1.1"), &[], &subnets), (UaDetection::NeedsFallback, None));
    }

    #[test]
    fn test_custom_rule_beats_internal_subnet() {
        let (detection, err) = detect(Some("myapp_android/9.1"), Some("30.2.2.1"), &[android_rule()], &internal());
        assert!(matches!(detection, UaDetection::Found(_)));
        assert!(err.is_none());
    }

    #[test]
    fn test_bad_subnet_fails_open() {
        let subnets = InternalSubnets::parse(&["30.0.0.t/8".to_string()]);
        let (detection, err) = detect(Some("curl"), Some("30.2.2.1"), &[], &subnets);

        assert_eq!(detection, UaDetection::NeedsFallback);
        assert!(matches!(err, Some(ClassifyError::SubnetConfig(_))));
    }
}
