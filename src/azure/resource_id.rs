//! ARM resource identifiers
//!
//! Parses path-style identifiers such as
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/virtualNetworks/{vnet}/subnets/{subnet}`.
//!
//! Parsing never fails. An identifier shape that is not recognised yields no
//! match, and callers treat that as "omit this link".

/// Segment that introduces the provider namespace
const PROVIDERS: &str = "providers";

/// A parsed ARM resource identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    segments: Vec<String>,
}

impl ResourceId {
    /// Split an identifier into its non-empty path segments
    pub fn parse(identifier: &str) -> Self {
        Self {
            segments: identifier
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Value following the first occurrence of `label`.
    ///
    /// ARM identifiers alternate label and value, so only even positions are
    /// considered labels. A resource group named `subnets` therefore never
    /// shadows the real `subnets` label further down the path.
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.find_value(|segment| segment == label)
    }

    /// Like [`ResourceId::value_of`] but ignoring ASCII case in the label
    pub fn value_of_ignore_case(&self, label: &str) -> Option<&str> {
        self.find_value(|segment| segment.eq_ignore_ascii_case(label))
    }

    fn find_value(&self, matches: impl Fn(&str) -> bool) -> Option<&str> {
        self.segments
            .iter()
            .enumerate()
            .step_by(2)
            .find(|(_, segment)| matches(segment.as_str()))
            .and_then(|(idx, _)| self.segments.get(idx + 1))
            .map(String::as_str)
    }

    /// Values following each label, in label order. `None` if any is missing.
    pub fn values_of(&self, labels: &[&str]) -> Option<Vec<String>> {
        labels
            .iter()
            .map(|label| self.value_of(label).map(str::to_string))
            .collect()
    }

    fn provider_index(&self) -> Option<usize> {
        self.segments
            .iter()
            .enumerate()
            .step_by(2)
            .find(|(_, segment)| segment.eq_ignore_ascii_case(PROVIDERS))
            .map(|(idx, _)| idx)
    }

    /// Provider namespace, e.g. `Microsoft.Network`
    pub fn provider_namespace(&self) -> Option<&str> {
        let idx = self.provider_index()?;
        self.segments.get(idx + 1).map(String::as_str)
    }

    /// Type/name pairs after the namespace. `None` when the tail is empty or odd.
    fn type_name_pairs(&self) -> Option<&[String]> {
        let idx = self.provider_index()?;
        let tail = self.segments.get(idx + 2..)?;
        if tail.is_empty() || tail.len() % 2 != 0 {
            return None;
        }
        Some(tail)
    }

    /// Type labels after the namespace, e.g. `["virtualNetworks", "subnets"]`
    pub fn type_labels(&self) -> Option<Vec<&str>> {
        Some(
            self.type_name_pairs()?
                .iter()
                .step_by(2)
                .map(String::as_str)
                .collect(),
        )
    }

    /// Full resource type, e.g. `Microsoft.Network/virtualNetworks/subnets`
    pub fn resource_type(&self) -> Option<String> {
        let namespace = self.provider_namespace()?;
        let labels = self.type_labels()?;
        Some(format!("{}/{}", namespace, labels.join("/")))
    }

    /// Name of the innermost resource
    pub fn name(&self) -> Option<&str> {
        self.type_name_pairs()?.last().map(String::as_str)
    }
}

/// Extract the value following each wanted label, in order.
///
/// Returns `None` if any label is missing or has no value after it.
pub fn parse(identifier: &str, labels: &[&str]) -> Option<Vec<String>> {
    ResourceId::parse(identifier).values_of(labels)
}

/// Final path segment of an identifier
pub fn extract_name(identifier: &str) -> Option<String> {
    identifier
        .rsplit('/')
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBNET_ID: &str = "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Network/virtualNetworks/vnet-1/subnets/default";

    #[test]
    fn test_parse_extracts_labels_in_order() {
        let values = parse(SUBNET_ID, &["virtualNetworks", "subnets"]);
        assert_eq!(
            values,
            Some(vec!["vnet-1".to_string(), "default".to_string()])
        );
    }

    #[test]
    fn test_parse_nested_child() {
        let id = "/subscriptions/S/resourceGroups/sub1/providers/NS/typeA/parentX/typeB/childY";
        assert_eq!(
            parse(id, &["typeA", "typeB"]),
            Some(vec!["parentX".to_string(), "childY".to_string()])
        );
    }

    #[test]
    fn test_parse_missing_label_is_no_match() {
        assert_eq!(parse(SUBNET_ID, &["virtualNetworks", "routeTables"]), None);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(parse(SUBNET_ID, &["virtualnetworks"]), None);
    }

    #[test]
    fn test_parse_label_without_value_is_no_match() {
        assert_eq!(parse("/subscriptions/sub-1/resourceGroups", &["resourceGroups"]), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let id = "/subscriptions/s/resourceGroups/rg/providers/NS/things/first/things/second";
        assert_eq!(parse(id, &["things"]), Some(vec!["first".to_string()]));
    }

    #[test]
    fn test_value_named_like_label_is_not_a_label() {
        let id = "/subscriptions/s/resourceGroups/subnets/providers/Microsoft.Network/virtualNetworks/v/subnets/real";
        assert_eq!(parse(id, &["subnets"]), Some(vec!["real".to_string()]));
    }

    #[test]
    fn test_resource_type_and_name() {
        let id = ResourceId::parse(SUBNET_ID);
        assert_eq!(id.provider_namespace(), Some("Microsoft.Network"));
        assert_eq!(
            id.resource_type().as_deref(),
            Some("Microsoft.Network/virtualNetworks/subnets")
        );
        assert_eq!(id.name(), Some("default"));
    }

    #[test]
    fn test_odd_tail_yields_no_name() {
        let id = ResourceId::parse(
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/subnets",
        );
        assert_eq!(id.name(), None);
        assert_eq!(id.resource_type(), None);
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name(SUBNET_ID).as_deref(), Some("default"));
        assert_eq!(extract_name("plain").as_deref(), Some("plain"));
        assert_eq!(extract_name("/trailing/"), Some("trailing".to_string()));
        assert_eq!(extract_name(""), None);
    }
}
