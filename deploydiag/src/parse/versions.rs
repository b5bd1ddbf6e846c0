//! Component version lines (`Backend Version: 2.4.1`)

use std::collections::BTreeMap;

use regex::Regex;
use tracing::warn;

use crate::parse::patterns::VERSION_TEMPLATE;

/// First announced version for each component, `None` when the log never
/// mentions it
pub fn extract_versions<S: AsRef<str>>(text: &str, components: &[S]) -> BTreeMap<String, Option<String>> {
    components
        .iter()
        .map(|component| {
            let component = component.as_ref();
            (component.to_string(), extract_version(text, component))
        })
        .collect()
}

fn extract_version(text: &str, component: &str) -> Option<String> {
    let pattern = VERSION_TEMPLATE.replace("{component}", &regex::escape(component));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid version pattern for component {}: {}", component, e);
            return None;
        }
    };
    re.captures(text)
        .and_then(|caps| caps.name("version"))
        .map(|version| version.as_str().trim_end_matches('.').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_versions() {
        let log = "\
booting
Backend Version: 2.4.1
frontend version: 1.0.0.
Backend Version: 9.9.9
";
        let versions = extract_versions(log, &["backend", "frontend", "database"]);
        assert_eq!(versions["backend"].as_deref(), Some("2.4.1"));
        assert_eq!(versions["frontend"].as_deref(), Some("1.0.0"));
        assert_eq!(versions["database"], None);
    }

    #[test]
    fn test_component_name_is_escaped() {
        let versions = extract_versions("c++ Version: 3.1", &["c++"]);
        assert_eq!(versions["c++"].as_deref(), Some("3.1"));
    }
}
