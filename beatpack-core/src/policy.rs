// beatpack-core/src/policy.rs
use beatpack_common::model::ProductConfig;
use serde::Serialize;

/// What a rule matches a file name against. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMatcher {
    /// Extension including the leading dot, e.g. `.yml`.
    Extension(String),
    /// Exact file name, e.g. `lsbeat.exe`.
    FileName(String),
}

/// One ordered exclusion rule with the reason it exists, so the policy can
/// be inspected, serialized and tested on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionRule {
    pub reason: &'static str,
    pub matcher: RuleMatcher,
}

impl ExclusionRule {
    fn matches(&self, file_name: &str) -> bool {
        let name = file_name.to_ascii_lowercase();
        match &self.matcher {
            RuleMatcher::Extension(ext) => name.ends_with(&ext.to_ascii_lowercase()),
            RuleMatcher::FileName(want) => name == want.to_ascii_lowercase(),
        }
    }
}

/// Decides which staged files stay out of the immutable install tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionPolicy {
    rules: Vec<ExclusionRule>,
}

impl ExclusionPolicy {
    pub fn for_product(product: &ProductConfig, exe_name: &str) -> Self {
        let mut rules = vec![
            ExclusionRule {
                reason: "configuration lives in the mutable data area",
                matcher: RuleMatcher::Extension(".yml".to_string()),
            },
            ExclusionRule {
                reason: "service registration replaces install scripts",
                matcher: RuleMatcher::Extension(".ps1".to_string()),
            },
            ExclusionRule {
                reason: "plain-text documentation",
                matcher: RuleMatcher::Extension(".txt".to_string()),
            },
            ExclusionRule {
                reason: "markdown documentation",
                matcher: RuleMatcher::Extension(".md".to_string()),
            },
        ];
        if product.is_windows_service {
            // The executable re-enters the tree as the explicit
            // service-carrying node, never through the generic set.
            rules.push(ExclusionRule {
                reason: "main executable carries the service registration",
                matcher: RuleMatcher::FileName(exe_name.to_string()),
            });
        }
        Self { rules }
    }

    /// First matching rule wins; `None` means the file is included.
    pub fn exclusion_reason(&self, file_name: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(file_name))
            .map(|rule| rule.reason)
    }

    pub fn includes(&self, file_name: &str) -> bool {
        self.exclusion_reason(file_name).is_none()
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }
}
