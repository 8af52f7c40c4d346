//! Seed agents from TOML (`[[agents]]` array)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thinktank_domain::{Agent, AgentRole, ConfigIssue, ConfigIssueCode, ProjectId};

/// One `[[agents]]` entry
///
/// # Example
///
/// ```toml
/// [[agents]]
/// id = "ada"
/// name = "Ada"
/// role = "strategy"
/// capabilities = ["api-design"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentSeed {
    /// Stable id; generated when omitted
    pub id: Option<String>,
    pub name: String,
    /// strategy | implementation | review | research | any custom name
    pub role: String,
    pub capabilities: Vec<String>,
}

impl FileAgentSeed {
    pub fn new(id: &str, name: &str, role: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            role: role.to_string(),
            capabilities: Vec::new(),
        }
    }

    fn parse_role(&self) -> AgentRole {
        self.role.parse().unwrap_or(AgentRole::Research)
    }
}

/// The team used when no `[[agents]]` are configured.
pub fn default_team() -> Vec<FileAgentSeed> {
    vec![
        FileAgentSeed::new("strategist", "Strategist", "strategy"),
        FileAgentSeed::new("implementer", "Implementer", "implementation"),
        FileAgentSeed::new("reviewer", "Reviewer", "review"),
    ]
}

/// Check seeds for empty names and duplicate ids.
pub fn validate_seeds(seeds: &[FileAgentSeed]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, seed) in seeds.iter().enumerate() {
        if seed.name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyAgentName { index },
                format!("agents[{}].name must not be empty", index),
            ));
        }
        if seed.role.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: format!("agents[{}].role", index),
                    value: seed.role.clone(),
                    valid_values: ["strategy", "implementation", "review", "research"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                },
                format!("agents[{}].role is empty, falling back to 'research'", index),
            ));
        }
        if let Some(id) = &seed.id
            && !seen.insert(id.as_str())
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateAgentId { id: id.clone() },
                format!("agents[{}].id '{}' is already used", index, id),
            ));
        }
    }
    issues
}

/// Build agents for `project_id`, skipping seeds with an empty name.
pub fn seed_agents(seeds: &[FileAgentSeed], project_id: &ProjectId) -> Vec<Agent> {
    let seeds = if seeds.is_empty() {
        default_team()
    } else {
        seeds.to_vec()
    };

    seeds
        .iter()
        .filter(|seed| !seed.name.trim().is_empty())
        .map(|seed| {
            let agent = Agent::new(project_id.clone(), seed.name.trim(), seed.parse_role())
                .with_capabilities(seed.capabilities.iter().cloned());
            match &seed.id {
                Some(id) => agent.with_id(id.as_str()),
                None => agent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_team_when_empty() {
        let agents = seed_agents(&[], &ProjectId::new("demo"));
        assert_eq!(agents.len(), 3);
        assert_eq!(agents[0].id.as_str(), "strategist");
        assert_eq!(agents[1].role, AgentRole::Implementation);
        assert!(agents.iter().all(|a| a.project_id.as_str() == "demo"));
    }

    #[test]
    fn test_custom_role_and_generated_id() {
        let seeds = vec![FileAgentSeed {
            id: None,
            name: "Sam".to_string(),
            role: "security".to_string(),
            capabilities: vec!["threat-modeling".to_string()],
        }];
        let agents = seed_agents(&seeds, &ProjectId::new("p"));
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].role, AgentRole::Custom("security".to_string()));
        assert!(agents[0].has_capability("threat-modeling"));
        assert!(!agents[0].id.as_str().is_empty());
    }

    #[test]
    fn test_validate_reports_empty_names_and_duplicates() {
        let seeds = vec![
            FileAgentSeed::new("a", "Ada", "strategy"),
            FileAgentSeed::new("a", "Alan", "review"),
            FileAgentSeed::new("b", "  ", "review"),
        ];
        let issues = validate_seeds(&seeds);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.is_error()));
        assert!(issues.iter().any(|i| i.code == ConfigIssueCode::EmptyAgentName { index: 2 }));
        assert!(
            issues
                .iter()
                .any(|i| i.code == ConfigIssueCode::DuplicateAgentId { id: "a".to_string() })
        );

        let agents = seed_agents(&seeds, &ProjectId::new("p"));
        assert_eq!(agents.len(), 2);
    }
}
