//! Conflict resolution strategies.
//!
//! Strategies are a closed set selected by configuration. Every strategy is
//! deterministic: positions are ordered by aggregate confidence, then
//! shorter content, then agent id.

use super::entities::{AgentPosition, Resolution, ResolutionKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How a conflicting view is settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Adopt the position with the highest aggregate confidence.
    HighestConfidence,
    /// Merge positions whose aggregate confidences lie within
    /// `complementary_margin` of the leader; otherwise adopt the leader.
    Synthesis { complementary_margin: f64 },
    /// Adopt the leader only if it wins by at least `min_margin`;
    /// otherwise leave the view unresolved.
    Strict { min_margin: f64 },
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        ResolutionStrategy::Synthesis {
            complementary_margin: 0.05,
        }
    }
}

fn compare_positions(a: &AgentPosition, b: &AgentPosition) -> Ordering {
    b.aggregate_confidence
        .total_cmp(&a.aggregate_confidence)
        .then_with(|| a.content.len().cmp(&b.content.len()))
        .then_with(|| a.agent_id.cmp(&b.agent_id))
}

impl ResolutionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionStrategy::HighestConfidence => "highest_confidence",
            ResolutionStrategy::Synthesis { .. } => "synthesis",
            ResolutionStrategy::Strict { .. } => "strict",
        }
    }

    /// Settle a view, or return `None` if this strategy cannot.
    pub fn resolve(&self, positions: &[AgentPosition]) -> Option<Resolution> {
        let mut ranked: Vec<&AgentPosition> = positions.iter().collect();
        ranked.sort_by(|a, b| compare_positions(a, b));

        let leader = *ranked.first()?;
        let margin = ranked
            .get(1)
            .map(|runner_up| leader.aggregate_confidence - runner_up.aggregate_confidence);

        match *self {
            ResolutionStrategy::HighestConfidence => Some(select(leader, margin)),
            ResolutionStrategy::Synthesis {
                complementary_margin,
            } => {
                let complementary: Vec<&AgentPosition> = ranked
                    .iter()
                    .copied()
                    .filter(|p| {
                        leader.aggregate_confidence - p.aggregate_confidence
                            <= complementary_margin + f64::EPSILON
                    })
                    .collect();
                if complementary.len() > 1 {
                    Some(synthesize(&complementary))
                } else {
                    Some(select(leader, margin))
                }
            }
            ResolutionStrategy::Strict { min_margin } => match margin {
                Some(m) if m + f64::EPSILON < min_margin => None,
                _ => Some(select(leader, margin)),
            },
        }
    }
}

fn select(leader: &AgentPosition, margin: Option<f64>) -> Resolution {
    let note = match margin {
        Some(m) => format!(
            "Adopted the position of {} (aggregate confidence {:.2}, leading by {:.2})",
            leader.agent_id, leader.aggregate_confidence, m
        ),
        None => format!("Adopted the only position, from {}", leader.agent_id),
    };
    Resolution {
        kind: ResolutionKind::Selected {
            agent_id: leader.agent_id.clone(),
        },
        content: leader.content.clone(),
        confidence: leader.confidence,
        note,
    }
}

fn synthesize(positions: &[&AgentPosition]) -> Resolution {
    let mut content = String::from("Combined approach:");
    for position in positions {
        content.push_str("\n- ");
        content.push_str(position.content.trim());
    }
    let confidence = positions
        .iter()
        .map(|p| p.confidence)
        .fold(0.0_f64, f64::max);
    let agents: Vec<_> = positions.iter().map(|p| p.agent_id.clone()).collect();
    let note = format!(
        "Positions of {} are complementary and were merged",
        agents
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Resolution {
        kind: ResolutionKind::Synthesized { agents },
        content,
        confidence,
        note,
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStrategy::HighestConfidence => write!(f, "highest_confidence"),
            ResolutionStrategy::Synthesis {
                complementary_margin,
            } => write!(f, "synthesis:{}", complementary_margin),
            ResolutionStrategy::Strict { min_margin } => write!(f, "strict:{}", min_margin),
        }
    }
}

impl FromStr for ResolutionStrategy {
    type Err = String;

    /// Accepts `highest_confidence`, `synthesis[:margin]`, `strict[:margin]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let (name, arg) = match lower.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (lower.as_str(), None),
        };
        let parse_margin = |default: f64| -> Result<f64, String> {
            match arg {
                None => Ok(default),
                Some(raw) => {
                    let value: f64 = raw
                        .parse()
                        .map_err(|_| format!("Invalid margin for {}: {}", name, raw))?;
                    if (0.0..=1.0).contains(&value) {
                        Ok(value)
                    } else {
                        Err(format!("Margin for {} must be within 0..=1, got {}", name, value))
                    }
                }
            }
        };

        match name {
            "highest" | "highest_confidence" => Ok(ResolutionStrategy::HighestConfidence),
            "synthesis" | "hybrid" => Ok(ResolutionStrategy::Synthesis {
                complementary_margin: parse_margin(0.05)?,
            }),
            "strict" => Ok(ResolutionStrategy::Strict {
                min_margin: parse_margin(0.1)?,
            }),
            other => Err(format!(
                "Unknown resolution strategy: {}. Valid: highest_confidence, synthesis[:margin], strict[:margin]",
                other
            )),
        }
    }
}
