//! # Attention Graph Assembler
//! Joins the ranked article list with per-incident stance counts and sampled
//! opinion texts. Node order is the rank order; incidents are ordered by name.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::RankedArticle;
use crate::stance::CanonicalStance;
use crate::store::{NetworkCountRow, NetworkOpinionRow};

pub const NO_DESCRIPTION: &str = "no description";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StanceDetail {
    pub count: u64,
    pub sample_opinions: Vec<String>,
}

/// Per-stance details of one incident.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerStance {
    pub revision: StanceDetail,
    pub abolition: StanceDetail,
    pub maintain: StanceDetail,
}

impl PerStance {
    pub fn get(&self, stance: CanonicalStance) -> &StanceDetail {
        match stance {
            CanonicalStance::Revision => &self.revision,
            CanonicalStance::Abolition => &self.abolition,
            CanonicalStance::Maintain => &self.maintain,
        }
    }

    fn get_mut(&mut self, stance: CanonicalStance) -> &mut StanceDetail {
        match stance {
            CanonicalStance::Revision => &mut self.revision,
            CanonicalStance::Abolition => &mut self.abolition,
            CanonicalStance::Maintain => &mut self.maintain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub sub_category_name: String,
    pub per_stance: PerStance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionGraphNode {
    pub article_key: String,
    pub description: String,
    pub incidents: Vec<Incident>,
}

/// article → incident → raw label → value
type Nested<V> = BTreeMap<String, BTreeMap<String, BTreeMap<String, V>>>;

struct GraphTables {
    counts: Nested<u64>,
    descriptions: BTreeMap<String, String>,
    opinions: Nested<Vec<String>>,
}

impl GraphTables {
    fn build(counts: &[NetworkCountRow], opinions: &[NetworkOpinionRow], cap: usize) -> Self {
        let mut count_table: Nested<u64> = BTreeMap::new();
        let mut descriptions = BTreeMap::new();
        for row in counts {
            *count_table
                .entry(row.article_key.clone())
                .or_default()
                .entry(row.incident.clone())
                .or_default()
                .entry(row.raw_sentiment.clone())
                .or_default() += row.count;
            if let Some(d) = &row.description {
                descriptions
                    .entry(row.article_key.clone())
                    .or_insert_with(|| d.clone());
            }
        }

        let mut opinion_table: Nested<Vec<String>> = BTreeMap::new();
        for row in opinions {
            let texts = opinion_table
                .entry(row.article_key.clone())
                .or_default()
                .entry(row.incident.clone())
                .or_default()
                .entry(row.raw_sentiment.clone())
                .or_default();
            if texts.len() < cap {
                texts.push(row.text.clone());
            }
        }

        Self {
            counts: count_table,
            descriptions,
            opinions: opinion_table,
        }
    }

    fn opinions_for(&self, article: &str, incident: &str, label: &str) -> Vec<String> {
        self.opinions
            .get(article)
            .and_then(|m| m.get(incident))
            .and_then(|m| m.get(label))
            .cloned()
            .unwrap_or_default()
    }

    fn node(&self, article_key: &str) -> AttentionGraphNode {
        let description = self
            .descriptions
            .get(article_key)
            .cloned()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        let incidents = self
            .counts
            .get(article_key)
            .map(|by_incident| {
                by_incident
                    .iter()
                    .map(|(incident, by_label)| {
                        let mut per_stance = PerStance::default();
                        for stance in CanonicalStance::ALL {
                            let label = stance.representative_label();
                            *per_stance.get_mut(stance) = StanceDetail {
                                count: by_label.get(label).copied().unwrap_or(0),
                                sample_opinions: self.opinions_for(article_key, incident, label),
                            };
                        }
                        Incident {
                            sub_category_name: incident.clone(),
                            per_stance,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        AttentionGraphNode {
            article_key: article_key.to_string(),
            description,
            incidents,
        }
    }
}

/// Build one node per ranked article, in rank order.
pub fn assemble_graph(
    ranked: &[RankedArticle],
    counts: &[NetworkCountRow],
    opinions: &[NetworkOpinionRow],
    opinion_sample_cap: usize,
) -> Vec<AttentionGraphNode> {
    let tables = GraphTables::build(counts, opinions, opinion_sample_cap);
    ranked.iter().map(|r| tables.node(&r.article_key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stance::{StanceCounts, CON_MAINTAIN, PRO_ABOLITION, PRO_REVISION};

    fn ranked(keys: &[&str]) -> Vec<RankedArticle> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| RankedArticle {
                rank: i + 1,
                article_key: k.to_string(),
                iis: 1.0 - i as f64 * 0.1,
                stance_counts: StanceCounts::default(),
                total_comments: 0,
                hot: false,
            })
            .collect()
    }

    fn count(key: &str, incident: &str, label: &str, n: u64) -> NetworkCountRow {
        NetworkCountRow {
            article_key: key.into(),
            incident: incident.into(),
            description: Some(format!("{key} 내용")),
            raw_sentiment: label.into(),
            count: n,
        }
    }

    fn opinion(key: &str, incident: &str, label: &str, text: &str) -> NetworkOpinionRow {
        NetworkOpinionRow {
            article_key: key.into(),
            incident: incident.into(),
            raw_sentiment: label.into(),
            text: text.into(),
        }
    }

    #[test]
    fn nodes_follow_rank_order_not_key_order() {
        let counts = vec![count("A", "x", PRO_REVISION, 1), count("Z", "y", PRO_REVISION, 1)];
        let nodes = assemble_graph(&ranked(&["Z", "A"]), &counts, &[], 5);
        let keys: Vec<_> = nodes.iter().map(|n| n.article_key.as_str()).collect();
        assert_eq!(keys, vec!["Z", "A"]);
    }

    #[test]
    fn missing_lookups_use_defaults() {
        let nodes = assemble_graph(&ranked(&["unknown"]), &[], &[], 5);
        assert_eq!(nodes[0].description, NO_DESCRIPTION);
        assert!(nodes[0].incidents.is_empty());

        let counts = vec![count("A", "x", PRO_REVISION, 4)];
        let nodes = assemble_graph(&ranked(&["A"]), &counts, &[], 5);
        let inc = &nodes[0].incidents[0];
        assert_eq!(inc.per_stance.revision.count, 4);
        assert_eq!(inc.per_stance.abolition, StanceDetail::default());
        assert_eq!(inc.per_stance.maintain, StanceDetail::default());
    }

    #[test]
    fn per_stance_uses_representative_labels_and_caps_samples() {
        let counts = vec![
            count("A", "x", PRO_REVISION, 7),
            count("A", "x", PRO_ABOLITION, 2),
            count("A", "x", CON_MAINTAIN, 3),
        ];
        let opinions: Vec<_> = (0..8)
            .map(|i| opinion("A", "x", PRO_REVISION, &format!("op{i}")))
            .chain(std::iter::once(opinion("A", "x", CON_MAINTAIN, "keep")))
            .collect();
        let nodes = assemble_graph(&ranked(&["A"]), &counts, &opinions, 5);
        let ps = &nodes[0].incidents[0].per_stance;
        assert_eq!(ps.get(CanonicalStance::Revision).count, 7);
        assert_eq!(
            ps.revision.sample_opinions,
            vec!["op0", "op1", "op2", "op3", "op4"]
        );
        assert_eq!(ps.abolition.count, 2);
        assert!(ps.abolition.sample_opinions.is_empty());
        assert_eq!(ps.maintain.count, 3);
        assert_eq!(ps.maintain.sample_opinions, vec!["keep"]);
        assert_eq!(nodes[0].description, "A 내용");
    }

    #[test]
    fn incidents_are_ordered_by_name() {
        let counts = vec![
            count("A", "다", PRO_REVISION, 1),
            count("A", "가", PRO_REVISION, 1),
            count("A", "나", PRO_REVISION, 1),
        ];
        let nodes = assemble_graph(&ranked(&["A"]), &counts, &[], 5);
        let names: Vec<_> = nodes[0]
            .incidents
            .iter()
            .map(|i| i.sub_category_name.as_str())
            .collect();
        assert_eq!(names, vec!["가", "나", "다"]);
    }
}
