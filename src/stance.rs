//! # Stance Mapper
//!
//! Maps raw social sentiment labels (e.g. `"찬성_개정강화"`) onto one of three
//! canonical stances.
//!
//! - Known labels: three "찬성" (pro), three "반대" (con) and `중립` (neutral).
//! - Fallback order: exact label → second `_`-delimited segment → `Maintain`.
//! - `None` (no sentiment recorded) is `Maintain`.
//!
//! Every component that touches sentiment goes through [`map_stance`].

use serde::{Deserialize, Serialize};

pub const PRO_REVISION: &str = "찬성_개정강화";
pub const PRO_ABOLITION: &str = "찬성_폐지완화";
pub const PRO_MAINTAIN: &str = "찬성_현상유지";
pub const CON_REVISION: &str = "반대_개정강화";
pub const CON_ABOLITION: &str = "반대_폐지완화";
pub const CON_MAINTAIN: &str = "반대_현상유지";
pub const NEUTRAL: &str = "중립";

/// Labels counted as "pro" volume by the controversy indicator.
pub const PRO_LABELS: [&str; 3] = [PRO_REVISION, PRO_ABOLITION, PRO_MAINTAIN];
/// Labels counted as "con" volume by the controversy indicator.
pub const CON_LABELS: [&str; 3] = [CON_MAINTAIN, CON_ABOLITION, CON_REVISION];

/// The raw label most representative of each canonical stance.
/// Stance-restricted Event Store queries only return these three.
pub const REPRESENTATIVE_LABELS: [&str; 3] = [PRO_REVISION, PRO_ABOLITION, CON_MAINTAIN];

/// Canonical public stance towards a legislative article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStance {
    /// 개정강화: amend / strengthen the article.
    Revision,
    /// 폐지완화: abolish / relax the article.
    Abolition,
    /// 현상유지: keep the article as it is.
    Maintain,
}

impl CanonicalStance {
    pub const ALL: [CanonicalStance; 3] = [
        CanonicalStance::Revision,
        CanonicalStance::Abolition,
        CanonicalStance::Maintain,
    ];

    /// Korean display name, as it appears in the second label segment.
    pub fn korean_name(self) -> &'static str {
        match self {
            CanonicalStance::Revision => "개정강화",
            CanonicalStance::Abolition => "폐지완화",
            CanonicalStance::Maintain => "현상유지",
        }
    }

    /// Raw label whose counts and opinions represent this stance in the graph.
    pub fn representative_label(self) -> &'static str {
        match self {
            CanonicalStance::Revision => PRO_REVISION,
            CanonicalStance::Abolition => PRO_ABOLITION,
            CanonicalStance::Maintain => CON_MAINTAIN,
        }
    }

    fn from_korean_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.korean_name() == name)
    }
}

/// Map a raw sentiment label to its canonical stance. Total: never fails.
pub fn map_stance(raw: Option<&str>) -> CanonicalStance {
    let Some(label) = raw else {
        return CanonicalStance::Maintain;
    };

    // 1) Known labels.
    match label {
        PRO_REVISION => return CanonicalStance::Revision,
        PRO_ABOLITION => return CanonicalStance::Abolition,
        PRO_MAINTAIN | CON_REVISION | CON_ABOLITION | CON_MAINTAIN => {
            return CanonicalStance::Maintain
        }
        NEUTRAL => return CanonicalStance::Maintain,
        _ => {}
    }

    // 2) Unknown label: resolve its second segment, if any.
    label
        .split('_')
        .nth(1)
        .and_then(CanonicalStance::from_korean_name)
        // 3) Default.
        .unwrap_or(CanonicalStance::Maintain)
}

/// Per-stance counters used by ranked articles and dashboard pivots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceCounts {
    pub revision: u64,
    pub abolition: u64,
    pub maintain: u64,
}

impl StanceCounts {
    /// Add `count` events carrying the raw label `raw` (mapped through [`map_stance`]).
    pub fn add_raw(&mut self, raw: Option<&str>, count: u64) {
        self.add(map_stance(raw), count);
    }

    pub fn add(&mut self, stance: CanonicalStance, count: u64) {
        match stance {
            CanonicalStance::Revision => self.revision += count,
            CanonicalStance::Abolition => self.abolition += count,
            CanonicalStance::Maintain => self.maintain += count,
        }
    }

    pub fn get(&self, stance: CanonicalStance) -> u64 {
        match stance {
            CanonicalStance::Revision => self.revision,
            CanonicalStance::Abolition => self.abolition,
            CanonicalStance::Maintain => self.maintain,
        }
    }

    pub fn total(&self) -> u64 {
        self.revision + self.abolition + self.maintain
    }
}
