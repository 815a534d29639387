//! Keyword query dispatch
//!
//! Maps free text onto a small closed set of intents. The query is lowercased
//! and tested against an ordered rule list; the first rule with a keyword that
//! appears as a substring wins. Nothing matching means Help.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::analysis::answer::{Answer, Highlight, HelpText, Intent, RegionInsight};
use crate::analysis::rank::RankingEngine;
use crate::core::Region;
use crate::error::{HoodError, Result};

/// Where a keyword rule sends the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    Best,
    Worst,
    /// Region by its canonical name, e.g. "Staten Island"
    Region(String),
}

/// A keyword group as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub target: RuleTarget,
}

/// A rule after its target has been checked against the region set.
#[derive(Debug, Clone, PartialEq)]
struct IntentRule {
    keywords: Vec<String>,
    intent: Intent,
}

impl IntentRule {
    fn new<S: AsRef<str>>(keywords: &[S], intent: Intent) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
            intent,
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && normalized.contains(k.as_str()))
    }
}

lazy_static! {
    /// Built-in rules in priority order. Region keywords come from the same
    /// region set the engine aggregates over.
    static ref DEFAULT_RULES: Vec<IntentRule> = {
        let mut rules = vec![
            IntentRule::new(&["best", "undervalued"], Intent::Best),
            IntentRule::new(&["worst", "overpriced"], Intent::Worst),
        ];
        rules.extend(
            [
                Region::Manhattan,
                Region::Queens,
                Region::Brooklyn,
                Region::Bronx,
                Region::StatenIsland,
            ]
            .into_iter()
            .map(|region| IntentRule::new(&[region.as_str()], Intent::RegionInsight(region))),
        );
        rules
    };
}

fn resolve_rule(rule: &KeywordRule) -> Result<IntentRule> {
    let intent = match &rule.target {
        RuleTarget::Best => Intent::Best,
        RuleTarget::Worst => Intent::Worst,
        RuleTarget::Region(name) => match name.parse::<Region>() {
            Ok(region) => Intent::RegionInsight(region),
            Err(_) => {
                error!(region = %name, keywords = ?rule.keywords, "keyword rule targets a region outside the region set");
                return Err(HoodError::UnknownRegion(name.clone()));
            }
        },
    };
    Ok(IntentRule::new(&rule.keywords, intent))
}

/// Stateless query answering over a [`RankingEngine`].
#[derive(Debug, Clone)]
pub struct QueryDispatcher<'a> {
    engine: RankingEngine<'a>,
    rules: Vec<IntentRule>,
}

impl<'a> QueryDispatcher<'a> {
    /// Dispatcher with the built-in rules only.
    pub fn new(engine: RankingEngine<'a>) -> Self {
        Self {
            engine,
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Built-in rules followed by `extra`, which are checked after them.
    ///
    /// Fails with `UnknownRegion` if an extra rule names a region outside the
    /// region set.
    pub fn with_rules(engine: RankingEngine<'a>, extra: &[KeywordRule]) -> Result<Self> {
        let mut dispatcher = Self::new(engine);
        for rule in extra {
            dispatcher.rules.push(resolve_rule(rule)?);
        }
        Ok(dispatcher)
    }

    /// First matching intent, or Help.
    pub fn classify(&self, query: &str) -> Intent {
        let normalized = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Help)
    }

    /// Answers a query. Never fails; empty categories become `NoData`.
    pub fn answer(&self, query: &str) -> Answer {
        let intent = self.classify(query);
        debug!(query, %intent, "query classified");
        self.resolve(intent)
    }

    pub fn resolve(&self, intent: Intent) -> Answer {
        match intent {
            Intent::Best => match self.engine.best() {
                Ok(record) => Answer::BestValue(Highlight::from(record)),
                Err(e) => no_data(intent, e),
            },
            Intent::Worst => match self.engine.worst() {
                Ok(record) => Answer::MostOverpriced(Highlight::from(record)),
                Err(e) => no_data(intent, e),
            },
            Intent::RegionInsight(region) => match self.engine.region_average(region) {
                Some(avg) => Answer::RegionInsight(RegionInsight::from(avg)),
                None => Answer::NoData {
                    intent,
                    reason: format!("no neighbourhoods recorded in {region}"),
                },
            },
            Intent::Help => Answer::Help(HelpText::default()),
        }
    }
}

fn no_data(intent: Intent, err: HoodError) -> Answer {
    debug!(%intent, error = %err, "answering with no data");
    Answer::NoData {
        intent,
        reason: err.to_string(),
    }
}
