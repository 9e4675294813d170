use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ClothingRule;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule {id}: {field} '{value}' is not an integer temperature")]
    InvalidBound {
        id: u32,
        field: &'static str,
        value: String,
    },

    #[error("rule {id}: temp_min {min} is greater than temp_max {max}")]
    InvertedRange { id: u32, min: i32, max: i32 },

    #[error("rule id {0} is declared more than once")]
    DuplicateId(u32),
}

/// Temperature bound as written in configuration, either `25` or `"25"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TempBound {
    Degrees(i32),
    Text(String),
}

impl TempBound {
    fn parse(&self, id: u32, field: &'static str) -> Result<i32, RuleError> {
        match self {
            TempBound::Degrees(value) => Ok(*value),
            TempBound::Text(text) => text.trim().parse().map_err(|_| RuleError::InvalidBound {
                id,
                field,
                value: text.clone(),
            }),
        }
    }
}

/// One entry of a rule table override.
///
/// Example TOML:
/// [[custom_clothes_template]]
/// id = 1
/// codes = [800, 801, 802]
/// temp_min = "25"
/// temp_max = "50"
/// message = "Майка, шорты, сандали. На улице тепло)"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTemplate {
    pub id: u32,
    pub codes: Vec<i32>,
    pub temp_min: TempBound,
    pub temp_max: TempBound,
    pub message: String,
}

impl RuleTemplate {
    fn into_rule(self) -> Result<ClothingRule, RuleError> {
        let temp_min = self.temp_min.parse(self.id, "temp_min")?;
        let temp_max = self.temp_max.parse(self.id, "temp_max")?;

        Ok(ClothingRule {
            id: self.id,
            condition_codes: self.codes,
            temp_min,
            temp_max,
            message: self.message,
        })
    }
}

const HOT: &str = "Майка, шорты, сандали. На улице тепло)";
const HOT_CLOUDY: &str =
    "Майка, шорты, сандали. На всякий случай возьмите кофту, на улице облачно)";
const COOL: &str = "Футболка, кофта, штаны. На улице прохладно";
const WET: &str = "Футболка, кофта, штаны. На улице мокро, и грязно белые кроссовки не вариант!";
const STORM: &str = "Футболка с длинным рукавом, куртка, штаны. На улице гроза, сильный ветер. \
                     Лучше отсидеться дома...";
const SNOW: &str = "Футболка с длинным рукавом, кофта, куртка, тёплая обувь. На улице валит снег, \
                    если не хотите стать Дед Морозом - оденьтесь потеплее)";
const FOG: &str = "Футболка, кофта, штаны. На улице туман, сыро, слякотно. Лучше одеться теплее!";
const ICE_AGE: &str = "Максимально тёплая одежда, на улице новый ледниковый период!!!";

const CLEAR_CLOUDS: &[i32] = &[800, 801, 802, 803, 804];
const DRIZZLE_RAIN: &[i32] = &[
    300, 301, 302, 310, 311, 312, 313, 314, 321, 500, 501, 502, 503, 511, 520, 521, 522, 531,
];
const THUNDERSTORM: &[i32] = &[200, 201, 210, 211, 221, 230, 231];
const SNOWFALL: &[i32] = &[600, 601, 602, 611, 612, 613, 615, 616, 620, 621, 622];
const ATMOSPHERE: &[i32] = &[701, 711, 721, 731, 741, 751, 761, 771];

/// (id, codes, temp_min, temp_max, message), in matching order.
const DEFAULT_RULES: &[(u32, &[i32], i32, i32, &str)] = &[
    (1, &[800, 801, 802], 25, 50, HOT),
    (2, &[803, 804], 25, 35, HOT_CLOUDY),
    (3, CLEAR_CLOUDS, 10, 25, COOL),
    (4, DRIZZLE_RAIN, 0, 40, WET),
    (5, THUNDERSTORM, 0, 40, STORM),
    (6, SNOWFALL, -10, 0, SNOW),
    (7, ATMOSPHERE, 0, 40, FOG),
    (8, SNOWFALL, -30, -11, ICE_AGE),
    (9, &[800], -30, -11, ICE_AGE),
];

/// Ordered, validated set of clothing rules.
///
/// Declaration order is matching order. Once built, a table is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<ClothingRule>,
}

impl RuleTable {
    /// Validate and wrap rules, keeping their order.
    pub fn new(rules: Vec<ClothingRule>) -> Result<Self, RuleError> {
        let mut seen = HashSet::with_capacity(rules.len());

        for rule in &rules {
            if !seen.insert(rule.id) {
                return Err(RuleError::DuplicateId(rule.id));
            }
            if rule.temp_min > rule.temp_max {
                return Err(RuleError::InvertedRange {
                    id: rule.id,
                    min: rule.temp_min,
                    max: rule.temp_max,
                });
            }
            if rule.condition_codes.is_empty() {
                tracing::warn!(rule_id = rule.id, "rule has no condition codes and will never match");
            }
        }

        Ok(Self { rules })
    }

    /// The built-in table used when no override is configured.
    pub fn default_table() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|&(id, codes, temp_min, temp_max, message)| ClothingRule {
                id,
                condition_codes: codes.to_vec(),
                temp_min,
                temp_max,
                message: message.to_string(),
            })
            .collect();

        Self { rules }
    }

    pub fn from_templates(templates: Vec<RuleTemplate>) -> Result<Self, RuleError> {
        let rules = templates
            .into_iter()
            .map(RuleTemplate::into_rule)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rules)
    }

    /// An override replaces the default table entirely; there is no merging.
    pub fn with_override(templates: Option<Vec<RuleTemplate>>) -> Result<Self, RuleError> {
        match templates {
            Some(templates) => Self::from_templates(templates),
            None => Ok(Self::default_table()),
        }
    }

    pub fn rules(&self) -> &[ClothingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::default_table()
    }
}
