use crate::model::{ClothingRule, Recommendation, WeatherObservation, capitalize};
use crate::rules::RuleTable;

/// Plan returned for a location when no rule matches the current weather.
pub const FALLBACK_PLAN: &str = "На улице непонятная жесть, рекомендуем вам остаться дома!";

/// Looks up clothing rules in a fixed table. First match in table order wins.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    table: RuleTable,
}

impl Resolver {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    /// First rule covering both the condition code and the temperature.
    pub fn find(&self, condition_id: i32, temp_now: f64) -> Option<&ClothingRule> {
        self.table
            .rules()
            .iter()
            .find(|rule| rule.covers_condition(condition_id) && rule.covers_temperature(temp_now))
    }

    /// First rule covering the condition code, whatever the temperature.
    pub fn find_by_condition(&self, condition_id: i32) -> Option<&ClothingRule> {
        self.table
            .rules()
            .iter()
            .find(|rule| rule.covers_condition(condition_id))
    }

    /// Every rule, in table order.
    pub fn all(&self) -> &[ClothingRule] {
        self.table.rules()
    }

    pub fn recommend(&self, observation: &WeatherObservation) -> Recommendation {
        let clothes_plan = self
            .find(observation.condition_id, observation.temp_now)
            .map(|rule| rule.message.clone())
            .unwrap_or_else(|| FALLBACK_PLAN.to_string());

        Recommendation {
            clothes_plan,
            description: capitalize(&observation.description),
            temp_now: observation.temp_now,
            temp_min: observation.temp_min,
            temp_max: observation.temp_max,
        }
    }
}
