use crate::planner::error::PlannerError;
use crate::planner::{ExecutionPlan, ExecutionPlanner, Oco};
use crate::strategy::Decision;
use crate::view::BacktestView;
use serde::{Deserialize, Serialize};

/// Configuration for constructing a [`FixedPctOcoPlanner`] via the new() constructor method.
/// Percentages are in decimal form (eg/ 0.002 for 0.2%).
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Config {
    pub sl_pct: f64,
    pub tp_pct: f64,
}

/// Planner attaching fixed percentage stop loss & take profit brackets to non-zero targets.
///
/// Long targets get the stop below and the take profit above the execution price; short targets
/// are mirrored. Flat targets carry no brackets.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct FixedPctOcoPlanner {
    sl_pct: f64,
    tp_pct: f64,
}

impl FixedPctOcoPlanner {
    /// Constructs a new [`FixedPctOcoPlanner`] component using the provided [`Config`].
    pub fn new(config: Config) -> Result<Self, PlannerError> {
        if config.sl_pct <= 0.0 {
            return Err(PlannerError::Configuration(format!(
                "sl_pct must be > 0, got {}",
                config.sl_pct
            )));
        }
        if config.tp_pct <= 0.0 {
            return Err(PlannerError::Configuration(format!(
                "tp_pct must be > 0, got {}",
                config.tp_pct
            )));
        }

        Ok(Self {
            sl_pct: config.sl_pct,
            tp_pct: config.tp_pct,
        })
    }
}

impl ExecutionPlanner for FixedPctOcoPlanner {
    fn plan(&self, _: &BacktestView<'_>, decision: &Decision) -> ExecutionPlan {
        let price = decision.execution_price;
        let target = decision.target_position;

        let oco = if target > 0.0 {
            Some(Oco::new(
                Some(price * (1.0 - self.sl_pct)),
                Some(price * (1.0 + self.tp_pct)),
            ))
        } else if target < 0.0 {
            Some(Oco::new(
                Some(price * (1.0 + self.sl_pct)),
                Some(price * (1.0 - self.tp_pct)),
            ))
        } else {
            None
        };

        ExecutionPlan {
            timestamp: decision.timestamp,
            target_position: target,
            execution_price: price,
            oco,
            diagnostics: decision.diagnostics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market::Bar;
    use crate::data::state::MarketState;
    use crate::feature::store::FeatureStore;
    use crate::portfolio::portfolio::ExecutionView;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::Value;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn plan_for(target_position: f64) -> ExecutionPlan {
        let market = {
            let mut market = MarketState::new();
            market
                .ingest(Bar::new(timestamp(), 100.0, 100.0, 100.0, 100.0, 1.0).unwrap())
                .unwrap();
            market
        };
        let features = FeatureStore::new(vec![]).unwrap();
        let view = BacktestView {
            market: market.view().unwrap(),
            features: features.view(),
            execution: ExecutionView::new(0.0, 0.0, 0.0, 0.0),
        };

        let planner = FixedPctOcoPlanner::new(Config {
            sl_pct: 0.01,
            tp_pct: 0.02,
        })
        .unwrap();

        planner.plan(
            &view,
            &Decision {
                timestamp: timestamp(),
                target_position,
                execution_price: 100.0,
                diagnostics: Value::Null,
            },
        )
    }

    #[test]
    fn should_return_err_with_non_positive_stop_loss_pct() {
        let actual = FixedPctOcoPlanner::new(Config {
            sl_pct: 0.0,
            tp_pct: 0.02,
        });
        assert!(matches!(actual, Err(PlannerError::Configuration(_))));
    }

    #[test]
    fn should_place_stop_below_and_take_profit_above_for_long_target() {
        let plan = plan_for(1.0);
        let oco = plan.oco.unwrap();
        assert_eq!(oco.stop_loss, Some(99.0));
        assert_eq!(oco.take_profit, Some(102.0));
    }

    #[test]
    fn should_place_stop_above_and_take_profit_below_for_short_target() {
        let plan = plan_for(-1.0);
        let oco = plan.oco.unwrap();
        assert_eq!(oco.stop_loss, Some(101.0));
        assert_eq!(oco.take_profit, Some(98.0));
    }

    #[test]
    fn should_attach_no_brackets_for_flat_target() {
        let plan = plan_for(0.0);
        assert_eq!(plan.oco, None);
        assert_eq!(plan.timestamp, timestamp());
        assert_eq!(plan.execution_price, 100.0);
    }
}
