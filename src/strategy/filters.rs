use crate::strategy::error::StrategyError;
use crate::strategy::{Decision, Filter, FilterMetadata};
use crate::view::BacktestView;
use serde_json::{json, Value};
use smol_str::SmolStr;

/// Filter blocking short exposure: negative targets are clamped to flat, long targets pass
/// through untouched.
#[derive(Debug)]
pub struct LongOnly {
    metadata: FilterMetadata,
}

impl LongOnly {
    /// Constructs a new [`LongOnly`] component.
    pub fn new() -> Self {
        Self {
            metadata: FilterMetadata {
                name: SmolStr::new_static("long_only"),
                parameters: Value::Null,
            },
        }
    }
}

impl Default for LongOnly {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LongOnly {
    fn metadata(&self) -> &FilterMetadata {
        &self.metadata
    }

    fn apply(
        &self,
        _: &BacktestView<'_>,
        decision: Decision,
    ) -> Result<Decision, StrategyError> {
        if decision.target_position < 0.0 {
            return Ok(Decision {
                target_position: 0.0,
                diagnostics: json!({
                    "clamped": true,
                    "rejected_target": decision.target_position,
                }),
                ..decision
            });
        }

        Ok(decision)
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

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn decision(target_position: f64) -> Decision {
        Decision {
            timestamp: timestamp(),
            target_position,
            execution_price: 100.0,
            diagnostics: json!({"upstream": true}),
        }
    }

    fn apply(target_position: f64) -> Decision {
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

        LongOnly::new().apply(&view, decision(target_position)).unwrap()
    }

    #[test]
    fn should_clamp_short_target_to_flat() {
        let actual = apply(-2.0);
        assert_eq!(actual.target_position, 0.0);
        assert_eq!(actual.diagnostics["clamped"], json!(true));
        assert_eq!(actual.diagnostics["rejected_target"], json!(-2.0));
    }

    #[test]
    fn should_pass_long_target_through_untouched() {
        let actual = apply(2.0);
        assert_eq!(actual.target_position, 2.0);
        assert_eq!(actual.diagnostics, json!({"upstream": true}));
    }
}
