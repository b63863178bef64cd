use crate::strategy::error::StrategyError;
use crate::strategy::{Decision, Filter, Strategy};
use crate::view::BacktestView;
use fnv::FnvHashSet;
use serde_json::{Map, Value};
use smol_str::SmolStr;

/// Composes one [`Strategy`] with an ordered [`Filter`] chain into a single [`Decision`] per
/// step. The orchestrator consumes a read-only view, mutates nothing outside its aggregated
/// diagnostics, and is pure given the strategy & filter set.
pub struct StrategyOrchestrator<S>
where
    S: Strategy,
{
    strategy: S,
    filters: Vec<Box<dyn Filter>>,
}

impl<S> StrategyOrchestrator<S>
where
    S: Strategy,
{
    /// Constructs a new [`StrategyOrchestrator`], verifying that every pipeline the strategy
    /// requires exists in the feature store's pipeline name set. A missing pipeline is a fatal
    /// configuration error.
    pub fn new(
        strategy: S,
        filters: Vec<Box<dyn Filter>>,
        available_pipelines: &FnvHashSet<SmolStr>,
    ) -> Result<Self, StrategyError> {
        if let Some(missing) = strategy
            .metadata()
            .required_pipelines
            .iter()
            .find(|required| !available_pipelines.contains(required.as_str()))
        {
            return Err(StrategyError::UnknownPipeline(missing.clone()));
        }

        Ok(Self { strategy, filters })
    }

    /// Runs the strategy then folds every filter left-to-right, aggregating diagnostics into a
    /// nested `{strategy: {name: diag}, filters: [{name: diag}, ..]}` map.
    pub fn run(&self, view: &BacktestView<'_>) -> Result<Decision, StrategyError> {
        let mut decision = self.strategy.decide(view)?;

        let strategy_diagnostics = named(
            &self.strategy.metadata().name,
            decision.diagnostics.clone(),
        );

        let mut filter_diagnostics = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            decision = filter.apply(view, decision)?;
            filter_diagnostics.push(named(
                &filter.metadata().name,
                decision.diagnostics.clone(),
            ));
        }

        let mut diagnostics = Map::new();
        diagnostics.insert(String::from("strategy"), strategy_diagnostics);
        diagnostics.insert(String::from("filters"), Value::Array(filter_diagnostics));

        Ok(Decision {
            timestamp: decision.timestamp,
            target_position: decision.target_position,
            execution_price: decision.execution_price,
            diagnostics: Value::Object(diagnostics),
        })
    }
}

fn named(name: &SmolStr, diagnostics: Value) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), diagnostics);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market::Bar;
    use crate::data::state::MarketState;
    use crate::feature::store::FeatureStore;
    use crate::portfolio::portfolio::ExecutionView;
    use crate::strategy::{FilterMetadata, StrategyMetadata};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    struct FixedTarget {
        metadata: StrategyMetadata,
        target: f64,
    }

    impl FixedTarget {
        fn new(target: f64, required_pipelines: Vec<SmolStr>) -> Self {
            Self {
                metadata: StrategyMetadata {
                    name: SmolStr::new_static("fixed_target"),
                    parameters: Value::Null,
                    required_fields: vec![],
                    required_pipelines,
                },
                target,
            }
        }
    }

    impl Strategy for FixedTarget {
        fn metadata(&self) -> &StrategyMetadata {
            &self.metadata
        }

        fn decide(&self, view: &BacktestView<'_>) -> Result<Decision, StrategyError> {
            Ok(Decision {
                timestamp: view.market.timestamp(),
                target_position: self.target,
                execution_price: view.market.bar().close,
                diagnostics: json!({"target": self.target}),
            })
        }
    }

    struct Halve {
        metadata: FilterMetadata,
    }

    impl Halve {
        fn boxed() -> Box<dyn Filter> {
            Box::new(Self {
                metadata: FilterMetadata {
                    name: SmolStr::new_static("halve"),
                    parameters: Value::Null,
                },
            })
        }
    }

    impl Filter for Halve {
        fn metadata(&self) -> &FilterMetadata {
            &self.metadata
        }

        fn apply(
            &self,
            _: &BacktestView<'_>,
            decision: Decision,
        ) -> Result<Decision, StrategyError> {
            Ok(Decision {
                target_position: decision.target_position / 2.0,
                diagnostics: json!({"halved": true}),
                ..decision
            })
        }
    }

    fn market() -> MarketState {
        let mut market = MarketState::new();
        market
            .ingest(
                Bar::new(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    100.0,
                    100.0,
                    100.0,
                    100.0,
                    1.0,
                )
                .unwrap(),
            )
            .unwrap();
        market
    }

    #[test]
    fn should_return_err_when_strategy_requires_unknown_pipeline() {
        let features = FeatureStore::new(vec![]).unwrap();
        let strategy = FixedTarget::new(1.0, vec![SmolStr::new_static("absent")]);

        let actual = StrategyOrchestrator::new(strategy, vec![], &features.pipeline_names());
        assert_eq!(
            actual.err(),
            Some(StrategyError::UnknownPipeline(SmolStr::new_static(
                "absent"
            )))
        );
    }

    #[test]
    fn should_fold_filters_left_to_right_and_aggregate_diagnostics() {
        let features = FeatureStore::new(vec![]).unwrap();
        let strategy = FixedTarget::new(4.0, vec![]);
        let orchestrator = StrategyOrchestrator::new(
            strategy,
            vec![Halve::boxed(), Halve::boxed()],
            &features.pipeline_names(),
        )
        .unwrap();

        let market = market();
        let view = BacktestView {
            market: market.view().unwrap(),
            features: features.view(),
            execution: ExecutionView::new(0.0, 0.0, 0.0, 0.0),
        };

        let decision = orchestrator.run(&view).unwrap();

        assert_eq!(decision.target_position, 1.0);
        assert_eq!(decision.execution_price, 100.0);
        assert_eq!(
            decision.diagnostics,
            json!({
                "strategy": {"fixed_target": {"target": 4.0}},
                "filters": [{"halve": {"halved": true}}, {"halve": {"halved": true}}],
            })
        );
    }
}
