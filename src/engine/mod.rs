use crate::data::market::Bar;
use crate::data::state::MarketState;
use crate::engine::error::EngineError;
use crate::engine::record::{BacktestInput, RunMetrics, RunResult, StepRecord};
use crate::feature::store::FeatureStore;
use crate::feature::FeaturePipeline;
use crate::planner::ExecutionPlanner;
use crate::portfolio::portfolio::Portfolio;
use crate::strategy::orchestrator::StrategyOrchestrator;
use crate::strategy::Filter;
use crate::transition::engine::TransitionEngine;
use crate::view::BacktestView;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Tally engine module specific errors.
pub mod error;

/// Run input & the immutable step/run audit records.
pub mod record;

/// Synchronous, single-threaded backtest engine. Binds market state, feature store, strategy
/// orchestration, execution planning, transition computation & portfolio execution into one
/// step/run loop driven by a finite ordered [`Bar`] stream.
///
/// Data flow per step:
/// `Bar -> MarketState -> FeatureStore -> BacktestView -> StrategyOrchestrator -> Decision ->
/// ExecutionPlanner -> ExecutionPlan -> TransitionEngine -> [FifoOperation] -> Portfolio ->
/// [Fill] -> StepRecord`.
pub struct BacktestEngine<Strategy, Planner>
where
    Strategy: crate::strategy::Strategy,
    Planner: ExecutionPlanner,
{
    market: MarketState,
    features: FeatureStore,
    orchestrator: StrategyOrchestrator<Strategy>,
    planner: Planner,
    transition: TransitionEngine,
    portfolio: Portfolio,
}

impl<Strategy, Planner> BacktestEngine<Strategy, Planner>
where
    Strategy: crate::strategy::Strategy,
    Planner: ExecutionPlanner,
{
    /// Returns a [`BacktestEngineBuilder`] instance.
    pub fn builder() -> BacktestEngineBuilder<Strategy, Planner> {
        BacktestEngineBuilder::new()
    }

    /// The portfolio owned by this engine.
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Processes one [`Bar`] through the full pipeline, mutating market state, feature store &
    /// portfolio, and returns the immutable [`StepRecord`] audit of the step.
    pub fn step(&mut self, event: Bar) -> Result<StepRecord, EngineError> {
        let record_event = event.clone();

        self.market.ingest(event)?;
        let market_view = self.market.view()?;
        self.features.ingest(&market_view)?;

        let view = BacktestView {
            market: market_view,
            features: self.features.view(),
            execution: self.portfolio.execution_view(),
        };
        let close = view.market.bar().close;

        let decision = self.orchestrator.run(&view)?;
        let plan = self.planner.plan(&view, &decision);

        if plan.timestamp != view.market.timestamp() {
            return Err(EngineError::Invariant(format!(
                "plan timestamp {} does not match market timestamp {}",
                plan.timestamp,
                view.market.timestamp()
            )));
        }

        let operations =
            self.transition
                .process(&plan, self.portfolio.current_position(), self.portfolio.lots())?;

        self.portfolio.apply_operations(&operations)?;
        self.portfolio.mark_to_market(close);

        let diagnostics = decision.diagnostics.clone();
        Ok(StepRecord {
            timestamp: record_event.timestamp,
            event: record_event,
            decision,
            operations,
            execution_after: self.portfolio.execution_view(),
            diagnostics,
        })
    }

    /// Consumes the engine, streaming every event of the provided [`BacktestInput`] through
    /// [`Self::step`] and returning the [`RunResult`]. An empty event stream is a fatal
    /// invariant violation.
    pub fn run<Events>(mut self, input: BacktestInput<Events>) -> Result<RunResult, EngineError>
    where
        Events: IntoIterator<Item = Bar>,
    {
        let mut start = None;
        let mut end = None;
        let mut steps: u64 = 0;

        for event in input.events {
            let record = self.step(event)?;
            if start.is_none() {
                start = Some(record.timestamp);
            }
            end = Some(record.timestamp);
            steps += 1;
        }

        let (Some(start), Some(end)) = (start, end) else {
            return Err(EngineError::Invariant(String::from("no events provided")));
        };

        let metrics = RunMetrics::new(
            self.portfolio.realized_pnl(),
            self.portfolio.unrealized_pnl(),
            self.portfolio.cash(),
            self.portfolio.current_position(),
        );

        info!(
            instrument = %input.instrument,
            steps,
            realized_pnl = metrics.realized_pnl,
            final_position = metrics.final_position,
            "backtest run complete"
        );

        Ok(RunResult {
            run_id: Uuid::new_v4(),
            instrument: input.instrument,
            start,
            end,
            metrics,
            execution_log: self.portfolio.into_execution_log(),
            transition_log: self.transition.into_log(),
            diagnostics: json!({ "steps": steps }),
        })
    }
}

/// Builder to construct [`BacktestEngine`] instances. Wires the feature store, validates the
/// strategy's required pipelines against it, and initialises a flat portfolio.
pub struct BacktestEngineBuilder<Strategy, Planner>
where
    Strategy: crate::strategy::Strategy,
    Planner: ExecutionPlanner,
{
    strategy: Option<Strategy>,
    filters: Vec<Box<dyn Filter>>,
    planner: Option<Planner>,
    pipelines: Vec<Box<dyn FeaturePipeline>>,
    starting_cash: Option<f64>,
}

impl<Strategy, Planner> BacktestEngineBuilder<Strategy, Planner>
where
    Strategy: crate::strategy::Strategy,
    Planner: ExecutionPlanner,
{
    fn new() -> Self {
        Self {
            strategy: None,
            filters: Vec::new(),
            planner: None,
            pipelines: Vec::new(),
            starting_cash: None,
        }
    }

    pub fn strategy(self, value: Strategy) -> Self {
        Self {
            strategy: Some(value),
            ..self
        }
    }

    pub fn filters(self, value: Vec<Box<dyn Filter>>) -> Self {
        Self {
            filters: value,
            ..self
        }
    }

    pub fn planner(self, value: Planner) -> Self {
        Self {
            planner: Some(value),
            ..self
        }
    }

    pub fn pipelines(self, value: Vec<Box<dyn FeaturePipeline>>) -> Self {
        Self {
            pipelines: value,
            ..self
        }
    }

    pub fn starting_cash(self, value: f64) -> Self {
        Self {
            starting_cash: Some(value),
            ..self
        }
    }

    pub fn build(self) -> Result<BacktestEngine<Strategy, Planner>, EngineError> {
        let strategy = self.strategy.ok_or(EngineError::BuilderIncomplete)?;
        let planner = self.planner.ok_or(EngineError::BuilderIncomplete)?;
        let starting_cash = self.starting_cash.ok_or(EngineError::BuilderIncomplete)?;

        let features = FeatureStore::new(self.pipelines)?;
        let orchestrator =
            StrategyOrchestrator::new(strategy, self.filters, &features.pipeline_names())?;

        Ok(BacktestEngine {
            market: MarketState::new(),
            features,
            orchestrator,
            planner,
            transition: TransitionEngine::new(),
            portfolio: Portfolio::new(starting_cash),
        })
    }
}
