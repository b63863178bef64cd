use crate::data::state::MarketView;
use crate::feature::error::FeatureError;
use crate::feature::store::FeatureValues;
use smol_str::SmolStr;

/// Example feature pipeline producing Bollinger bands of the close price.
pub mod bollinger;

/// Tally feature module specific errors.
pub mod error;

/// Example feature pipeline producing fast & slow simple moving averages of the close price.
pub mod sma;

/// The [`FeatureStore`](store::FeatureStore) running a registered pipeline set against market
/// state, and the read-only [`FeatureView`](store::FeatureView) it exposes.
pub mod store;

/// A feature pipeline reads the current market view and writes scalar feature values (and
/// readiness) into the store. Pipelines may keep internal rolling state; determinism holds
/// because that state lives inside the engine, never inside strategies.
pub trait FeaturePipeline {
    /// Unique name identifying this pipeline within a [`FeatureStore`](store::FeatureStore).
    fn name(&self) -> SmolStr;

    /// Clears internal rolling state, returning the pipeline to its freshly constructed state.
    fn reset(&mut self);

    /// Consumes the current [`MarketView`] and writes feature values & readiness into the store.
    fn update(
        &mut self,
        market: &MarketView<'_>,
        values: &mut FeatureValues,
    ) -> Result<(), FeatureError>;
}
