use crate::data::state::MarketView;
use crate::feature::store::FeatureView;
use crate::portfolio::portfolio::ExecutionView;

/// The read-only bundle of market, feature & execution state handed to the strategy, filters and
/// execution planner each step. The only window components get on the world - nothing can be
/// mutated through it.
#[derive(Copy, Clone, Debug)]
pub struct BacktestView<'a> {
    pub market: MarketView<'a>,
    pub features: FeatureView<'a>,
    pub execution: ExecutionView,
}
