use crate::data::state::MarketView;
use crate::feature::error::FeatureError;
use crate::feature::FeaturePipeline;
use fnv::FnvHashSet;
use indexmap::IndexMap;
use itertools::Itertools;
use smol_str::SmolStr;

/// Writable half of the [`FeatureStore`]: latest values, optional per-name history, and per
/// pipeline readiness flags. Handed to each [`FeaturePipeline`] during
/// [`FeatureStore::ingest`].
#[derive(Clone, PartialEq, Debug)]
pub struct FeatureValues {
    values: IndexMap<SmolStr, f64>,
    history: IndexMap<SmolStr, Vec<f64>>,
    ready: IndexMap<SmolStr, bool>,
    keep_history: bool,
}

impl FeatureValues {
    fn new(pipeline_names: impl IntoIterator<Item = SmolStr>, keep_history: bool) -> Self {
        Self {
            values: IndexMap::new(),
            history: IndexMap::new(),
            ready: pipeline_names.into_iter().map(|name| (name, false)).collect(),
            keep_history,
        }
    }

    /// Writes or updates a feature value, appending to its history if history is enabled.
    pub fn set_value(&mut self, name: impl Into<SmolStr>, value: f64) {
        let name = name.into();
        if self.keep_history {
            self.history.entry(name.clone()).or_default().push(value);
        }
        self.values.insert(name, value);
    }

    /// Marks a pipeline ready for the current ingest step. Readiness is recomputed every step:
    /// all pipelines start not ready and each sets its own flag while its outputs are valid.
    pub fn set_pipeline_ready(&mut self, name: &str) -> Result<(), FeatureError> {
        match self.ready.get_mut(name) {
            Some(flag) => {
                *flag = true;
                Ok(())
            }
            None => Err(FeatureError::UnknownPipeline(SmolStr::new(name))),
        }
    }

    /// Determines if the provided pipeline reported readiness this step.
    pub fn pipeline_is_ready(&self, name: &str) -> bool {
        self.ready.get(name).copied().unwrap_or(false)
    }

    /// Global readiness: every registered pipeline is warmed up, or trivially true with no
    /// pipelines registered.
    pub fn global_ready(&self) -> bool {
        self.ready.values().all(|ready| *ready)
    }

    fn clear_ready(&mut self) {
        for flag in self.ready.values_mut() {
            *flag = false;
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.history.clear();
        self.clear_ready();
    }
}

/// Holds the registered [`FeaturePipeline`] set and runs it against market state once per step,
/// in registration order. Exposes a read-only [`FeatureView`] of values, history & readiness.
pub struct FeatureStore {
    pipelines: Vec<Box<dyn FeaturePipeline>>,
    state: FeatureValues,
}

impl FeatureStore {
    /// Constructs a new [`FeatureStore`] from the provided pipelines. Duplicate pipeline names
    /// are a fatal configuration error.
    pub fn new(pipelines: Vec<Box<dyn FeaturePipeline>>) -> Result<Self, FeatureError> {
        if let Some(duplicate) = pipelines.iter().map(|pipeline| pipeline.name()).duplicates().next()
        {
            return Err(FeatureError::DuplicatePipeline(duplicate));
        }

        let state = FeatureValues::new(pipelines.iter().map(|pipeline| pipeline.name()), true);

        Ok(Self { pipelines, state })
    }

    /// Runs every pipeline once against the provided [`MarketView`], clearing all readiness
    /// flags first.
    pub fn ingest(&mut self, market: &MarketView<'_>) -> Result<(), FeatureError> {
        self.state.clear_ready();
        for pipeline in &mut self.pipelines {
            pipeline.update(market, &mut self.state)?;
        }
        Ok(())
    }

    /// Returns a read-only [`FeatureView`] of current values, history and readiness.
    pub fn view(&self) -> FeatureView<'_> {
        FeatureView {
            values: &self.state.values,
            history: &self.state.history,
            ready: &self.state.ready,
            global_ready: self.state.global_ready(),
        }
    }

    /// The set of registered pipeline names.
    pub fn pipeline_names(&self) -> FnvHashSet<SmolStr> {
        self.pipelines.iter().map(|pipeline| pipeline.name()).collect()
    }

    /// Clears stored values, history and readiness, and resets every pipeline.
    pub fn reset(&mut self) {
        self.state.reset();
        for pipeline in &mut self.pipelines {
            pipeline.reset();
        }
    }
}

impl std::fmt::Debug for FeatureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureStore")
            .field(
                "pipelines",
                &self.pipelines.iter().map(|pipeline| pipeline.name()).collect::<Vec<_>>(),
            )
            .field("state", &self.state)
            .finish()
    }
}

/// Read-only snapshot of feature values, per-name history and pipeline readiness at the current
/// timestamp.
#[derive(Copy, Clone, Debug)]
pub struct FeatureView<'a> {
    values: &'a IndexMap<SmolStr, f64>,
    history: &'a IndexMap<SmolStr, Vec<f64>>,
    ready: &'a IndexMap<SmolStr, bool>,
    global_ready: bool,
}

impl<'a> FeatureView<'a> {
    /// Returns the latest value of the provided feature, if present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns the latest value of the provided feature, failing if absent.
    pub fn require(&self, name: &str) -> Result<f64, FeatureError> {
        self.get(name)
            .ok_or_else(|| FeatureError::MissingValue(SmolStr::new(name)))
    }

    /// Returns the full history of the provided feature in ingestion order, failing if absent.
    pub fn series(&self, name: &str) -> Result<&'a [f64], FeatureError> {
        self.history
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FeatureError::MissingHistory(SmolStr::new(name)))
    }

    /// Determines if the provided pipeline reported readiness this step.
    pub fn pipeline_is_ready(&self, name: &str) -> bool {
        self.ready.get(name).copied().unwrap_or(false)
    }

    /// Global readiness across every registered pipeline.
    pub fn global_ready(&self) -> bool {
        self.global_ready
    }
}
