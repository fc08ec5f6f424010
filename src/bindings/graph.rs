use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error};

use crate::error::Result;
use crate::state::{FactStore, FilterState, InputSignal};
use crate::views::ViewModel;

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputView {
    Sankey,
    Trend,
    Radar,
    Range,
}

impl std::fmt::Display for OutputView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputView::Sankey => "sankey",
            OutputView::Trend => "trend",
            OutputView::Radar => "radar",
            OutputView::Range => "range",
        };
        write!(f, "{s}")
    }
}

/// Pure view-model builder: a function of the read-only facts and the filter.
pub type BuildFn<F> = fn(&FactStore, &F) -> Result<ViewModel>;

/// One output view and the static set of inputs it is recomputed on.
pub struct Binding<F> {
    pub output: OutputView,
    pub inputs: &'static [InputSignal],
    build: BuildFn<F>,
}

impl<F> Binding<F> {
    pub fn new(output: OutputView, inputs: &'static [InputSignal], build: BuildFn<F>) -> Self {
        Self { output, inputs, build }
    }

    pub fn depends_on(&self, signal: InputSignal) -> bool {
        self.inputs.contains(&signal)
    }
}

/// A finished recomputation of one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recomputed {
    pub output: OutputView,
    #[serde(skip)]
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// BindingGraph
// ---------------------------------------------------------------------------

/// The filter of one page plus the current view model of each of its
/// outputs. Recomputation is synchronous and whole: a stale view model is
/// dropped and rebuilt from scratch, never patched.
pub struct BindingGraph<F: FilterState> {
    store: Arc<FactStore>,
    filter: F,
    bindings: Vec<Binding<F>>,
    views: BTreeMap<OutputView, ViewModel>,
}

impl<F: FilterState> BindingGraph<F> {
    /// Builds the graph and computes every output once.
    pub fn new(store: Arc<FactStore>, filter: F, bindings: Vec<Binding<F>>) -> Result<Self> {
        let mut graph = Self {
            store,
            filter,
            bindings,
            views: BTreeMap::new(),
        };
        graph.recompute_all()?;
        Ok(graph)
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn view(&self, output: OutputView) -> Option<&ViewModel> {
        self.views.get(&output)
    }

    pub fn views(&self) -> &BTreeMap<OutputView, ViewModel> {
        &self.views
    }

    pub fn outputs(&self) -> impl Iterator<Item = OutputView> + '_ {
        self.bindings.iter().map(|b| b.output)
    }

    pub fn recompute_all(&mut self) -> Result<Vec<Recomputed>> {
        let all: Vec<usize> = (0..self.bindings.len()).collect();
        self.recompute(&all)
    }

    /// Applies a selection event and recomputes exactly the bindings that
    /// declare one of the changed inputs.
    pub fn select(&mut self, event: F::Event) -> Result<Vec<Recomputed>> {
        let changed = self.filter.apply(event);
        if changed.is_empty() {
            debug!("Selection left the filter unchanged; nothing to recompute");
            return Ok(Vec::new());
        }
        let stale: Vec<usize> = self
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| changed.iter().any(|s| b.depends_on(*s)))
            .map(|(i, _)| i)
            .collect();
        self.recompute(&stale)
    }

    /// Bindings are independent, so a failing one does not stop the rest; its
    /// stale view stays discarded and the first error is returned.
    fn recompute(&mut self, indices: &[usize]) -> Result<Vec<Recomputed>> {
        let mut done = Vec::with_capacity(indices.len());
        let mut first_error = None;

        for &i in indices {
            let binding = &self.bindings[i];
            self.views.remove(&binding.output);

            let started = Instant::now();
            match (binding.build)(&self.store, &self.filter) {
                Ok(view) => {
                    let elapsed = started.elapsed();
                    debug!(
                        output = %binding.output,
                        elapsed_us = elapsed.as_micros() as u64,
                        "Recomputed view model"
                    );
                    self.views.insert(binding.output, view);
                    done.push(Recomputed {
                        output: binding.output,
                        elapsed,
                    });
                }
                Err(e) => {
                    error!(output = %binding.output, "View model recompute failed: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(done),
        }
    }
}
