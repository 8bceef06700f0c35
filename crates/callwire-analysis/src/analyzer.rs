//! Public entry points: call graph, wiring graph, module nodes.
//!
//! Each call is independent: it builds its own [`ProgramModel`] from the
//! input mapping, runs one pass, and drops the model. Nothing is shared
//! between calls, so an [`Analyzer`] can be used from several threads.

use callwire_core::config::CallwireConfig;
use callwire_core::errors::{AnalysisError, AnalysisResult};
use tracing::{debug, info_span};

use crate::call_graph::{self, Graph};
use crate::model::{paths, FileId, Program, ProgramModel};
use crate::parsers::ParserSet;
use crate::wiring;

/// Runs analyses with one configuration.
pub struct Analyzer {
    config: CallwireConfig,
    parsers: ParserSet,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(CallwireConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: CallwireConfig) -> Self {
        Self {
            config,
            parsers: ParserSet::new(),
        }
    }

    pub fn config(&self) -> &CallwireConfig {
        &self.config
    }

    /// Call graph of the callables declared in `scope`.
    ///
    /// `files` is the whole program (used for cross-file resolution); `scope`
    /// lists the paths whose callables become nodes.
    pub fn call_graph<I, K, V, S>(&self, files: I, scope: &[S]) -> AnalysisResult<Graph>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        S: AsRef<str>,
    {
        let _span = info_span!("call_graph", scope = scope.len()).entered();
        self.run(files, scope, |program, ids| {
            call_graph::build_call_graph(program, ids, &self.config.conventions).0
        })
    }

    /// Wiring graph of the modules declared in `scope`.
    pub fn wiring_graph<I, K, V, S>(&self, files: I, scope: &[S]) -> AnalysisResult<Graph>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        S: AsRef<str>,
    {
        let _span = info_span!("wiring_graph", scope = scope.len()).entered();
        self.run(files, scope, |program, ids| {
            wiring::build_wiring_graph(program, ids, &self.config.conventions)
        })
    }

    /// Module nodes declared in `scope`, without edges.
    pub fn modules<I, K, V, S>(&self, files: I, scope: &[S]) -> AnalysisResult<Graph>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        S: AsRef<str>,
    {
        let _span = info_span!("modules", scope = scope.len()).entered();
        self.run(files, scope, |program, ids| {
            wiring::build_module_nodes(program, ids, &self.config.conventions)
        })
    }

    fn run<I, K, V, S, F>(&self, files: I, scope: &[S], pass: F) -> AnalysisResult<Graph>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        S: AsRef<str>,
        F: FnOnce(&Program<'_>, &[FileId]) -> Graph,
    {
        let model = ProgramModel::build(files, &self.parsers, &self.config.analysis);
        let mut errors = model.errors().to_vec();
        let ids = scope_files(&model, scope, &mut errors);
        let program = Program::new(&model);
        let graph = pass(&program, &ids);
        AnalysisResult::with_errors(graph, errors)
    }
}

/// Map scan paths to modeled files, in the caller's order, without duplicates.
///
/// Paths that were in the input but failed to parse are skipped quietly (the
/// parse error is already recorded); paths absent from the input are recorded.
fn scope_files<S: AsRef<str>>(
    model: &ProgramModel,
    scope: &[S],
    errors: &mut Vec<AnalysisError>,
) -> Vec<FileId> {
    let mut ids = Vec::with_capacity(scope.len());
    for path in scope {
        let path = path.as_ref();
        match model.file_id(path) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None if model.was_input(path) => {
                debug!(path, "scan path excluded from the model");
            }
            None => errors.push(AnalysisError::UnknownScopePath {
                path: paths::normalize_path(path),
            }),
        }
    }
    ids
}

/// Call graph with the default configuration.
pub fn analyze_call_graph<I, K, V, S>(files: I, scope: &[S]) -> Graph
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    S: AsRef<str>,
{
    Analyzer::default().call_graph(files, scope).into_data()
}

/// Wiring graph with the default configuration.
pub fn analyze_wiring<I, K, V, S>(files: I, scope: &[S]) -> Graph
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    S: AsRef<str>,
{
    Analyzer::default().wiring_graph(files, scope).into_data()
}

/// Module nodes with the default configuration.
pub fn list_modules<I, K, V, S>(files: I, scope: &[S]) -> Graph
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    S: AsRef<str>,
{
    Analyzer::default().modules(files, scope).into_data()
}
