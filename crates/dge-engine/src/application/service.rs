//! # Comparison Service
//!
//! Application service orchestrating the engine: project sessions,
//! the pairwise comparison cache with directional sign correction, the
//! sort/filter pipeline, and saved-transcript persistence.
//!
//! All mutable state lives behind one lock inside the service; a
//! generation counter bumped on every project load guards against
//! applying the result of a comparison load that outlived its project.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::algorithms::{
    displayed_records, parse_comparison_table, sorted_records, NameResolver,
};
use crate::application::transfer;
use crate::config::EngineConfig;
use crate::domain::{
    BrushedArea, EngineError, ImportReport, PairwiseComparison, ProjectManifest, SelectionState,
    SortOrder, SortPath, TranscriptRecord, TreatmentKey,
};
use crate::ports::{
    AbundanceStore, ComparisonEngineApi, FetchOutcome, PersistentStore, ResourceRetriever,
};

/// Ordered treatment pair; `(B, A)` is a distinct slot from `(A, B)`.
type ComparisonKey = (TreatmentKey, TreatmentKey);

/// View-facing state: the active comparison plus derived sequences and
/// the transient selection state.
struct ViewState {
    compared: Option<ComparisonKey>,
    pairwise: Option<Arc<PairwiseComparison>>,
    sorted: Vec<TranscriptRecord>,
    displayed: Vec<TranscriptRecord>,
    selection: SelectionState,
}

impl ViewState {
    fn new(saved_transcripts: BTreeSet<String>) -> Self {
        Self {
            compared: None,
            pairwise: None,
            sorted: Vec::new(),
            displayed: Vec::new(),
            selection: SelectionState {
                saved_transcripts,
                ..SelectionState::default()
            },
        }
    }
}

/// Everything owned by one loaded project.
struct ProjectSession {
    manifest: ProjectManifest,
    resolver: Arc<NameResolver>,
    /// Append-only per ordered pair; lives as long as the project.
    cache: HashMap<ComparisonKey, Arc<PairwiseComparison>>,
    view: ViewState,
}

struct EngineState {
    /// Bumped on every project load; stale loads compare against it.
    generation: u64,
    session: Option<ProjectSession>,
}

/// Comparison engine service - owns the cache, the view state, and the
/// selection state, and drives the outbound collaborators.
pub struct ComparisonService<R, A, S>
where
    R: ResourceRetriever,
    A: AbundanceStore,
    S: PersistentStore,
{
    config: EngineConfig,
    retriever: Arc<R>,
    abundances: Arc<A>,
    storage: Arc<S>,
    state: RwLock<EngineState>,
}

impl<R, A, S> ComparisonService<R, A, S>
where
    R: ResourceRetriever,
    A: AbundanceStore,
    S: PersistentStore,
{
    /// Create a service over the given collaborators.
    pub fn new(config: EngineConfig, retriever: Arc<R>, abundances: Arc<A>, storage: Arc<S>) -> Self {
        Self {
            config,
            retriever,
            abundances,
            storage,
            state: RwLock::new(EngineState {
                generation: 0,
                session: None,
            }),
        }
    }

    fn storage_key(&self, project_id: &str) -> String {
        format!("{project_id}{}", self.config.storage_key_suffix)
    }

    /// Saved set persisted by a previous session, canonicalized through
    /// the fresh resolver. Missing or malformed payloads are non-fatal.
    fn restore_saved(&self, project_id: &str, resolver: &NameResolver) -> BTreeSet<String> {
        let Some(raw) = self.storage.get(&self.storage_key(project_id)) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(names) => names
                .into_iter()
                .map(|name| resolver.resolve_or_fallback(&name))
                .collect(),
            Err(err) => {
                warn!(project = project_id, error = %err, "persisted saved-transcript set is malformed, starting empty");
                BTreeSet::new()
            }
        }
    }

    fn persist_saved(
        &self,
        project_id: &str,
        saved: &BTreeSet<String>,
    ) -> Result<(), EngineError> {
        let names: Vec<&String> = saved.iter().collect();
        let payload = serde_json::to_string(&names).map_err(|err| EngineError::Storage {
            message: err.to_string(),
        })?;
        self.storage.set(&self.storage_key(project_id), &payload)
    }

    fn resort(session: &mut ProjectSession) {
        let records: Vec<TranscriptRecord> = match &session.view.pairwise {
            Some(pairwise) => pairwise.records.values().cloned().collect(),
            None => Vec::new(),
        };
        session.view.sorted = sorted_records(
            records,
            session.view.selection.sort_path,
            session.view.selection.order,
        );
    }

    fn redisplay(session: &mut ProjectSession) {
        let Some(pairwise) = session.view.pairwise.clone() else {
            session.view.displayed.clear();
            return;
        };
        let resolver = session.resolver.clone();
        session.view.displayed = displayed_records(
            &session.view.sorted,
            &pairwise,
            &session.view.selection,
            |name| resolver.resolve_or_fallback(name),
        );
    }

    fn apply_comparison(
        session: &mut ProjectSession,
        key: ComparisonKey,
        data: Arc<PairwiseComparison>,
    ) {
        session.view.compared = Some(key);
        session.view.pairwise = Some(data);
        Self::resort(session);
        Self::redisplay(session);
    }
}

#[async_trait]
impl<R, A, S> ComparisonEngineApi for ComparisonService<R, A, S>
where
    R: ResourceRetriever,
    A: AbundanceStore,
    S: PersistentStore,
{
    async fn load_project(&self, manifest: ProjectManifest) -> Result<(), EngineError> {
        let resolver = Arc::new(NameResolver::build(
            &manifest.transcript_names,
            &manifest.aliases,
        ));
        let saved = self.restore_saved(&manifest.id, &resolver);
        info!(
            project = %manifest.id,
            treatments = manifest.treatments.len(),
            identifiers = resolver.len(),
            saved = saved.len(),
            "project loaded"
        );

        let mut state = self.state.write().await;
        state.generation += 1;
        state.session = Some(ProjectSession {
            manifest,
            resolver,
            cache: HashMap::new(),
            view: ViewState::new(saved),
        });
        Ok(())
    }

    async fn set_pairwise_comparison(
        &self,
        treatment_a_key: &str,
        treatment_b_key: &str,
    ) -> Result<Arc<PairwiseComparison>, EngineError> {
        let key: ComparisonKey = (treatment_a_key.to_string(), treatment_b_key.to_string());

        let (generation, resolver, cached, url_forward, url_reverse) = {
            let state = self.state.read().await;
            let session = state.session.as_ref().ok_or(EngineError::NoActiveView)?;

            let treatment_a = session.manifest.treatment(treatment_a_key).ok_or_else(|| {
                EngineError::UnknownTreatment {
                    key: treatment_a_key.to_string(),
                }
            })?;
            let treatment_b = session.manifest.treatment(treatment_b_key).ok_or_else(|| {
                EngineError::UnknownTreatment {
                    key: treatment_b_key.to_string(),
                }
            })?;

            let template = session
                .manifest
                .pairwise_template
                .as_deref()
                .unwrap_or(&self.config.pairwise_url_template);
            let url_forward = template
                .replace("%A", treatment_a.comparison_key())
                .replace("%B", treatment_b.comparison_key());
            let url_reverse = template
                .replace("%A", treatment_b.comparison_key())
                .replace("%B", treatment_a.comparison_key());

            (
                state.generation,
                session.resolver.clone(),
                session.cache.get(&key).cloned(),
                url_forward,
                url_reverse,
            )
        };

        if let Some(hit) = cached {
            // Suspend once so cache hits keep the async contract.
            tokio::task::yield_now().await;
            debug!(treatment_a = treatment_a_key, treatment_b = treatment_b_key, "comparison served from cache");

            let mut state = self.state.write().await;
            if state.generation != generation {
                return Err(EngineError::StaleProject);
            }
            let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
            Self::apply_comparison(session, key, hit.clone());
            return Ok(hit);
        }

        let per_fetch = Duration::from_secs(self.config.fetch_timeout_secs);
        let (forward, reverse) = tokio::join!(
            timeout(per_fetch, self.retriever.fetch(&url_forward)),
            timeout(per_fetch, self.retriever.fetch(&url_reverse)),
        );
        let forward = forward.unwrap_or(FetchOutcome::Absent);
        let reverse = reverse.unwrap_or(FetchOutcome::Absent);

        // Forward direction takes precedence when both resources exist;
        // only the reverse resource carries an inverted sign.
        let (body, reversed) = match (forward, reverse) {
            (FetchOutcome::Found { body }, _) => (body, false),
            (FetchOutcome::Absent, FetchOutcome::Found { body }) => (body, true),
            (FetchOutcome::Absent, FetchOutcome::Absent) => {
                return Err(EngineError::ComparisonUnavailable {
                    url_a: url_forward,
                    url_b: url_reverse,
                });
            }
        };

        let resolve = {
            let resolver = resolver.clone();
            move |raw: &str| match resolver.canonical_label(raw) {
                Some(canonical) => canonical.to_string(),
                None => {
                    debug!(identifier = raw, "identifier not in index, keeping literal");
                    raw.to_string()
                }
            }
        };
        let abundances_a = {
            let store = self.abundances.clone();
            let treatment = treatment_a_key.to_string();
            move |name: &str| store.abundances(&treatment, name)
        };
        let abundances_b = {
            let store = self.abundances.clone();
            let treatment = treatment_b_key.to_string();
            move |name: &str| store.abundances(&treatment, name)
        };

        let pairwise = parse_comparison_table(&body, reversed, resolve, abundances_a, abundances_b);
        info!(
            treatment_a = treatment_a_key,
            treatment_b = treatment_b_key,
            rows = pairwise.len(),
            min_p_value = pairwise.min_p_value,
            reversed,
            "pairwise comparison loaded"
        );
        let pairwise = Arc::new(pairwise);

        let mut state = self.state.write().await;
        if state.generation != generation {
            warn!(
                treatment_a = treatment_a_key,
                treatment_b = treatment_b_key,
                "project changed during comparison load, discarding result"
            );
            return Err(EngineError::StaleProject);
        }
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        session.cache.insert(key.clone(), pairwise.clone());
        Self::apply_comparison(session, key, pairwise.clone());
        Ok(pairwise)
    }

    async fn default_comparison(&self) -> Result<(TreatmentKey, TreatmentKey), EngineError> {
        let state = self.state.read().await;
        let session = state.session.as_ref().ok_or(EngineError::NoActiveView)?;
        let treatments = &session.manifest.treatments;
        if treatments.len() < 2 {
            return Err(EngineError::NotEnoughTreatments {
                found: treatments.len(),
            });
        }
        Ok((treatments[0].key.clone(), treatments[1].key.clone()))
    }

    async fn update_sort(
        &self,
        sort_path: Option<SortPath>,
        order: Option<SortOrder>,
    ) -> Result<Vec<TranscriptRecord>, EngineError> {
        let mut state = self.state.write().await;
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        if let Some(path) = sort_path {
            session.view.selection.sort_path = path;
        }
        if let Some(order) = order {
            session.view.selection.order = order;
        }
        Self::resort(session);
        Self::redisplay(session);
        Ok(session.view.sorted.clone())
    }

    async fn update_displayed(&self) -> Result<Vec<TranscriptRecord>, EngineError> {
        let mut state = self.state.write().await;
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        if session.view.pairwise.is_none() {
            return Err(EngineError::NoActiveComparison);
        }
        Self::redisplay(session);
        Ok(session.view.displayed.clone())
    }

    async fn set_saved_transcripts(&self, names: Vec<String>) -> Result<(), EngineError> {
        let (project_id, saved) = {
            let mut state = self.state.write().await;
            let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
            let resolver = session.resolver.clone();
            let saved: BTreeSet<String> = names
                .iter()
                .map(|name| resolver.resolve_or_fallback(name))
                .collect();
            session.view.selection.saved_transcripts = saved.clone();
            Self::redisplay(session);
            (session.manifest.id.clone(), saved)
        };
        self.persist_saved(&project_id, &saved)
    }

    async fn import_saved_transcripts(&self, text: &str) -> Result<ImportReport, EngineError> {
        let (project_id, saved, report) = {
            let mut state = self.state.write().await;
            let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
            let resolver = session.resolver.clone();

            let mut report = ImportReport::default();
            for raw in transfer::import_rows(text) {
                match resolver.canonical_label(&raw) {
                    Some(canonical) => {
                        session
                            .view
                            .selection
                            .saved_transcripts
                            .insert(canonical.to_string());
                        report.imported.push((raw, canonical.to_string()));
                    }
                    None => report.skipped.push(raw),
                }
            }
            Self::redisplay(session);
            (
                session.manifest.id.clone(),
                session.view.selection.saved_transcripts.clone(),
                report,
            )
        };
        info!(
            project = %project_id,
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "imported saved transcripts"
        );
        self.persist_saved(&project_id, &saved)?;
        Ok(report)
    }

    async fn export_displayed_transcripts(&self) -> Result<String, EngineError> {
        let state = self.state.read().await;
        let session = state.session.as_ref().ok_or(EngineError::NoActiveView)?;
        let (treatment_a, treatment_b) = session
            .view
            .compared
            .clone()
            .ok_or(EngineError::NoActiveComparison)?;
        Ok(transfer::export_table(
            &treatment_a,
            &treatment_b,
            &session.view.displayed,
        ))
    }

    async fn set_p_value_threshold(&self, threshold: f64) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        session.view.selection.p_value_threshold = threshold;
        Self::redisplay(session);
        Ok(())
    }

    async fn set_brushed_area(&self, area: Option<BrushedArea>) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        session.view.selection.brushed_area = area;
        Self::redisplay(session);
        Ok(())
    }

    async fn set_hovered_bin_transcripts(
        &self,
        names: Option<HashSet<String>>,
    ) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        session.view.selection.hovered_bin_transcripts = names;
        Self::redisplay(session);
        Ok(())
    }

    async fn set_selected_bin_transcripts(
        &self,
        names: Option<HashSet<String>>,
    ) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        let session = state.session.as_mut().ok_or(EngineError::NoActiveView)?;
        session.view.selection.selected_bin_transcripts = names;
        Self::redisplay(session);
        Ok(())
    }

    async fn search_transcripts(&self, prefix: &str) -> Result<Vec<String>, EngineError> {
        let state = self.state.read().await;
        let session = state.session.as_ref().ok_or(EngineError::NoActiveView)?;
        Ok(session.resolver.search(prefix))
    }
}
