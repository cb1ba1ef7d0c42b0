//! Planner - stage orchestration over the state actor

use tracing::{debug, info, warn};

use crate::cart::{CartBuilder, CartModification};
use crate::collaborators::{CheckoutProvider, CheckoutRequest, RequirementsExtractor, VendorSearch};
use crate::config::Config;
use crate::domain::{OptionsCatalog, Requirements, Session, Stage, WeightOverrides, WeightProfile};
use crate::error::PlanError;
use crate::scoring::ScoringEngine;
use crate::state::StateManager;

fn skipped(session: &Session, operation: &'static str, required: Stage) -> PlanError {
    PlanError::StageSkipped {
        session_id: session.id.clone(),
        operation,
        required,
        current: session.stage,
    }
}

/// Fail unless the session sits at the stage right before `target`
fn ready_for(session: &Session, operation: &'static str, target: Stage) -> Result<(), PlanError> {
    let required = target.prerequisite().unwrap_or(target);
    require_stage(session, operation, required)
}

/// Fail unless the session sits exactly at `required`
fn require_stage(session: &Session, operation: &'static str, required: Stage) -> Result<(), PlanError> {
    if session.stage == required {
        Ok(())
    } else {
        debug!(session_id = %session.id, operation, %required, current = %session.stage, "require_stage: rejected");
        Err(skipped(session, operation, required))
    }
}

/// Orchestrates the planning stages for any number of sessions
#[derive(Clone)]
pub struct Planner {
    state: StateManager,
    scoring: ScoringEngine,
    carts: CartBuilder,
    base_weights: WeightProfile,
}

impl Planner {
    pub fn new(state: StateManager, scoring: ScoringEngine, carts: CartBuilder, base_weights: WeightProfile) -> Self {
        Self {
            state,
            scoring,
            carts,
            base_weights,
        }
    }

    /// Build a planner from loaded configuration
    pub fn from_config(state: StateManager, config: &Config) -> Self {
        Self::new(
            state,
            ScoringEngine::new(config.scoring.clone(), config.quantities.clone()),
            CartBuilder::new(config.pricing.clone(), config.quantities.clone()),
            config.weight_profile(),
        )
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Profile used when a ranking request carries no overrides
    pub fn base_weights(&self) -> &WeightProfile {
        &self.base_weights
    }

    // === Session operations ===

    /// Start a new session at the created stage
    pub async fn create_session(&self) -> Result<String, PlanError> {
        debug!("create_session: called");
        let id = self.state.create_session(Session::new()).await?;
        info!(session_id = %id, "Created session");
        Ok(id)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session, PlanError> {
        debug!(%session_id, "get_session: called");
        Ok(self.state.get_session_required(session_id).await?)
    }

    /// Remove a session; false if it did not exist
    pub async fn delete_session(&self, session_id: &str) -> Result<bool, PlanError> {
        debug!(%session_id, "delete_session: called");
        let deleted = self.state.delete_session(session_id).await?;
        if deleted {
            info!(%session_id, "Deleted session");
        }
        Ok(deleted)
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>, PlanError> {
        debug!("list_sessions: called");
        Ok(self.state.list_sessions(None).await?)
    }

    // === Stage operations ===

    /// Validate and store structured requirements
    pub async fn analyze_requirements(
        &self,
        session_id: &str,
        requirements: Requirements,
    ) -> Result<Session, PlanError> {
        debug!(%session_id, "analyze_requirements: called");
        let session = self
            .state
            .transition(session_id, move |s| {
                ready_for(s, "analyze_requirements", Stage::RequirementsAnalyzed)?;
                requirements
                    .validate()
                    .map_err(|e| PlanError::invalid_requirements(&s.id, e))?;
                let mut next = s.clone();
                next.requirements = Some(requirements);
                next.stage = Stage::RequirementsAnalyzed;
                Ok(next)
            })
            .await?;
        info!(%session_id, "Requirements analyzed");
        Ok(session)
    }

    /// Run an extractor on free text, then analyze its output
    pub async fn analyze_with(
        &self,
        session_id: &str,
        extractor: &dyn RequirementsExtractor,
        text: &str,
    ) -> Result<Session, PlanError> {
        debug!(%session_id, len = text.len(), "analyze_with: called");
        let session = self.get_session(session_id).await?;
        ready_for(&session, "analyze_requirements", Stage::RequirementsAnalyzed)?;

        let requirements = extractor.extract(text).await.map_err(|e| PlanError::Collaborator {
            stage: Stage::RequirementsAnalyzed,
            message: e.to_string(),
        })?;
        self.analyze_requirements(session_id, requirements).await
    }

    /// Validate and store a catalog of vendor options
    pub async fn discover_options(&self, session_id: &str, catalog: OptionsCatalog) -> Result<Session, PlanError> {
        debug!(%session_id, options = catalog.len(), "discover_options: called");
        let session = self
            .state
            .transition(session_id, move |s| {
                ready_for(s, "discover_options", Stage::OptionsDiscovered)?;
                catalog.validate().map_err(|e| PlanError::invalid_catalog(&s.id, e))?;
                let mut next = s.clone();
                next.catalog = Some(catalog);
                next.stage = Stage::OptionsDiscovered;
                Ok(next)
            })
            .await?;
        info!(%session_id, "Options discovered");
        Ok(session)
    }

    /// Search for options using the stored requirements, then store them
    pub async fn discover_with(&self, session_id: &str, search: &dyn VendorSearch) -> Result<Session, PlanError> {
        debug!(%session_id, "discover_with: called");
        let session = self.get_session(session_id).await?;
        ready_for(&session, "discover_options", Stage::OptionsDiscovered)?;
        let Some(requirements) = session.requirements.as_ref() else {
            return Err(skipped(&session, "discover_options", Stage::RequirementsAnalyzed));
        };

        let catalog = search.search(requirements).await.map_err(|e| PlanError::Collaborator {
            stage: Stage::OptionsDiscovered,
            message: e.to_string(),
        })?;
        self.discover_options(session_id, catalog).await
    }

    /// Score the stored catalog and store the ranking
    ///
    /// Overrides are overlaid onto the planner's base profile.
    pub async fn rank_packages(
        &self,
        session_id: &str,
        overrides: Option<WeightOverrides>,
    ) -> Result<Session, PlanError> {
        debug!(%session_id, has_overrides = overrides.is_some(), "rank_packages: called");
        let profile = match &overrides {
            Some(o) => self.base_weights.apply(o),
            None => self.base_weights.clone(),
        };
        let engine = self.scoring.clone();

        let session = self
            .state
            .transition(session_id, move |s| {
                const OP: &str = "rank_packages";
                ready_for(s, OP, Stage::PackagesRanked)?;
                let (Some(requirements), Some(catalog)) = (s.requirements.as_ref(), s.catalog.as_ref()) else {
                    return Err(skipped(s, OP, Stage::OptionsDiscovered));
                };
                let ranking = engine
                    .rank(catalog, &profile, requirements)
                    .map_err(PlanError::from_scoring)?;
                let mut next = s.clone();
                next.ranking = Some(ranking);
                next.stage = Stage::PackagesRanked;
                Ok(next)
            })
            .await?;

        log_ranking(&session);
        Ok(session)
    }

    /// Re-score with adjusted weights without advancing the stage
    ///
    /// Overrides are overlaid onto the weights of the current ranking, so
    /// successive adjustments accumulate.
    pub async fn adjust_weights(&self, session_id: &str, overrides: WeightOverrides) -> Result<Session, PlanError> {
        debug!(%session_id, "adjust_weights: called");
        let engine = self.scoring.clone();

        let session = self
            .state
            .transition(session_id, move |s| {
                const OP: &str = "adjust_weights";
                require_stage(s, OP, Stage::PackagesRanked)?;
                let (Some(requirements), Some(catalog), Some(previous)) =
                    (s.requirements.as_ref(), s.catalog.as_ref(), s.ranking.as_ref())
                else {
                    return Err(skipped(s, OP, Stage::PackagesRanked));
                };
                let profile = previous.weights_used.apply(&overrides);
                let ranking = engine
                    .rank(catalog, &profile, requirements)
                    .map_err(PlanError::from_scoring)?;
                let mut next = s.clone();
                next.ranking = Some(ranking);
                Ok(next)
            })
            .await?;

        log_ranking(&session);
        Ok(session)
    }

    /// Build a cart from a ranked package, the top one by default
    pub async fn build_cart(&self, session_id: &str, package_id: Option<String>) -> Result<Session, PlanError> {
        debug!(%session_id, ?package_id, "build_cart: called");
        let carts = self.carts.clone();

        let session = self
            .state
            .transition(session_id, move |s| {
                const OP: &str = "build_cart";
                ready_for(s, OP, Stage::CartBuilt)?;
                let (Some(requirements), Some(ranking)) = (s.requirements.as_ref(), s.ranking.as_ref()) else {
                    return Err(skipped(s, OP, Stage::PackagesRanked));
                };

                let package = match &package_id {
                    Some(id) => ranking.find(id).ok_or_else(|| PlanError::PackageNotFound {
                        session_id: s.id.clone(),
                        package_id: id.clone(),
                    })?,
                    None => ranking.top().ok_or_else(|| PlanError::ConstraintViolation {
                        session_id: s.id.clone(),
                        reason: match &ranking.diagnostic {
                            Some(d) => format!("ranking has no packages: {}", d),
                            None => "ranking has no packages".to_string(),
                        },
                    })?,
                };

                let cart = carts
                    .build(package, requirements)
                    .map_err(|e| PlanError::from_cart(&s.id, e))?;
                let mut next = s.clone();
                next.cart = Some(cart);
                next.stage = Stage::CartBuilt;
                Ok(next)
            })
            .await?;

        info!(%session_id, total = ?session.cart.as_ref().map(|c| c.total), "Cart built");
        Ok(session)
    }

    /// Apply one cart modification without advancing the stage
    pub async fn modify_cart(&self, session_id: &str, modification: CartModification) -> Result<Session, PlanError> {
        debug!(%session_id, modification = %modification.describe(), "modify_cart: called");
        let carts = self.carts.clone();

        let session = self
            .state
            .transition(session_id, move |s| {
                const OP: &str = "modify_cart";
                require_stage(s, OP, Stage::CartBuilt)?;
                let (Some(requirements), Some(catalog), Some(cart)) =
                    (s.requirements.as_ref(), s.catalog.as_ref(), s.cart.as_ref())
                else {
                    return Err(skipped(s, OP, Stage::CartBuilt));
                };
                let updated = carts
                    .modify(cart, &modification, catalog, requirements)
                    .map_err(|e| PlanError::from_cart(&s.id, e))?;
                let mut next = s.clone();
                next.cart = Some(updated);
                Ok(next)
            })
            .await?;

        info!(%session_id, total = ?session.cart.as_ref().map(|c| c.total), "Cart modified");
        Ok(session)
    }

    /// Run checkout and finalize the cart
    ///
    /// The provider runs outside the state actor. The result is committed only
    /// if the session was not written in the meantime.
    pub async fn checkout(
        &self,
        session_id: &str,
        provider: &dyn CheckoutProvider,
        request: &CheckoutRequest,
    ) -> Result<Session, PlanError> {
        const OP: &str = "checkout";
        debug!(%session_id, "checkout: called");
        let session = self.get_session(session_id).await?;
        ready_for(&session, OP, Stage::CheckedOut)?;
        let Some(cart) = session.cart.as_ref() else {
            return Err(skipped(&session, OP, Stage::CartBuilt));
        };

        let confirmation = provider
            .checkout(cart, request)
            .await
            .map_err(|e| PlanError::Collaborator {
                stage: Stage::CheckedOut,
                message: e.to_string(),
            })?;
        if confirmation.total_charged != cart.total {
            return Err(PlanError::Collaborator {
                stage: Stage::CheckedOut,
                message: format!(
                    "provider charged {} but the cart total is {}",
                    confirmation.total_charged, cart.total
                ),
            });
        }

        let observed = session.revision;
        let carts = self.carts.clone();
        let result = self
            .state
            .transition(session_id, move |s| {
                ready_for(s, OP, Stage::CheckedOut)?;
                if s.revision != observed {
                    return Err(PlanError::StaleSession {
                        session_id: s.id.clone(),
                        operation: OP,
                    });
                }
                let Some(cart) = s.cart.as_ref() else {
                    return Err(skipped(s, OP, Stage::CartBuilt));
                };
                let finalized = carts.finalize(cart).map_err(|e| PlanError::from_cart(&s.id, e))?;
                let mut next = s.clone();
                next.cart = Some(finalized);
                next.confirmation = Some(confirmation);
                next.stage = Stage::CheckedOut;
                Ok(next)
            })
            .await;

        match &result {
            Ok(s) => info!(
                %session_id,
                booking_id = ?s.confirmation.as_ref().map(|c| c.booking_id.clone()),
                "Checked out"
            ),
            Err(e) => warn!(%session_id, error = %e, "checkout: confirmation not committed"),
        }
        result
    }
}

fn log_ranking(session: &Session) {
    let Some(ranking) = session.ranking.as_ref() else {
        return;
    };
    match &ranking.diagnostic {
        Some(diagnostic) => warn!(session_id = %session.id, %diagnostic, "Ranking produced no packages"),
        None => info!(
            session_id = %session.id,
            packages = ranking.packages.len(),
            top = ?ranking.top().map(|p| p.package_id.as_str()),
            "Packages ranked"
        ),
    }
}
