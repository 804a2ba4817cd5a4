// ==========================================
// DUPA Estimator - Instantiation engine
// ==========================================
// Template + location + quantity -> rate-snapshotted ComputedBoqLineItem
//
// Flow:
// 1. load template (NotFound / inactive) and project
// 2-4. resolve labor, equipment, material rates concurrently (barrier)
// 5. aggregate direct cost
// 6. line-item add-ons (standard or evaluated percentages)
// 7. unit cost and total amount
// 8. persist the item in one write
//
// All-or-nothing: any failure before step 8 persists nothing.
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::line_item::{
    ComputedBoqLineItem, HaulingCostBreakdown, ResolvedEquipmentEntry, ResolvedLaborEntry,
    ResolvedMaterialEntry,
};
use crate::domain::template::{
    DupaTemplate, EquipmentEntryKind, EquipmentTemplateEntry, LaborTemplateEntry,
    MarkupPercentages, MaterialTemplateEntry,
};
use crate::domain::types::{InstantiationState, MarkupBasis};
use crate::engine::add_on::compute_add_ons;
use crate::engine::cost_aggregator::CostAggregator;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::hauling::HaulingCostModel;
use crate::engine::rate_resolver::RateResolver;
use crate::engine::repositories::EngineRepositories;
use chrono::{NaiveDate, Utc};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// InstantiateOptions
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InstantiateOptions {
    /// Price with the template's evaluated percentage set when it has one
    pub use_evaluated: bool,
    /// Reject inactive templates; None = configured default
    pub active_only: Option<bool>,
    /// Date the rates are taken at; None = today (UTC)
    pub as_of: Option<NaiveDate>,
}

// ==========================================
// InstantiationRun - state tracking for one request
// ==========================================
struct InstantiationRun {
    template_id: String,
    state: InstantiationState,
}

impl InstantiationRun {
    fn new(template_id: &str) -> Self {
        Self {
            template_id: template_id.to_string(),
            state: InstantiationState::Draft,
        }
    }

    fn advance(&mut self, next: InstantiationState) -> EngineResult<()> {
        if !self.state.can_transition_to(&next) {
            return Err(EngineError::Computation(format!(
                "illegal instantiation transition {} -> {}",
                self.state, next
            )));
        }
        debug!(template_id = %self.template_id, from = %self.state, to = %next, "instantiation state");
        self.state = next;
        Ok(())
    }

    fn fail(&mut self, err: &EngineError) {
        let failed = InstantiationState::Failed(err.to_string());
        if self.state.can_transition_to(&failed) {
            warn!(template_id = %self.template_id, from = %self.state, error = %err, "instantiation failed");
            self.state = failed;
        }
    }
}

// ==========================================
// InstantiationEngine
// ==========================================
pub struct InstantiationEngine<C>
where
    C: EngineConfigReader,
{
    config: Arc<C>,
    repos: EngineRepositories,
    resolver: RateResolver,
    aggregator: CostAggregator,
    hauling: HaulingCostModel,
}

impl<C> InstantiationEngine<C>
where
    C: EngineConfigReader,
{
    pub fn new(config: Arc<C>, repos: EngineRepositories) -> Self {
        Self {
            resolver: RateResolver::new(repos.master_data_repo.clone()),
            aggregator: CostAggregator::new(),
            hauling: HaulingCostModel::new(),
            config,
            repos,
        }
    }

    /// Instantiate a template into a persisted line item
    ///
    /// # Arguments
    /// - template_id: template to price
    /// - location: location whose rates apply
    /// - quantity: BOQ quantity (>= 0)
    /// - project_id: owning project (hauling configuration comes from it)
    /// - options: evaluated markup, active-only, as-of date
    ///
    /// # Returns
    /// - Ok(item): the persisted, rate-snapshotted line item
    /// - Err: nothing has been persisted
    #[instrument(skip(self, options))]
    pub async fn instantiate(
        &self,
        template_id: &str,
        location: &str,
        quantity: f64,
        project_id: &str,
        options: InstantiateOptions,
    ) -> EngineResult<ComputedBoqLineItem> {
        let mut run = InstantiationRun::new(template_id);
        match self
            .run_instantiation(&mut run, template_id, location, quantity, project_id, options)
            .await
        {
            Ok(item) => Ok(item),
            Err(err) => {
                run.fail(&err);
                Err(err)
            }
        }
    }

    async fn run_instantiation(
        &self,
        run: &mut InstantiationRun,
        template_id: &str,
        location: &str,
        quantity: f64,
        project_id: &str,
        options: InstantiateOptions,
    ) -> EngineResult<ComputedBoqLineItem> {
        validate_request(template_id, location, quantity, project_id)?;
        let location = location.trim();

        // ===== 1. Template and project =====
        let active_only = match options.active_only {
            Some(flag) => flag,
            None => self.config.get_require_active_template().await?,
        };
        let template = self
            .repos
            .template_repo
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| EngineError::not_found("DupaTemplate", template_id))?;
        if active_only && !template.is_active {
            return Err(EngineError::not_found("active DupaTemplate", template_id));
        }
        template
            .validate()
            .map_err(|(field, message)| EngineError::validation(field, message))?;

        let project = self
            .repos
            .project_repo
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Project", project_id))?;

        let (markup, markup_basis) = self.select_markup(&template, options.use_evaluated).await?;
        // hauling only prices material deliveries
        let hauling = match project.hauling.as_ref() {
            Some(config) if !template.materials.is_empty() => Some(self.hauling.compute(config)?),
            _ => None,
        };
        let as_of = options.as_of.unwrap_or_else(|| Utc::now().date_naive());

        // ===== 2-4. Rate lookups =====
        run.advance(InstantiationState::ResolvingRates)?;
        let (labor, equipment, materials) = self
            .resolve_all(&template, location, as_of, hauling.as_ref())
            .await?;

        // ===== 5-7. Pure computation =====
        let direct = self.aggregator.aggregate(labor, equipment, materials)?;
        let add_ons = compute_add_ons(
            direct.direct_cost,
            markup.ocm_percent,
            markup.cp_percent,
            markup.vat_percent,
        )?;
        let unit_cost = add_ons.total;
        let total_amount = unit_cost * quantity;

        // ===== 8. Snapshot and persist =====
        let mut item = ComputedBoqLineItem {
            line_item_id: Uuid::new_v4().to_string(),
            project_id: project.project_id.clone(),
            template_id: template.template_id.clone(),
            location: location.to_string(),
            pay_item_number: template.pay_item_number.clone(),
            description: template.description.clone(),
            unit_of_measurement: template.unit_of_measurement.clone(),
            output_per_hour: template.output_per_hour,
            labor: direct.labor,
            equipment: direct.equipment,
            materials: direct.materials,
            hauling,
            rates_as_of: as_of,
            labor_cost: direct.labor_cost,
            equipment_cost: direct.equipment_cost,
            material_cost: direct.material_cost,
            direct_cost: direct.direct_cost,
            markup_basis,
            ocm_percent: markup.ocm_percent,
            cp_percent: markup.cp_percent,
            vat_percent: markup.vat_percent,
            ocm_amount: add_ons.ocm,
            cp_amount: add_ons.cp,
            vat_amount: add_ons.vat,
            unit_cost,
            quantity,
            total_amount,
            instantiated_at: Utc::now(),
        };

        item.line_item_id = self.repos.line_item_repo.save(&item).await?;
        run.advance(InstantiationState::Computed)?;

        info!(
            line_item_id = %item.line_item_id,
            pay_item_number = %item.pay_item_number,
            direct_cost = item.direct_cost,
            unit_cost = item.unit_cost,
            total_amount = item.total_amount,
            "line item instantiated"
        );
        Ok(item)
    }

    async fn select_markup(
        &self,
        template: &DupaTemplate,
        use_evaluated: bool,
    ) -> EngineResult<(MarkupPercentages, MarkupBasis)> {
        if !use_evaluated {
            return Ok((template.markup, MarkupBasis::Standard));
        }
        if !self.config.get_allow_evaluated_markup().await? {
            return Err(EngineError::validation(
                "use_evaluated",
                "evaluated markup is disabled by configuration",
            ));
        }
        match template.evaluated_markup {
            Some(evaluated) => Ok((evaluated, MarkupBasis::Evaluated)),
            None => {
                warn!(
                    template_id = %template.template_id,
                    "template has no evaluated markup; using standard percentages"
                );
                Ok((template.markup, MarkupBasis::Standard))
            }
        }
    }

    /// Resolve every entry; all lookups run concurrently and must all
    /// succeed before aggregation starts
    async fn resolve_all(
        &self,
        template: &DupaTemplate,
        location: &str,
        as_of: NaiveDate,
        hauling: Option<&HaulingCostBreakdown>,
    ) -> EngineResult<(
        Vec<ResolvedLaborEntry>,
        Vec<ResolvedEquipmentEntry>,
        Vec<ResolvedMaterialEntry>,
    )> {
        let labor = try_join_all(
            template
                .labor
                .iter()
                .map(|entry| self.resolve_labor_entry(entry, location, as_of)),
        );
        let equipment = try_join_all(
            template
                .equipment
                .iter()
                .map(|entry| self.resolve_equipment_entry(entry, location, as_of)),
        );
        let materials = try_join_all(
            template
                .materials
                .iter()
                .map(|entry| self.resolve_material_entry(entry, location, as_of, hauling)),
        );
        let barrier = async { tokio::try_join!(labor, equipment, materials) };

        match self.config.get_rate_lookup_timeout_ms().await? {
            Some(budget_ms) => tokio::time::timeout(Duration::from_millis(budget_ms), barrier)
                .await
                .map_err(|_| EngineError::RateLookupTimeout { budget_ms })?,
            None => barrier.await,
        }
    }

    async fn resolve_labor_entry(
        &self,
        entry: &LaborTemplateEntry,
        location: &str,
        as_of: NaiveDate,
    ) -> EngineResult<ResolvedLaborEntry> {
        let hourly_rate = self
            .resolver
            .resolve_labor_rate(location, &entry.designation, as_of)
            .await?;
        Ok(ResolvedLaborEntry {
            designation: entry.designation.clone(),
            no_of_persons: entry.no_of_persons,
            no_of_hours: entry.no_of_hours,
            hourly_rate,
            amount: 0.0,
        })
    }

    async fn resolve_equipment_entry(
        &self,
        entry: &EquipmentTemplateEntry,
        location: &str,
        as_of: NaiveDate,
    ) -> EngineResult<ResolvedEquipmentEntry> {
        let (equipment_id, hourly_rate) = match &entry.kind {
            // priced off labor cost, nothing to look up
            EquipmentEntryKind::MinorToolsSurcharge => (None, None),
            EquipmentEntryKind::Standard { equipment_id } => {
                let rate = self
                    .resolver
                    .resolve_equipment_rate(equipment_id, location, as_of)
                    .await?;
                (Some(equipment_id.clone()), Some(rate))
            }
        };
        Ok(ResolvedEquipmentEntry {
            equipment_id,
            description: entry.description.clone(),
            is_minor_tools: entry.kind == EquipmentEntryKind::MinorToolsSurcharge,
            no_of_units: entry.no_of_units,
            no_of_hours: entry.no_of_hours,
            hourly_rate,
            amount: 0.0,
        })
    }

    async fn resolve_material_entry(
        &self,
        entry: &MaterialTemplateEntry,
        location: &str,
        as_of: NaiveDate,
        hauling: Option<&HaulingCostBreakdown>,
    ) -> EngineResult<ResolvedMaterialEntry> {
        let resolved = self
            .resolver
            .resolve_material_unit_cost(&entry.material_code, location, as_of, hauling)
            .await?;
        Ok(ResolvedMaterialEntry {
            material_code: entry.material_code.clone(),
            description: entry.description.clone(),
            unit: entry.unit.clone(),
            quantity: entry.quantity,
            base_price: resolved.price.base_price,
            hauling_surcharge: resolved.hauling_surcharge,
            unit_cost: resolved.unit_cost,
            price_effective_date: resolved.price.effective_date,
            amount: 0.0,
        })
    }
}

fn validate_request(
    template_id: &str,
    location: &str,
    quantity: f64,
    project_id: &str,
) -> EngineResult<()> {
    if template_id.trim().is_empty() {
        return Err(EngineError::validation("template_id", "must not be empty"));
    }
    if project_id.trim().is_empty() {
        return Err(EngineError::validation("project_id", "must not be empty"));
    }
    if location.trim().is_empty() {
        return Err(EngineError::validation("location", "must not be empty"));
    }
    if !(quantity >= 0.0) || !quantity.is_finite() {
        return Err(EngineError::validation(
            "quantity",
            format!("must be a finite value >= 0, got {}", quantity),
        ));
    }
    Ok(())
}
