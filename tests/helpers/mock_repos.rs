// ==========================================
// In-memory repositories - for engine tests
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDate;
use dupa_estimator::domain::{
    select_material_price, ComputedBoqLineItem, DupaTemplate, EquipmentRate, LaborRate,
    MaterialPrice, Project, RateRecord,
};
use dupa_estimator::domain::types::RateKind;
use dupa_estimator::repository::{
    LineItemRepository, MasterDataRepository, ProjectRepository, RepositoryError,
    RepositoryResult, TemplateRepository,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ==========================================
// Templates
// ==========================================
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: Mutex<HashMap<String, DupaTemplate>>,
}

impl InMemoryTemplateRepository {
    pub fn with(templates: Vec<DupaTemplate>) -> Self {
        let repo = Self::default();
        for t in templates {
            repo.insert(t);
        }
        repo
    }

    pub fn insert(&self, template: DupaTemplate) {
        self.templates
            .lock()
            .unwrap()
            .insert(template.template_id.clone(), template);
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_id(&self, template_id: &str) -> RepositoryResult<Option<DupaTemplate>> {
        Ok(self.templates.lock().unwrap().get(template_id).cloned())
    }
}

// ==========================================
// Projects
// ==========================================
#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<String, Project>>,
}

impl InMemoryProjectRepository {
    pub fn with(projects: Vec<Project>) -> Self {
        let repo = Self::default();
        for p in projects {
            repo.insert(p);
        }
        repo
    }

    pub fn insert(&self, project: Project) {
        self.projects
            .lock()
            .unwrap()
            .insert(project.project_id.clone(), project);
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        Ok(self.projects.lock().unwrap().get(project_id).cloned())
    }
}

// ==========================================
// Master data
// ==========================================
// Optional per-lookup delay plus in-flight tracking, so tests can see
// whether lookups overlap.
#[derive(Default)]
pub struct InMemoryMasterDataRepository {
    labor: Mutex<HashMap<String, LaborRate>>,
    equipment: Mutex<HashMap<String, EquipmentRate>>,
    materials: Mutex<Vec<MaterialPrice>>,
    delay: Option<Duration>,
    lookups: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryMasterDataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn put_labor(&self, rate: LaborRate) {
        self.labor
            .lock()
            .unwrap()
            .insert(rate.location.to_lowercase(), rate);
    }

    pub fn put_equipment(&self, rate: EquipmentRate) {
        self.equipment
            .lock()
            .unwrap()
            .insert(rate.equipment_id.clone(), rate);
    }

    pub fn put_material(&self, price: MaterialPrice) {
        self.materials.lock().unwrap().push(price);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MasterDataRepository for InMemoryMasterDataRepository {
    async fn find_rate(
        &self,
        kind: RateKind,
        key: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> RepositoryResult<Option<RateRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let record = match kind {
            RateKind::Labor => self
                .labor
                .lock()
                .unwrap()
                .get(&location.to_lowercase())
                .cloned()
                .map(RateRecord::Labor),
            RateKind::Equipment => self
                .equipment
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .map(RateRecord::Equipment),
            RateKind::Material => {
                let prices = self.materials.lock().unwrap();
                let selected = select_material_price(&prices, key, location, as_of).cloned();
                selected.map(RateRecord::Material)
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(record)
    }
}

// ==========================================
// Line items
// ==========================================
#[derive(Default)]
pub struct InMemoryLineItemRepository {
    items: Mutex<Vec<ComputedBoqLineItem>>,
    save_calls: AtomicUsize,
}

impl InMemoryLineItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl LineItemRepository for InMemoryLineItemRepository {
    async fn save(&self, item: &ComputedBoqLineItem) -> RepositoryResult<String> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().push(item.clone());
        Ok(item.line_item_id.clone())
    }

    async fn find_by_id(&self, line_item_id: &str) -> RepositoryResult<Option<ComputedBoqLineItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.line_item_id == line_item_id)
            .cloned())
    }

    async fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<ComputedBoqLineItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_quantity(
        &self,
        line_item_id: &str,
        quantity: f64,
    ) -> RepositoryResult<ComputedBoqLineItem> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.line_item_id == line_item_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "ComputedBoqLineItem".to_string(),
                id: line_item_id.to_string(),
            })?;
        item.set_quantity(quantity)
            .map_err(|message| RepositoryError::FieldValueError {
                field: "quantity".to_string(),
                message,
            })?;
        Ok(item.clone())
    }

    async fn delete(&self, line_item_id: &str) -> RepositoryResult<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.line_item_id != line_item_id);
        Ok(items.len() != before)
    }
}
