//! Screen-level data flows on top of a repository and a location provider

use crate::error::{RepositoryError, RepositoryResult};
use crate::location::{resolve_reference, LocationProvider, LocationSettings, ReferencePoint};
use crate::model::{LocatedRecord, NewLegend, Review, ReviewSummary};
use crate::repository::LegendRepository;
use crate::session::Session;
use legends_core::config::ConfigSchema;
use legends_geo::{filter_within, sort_by_distance, AnnotatedRecord};
use legends_search::{categories, group_in_order, rank_by_relevance, refine, RefineQuery, SearchResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A legend with its distance from the reference point
pub type NearbyLegend = AnnotatedRecord<LocatedRecord>;

/// Settings for [`LegendExplorer`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Inclusive search radius
    pub radius_km: f64,
    /// Nearest-first instead of fetch order
    pub sort_by_distance: bool,
    /// Public legends collection
    pub legends_collection: String,
    /// Premium hidden gems collection
    pub hidden_gems_collection: String,
    /// Reference point resolution
    pub location: LocationSettings,
}

impl From<&ConfigSchema> for ExplorerConfig {
    fn from(schema: &ConfigSchema) -> Self {
        Self {
            radius_km: schema.proximity.radius_km,
            sort_by_distance: schema.proximity.sort_by_distance,
            legends_collection: schema.repository.legends_collection.clone(),
            hidden_gems_collection: schema.repository.hidden_gems_collection.clone(),
            location: LocationSettings::from(&schema.location),
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::from(&ConfigSchema::default())
    }
}

/// Legends around the reference point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nearby {
    /// Point the distances are measured from
    pub reference: ReferencePoint,
    /// Legends within the radius
    pub legends: Vec<NearbyLegend>,
}

/// Hidden gems of one category
pub type CategoryGroup = (String, Vec<NearbyLegend>);

/// Entry point for the map, list, search and details screens.
#[derive(Debug)]
pub struct LegendExplorer<R, L> {
    repository: R,
    location: L,
    config: ExplorerConfig,
}

impl<R: LegendRepository, L: LocationProvider> LegendExplorer<R, L> {
    /// Create an explorer
    pub fn new(repository: R, location: L, config: ExplorerConfig) -> Self {
        Self {
            repository,
            location,
            config,
        }
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Current settings
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Resolve the point distances are measured from
    pub async fn reference(&self) -> ReferencePoint {
        resolve_reference(&self.location, &self.config.location).await
    }

    /// Legends within the radius that match `query`.
    #[instrument(skip(self))]
    pub async fn nearby(&self, query: &RefineQuery) -> RepositoryResult<Nearby> {
        let (records, reference) = tokio::join!(
            self.repository.list(&self.config.legends_collection),
            self.reference(),
        );
        let records = records?;

        let refined = refine(&records, query);
        let legends = self.within_radius(&reference, &refined)?;

        info!(
            total = records.len(),
            nearby = legends.len(),
            fallback = reference.is_fallback(),
            "Nearby legends"
        );
        Ok(Nearby { reference, legends })
    }

    /// Hidden gems within the radius, grouped by category.
    ///
    /// Sections follow [`categories::HIDDEN_GEM`]; other categories come
    /// after them in first-seen order. Categories with nothing in range are
    /// left out.
    #[instrument(skip(self, session))]
    pub async fn hidden_gems(
        &self,
        session: &Session,
        query: &RefineQuery,
    ) -> RepositoryResult<Vec<CategoryGroup>> {
        if !session.is_premium() {
            return Err(RepositoryError::PremiumRequired);
        }

        let (records, reference) = tokio::join!(
            self.repository.list(&self.config.hidden_gems_collection),
            self.reference(),
        );
        let records = records?;

        let refined = refine(&records, query);
        let mut groups = Vec::new();
        for (category, members) in group_in_order(&refined, &categories::HIDDEN_GEM) {
            let legends = self.within_radius(&reference, &members)?;
            if !legends.is_empty() {
                groups.push((category, legends));
            }
        }

        debug!(total = records.len(), groups = groups.len(), "Hidden gems");
        Ok(groups)
    }

    /// All legends matching `text`, best match first.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> RepositoryResult<Vec<SearchResult<LocatedRecord>>> {
        let records = self.repository.list(&self.config.legends_collection).await?;
        Ok(rank_by_relevance(&records, text))
    }

    /// A legend and its review summary
    #[instrument(skip(self))]
    pub async fn details(&self, id: &str) -> RepositoryResult<Option<(LocatedRecord, ReviewSummary)>> {
        let record = self
            .repository
            .get(&self.config.legends_collection, id)
            .await?;
        Ok(record.map(|record| {
            let summary = record.review_summary();
            (record, summary)
        }))
    }

    /// Review a legend as the signed-in user.
    #[instrument(skip(self, session, comment))]
    pub async fn add_review(
        &self,
        session: &Session,
        id: &str,
        rating: u8,
        comment: &str,
    ) -> RepositoryResult<Review> {
        session.require_user()?;
        let review = Review::new(session.display_name(), rating, comment)?;
        self.repository
            .add_review(&self.config.legends_collection, id, &review, session)
            .await?;
        Ok(review)
    }

    /// Submit a new legend as the signed-in user.
    #[instrument(skip(self, session, legend))]
    pub async fn submit(&self, session: &Session, legend: &NewLegend) -> RepositoryResult<String> {
        session.require_user()?;
        let id = self
            .repository
            .submit(&self.config.legends_collection, legend, session)
            .await?;
        info!(id = %id, "Legend submitted");
        Ok(id)
    }

    /// Legends written by the signed-in user, in fetch order.
    #[instrument(skip(self, session))]
    pub async fn my_stories(&self, session: &Session) -> RepositoryResult<Vec<LocatedRecord>> {
        let user = session.require_user()?;
        let mut records = self.repository.list(&self.config.legends_collection).await?;
        records.retain(|record| record.author_id.as_deref() == Some(user.user_id.as_str()));
        debug!(count = records.len(), "Own stories");
        Ok(records)
    }

    /// Delete one of the signed-in user's legends.
    #[instrument(skip(self, session))]
    pub async fn delete_story(&self, session: &Session, id: &str) -> RepositoryResult<()> {
        self.owned_story(session, id).await?;
        self.repository
            .delete(&self.config.legends_collection, id, session)
            .await?;
        info!(id, "Legend deleted");
        Ok(())
    }

    /// Retitle one of the signed-in user's legends. The title is trimmed.
    #[instrument(skip(self, session))]
    pub async fn rename_story(
        &self,
        session: &Session,
        id: &str,
        title: &str,
    ) -> RepositoryResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RepositoryError::InvalidSubmission("title is required".into()));
        }
        self.owned_story(session, id).await?;
        self.repository
            .update_title(&self.config.legends_collection, id, title, session)
            .await?;
        info!(id, "Legend renamed");
        Ok(())
    }

    /// The legend `id`, provided the session's user wrote it
    async fn owned_story(&self, session: &Session, id: &str) -> RepositoryResult<LocatedRecord> {
        let user = session.require_user()?;
        let collection = &self.config.legends_collection;
        let record = self
            .repository
            .get(collection, id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                collection: collection.clone(),
                id: id.to_string(),
            })?;

        if record.author_id.as_deref() != Some(user.user_id.as_str()) {
            return Err(RepositoryError::NotOwner { id: id.to_string() });
        }
        Ok(record)
    }

    fn within_radius(
        &self,
        reference: &ReferencePoint,
        records: &[LocatedRecord],
    ) -> RepositoryResult<Vec<NearbyLegend>> {
        let mut legends = filter_within(&reference.coordinate, records, self.config.radius_km)?;
        if self.config.sort_by_distance {
            sort_by_distance(&mut legends);
        }
        Ok(legends)
    }
}
