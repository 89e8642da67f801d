//! Pipeline driver.
//!
//! [`EmlService`] validates the request, runs assembly against its repository and renders the
//! resulting record with the configured [`eml::RenderOptions`].

use crate::assembler::{assemble, collect_inputs};
use crate::config::CoreConfig;
use crate::constants::MISSING_DATA_PACKAGE_ID;
use crate::error::{EmlError, EmlResult};
use crate::repository::EmlRepository;
use crate::resolver::{ConstantResolver, SystemConstants};
use eml::{Eml, EmlDocument};
use eml_types::DataPackageId;
use std::sync::Arc;

/// Produces EML records for data packages.
///
/// Cheap to clone; clones share the configuration and repository. Each call reads the store
/// afresh, so concurrent calls never observe each other's state.
#[derive(Clone)]
pub struct EmlService {
    cfg: Arc<CoreConfig>,
    repository: Arc<dyn EmlRepository>,
}

impl EmlService {
    pub fn new(cfg: Arc<CoreConfig>, repository: Arc<dyn EmlRepository>) -> Self {
        Self { cfg, repository }
    }

    /// Builds and serialises the EML record for `data_package_id`.
    ///
    /// A missing or non-positive identifier fails with [`EmlError::Build`] before any lookup.
    /// `title`, when non-blank, replaces the data package uuid as the dataset title.
    #[tracing::instrument(skip(self, title))]
    pub async fn produce_eml(
        &self,
        data_package_id: Option<i64>,
        title: Option<&str>,
    ) -> EmlResult<String> {
        let data_package_id = data_package_id
            .and_then(|id| DataPackageId::new(id).ok())
            .ok_or_else(|| EmlError::Build(MISSING_DATA_PACKAGE_ID.into()))?;

        let document = self.build_document(data_package_id, title).await?;
        let xml = Eml::render(&document, self.cfg.render_options())?;

        tracing::info!(bytes = xml.len(), "produced EML record");
        Ok(xml)
    }

    /// Builds the typed record without rendering it.
    pub async fn build_document(
        &self,
        data_package_id: DataPackageId,
        title: Option<&str>,
    ) -> EmlResult<EmlDocument> {
        let inputs = collect_inputs(self.repository.as_ref(), data_package_id).await?;
        assemble(&inputs, title)
    }

    /// Resolves the system constants as a record would see them right now.
    pub async fn system_constants(&self) -> SystemConstants {
        ConstantResolver::new(self.repository.as_ref())
            .resolve_all()
            .await
    }
}
