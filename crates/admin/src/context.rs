//! The admin context.
//!
//! Holds an admin-kind [`CatalogRepository`], the session guard, the open
//! product form and the active listing query. Mutations go through here and
//! are refused while no valid session exists. Reads (listing, dashboard,
//! export) are not gated.

use std::path::PathBuf;
use std::sync::Arc;

use ecobloom_catalog::{
    CatalogRepository, ContextKind, ContextStore, ImportSummary, Notification, RenderSurface,
    StoreError, StoreKey, SyncTarget, Synchronizer,
};
use ecobloom_core::{CatalogQuery, Clock, ProductId};
use tracing::{debug, info, instrument};

use crate::config::AdminConfig;
use crate::dashboard::DashboardStats;
use crate::error::{AppError, Result};
use crate::form::ProductForm;
use crate::services::auth::SessionGuard;
use crate::services::images::IntakeReport;

/// An exported backup, ready to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Suggested file name, e.g. `ecobloom-backup-2024-05-01.json`.
    pub file_name: String,
    /// Pretty-printed JSON.
    pub json: String,
}

/// Headless admin state bound to a rendering surface.
#[derive(Debug)]
pub struct AdminContext<S> {
    repository: CatalogRepository,
    session: SessionGuard,
    form: Option<ProductForm>,
    query: CatalogQuery,
    surface: S,
}

impl<S: RenderSurface> AdminContext<S> {
    /// Load the catalog and render the product list.
    #[instrument(skip_all, fields(context = %store.context_id()))]
    pub fn start(
        store: ContextStore,
        clock: Arc<dyn Clock>,
        config: &AdminConfig,
        surface: S,
    ) -> Self {
        let session = SessionGuard::new(store.clone(), clock.clone(), config.credentials.clone());
        let mut context = Self {
            repository: CatalogRepository::new(store, ContextKind::Admin, clock),
            session,
            form: None,
            query: CatalogQuery::default(),
            surface,
        };
        context.reload();
        context
    }

    /// A synchronizer reloading this context on product writes elsewhere.
    #[must_use]
    pub fn synchronizer(&self) -> Synchronizer {
        Synchronizer::new(self.repository.store())
    }

    /// Reload the catalog from the store and re-render.
    pub fn reload(&mut self) {
        if let Err(e) = self.repository.load() {
            self.surface.notify(AppError::from(e).notification());
        }
        self.render();
    }

    /// Render the active query.
    pub fn render(&mut self) {
        let products = self.repository.query(&self.query);
        self.surface.render_products(&products);
    }

    /// Replace the listing query and re-render.
    pub fn set_query(&mut self, query: CatalogQuery) {
        self.query = query;
        self.render();
    }

    fn reported<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.surface.notify(e.notification());
        }
        result
    }

    fn require_login(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::login_required())
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in with the configured credential pair.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` on a mismatch; the session is unchanged.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let result = self.session.login(username, password).map_err(AppError::from);
        self.reported(result)
    }

    /// End the session and discard any open form.
    pub fn logout(&mut self) {
        self.session.logout();
        self.form = None;
    }

    /// Run the liveness check. An expired session is logged out silently and
    /// its open form discarded. Returns whether the session is still valid.
    pub fn check_session(&mut self) -> bool {
        let alive = self.session.check_liveness();
        if !alive {
            self.form = None;
        }
        alive
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub const fn session(&self) -> &SessionGuard {
        &self.session
    }

    // =========================================================================
    // Product form
    // =========================================================================

    /// Open a blank form for a new product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without a valid session.
    pub fn new_product(&mut self) -> Result<&mut ProductForm> {
        let gate = self.require_login();
        self.reported(gate)?;
        Ok(self.form.insert(ProductForm::blank()))
    }

    /// Open a form prefilled from an existing product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without a valid session, or
    /// `AppError::NotFound` for an unknown product.
    pub fn edit_product(&mut self, id: &ProductId) -> Result<&mut ProductForm> {
        let form = self.require_login().and_then(|()| {
            self.repository
                .product(id)
                .map(ProductForm::edit)
                .ok_or_else(|| AppError::NotFound(id.to_string()))
        });
        let form = self.reported(form)?;
        Ok(self.form.insert(form))
    }

    #[must_use]
    pub const fn form(&self) -> Option<&ProductForm> {
        self.form.as_ref()
    }

    pub const fn form_mut(&mut self) -> Option<&mut ProductForm> {
        self.form.as_mut()
    }

    /// Close the form without saving.
    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Load image files into the open form, opening a blank one if needed.
    ///
    /// Each skipped file is reported to the surface.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without a valid session, or
    /// `AppError::Image` if the batch would exceed the image limit.
    pub async fn add_images<I>(&mut self, paths: I) -> Result<IntakeReport>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let gate = self.require_login();
        self.reported(gate)?;

        let images = self
            .form
            .get_or_insert_with(ProductForm::blank)
            .image_list();
        let result = images.add_files(paths).await.map_err(AppError::from);
        let report = self.reported(result)?;

        for rejected in &report.rejected {
            self.surface.notify(Notification::error(rejected.to_string()));
        }
        Ok(report)
    }

    /// Save the open form as a new or updated product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without a valid session,
    /// `AppError::Validation` for bad input (the form stays open), or
    /// `AppError::Catalog` if saving fails.
    #[instrument(skip(self))]
    pub fn submit_product(&mut self) -> Result<ProductId> {
        let result = self.try_submit_product();
        self.reported(result)
    }

    fn try_submit_product(&mut self) -> Result<ProductId> {
        self.require_login()?;
        let form = self
            .form
            .as_ref()
            .ok_or_else(|| AppError::NotFound("open product form".to_string()))?;
        let draft = form.to_draft()?;
        let updating = draft
            .id
            .as_ref()
            .is_some_and(|id| self.repository.product(id).is_some());

        let result = self.repository.upsert(draft);
        self.render();
        let id = result?;

        self.form = None;
        let message = if updating {
            "Product updated successfully"
        } else {
            "Product added successfully"
        };
        self.surface.notify(Notification::success(message));
        Ok(id)
    }

    /// Delete a product. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without a valid session, or
    /// `AppError::Catalog` if saving fails.
    #[instrument(skip(self))]
    pub fn delete_product(&mut self, id: &ProductId) -> Result<bool> {
        let result = self.try_delete_product(id);
        self.reported(result)
    }

    fn try_delete_product(&mut self, id: &ProductId) -> Result<bool> {
        self.require_login()?;
        let result = self.repository.remove(id);
        self.render();
        let removed = result?;
        if removed {
            self.surface
                .notify(Notification::success("Product deleted successfully"));
        }
        Ok(removed)
    }

    // =========================================================================
    // Backups and figures
    // =========================================================================

    /// Export the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if serialization fails.
    pub fn export(&mut self) -> Result<ExportDocument> {
        let snapshot = self.repository.export_snapshot();
        let result = snapshot
            .to_json()
            .map(|json| ExportDocument {
                file_name: snapshot.file_name(),
                json,
            })
            .map_err(|e| AppError::Storage(StoreError::Serialization(e)));
        let document = self.reported(result)?;

        info!(file_name = %document.file_name, bytes = document.json.len(), "catalog exported");
        self.surface
            .notify(Notification::success("Data exported successfully"));
        Ok(document)
    }

    /// Restore from a backup document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without a valid session, or
    /// `AppError::Catalog` if the document is malformed (nothing changed) or
    /// saving fails.
    #[instrument(skip(self, json))]
    pub fn import(&mut self, json: &str) -> Result<ImportSummary> {
        let result = self.try_import(json);
        self.reported(result)
    }

    fn try_import(&mut self, json: &str) -> Result<ImportSummary> {
        self.require_login()?;
        let result = self.repository.import_snapshot(json);
        self.render();
        let summary = result?;
        self.surface
            .notify(Notification::success("Data restored successfully"));
        Ok(summary)
    }

    /// Current dashboard figures.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the store size cannot be read.
    pub fn stats(&self) -> Result<DashboardStats> {
        Ok(DashboardStats::collect(&self.repository)?)
    }

    #[must_use]
    pub const fn repository(&self) -> &CatalogRepository {
        &self.repository
    }

    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: RenderSurface> SyncTarget for AdminContext<S> {
    fn resync(&mut self, key: StoreKey) {
        debug!(key = key.as_str(), "admin resync");
        self.reload();
    }
}
