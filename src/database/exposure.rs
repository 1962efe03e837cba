// ABOUTME: Exposure module and step storage, including the transactional batch reorders
// ABOUTME: Steps are loaded per page of modules with one IN query and attached by module id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use super::{column, now_timestamp, timestamp_column, uuid_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::exposure::normalize_popup_configs;
use crate::models::{
    ExposureModule, ExposureStep, ModuleOrderItem, ModulePatch, NewExposureModule, StepDraft,
    StepOrderItem, StepPatch,
};
use crate::pagination::{Page, PageParams};

const MODULE_COLUMNS: &str =
    "id, title, description, icon, color, display_order, is_active, created_at, updated_at";

const STEP_COLUMNS: &str = "id, module_id, step_order, step_type, title, description, \
     guide_content, scenario_list_title, scenario_list_content, popup_configs, icon, \
     created_at, updated_at";

fn row_to_module(row: &SqliteRow) -> AppResult<ExposureModule> {
    Ok(ExposureModule {
        id: column(row, "id")?,
        title: column(row, "title")?,
        description: column(row, "description")?,
        icon: column(row, "icon")?,
        color: column(row, "color")?,
        display_order: column(row, "display_order")?,
        is_active: column(row, "is_active")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
        steps: Vec::new(),
    })
}

fn row_to_step(row: &SqliteRow) -> AppResult<ExposureStep> {
    let step_type: String = column(row, "step_type")?;
    Ok(ExposureStep {
        id: uuid_column(row, "id")?,
        module_id: column(row, "module_id")?,
        step_order: column(row, "step_order")?,
        step_type: step_type
            .parse()
            .map_err(|_| AppError::database(format!("Invalid stored step type: {step_type}")))?,
        title: column(row, "title")?,
        description: column(row, "description")?,
        guide_content: column(row, "guide_content")?,
        scenario_list_title: column(row, "scenario_list_title")?,
        scenario_list_content: column(row, "scenario_list_content")?,
        popup_configs: normalize_popup_configs(column(row, "popup_configs")?),
        icon: column(row, "icon")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Database {
    /// List modules with their steps
    ///
    /// `keyword` matches title or description by substring. Ordered by
    /// `display_order ASC, created_at DESC`.
    pub async fn list_exposure_modules(
        &self,
        keyword: Option<&str>,
        params: PageParams,
    ) -> AppResult<Page<ExposureModule>> {
        let pattern = keyword.map(str::trim).filter(|k| !k.is_empty()).map(escape_like);

        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM exposure_modules");
        let mut list_query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {MODULE_COLUMNS} FROM exposure_modules"));

        if let Some(pattern) = &pattern {
            for builder in [&mut count_query, &mut list_query] {
                builder
                    .push(" WHERE title LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR description LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
        }

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count modules: {e}")))?;

        list_query
            .push(" ORDER BY display_order ASC, created_at DESC LIMIT ")
            .push_bind(params.limit())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let rows = list_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list modules: {e}")))?;

        let mut modules = rows.iter().map(row_to_module).collect::<AppResult<Vec<_>>>()?;
        self.attach_steps(&mut modules).await?;

        Ok(Page::new(modules, total, params))
    }

    async fn attach_steps(&self, modules: &mut [ExposureModule]) -> AppResult<()> {
        if modules.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {STEP_COLUMNS} FROM exposure_steps WHERE module_id IN ("
        ));
        let mut separated = builder.separated(", ");
        for module in modules.iter() {
            separated.push_bind(module.id.clone());
        }
        separated.push_unseparated(") ORDER BY step_order ASC, created_at ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load steps: {e}")))?;

        let mut by_module: HashMap<String, Vec<ExposureStep>> = HashMap::new();
        for row in &rows {
            let step = row_to_step(row)?;
            by_module.entry(step.module_id.clone()).or_default().push(step);
        }
        for module in modules.iter_mut() {
            module.steps = by_module.remove(&module.id).unwrap_or_default();
        }
        Ok(())
    }

    /// Get one module with its steps
    pub async fn get_exposure_module(&self, id: &str) -> AppResult<Option<ExposureModule>> {
        let row = sqlx::query(&format!(
            "SELECT {MODULE_COLUMNS} FROM exposure_modules WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get module: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut module = row_to_module(&row)?;
        module.steps = self.list_exposure_steps(id).await?;
        Ok(Some(module))
    }

    /// Whether a module with `id` exists
    pub async fn exposure_module_exists(&self, id: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exposure_modules WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check module: {e}")))?;
        Ok(count > 0)
    }

    /// Insert a validated module
    ///
    /// A concurrent insert of the same id is rejected by the primary key and
    /// surfaces as `ResourceAlreadyExists`.
    pub async fn create_exposure_module(
        &self,
        module: &NewExposureModule,
    ) -> AppResult<ExposureModule> {
        let now = now_timestamp();

        sqlx::query(
            r"
            INSERT INTO exposure_modules
                (id, title, description, icon, color, display_order, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ",
        )
        .bind(&module.id)
        .bind(&module.title)
        .bind(&module.description)
        .bind(&module.icon)
        .bind(&module.color)
        .bind(module.display_order)
        .bind(module.is_active.unwrap_or(true))
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to create module"))?;

        self.get_exposure_module(&module.id)
            .await?
            .ok_or_else(|| AppError::internal("Module disappeared after insert"))
    }

    /// Apply a sparse patch; returns whether the module exists
    pub async fn update_exposure_module(&self, id: &str, patch: &ModulePatch) -> AppResult<bool> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE exposure_modules SET updated_at = ");
        builder.push_bind(now_timestamp());

        if let Some(title) = &patch.title {
            builder.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &patch.description {
            builder.push(", description = ").push_bind(description.clone());
        }
        if let Some(icon) = &patch.icon {
            builder.push(", icon = ").push_bind(icon.clone());
        }
        if let Some(color) = &patch.color {
            builder.push(", color = ").push_bind(color.clone());
        }
        if let Some(display_order) = patch.display_order {
            builder.push(", display_order = ").push_bind(display_order);
        }
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }
        builder.push(" WHERE id = ").push_bind(id.to_owned());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update module: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a module and its steps; returns whether the module existed
    pub async fn delete_exposure_module(&self, id: &str) -> AppResult<bool> {
        let mut guard = self.begin().await?;

        sqlx::query("DELETE FROM exposure_steps WHERE module_id = ?1")
            .bind(id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete module steps: {e}")))?;

        let result = sqlx::query("DELETE FROM exposure_modules WHERE id = ?1")
            .bind(id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete module: {e}")))?;

        if result.rows_affected() == 0 {
            guard.rollback().await?;
            return Ok(false);
        }
        guard.commit().await?;
        Ok(true)
    }

    /// Steps of a module ordered by `step_order`
    pub async fn list_exposure_steps(&self, module_id: &str) -> AppResult<Vec<ExposureStep>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {STEP_COLUMNS} FROM exposure_steps
            WHERE module_id = ?1
            ORDER BY step_order ASC, created_at ASC
            "
        ))
        .bind(module_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list steps: {e}")))?;

        rows.iter().map(row_to_step).collect()
    }

    /// Get one step
    pub async fn get_exposure_step(&self, step_id: Uuid) -> AppResult<Option<ExposureStep>> {
        let row = sqlx::query(&format!("SELECT {STEP_COLUMNS} FROM exposure_steps WHERE id = ?1"))
            .bind(step_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get step: {e}")))?;

        row.as_ref().map(row_to_step).transpose()
    }

    /// Insert a validated step under `module_id`
    pub async fn create_exposure_step(
        &self,
        module_id: &str,
        step: &StepDraft,
    ) -> AppResult<ExposureStep> {
        let id = Uuid::new_v4();
        let now = now_timestamp();

        sqlx::query(
            r"
            INSERT INTO exposure_steps
                (id, module_id, step_order, step_type, title, description, guide_content,
                 scenario_list_title, scenario_list_content, popup_configs, icon,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            ",
        )
        .bind(id.to_string())
        .bind(module_id)
        .bind(step.step_order)
        .bind(step.step_type.as_str())
        .bind(&step.title)
        .bind(&step.description)
        .bind(&step.guide_content)
        .bind(&step.scenario_list_title)
        .bind(&step.scenario_list_content)
        .bind(&step.popup_configs)
        .bind(&step.icon)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to create step"))?;

        self.get_exposure_step(id)
            .await?
            .ok_or_else(|| AppError::internal("Step disappeared after insert"))
    }

    /// Apply a sparse step patch
    ///
    /// When `module_id` is given the step must belong to that module.
    /// Returns whether a step was updated.
    pub async fn update_exposure_step(
        &self,
        step_id: Uuid,
        module_id: Option<&str>,
        patch: &StepPatch,
    ) -> AppResult<bool> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE exposure_steps SET updated_at = ");
        builder.push_bind(now_timestamp());

        if let Some(step_order) = patch.step_order {
            builder.push(", step_order = ").push_bind(step_order);
        }
        if let Some(step_type) = patch.step_type {
            builder.push(", step_type = ").push_bind(step_type.as_str());
        }
        let text_fields = [
            ("title", &patch.title),
            ("description", &patch.description),
            ("guide_content", &patch.guide_content),
            ("scenario_list_title", &patch.scenario_list_title),
            ("scenario_list_content", &patch.scenario_list_content),
            ("popup_configs", &patch.popup_configs),
            ("icon", &patch.icon),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                builder.push(format!(", {name} = ")).push_bind(value.clone());
            }
        }

        builder.push(" WHERE id = ").push_bind(step_id.to_string());
        if let Some(module_id) = module_id {
            builder.push(" AND module_id = ").push_bind(module_id.to_owned());
        }

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update step: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a step, optionally scoped to a module; returns whether a row was removed
    pub async fn delete_exposure_step(
        &self,
        step_id: Uuid,
        module_id: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM exposure_steps WHERE id = ?1 AND (?2 IS NULL OR module_id = ?2)",
        )
        .bind(step_id.to_string())
        .bind(module_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete step: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite the order of several steps of one module atomically
    ///
    /// Each item updates `WHERE id = ? AND module_id = ?`, so a step that
    /// belongs to another module is left untouched and simply not counted.
    /// A malformed step id aborts the whole batch. Returns the number of
    /// steps whose order was written.
    pub async fn reorder_exposure_steps(
        &self,
        module_id: &str,
        items: &[StepOrderItem],
    ) -> AppResult<u64> {
        let mut guard = self.begin().await?;
        let now = now_timestamp();
        let mut updated = 0;

        for item in items {
            let step_id = Uuid::parse_str(item.id.trim())
                .map_err(|_| AppError::invalid_format(format!("Invalid step id: {}", item.id)))?;

            let result = sqlx::query(
                r"
                UPDATE exposure_steps SET step_order = ?1, updated_at = ?2
                WHERE id = ?3 AND module_id = ?4
                ",
            )
            .bind(item.order)
            .bind(&now)
            .bind(step_id.to_string())
            .bind(module_id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update step order: {e}")))?;

            if result.rows_affected() == 0 {
                debug!(module_id, step_id = %step_id, "Reorder item matched no step of this module");
            }
            updated += result.rows_affected();
        }

        guard.commit().await?;
        info!(module_id, requested = items.len(), updated, "Steps reordered");
        Ok(updated)
    }

    /// Rewrite the display order of several modules atomically
    ///
    /// Every id is checked before its order is written; the first missing id
    /// aborts the batch with `ResourceNotFound` and nothing is persisted.
    pub async fn reorder_exposure_modules(&self, items: &[ModuleOrderItem]) -> AppResult<()> {
        let mut guard = self.begin().await?;
        let now = now_timestamp();

        for item in items {
            let exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM exposure_modules WHERE id = ?1")
                    .bind(&item.id)
                    .fetch_one(guard.executor()?)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to check module: {e}")))?;
            if exists == 0 {
                return Err(AppError::not_found(format!("Module not found: {}", item.id)));
            }

            sqlx::query(
                "UPDATE exposure_modules SET display_order = ?1, updated_at = ?2 WHERE id = ?3",
            )
            .bind(item.order)
            .bind(&now)
            .bind(&item.id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update module order: {e}")))?;
        }

        guard.commit().await?;
        info!(count = items.len(), "Modules reordered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn test_escape_like_wraps_and_escapes() {
        assert_eq!(escape_like("fear"), "%fear%");
        assert_eq!(escape_like("100%"), "%100\\%%");
        assert_eq!(escape_like("a_b"), "%a\\_b%");
    }
}
