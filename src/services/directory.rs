// src/services/directory.rs

use crate::{
    errors::AppResult,
    models::{
        CUMULATIVE_REVENUE_MODE, CUMULATIVE_REVENUE_TYPE, CommissionTier, PERCENT_UNIT,
        SalespersonProfile, TemplateTierRow, UserRow,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Resolves salesperson ids to display identity and commission tiers.
/// Ids with no user record are simply absent from the result.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn lookup(&self, salesperson_ids: &[String]) -> AppResult<Vec<SalespersonProfile>>;
}

#[derive(Clone)]
pub struct PgIdentityDirectory {
    db: PgPool,
}

impl PgIdentityDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityDirectory for PgIdentityDirectory {
    async fn lookup(&self, salesperson_ids: &[String]) -> AppResult<Vec<SalespersonProfile>> {
        if salesperson_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, pay_rate_id FROM users WHERE id = ANY($1)",
        )
        .bind(salesperson_ids)
        .fetch_all(&self.db)
        .await?;

        let template_ids: Vec<Uuid> = users.iter().filter_map(|u| u.pay_rate_id).collect();

        // Only active, tiered cumulative-revenue bonus templates paying a percentage.
        let tier_rows = if template_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, TemplateTierRow>(
                r#"SELECT
                    bt.template_id,
                    bl.amount AS threshold_amount,
                    bl.bonus AS bonus_rate
                   FROM bonus_levels bl
                   JOIN bonus_templates bt ON bt.id = bl.bonus_template_id
                   WHERE bt.template_id = ANY($1)
                     AND bt.status = TRUE
                     AND bt.mode = $2
                     AND bt.type = $3
                     AND bl.unit = $4"#,
            )
            .bind(&template_ids)
            .bind(CUMULATIVE_REVENUE_MODE)
            .bind(CUMULATIVE_REVENUE_TYPE)
            .bind(PERCENT_UNIT)
            .fetch_all(&self.db)
            .await?
        };

        Ok(profiles_from_rows(users, tier_rows))
    }
}

fn profiles_from_rows(users: Vec<UserRow>, tier_rows: Vec<TemplateTierRow>) -> Vec<SalespersonProfile> {
    let mut tiers_by_template: HashMap<Uuid, Vec<CommissionTier>> = HashMap::new();
    for row in tier_rows {
        tiers_by_template
            .entry(row.template_id)
            .or_default()
            .push(CommissionTier {
                threshold_amount: row.threshold_amount,
                bonus_rate: row.bonus_rate,
            });
    }

    users
        .into_iter()
        .map(|user| SalespersonProfile {
            tiers: user
                .pay_rate_id
                .and_then(|id| tiers_by_template.get(&id).cloned())
                .unwrap_or_default(),
            id: user.id,
            name: user.name.unwrap_or_default(),
        })
        .collect()
}
