//! Coupon redemption.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{CouponGrantId, CouponId, UserId, ValidityWindow, normalize_code};

use super::RepositoryError;
use crate::models::{Coupon, CouponGrant, Redemption};

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: CouponId,
    code: String,
    name: String,
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
    is_active: bool,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            window: ValidityWindow {
                valid_from: row.valid_from,
                valid_to: row.valid_to,
            },
            is_active: row.is_active,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GrantRow {
    id: CouponGrantId,
    owner_id: UserId,
    coupon_id: CouponId,
    used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<GrantRow> for CouponGrant {
    fn from(row: GrantRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            coupon_id: row.coupon_id,
            used_at: row.used_at,
            created_at: row.created_at,
        }
    }
}

/// Repository for coupons and owner grants.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Redeem `code` for `owner` at `now`, creating a grant.
    ///
    /// An owner may redeem the same code more than once; each call creates a
    /// new grant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this code.
    /// Returns `RepositoryError::WindowInvalid` if the coupon is inactive or
    /// `now` is outside `[valid_from, valid_to]`.
    #[instrument(skip(self, code), fields(owner = %owner))]
    pub async fn redeem(
        &self,
        code: &str,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<Redemption, RepositoryError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(RepositoryError::Validation("code is required".to_owned()));
        }

        let mut tx = self.pool.begin().await?;

        // FOR SHARE keeps the coupon from being deactivated between the
        // window check and the grant insert.
        let coupon: Coupon = sqlx::query_as::<_, CouponRow>(
            r"
            SELECT id, code, name, valid_from, valid_to, is_active
            FROM shop.coupon
            WHERE code = $1
            FOR SHARE
            ",
        )
        .bind(&code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepositoryError::NotFound("coupon".to_owned()))?
        .into();

        if let Err(rejection) = coupon.window.check_redeemable(coupon.is_active, now) {
            tracing::warn!(coupon = %coupon.id, %rejection, "coupon redemption rejected");
            return Err(RepositoryError::WindowInvalid(rejection.to_string()));
        }

        let grant = sqlx::query_as::<_, GrantRow>(
            r"
            INSERT INTO shop.coupon_grant (owner_id, coupon_id)
            VALUES ($1, $2)
            RETURNING id, owner_id, coupon_id, used_at, created_at
            ",
        )
        .bind(owner)
        .bind(coupon.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::missing_reference(e, "owner"))?;

        tx.commit().await?;

        tracing::info!(coupon = %coupon.id, grant = %grant.id, "coupon redeemed");
        Ok(Redemption {
            coupon,
            grant: grant.into(),
        })
    }

    /// Mark one of the owner's grants as used.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the grant does not exist or
    /// belongs to another owner.
    /// Returns `RepositoryError::Conflict` if the grant was already used.
    pub async fn consume(
        &self,
        owner: UserId,
        grant_id: CouponGrantId,
    ) -> Result<CouponGrant, RepositoryError> {
        let consumed = sqlx::query_as::<_, GrantRow>(
            r"
            UPDATE shop.coupon_grant
            SET used_at = NOW()
            WHERE id = $1 AND owner_id = $2 AND used_at IS NULL
            RETURNING id, owner_id, coupon_id, used_at, created_at
            ",
        )
        .bind(grant_id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = consumed {
            return Ok(row.into());
        }

        let already_used: Option<bool> = sqlx::query_scalar(
            "SELECT used_at IS NOT NULL FROM shop.coupon_grant WHERE id = $1 AND owner_id = $2",
        )
        .bind(grant_id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        match already_used {
            Some(true) => Err(RepositoryError::Conflict(
                "coupon has already been used".to_owned(),
            )),
            _ => Err(RepositoryError::NotFound("coupon grant".to_owned())),
        }
    }

    /// The owner's grants, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_grants(&self, owner: UserId) -> Result<Vec<CouponGrant>, RepositoryError> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r"
            SELECT id, owner_id, coupon_id, used_at, created_at
            FROM shop.coupon_grant
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CouponGrant::from).collect())
    }
}
