//! Batch orchestration: fetch the catalog and coupons, resolve the best
//! coupon per product, compose the new titles, and submit them.
//!
//! The engine itself is pure; everything rate-limited lives here. Products
//! flow through a bounded-concurrency stream, every external call is paced by
//! the configured inter-request delay, and the whole pipeline is wrapped in a
//! batch-level retry so a transient failure anywhere simply re-runs the run.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use rakupon_core::{AppConfig, Coupon, CouponScope, Product};
use rakupon_engine::{compose_title, select_coupon};
use rakupon_rms::{normalize_coupon, normalize_item, EsaCredentials, RmsClient, RmsError};

/// Totals reported by one completed batch run.
pub struct BatchTotals {
    pub products: usize,
    pub updated: usize,
    pub update_failures: usize,
    /// Items with no priced variants, skipped before selection.
    pub skipped: usize,
}

/// A rewritten title ready for submission, assembled per product only after
/// all computation for that product is done.
struct TitleUpdate {
    manage_number: String,
    new_title: String,
}

/// Runs the batch, re-running the whole pipeline on failure.
///
/// Retry is deliberately coarse: the per-product pipeline is re-executed from
/// the catalog fetch onward, up to `batch_max_retries` additional attempts,
/// pausing `batch_retry_pause_secs * 2^(n-1)` between attempts. Per-item
/// title-update failures do not trigger it, only errors that abort a run.
pub async fn run_with_batch_retry(
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<BatchTotals> {
    let mut attempt = 0u32;
    loop {
        let run_id = Uuid::new_v4();
        match run_batch(config, dry_run, run_id).await {
            Ok(totals) => return Ok(totals),
            Err(err) => {
                if attempt >= config.batch_max_retries {
                    return Err(err);
                }
                let pause_secs = config
                    .batch_retry_pause_secs
                    .saturating_mul(1u64 << attempt.min(62));
                tracing::warn!(
                    %run_id,
                    attempt,
                    max_retries = config.batch_max_retries,
                    pause_secs,
                    error = %err,
                    "batch attempt failed — retrying the whole pipeline"
                );
                tokio::time::sleep(Duration::from_secs(pause_secs)).await;
                attempt += 1;
            }
        }
    }
}

async fn run_batch(
    config: &AppConfig,
    dry_run: bool,
    run_id: Uuid,
) -> anyhow::Result<BatchTotals> {
    let credentials = EsaCredentials::new(&config.service_secret, &config.license_key);
    let client = RmsClient::new(
        &config.api_base_url,
        credentials,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;

    // One instant for the whole run: every product is judged against the
    // same "now" no matter how long the batch takes.
    let jst = FixedOffset::east_opt(9 * 3600).expect("JST offset is in range");
    let now = Utc::now().with_timezone(&jst);
    let today = now.date_naive();

    tracing::info!(%run_id, "fetching catalog");
    let raw_items = client
        .fetch_all_items(config.hits_limit, config.inter_request_delay_ms)
        .await?;

    let mut products = Vec::new();
    let mut skipped = 0usize;
    for item in &raw_items {
        match normalize_item(item)? {
            Some(product) => products.push(product),
            None => {
                skipped += 1;
                tracing::warn!(
                    %run_id,
                    manage_number = %item.manage_number,
                    "skipping item with no priced variants"
                );
            }
        }
    }
    tracing::info!(%run_id, products = products.len(), skipped, "catalog normalized");

    let store_coupons = load_store_coupons(&client, config).await?;
    tracing::info!(%run_id, count = store_coupons.len(), "store-wide coupons loaded");

    let max_concurrent = config.max_concurrent_items.max(1);
    let outcomes: Vec<Result<TitleUpdate, RmsError>> = stream::iter(&products)
        .map(|product| prepare_title(&client, config, &store_coupons, product, now, today))
        .buffered(max_concurrent)
        .collect()
        .await;
    let updates: Vec<TitleUpdate> = outcomes.into_iter().collect::<Result<_, _>>()?;

    if dry_run {
        for update in &updates {
            println!("{}\t{}", update.manage_number, update.new_title);
        }
        return Ok(BatchTotals {
            products: products.len(),
            updated: 0,
            update_failures: 0,
            skipped,
        });
    }

    let mut updated = 0usize;
    let mut update_failures = 0usize;
    for update in &updates {
        if config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }
        match client
            .update_item_title(&update.manage_number, &update.new_title)
            .await
        {
            Ok(()) => {
                updated += 1;
                tracing::info!(
                    %run_id,
                    manage_number = %update.manage_number,
                    new_title = %update.new_title,
                    "title updated"
                );
            }
            Err(err) => {
                update_failures += 1;
                tracing::error!(
                    %run_id,
                    manage_number = %update.manage_number,
                    error = %err,
                    "title update failed"
                );
            }
        }
    }

    Ok(BatchTotals {
        products: products.len(),
        updated,
        update_failures,
        skipped,
    })
}

/// Loads the store-wide coupons with their minimum-spend conditions.
async fn load_store_coupons(
    client: &RmsClient,
    config: &AppConfig,
) -> Result<Vec<Coupon>, RmsError> {
    let raw_coupons = client.search_store_coupons().await?;
    let mut coupons = Vec::with_capacity(raw_coupons.len());
    for raw in &raw_coupons {
        coupons.extend(resolve_coupon(client, config, raw, CouponScope::StoreWide).await?);
    }
    Ok(coupons)
}

/// Resolves one raw coupon's conditions and normalizes it, returning `None`
/// when strict condition handling excludes it.
async fn resolve_coupon(
    client: &RmsClient,
    config: &AppConfig,
    raw: &rakupon_rms::RawCoupon,
    scope: CouponScope,
) -> Result<Option<Coupon>, RmsError> {
    if config.inter_request_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
    }
    let conditions = client.fetch_coupon_conditions(&raw.coupon_code).await?;
    if config.strict_condition_types && conditions.has_unrecognized {
        tracing::warn!(
            coupon = %raw.coupon_code,
            "excluding coupon with unrecognized condition type"
        );
        return Ok(None);
    }
    let coupon = normalize_coupon(raw, scope, conditions.min_spend.unwrap_or(0))?;
    Ok(Some(coupon))
}

/// Runs the full per-product pipeline: fetch item coupons, select the winner,
/// compose the new title.
async fn prepare_title(
    client: &RmsClient,
    config: &AppConfig,
    store_coupons: &[Coupon],
    product: &Product,
    now: DateTime<FixedOffset>,
    today: chrono::NaiveDate,
) -> Result<TitleUpdate, RmsError> {
    if config.inter_request_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
    }

    let raw_coupons = client.search_item_coupons(&product.manage_number).await?;
    let mut item_coupons = Vec::with_capacity(raw_coupons.len());
    for raw in &raw_coupons {
        item_coupons.extend(resolve_coupon(client, config, raw, CouponScope::PerItem).await?);
    }

    let selection = select_coupon(product, &item_coupons, store_coupons, now);
    if selection.coupon_applied && selection.discounted_price <= 0 {
        tracing::warn!(
            manage_number = %product.manage_number,
            discounted_price = selection.discounted_price,
            "advertising a non-positive discounted price"
        );
    }

    let new_title = compose_title(
        &product.title,
        &selection,
        product.sku_variant_count,
        today,
        config.title_style,
    );

    Ok(TitleUpdate {
        manage_number: product.manage_number.clone(),
        new_title,
    })
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
